mod auth;
mod playlists;

pub use auth::TokenManager;
pub use playlists::PlaylistCache;
pub use playlists::RefreshPermit;
