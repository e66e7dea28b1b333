//! # CLI Module
//!
//! Command implementations for the `spobridge` binary. Each command receives
//! the [`Context`] built once in `main` and goes through the
//! [`crate::service::Spotify`] service; nothing here talks to a backend
//! directly, except `login`, which seeds the token cache.
//!
//! ## Commands
//!
//! - [`login`] / [`logout`] - Seed the token cache from an authorization code / tear down
//! - [`playlists`] - List the user's own playlists, optionally from the on-disk cache
//! - [`play`], [`pause`], [`resume`], [`stop`], [`skip_next`], [`skip_prev`] - Playback control
//! - [`state`] - Show the current player state
//! - [`watch`] - Print remote events as they arrive
//!
//! ## Usage Patterns
//!
//! ```bash
//! spobridge login --code AQD...          # Seed the session once
//! spobridge playlists --limit 20         # List playlists
//! spobridge play spotify:playlist:37i9dQZF1DXcBWIGoYBM5M
//! spobridge stop                         # Pause and rewind
//! spobridge watch --interval 2           # Follow player events
//! ```

use std::sync::Arc;

use crate::{
    Res, config,
    management::{PlaylistCache, TokenManager},
    service::Spotify,
    spotify::{auth::TokenAuth, remote::ConnectRemote, web::HttpWebApi},
    types::SessionConfig,
};

mod auth;
mod player;
mod playlist;

pub use auth::login;
pub use auth::logout;
pub use player::pause;
pub use player::play;
pub use player::resume;
pub use player::skip_next;
pub use player::skip_prev;
pub use player::state;
pub use player::stop;
pub use player::watch;
pub use playlist::playlists;

/// Everything a command needs, built once at process start.
///
/// The playlist cache is kept in `<data_dir>/cache/playlists.json` next to
/// the token cache.
#[derive(Debug, Clone)]
pub struct Context {
    pub spotify: Spotify,
    pub auth: Arc<TokenAuth>,
}

impl Context {
    pub fn from_env() -> Res<Self> {
        let session_config = SessionConfig::from_env()?;
        let api_url = config::spotify_apiurl();

        let auth = Arc::new(TokenAuth::new(TokenManager::default())?);
        let remote = Arc::new(ConnectRemote::new(api_url.clone())?);
        let web_api = Arc::new(HttpWebApi::new(api_url)?);

        let playlists = PlaylistCache::persisted(config::data_dir().join("cache/playlists.json"));
        let spotify = Spotify::new(auth.clone(), remote, web_api, session_config)
            .with_playlist_cache(playlists);
        Ok(Self { spotify, auth })
    }
}
