use std::{fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Seconds before the real expiry at which a cached token is treated as expired.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 240;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    /// Moment the token stops being accepted. Values that do not form a valid
    /// timestamp yield the Unix epoch, so the token reads as expired.
    pub fn expiration_date(&self) -> DateTime<Utc> {
        i64::try_from(self.obtained_at.saturating_add(self.expires_in))
            .ok()
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_default()
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expiration_date() - Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS)
    }

    pub fn to_session(&self) -> Session {
        Session {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expiration_date: self.expiration_date(),
            scope: self.scope.split_whitespace().map(String::from).collect(),
            expired: self.is_expired(),
        }
    }
}

/// OAuth credential bundle handed out by the auth backend.
///
/// A session is never edited; a refresh produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expiration_date: DateTime<Utc>,
    pub scope: Vec<String>,
    pub expired: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiScope {
    AppRemoteControl,
    PlaylistReadPrivate,
    PlaylistReadCollaborative,
    UserLibraryRead,
    UserModifyPlaybackState,
    UserReadCurrentlyPlaying,
}

impl ApiScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiScope::AppRemoteControl => "app-remote-control",
            ApiScope::PlaylistReadPrivate => "playlist-read-private",
            ApiScope::PlaylistReadCollaborative => "playlist-read-collaborative",
            ApiScope::UserLibraryRead => "user-library-read",
            ApiScope::UserModifyPlaybackState => "user-modify-playback-state",
            ApiScope::UserReadCurrentlyPlaying => "user-read-currently-playing",
        }
    }
}

/// Scopes requested on every authorization.
pub const SPOTIFY_SCOPES: [ApiScope; 6] = [
    ApiScope::AppRemoteControl,
    ApiScope::PlaylistReadPrivate,
    ApiScope::PlaylistReadCollaborative,
    ApiScope::UserLibraryRead,
    ApiScope::UserModifyPlaybackState,
    ApiScope::UserReadCurrentlyPlaying,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    Token,
    Code,
}

/// Fixed configuration passed to [`crate::spotify::AuthApi::authorize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub client_id: String,
    pub redirect_url: String,
    pub token_refresh_url: String,
    pub token_swap_url: String,
    pub scopes: Vec<ApiScope>,
    pub show_dialog: bool,
    pub auth_type: AuthType,
}

impl SessionConfig {
    /// Builds the configuration for a token service rooted at `token_service_url`.
    pub fn new(client_id: String, redirect_url: String, token_service_url: &str) -> Self {
        let base = token_service_url.trim_end_matches('/');
        Self {
            client_id,
            redirect_url,
            token_refresh_url: format!("{base}/refresh"),
            token_swap_url: format!("{base}/swap"),
            scopes: SPOTIFY_SCOPES.to_vec(),
            show_dialog: false,
            auth_type: AuthType::Token,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationOptions {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistSummary>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRestrictions {
    pub can_skip_next: bool,
    pub can_skip_previous: bool,
    pub can_seek: bool,
    pub can_repeat_track: bool,
    pub can_repeat_context: bool,
    pub can_toggle_shuffle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub track: Option<Track>,
    pub playback_position_ms: u64,
    pub playback_speed: f32,
    pub is_paused: bool,
    pub playback_restrictions: PlaybackRestrictions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerContext {
    pub uri: String,
    pub title: String,
}

/// Event kinds the remote backend can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteEvent {
    PlayerStateChanged,
    PlayerContextChanged,
    RemoteConnected,
    RemoteDisconnected,
}

impl RemoteEvent {
    pub const ALL: [RemoteEvent; 4] = [
        RemoteEvent::PlayerStateChanged,
        RemoteEvent::PlayerContextChanged,
        RemoteEvent::RemoteConnected,
        RemoteEvent::RemoteDisconnected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RemoteEvent::PlayerStateChanged => "playerStateChanged",
            RemoteEvent::PlayerContextChanged => "playerContextChanged",
            RemoteEvent::RemoteConnected => "remoteConnected",
            RemoteEvent::RemoteDisconnected => "remoteDisconnected",
        }
    }
}

impl fmt::Display for RemoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RemoteEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RemoteEvent::ALL
            .into_iter()
            .find(|ev| ev.as_str() == s)
            .ok_or_else(|| format!("Unknown remote event: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEventPayload {
    PlayerState(PlayerState),
    PlayerContext(PlayerContext),
    Connected,
    Disconnected,
}

impl RemoteEventPayload {
    pub fn kind(&self) -> RemoteEvent {
        match self {
            RemoteEventPayload::PlayerState(_) => RemoteEvent::PlayerStateChanged,
            RemoteEventPayload::PlayerContext(_) => RemoteEvent::PlayerContextChanged,
            RemoteEventPayload::Connected => RemoteEvent::RemoteConnected,
            RemoteEventPayload::Disconnected => RemoteEvent::RemoteDisconnected,
        }
    }
}

pub type RemoteListener = Arc<dyn Fn(RemoteEventPayload) + Send + Sync>;

// Wire formats of the Web API player endpoints.

#[derive(Debug, Clone, Deserialize)]
pub struct DevicesResponse {
    pub devices: Vec<Device>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_restricted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPlaybackResponse {
    #[serde(default)]
    pub progress_ms: Option<u64>,
    pub is_playing: bool,
    pub item: Option<PlaybackItem>,
    pub context: Option<PlaybackContext>,
    #[serde(default)]
    pub actions: PlaybackActions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackItem {
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<PlaybackArtist>,
    pub album: Option<PlaybackAlbum>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackAlbum {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackContext {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaybackActions {
    #[serde(default)]
    pub disallows: Disallows,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Disallows {
    #[serde(default)]
    pub seeking: bool,
    #[serde(default)]
    pub skipping_next: bool,
    #[serde(default)]
    pub skipping_prev: bool,
    #[serde(default)]
    pub toggling_repeat_track: bool,
    #[serde(default)]
    pub toggling_repeat_context: bool,
    #[serde(default)]
    pub toggling_shuffle: bool,
}

impl CurrentPlaybackResponse {
    pub fn player_state(&self) -> PlayerState {
        let disallows = &self.actions.disallows;
        PlayerState {
            track: self.item.as_ref().map(|item| Track {
                uri: item.uri.clone(),
                name: item.name.clone(),
                artist: item
                    .artists
                    .iter()
                    .map(|a| a.name.clone())
                    .collect::<Vec<_>>()
                    .join(", "),
                album: item
                    .album
                    .as_ref()
                    .map(|a| a.name.clone())
                    .unwrap_or_default(),
                duration_ms: item.duration_ms,
            }),
            playback_position_ms: self.progress_ms.unwrap_or(0),
            playback_speed: if self.is_playing { 1.0 } else { 0.0 },
            is_paused: !self.is_playing,
            playback_restrictions: PlaybackRestrictions {
                can_skip_next: !disallows.skipping_next,
                can_skip_previous: !disallows.skipping_prev,
                can_seek: !disallows.seeking,
                can_repeat_track: !disallows.toggling_repeat_track,
                can_repeat_context: !disallows.toggling_repeat_context,
                can_toggle_shuffle: !disallows.toggling_shuffle,
            },
        }
    }

    pub fn player_context(&self) -> Option<PlayerContext> {
        self.context.as_ref().map(|ctx| PlayerContext {
            uri: ctx.uri.clone(),
            title: ctx.kind.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uris: Option<Vec<String>>,
}

impl PlayRequest {
    /// Tracks and episodes are played directly, anything else as a context.
    pub fn for_uri(uri: &str) -> Self {
        let is_item = uri.starts_with("spotify:track:") || uri.starts_with("spotify:episode:");
        if is_item {
            PlayRequest {
                context_uri: None,
                uris: Some(vec![uri.to_string()]),
            }
        } else {
            PlayRequest {
                context_uri: Some(uri.to_string()),
                uris: None,
            }
        }
    }
}
