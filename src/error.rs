//! Error conditions raised by the session and playback service.
//!
//! The first six variants are the named session and connection conditions.
//! The remaining variants wrap transport, storage and configuration failures
//! coming from the bundled backends.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("New session received is undefined.")]
    NewSessionUndefined,

    #[error("New session received is already expired.")]
    NewSessionExpired,

    #[error("Could not get session information")]
    NoSession,

    #[error("Not connected with Spotify Remote")]
    RemoteNotConnected,

    #[error(
        "Spotify connection failed: could not find the Spotify app, it may need to be installed."
    )]
    NoSpotifyApp,

    #[error("Cancelled")]
    AuthCancelled,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API responded with {status}: {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to (de)serialize data: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0} must be set")]
    MissingConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, SpotifyError>;
