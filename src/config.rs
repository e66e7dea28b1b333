//! Configuration management for spobridge.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Defaults for the redirect and Web API URLs

use std::{env, path::PathBuf};

use crate::{
    error::{Result, SpotifyError},
    types::SessionConfig,
};

pub const DEFAULT_REDIRECT_URI: &str = "regatta-spotify-auth://";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Returns the directory all local state lives under.
///
/// - Linux: `~/.local/share/spobridge`
/// - macOS: `~/Library/Application Support/spobridge`
/// - Windows: `%LOCALAPPDATA%/spobridge`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spobridge");
    path
}

/// Loads environment variables from `<data_dir>/.env`.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error; variables may come from the environment alone.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| {
            SpotifyError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
    }
    Ok(())
}

fn required(name: &'static str) -> Result<String> {
    env::var(name).map_err(|_| SpotifyError::MissingConfig(name))
}

/// Client ID registered with Spotify's developer platform.
pub fn spotify_client_id() -> Result<String> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Redirect target registered for the application.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string())
}

/// Base URL of the token service exposing `/swap` and `/refresh`.
pub fn spotify_token_service_url() -> Result<String> {
    required("SPOTIFY_TOKEN_SERVICE_URL")
}

/// Base URL of the Spotify Web API, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

impl SessionConfig {
    /// Builds the fixed authorization configuration from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(SessionConfig::new(
            spotify_client_id()?,
            spotify_redirect_uri(),
            &spotify_token_service_url()?,
        ))
    }
}
