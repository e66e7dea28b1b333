//! # Spotify Backends
//!
//! The service in [`crate::service`] never talks to Spotify directly. It goes
//! through three backend seams, each a trait defined here:
//!
//! ```text
//! Spotify service (session guard, connection guard, cache, event relay)
//!          ↓
//!     ├── AuthApi    (session store + authorization)
//!     ├── RemoteApi  (connection to the player + playback commands + events)
//!     └── WebApi     (credential slot + playlist listing)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Bundled implementations
//!
//! - [`auth::TokenAuth`] keeps the session in the local token cache and renews
//!   it through the token service's `/refresh` endpoint.
//! - [`remote::ConnectRemote`] drives the user's active player through the
//!   Web API player endpoints.
//! - [`web::HttpWebApi`] lists the current user's playlists.
//!
//! Tests substitute in-memory implementations of the same traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{
    error::{Result, SpotifyError},
    types::{
        PaginationOptions, PlayerState, PlaylistPage, RemoteEvent, RemoteListener, Session,
        SessionConfig,
    },
    warning,
};

pub mod auth;
pub mod remote;
pub mod web;

/// Number of attempts made for a request answered with 502 Bad Gateway.
const BAD_GATEWAY_ATTEMPTS: u32 = 3;
const BAD_GATEWAY_DELAY: Duration = Duration::from_secs(10);

/// Session store and authorization flow.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// The session currently held, if any. It may be expired.
    async fn get_session(&self) -> Result<Option<Session>>;

    /// Runs the authorization flow and returns the resulting session, if any.
    async fn authorize(&self, config: &SessionConfig) -> Result<Option<Session>>;

    /// Forgets the held session.
    async fn end_session(&self) -> Result<()>;
}

/// Control channel to the player.
///
/// Commands and state reads fail with [`SpotifyError::RemoteNotConnected`]
/// when there is no usable connection, including a connection the player side
/// has ended since `connect`. The service reconnects once on that error.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Whether commands can currently be sent. Asked before every command.
    async fn is_connected(&self) -> Result<bool>;

    /// Opens the connection with `access_token`.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::NoSpotifyApp`] when no player is available.
    async fn connect(&self, access_token: &str) -> Result<()>;

    /// Closes the connection. Closing an already closed connection is a no-op.
    async fn disconnect(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;
    async fn resume(&self) -> Result<()>;

    /// Plays a track, episode or context URI.
    async fn play_uri(&self, uri: &str) -> Result<()>;

    async fn seek(&self, position_ms: u64) -> Result<()>;
    async fn skip_to_next(&self) -> Result<()>;
    async fn skip_to_previous(&self) -> Result<()>;

    /// Reads the current player state.
    async fn get_player_state(&self) -> Result<PlayerState>;

    /// Adds a listener for `event`. Existing listeners are kept.
    async fn add_listener(&self, event: RemoteEvent, listener: RemoteListener);

    /// Removes every listener for `event`, or for all events when `None`.
    async fn remove_all_listeners(&self, event: Option<RemoteEvent>);
}

/// REST client for playlist metadata.
#[async_trait]
pub trait WebApi: Send + Sync {
    /// Writes the credential used by every following request.
    async fn set_access_token(&self, access_token: &str);

    /// Empties the credential slot.
    async fn reset_access_token(&self);

    /// Lists one page of the current user's playlists.
    ///
    /// # Errors
    ///
    /// [`SpotifyError::NoSession`] when no credential is set, otherwise the
    /// transport or API failure.
    async fn get_user_playlists(&self, pagination: PaginationOptions) -> Result<PlaylistPage>;
}

/// Sends the request built by `build`, retrying on 502 Bad Gateway.
///
/// Non-success statuses are turned into [`SpotifyError::Api`].
pub(crate) async fn send_with_retry<F>(build: F) -> Result<Response>
where
    F: Fn() -> RequestBuilder,
{
    let mut attempt = 1;
    loop {
        let response = build().send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::BAD_GATEWAY && attempt < BAD_GATEWAY_ATTEMPTS {
            warning!(
                "Spotify responded with 502, retrying in {}s",
                BAD_GATEWAY_DELAY.as_secs()
            );
            attempt += 1;
            sleep(BAD_GATEWAY_DELAY).await;
            continue;
        }

        let message = response.text().await.unwrap_or_default();
        return Err(SpotifyError::Api {
            status: status.as_u16(),
            message,
        });
    }
}
