//! # Spotify Service
//!
//! [`Spotify`] combines the auth, remote and Web API backends into one
//! playback and playlist surface. It is built once at startup and passed by
//! reference (or cheaply cloned) to every call site.
//!
//! ## Guards
//!
//! ```text
//! playback command → connect_remote → refresh_session → backend call
//! playlist listing →                  refresh_session → backend call
//! ```
//!
//! - [`Spotify::refresh_session`] is the only place that writes the Web API
//!   credential. Every failure tears both backends down before it is reported.
//! - [`Spotify::connect_remote`] asks the remote backend whether it is
//!   connected on every call and connects when it is not.
//!
//! ## Suppressed errors
//!
//! Every guarded operation takes `suppress_errors`. When it is set, a failure
//! is logged and the operation resolves to `Ok(None)`. `None` means the
//! operation did not complete, never that it produced an empty result.

use std::sync::Arc;

use crate::{
    error::Result,
    management::PlaylistCache,
    spotify::{AuthApi, RemoteApi, WebApi},
    types::SessionConfig,
    warning,
};

mod events;
mod playback;
mod playlists;
mod session;

#[derive(Clone)]
pub struct Spotify {
    auth: Arc<dyn AuthApi>,
    remote: Arc<dyn RemoteApi>,
    web_api: Arc<dyn WebApi>,
    session_config: Arc<SessionConfig>,
    playlists: Arc<PlaylistCache>,
}

impl std::fmt::Debug for Spotify {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spotify")
            .field("session_config", &self.session_config)
            .finish_non_exhaustive()
    }
}

impl Spotify {
    /// Builds the service on top of the given backends with an empty
    /// in-memory playlist cache.
    pub fn new(
        auth: Arc<dyn AuthApi>,
        remote: Arc<dyn RemoteApi>,
        web_api: Arc<dyn WebApi>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            auth,
            remote,
            web_api,
            session_config: Arc::new(session_config),
            playlists: Arc::new(PlaylistCache::new()),
        }
    }

    /// Replaces the in-memory playlist cache, typically with a
    /// [`PlaylistCache::persisted`] one.
    pub fn with_playlist_cache(mut self, cache: PlaylistCache) -> Self {
        self.playlists = Arc::new(cache);
        self
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }
}

/// Applies the suppress policy to the outcome of a guarded operation.
fn settle<T>(result: Result<T>, suppress_errors: bool, context: &str) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warning!("Spotify Module - {}: {}", context, e);
            if suppress_errors { Ok(None) } else { Err(e) }
        }
    }
}
