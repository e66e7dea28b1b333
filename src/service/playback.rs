use std::future::Future;

use crate::{
    error::{Result, SpotifyError},
    types::PlayerState,
    warning,
};

use super::{Spotify, settle};

impl Spotify {
    /// Connects to the player unless the remote reports it is already
    /// connected.
    ///
    /// A missing connection is opened with the access token of the session
    /// returned by [`Spotify::refresh_session`].
    ///
    /// # Errors
    ///
    /// Unless `suppress_errors` is set, returns the session failure or the
    /// remote's connect failure (for example [`SpotifyError::NoSpotifyApp`]).
    ///
    /// # Example
    ///
    /// ```rust
    /// if spotify.connect_remote(true).await?.is_none() {
    ///     warning!("Spotify player is not reachable");
    /// }
    /// ```
    pub async fn connect_remote(&self, suppress_errors: bool) -> Result<Option<()>> {
        settle(
            self.ensure_connected(suppress_errors).await,
            suppress_errors,
            "Could not connect to remote Spotify player",
        )
    }

    async fn ensure_connected(&self, suppress_errors: bool) -> Result<()> {
        if self.remote.is_connected().await? {
            return Ok(());
        }

        let session = self
            .refresh_session(suppress_errors)
            .await?
            .ok_or(SpotifyError::NoSession)?;
        self.remote.connect(&session.access_token).await
    }

    /// Runs `command` on a connected remote.
    ///
    /// A remote that drops the connection while the command runs is
    /// reconnected once and the command is sent again.
    async fn on_remote<T, F, Fut>(&self, suppress_errors: bool, command: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.ensure_connected(suppress_errors).await?;
        match command().await {
            Err(SpotifyError::RemoteNotConnected) => {
                warning!("Spotify Module - Remote connection lost, reconnecting");
                self.ensure_connected(suppress_errors).await?;
                command().await
            }
            result => result,
        }
    }

    /// Disconnects from the player. Listeners stay registered.
    pub async fn disconnect_remote(&self) -> Result<()> {
        self.remote.disconnect().await
    }

    /// Clears all listeners, then pauses and disconnects if connected.
    pub async fn disconnect_and_pause(&self) -> Result<()> {
        self.clear_all_remote_event_listeners().await;
        if self.remote.is_connected().await? {
            self.pause(true).await?;
            self.disconnect_remote().await?;
        }
        Ok(())
    }

    /// Reads the player state, connecting first when needed.
    pub async fn get_player_state(&self, suppress_errors: bool) -> Result<Option<PlayerState>> {
        let result = self
            .on_remote(suppress_errors, || self.remote.get_player_state())
            .await;

        settle(
            result,
            suppress_errors,
            "Can't get remote Spotify player state",
        )
    }

    /// Starts playback of `uri`. Track and episode URIs play on their own,
    /// any other URI is played as a context (album, playlist, artist).
    pub async fn play(&self, uri: &str, suppress_errors: bool) -> Result<Option<()>> {
        let result = self
            .on_remote(suppress_errors, || self.remote.play_uri(uri))
            .await;

        settle(
            result,
            suppress_errors,
            &format!("Could not play from uri {uri} on remote Spotify player"),
        )
    }

    /// Pauses playback, connecting first when needed.
    pub async fn pause(&self, suppress_errors: bool) -> Result<Option<()>> {
        let result = self
            .on_remote(suppress_errors, || self.remote.pause())
            .await;

        settle(
            result,
            suppress_errors,
            "Could not pause playback on remote Spotify player",
        )
    }

    /// Resumes playback, connecting first when needed.
    pub async fn resume(&self, suppress_errors: bool) -> Result<Option<()>> {
        let result = self
            .on_remote(suppress_errors, || self.remote.resume())
            .await;

        settle(
            result,
            suppress_errors,
            "Could not resume playback on remote Spotify player",
        )
    }

    /// Pauses playback and rewinds to the start when the player allows
    /// seeking.
    ///
    /// The rewind is best-effort: once the pause went through, a failed state
    /// read or seek is only logged.
    pub async fn stop(&self, suppress_errors: bool) -> Result<Option<()>> {
        let result = self
            .on_remote(suppress_errors, || self.remote.pause())
            .await;

        let stopped = settle(
            result,
            suppress_errors,
            "Could not stop playback on remote Spotify player",
        )?;

        if stopped.is_some() {
            if let Err(e) = self.rewind().await {
                warning!("Spotify Module - Could not rewind remote Spotify player: {}", e);
            }
        }
        Ok(stopped)
    }

    async fn rewind(&self) -> Result<()> {
        let state = self.remote.get_player_state().await?;
        if state.playback_restrictions.can_seek {
            self.remote.seek(0).await?;
        }
        Ok(())
    }

    /// Skips to the next track of the current context.
    pub async fn skip_next(&self, suppress_errors: bool) -> Result<Option<()>> {
        let result = self
            .on_remote(suppress_errors, || self.remote.skip_to_next())
            .await;

        settle(
            result,
            suppress_errors,
            "Could not skip to next on remote Spotify player",
        )
    }

    /// Skips to the previous track of the current context.
    pub async fn skip_prev(&self, suppress_errors: bool) -> Result<Option<()>> {
        let result = self
            .on_remote(suppress_errors, || self.remote.skip_to_previous())
            .await;

        settle(
            result,
            suppress_errors,
            "Could not skip to previous on remote Spotify player",
        )
    }
}
