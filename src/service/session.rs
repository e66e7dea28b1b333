use crate::{
    error::{Result, SpotifyError},
    types::Session,
    warning,
};

use super::Spotify;

impl Spotify {
    /// Tears down the remote connection, the auth session and the Web API
    /// credential.
    ///
    /// Every step runs even if an earlier one fails, so the service always
    /// ends up logged out; the first failure is returned afterwards. Await
    /// this before issuing further calls so the remote has finished
    /// disconnecting.
    pub async fn de_init(&self) -> Result<()> {
        let mut first_error: Option<SpotifyError> = None;

        match self.remote.is_connected().await {
            Ok(true) => {
                self.remote.remove_all_listeners(None).await;
                if let Err(e) = self.remote.pause().await {
                    warning!("Spotify Module - Could not pause while tearing down: {}", e);
                }
                if let Err(e) = self.remote.disconnect().await {
                    first_error.get_or_insert(e);
                }
            }
            Ok(false) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }

        if let Err(e) = self.auth.end_session().await {
            first_error.get_or_insert(e);
        }
        self.web_api.reset_access_token().await;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Provides the current valid session, renewing it when necessary.
    ///
    /// The Web API credential is rewritten from the returned session on every
    /// successful call. Any failure tears everything down before it is
    /// returned or suppressed.
    pub async fn refresh_session(&self, suppress_errors: bool) -> Result<Option<Session>> {
        match self.ensure_session().await {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warning!("Spotify Module - Could not refresh session: {}", e);
                if let Err(teardown) = self.de_init().await {
                    warning!("Spotify Module - Teardown did not complete: {}", teardown);
                }
                if suppress_errors { Ok(None) } else { Err(e) }
            }
        }
    }

    async fn ensure_session(&self) -> Result<Session> {
        if let Some(current) = self.auth.get_session().await? {
            if !current.expired {
                self.web_api.set_access_token(&current.access_token).await;
                return Ok(current);
            }
        }

        let session = self
            .auth
            .authorize(&self.session_config)
            .await?
            .ok_or(SpotifyError::NewSessionUndefined)?;

        if session.expired {
            return Err(SpotifyError::NewSessionExpired);
        }

        self.web_api.set_access_token(&session.access_token).await;
        Ok(session)
    }
}
