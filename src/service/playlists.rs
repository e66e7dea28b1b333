use crate::{
    error::{Result, SpotifyError},
    types::{PaginationOptions, PlaylistPage},
    warning,
};

use super::{Spotify, settle};

impl Spotify {
    /// Fetches the user's own playlists, bypassing the cache.
    ///
    /// The session guard runs first, so the Web API credential is current
    /// when the request goes out.
    ///
    /// # Errors
    ///
    /// Unless `suppress_errors` is set, returns the session failure or the
    /// Web API failure.
    pub async fn get_own_playlists(
        &self,
        pagination: PaginationOptions,
        suppress_errors: bool,
    ) -> Result<Option<PlaylistPage>> {
        let result = async {
            self.refresh_session(suppress_errors)
                .await?
                .ok_or(SpotifyError::NoSession)?;
            self.web_api.get_user_playlists(pagination).await
        }
        .await;

        settle(result, suppress_errors, "Could not get own playlists")
    }

    /// Returns the cached playlist page when there is one, refreshing it in
    /// the background for the next call. With an empty cache the page is
    /// fetched and stored before returning.
    ///
    /// The cache holds a single page regardless of `pagination`.
    pub async fn get_cached_own_playlists(
        &self,
        pagination: PaginationOptions,
        suppress_errors: bool,
    ) -> Result<Option<PlaylistPage>> {
        if let Some(page) = self.playlists.get().await {
            self.spawn_playlist_refresh(pagination, suppress_errors);
            return Ok(Some(page));
        }

        let version = self.playlists.reserve_version();
        let fetched = self.get_own_playlists(pagination, suppress_errors).await?;
        if let Some(page) = &fetched {
            self.playlists.store(version, page.clone()).await;
        }
        Ok(fetched)
    }

    /// Waits for the background playlist refresh started by
    /// [`Spotify::get_cached_own_playlists`], if one is pending.
    pub async fn playlist_refresh_finished(&self) {
        self.playlists.refresh_finished().await;
    }

    /// Drops the cached playlist page, including its cache file.
    pub async fn clear_playlist_cache(&self) -> Result<()> {
        self.playlists.clear().await
    }

    /// Background failures are logged and end with the detached task; they
    /// never reach the caller of the cached read.
    fn spawn_playlist_refresh(&self, pagination: PaginationOptions, suppress_errors: bool) {
        let Some(permit) = self.playlists.try_begin_refresh() else {
            return;
        };

        let spotify = self.clone();
        tokio::spawn(async move {
            match spotify.get_own_playlists(pagination, suppress_errors).await {
                Ok(Some(page)) => {
                    permit.complete(page).await;
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => {
                    warning!(
                        "Spotify Module - Error getting the cached own playlists: {}",
                        e
                    );
                    Err(e)
                }
            }
        });
    }
}
