use std::str::FromStr;

use crate::types::{RemoteEvent, RemoteListener};

use super::Spotify;

impl Spotify {
    /// Binds `listener` as the only listener for `event`, replacing any
    /// previous one.
    ///
    /// Unknown event names are ignored and yield `None`. A connection attempt
    /// is started in the background with errors suppressed.
    ///
    /// # Example
    ///
    /// ```rust
    /// spotify
    ///     .set_remote_event_listener(
    ///         "playerStateChanged",
    ///         Arc::new(|payload: RemoteEventPayload| info!("{:?}", payload)),
    ///     )
    ///     .await;
    /// ```
    pub async fn set_remote_event_listener(
        &self,
        event: &str,
        listener: RemoteListener,
    ) -> Option<&Self> {
        let event = RemoteEvent::from_str(event).ok()?;

        let spotify = self.clone();
        tokio::spawn(async move { spotify.connect_remote(true).await });

        self.remote.remove_all_listeners(Some(event)).await;
        self.remote.add_listener(event, listener).await;
        Some(self)
    }

    /// Removes the listener bound to `event`. Unknown names are ignored.
    pub async fn clear_remote_event_listener(&self, event: &str) {
        if let Ok(event) = RemoteEvent::from_str(event) {
            self.remote.remove_all_listeners(Some(event)).await;
        }
    }

    /// Removes every listener for every event.
    pub async fn clear_all_remote_event_listeners(&self) {
        self.remote.remove_all_listeners(None).await;
    }
}
