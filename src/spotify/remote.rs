use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::sync::Mutex;

use crate::{
    error::{Result, SpotifyError},
    spotify::{RemoteApi, send_with_retry},
    types::{
        CurrentPlaybackResponse, DevicesResponse, PlayRequest, PlaybackRestrictions, PlayerContext,
        PlayerState, RemoteEvent, RemoteEventPayload, RemoteListener,
    },
    warning,
};

#[derive(Debug, Default)]
struct ConnectionState {
    access_token: Option<String>,
    last_state: Option<PlayerState>,
    last_context: Option<PlayerContext>,
}

/// Remote backend driving the user's Spotify player through the Web API
/// player endpoints.
///
/// "Connected" means a token was accepted and at least one playback device
/// was available at connect time. The connection ends as soon as Spotify
/// rejects that token with 401: the backend disconnects itself and the
/// command fails with [`SpotifyError::RemoteNotConnected`], so the next
/// guarded call reconnects with a renewed session.
///
/// State and context change events are raised when a state read differs from
/// the previous one.
pub struct ConnectRemote {
    client: Client,
    api_url: String,
    state: Mutex<ConnectionState>,
    listeners: Mutex<HashMap<RemoteEvent, Vec<RemoteListener>>>,
}

impl std::fmt::Debug for ConnectRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectRemote")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl ConnectRemote {
    /// Creates a disconnected backend for the Web API at `api_url`.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            state: Mutex::new(ConnectionState::default()),
            listeners: Mutex::new(HashMap::new()),
        })
    }

    async fn token(&self) -> Result<String> {
        self.state
            .lock()
            .await
            .access_token
            .clone()
            .ok_or(SpotifyError::RemoteNotConnected)
    }

    fn url(&self, path: &str) -> String {
        format!("{uri}/me/player{path}", uri = self.api_url)
    }

    async fn emit(&self, payload: RemoteEventPayload) {
        let listeners = self
            .listeners
            .lock()
            .await
            .get(&payload.kind())
            .cloned()
            .unwrap_or_default();

        for listener in listeners {
            listener(payload.clone());
        }
    }

    /// Sends a request made with the connection's token. A 401 answer ends
    /// the connection.
    async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        match send_with_retry(build).await {
            Err(SpotifyError::Api { status: 401, message }) => {
                warning!("Spotify Remote - Access token rejected: {}", message);
                self.disconnect().await?;
                Err(SpotifyError::RemoteNotConnected)
            }
            other => other,
        }
    }

    async fn put(&self, path: &str) -> Result<()> {
        let token = self.token().await?;
        let url = self.url(path);
        self.send(|| self.client.put(&url).bearer_auth(&token).body(""))
            .await?;
        Ok(())
    }

    async fn post(&self, path: &str) -> Result<()> {
        let token = self.token().await?;
        let url = self.url(path);
        self.send(|| self.client.post(&url).bearer_auth(&token).body(""))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteApi for ConnectRemote {
    async fn is_connected(&self) -> Result<bool> {
        Ok(self.state.lock().await.access_token.is_some())
    }

    async fn connect(&self, access_token: &str) -> Result<()> {
        let url = self.url("/devices");
        let response =
            send_with_retry(|| self.client.get(&url).bearer_auth(access_token)).await?;
        let devices = response.json::<DevicesResponse>().await?;

        if devices.devices.iter().all(|d| d.is_restricted) {
            return Err(SpotifyError::NoSpotifyApp);
        }

        {
            let mut state = self.state.lock().await;
            state.access_token = Some(access_token.to_string());
        }
        self.emit(RemoteEventPayload::Connected).await;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        let was_connected = {
            let mut state = self.state.lock().await;
            let was_connected = state.access_token.is_some();
            *state = ConnectionState::default();
            was_connected
        };

        if was_connected {
            self.emit(RemoteEventPayload::Disconnected).await;
        }
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.put("/pause").await
    }

    async fn resume(&self) -> Result<()> {
        self.put("/play").await
    }

    async fn play_uri(&self, uri: &str) -> Result<()> {
        let token = self.token().await?;
        let url = self.url("/play");
        let body = PlayRequest::for_uri(uri);
        self.send(|| self.client.put(&url).bearer_auth(&token).json(&body))
            .await?;
        Ok(())
    }

    async fn seek(&self, position_ms: u64) -> Result<()> {
        self.put(&format!("/seek?position_ms={position_ms}")).await
    }

    async fn skip_to_next(&self) -> Result<()> {
        self.post("/next").await
    }

    async fn skip_to_previous(&self) -> Result<()> {
        self.post("/previous").await
    }

    async fn get_player_state(&self) -> Result<PlayerState> {
        let token = self.token().await?;
        let url = self.url("");
        let response = self.send(|| self.client.get(&url).bearer_auth(&token)).await?;

        // 204 means no playback is active on any device.
        let (player_state, context) = if response.status() == StatusCode::NO_CONTENT {
            let idle = PlayerState {
                track: None,
                playback_position_ms: 0,
                playback_speed: 0.0,
                is_paused: true,
                playback_restrictions: PlaybackRestrictions::default(),
            };
            (idle, None)
        } else {
            let playback = response.json::<CurrentPlaybackResponse>().await?;
            (playback.player_state(), playback.player_context())
        };

        let (state_changed, context_changed) = {
            let mut state = self.state.lock().await;
            let state_changed = state.last_state.as_ref() != Some(&player_state);
            let context_changed = context.is_some() && state.last_context != context;
            state.last_state = Some(player_state.clone());
            if context.is_some() {
                state.last_context = context.clone();
            }
            (state_changed, context_changed)
        };

        if state_changed {
            self.emit(RemoteEventPayload::PlayerState(player_state.clone()))
                .await;
        }
        if let (true, Some(context)) = (context_changed, context) {
            self.emit(RemoteEventPayload::PlayerContext(context)).await;
        }

        Ok(player_state)
    }

    async fn add_listener(&self, event: RemoteEvent, listener: RemoteListener) {
        self.listeners
            .lock()
            .await
            .entry(event)
            .or_default()
            .push(listener);
    }

    async fn remove_all_listeners(&self, event: Option<RemoteEvent>) {
        let mut listeners = self.listeners.lock().await;
        match event {
            Some(event) => {
                listeners.remove(&event);
            }
            None => listeners.clear(),
        }
    }
}
