#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::Utc;
use spobridge::{
    Spotify, SpotifyError,
    error::Result,
    spotify::{AuthApi, RemoteApi, WebApi},
    types::{
        PaginationOptions, PlaybackRestrictions, PlayerState, PlaylistPage, PlaylistSummary,
        RemoteEvent, RemoteEventPayload, RemoteListener, Session, SessionConfig,
    },
};

pub fn valid_session() -> Session {
    Session {
        access_token: "VALID ACCESS TOKEN".to_string(),
        refresh_token: "VALID REFRESH TOKEN".to_string(),
        expiration_date: Utc::now() + chrono::Duration::hours(1),
        scope: Vec::new(),
        expired: false,
    }
}

pub fn expired_session() -> Session {
    Session {
        access_token: "EXPIRED ACCESS TOKEN".to_string(),
        refresh_token: "VALID REFRESH TOKEN".to_string(),
        expiration_date: Utc::now() - chrono::Duration::hours(1),
        scope: Vec::new(),
        expired: true,
    }
}

pub fn session_config() -> SessionConfig {
    SessionConfig::new(
        "client-id".to_string(),
        "regatta-spotify-auth://".to_string(),
        "https://tokens.example.com",
    )
}

#[derive(Default)]
pub struct MockAuth {
    pub current: Mutex<Option<Session>>,
    pub authorize_result: Mutex<Option<Session>>,
    pub get_session_calls: AtomicUsize,
    pub authorize_calls: AtomicUsize,
    pub end_session_calls: AtomicUsize,
    pub fail_end_session: AtomicBool,
}

impl MockAuth {
    pub fn with(current: Option<Session>, authorize_result: Option<Session>) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(current),
            authorize_result: Mutex::new(authorize_result),
            ..Default::default()
        })
    }

    pub fn authorize_calls(&self) -> usize {
        self.authorize_calls.load(Ordering::SeqCst)
    }

    pub fn end_session_calls(&self) -> usize {
        self.end_session_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for MockAuth {
    async fn get_session(&self) -> Result<Option<Session>> {
        self.get_session_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.current.lock().unwrap().clone())
    }

    async fn authorize(&self, _config: &SessionConfig) -> Result<Option<Session>> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        let session = self.authorize_result.lock().unwrap().clone();
        if session.is_some() {
            *self.current.lock().unwrap() = session.clone();
        }
        Ok(session)
    }

    async fn end_session(&self) -> Result<()> {
        self.end_session_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_end_session.load(Ordering::SeqCst) {
            return Err(SpotifyError::Io(std::io::Error::other("token cache is read-only")));
        }
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

#[derive(Default)]
pub struct MockRemote {
    pub connected: AtomicBool,
    pub fail_connect: AtomicBool,
    pub fail_disconnect: AtomicBool,
    pub can_seek: AtomicBool,
    pub connect_calls: AtomicUsize,
    pub disconnect_calls: AtomicUsize,
    pub pause_calls: AtomicUsize,
    pub resume_calls: AtomicUsize,
    pub next_calls: AtomicUsize,
    pub prev_calls: AtomicUsize,
    pub state_calls: AtomicUsize,
    pub connect_tokens: Mutex<Vec<String>>,
    pub played: Mutex<Vec<String>>,
    pub seeks: Mutex<Vec<u64>>,
    pub listeners: Mutex<HashMap<RemoteEvent, Vec<RemoteListener>>>,
}

impl MockRemote {
    pub fn new(connected: bool) -> Arc<Self> {
        let remote = Self::default();
        remote.connected.store(connected, Ordering::SeqCst);
        remote.can_seek.store(true, Ordering::SeqCst);
        Arc::new(remote)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn pause_calls(&self) -> usize {
        self.pause_calls.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self, event: RemoteEvent) -> usize {
        self.listeners
            .lock()
            .unwrap()
            .get(&event)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.lock().unwrap().values().map(Vec::len).sum()
    }

    /// Delivers `payload` to every listener registered for its kind.
    pub fn emit(&self, payload: RemoteEventPayload) {
        let listeners = self
            .listeners
            .lock()
            .unwrap()
            .get(&payload.kind())
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener(payload.clone());
        }
    }

    fn require_connection(&self) -> Result<()> {
        if self.connected.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SpotifyError::RemoteNotConnected)
        }
    }
}

#[async_trait]
impl RemoteApi for MockRemote {
    async fn is_connected(&self) -> Result<bool> {
        Ok(self.connected.load(Ordering::SeqCst))
    }

    async fn connect(&self, access_token: &str) -> Result<()> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(SpotifyError::NoSpotifyApp);
        }
        self.connect_tokens
            .lock()
            .unwrap()
            .push(access_token.to_string());
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(SpotifyError::Api {
                status: 500,
                message: "disconnect failed".to_string(),
            });
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.pause_calls.fetch_add(1, Ordering::SeqCst);
        self.require_connection()
    }

    async fn resume(&self) -> Result<()> {
        self.resume_calls.fetch_add(1, Ordering::SeqCst);
        self.require_connection()
    }

    async fn play_uri(&self, uri: &str) -> Result<()> {
        self.require_connection()?;
        self.played.lock().unwrap().push(uri.to_string());
        Ok(())
    }

    async fn seek(&self, position_ms: u64) -> Result<()> {
        self.require_connection()?;
        self.seeks.lock().unwrap().push(position_ms);
        Ok(())
    }

    async fn skip_to_next(&self) -> Result<()> {
        self.next_calls.fetch_add(1, Ordering::SeqCst);
        self.require_connection()
    }

    async fn skip_to_previous(&self) -> Result<()> {
        self.prev_calls.fetch_add(1, Ordering::SeqCst);
        self.require_connection()
    }

    async fn get_player_state(&self) -> Result<PlayerState> {
        self.state_calls.fetch_add(1, Ordering::SeqCst);
        self.require_connection()?;
        Ok(PlayerState {
            track: None,
            playback_position_ms: 42_000,
            playback_speed: 0.0,
            is_paused: true,
            playback_restrictions: PlaybackRestrictions {
                can_seek: self.can_seek.load(Ordering::SeqCst),
                ..Default::default()
            },
        })
    }

    async fn add_listener(&self, event: RemoteEvent, listener: RemoteListener) {
        self.listeners
            .lock()
            .unwrap()
            .entry(event)
            .or_default()
            .push(listener);
    }

    async fn remove_all_listeners(&self, event: Option<RemoteEvent>) {
        let mut listeners = self.listeners.lock().unwrap();
        match event {
            Some(event) => {
                listeners.remove(&event);
            }
            None => listeners.clear(),
        }
    }
}

/// Web API double. Every fetch returns a page whose `total` is the fetch
/// number, so tests can tell pages apart.
#[derive(Default)]
pub struct MockWeb {
    pub access_token: Mutex<Option<String>>,
    pub set_tokens: Mutex<Vec<String>>,
    pub reset_calls: AtomicUsize,
    pub fetch_calls: AtomicUsize,
    pub fail_fetch: AtomicBool,
    pub delay_ms: AtomicU64,
}

impl MockWeb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_tokens(&self) -> Vec<String> {
        self.set_tokens.lock().unwrap().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.access_token.lock().unwrap().clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

pub fn playlist_page(total: u32) -> PlaylistPage {
    PlaylistPage {
        items: (0..10)
            .map(|index| PlaylistSummary {
                id: format!("playlist-{index}"),
                name: format!("Playlist {index}"),
                uri: format!("URI-playlist-{index}"),
            })
            .collect(),
        limit: 10,
        offset: 0,
        total,
        next: None,
    }
}

#[async_trait]
impl WebApi for MockWeb {
    async fn set_access_token(&self, access_token: &str) {
        self.set_tokens
            .lock()
            .unwrap()
            .push(access_token.to_string());
        *self.access_token.lock().unwrap() = Some(access_token.to_string());
    }

    async fn reset_access_token(&self) {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        *self.access_token.lock().unwrap() = None;
    }

    async fn get_user_playlists(&self, _pagination: PaginationOptions) -> Result<PlaylistPage> {
        let call = self.fetch_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(SpotifyError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(playlist_page(call as u32))
    }
}

pub fn service(auth: &Arc<MockAuth>, remote: &Arc<MockRemote>, web: &Arc<MockWeb>) -> Spotify {
    Spotify::new(
        auth.clone(),
        remote.clone(),
        web.clone(),
        session_config(),
    )
}

/// Lets detached tasks spawned by the service run to completion.
pub async fn settle_background() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
