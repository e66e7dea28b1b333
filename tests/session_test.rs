mod common;

use std::sync::{Arc, atomic::Ordering};

use common::*;
use spobridge::{SpotifyError, spotify::RemoteApi, types::{RemoteEvent, RemoteEventPayload}};

#[tokio::test]
async fn test_new_session_when_none_exists() {
    let fresh = valid_session();
    let auth = MockAuth::with(None, Some(fresh.clone()));
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    let session = spotify.refresh_session(false).await.unwrap();

    assert_eq!(session, Some(fresh));
    assert_eq!(web.set_tokens(), vec!["VALID ACCESS TOKEN".to_string()]);
    assert_eq!(auth.get_session_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.authorize_calls(), 1);
    assert_eq!(auth.end_session_calls(), 0);
}

#[tokio::test]
async fn test_valid_session_is_not_reauthorized() {
    let current = valid_session();
    let auth = MockAuth::with(Some(current.clone()), None);
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    let session = spotify.refresh_session(false).await.unwrap();

    assert_eq!(session, Some(current));
    assert_eq!(auth.authorize_calls(), 0);
    assert_eq!(web.set_tokens(), vec!["VALID ACCESS TOKEN".to_string()]);
    assert_eq!(auth.end_session_calls(), 0);
}

#[tokio::test]
async fn test_credential_is_pushed_on_every_call() {
    let auth = MockAuth::with(Some(valid_session()), None);
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    *web.access_token.lock().unwrap() = Some("STALE".to_string());
    spotify.refresh_session(false).await.unwrap();
    spotify.refresh_session(false).await.unwrap();

    assert_eq!(web.set_tokens().len(), 2);
    assert_eq!(web.token().as_deref(), Some("VALID ACCESS TOKEN"));
}

#[tokio::test]
async fn test_expired_session_is_replaced() {
    let expired = expired_session();
    let fresh = valid_session();
    let auth = MockAuth::with(Some(expired.clone()), Some(fresh.clone()));
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    let session = spotify.refresh_session(false).await.unwrap().unwrap();

    assert_eq!(session, fresh);
    assert_ne!(session, expired);
    assert_eq!(web.set_tokens(), vec!["VALID ACCESS TOKEN".to_string()]);
    assert_eq!(auth.authorize_calls(), 1);
    assert_eq!(auth.end_session_calls(), 0);
}

#[tokio::test]
async fn test_undefined_authorization_fails_and_tears_down_once() {
    let auth = MockAuth::with(None, None);
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    let result = spotify.refresh_session(false).await;

    assert!(matches!(result, Err(SpotifyError::NewSessionUndefined)));
    assert_eq!(auth.end_session_calls(), 1);
    assert_eq!(web.reset_calls.load(Ordering::SeqCst), 1);
    assert!(web.token().is_none());
}

#[tokio::test]
async fn test_expired_authorization_fails() {
    let auth = MockAuth::with(None, Some(expired_session()));
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    let result = spotify.refresh_session(false).await;

    assert!(matches!(result, Err(SpotifyError::NewSessionExpired)));
    assert_eq!(auth.end_session_calls(), 1);
    assert!(web.set_tokens().is_empty());
}

#[tokio::test]
async fn test_suppressed_failure_returns_none_after_teardown() {
    let auth = MockAuth::with(None, None);
    let remote = MockRemote::new(true);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    let session = spotify.refresh_session(true).await.unwrap();

    assert!(session.is_none());
    assert_eq!(auth.end_session_calls(), 1);
    assert!(!remote.connected.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_de_init_disconnects_connected_remote() {
    let auth = MockAuth::with(Some(valid_session()), None);
    let remote = MockRemote::new(true);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    remote
        .add_listener(RemoteEvent::PlayerStateChanged, Arc::new(|_: RemoteEventPayload| {}))
        .await;
    spotify.de_init().await.unwrap();

    assert_eq!(remote.total_listeners(), 0);
    assert_eq!(remote.pause_calls(), 1);
    assert_eq!(remote.disconnect_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.end_session_calls(), 1);
    assert!(auth.current.lock().unwrap().is_none());
    assert!(web.token().is_none());
}

#[tokio::test]
async fn test_de_init_skips_remote_when_disconnected() {
    let auth = MockAuth::with(Some(valid_session()), None);
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    spotify.de_init().await.unwrap();

    assert_eq!(remote.pause_calls(), 0);
    assert_eq!(remote.disconnect_calls.load(Ordering::SeqCst), 0);
    assert_eq!(auth.end_session_calls(), 1);
    assert_eq!(web.reset_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_de_init_runs_every_step_and_returns_first_error() {
    let auth = MockAuth::with(Some(valid_session()), None);
    auth.fail_end_session.store(true, Ordering::SeqCst);
    let remote = MockRemote::new(true);
    remote.fail_disconnect.store(true, Ordering::SeqCst);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);
    *web.access_token.lock().unwrap() = Some("VALID ACCESS TOKEN".to_string());

    let result = spotify.de_init().await;

    match result {
        Err(SpotifyError::Api { message, .. }) => assert_eq!(message, "disconnect failed"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(remote.pause_calls(), 1);
    assert_eq!(remote.disconnect_calls.load(Ordering::SeqCst), 1);
    assert_eq!(auth.end_session_calls(), 1);
    assert_eq!(web.reset_calls.load(Ordering::SeqCst), 1);
    assert!(web.token().is_none());
}

#[tokio::test]
async fn test_de_init_resets_credential_when_end_session_fails() {
    let auth = MockAuth::with(Some(valid_session()), None);
    auth.fail_end_session.store(true, Ordering::SeqCst);
    let remote = MockRemote::new(false);
    let web = MockWeb::new();
    let spotify = service(&auth, &remote, &web);

    let result = spotify.de_init().await;

    assert!(matches!(result, Err(SpotifyError::Io(_))));
    assert_eq!(auth.end_session_calls(), 1);
    assert_eq!(web.reset_calls.load(Ordering::SeqCst), 1);
}
