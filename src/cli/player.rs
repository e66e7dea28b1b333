use std::{sync::Arc, time::Duration};

use crate::{
    Res,
    cli::Context,
    info, success,
    types::{PlayerState, RemoteEvent, RemoteEventPayload},
    warning,
};

pub async fn play(ctx: &Context, uri: &str) -> Res<()> {
    if ctx.spotify.play(uri, false).await?.is_some() {
        success!("Playing {}", uri);
    }
    Ok(())
}

pub async fn pause(ctx: &Context) -> Res<()> {
    if ctx.spotify.pause(false).await?.is_some() {
        success!("Playback paused");
    }
    Ok(())
}

pub async fn resume(ctx: &Context) -> Res<()> {
    if ctx.spotify.resume(false).await?.is_some() {
        success!("Playback resumed");
    }
    Ok(())
}

pub async fn stop(ctx: &Context) -> Res<()> {
    if ctx.spotify.stop(false).await?.is_some() {
        success!("Playback stopped");
    }
    Ok(())
}

pub async fn skip_next(ctx: &Context) -> Res<()> {
    if ctx.spotify.skip_next(false).await?.is_some() {
        success!("Skipped to next track");
    }
    Ok(())
}

pub async fn skip_prev(ctx: &Context) -> Res<()> {
    if ctx.spotify.skip_prev(false).await?.is_some() {
        success!("Skipped to previous track");
    }
    Ok(())
}

pub async fn state(ctx: &Context) -> Res<()> {
    if let Some(state) = ctx.spotify.get_player_state(false).await? {
        print_state(&state);
    }
    Ok(())
}

/// Prints remote events until interrupted, polling the player every
/// `interval` so state changes get reported.
pub async fn watch(ctx: &Context, interval: Duration) -> Res<()> {
    for event in RemoteEvent::ALL {
        ctx.spotify
            .set_remote_event_listener(
                event.as_str(),
                Arc::new(|payload: RemoteEventPayload| match payload {
                    RemoteEventPayload::PlayerState(state) => print_state(&state),
                    RemoteEventPayload::PlayerContext(context) => {
                        info!("Context changed: {} ({})", context.uri, context.title)
                    }
                    RemoteEventPayload::Connected => success!("Connected to Spotify player"),
                    RemoteEventPayload::Disconnected => {
                        warning!("Disconnected from Spotify player")
                    }
                }),
            )
            .await;
    }

    info!("Watching player events, press Ctrl-C to stop.");
    let mut ticker = tokio::time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                ctx.spotify.get_player_state(true).await?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    ctx.spotify.clear_all_remote_event_listeners().await;
    ctx.spotify.disconnect_remote().await?;
    Ok(())
}

fn print_state(state: &PlayerState) {
    let status = if state.is_paused { "paused" } else { "playing" };
    match &state.track {
        Some(track) => info!(
            "{} - {} [{}] {}/{}s ({})",
            track.artist,
            track.name,
            track.album,
            state.playback_position_ms / 1000,
            track.duration_ms / 1000,
            status
        ),
        None => info!("Nothing is playing."),
    }
}
