use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    Res,
    cli::Context,
    info,
    types::{PaginationOptions, PlaylistTableRow},
};

/// Prints one page of the user's playlists as a table.
///
/// With `cached`, the page saved by an earlier run is shown right away and
/// refreshed in the background. The command waits for that refresh before
/// returning so the next cached run sees the new listing.
pub async fn playlists(ctx: &Context, pagination: PaginationOptions, cached: bool) -> Res<()> {
    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching playlists...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")?.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = if cached {
        ctx.spotify
            .get_cached_own_playlists(pagination, false)
            .await
    } else {
        ctx.spotify.get_own_playlists(pagination, false).await
    };
    pb.finish_and_clear();

    let Some(page) = result? else {
        return Ok(());
    };

    if page.items.is_empty() {
        info!("No playlists found.");
        if cached {
            ctx.spotify.playlist_refresh_finished().await;
        }
        return Ok(());
    }

    let table_rows: Vec<PlaylistTableRow> = page
        .items
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            uri: p.uri,
        })
        .collect();

    println!("{}", Table::new(table_rows));
    info!(
        "Showing {} from offset {} of {} playlists",
        page.limit, page.offset, page.total
    );

    if cached {
        ctx.spotify.playlist_refresh_finished().await;
    }
    Ok(())
}
