use crate::{Res, cli::Context, success, types::ApiScope, warning};

/// Exchanges `code` for a token and stores it in the token cache.
pub async fn login(ctx: &Context, code: &str) -> Res<()> {
    let session = ctx
        .auth
        .import_code(ctx.spotify.session_config(), code)
        .await?;
    success!(
        "Authentication successful! Session valid until {}",
        session.expiration_date.format("%Y-%m-%d %H:%M:%S UTC")
    );

    let missing: Vec<&str> = ctx
        .spotify
        .session_config()
        .scopes
        .iter()
        .map(ApiScope::as_str)
        .filter(|scope| !session.scope.iter().any(|granted| granted.as_str() == *scope))
        .collect();
    if !missing.is_empty() {
        warning!("The token was not granted: {}", missing.join(", "));
    }
    Ok(())
}

/// Ends the session and removes the cached playlist listing.
pub async fn logout(ctx: &Context) -> Res<()> {
    let cleared = ctx.spotify.clear_playlist_cache().await;
    ctx.spotify.de_init().await?;
    cleared?;
    success!("Logged out.");
    Ok(())
}
