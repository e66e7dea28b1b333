use std::time::Duration;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spobridge::{
    Res, SpotifyError,
    cli::{self, Context},
    config, error,
    types::PaginationOptions,
    warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Seed the session from an authorization code
    Login(LoginOptions),

    /// End the session and disconnect from the player
    Logout,

    /// List your own playlists
    Playlists(PlaylistsOptions),

    /// Play a track, album, artist or playlist URI
    Play(PlayOptions),

    /// Pause playback
    Pause,

    /// Resume playback
    Resume,

    /// Pause playback and rewind to the start
    Stop,

    /// Skip to the next track
    Next,

    /// Skip to the previous track
    Prev,

    /// Show the current player state
    State,

    /// Print player events until interrupted
    Watch(WatchOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginOptions {
    /// Authorization code received on the redirect URI
    #[clap(long)]
    code: String,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Maximum number of playlists to return
    #[clap(long)]
    limit: Option<u32>,

    /// Index of the first playlist to return
    #[clap(long)]
    offset: Option<u32>,

    /// Show the listing saved by the last run and refresh it
    #[clap(long)]
    cached: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct PlayOptions {
    uri: String,
}

#[derive(Parser, Debug, Clone)]
pub struct WatchOptions {
    /// Seconds between player state polls
    #[clap(long, default_value_t = 2)]
    interval: u64,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

async fn run(command: Command) -> Res<()> {
    if let Command::Completions(opt) = &command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let ctx = Context::from_env()?;

    match command {
        Command::Login(opt) => cli::login(&ctx, &opt.code).await,
        Command::Logout => cli::logout(&ctx).await,
        Command::Playlists(opt) => {
            let pagination = PaginationOptions {
                offset: opt.offset,
                limit: opt.limit,
            };
            cli::playlists(&ctx, pagination, opt.cached).await
        }
        Command::Play(opt) => cli::play(&ctx, &opt.uri).await,
        Command::Pause => cli::pause(&ctx).await,
        Command::Resume => cli::resume(&ctx).await,
        Command::Stop => cli::stop(&ctx).await,
        Command::Next => cli::skip_next(&ctx).await,
        Command::Prev => cli::skip_prev(&ctx).await,
        Command::State => cli::state(&ctx).await,
        Command::Watch(opt) => cli::watch(&ctx, Duration::from_secs(opt.interval.max(1))).await,
        Command::Completions(_) => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        if let Some(SpotifyError::NewSessionUndefined | SpotifyError::NoSession) =
            e.downcast_ref::<SpotifyError>()
        {
            warning!("No stored session. Please run spobridge login --code <code>");
        }
        error!("{}", e);
    }
}
