//! Spotify Playlist & Playback Bridge Library
//!
//! This library lets a user browse their own Spotify playlists and control
//! playback on a Spotify player. Its core is the [`service::Spotify`] context,
//! which keeps the OAuth session and the player connection valid before every
//! call into the backends.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error conditions raised by the service and backends
//! - `management` - Token persistence and the playlist cache
//! - `service` - Session guard, connection guard and event relay
//! - `spotify` - Backend traits and their HTTP implementations
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use spobridge::{cli::Context, config};
//!
//! #[tokio::main]
//! async fn main() -> spobridge::Res<()> {
//!     config::load_env().await?;
//!     let ctx = Context::from_env()?;
//!     ctx.spotify.pause(true).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod service;
pub mod spotify;
pub mod types;

pub use error::SpotifyError;
pub use service::Spotify;

/// A convenient Result type alias for the command-line layer.
///
/// Uses a boxed dynamic error trait object so CLI code can mix service
/// errors with parsing and I/O failures. Library operations return
/// [`error::Result`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Connecting to the Spotify player...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Playback paused");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the binary: it terminates the process with exit code 1.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for every failure the service logs, suppressed or not.
///
/// # Example
///
/// ```
/// warning!("Spotify Module - Could not refresh session: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
