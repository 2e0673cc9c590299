//! RaiPlay schedule and catalog CLI library
//!
//! This library backs the `troverai` binary. It fetches TV schedules, the
//! channel guide and on-air listings from RaiPlay, manages the RaiPlay login
//! token (JWT decode, expiry check and refresh), explores a locally saved
//! catalog dump and repairs broken JSON files.
//!
//! # Modules
//!
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `jsonfix` - Repair of common JSON syntax errors
//! - `jwt` - Best-effort JWT payload decoding and expiry checks
//! - `management` - Token file, config cache and catalog handling
//! - `output` - Text and JSON rendering
//! - `raiplay` - RaiPlay HTTP client
//! - `types` - Data structures mirroring the upstream JSON
//! - `utils` - Date, channel and schedule helpers

pub mod cli;
pub mod config;
pub mod jsonfix;
pub mod jwt;
pub mod management;
pub mod output;
pub mod raiplay;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// Status messages go to stderr so that stdout only carries command output
/// (for example `export RAIPLAY_TOKEN=$(troverai auth token)`).
///
/// # Example
///
/// ```
/// info!("Logging in as {}...", username);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Token refreshed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Terminates the process with exit code 1. Only use it for errors the
/// current command cannot recover from.
///
/// # Example
///
/// ```
/// error!("Login failed: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// # Example
///
/// ```
/// warning!("Failed to fetch config: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
