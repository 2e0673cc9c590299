//! # CLI Module
//!
//! User-facing commands of TroveRAI. Each command loads what it needs
//! (HTTP client, token file, config cache, catalog dump), delegates to the
//! library modules and prints the result.
//!
//! ## Command Categories
//!
//! ### Schedules
//! - [`now`] - what is on air now, or every schedule of another day
//! - [`schedule`] - one channel, one day, optional time window
//! - [`channels`] - channel guide
//! - [`prime_time`] - 20:00-23:59 on Rai 1, Rai 2 and Rai 3
//! - [`search`] - programs by name across the main channels
//!
//! ### Authentication
//! - [`login`], [`status`], [`token`], [`refresh`], [`test_auth`],
//!   [`show_config`]
//!
//! ### Catalog
//! - [`catalog_sections`], [`catalog_genres`], [`catalog_types`],
//!   [`catalog_stats`], [`catalog_random`], [`catalog_search`]
//!
//! ### Utilities
//! - [`jsonfix`] - repair a broken JSON file
//!
//! ## Output
//!
//! Command output goes to stdout, status messages (`info!`, `warning!`, ...)
//! to stderr. With `--json` the schedule commands print the upstream JSON
//! untouched apart from indentation.

mod auth;
mod catalog;
mod jsonfix;
mod schedule;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::login;
pub use auth::refresh;
pub use auth::show_config;
pub use auth::status;
pub use auth::test_auth;
pub use auth::token;
pub use catalog::catalog_genres;
pub use catalog::catalog_random;
pub use catalog::catalog_search;
pub use catalog::catalog_sections;
pub use catalog::catalog_stats;
pub use catalog::catalog_types;
pub use jsonfix::JsonFixArgs;
pub use jsonfix::jsonfix;
pub use schedule::ProgramFilter;
pub use schedule::channels;
pub use schedule::now;
pub use schedule::prime_time;
pub use schedule::schedule;
pub use schedule::search;

use crate::{error, raiplay::RaiPlayClient};

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

fn client() -> RaiPlayClient {
    match RaiPlayClient::new() {
        Ok(client) => client,
        Err(e) => error!("Cannot create HTTP client: {}", e),
    }
}
