//! # appcast-gen
//!
//! Generates a Sparkle appcast from the latest published GitHub release.
//!
//! The run is a straight line: fetch the release list, pick the newest release
//! that is neither a draft nor a prerelease and ships an installer, turn its
//! markdown notes into HTML, and write an RSS document with a single item.
//!
//! ## Example
//!
//! ```no_run
//! use appcast_gen::AppcastConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppcastConfig::new("xmannv/xkey").output_path("site/appcast.xml");
//!     let path = appcast_gen::run(&config).await?;
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use tracing::info;

mod asset;
mod date;
mod error;
mod feed;
mod fetcher;
mod markdown;
mod types;

pub use asset::{select_asset, INSTALLER_NAME};
pub use date::format_rfc822_date;
pub use error::{AppcastError, Result};
pub use feed::{build_entry, generate_appcast, render_appcast, select_entry, version_from_tag};
pub use fetcher::ReleaseFetcher;
pub use markdown::markdown_to_html;
pub use types::{
    AppcastConfig, Asset, Enclosure, FeedEntry, Release, DEFAULT_OUTPUT_PATH, DEFAULT_REPO,
};

/// Fetches releases, renders the appcast and writes it to the configured path.
///
/// The document is assembled in memory first, so a failed run leaves no file.
pub async fn run(config: &AppcastConfig) -> Result<PathBuf> {
    let fetcher = ReleaseFetcher::new(config.clone())?;
    let releases = fetcher.fetch_releases().await?;
    info!(repo = %config.repo, count = releases.len(), "fetched releases");

    let (owner, name) = config.owner_and_name();
    let xml = generate_appcast(&releases, owner, name)?;

    tokio::fs::write(&config.output_path, xml).await?;
    info!(path = %config.output_path.display(), "wrote appcast");

    Ok(config.output_path.clone())
}
