// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - download: find the named dogs and save their description + media
// - fosters: list every dog that can currently be fostered
//
// Every site/concurrency setting is a global flag that can also come from a
// PET_SPOTLIGHT_* environment variable (clap's `env` feature).
// =============================================================================

use clap::{Args, Parser, Subcommand};
use pet_spotlight::config::{Config, DEFAULT_BASE_URL, DEFAULT_ORGANIZATION_PATH, DEFAULT_VIDEO_INFO_URL};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "pet-spotlight",
    version,
    about = "Download descriptions, photos and videos of adoptable dogs",
    long_about = "pet-spotlight searches a rescue's Petstablished listing for the dogs you name \
                  and saves each one's description, photos and videos into its own folder. \
                  It can also list every dog that is currently open for fostering."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log what every stage is doing (RUST_LOG overrides this)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub site: SiteArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the named dogs
    ///
    /// Example: pet-spotlight download "Fido, Rex" --output ./dogs
    Download {
        /// Comma separated dog names; a name matches any listed dog whose
        /// name contains it
        names: String,

        /// Directory that gets one folder per dog
        #[arg(long, short, default_value = ".", env = "PET_SPOTLIGHT_OUTPUT")]
        output: PathBuf,
    },

    /// List every dog that can be fostered
    Fosters {
        /// Print a JSON array instead of one name per line
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct SiteArgs {
    /// Site hosting the listing
    #[arg(long, global = true, env = "PET_SPOTLIGHT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Organization whose dogs are listed
    #[arg(long, global = true, env = "PET_SPOTLIGHT_ORGANIZATION", default_value = DEFAULT_ORGANIZATION_PATH)]
    pub organization_path: String,

    /// Endpoint used to look up video streams
    #[arg(long, global = true, env = "PET_SPOTLIGHT_VIDEO_INFO_URL", default_value = DEFAULT_VIDEO_INFO_URL)]
    pub video_info_url: String,

    /// Never request more listing pages than this
    #[arg(long, global = true, env = "PET_SPOTLIGHT_MAX_PAGES", default_value_t = 100)]
    pub max_pages: usize,

    /// Listing and dog pages fetched at once
    #[arg(long, global = true, env = "PET_SPOTLIGHT_PAGE_CONCURRENCY", default_value_t = 10)]
    pub page_concurrency: usize,

    /// Photos/videos downloaded at once, per dog
    #[arg(long, global = true, env = "PET_SPOTLIGHT_DOWNLOAD_CONCURRENCY", default_value_t = 5)]
    pub download_concurrency: usize,

    /// Seconds a request may go without progress (connect, whole page,
    /// gap between media chunks), 0 waits forever
    #[arg(long, global = true, env = "PET_SPOTLIGHT_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl SiteArgs {
    pub fn to_config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            organization_path: self.organization_path.clone(),
            video_info_url: self.video_info_url.clone(),
            max_pages: self.max_pages,
            page_concurrency: self.page_concurrency,
            download_concurrency: self.download_concurrency,
            request_timeout: (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs)),
            ..Config::default()
        }
    }
}
