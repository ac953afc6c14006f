use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_CONFIG_FILENAME;

#[derive(Debug, Parser)]
#[command(name = "portal-notifier")]
#[command(version, about = "Notify new grades, cancelled lessons and announcements from a school portal", long_about = None)]
pub struct Cli {
    /// Path to the RON configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILENAME)]
    pub config: PathBuf,
}
