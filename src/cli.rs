use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "podcast-feedgen")]
#[command(about = "Build a podcast RSS feed from per-episode metadata files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the feed file
    Build {
        /// Directory containing episode .json files
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Where to write the feed
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base URL the media files are served from
        #[arg(long)]
        base_url: Option<String>,
    },

    /// List episodes as they would appear in the feed
    List {
        /// Directory containing episode .json files
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Show or update configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Show config file path
    Path,
    /// Set a configuration value
    Set {
        /// Config key (e.g. title, base_url, input_dir, output_path)
        key: String,
        /// Value to set
        value: String,
    },
}
