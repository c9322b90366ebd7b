use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate the captions of a video and upload one track per language
    Captions {
        /// Video identifier in the catalog
        #[arg(short, long)]
        video: String,

        /// Language of the source caption track
        #[arg(short, long)]
        source: String,

        /// Target languages (comma-separated, or "all")
        #[arg(short, long, default_value = "all")]
        target_langs: String,
    },

    /// Translate title and description of a video
    Metadata {
        /// Video identifier in the catalog
        #[arg(short, long)]
        video: String,

        /// Target languages (comma-separated, or "all")
        #[arg(short, long, default_value = "all")]
        target_langs: String,
    },

    /// Translate metadata and captions of a video in one go
    Process {
        /// Video identifier in the catalog
        #[arg(short, long)]
        video: String,

        /// Target languages (comma-separated, or "all")
        #[arg(short, long, default_value = "all")]
        target_langs: String,
    },

    /// List target languages supported by the translation backend
    Languages,

    /// Show character usage of the configured API key
    Usage,

    /// Write the default configuration to a file
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "cctrans.toml")]
        output: PathBuf,
    },
}
