use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "airstore")]
#[command(about = "Digitize photographed ledger pages into AirStore", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print request targets and record identifiers
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload a ledger photo, review the extraction, and confirm it
    Upload {
        /// Path to the ledger image (JPEG or PNG)
        #[arg(required = true)]
        image: PathBuf,

        /// Skip the interactive review and confirm as extracted
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or edit the client configuration
    Config {
        /// Set the backend base URL
        #[arg(long)]
        set_api_url: Option<String>,

        /// Show the current configuration
        #[arg(long)]
        show: bool,
    },
}
