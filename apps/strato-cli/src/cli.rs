//! # Command-line Flags
//!
//! Flags override the config file and the environment.

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "strato",
    version,
    about = "Browse Stratocore Services and build a cart with rule-based pricing"
)]
pub struct Cli {
    /// Base URL serving services.json, pricerules.json, user.json, orders.json
    #[arg(long, value_name = "URL", conflicts_with = "data_dir")]
    pub data_url: Option<String>,

    /// Local directory holding the JSON datasets
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run these session commands instead of reading stdin (repeatable)
    #[arg(short = 'e', long = "exec", value_name = "COMMAND")]
    pub exec: Vec<String>,

    /// Debug logging for the strato crates
    #[arg(short, long)]
    pub verbose: bool,
}
