//! # strato
//!
//! Entry point for the Stratocore Services session.
//!
//! ```text
//! strato --data-dir ./data
//! strato --data-url https://example.com/data -e "category 1" -e "add 10 3" -e cart
//! ```

use clap::Parser;

use strato_cli::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    strato_cli::run(Cli::parse()).await
}
