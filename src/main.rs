//! # Travel Companion
//!
//! Terminal client for the travel planner backend: lists and shows
//! itineraries with their map markers, talks to the planning chat, and
//! renders the whole page as text or as an HTML snapshot.
//!
//! ## Features
//! - Markdown-subset formatting of itinerary content (`format` works offline)
//! - Superseding panel loads so a stale response never overwrites a newer one
//! - Configuration from settings file, environment, and flags

mod cli;
mod core;
mod run;
mod view;

use clap::Parser;
use dotenv::dotenv;

use crate::cli::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let args = Args::parse();
    run::init_logger(&args);

    run::dispatch(args).await
}
