//! CLI definitions: argument parsing, subcommands, and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;

use crate::core::api::ItineraryId;
use crate::core::config::Overrides;
use crate::view::DEFAULT_WIDTH;

pub use clap_complete::generate;

const AFTER_HELP: &str = "\
EXAMPLES:
  travel-companion                          Load the whole page and print it
  travel-companion page --open              Write an HTML snapshot and open it in a browser
  travel-companion page --html page.html    Write an HTML snapshot to a file
  travel-companion show 3                   Show itinerary 3 and its map markers
  travel-companion send \"/add Lisbon\"       Send a chat message
  echo \"hello\" | travel-companion send -    Read the message from stdin
  travel-companion format notes.md          Format travel markdown to HTML offline
  travel-companion --base-url http://localhost:8000 itineraries
";

/// Command-line arguments for the application.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "Terminal companion for the travel planner backend",
    after_help = AFTER_HELP
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL (overrides settings file and TRAVEL_COMPANION_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// CSRF token for the chat POST (overrides the token the backend hands out)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub csrf_token: Option<String>,

    /// Wrap terminal output to this many columns
    #[arg(long, global = true, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load every panel (default command)
    Page {
        /// Write the page as an HTML document to this path
        #[arg(long, value_name = "PATH")]
        html: Option<PathBuf>,
        /// Write the HTML snapshot to the cache directory and open it
        #[arg(long)]
        open: bool,
    },
    /// List itineraries (the first one is loaded as well)
    Itineraries,
    /// Show one itinerary with its places and map
    Show { id: ItineraryId },
    /// Show map markers, for one itinerary or the default set
    Map { id: Option<ItineraryId> },
    /// Show the chat history
    History,
    /// Send a chat message ('-' reads it from stdin)
    Send { message: String },
    /// Check whether the search API keys are configured
    Keys,
    /// Format travel markdown to HTML without contacting the backend
    Format {
        /// Input file, or '-' for stdin
        #[arg(default_value = "-")]
        input: String,
    },
    /// Show the effective configuration and its paths
    Config,
    /// Generate shell completion script
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        #[arg(value_parser = clap::value_parser!(Shell))]
        shell: Shell,
    },
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            base_url: self.base_url.clone(),
            csrf_token: self.csrf_token.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("travel-companion").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn log_level_from_flags() {
        assert_eq!(parse(&[]).log_level(), "warn");
        assert_eq!(parse(&["-v"]).log_level(), "info");
        assert_eq!(parse(&["-vv"]).log_level(), "debug");
        assert_eq!(parse(&["-q", "-vv"]).log_level(), "error");
    }

    #[test]
    fn global_flags_after_subcommand() {
        let args = parse(&["show", "4", "--base-url", "http://h:1", "--width", "60"]);
        assert!(matches!(args.command, Some(Commands::Show { id: 4 })));
        assert_eq!(args.overrides().base_url.as_deref(), Some("http://h:1"));
        assert_eq!(args.width, 60);
    }

    #[test]
    fn map_id_is_optional() {
        assert!(matches!(parse(&["map"]).command, Some(Commands::Map { id: None })));
        assert!(matches!(
            parse(&["map", "2"]).command,
            Some(Commands::Map { id: Some(2) })
        ));
    }

    #[test]
    fn format_defaults_to_stdin() {
        match parse(&["format"]).command {
            Some(Commands::Format { input }) => assert_eq!(input, "-"),
            _ => panic!("expected format command"),
        }
    }
}
