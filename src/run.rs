//! Command dispatch: logger init, offline commands, and the backend-driven ones.

use std::error::Error;
use std::io::{self, Read};
use std::path::Path;

use clap::CommandFactory;

use crate::cli::{self, Args, Commands};
use crate::core::api::{ApiError, HttpBackend, ItineraryId};
use crate::core::config::{self, Config};
use crate::core::sync::SyncController;
use crate::core::{app, formatter, paths};
use crate::view::{html, text};

type CmdResult = Result<(), Box<dyn Error>>;

/// Initialize env_logger on stderr so logs never mix with page output.
pub fn init_logger(args: &Args) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .target(env_logger::Target::Stderr)
    .try_init();
}

/// Run the selected command. Configuration errors are printed and exit 1.
pub async fn dispatch(args: Args) -> CmdResult {
    match &args.command {
        Some(Commands::Format { input }) => return run_format(input),
        Some(Commands::Completions { shell }) => {
            cli::generate(*shell, &mut Args::command(), app::NAME, &mut io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let config = config::load(&args.overrides()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    log::info!("Backend: {}", config.base_url);

    let width = args.width;
    match &args.command {
        None => run_page(&config, width, None, false).await,
        Some(Commands::Page { html, open }) => {
            run_page(&config, width, html.as_deref(), *open).await
        }
        Some(Commands::Itineraries) => run_itineraries(&config).await,
        Some(Commands::Show { id }) => run_show(&config, width, *id).await,
        Some(Commands::Map { id }) => run_map(&config, *id).await,
        Some(Commands::History) => run_history(&config, width).await,
        Some(Commands::Send { message }) => run_send(&config, width, message).await,
        Some(Commands::Keys) => run_keys(&config).await,
        Some(Commands::Config) => {
            run_config(&config);
            Ok(())
        }
        Some(Commands::Format { .. }) | Some(Commands::Completions { .. }) => Ok(()),
    }
}

/// `-` means stdin.
fn read_input(arg: &str) -> io::Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(arg)
    }
}

fn run_format(input: &str) -> CmdResult {
    let content = read_input(input)?;
    println!("{}", formatter::format(content.trim_end_matches('\n')));
    Ok(())
}

/// Build the controller. Priming loads the backend home page for its CSRF token.
async fn connect(config: &Config, prime: bool) -> Result<SyncController<HttpBackend>, ApiError> {
    let mut backend = HttpBackend::new(&config.base_url, config.csrf_token.clone())?;
    if prime {
        backend.prime_csrf().await;
    }
    Ok(SyncController::new(backend))
}

fn write_snapshot(path: &Path, document: &str) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)
}

async fn run_page(config: &Config, width: usize, html_path: Option<&Path>, open: bool) -> CmdResult {
    let controller = connect(config, false).await?;
    controller.load_page().await;
    let page = controller.page();

    if html_path.is_none() && !open {
        print!("{}", text::page(&page, width));
        return Ok(());
    }
    let document = html::page_document(&page);
    if let Some(path) = html_path {
        write_snapshot(path, &document)?;
        println!("Wrote {}", path.display());
    }
    if open {
        let path = paths::snapshot_path().ok_or("no cache directory available")?;
        write_snapshot(&path, &document)?;
        log::info!("Opening {}", path.display());
        opener::open(&path)?;
    }
    Ok(())
}

async fn run_itineraries(config: &Config) -> CmdResult {
    let controller = connect(config, false).await?;
    controller.list_itineraries().await;
    print!("{}", text::itinerary_list(&controller.page().itineraries));
    Ok(())
}

async fn run_show(config: &Config, width: usize, id: ItineraryId) -> CmdResult {
    let controller = connect(config, false).await?;
    controller.load_itinerary(id).await;
    let page = controller.page();
    print!("{}", text::itinerary(&page.itinerary, width));
    println!();
    print!("{}", text::map(&page.map));
    Ok(())
}

async fn run_map(config: &Config, id: Option<ItineraryId>) -> CmdResult {
    let controller = connect(config, false).await?;
    controller.load_map_data(id).await;
    print!("{}", text::map(&controller.page().map));
    Ok(())
}

async fn run_history(config: &Config, width: usize) -> CmdResult {
    let controller = connect(config, false).await?;
    controller.load_chat_history().await;
    print!("{}", text::chat(&controller.page().chat, width));
    Ok(())
}

async fn run_send(config: &Config, width: usize, message: &str) -> CmdResult {
    let message = read_input(message)?;
    if message.trim().is_empty() {
        log::warn!("Empty message, nothing sent");
        return Ok(());
    }
    let controller = connect(config, true).await?;
    controller.set_draft(&message);
    controller.submit_draft().await;

    let page = controller.page();
    print!("{}", text::chat(&page.chat, width));
    if page.current_itinerary_id.is_some() {
        println!();
        print!("{}", text::itinerary_list(&page.itineraries));
        println!();
        print!("{}", text::itinerary(&page.itinerary, width));
    }
    Ok(())
}

async fn run_keys(config: &Config) -> CmdResult {
    let controller = connect(config, false).await?;
    controller.check_api_keys().await;
    match text::api_warning(&controller.page()) {
        Some(warning) => println!("{}", warning),
        None => println!("Search API keys are configured."),
    }
    Ok(())
}

/// Print the effective configuration and where it came from.
fn run_config(config: &Config) {
    let show = |p: Option<std::path::PathBuf>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    println!("Backend:    {}", config.base_url);
    println!(
        "CSRF token: {}",
        if config.csrf_token.is_some() { "set" } else { "from backend" }
    );
    println!("Settings:   {}", show(config.settings_path.clone()));
    println!("Snapshot:   {}", show(paths::snapshot_path()));
}
