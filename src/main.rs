use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use shelf::app::{App, AppEvent};
use shelf::catalog::CatalogClient;
use shelf::config::Config;
use shelf::feed::{Category, FilterSignature};

#[derive(Parser, Debug)]
#[command(name = "shelf", about = "Terminal book explorer for the Open Library catalog")]
struct Args {
    /// Category to start in (all, fiction, history, science, fantasy)
    #[arg(long, value_name = "SLUG")]
    category: Option<Category>,

    /// Title search to start with
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    /// Config file (default: ~/.config/shelf/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print books to stdout instead of starting the UI
    #[arg(long)]
    print: bool,

    /// Pages to print with --print
    #[arg(long, default_value_t = 1, value_name = "N")]
    pages: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stderr keeps the alternate screen clean; silent unless RUST_LOG is set
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            tracing::debug!("HOME not set, using default config");
            Config::default()
        }
    };

    let client = CatalogClient::new(&config.catalog_base_url, config.request_timeout())
        .context("Failed to create catalog client")?;

    let category = match args.category {
        Some(c) => c,
        None => config.default_category()?,
    };
    let search = args.search.unwrap_or_default();

    if args.print {
        let signature = FilterSignature::new(category, &search);
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let count = shelf::headless::print_pages(&client, signature, args.pages, &mut out).await?;
        tracing::info!(count, "Printed books");
        return Ok(());
    }

    let mut app = App::new(client, &config).context("Failed to create application")?;
    app.category = category;
    app.search_term = search;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    shelf::ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
