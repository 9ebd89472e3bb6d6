use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing_subscriber::EnvFilter;
use tui::{backend::CrosstermBackend, Terminal};

use client_registry::api;
use client_registry::cep::ViaCepClient;
use client_registry::config::{self, Config};
use client_registry::db::{self, ClientRepository, MemoryRepository};
use client_registry::service::ClientService;
use client_registry::store::HttpRegistryApi;
use client_registry::ui::{run_app, App};

#[derive(Parser)]
#[command(name = "client-registry", version, about = "Client registry with CEP address lookup")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the REST API
    Serve {
        /// Address to listen on (overrides BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run the terminal registry UI against a running API
    Tui {
        /// Base URL of the API (overrides API_BASE_URL)
        #[arg(long)]
        api_url: Option<String>,
    },
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "client_registry=info,tower_http=info".into())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    match cli.command {
        Command::Serve { bind } => serve(config, bind).await,
        Command::Tui { api_url } => tui(config, api_url).await,
    }
}

async fn serve(config: Config, bind: Option<String>) -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let repo: Arc<dyn ClientRepository> = match config.database_url() {
        Some(url) => {
            let db = db::init(url).await.context("connecting to Postgres")?;
            tracing::info!("database connection established");
            Arc::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, clients are kept in memory only");
            Arc::new(MemoryRepository::new())
        }
    };

    let bind_addr = bind.unwrap_or(config.bind_addr);
    api::serve(ClientService::new(repo), &bind_addr).await
}

async fn tui(config: Config, api_url: Option<String>) -> Result<()> {
    // Logs go to a file; stdout belongs to the terminal UI
    let log_file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let api_url = api_url.unwrap_or(config.api_base_url);
    tracing::info!(%api_url, "starting registry UI");
    let mut app = App::new(
        HttpRegistryApi::new(api_url),
        ViaCepClient::new(config.cep_base_url),
    );

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = &result {
        tracing::error!(error = %err, "registry UI stopped");
        eprintln!("Error: {}", err);
    }

    result
}
