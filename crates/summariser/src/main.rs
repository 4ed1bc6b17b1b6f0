use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use summariser_common::{api_key_from_env, logger, AppConfig};
use summariser_llm::{GeminiClient, LlmClient};

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "summariser")]
#[command(about = "Summariser - text summarisation and key-point extraction API", long_about = None)]
struct Cli {
    /// Configuration file (TOML); defaults to ./summariser.toml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,

        /// Model name override
        #[arg(long)]
        model: Option<String>,
    },

    /// Print the effective configuration and exit
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_dotenv_from_project_root();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Some(Commands::CheckConfig) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        Some(Commands::Serve { host, port, model }) => {
            // CLI arguments win over file and environment
            if let Some(host) = host {
                config.server_host = host;
            }
            if let Some(port) = port {
                config.server_port = port;
            }
            if let Some(model) = model {
                config.generation.model_name = model;
            }
            config.validate()?;
        }
        None => {}
    }

    match &config.log_dir {
        Some(dir) => logger::setup_logging(dir, &config.log_level)?,
        None => logger::setup_console_logging(&config.log_level)?,
    }

    tracing::info!("Summariser starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Bind: {}", config.server_bind_address());
    tracing::info!("  Model: {}", config.generation.model_name);
    tracing::info!(
        "  Text length: {}..={} chars",
        config.min_text_length,
        config.max_text_length
    );

    // a missing credential is fatal, never serve degraded traffic
    let api_key = api_key_from_env().map_err(|e| {
        tracing::error!("{}", e);
        e
    })?;

    let client: Arc<dyn LlmClient> = Arc::new(
        GeminiClient::new(&config.api_base_url, api_key, config.request_timeout())
            .context("Failed to initialize Gemini client")?,
    );

    println!("Server listening on http://{}", config.server_bind_address());

    summariser_server::start_server(config, client).await?;

    Ok(())
}
