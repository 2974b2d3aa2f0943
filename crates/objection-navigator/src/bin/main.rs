//! Objection Navigator entry point
//!
//! Serves the rebuttal endpoint, or runs the same pipeline once from the
//! command line.

use clap::{Parser, Subcommand};
use objection_navigator::client::OpenAiCompletionClient;
use objection_navigator::engine::build_prompt;
use objection_navigator::server::{build_app, shutdown_signal};
use objection_navigator::{AppState, ObjectionRequest, RebuttalEngine, ServiceConfig, AGENT_ID, AGENT_VERSION};
use objection_secrets::{Secret, SecretProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "objection-navigator")]
#[command(about = "Objection Navigator - ADA+C rebuttals for sales objections")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "OBJECTION_NAVIGATOR_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate one rebuttal and print it as JSON
    Generate {
        #[command(flatten)]
        objection: ObjectionArgs,

        /// Completion API key; resolved from the credential chain when omitted
        #[arg(long)]
        api_key: Option<String>,

        /// Print the fallback rebuttal without calling the completion service
        #[arg(long)]
        offline: bool,
    },

    /// Print the prompt that would be sent for an objection
    Prompt {
        #[command(flatten)]
        objection: ObjectionArgs,
    },
}

#[derive(clap::Args)]
struct ObjectionArgs {
    /// What the prospect said
    #[arg(short, long)]
    objection: String,

    /// Objection category
    #[arg(short, long)]
    category: Option<String>,

    /// Extra context for the coach
    #[arg(short, long)]
    notes: Option<String>,

    /// Industry the seller works in
    #[arg(short, long)]
    industry: Option<String>,
}

impl ObjectionArgs {
    fn into_request(self) -> anyhow::Result<ObjectionRequest> {
        let body = serde_json::json!({
            "objection": self.objection,
            "category": self.category,
            "notes": self.notes,
            "industry": self.industry,
        });
        Ok(ObjectionRequest::from_value(&body)?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };

    match cli.command {
        Commands::Serve { port, host } => {
            // Initialize tracing
            tracing_subscriber::registry()
                .with(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
                ))
                .with(tracing_subscriber::fmt::layer().json())
                .init();

            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }

            let addr = config.socket_addr()?;
            let state = AppState::from_config(config)?;
            let app = build_app(state);

            tracing::info!("Starting Objection Navigator on {}", addr);
            tracing::info!("Agent ID: {}, Version: {}", AGENT_ID, AGENT_VERSION);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }

        Commands::Generate {
            objection,
            api_key,
            offline,
        } => {
            init_cli_logging();

            let request = objection.into_request()?;
            let client = OpenAiCompletionClient::new(config.completion.clone())?;
            let engine = RebuttalEngine::new(Arc::new(client));

            let rebuttal = if offline {
                engine.offline(&request)
            } else {
                let api_key = match api_key {
                    Some(key) => Secret::new(key, "cli"),
                    None => config
                        .credential_chain()
                        .get(&config.api_key_secret)
                        .await
                        .map_err(|e| anyhow::anyhow!("{} not available: {}", config.api_key_secret, e))?,
                };
                engine.generate(&request, api_key.expose()).await
            };

            if rebuttal.source.is_fallback() {
                tracing::warn!(source = ?rebuttal.source, "Printed rebuttal is fallback content");
            }

            println!("{}", serde_json::to_string_pretty(&rebuttal.result)?);
        }

        Commands::Prompt { objection } => {
            init_cli_logging();

            let request = objection.into_request()?;
            println!(
                "{}",
                build_prompt(
                    &request.objection,
                    request.category.as_deref(),
                    request.notes.as_deref(),
                    &request.industry,
                )
            );
        }
    }

    Ok(())
}

fn init_cli_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
