// Copyforge - marketing copy proxy
// Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use copyforge::client::CopyClient;
use copyforge::config::load_config;
use copyforge::fallback::FallbackOrchestrator;
use copyforge::logging::init_tracing;
use copyforge::server::CopyServer;

#[derive(Parser, Debug)]
#[command(name = "copyforge", version, about = "Marketing copy proxy with model fallback")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Bind address, overrides config and COPYFORGE_BIND
        #[arg(long)]
        bind: Option<String>,

        /// Config file (default: ~/.copyforge/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Ask a running server for copy about TOPIC
    Generate {
        topic: String,

        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve {
        bind: None,
        config: None,
        debug: false,
    }) {
        Command::Serve {
            bind,
            config,
            debug,
        } => serve(bind, config, debug).await,
        Command::Generate { topic, server } => generate(&topic, &server).await,
    }
}

async fn serve(bind: Option<String>, config_path: Option<PathBuf>, debug: bool) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }
    if debug {
        config.features.debug_logging = true;
    }

    init_tracing(config.features.debug_logging);

    let orchestrator = FallbackOrchestrator::from_config(&config)?;
    if !orchestrator.has_primary() && !orchestrator.has_secondary() {
        tracing::warn!("No API keys configured; every request will get templated copy");
    }

    CopyServer::new(orchestrator, config.server).serve().await
}

async fn generate(topic: &str, server: &str) -> Result<()> {
    init_tracing(false);

    let copy = CopyClient::new(server)?.generate(topic).await?;

    println!("{}\n", copy.result);
    match (copy.is_fallback, copy.fallback_reason.as_deref()) {
        (true, Some(reason)) => eprintln!("model: {} (fallback: {})", copy.model_used, reason),
        (true, None) => eprintln!("model: {} (fallback)", copy.model_used),
        (false, _) => eprintln!("model: {}", copy.model_used),
    }
    if let Some(usage) = copy.token_stats {
        eprintln!(
            "tokens: {} prompt + {} completion = {}",
            usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
        );
    }

    Ok(())
}
