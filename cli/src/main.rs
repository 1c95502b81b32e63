//! CLI entrypoint for tabletalk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Result, bail};
use clap::Parser;
use std::sync::Arc;
use tabletalk_application::{ConversationController, ConversationLogger, SendOutcome, StartOutcome};
use tabletalk_infrastructure::{ConfigLoader, HttpBackendGateway, JsonlTranscriptLogger, ProxyClient};
use tabletalk_presentation::{ChatRepl, Cli, MessageRenderer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.plain {
        colored::control::set_override(false);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    let base_url = cli
        .backend_url
        .clone()
        .unwrap_or_else(|| config.backend.base_url.clone());

    info!("Using backend at {}", base_url);

    // === Dependency Injection ===
    let gateway = Arc::new(HttpBackendGateway::new(ProxyClient::new(base_url)));
    let mut controller = ConversationController::new(gateway);

    let transcript_path = cli
        .transcript
        .clone()
        .or_else(|| config.log.transcript_file.clone());
    if let Some(path) = transcript_path
        && let Some(logger) = JsonlTranscriptLogger::new(&path)
    {
        info!("Writing conversation transcript to {}", path.display());
        let logger: Arc<dyn ConversationLogger> = Arc::new(logger);
        controller = controller.with_conversation_logger(logger);
    }

    // One-shot mode: start, send, print, exit.
    if let Some(question) = cli.question {
        return run_one_shot(controller, &question).await;
    }

    // Chat mode
    let mut repl = ChatRepl::new(controller)
        .with_progress(!cli.quiet)
        .with_history(config.repl.history);
    repl.run().await?;

    Ok(())
}

async fn run_one_shot(controller: ConversationController, question: &str) -> Result<()> {
    if controller.start_conversation().await != StartOutcome::Started {
        bail!("Could not start a conversation with the backend");
    }
    let opening = controller.snapshot().conversation.len();

    match controller.send_message(question).await {
        SendOutcome::Delivered => {}
        SendOutcome::Failed => bail!("The backend did not answer"),
        SendOutcome::BlankDraft => bail!("Question is blank"),
        SendOutcome::NoSession | SendOutcome::Busy => {
            bail!("Conversation is not ready to accept a message")
        }
    }

    // Print the exchange: the user's turn and everything the server added.
    for message in &controller.snapshot().conversation[opening..] {
        println!("{}", MessageRenderer::render(message));
    }

    Ok(())
}
