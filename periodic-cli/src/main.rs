use anyhow::{Result, anyhow};
use clap::Parser;
use periodic_cli::agent::AGENT_NAME;
use periodic_cli::{ChatSession, Cli, Commands, ModelConfig, build_agent, run_console, run_lookup};
use periodic_telemetry::{TelemetryConfig, level_for_verbosity};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let telemetry = TelemetryConfig::new("periodic-agent")
        .with_format(cli.log_format.into())
        .with_default_level(level_for_verbosity(cli.verbose));
    periodic_telemetry::init(&telemetry).map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    match cli.command() {
        Commands::Lookup { symbol, show_context } => {
            println!("{}", run_lookup(&symbol, &cli.user_id, show_context).await?);
        }
        Commands::Ask { question } => {
            let (chat, _) = start_chat(&cli).await?;
            println!("{}", chat.send(&question).await?);
        }
        Commands::Chat => {
            let (chat, model_name) = start_chat(&cli).await?;
            run_console(&chat, AGENT_NAME, &model_name).await?;
        }
    }

    Ok(())
}

async fn start_chat(cli: &Cli) -> Result<(ChatSession, String)> {
    let config = ModelConfig::from_env(cli.provider, cli.model.clone())?;
    let model_name = config.model_name().to_string();
    tracing::info!(provider = ?cli.provider, model = %model_name, "using model");

    let agent = build_agent(config.build()?)?;
    let chat = ChatSession::start(Arc::new(agent), &cli.user_id).await?;
    Ok((chat, model_name))
}
