//! News Agent - single-run entry point.
//!
//! Builds the agent, asks it once for today's Japanese news summary, and exits.

use news_agent::agent::{build_news_task, create_agent};
use news_agent::config::Config;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "news_agent=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={} workspace={}",
        config.default_model,
        config.workspace_path.display()
    );

    let agent = create_agent(&config)?;
    let task = build_news_task(&chrono::Local::now());

    let outcome = agent.run_task_with_timeout(&task, config.run_timeout).await?;

    info!(
        "Agent completed in {} iterations with {} tool calls",
        outcome.iterations,
        outcome.steps.len()
    );
    println!("{}", outcome.output);

    Ok(())
}
