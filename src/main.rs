use anyhow::Context;
use clap::Parser;
use price_scout::utils::logger;
use price_scout::{
    AppConfig, CliArgs, JsonlOfferStore, Orchestrator, OrchestratorSettings, ProxyPool, SearchTask,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting price-scout");

    let config = AppConfig::from_file(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config))?;

    let strategies = price_scout::shops::build_strategies(config.shops.clone());
    if strategies.is_empty() {
        anyhow::bail!("no active shop strategies configured");
    }
    tracing::info!(count = strategies.len(), "initialized shop strategies");

    let settings = OrchestratorSettings {
        fetch_policy: config.fetch_policy(),
        task_delay: config.task_delay(),
    };
    let orchestrator = Orchestrator::new(
        strategies,
        ProxyPool::new(config.proxies.clone()),
        JsonlOfferStore::new(config.output_path()),
        settings,
    );

    let tasks: Vec<SearchTask> = if args.terms.is_empty() {
        config.tasks()
    } else {
        vec![SearchTask {
            id: "adhoc".to_string(),
            search_terms: args.terms.clone(),
        }]
    };
    if tasks.is_empty() {
        anyhow::bail!("no tasks configured and no --terms given");
    }

    let recorded = orchestrator.run_batch(&tasks).await;
    tracing::info!(tasks = tasks.len(), recorded, "scrape batch finished");
    println!(
        "Recorded best offers for {}/{} tasks (history: {})",
        recorded,
        tasks.len(),
        config.output_path()
    );

    Ok(())
}
