use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use discount_finder::{
    utils::logging,
    web::{self, AppState},
    AppConfig, DealPipeline, DealService, ResultCache, StoreCatalog, StoreId,
};

#[derive(Parser)]
#[command(name = "discount-finder", version, about = "Collects and ranks discounted menswear and electronics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the deal list over HTTP (default)
    Serve,
    /// Run one batch and print the best deals as JSON
    Scrape {
        /// Comma-separated stores to scrape instead of the configured ones
        #[arg(long, value_delimiter = ',')]
        stores: Vec<StoreId>,
        /// How many records to print
        #[arg(long, default_value_t = 20)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let _log_guard = logging::init(&config.logging)?;

    let pipeline = DealPipeline::from_config(&config.scraper, StoreCatalog::builtin())
        .context("Failed to set up the scrape pipeline")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, pipeline).await,
        Command::Scrape { stores, top } => scrape_once(pipeline, &stores, top).await,
    }
}

async fn serve(config: AppConfig, pipeline: DealPipeline) -> Result<()> {
    let metrics = if config.metrics.enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    let service = DealService::new(
        Arc::new(pipeline),
        ResultCache::new(Duration::from_secs(config.cache.ttl_seconds)),
    );
    let app = web::create_router(AppState {
        service: Arc::new(service),
        metrics,
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Starting discount-finder on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

async fn scrape_once(pipeline: DealPipeline, stores: &[StoreId], top: usize) -> Result<()> {
    let records = if stores.is_empty() {
        pipeline.run().await
    } else {
        pipeline.run_for(stores).await
    };

    info!("Found {} discounted items, showing {}", records.len(), top.min(records.len()));
    let best: Vec<_> = records.into_iter().take(top).collect();
    println!("{}", serde_json::to_string_pretty(&best)?);
    Ok(())
}

fn install_metrics() -> Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
