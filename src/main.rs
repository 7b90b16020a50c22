use clap::Parser;
use listing_matcher::config::{AppConfig, Cli};
use listing_matcher::sink::{DiagnosticsSink, JsonLinesSink, JsonReportFile, ResultSink};
use listing_matcher::source::{JsonLinesFile, ListingSource, ProductSource};
use listing_matcher::{CatalogIndex, MatchingEngine};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging, `RUST_LOG` overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::from_cli(Cli::parse()) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Run failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the catalog, matches every listing and writes the results.
/// The catalog is complete before the first listing is looked at.
async fn run(config: &AppConfig) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("Loading products from {}", config.products.display());
    let records = JsonLinesFile::new(&config.products).products().await?;
    let catalog = Arc::new(CatalogIndex::build(records)?);

    info!("Loading listings from {}", config.listings.display());
    let listings = JsonLinesFile::new(&config.listings).listings().await?;

    let engine = MatchingEngine::new(catalog).keep_unmatched(config.debug_report.is_some());
    let run = engine.run_parallel(listings, config.workers).await?;
    info!(
        "Matched {} of {} listings to {} products",
        run.report.matched,
        run.report.total(),
        run.results.len()
    );

    JsonLinesSink::new(&config.output)
        .write_results(&run.results)
        .await?;

    if config.debug {
        for line in run.report.summary() {
            println!("{}", line);
        }
    }
    if let Some(path) = &config.debug_report {
        JsonReportFile::new(path).write_report(&run.report).await?;
    }
    Ok(())
}
