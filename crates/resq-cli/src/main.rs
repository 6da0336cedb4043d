//! ResQ360 CLI - emergency numbers and legal rights from the terminal.
//!
//! Reads are answered from the local cache, or from the bundled dataset when
//! nothing is cached, so every command works without a network connection.

mod app;
mod cli;
mod output;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use resq_core::{Config, QueryResult, Record};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::App;
use cli::{category_filter, Cli, Collection, Commands};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    let cli = Cli::parse();

    let config = Config::load()?;
    let app = App::new(config, cli.ephemeral, cli.offline)?;

    run(&app, &cli).await
}

/// Keep only records in `category`, when one is given
fn filter_category<R: Record>(mut result: QueryResult<R>, category: Option<&str>) -> QueryResult<R> {
    if let Some(category) = category {
        result.records.retain(|r| r.category() == category);
    }
    result
}

async fn run(app: &App, cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Numbers { category, search } => {
            let session = app.start(None).await;
            let category = category_filter(category.as_deref());
            let result = match (search.as_deref(), category) {
                (Some(query), category) => {
                    filter_category(app.numbers.search_with_origin(query).await, category)
                }
                (None, Some(category)) => app.numbers.get_by_category_with_origin(category).await,
                (None, None) => app.numbers.get_all_with_origin().await,
            };
            output::print_records(cli.json, session.is_online(), &result, output::number_row)?;
            session.finish().await;
        }
        Commands::Legal {
            category,
            search,
            details,
        } => {
            let session = app.start(None).await;
            let category = category_filter(category.as_deref());
            let result = match (search.as_deref(), category) {
                (Some(query), category) => {
                    filter_category(app.legal.search_with_origin(query).await, category)
                }
                (None, Some(category)) => app.legal.get_by_category_with_origin(category).await,
                (None, None) => app.legal.get_all_with_origin().await,
            };
            let row = if *details {
                output::legal_detail
            } else {
                output::legal_row
            };
            output::print_records(cli.json, session.is_online(), &result, row)?;
            session.finish().await;
        }
        Commands::Categories { collection } => {
            let categories = match collection {
                Collection::Numbers => app.numbers.categories().await,
                Collection::Legal => app.legal.categories().await,
            };
            output::print_lines(cli.json, &categories)?;
        }
        Commands::Sync => {
            if app.offline_mode {
                println!("Offline mode is on; not syncing.");
                return Ok(());
            }
            let outcomes = app.sync_now().await;
            output::print_outcomes(cli.json, &outcomes)?;
        }
        Commands::Status => {
            let probe = if app.offline_mode {
                None
            } else {
                Some(app.probe().await)
            };
            let ages = app.cache.cache_ages().await;
            output::print_status(cli.json, probe.as_ref(), &ages)?;
        }
        Commands::Clear => {
            app.cache.clear_all().await?;
            println!("Cache cleared.");
        }
        Commands::Watch { interval } => {
            let (tx, mut rx) = mpsc::channel(resq_core::sync::REPORT_BUFFER_SIZE);
            let session = app.start(Some(tx)).await;
            let quality = session
                .probe
                .as_ref()
                .map(|p| format!(", {}", p.quality))
                .unwrap_or_default();
            println!(
                "Watching connectivity every {}s (currently {}{}). Ctrl+C to stop.",
                interval,
                session.observer.current().label(),
                quality
            );

            let json = cli.json;
            let printer = tokio::spawn(async move {
                while let Some(report) = rx.recv().await {
                    info!(reason = ?report.reason, "Sync round finished");
                    let _ = output::print_outcomes(json, &report.outcomes);
                }
            });

            app.watch(&session, Duration::from_secs((*interval).max(1))).await;
            session.finish().await;
            let _ = printer.await;
        }
    }
    Ok(())
}
