//! # Dashboard Report
//!
//! Offline counterpart of the `/dashboard` endpoint. Pulls every collection once, runs the same
//! aggregations and prints the result, which is handy for cron jobs and for checking numbers by hand.
//!
//! ## Steps
//! 1. Load the server configuration, `--database` overrides the database name.
//!
//! 2. Connect to MongoDB and fetch each collection in turn, one progress tick per collection.
//!
//! 3. Build the dashboard with the requested filters.
//!
//! 4. Render as pretty JSON or as a plain text summary.
//!
//! ## Notes
//! - No cache, every run reads the store.
//! - Progress goes to stderr so stdout stays clean for piping the JSON.
use anyhow::{Context, Result};
use clap::ValueEnum;
use dashboard::{config::Config, database::init_mongo, filters::OrderFilter, report::build_dashboard};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;
use warehouse::{Collection, Tables, source::load_collection};

pub mod utils;

use utils::render_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Text,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub filter: OrderFilter,
    pub top: usize,
    pub format: Format,
    pub database: Option<String>,
}

pub async fn generate_report(report: Report) -> Result<String> {
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(database) = report.database {
        config.database = database;
    }

    let source = init_mongo(&config.mongodb_uri, &config.database)
        .await
        .context("Failed to connect to MongoDB")?;

    let pb = ProgressBar::with_draw_target(
        Some(Collection::ALL.len() as u64),
        ProgressDrawTarget::stderr(),
    );
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut tables = Tables::new();
    for collection in Collection::ALL {
        pb.set_message(format!("Fetching {collection}"));

        let documents = load_collection(&source, collection)
            .await
            .with_context(|| format!("Failed to load {collection}"))?;
        tables.insert(collection, documents);

        pb.inc(1);
    }
    pb.finish_with_message("Done");

    for (collection, count) in tables.counts() {
        info!("Loaded {count} documents from {collection}");
    }

    let dashboard = build_dashboard(&tables, &report.filter, report.top);

    Ok(match report.format {
        Format::Json => serde_json::to_string_pretty(&dashboard)?,
        Format::Text => render_text(&dashboard),
    })
}
