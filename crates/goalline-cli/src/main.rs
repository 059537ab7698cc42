//! `goalline` — league tables, head-to-head records, streaks and form from a
//! file of raw match documents.
//!
//! # Usage
//!
//! ```text
//! goalline --data matches.json table --competition "Premier League" --breakdown
//! goalline h2h --team1 Arsenal --team2 Chelsea --date-from 2020-01-01
//! goalline streaks --type unbeaten --limit 5
//! goalline form -n 6 --by home
//! ```

mod cli;
mod settings;

use anyhow::Context as _;
use clap::Parser;
use goalline_core::analytics::Analytics;
use goalline_store_memory::MemoryStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries only the report.
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let request = cli
    .command
    .into_request(&settings)
    .context("invalid request")?;

  let data_path = cli.data.unwrap_or_else(|| settings.data_path.clone());
  let store = MemoryStore::open(&data_path)
    .await
    .with_context(|| format!("failed to load matches from {data_path:?}"))?;
  tracing::info!(matches = store.len(), view = request.view_name(), "running view");

  let report = request.run(&Analytics::new(store)).await?;
  let rendered = if cli.pretty {
    serde_json::to_string_pretty(&report)?
  } else {
    serde_json::to_string(&report)?
  };
  println!("{rendered}");

  Ok(())
}
