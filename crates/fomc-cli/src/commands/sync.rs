/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use fomc_client::FredClient;
use fomc_core::DATE_FORMAT;
use fomc_database_sqlite::establish_connection;
use fomc_loaders::loader::utc_offset;
use fomc_loaders::{
  read_definitions, IndicatorOutcome, LoaderConfig, LoaderContext, Membership, ProcessInfo,
  ProcessTracker, SyncOptions, SyncPipeline,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

#[derive(Subcommand, Debug)]
pub enum SyncCommands {
  /// Synchronise every indicator listed in the definition sheet
  All(SyncAllArgs),

  /// Refresh the observations of one stored indicator
  Indicator {
    /// Indicator id or FRED series code
    selector: String,

    #[command(flatten)]
    window: WindowArgs,
  },
}

#[derive(Args, Debug)]
pub struct SyncAllArgs {
  /// Definition sheet (.xlsx or .csv), defaults to INDICATOR_SHEET
  #[arg(long)]
  sheet: Option<PathBuf>,

  /// Worksheet name, first worksheet when omitted
  #[arg(long)]
  sheet_name: Option<String>,

  #[command(flatten)]
  window: WindowArgs,
}

#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
  /// First date to fetch (YYYY-MM-DD), overrides the stored latest date
  #[arg(long, value_parser = parse_date)]
  start_date: Option<NaiveDate>,

  /// Last date to fetch (YYYY-MM-DD), tomorrow when omitted
  #[arg(long, value_parser = parse_date)]
  end_date: Option<NaiveDate>,

  /// Ceiling on FRED requests in any 60 second window
  #[arg(long, env = "FRED_RATE_LIMIT", default_value_t = 30)]
  requests_per_minute: u32,

  /// First date for indicators with no stored data
  #[arg(long, value_parser = parse_date, default_value = "2010-01-01")]
  default_start_date: NaiveDate,

  /// Delete stored observations before fetching
  #[arg(long)]
  full_refresh: bool,

  /// Re-fetch metadata for indicators that already exist
  #[arg(long)]
  refresh_metadata: bool,

  /// Hide the progress bar
  #[arg(long)]
  no_progress: bool,
}

impl WindowArgs {
  fn sync_options(&self, utc_offset_hours: i32) -> Result<SyncOptions> {
    let options = SyncOptions {
      start_date: self.start_date,
      end_date: self.end_date,
      default_start_date: self.default_start_date,
      full_refresh: self.full_refresh,
      refresh_metadata: self.refresh_metadata,
      reference_offset: utc_offset(utc_offset_hours)?,
    };
    options.validate()?;
    Ok(options)
  }
}

fn parse_date(raw: &str) -> std::result::Result<NaiveDate, String> {
  NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {}", e))
}

pub async fn handle_sync(cmd: SyncCommands, config: Config) -> Result<()> {
  match cmd {
    SyncCommands::All(args) => sync_all(args, config).await,
    SyncCommands::Indicator { selector, window } => sync_indicator(&selector, window, config).await,
  }
}

fn build_pipeline(window: &WindowArgs, config: &Config) -> Result<(SyncPipeline, ProcessTracker)> {
  let options = window.sync_options(config.utc_offset_hours)?;

  let api_config = config.api_config()?.with_rate_limit(window.requests_per_minute);
  let client = FredClient::new(api_config).context("Failed to create FRED client")?;

  let conn = establish_connection(&config.database_url)
    .with_context(|| format!("Failed to open database {}", config.database_url))?;

  let loader_config = LoaderConfig { show_progress: !window.no_progress, track_process: true };
  let tracker = ProcessTracker::new();
  let context =
    LoaderContext::new(Arc::new(client), loader_config).with_process_tracker(tracker.clone());

  Ok((SyncPipeline::new(conn, context, options)?, tracker))
}

fn describe_run(run: &ProcessInfo) -> String {
  let mut line = format!("{}: {}", run.process_name, run.state);
  if let Some(records) = run.records_processed {
    line.push_str(&format!(", {} indicators", records));
  }
  if let Some(elapsed) = run.elapsed() {
    line.push_str(&format!(" in {:.1}s", elapsed.num_milliseconds() as f64 / 1000.0));
  }
  if let Some(note) = &run.error_message {
    line.push_str(&format!(" ({})", note));
  }
  line
}

async fn report_run(tracker: &ProcessTracker) {
  if let Some(run) = tracker.last().await {
    println!("{}", describe_run(&run));
  }
}

fn load_membership(config: &Config) -> Result<Membership> {
  match &config.membership_file {
    Some(path) => Membership::from_json_file(path)
      .with_context(|| format!("Failed to read membership file {}", path.display())),
    None => Ok(Membership::default()),
  }
}

async fn sync_all(args: SyncAllArgs, config: Config) -> Result<()> {
  let sheet = args.sheet.clone().unwrap_or_else(|| config.indicator_sheet.clone());
  if !sheet.exists() {
    bail!("Indicator sheet not found: {}", sheet.display());
  }

  let membership = load_membership(&config)?;
  let records = read_definitions(&sheet, args.sheet_name.as_deref(), &membership)
    .with_context(|| format!("Failed to read indicator sheet {}", sheet.display()))?;
  info!("{} indicators defined in {}", records.len(), sheet.display());

  let (mut pipeline, tracker) = build_pipeline(&args.window, &config)?;
  let result = pipeline.sync_all(&records).await;
  report_run(&tracker).await;
  let summary = result.context("Sync aborted")?;

  println!("{}", summary);
  println!("{} new data points", summary.inserted());
  for (code, reason) in summary.failures() {
    println!("  failed {}: {}", code, reason);
  }
  Ok(())
}

async fn sync_indicator(selector: &str, window: WindowArgs, config: Config) -> Result<()> {
  let (mut pipeline, tracker) = build_pipeline(&window, &config)?;
  let result = pipeline.refresh_indicator(selector).await;
  report_run(&tracker).await;
  let report = result.with_context(|| format!("Failed to refresh {}", selector))?;

  match &report.outcome {
    IndicatorOutcome::Success { inserted } => {
      println!("{} ({}): {} new data points", report.code, report.name, inserted)
    }
    IndicatorOutcome::Failure { reason } => bail!("{} failed: {}", report.code, reason),
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;
  use fomc_loaders::ProcessState;

  #[derive(Parser, Debug)]
  struct TestCli {
    #[command(subcommand)]
    cmd: SyncCommands,
  }

  #[test]
  fn test_all_defaults() {
    let cli = TestCli::try_parse_from(["fomc", "all"]).unwrap();
    let SyncCommands::All(args) = cli.cmd else { panic!("expected all") };
    assert_eq!(args.sheet, None);
    assert_eq!(args.window.default_start_date, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
    assert!(!args.window.full_refresh);

    let options = args.window.sync_options(-5).unwrap();
    assert_eq!(options.reference_offset.local_minus_utc(), -5 * 3600);
    assert_eq!(options.start_date, None);
  }

  #[test]
  fn test_indicator_with_window() {
    let cli = TestCli::try_parse_from([
      "fomc",
      "indicator",
      "UNRATE",
      "--start-date",
      "2024-01-01",
      "--end-date",
      "2024-06-30",
      "--full-refresh",
    ])
    .unwrap();
    let SyncCommands::Indicator { selector, window } = cli.cmd else { panic!("expected indicator") };
    assert_eq!(selector, "UNRATE");
    assert!(window.full_refresh);
    assert_eq!(window.end_date, NaiveDate::from_ymd_opt(2024, 6, 30));
  }

  #[tokio::test]
  async fn test_run_record_is_described() {
    let tracker = ProcessTracker::new();
    assert!(tracker.last().await.is_none());

    tracker.start("sync_all").await.unwrap();
    let note = Some("1 indicators failed".to_string());
    tracker.complete(ProcessState::CompletedWithErrors, 2, note).await.unwrap();

    let line = describe_run(&tracker.last().await.unwrap());
    assert!(line.starts_with("sync_all: "), "{}", line);
    assert!(line.contains(&ProcessState::CompletedWithErrors.to_string()), "{}", line);
    assert!(line.contains(", 2 indicators in "), "{}", line);
    assert!(line.ends_with("(1 indicators failed)"), "{}", line);
  }

  #[test]
  fn test_rejects_bad_dates() {
    assert!(TestCli::try_parse_from(["fomc", "all", "--start-date", "01/02/2024"]).is_err());

    let cli = TestCli::try_parse_from([
      "fomc",
      "all",
      "--start-date",
      "2024-06-01",
      "--end-date",
      "2024-01-01",
    ])
    .unwrap();
    let SyncCommands::All(args) = cli.cmd else { panic!("expected all") };
    assert!(args.window.sync_options(-5).is_err());
  }
}
