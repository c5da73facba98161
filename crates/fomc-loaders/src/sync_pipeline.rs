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

//! Sync pipeline orchestration
//!
//! Indicators are processed one at a time. Each one is a unit of work inside
//! its own transaction:
//!
//! ```text
//! pending -> metadata_resolved -> data_fetched -> done
//!    \______________\_________________\_______-> failed
//! ```
//!
//! A failure rolls back that indicator's writes and is recorded in the
//! [`SyncSummary`]; the run moves on to the next indicator. Only storage
//! errors while opening, committing or rolling back a unit abort the run.

use crate::data_point_updater::update_indicator_data;
use crate::definition_source::IndicatorRecord;
use crate::indicator_upserter::{needs_metadata, upsert_indicator};
use crate::{
  CategoryReconciler, LoaderContext, LoaderError, LoaderResult, ProcessState, ProcessTracker,
  SyncOptions,
};
use fomc_client::SeriesProvider;
use fomc_database_sqlite::models::EconomicIndicator;
use fomc_database_sqlite::repository::{begin_unit, commit_unit, rollback_unit};
use fomc_database_sqlite::SqliteConnection;
use fomc_models::SeriesInfo;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
  Pending,
  MetadataResolved,
  DataFetched,
  Done,
  Failed,
}

impl fmt::Display for IndicatorState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      IndicatorState::Pending => "pending",
      IndicatorState::MetadataResolved => "metadata_resolved",
      IndicatorState::DataFetched => "data_fetched",
      IndicatorState::Done => "done",
      IndicatorState::Failed => "failed",
    };
    f.write_str(s)
  }
}

/// Result of one indicator's unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorOutcome {
  Success { inserted: usize },
  Failure { reason: String },
}

impl IndicatorOutcome {
  pub fn is_success(&self) -> bool {
    matches!(self, IndicatorOutcome::Success { .. })
  }
}

#[derive(Debug, Clone)]
pub struct IndicatorReport {
  pub code: String,
  pub name: String,
  pub state: IndicatorState,
  pub outcome: IndicatorOutcome,
}

/// Per-run tally of indicator outcomes
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
  pub total: usize,
  pub reports: Vec<IndicatorReport>,
}

impl SyncSummary {
  pub fn new(total: usize) -> Self {
    Self { total, reports: Vec::with_capacity(total) }
  }

  pub fn push(&mut self, report: IndicatorReport) {
    self.reports.push(report);
  }

  pub fn succeeded(&self) -> usize {
    self.reports.iter().filter(|r| r.outcome.is_success()).count()
  }

  pub fn failed(&self) -> usize {
    self.reports.len() - self.succeeded()
  }

  /// Observations inserted across all successful indicators
  pub fn inserted(&self) -> usize {
    self
      .reports
      .iter()
      .map(|r| match r.outcome {
        IndicatorOutcome::Success { inserted } => inserted,
        IndicatorOutcome::Failure { .. } => 0,
      })
      .sum()
  }

  pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
    self.reports.iter().filter_map(|r| match &r.outcome {
      IndicatorOutcome::Failure { reason } => Some((r.code.as_str(), reason.as_str())),
      IndicatorOutcome::Success { .. } => None,
    })
  }

  pub fn process_state(&self) -> ProcessState {
    match (self.succeeded(), self.failed()) {
      (_, 0) => ProcessState::Success,
      (0, _) => ProcessState::Failed,
      _ => ProcessState::CompletedWithErrors,
    }
  }
}

impl fmt::Display for SyncSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "processed {} of {}", self.succeeded(), self.total)
  }
}

/// Sequential synchroniser over one database session
pub struct SyncPipeline {
  conn: SqliteConnection,
  context: LoaderContext,
  options: SyncOptions,
  reconciler: CategoryReconciler,
}

impl SyncPipeline {
  pub fn new(conn: SqliteConnection, context: LoaderContext, options: SyncOptions) -> LoaderResult<Self> {
    options.validate()?;
    Ok(Self { conn, context, options, reconciler: CategoryReconciler::new() })
  }

  pub fn options(&self) -> &SyncOptions {
    &self.options
  }

  pub fn connection(&mut self) -> &mut SqliteConnection {
    &mut self.conn
  }

  /// Categories created by committed units so far
  pub fn categories_created(&self) -> usize {
    self.reconciler.created()
  }

  pub fn into_connection(self) -> SqliteConnection {
    self.conn
  }

  /// Synchronise every record in order
  pub async fn sync_all(&mut self, records: &[IndicatorRecord]) -> LoaderResult<SyncSummary> {
    info!("Starting sync of {} indicators", records.len());
    let tracker = self.context.tracker().cloned();
    if let Some(tracker) = &tracker {
      tracker.start("sync_all").await?;
    }

    let progress = self.progress_bar(records.len() as u64);
    let mut summary = SyncSummary::new(records.len());

    for record in records {
      progress.set_message(record.code.clone());
      match self.sync_record(record).await {
        Ok(report) => summary.push(report),
        Err(e) => {
          progress.abandon_with_message(format!("aborted at {}", record.code));
          Self::close_tracker(&tracker, ProcessState::Failed, &summary, Some(e.to_string())).await;
          return Err(e);
        }
      }
      progress.inc(1);
    }

    progress.finish_with_message(summary.to_string());
    info!(
      "Sync finished: {}, {} new points, {} new categories",
      summary,
      summary.inserted(),
      self.reconciler.created()
    );
    for (code, reason) in summary.failures() {
      warn!("  failed {}: {}", code, reason);
    }

    let failure_note = (summary.failed() > 0).then(|| format!("{} indicators failed", summary.failed()));
    Self::close_tracker(&tracker, summary.process_state(), &summary, failure_note).await;
    Ok(summary)
  }

  /// One sheet record as its own unit of work
  pub async fn sync_record(&mut self, record: &IndicatorRecord) -> LoaderResult<IndicatorReport> {
    info!("Processing {} ({}) row {}", record.name, record.code, record.row_number);
    begin_unit(&mut self.conn)?;

    let mut state = IndicatorState::Pending;
    let result = self.process_record(record, &mut state).await;
    self.finish_unit(&record.code, &record.name, state, result)
  }

  /// Refresh the observations of one stored indicator, by id or code
  pub async fn refresh_indicator(&mut self, selector: &str) -> LoaderResult<IndicatorReport> {
    let indicator = self.find_indicator(selector)?;
    let tracker = self.context.tracker().cloned();
    if let Some(tracker) = &tracker {
      tracker.start("sync_indicator").await?;
    }

    begin_unit(&mut self.conn)?;
    let mut state = IndicatorState::Pending;
    let result = self.process_stored(&indicator, &mut state).await;
    let report = self.finish_unit(&indicator.code, &indicator.name, state, result)?;

    if let Some(tracker) = &tracker {
      let (process_state, note) = match &report.outcome {
        IndicatorOutcome::Success { .. } => (ProcessState::Success, None),
        IndicatorOutcome::Failure { reason } => (ProcessState::Failed, Some(reason.clone())),
      };
      tracker.complete(process_state, 1, note).await?;
    }
    Ok(report)
  }

  fn find_indicator(&mut self, selector: &str) -> LoaderResult<EconomicIndicator> {
    let selector = selector.trim();
    let by_id = match selector.parse::<i32>() {
      Ok(id) => EconomicIndicator::find_by_id(&mut self.conn, id)?,
      Err(_) => None,
    };
    let found = match by_id {
      Some(indicator) => Some(indicator),
      None => EconomicIndicator::find_by_code(&mut self.conn, selector)?,
    };
    found.ok_or_else(|| LoaderError::InvalidData(format!("unknown indicator: {}", selector)))
  }

  async fn process_record(
    &mut self,
    record: &IndicatorRecord,
    state: &mut IndicatorState,
  ) -> LoaderResult<usize> {
    let provider = Arc::clone(&self.context.provider);
    let category_id = self.reconciler.reconcile(&mut self.conn, &record.category_path)?;

    let metadata = if needs_metadata(&mut self.conn, &record.code, self.options.refresh_metadata)? {
      Self::fetch_metadata(provider.as_ref(), &record.code).await
    } else {
      None
    };

    let upserted = upsert_indicator(&mut self.conn, record, category_id, metadata.as_ref())?;
    *state = IndicatorState::MetadataResolved;

    let inserted =
      update_indicator_data(&mut self.conn, provider.as_ref(), &upserted.indicator, &self.options)
        .await?;
    *state = IndicatorState::DataFetched;
    Ok(inserted)
  }

  async fn process_stored(
    &mut self,
    indicator: &EconomicIndicator,
    state: &mut IndicatorState,
  ) -> LoaderResult<usize> {
    let provider = Arc::clone(&self.context.provider);
    let indicator = if self.options.refresh_metadata {
      let metadata = Self::fetch_metadata(provider.as_ref(), &indicator.code).await;
      let record = IndicatorRecord {
        name: indicator.name.clone(),
        english_name: indicator.english_name.clone(),
        code: indicator.code.clone(),
        category_path: Vec::new(),
        row_number: 0,
      };
      upsert_indicator(&mut self.conn, &record, indicator.category_id, metadata.as_ref())?.indicator
    } else {
      indicator.clone()
    };
    *state = IndicatorState::MetadataResolved;

    let inserted =
      update_indicator_data(&mut self.conn, provider.as_ref(), &indicator, &self.options).await?;
    *state = IndicatorState::DataFetched;
    Ok(inserted)
  }

  /// Metadata lookup; failures are logged and tolerated
  async fn fetch_metadata(provider: &dyn SeriesProvider, code: &str) -> Option<SeriesInfo> {
    match provider.series_info(code).await {
      Ok(Some(info)) => Some(info),
      Ok(None) => {
        warn!("{}: no metadata returned, using local names", code);
        None
      }
      Err(e) => {
        warn!("{}: metadata unavailable, using local names: {}", code, e);
        None
      }
    }
  }

  /// Commit or roll back the open unit and build its report
  fn finish_unit(
    &mut self,
    code: &str,
    name: &str,
    state: IndicatorState,
    result: LoaderResult<usize>,
  ) -> LoaderResult<IndicatorReport> {
    let (state, outcome) = match result {
      Ok(inserted) => {
        commit_unit(&mut self.conn)?;
        self.reconciler.commit();
        info!("✅ {} ({}): {} new points", name, code, inserted);
        (IndicatorState::Done, IndicatorOutcome::Success { inserted })
      }
      Err(e) => {
        rollback_unit(&mut self.conn)?;
        self.reconciler.invalidate();
        error!("❌ {} ({}) failed after {}: {}", name, code, state, e);
        (IndicatorState::Failed, IndicatorOutcome::Failure { reason: e.to_string() })
      }
    };
    Ok(IndicatorReport { code: code.to_string(), name: name.to_string(), state, outcome })
  }

  fn progress_bar(&self, len: u64) -> ProgressBar {
    if !self.context.config.show_progress {
      return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
      .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
      .map(|s| s.progress_chars("#>-"))
      .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
  }

  async fn close_tracker(
    tracker: &Option<ProcessTracker>,
    state: ProcessState,
    summary: &SyncSummary,
    note: Option<String>,
  ) {
    if let Some(tracker) = tracker {
      if let Err(e) = tracker.complete(state, summary.succeeded(), note).await {
        warn!("Process tracking failed: {}", e);
      }
    }
  }
}
