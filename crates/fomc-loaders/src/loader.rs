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

//! Shared configuration and context for the sync loaders

use crate::{LoaderError, LoaderResult, ProcessTracker};
use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use fomc_client::SeriesProvider;
use fomc_core::{DATE_FORMAT, DEFAULT_START_DATE};
use std::sync::Arc;

/// Hours west of UTC for the default reference timezone (US Eastern, standard time)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = -5;

/// Configuration for data loaders
#[derive(Debug, Clone)]
pub struct LoaderConfig {
  /// Enable progress tracking
  pub show_progress: bool,

  /// Enable process state tracking
  pub track_process: bool,
}

impl Default for LoaderConfig {
  fn default() -> Self {
    Self { show_progress: true, track_process: true }
  }
}

/// Date window and refresh behaviour for one sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
  /// Explicit first date to fetch, overrides the stored high-water mark
  pub start_date: Option<NaiveDate>,

  /// Explicit last date to fetch, otherwise tomorrow in `reference_offset`
  pub end_date: Option<NaiveDate>,

  /// First date for an indicator with no stored observations
  pub default_start_date: NaiveDate,

  /// Delete stored observations before fetching
  pub full_refresh: bool,

  /// Re-fetch metadata for indicators that already exist
  pub refresh_metadata: bool,

  /// Timezone used to decide what "tomorrow" is
  pub reference_offset: FixedOffset,
}

impl Default for SyncOptions {
  fn default() -> Self {
    Self {
      start_date: None,
      end_date: None,
      default_start_date: default_start_date(),
      full_refresh: false,
      refresh_metadata: false,
      reference_offset: utc_offset(DEFAULT_UTC_OFFSET_HOURS).unwrap_or_else(|_| Utc.fix()),
    }
  }
}

impl SyncOptions {
  /// Reject windows that can never contain an observation
  pub fn validate(&self) -> LoaderResult<()> {
    if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
      if start > end {
        return Err(LoaderError::ConfigurationError(format!(
          "start date {} is after end date {}",
          start, end
        )));
      }
    }
    Ok(())
  }

  /// The day after today in the reference timezone
  pub fn tomorrow(&self) -> NaiveDate {
    let today = Utc::now().with_timezone(&self.reference_offset).date_naive();
    today.succ_opt().unwrap_or(today)
  }
}

pub fn default_start_date() -> NaiveDate {
  NaiveDate::parse_from_str(DEFAULT_START_DATE, DATE_FORMAT).unwrap_or_default()
}

/// A fixed offset from whole hours east of UTC (negative for the Americas)
pub fn utc_offset(hours: i32) -> LoaderResult<FixedOffset> {
  hours.checked_mul(3600).and_then(FixedOffset::east_opt).ok_or_else(|| {
    LoaderError::ConfigurationError(format!("UTC offset out of range: {} hours", hours))
  })
}

/// Shared context for all loaders
pub struct LoaderContext {
  pub provider: Arc<dyn SeriesProvider>,
  pub config: LoaderConfig,
  pub process_tracker: Option<ProcessTracker>,
}

impl LoaderContext {
  pub fn new(provider: Arc<dyn SeriesProvider>, config: LoaderConfig) -> Self {
    Self { provider, config, process_tracker: None }
  }

  pub fn with_process_tracker(mut self, tracker: ProcessTracker) -> Self {
    self.process_tracker = Some(tracker);
    self
  }

  /// The tracker, when tracking is both configured and enabled
  pub fn tracker(&self) -> Option<&ProcessTracker> {
    if self.config.track_process {
      self.process_tracker.as_ref()
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fomc_client::FredClient;

  fn client() -> Arc<FredClient> {
    let config = fomc_core::Config::default_with_key("test_key".to_string());
    Arc::new(FredClient::new(config).expect("Failed to create client"))
  }

  #[test]
  fn test_loader_config_default() {
    let config = LoaderConfig::default();
    assert!(config.show_progress);
    assert!(config.track_process);
  }

  #[test]
  fn test_sync_options_default() {
    let options = SyncOptions::default();
    assert_eq!(options.default_start_date, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
    assert!(!options.full_refresh);
    assert!(!options.refresh_metadata);
    assert_eq!(options.reference_offset.local_minus_utc(), -5 * 3600);
    assert!(options.validate().is_ok());
  }

  #[test]
  fn test_sync_options_rejects_inverted_window() {
    let options = SyncOptions {
      start_date: NaiveDate::from_ymd_opt(2024, 6, 1),
      end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
      ..SyncOptions::default()
    };
    assert!(matches!(options.validate(), Err(LoaderError::ConfigurationError(_))));
  }

  #[test]
  fn test_tomorrow_is_after_today_in_offset() {
    let options = SyncOptions::default();
    let today = Utc::now().with_timezone(&options.reference_offset).date_naive();
    assert_eq!(options.tomorrow(), today.succ_opt().unwrap());
  }

  #[test]
  fn test_utc_offset_bounds() {
    assert_eq!(utc_offset(8).unwrap().local_minus_utc(), 8 * 3600);
    assert!(utc_offset(30).is_err());
  }

  #[test]
  fn test_huge_utc_offset_is_configuration_error() {
    assert!(matches!(utc_offset(1_000_000), Err(LoaderError::ConfigurationError(_))));
    assert!(matches!(utc_offset(i32::MIN), Err(LoaderError::ConfigurationError(_))));
  }

  #[test]
  fn test_loader_context_tracker_respects_flag() {
    let context = LoaderContext::new(client(), LoaderConfig::default());
    assert!(context.tracker().is_none());

    let context = context.with_process_tracker(ProcessTracker::new());
    assert!(context.tracker().is_some());

    let disabled = LoaderContext::new(
      client(),
      LoaderConfig { show_progress: false, track_process: false },
    )
    .with_process_tracker(ProcessTracker::new());
    assert!(disabled.tracker().is_none());
  }
}
