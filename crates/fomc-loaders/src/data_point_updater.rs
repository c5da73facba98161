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

//! Incremental observation updates for one indicator

use crate::loader::SyncOptions;
use crate::LoaderResult;
use chrono::NaiveDate;
use fomc_client::SeriesProvider;
use fomc_database_sqlite::models::{EconomicDataPoint, EconomicIndicator, NewEconomicDataPoint};
use fomc_database_sqlite::SqliteConnection;
use std::collections::HashSet;
use tracing::{debug, info};

/// Inclusive date window requested from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
  pub start: NaiveDate,
  pub end: NaiveDate,
}

impl FetchWindow {
  /// Start: explicit, else the day after the latest stored date, else the
  /// default start. End: explicit, else tomorrow in the reference timezone.
  pub fn resolve(latest_stored: Option<NaiveDate>, options: &SyncOptions) -> Self {
    let start = options
      .start_date
      .or_else(|| latest_stored.and_then(|d| d.succ_opt()))
      .unwrap_or(options.default_start_date);
    let end = options.end_date.unwrap_or_else(|| options.tomorrow());
    Self { start, end }
  }

  pub fn is_empty(&self) -> bool {
    self.start > self.end
  }
}

/// Fetch observations for `indicator` and store the ones not already present.
///
/// With `full_refresh` every stored observation is deleted first and all
/// fetched observations are written. Stored values are never overwritten.
/// Returns the number of rows inserted.
pub async fn update_indicator_data(
  conn: &mut SqliteConnection,
  provider: &dyn SeriesProvider,
  indicator: &EconomicIndicator,
  options: &SyncOptions,
) -> LoaderResult<usize> {
  if options.full_refresh {
    let deleted = EconomicDataPoint::delete_for_indicator(conn, indicator.id)?;
    if deleted > 0 {
      info!("{}: cleared {} stored points for full refresh", indicator.code, deleted);
    }
  }

  let latest = EconomicDataPoint::latest_date(conn, indicator.id)?;
  let window = FetchWindow::resolve(latest, options);
  if window.is_empty() {
    debug!("{}: up to date through {:?}", indicator.code, latest);
    return Ok(0);
  }

  debug!("{}: fetching {} to {}", indicator.code, window.start, window.end);
  let frame = provider.observations(&indicator.code, Some(window.start), Some(window.end)).await?;
  if frame.is_empty() {
    return Ok(0);
  }

  let stored: HashSet<NaiveDate> = match frame_bounds(&frame.points) {
    Some((first, last)) if !options.full_refresh => {
      EconomicDataPoint::dates_between(conn, indicator.id, first, last)?.into_iter().collect()
    }
    _ => HashSet::new(),
  };

  let mut seen = HashSet::new();
  let fresh: Vec<NewEconomicDataPoint> = frame
    .points
    .iter()
    .filter(|p| !stored.contains(&p.date) && seen.insert(p.date))
    .map(|p| NewEconomicDataPoint { indicator_id: indicator.id, date: p.date, value: p.value })
    .collect();

  let inserted = NewEconomicDataPoint::insert_batch(conn, &fresh)?;
  debug!(
    "{}: {} fetched, {} already stored, {} inserted",
    indicator.code,
    frame.len(),
    stored.len(),
    inserted
  );
  Ok(inserted)
}

fn frame_bounds(points: &[fomc_models::SeriesPoint]) -> Option<(NaiveDate, NaiveDate)> {
  let first = points.iter().map(|p| p.date).min()?;
  let last = points.iter().map(|p| p.date).max()?;
  Some((first, last))
}
