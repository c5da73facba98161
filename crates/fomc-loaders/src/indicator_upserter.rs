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

//! Indicator metadata upsert keyed by series code

use crate::definition_source::IndicatorRecord;
use crate::{LoaderError, LoaderResult};
use chrono::NaiveDateTime;
use fomc_database_sqlite::models::{EconomicIndicator, IndicatorDescriptionChanges, NewEconomicIndicator};
use fomc_database_sqlite::SqliteConnection;
use fomc_models::SeriesInfo;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
  Created,
  Updated,
  Unchanged,
}

#[derive(Debug, Clone)]
pub struct UpsertOutcome {
  pub indicator: EconomicIndicator,
  pub action: UpsertAction,
}

/// Descriptive fields of an indicator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorDescription {
  pub description: Option<String>,
  pub frequency: Option<String>,
  pub units: Option<String>,
  pub seasonal_adjustment: Option<String>,
  pub last_updated: Option<NaiveDateTime>,
}

fn non_blank(value: &str) -> Option<String> {
  let trimmed = value.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl IndicatorDescription {
  /// Description from remote metadata; the series title is the description
  pub fn from_metadata(info: &SeriesInfo) -> Self {
    let last_updated = info.last_updated_at();
    if let (Some(raw), None) = (&info.last_updated, last_updated) {
      warn!("{}: unparsable last_updated {:?}, stored as NULL", info.id, raw);
    }

    Self {
      description: non_blank(&info.title),
      frequency: non_blank(&info.frequency),
      units: non_blank(&info.units),
      seasonal_adjustment: non_blank(&info.seasonal_adjustment),
      last_updated,
    }
  }

  /// Local names only, used when metadata is unavailable
  pub fn fallback(record: &IndicatorRecord) -> Self {
    Self {
      description: Some(record.english_name.clone().unwrap_or_else(|| record.name.clone())),
      ..Self::default()
    }
  }

  fn changes(&self) -> IndicatorDescriptionChanges<'_> {
    IndicatorDescriptionChanges {
      description: self.description.as_deref(),
      frequency: self.frequency.as_deref(),
      units: self.units.as_deref(),
      seasonal_adjustment: self.seasonal_adjustment.as_deref(),
      last_updated: self.last_updated,
    }
  }

  /// True when a present field disagrees with the stored row
  fn differs_from(&self, stored: &EconomicIndicator) -> bool {
    fn differs(new: &Option<String>, old: &Option<String>) -> bool {
      new.is_some() && new != old
    }
    differs(&self.description, &stored.description)
      || differs(&self.frequency, &stored.frequency)
      || differs(&self.units, &stored.units)
      || differs(&self.seasonal_adjustment, &stored.seasonal_adjustment)
      || (self.last_updated.is_some() && self.last_updated != stored.last_updated)
  }
}

/// Whether the metadata endpoint should be called for this code
pub fn needs_metadata(
  conn: &mut SqliteConnection,
  code: &str,
  refresh_metadata: bool,
) -> LoaderResult<bool> {
  if refresh_metadata {
    return Ok(true);
  }
  Ok(EconomicIndicator::find_by_code(conn, code)?.is_none())
}

/// Create the indicator, or bring an existing one in line with the sheet.
///
/// Names and placement always follow the sheet. Descriptive fields are taken
/// from `metadata` when present; a new indicator without metadata gets the
/// local name as its description and blank descriptive fields.
pub fn upsert_indicator(
  conn: &mut SqliteConnection,
  record: &IndicatorRecord,
  category_id: i32,
  metadata: Option<&SeriesInfo>,
) -> LoaderResult<UpsertOutcome> {
  let Some(existing) = EconomicIndicator::find_by_code(conn, &record.code)? else {
    let description = match metadata {
      Some(info) => IndicatorDescription::from_metadata(info),
      None => IndicatorDescription::fallback(record),
    };

    let indicator = NewEconomicIndicator {
      name: &record.name,
      english_name: record.english_name.as_deref(),
      code: &record.code,
      description: description.description.as_deref(),
      frequency: description.frequency.as_deref(),
      units: description.units.as_deref(),
      seasonal_adjustment: description.seasonal_adjustment.as_deref(),
      last_updated: description.last_updated,
      category_id,
    }
    .insert(conn)?;

    info!("Created indicator {} ({})", record.name, record.code);
    return Ok(UpsertOutcome { indicator, action: UpsertAction::Created });
  };

  let mut action = UpsertAction::Unchanged;

  if existing.name != record.name
    || existing.english_name != record.english_name
    || existing.category_id != category_id
  {
    EconomicIndicator::update_placement(
      conn,
      existing.id,
      &record.name,
      record.english_name.as_deref(),
      category_id,
    )?;
    action = UpsertAction::Updated;
    info!("Updated indicator {} ({})", record.name, record.code);
  }

  if let Some(info) = metadata {
    let description = IndicatorDescription::from_metadata(info);
    if description.differs_from(&existing) {
      EconomicIndicator::update_description(conn, existing.id, &description.changes())?;
      action = UpsertAction::Updated;
    }
  }

  let indicator = match action {
    UpsertAction::Unchanged => existing,
    _ => EconomicIndicator::find_by_id(conn, existing.id)?
      .ok_or_else(|| LoaderError::DatabaseError(format!("indicator {} vanished", record.code)))?,
  };
  Ok(UpsertOutcome { indicator, action })
}
