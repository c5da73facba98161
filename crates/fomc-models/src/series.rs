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

//! Series metadata returned by the `series` endpoint

use crate::common::parse_last_updated;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Metadata describing one series
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesInfo {
  /// Series code
  #[serde(default)]
  pub id: String,

  /// Human readable title
  #[serde(default)]
  pub title: String,

  /// First available observation date
  #[serde(default)]
  pub observation_start: Option<String>,

  /// Last available observation date
  #[serde(default)]
  pub observation_end: Option<String>,

  /// Frequency, e.g. "Monthly"
  #[serde(default)]
  pub frequency: String,

  #[serde(default)]
  pub frequency_short: Option<String>,

  /// Units, e.g. "Thousands of Persons"
  #[serde(default)]
  pub units: String,

  #[serde(default)]
  pub units_short: Option<String>,

  /// Seasonal adjustment, e.g. "Seasonally Adjusted"
  #[serde(default)]
  pub seasonal_adjustment: String,

  #[serde(default)]
  pub seasonal_adjustment_short: Option<String>,

  /// Remote last-update stamp, e.g. "2024-03-08 07:47:02-06"
  #[serde(default)]
  pub last_updated: Option<String>,

  #[serde(default)]
  pub popularity: Option<i64>,

  #[serde(default)]
  pub notes: Option<String>,
}

impl SeriesInfo {
  /// The remote last-update stamp as a UTC timestamp
  pub fn last_updated_at(&self) -> Option<NaiveDateTime> {
    self.last_updated.as_deref().and_then(parse_last_updated)
  }
}

/// Envelope of the `series` endpoint. The API spells the list `seriess`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesInfoResponse {
  #[serde(default)]
  pub seriess: Vec<SeriesInfo>,
}

impl SeriesInfoResponse {
  /// The first (and normally only) series in the envelope
  pub fn into_first(self) -> Option<SeriesInfo> {
    self.seriess.into_iter().next()
  }
}
