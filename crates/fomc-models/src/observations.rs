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

//! Observations returned by the `series/observations` endpoint and the
//! cleaned tabular form stored by the loaders

use crate::common::{parse_observation_date, parse_observation_value};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw observation. Values arrive as strings; missing ones as ".".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  #[serde(default)]
  pub realtime_start: Option<String>,

  #[serde(default)]
  pub realtime_end: Option<String>,

  #[serde(default)]
  pub date: String,

  #[serde(default)]
  pub value: String,
}

/// Envelope of the `series/observations` endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObservationsResponse {
  #[serde(default)]
  pub observation_start: Option<String>,

  #[serde(default)]
  pub observation_end: Option<String>,

  #[serde(default)]
  pub units: Option<String>,

  #[serde(default)]
  pub count: Option<i64>,

  #[serde(default)]
  pub observations: Vec<Observation>,
}

/// A cleaned `(date, value)` observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
  pub date: NaiveDate,
  pub value: f64,
}

/// Tabular form of a series: only rows with both a date and a numeric value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesFrame {
  pub points: Vec<SeriesPoint>,
  /// Rows dropped for a missing date or value
  pub dropped: usize,
}

impl SeriesFrame {
  /// Convert raw observations, dropping rows whose date or value is missing
  pub fn from_observations(observations: &[Observation]) -> Self {
    let mut points = Vec::with_capacity(observations.len());
    let mut dropped = 0;

    for obs in observations {
      match (parse_observation_date(&obs.date), parse_observation_value(&obs.value)) {
        (Some(date), Some(value)) => points.push(SeriesPoint { date, value }),
        _ => dropped += 1,
      }
    }

    Self { points, dropped }
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }

  /// Points as `(date, value)` pairs
  pub fn pairs(&self) -> Vec<(NaiveDate, f64)> {
    self.points.iter().map(|p| (p.date, p.value)).collect()
  }
}
