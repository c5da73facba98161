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

//! Series metadata and observation endpoints
//!
//! This module provides access to the two FRED endpoints the indicator
//! pipeline needs:
//! - `series`: title, frequency, units, seasonal adjustment, last update
//! - `series/observations`: `(date, value)` observations between two dates

use super::EndpointCore;
use crate::transport::Transport;
use chrono::NaiveDate;
use fomc_core::{FuncType, Result, DATE_FORMAT};
use fomc_models::{ObservationsResponse, SeriesFrame, SeriesInfoResponse};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

/// Series endpoints for metadata and observations
#[derive(Debug, Clone)]
pub struct SeriesEndpoints {
  core: EndpointCore,
}

impl SeriesEndpoints {
  /// Create a new series endpoints instance
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { core: EndpointCore::new(transport) }
  }

  /// Get series metadata
  ///
  /// # Arguments
  ///
  /// * `code` - The series code (e.g., "PAYEMS", "CPIAUCSL")
  ///
  /// # Examples
  ///
  /// ```ignore
  /// let info = client.series().get_series_info("PAYEMS").await?;
  /// let frequency = info.into_first().map(|s| s.frequency);
  /// ```
  #[instrument(skip(self))]
  pub async fn get_series_info(&self, code: &str) -> Result<SeriesInfoResponse> {
    let mut params = HashMap::new();
    params.insert("series_id".to_string(), code.to_string());

    self.core.transport.get(FuncType::Series, params).await
  }

  /// Get raw observations, optionally bounded by start and end dates (inclusive)
  ///
  /// # Arguments
  ///
  /// * `code` - The series code
  /// * `start` - First observation date to return
  /// * `end` - Last observation date to return
  #[instrument(skip(self))]
  pub async fn get_series(
    &self,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  ) -> Result<ObservationsResponse> {
    let mut params = HashMap::new();
    params.insert("series_id".to_string(), code.to_string());

    if let Some(start) = start {
      params.insert("observation_start".to_string(), start.format(DATE_FORMAT).to_string());
    }

    if let Some(end) = end {
      params.insert("observation_end".to_string(), end.format(DATE_FORMAT).to_string());
    }

    self.core.transport.get(FuncType::SeriesObservations, params).await
  }

  /// Convert raw observations to the `(date, value)` frame
  ///
  /// Missing-value markers become missing values and those rows are dropped.
  pub fn series_to_frame(&self, raw: &ObservationsResponse) -> SeriesFrame {
    SeriesFrame::from_observations(&raw.observations)
  }
}
