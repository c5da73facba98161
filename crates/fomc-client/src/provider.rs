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

//! The seam between the loaders and the remote API

use crate::client::FredClient;
use async_trait::async_trait;
use chrono::NaiveDate;
use fomc_core::Result;
use fomc_models::{SeriesFrame, SeriesInfo};
use tracing::debug;

/// Source of series metadata and observations
#[async_trait]
pub trait SeriesProvider: Send + Sync {
  /// Metadata for a series; `Ok(None)` when the API knows nothing about it
  async fn series_info(&self, code: &str) -> Result<Option<SeriesInfo>>;

  /// Cleaned observations between `start` and `end` inclusive
  async fn observations(
    &self,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  ) -> Result<SeriesFrame>;
}

#[async_trait]
impl SeriesProvider for FredClient {
  async fn series_info(&self, code: &str) -> Result<Option<SeriesInfo>> {
    let response = self.series().get_series_info(code).await?;
    Ok(response.into_first())
  }

  async fn observations(
    &self,
    code: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
  ) -> Result<SeriesFrame> {
    let endpoints = self.series();
    let raw = endpoints.get_series(code, start, end).await?;
    let frame = endpoints.series_to_frame(&raw);
    debug!(
      "{}: {} observations, {} usable, {} dropped",
      code,
      raw.observations.len(),
      frame.len(),
      frame.dropped
    );
    Ok(frame)
  }
}
