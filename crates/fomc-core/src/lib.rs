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

pub mod config;
pub mod error;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};

/// The remote API endpoints used by the indicator pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuncType {
  /// Series metadata (title, frequency, units, seasonal adjustment, last update)
  Series,
  /// Observations of a series between two dates
  SeriesObservations,
}

impl FuncType {
  /// Path segment appended to the base URL
  pub fn path(&self) -> &'static str {
    match self {
      FuncType::Series => "series",
      FuncType::SeriesObservations => "series/observations",
    }
  }
}

impl std::fmt::Display for FuncType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.path())
  }
}

/// Base URL for the FRED API
pub const FRED_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// API rate limits
pub const DEFAULT_RATE_LIMIT: u32 = 30; // requests per minute
pub const MAX_RATE_LIMIT: u32 = 120; // documented FRED ceiling

/// Upper bound on FRED_MAX_RETRIES
pub const MAX_RETRIES: u32 = 10;

/// Length of the rolling rate-limit window in seconds
pub const RATE_WINDOW_SECS: u64 = 60;

/// Fallback start date for an indicator that has never been synced
pub const DEFAULT_START_DATE: &str = "2010-01-01";

/// Date format used by the API for observation dates and query bounds
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_func_type_paths() {
    assert_eq!(FuncType::Series.to_string(), "series");
    assert_eq!(FuncType::SeriesObservations.to_string(), "series/observations");
  }

  #[test]
  fn test_default_start_date_parses() {
    let parsed = chrono::NaiveDate::parse_from_str(DEFAULT_START_DATE, DATE_FORMAT);
    assert!(parsed.is_ok());
  }
}
