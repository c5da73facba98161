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

//! Parsing helpers shared by the FRED response models

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// The API's documented marker for a missing observation
pub const MISSING_VALUE_MARKER: &str = ".";

/// Parse an observation value, coercing missing-data markers to `None`.
///
/// Anything that is not a finite number is treated as missing; it is never
/// read as zero.
pub fn parse_observation_value(raw: &str) -> Option<f64> {
  let trimmed = raw.trim();
  if trimmed.is_empty() || trimmed == MISSING_VALUE_MARKER {
    return None;
  }
  trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an observation date in `YYYY-MM-DD` form
pub fn parse_observation_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Parse the series `last_updated` stamp into a UTC timestamp.
///
/// The API reports e.g. `2024-03-08 07:47:02-06`; the offset may omit minutes.
pub fn parse_last_updated(raw: &str) -> Option<NaiveDateTime> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }
  if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%#z") {
    return Some(ts.naive_utc());
  }
  NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use fomc_core::test_utils::{assert_approx_eq, DEFAULT_TOLERANCE};

  #[test]
  fn test_missing_marker_is_none() {
    assert_eq!(parse_observation_value("."), None);
    assert_eq!(parse_observation_value(""), None);
    assert_eq!(parse_observation_value("n/a"), None);
    assert_eq!(parse_observation_value("NaN"), None);
  }

  #[test]
  fn test_numeric_values() {
    assert_approx_eq(parse_observation_value("157000").unwrap(), 157000.0, DEFAULT_TOLERANCE);
    assert_approx_eq(parse_observation_value(" 3.7 ").unwrap(), 3.7, DEFAULT_TOLERANCE);
    assert_approx_eq(parse_observation_value("-0.25").unwrap(), -0.25, DEFAULT_TOLERANCE);
  }

  #[test]
  fn test_last_updated_with_hour_offset() {
    let ts = parse_last_updated("2024-03-08 07:47:02-06").unwrap();
    assert_eq!(ts.to_string(), "2024-03-08 13:47:02");
  }

  #[test]
  fn test_last_updated_without_offset() {
    let ts = parse_last_updated("2024-03-08 07:47:02").unwrap();
    assert_eq!(ts.to_string(), "2024-03-08 07:47:02");
    assert!(parse_last_updated("yesterday").is_none());
  }

  #[test]
  fn test_observation_date() {
    assert_eq!(parse_observation_date("2024-02-01"), NaiveDate::from_ymd_opt(2024, 2, 1));
    assert_eq!(parse_observation_date("02/01/2024"), None);
  }
}
