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

use anyhow::{Context, Result};
use fomc_core::Config as CoreConfig;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATABASE_URL: &str = "fomc_data.db";
pub const DEFAULT_INDICATOR_SHEET: &str = "docs/US Economic Indicators with FRED Codes.xlsx";

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub indicator_sheet: PathBuf,
  pub membership_file: Option<PathBuf>,
  pub utc_offset_hours: i32,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();

    let database_url =
      env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

    let indicator_sheet = env::var("INDICATOR_SHEET")
      .map(PathBuf::from)
      .unwrap_or_else(|_| PathBuf::from(DEFAULT_INDICATOR_SHEET));

    let membership_file = env::var("FOMC_MEMBERSHIP_FILE").ok().map(PathBuf::from);

    let utc_offset_hours = match env::var("FOMC_UTC_OFFSET_HOURS") {
      Ok(raw) => raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid FOMC_UTC_OFFSET_HOURS: {}", raw))?,
      Err(_) => fomc_loaders::loader::DEFAULT_UTC_OFFSET_HOURS,
    };

    Ok(Self { database_url, indicator_sheet, membership_file, utc_offset_hours })
  }

  /// API settings, only needed by commands that talk to FRED
  pub fn api_config(&self) -> Result<CoreConfig> {
    CoreConfig::from_env().context("FRED API configuration is incomplete")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn clear() {
    for key in ["DATABASE_URL", "INDICATOR_SHEET", "FOMC_MEMBERSHIP_FILE", "FOMC_UTC_OFFSET_HOURS"] {
      env::remove_var(key);
    }
  }

  #[test]
  #[serial]
  fn test_defaults() {
    clear();
    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.indicator_sheet, PathBuf::from(DEFAULT_INDICATOR_SHEET));
    assert_eq!(config.membership_file, None);
    assert_eq!(config.utc_offset_hours, -5);
  }

  #[test]
  #[serial]
  fn test_overrides() {
    clear();
    env::set_var("DATABASE_URL", "/tmp/other.db");
    env::set_var("FOMC_MEMBERSHIP_FILE", "membership.json");
    env::set_var("FOMC_UTC_OFFSET_HOURS", "8");
    let config = Config::from_env().unwrap();
    assert_eq!(config.database_url, "/tmp/other.db");
    assert_eq!(config.membership_file, Some(PathBuf::from("membership.json")));
    assert_eq!(config.utc_offset_hours, 8);
    clear();
  }

  #[test]
  #[serial]
  fn test_bad_offset() {
    clear();
    env::set_var("FOMC_UTC_OFFSET_HOURS", "east");
    assert!(Config::from_env().is_err());
    clear();
  }
}
