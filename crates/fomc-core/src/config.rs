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

//! Configuration management for the FRED client

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// Main configuration struct for the FRED client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
  /// FRED API key
  pub api_key: String,

  /// API rate limit (requests per minute)
  pub rate_limit: u32,

  /// Request timeout in seconds
  pub timeout_secs: u64,

  /// Maximum retries for failed requests
  pub max_retries: u32,

  /// Base URL for the FRED API
  pub base_url: String,
}

impl Config {
  /// Load configuration from environment variables
  pub fn from_env() -> Result<Self> {
    dotenv().ok();

    let api_key =
      env::var("FRED_API_KEY").map_err(|_| Error::ApiKey("FRED_API_KEY not set".to_string()))?;

    let rate_limit = env::var("FRED_RATE_LIMIT")
      .unwrap_or_else(|_| crate::DEFAULT_RATE_LIMIT.to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid FRED_RATE_LIMIT".to_string()))?;

    let timeout_secs = env::var("FRED_TIMEOUT_SECS")
      .unwrap_or_else(|_| "30".to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid FRED_TIMEOUT_SECS".to_string()))?;

    let max_retries = env::var("FRED_MAX_RETRIES")
      .unwrap_or_else(|_| "3".to_string())
      .parse()
      .map_err(|_| Error::Config("Invalid FRED_MAX_RETRIES".to_string()))?;

    let base_url = env::var("FRED_BASE_URL").unwrap_or_else(|_| crate::FRED_BASE_URL.to_string());

    let config = Config { api_key, rate_limit, timeout_secs, max_retries, base_url };
    config.validate()?;
    Ok(config)
  }

  /// Create a config with default values (for testing)
  pub fn default_with_key(api_key: String) -> Self {
    Config {
      api_key,
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      timeout_secs: 30,
      max_retries: 3,
      base_url: crate::FRED_BASE_URL.to_string(),
    }
  }

  /// Override the requests-per-minute ceiling
  pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
    self.rate_limit = rate_limit;
    self
  }

  /// Reject settings the client cannot work with
  pub fn validate(&self) -> Result<()> {
    if self.api_key.trim().is_empty() {
      return Err(Error::ApiKey("FRED_API_KEY is empty".to_string()));
    }
    if self.rate_limit == 0 {
      return Err(Error::Config("rate limit must be at least 1 request per minute".to_string()));
    }
    if self.max_retries > crate::MAX_RETRIES {
      return Err(Error::Config(format!(
        "max retries {} exceeds {}",
        self.max_retries,
        crate::MAX_RETRIES
      )));
    }
    Url::parse(&self.base_url)
      .map_err(|e| Error::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_config_from_env() {
    env::set_var("FRED_API_KEY", "test_key");
    env::remove_var("FRED_RATE_LIMIT");
    let config = Config::from_env().unwrap();
    assert_eq!(config.api_key, "test_key");
    assert_eq!(config.rate_limit, 30);
  }

  #[test]
  #[serial]
  fn test_config_rejects_bad_rate_limit() {
    env::set_var("FRED_API_KEY", "test_key");
    env::set_var("FRED_RATE_LIMIT", "fast");
    let result = Config::from_env();
    env::remove_var("FRED_RATE_LIMIT");
    assert!(matches!(result, Err(Error::Config(_))));
  }

  #[test]
  fn test_validate_zero_rate_limit() {
    let config = Config::default_with_key("k".to_string()).with_rate_limit(0);
    assert!(matches!(config.validate(), Err(Error::Config(_))));
  }

  #[test]
  fn test_validate_caps_retries() {
    let mut config = Config::default_with_key("k".to_string());
    config.max_retries = crate::MAX_RETRIES;
    assert!(config.validate().is_ok());
    config.max_retries = 64;
    assert!(matches!(config.validate(), Err(Error::Config(_))));
  }

  #[test]
  fn test_validate_bad_base_url() {
    let mut config = Config::default_with_key("k".to_string());
    config.base_url = "not a url".to_string();
    assert!(config.validate().is_err());
  }
}
