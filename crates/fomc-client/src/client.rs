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

//! The FRED client facade

use crate::endpoints::series::SeriesEndpoints;
use crate::rate_limiter::SlidingWindowLimiter;
use crate::transport::Transport;
use fomc_core::{Config, Error, Result};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Main FRED API client
///
/// Provides access to the FRED endpoints through organized endpoint modules.
/// Handles authentication, rate limiting, and transport concerns automatically.
///
/// # Examples
///
/// ```ignore
/// use fomc_client::FredClient;
/// use fomc_core::Config;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::from_env()?;
///     let client = FredClient::new(config)?;
///
///     let info = client.series().get_series_info("PAYEMS").await?;
///     println!("{:?}", info.into_first().map(|s| s.units));
///
///     Ok(())
/// }
/// ```
pub struct FredClient {
  rate_limiter: Arc<SlidingWindowLimiter>,
  transport: Arc<Transport>,
}

impl FredClient {
  /// Create a new FRED API client
  ///
  /// # Arguments
  ///
  /// * `config` - Configuration containing API key and other settings
  ///
  /// # Errors
  ///
  /// Returns an error if the settings fail validation or the HTTP client cannot be created.
  pub fn new(config: Config) -> Result<Self> {
    config.validate()?;
    let rate_limit = NonZeroU32::new(config.rate_limit).ok_or_else(|| {
      Error::Config("rate limit must be at least 1 request per minute".to_string())
    })?;
    let rate_limiter = Arc::new(SlidingWindowLimiter::per_minute(rate_limit));

    Self::with_rate_limiter(config, rate_limiter)
  }

  /// Create a new client with custom rate limiting
  ///
  /// # Arguments
  ///
  /// * `config` - Configuration containing API key and other settings
  /// * `rate_limiter` - Limiter instance, possibly shared with other clients
  ///
  /// # Errors
  ///
  /// Returns an error if the HTTP client cannot be created.
  pub fn with_rate_limiter(config: Config, rate_limiter: Arc<SlidingWindowLimiter>) -> Result<Self> {
    let transport = Arc::new(Transport::new(&config, rate_limiter.clone())?);
    Ok(Self { transport, rate_limiter })
  }

  /// Get access to series endpoints
  ///
  /// Returns a `SeriesEndpoints` instance for series metadata and observations.
  pub fn series(&self) -> SeriesEndpoints {
    SeriesEndpoints::new(self.transport.clone())
  }

  /// Get the current rate limit status
  ///
  /// Returns the number of requests released in the trailing window and the
  /// configured ceiling.
  pub async fn rate_limit_status(&self) -> (usize, usize) {
    (self.rate_limiter.in_window().await, self.rate_limiter.max_requests())
  }
}

impl std::fmt::Debug for FredClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FredClient")
      .field("transport", &self.transport)
      .field("rate_limiter", &self.rate_limiter)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_client_creation() {
    let config = Config {
      api_key: "test_key".to_string(),
      rate_limit: 30,
      timeout_secs: 30,
      max_retries: 3,
      base_url: fomc_core::FRED_BASE_URL.to_string(),
    };

    let client = FredClient::new(config).expect("Failed to create client");
    let (used, ceiling) = client.rate_limit_status().await;
    assert_eq!(used, 0);
    assert_eq!(ceiling, 30);
  }

  #[test]
  fn test_zero_rate_limit_rejected() {
    let config = Config::default_with_key("test_key".to_string()).with_rate_limit(0);
    assert!(matches!(FredClient::new(config), Err(Error::Config(_))));
  }

  #[test]
  fn test_excessive_retries_rejected() {
    let mut config = Config::default_with_key("test_key".to_string());
    config.max_retries = 60;
    assert!(matches!(FredClient::new(config), Err(Error::Config(_))));
  }
}
