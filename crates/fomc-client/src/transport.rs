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

//! HTTP transport layer for FRED API requests

use crate::rate_limiter::SlidingWindowLimiter;
use fomc_core::{Config, Error, FuncType, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// HTTP transport layer for making requests to the FRED API
pub struct Transport {
  client: Client,
  base_url: String,
  api_key: String,
  timeout: Duration,
  max_retries: u32,
  rate_limiter: Arc<SlidingWindowLimiter>,
}

impl Transport {
  /// Create a new transport instance
  pub fn new(config: &Config, rate_limiter: Arc<SlidingWindowLimiter>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent("fomc-client/0.1.0")
      .build()
      .map_err(|e| Error::Http(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      client,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      api_key: config.api_key.clone(),
      timeout: Duration::from_secs(config.timeout_secs),
      max_retries: config.max_retries,
      rate_limiter,
    })
  }

  /// Create a mock transport for testing
  #[cfg(test)]
  pub fn new_mock() -> Self {
    Self {
      client: Client::new(),
      base_url: "https://mock.stlouisfed.org/fred".to_string(),
      api_key: "test_key".to_string(),
      timeout: Duration::from_secs(30),
      max_retries: 3,
      rate_limiter: Arc::new(SlidingWindowLimiter::per_minute(
        std::num::NonZeroU32::new(120).unwrap(),
      )),
    }
  }

  /// Make a GET request to the FRED API
  ///
  /// # Arguments
  ///
  /// * `function` - The API endpoint to call
  /// * `params` - Additional query parameters for the request
  ///
  /// # Returns
  ///
  /// Returns a `Result` containing the deserialized response or an error.
  /// Every attempt, retries included, waits on the rate limiter first.
  #[instrument(skip(self, params), fields(function = %function))]
  pub async fn get<T>(&self, function: FuncType, params: HashMap<String, String>) -> Result<T>
  where
    T: DeserializeOwned,
  {
    let url = self.build_url(function, params)?;
    debug!("Making request to: {}", Self::redact(&url));

    let mut attempt = 0;
    let mut last_error = None;

    while attempt <= self.max_retries {
      if attempt > 0 {
        let delay = Self::backoff_delay(attempt);
        warn!("Retrying request in {}ms (attempt {})", delay.as_millis(), attempt + 1);
        tokio::time::sleep(delay).await;
      }

      self.rate_limiter.until_ready().await;

      match self.make_request(&url).await {
        Ok(text) => {
          debug!("Response body length: {} bytes", text.len());

          self.check_api_error(&text)?;

          return match serde_json::from_str::<T>(&text) {
            Ok(data) => {
              info!("Successfully parsed response for function: {}", function);
              Ok(data)
            }
            Err(e) => {
              error!("Failed to parse JSON response: {}", e);
              Err(Error::Parse(format!(
                "Failed to parse response: {}. Response: {}",
                e,
                Self::preview(&text, 200)
              )))
            }
          };
        }
        // the API rejected the request itself; asking again will not help
        Err(e @ Error::Api(_)) | Err(e @ Error::ApiKey(_)) => return Err(e),
        Err(e) => {
          warn!("Request failed (attempt {}): {}", attempt + 1, e);
          last_error = Some(e);
          attempt += 1;
        }
      }
    }

    Err(last_error.unwrap_or_else(|| Error::Http("Max retries exceeded".to_string())))
  }

  /// Build the full URL for an API request
  fn build_url(&self, function: FuncType, mut params: HashMap<String, String>) -> Result<String> {
    let mut url = Url::parse(&format!("{}/{}", self.base_url, function.path()))
      .map_err(|e| Error::Http(format!("Invalid base URL: {}", e)))?;

    params.insert("api_key".to_string(), self.api_key.clone());
    params.insert("file_type".to_string(), "json".to_string());

    // sorted so the same request always yields the same URL
    let mut pairs: Vec<_> = params.into_iter().collect();
    pairs.sort();
    {
      let mut query_pairs = url.query_pairs_mut();
      for (key, value) in pairs {
        query_pairs.append_pair(&key, &value);
      }
    }

    Ok(url.to_string())
  }

  /// Make the actual HTTP request and return the body
  async fn make_request(&self, url: &str) -> Result<String> {
    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let status = response.status();
    let text = response
      .text()
      .await
      .map_err(|e| Error::Http(format!("Failed to read response body: {}", e)))?;

    if status.is_success() {
      debug!("Request successful with status: {}", status);
      return Ok(text);
    }

    error!("Request failed with status: {}", status);
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
      return Err(Error::RateLimit(format!("HTTP {}", status)));
    }
    if status.is_client_error() {
      if let Some(message) = Self::api_error_message(&text) {
        return Err(Error::Api(message));
      }
    }
    Err(Error::Http(format!("HTTP error: {}", status)))
  }

  /// Check for FRED error messages in a successful response body
  fn check_api_error(&self, response_text: &str) -> Result<()> {
    if let Some(message) = Self::api_error_message(response_text) {
      if message.to_lowercase().contains("api_key") {
        return Err(Error::ApiKey(message));
      }
      return Err(Error::Api(message));
    }
    Ok(())
  }

  /// Exponential backoff, saturating instead of overflowing
  fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2_u64.checked_pow(attempt).unwrap_or(u64::MAX);
    Duration::from_millis(secs.saturating_mul(1000))
  }

  fn api_error_message(response_text: &str) -> Option<String> {
    if !response_text.contains("error_message") {
      return None;
    }
    serde_json::from_str::<serde_json::Value>(response_text)
      .ok()
      .and_then(|v| v.get("error_message").and_then(|m| m.as_str()).map(str::to_string))
  }

  fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
  }

  fn redact(url: &str) -> String {
    match Url::parse(url) {
      Ok(mut parsed) => {
        let pairs: Vec<(String, String)> = parsed
          .query_pairs()
          .map(|(k, v)| {
            let v = if k == "api_key" { "***".to_string() } else { v.into_owned() };
            (k.into_owned(), v)
          })
          .collect();
        parsed.query_pairs_mut().clear().extend_pairs(pairs);
        parsed.to_string()
      }
      Err(_) => url.to_string(),
    }
  }

  /// Get the base URL being used
  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// Get request timeout duration
  pub fn timeout(&self) -> Duration {
    self.timeout
  }
}

impl std::fmt::Debug for Transport {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Transport")
      .field("base_url", &self.base_url)
      .field("timeout", &self.timeout)
      .field("max_retries", &self.max_retries)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  #[test]
  fn test_backoff_delay_grows_and_saturates() {
    assert_eq!(Transport::backoff_delay(1), Duration::from_secs(2));
    assert_eq!(Transport::backoff_delay(3), Duration::from_secs(8));
    assert_eq!(Transport::backoff_delay(55), Duration::from_millis(u64::MAX));
    assert_eq!(Transport::backoff_delay(64), Duration::from_millis(u64::MAX));
  }

  #[test]
  fn test_build_url() {
    let transport = Transport::new_mock();
    let mut params = HashMap::new();
    params.insert("series_id".to_string(), "PAYEMS".to_string());

    let url = transport.build_url(FuncType::SeriesObservations, params).unwrap();

    assert!(url.starts_with("https://mock.stlouisfed.org/fred/series/observations?"));
    assert!(url.contains("series_id=PAYEMS"));
    assert!(url.contains("api_key=test_key"));
    assert!(url.contains("file_type=json"));
  }

  #[test]
  fn test_redact_hides_key() {
    let transport = Transport::new_mock();
    let url = transport.build_url(FuncType::Series, HashMap::new()).unwrap();
    let redacted = Transport::redact(&url);
    assert!(!redacted.contains("test_key"));
    assert!(redacted.contains("api_key=***") || redacted.contains("api_key=%2A%2A%2A"));
  }

  #[test]
  fn test_check_api_error_bad_series() {
    let transport = Transport::new_mock();
    let response =
      r#"{"error_code":400,"error_message":"Bad Request.  The series does not exist."}"#;

    match transport.check_api_error(response) {
      Err(Error::Api(msg)) => assert!(msg.contains("does not exist")),
      other => panic!("Expected Api error, got {:?}", other),
    }
  }

  #[test]
  fn test_check_api_error_invalid_key() {
    let transport = Transport::new_mock();
    let response = r#"{"error_code":400,"error_message":"Bad Request.  The value for variable api_key is not registered."}"#;

    assert!(matches!(transport.check_api_error(response), Err(Error::ApiKey(_))));
  }

  #[test]
  fn test_check_api_error_success() {
    let transport = Transport::new_mock();
    let response = r#"{"observations": []}"#;

    assert!(transport.check_api_error(response).is_ok());
  }
}
