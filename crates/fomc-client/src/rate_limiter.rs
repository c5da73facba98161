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

//! Rolling-window request limiter
//!
//! Keeps a log of the instants at which requests were released. Before a new
//! request is released, entries older than the window are discarded; if the
//! log is still full, the caller sleeps until the oldest entry leaves the
//! window. The log sits behind a mutex that is held across the sleep, so
//! concurrent callers are released one at a time and the ceiling holds no
//! matter how many tasks share the limiter.

use std::collections::VecDeque;
use std::num::NonZeroU32;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Allows at most `max_requests` releases in any rolling `window`
#[derive(Debug)]
pub struct SlidingWindowLimiter {
  max_requests: usize,
  window: Duration,
  log: Mutex<VecDeque<Instant>>,
}

impl SlidingWindowLimiter {
  /// Create a limiter with an explicit window
  pub fn new(max_requests: NonZeroU32, window: Duration) -> Self {
    let max_requests = max_requests.get() as usize;
    Self { max_requests, window, log: Mutex::new(VecDeque::with_capacity(max_requests)) }
  }

  /// Create a limiter allowing `requests_per_minute` in any trailing 60 seconds
  pub fn per_minute(requests_per_minute: NonZeroU32) -> Self {
    Self::new(requests_per_minute, Duration::from_secs(fomc_core::RATE_WINDOW_SECS))
  }

  /// Configured ceiling
  pub fn max_requests(&self) -> usize {
    self.max_requests
  }

  /// Configured window length
  pub fn window(&self) -> Duration {
    self.window
  }

  /// Wait until a request may be released, then record it
  pub async fn until_ready(&self) {
    let mut log = self.log.lock().await;

    loop {
      let now = Instant::now();
      Self::evict_expired(&mut log, now, self.window);

      if log.len() < self.max_requests {
        log.push_back(now);
        return;
      }

      let Some(&oldest) = log.front() else {
        // max_requests is non-zero, so a full log always has a front
        log.push_back(now);
        return;
      };

      let wait = self.window.saturating_sub(now.duration_since(oldest));
      debug!(
        "Rate limit reached ({} requests in {:?}), waiting {}ms",
        log.len(),
        self.window,
        wait.as_millis()
      );
      sleep(wait).await;
    }
  }

  /// Number of requests released within the trailing window
  pub async fn in_window(&self) -> usize {
    let mut log = self.log.lock().await;
    Self::evict_expired(&mut log, Instant::now(), self.window);
    log.len()
  }

  fn evict_expired(log: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&front) = log.front() {
      if now.duration_since(front) >= window {
        log.pop_front();
      } else {
        break;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;

  fn limiter(n: u32) -> SlidingWindowLimiter {
    SlidingWindowLimiter::per_minute(NonZeroU32::new(n).unwrap())
  }

  #[tokio::test(start_paused = true)]
  async fn test_requests_under_limit_do_not_wait() {
    let limiter = limiter(3);
    let start = Instant::now();
    for _ in 0..3 {
      limiter.until_ready().await;
    }
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(limiter.in_window().await, 3);
  }

  #[tokio::test(start_paused = true)]
  async fn test_blocks_until_oldest_leaves_window() {
    let limiter = limiter(3);
    let start = Instant::now();
    for _ in 0..3 {
      limiter.until_ready().await;
    }

    limiter.until_ready().await;
    assert!(start.elapsed() >= Duration::from_secs(60));
  }

  #[tokio::test(start_paused = true)]
  async fn test_no_more_than_limit_in_any_rolling_window() {
    let limiter = limiter(4);
    let mut released = Vec::new();

    for i in 0..13 {
      if i % 5 == 0 {
        sleep(Duration::from_secs(7)).await;
      }
      limiter.until_ready().await;
      released.push(Instant::now());
    }

    // any 5 consecutive releases must span at least a full window
    for pair in released.windows(5) {
      assert!(pair[4].duration_since(pair[0]) >= Duration::from_secs(60));
    }
  }

  #[tokio::test(start_paused = true)]
  async fn test_shared_between_tasks() {
    let limiter = Arc::new(limiter(2));
    let start = Instant::now();

    let handles: Vec<_> = (0..4)
      .map(|_| {
        let limiter = limiter.clone();
        tokio::spawn(async move {
          limiter.until_ready().await;
          Instant::now()
        })
      })
      .collect();

    let mut times = Vec::new();
    for handle in handles {
      times.push(handle.await.unwrap());
    }
    times.sort();

    assert!(times[1].duration_since(start) < Duration::from_secs(1));
    assert!(times[2].duration_since(start) >= Duration::from_secs(60));
    assert!(times[3].duration_since(start) >= Duration::from_secs(60));
  }

  #[tokio::test(start_paused = true)]
  async fn test_window_expiry_frees_capacity() {
    let limiter = limiter(1);
    limiter.until_ready().await;
    sleep(Duration::from_secs(61)).await;
    assert_eq!(limiter.in_window().await, 0);

    let start = Instant::now();
    limiter.until_ready().await;
    assert!(start.elapsed() < Duration::from_secs(1));
  }
}
