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

//! Endpoint groups exposed by [`FredClient`](crate::FredClient)

pub mod series;

use crate::transport::Transport;
use std::sync::Arc;

/// Common endpoint structure
///
/// Endpoint modules share the transport, which owns the rate limiter, so
/// every group draws from the same request budget.
#[derive(Debug, Clone)]
pub struct EndpointCore {
  /// Shared transport
  pub transport: Arc<Transport>,
}

impl EndpointCore {
  /// Create a new endpoint core
  pub fn new(transport: Arc<Transport>) -> Self {
    Self { transport }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_core_creation() {
    let transport = Arc::new(Transport::new_mock());
    let core = EndpointCore::new(transport);

    assert_eq!(core.transport.base_url(), "https://mock.stlouisfed.org/fred");
  }
}
