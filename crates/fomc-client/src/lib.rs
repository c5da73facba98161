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

//! # fomc-client
//!
//! A pure FRED API client for Rust with no database dependencies.
//!
//! ## Features
//!
//! - **Rate Limiting**: a trailing 60-second request log; no more than the
//!   configured number of requests leave the client in any rolling minute
//! - **Retries**: transport failures are retried with exponential backoff,
//!   every attempt passing through the limiter
//! - **Type Safe**: strongly typed responses using fomc-models
//! - **Configurable**: environment-based configuration via fomc-core
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fomc_client::FredClient;
//! use fomc_core::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let client = FredClient::new(config)?;
//!
//!     let info = client.series().get_series_info("PAYEMS").await?;
//!     let raw = client.series().get_series("PAYEMS", None, None).await?;
//!     let frame = client.series().series_to_frame(&raw);
//!     println!("{:?}: {} points", info.into_first().map(|s| s.title), frame.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All methods return `Result<T, fomc_core::Error>` for consistent error handling
//! across the fomc-* crates.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod endpoints;
pub mod provider;
pub mod rate_limiter;
pub mod transport;

// Re-export the main client and common types
pub use client::FredClient;
pub use fomc_core::{Config, Error, Result};
pub use fomc_models::*;
pub use provider::SeriesProvider;
pub use rate_limiter::SlidingWindowLimiter;

// Re-export endpoint modules for direct access if needed
pub use endpoints::series::SeriesEndpoints;
