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

//! # fomc-models
//!
//! Data models for FRED API responses.
//!
//! This crate provides strongly-typed Rust structures for the two response
//! formats the indicator pipeline consumes: series metadata and series
//! observations, plus the cleaned `(date, value)` frame the loaders store.
//!
//! ## Usage
//!
//! ```ignore
//! use fomc_models::{ObservationsResponse, SeriesFrame};
//!
//! let raw: ObservationsResponse = serde_json::from_str(&response_json)?;
//! let frame = SeriesFrame::from_observations(&raw.observations);
//! ```

#![warn(clippy::all)]

pub mod common;
pub mod observations;
pub mod series;

// Re-export common types for convenience
pub use common::*;

// Re-export all model types
pub use observations::*;
pub use series::*;
