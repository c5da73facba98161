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

//! # fomc-loaders
//!
//! The indicator synchronisation pipeline.
//!
//! - Indicator definitions from the spreadsheet (`.xlsx` or CSV export)
//! - Category hierarchy reconciliation
//! - Indicator metadata upsert
//! - Incremental observation updates
//! - Per-indicator orchestration with a run summary

pub mod category_reconciler;
pub mod data_point_updater;
pub mod definition_source;
pub mod error;
pub mod indicator_upserter;
pub mod loader;
pub mod membership;
pub mod process_tracker;
pub mod sync_pipeline;

// Re-export commonly used types
pub use category_reconciler::CategoryReconciler;
pub use data_point_updater::{update_indicator_data, FetchWindow};
pub use definition_source::{fold_rows, read_definitions, IndicatorRecord, SheetRow};
pub use error::{LoaderError, LoaderResult};
pub use indicator_upserter::{upsert_indicator, UpsertAction, UpsertOutcome};
pub use loader::{LoaderConfig, LoaderContext, SyncOptions};
pub use membership::Membership;
pub use process_tracker::{ProcessInfo, ProcessState, ProcessTracker};
pub use sync_pipeline::{IndicatorOutcome, IndicatorReport, IndicatorState, SyncPipeline, SyncSummary};

// Prelude for convenient imports
pub mod prelude {
  pub use crate::{
    IndicatorOutcome, IndicatorRecord, LoaderConfig, LoaderContext, LoaderError, LoaderResult,
    Membership, ProcessState, ProcessTracker, SyncOptions, SyncPipeline, SyncSummary,
  };
}
