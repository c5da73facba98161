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

//! Run tracking for sync jobs
//! In-memory: one entry per started run, most recent last

use crate::{LoaderError, LoaderResult};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
  Running,
  Success,
  Failed,
  CompletedWithErrors,
}

impl fmt::Display for ProcessState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      ProcessState::Running => "running",
      ProcessState::Success => "success",
      ProcessState::Failed => "failed",
      ProcessState::CompletedWithErrors => "completed with errors",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Clone)]
pub struct ProcessInfo {
  pub process_name: String,
  pub start_time: DateTime<Utc>,
  pub end_time: Option<DateTime<Utc>>,
  pub state: ProcessState,
  pub error_message: Option<String>,
  pub records_processed: Option<usize>,
}

impl ProcessInfo {
  pub fn elapsed(&self) -> Option<chrono::Duration> {
    self.end_time.map(|end| end - self.start_time)
  }
}

/// In-memory process tracker
#[derive(Clone, Default)]
pub struct ProcessTracker {
  processes: Arc<Mutex<Vec<ProcessInfo>>>,
}

impl ProcessTracker {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn start(&self, process_name: &str) -> LoaderResult<()> {
    let mut processes = self.processes.lock().await;
    processes.push(ProcessInfo {
      process_name: process_name.to_string(),
      start_time: Utc::now(),
      end_time: None,
      state: ProcessState::Running,
      error_message: None,
      records_processed: None,
    });
    Ok(())
  }

  /// Close the most recent run
  pub async fn complete(
    &self,
    state: ProcessState,
    records_processed: usize,
    error_message: Option<String>,
  ) -> LoaderResult<()> {
    let mut processes = self.processes.lock().await;
    let last = processes
      .last_mut()
      .ok_or_else(|| LoaderError::ProcessTrackingError("no process started".to_string()))?;

    if last.state != ProcessState::Running {
      return Err(LoaderError::ProcessTrackingError(format!(
        "{} already finished as {}",
        last.process_name, last.state
      )));
    }

    last.state = state;
    last.end_time = Some(Utc::now());
    last.records_processed = Some(records_processed);
    last.error_message = error_message;
    Ok(())
  }

  pub async fn last(&self) -> Option<ProcessInfo> {
    self.processes.lock().await.last().cloned()
  }

  pub async fn get_all(&self) -> Vec<ProcessInfo> {
    self.processes.lock().await.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_start_and_complete() {
    let tracker = ProcessTracker::new();
    tracker.start("sync_all").await.unwrap();
    assert_eq!(tracker.last().await.unwrap().state, ProcessState::Running);

    tracker.complete(ProcessState::CompletedWithErrors, 41, Some("1 failed".to_string())).await.unwrap();

    let info = tracker.last().await.unwrap();
    assert_eq!(info.state, ProcessState::CompletedWithErrors);
    assert_eq!(info.records_processed, Some(41));
    assert_eq!(info.error_message.as_deref(), Some("1 failed"));
    assert!(info.elapsed().is_some());
  }

  #[tokio::test]
  async fn test_complete_without_start_fails() {
    let tracker = ProcessTracker::new();
    let err = tracker.complete(ProcessState::Success, 0, None).await.unwrap_err();
    assert!(matches!(err, LoaderError::ProcessTrackingError(_)));
  }

  #[tokio::test]
  async fn test_double_complete_fails() {
    let tracker = ProcessTracker::new();
    tracker.start("sync_indicator").await.unwrap();
    tracker.complete(ProcessState::Success, 1, None).await.unwrap();
    assert!(tracker.complete(ProcessState::Failed, 1, None).await.is_err());
  }

  #[tokio::test]
  async fn test_clones_share_history() {
    let tracker = ProcessTracker::new();
    let other = tracker.clone();
    tracker.start("a").await.unwrap();
    other.start("b").await.unwrap();

    let names: Vec<_> = tracker.get_all().await.into_iter().map(|p| p.process_name).collect();
    assert_eq!(names, vec!["a", "b"]);
  }

  #[test]
  fn test_state_display() {
    assert_eq!(ProcessState::CompletedWithErrors.to_string(), "completed with errors");
  }
}
