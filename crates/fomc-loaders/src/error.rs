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

use fomc_database_sqlite::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LoaderError {
  #[error("API error: {0}")]
  ApiError(String),

  #[error("CSV parsing error: {0}")]
  CsvError(String),

  #[error("Spreadsheet error: {0}")]
  SpreadsheetError(String),

  #[error("Definition sheet error: {0}")]
  DefinitionError(String),

  #[error("IO error: {0}")]
  IoError(String),

  #[error("Serialization error: {0}")]
  SerializationError(String),

  #[error("Database error: {0}")]
  DatabaseError(String),

  #[error("Invalid data: {0}")]
  InvalidData(String),

  #[error("Process tracking error: {0}")]
  ProcessTrackingError(String),

  #[error("Configuration error: {0}")]
  ConfigurationError(String),
}

// Implement conversions manually
impl From<csv::Error> for LoaderError {
  fn from(err: csv::Error) -> Self {
    LoaderError::CsvError(err.to_string())
  }
}

impl From<calamine::Error> for LoaderError {
  fn from(err: calamine::Error) -> Self {
    LoaderError::SpreadsheetError(err.to_string())
  }
}

impl From<std::io::Error> for LoaderError {
  fn from(err: std::io::Error) -> Self {
    LoaderError::IoError(err.to_string())
  }
}

impl From<serde_json::Error> for LoaderError {
  fn from(err: serde_json::Error) -> Self {
    LoaderError::SerializationError(err.to_string())
  }
}

impl From<fomc_core::Error> for LoaderError {
  fn from(err: fomc_core::Error) -> Self {
    LoaderError::ApiError(err.to_string())
  }
}

impl From<diesel::result::Error> for LoaderError {
  fn from(err: diesel::result::Error) -> Self {
    LoaderError::DatabaseError(err.to_string())
  }
}

impl From<RepositoryError> for LoaderError {
  fn from(err: RepositoryError) -> Self {
    LoaderError::DatabaseError(err.to_string())
  }
}

pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_loader_error_display_api_error() {
    let err = LoaderError::ApiError("connection failed".to_string());
    assert_eq!(err.to_string(), "API error: connection failed");
  }

  #[test]
  fn test_loader_error_display_definition_error() {
    let err = LoaderError::DefinitionError("missing column FRED 代码".to_string());
    assert_eq!(err.to_string(), "Definition sheet error: missing column FRED 代码");
  }

  #[test]
  fn test_loader_error_display_database_error() {
    let err = LoaderError::DatabaseError("database is locked".to_string());
    assert_eq!(err.to_string(), "Database error: database is locked");
  }

  #[test]
  fn test_loader_error_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = LoaderError::from(io_err);
    assert!(matches!(err, LoaderError::IoError(_)));
    assert!(err.to_string().contains("file missing"));
  }

  #[test]
  fn test_loader_error_from_serde_json_error() {
    let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
    let err = LoaderError::from(json_err);
    assert!(matches!(err, LoaderError::SerializationError(_)));
  }

  #[test]
  fn test_loader_error_from_core_error() {
    let core_err = fomc_core::Error::Api("Bad Request.  The series does not exist.".to_string());
    let err = LoaderError::from(core_err);
    assert!(matches!(err, LoaderError::ApiError(_)));
    assert!(err.to_string().contains("series does not exist"));
  }

  #[test]
  fn test_loader_error_from_repository_error() {
    let repo_err = RepositoryError::ConstraintViolation("UNIQUE constraint failed".to_string());
    let err = LoaderError::from(repo_err);
    assert!(matches!(err, LoaderError::DatabaseError(_)));
    assert!(err.to_string().contains("UNIQUE"));
  }

  #[test]
  fn test_loader_error_clone() {
    let err = LoaderError::ApiError("test".to_string());
    let cloned = err.clone();
    assert_eq!(err.to_string(), cloned.to_string());
  }
}
