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

//! Database repository layer
//!
//! Error type shared by the storage crate, per-unit transaction control for the
//! sync pipeline, and the read-only status report.

use chrono::NaiveDate;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use log::error;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{EconomicDataPoint, EconomicIndicator, IndicatorCategory};

/// Database repository errors
#[derive(Error, Debug)]
pub enum RepositoryError {
  #[error("Connection error: {0}")]
  ConnectionError(String),

  #[error("Database query error: {0}")]
  QueryError(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Constraint violation: {0}")]
  ConstraintViolation(String),

  #[error("Transaction error: {0}")]
  TransactionError(String),

  #[error("Migration error: {0}")]
  MigrationError(String),
}

impl From<DieselError> for RepositoryError {
  fn from(err: DieselError) -> Self {
    match err {
      DieselError::NotFound => RepositoryError::NotFound("Record not found".to_string()),
      DieselError::DatabaseError(kind, info) => match kind {
        diesel::result::DatabaseErrorKind::UniqueViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        diesel::result::DatabaseErrorKind::ForeignKeyViolation => {
          RepositoryError::ConstraintViolation(info.message().to_string())
        }
        _ => RepositoryError::QueryError(info.message().to_string()),
      },
      _ => RepositoryError::QueryError(err.to_string()),
    }
  }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Open a transaction that spans async work.
///
/// `Connection::transaction` takes a synchronous closure, so a unit of work
/// that awaits remote calls between writes is bracketed with
/// [`begin_unit`], [`commit_unit`] and [`rollback_unit`] instead.
pub fn begin_unit(conn: &mut SqliteConnection) -> RepositoryResult<()> {
  AnsiTransactionManager::begin_transaction(conn)
    .map_err(|e| RepositoryError::TransactionError(format!("begin: {}", e)))
}

pub fn commit_unit(conn: &mut SqliteConnection) -> RepositoryResult<()> {
  AnsiTransactionManager::commit_transaction(conn)
    .map_err(|e| RepositoryError::TransactionError(format!("commit: {}", e)))
}

pub fn rollback_unit(conn: &mut SqliteConnection) -> RepositoryResult<()> {
  AnsiTransactionManager::rollback_transaction(conn).map_err(|e| {
    error!("Rollback failed: {}", e);
    RepositoryError::TransactionError(format!("rollback: {}", e))
  })
}

/// One category with its direct indicator count
#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatus {
  pub id: i32,
  pub name: String,
  pub parent_id: Option<i32>,
  pub level: i32,
  pub sort_order: i32,
  pub indicators: usize,
}

/// One indicator with its stored observation summary
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorStatus {
  pub id: i32,
  pub code: String,
  pub name: String,
  pub category_id: i32,
  pub points: i64,
  pub latest: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStatus {
  pub categories: Vec<CategoryStatus>,
  pub indicators: Vec<IndicatorStatus>,
  pub total_points: i64,
}

impl DatabaseStatus {
  /// Indicators that have never received data
  pub fn empty_indicators(&self) -> impl Iterator<Item = &IndicatorStatus> {
    self.indicators.iter().filter(|i| i.points == 0)
  }

  /// Children of `parent` in sort order, `None` for the roots
  pub fn children_of(&self, parent: Option<i32>) -> Vec<&CategoryStatus> {
    let mut children: Vec<_> = self.categories.iter().filter(|c| c.parent_id == parent).collect();
    children.sort_by_key(|c| (c.sort_order, c.id));
    children
  }
}

/// Collect category, indicator and observation counts
pub fn database_status(conn: &mut SqliteConnection) -> RepositoryResult<DatabaseStatus> {
  let categories = IndicatorCategory::all_ordered(conn)?;
  let indicators = EconomicIndicator::all_ordered(conn)?;
  let summary: HashMap<i32, (i64, Option<NaiveDate>)> = EconomicDataPoint::summary_by_indicator(conn)?
    .into_iter()
    .map(|(id, count, latest)| (id, (count, latest)))
    .collect();

  let mut per_category: HashMap<i32, usize> = HashMap::new();
  for indicator in &indicators {
    *per_category.entry(indicator.category_id).or_default() += 1;
  }

  let categories = categories
    .into_iter()
    .map(|c| CategoryStatus {
      indicators: per_category.get(&c.id).copied().unwrap_or(0),
      id: c.id,
      name: c.name,
      parent_id: c.parent_id,
      level: c.level,
      sort_order: c.sort_order,
    })
    .collect();

  let indicators: Vec<IndicatorStatus> = indicators
    .into_iter()
    .map(|i| {
      let (points, latest) = summary.get(&i.id).copied().unwrap_or((0, None));
      IndicatorStatus { id: i.id, code: i.code, name: i.name, category_id: i.category_id, points, latest }
    })
    .collect();

  let total_points = indicators.iter().map(|i| i.points).sum();

  Ok(DatabaseStatus { categories, indicators, total_points })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::connection::establish_connection;
  use crate::models::{NewEconomicDataPoint, NewEconomicIndicator, NewIndicatorCategory};

  fn indicator<'a>(code: &'a str, category_id: i32) -> NewEconomicIndicator<'a> {
    NewEconomicIndicator {
      name: code,
      english_name: None,
      code,
      description: None,
      frequency: None,
      units: None,
      seasonal_adjustment: None,
      last_updated: None,
      category_id,
    }
  }

  #[test]
  fn test_repository_error_conversion() {
    let diesel_error = DieselError::NotFound;
    let repo_error: RepositoryError = diesel_error.into();

    assert!(matches!(repo_error, RepositoryError::NotFound(_)));
  }

  #[test]
  fn test_unique_violation_maps_to_constraint() {
    let mut conn = establish_connection(":memory:").unwrap();
    let root = NewIndicatorCategory { name: "GDP", parent_id: None, level: 1, sort_order: 1 };
    root.insert(&mut conn).unwrap();

    let err: RepositoryError = root.insert(&mut conn).unwrap_err().into();
    assert!(matches!(err, RepositoryError::ConstraintViolation(_)));
  }

  #[test]
  fn test_rollback_discards_unit() {
    let mut conn = establish_connection(":memory:").unwrap();

    begin_unit(&mut conn).unwrap();
    NewIndicatorCategory { name: "temp", parent_id: None, level: 1, sort_order: 1 }
      .insert(&mut conn)
      .unwrap();
    rollback_unit(&mut conn).unwrap();
    assert_eq!(IndicatorCategory::count(&mut conn).unwrap(), 0);

    begin_unit(&mut conn).unwrap();
    NewIndicatorCategory { name: "kept", parent_id: None, level: 1, sort_order: 1 }
      .insert(&mut conn)
      .unwrap();
    commit_unit(&mut conn).unwrap();
    assert_eq!(IndicatorCategory::count(&mut conn).unwrap(), 1);
  }

  #[test]
  fn test_commit_without_begin_fails() {
    let mut conn = establish_connection(":memory:").unwrap();
    assert!(matches!(commit_unit(&mut conn), Err(RepositoryError::TransactionError(_))));
  }

  #[test]
  fn test_database_status_counts() {
    let mut conn = establish_connection(":memory:").unwrap();
    let root = NewIndicatorCategory { name: "就业", parent_id: None, level: 1, sort_order: 1 }
      .insert(&mut conn)
      .unwrap();
    let sub = NewIndicatorCategory { name: "失业率", parent_id: Some(root.id), level: 2, sort_order: 1 }
      .insert(&mut conn)
      .unwrap();

    let payems = indicator("PAYEMS", root.id).insert(&mut conn).unwrap();
    indicator("UNRATE", sub.id).insert(&mut conn).unwrap();

    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    NewEconomicDataPoint::insert_batch(
      &mut conn,
      &[NewEconomicDataPoint { indicator_id: payems.id, date: day, value: 157000.0 }],
    )
    .unwrap();

    let status = database_status(&mut conn).unwrap();
    assert_eq!(status.categories.len(), 2);
    assert_eq!(status.total_points, 1);
    assert_eq!(status.children_of(None).len(), 1);
    assert_eq!(status.children_of(Some(root.id))[0].name, "失业率");
    assert_eq!(status.categories[0].indicators, 1);

    let empty: Vec<_> = status.empty_indicators().map(|i| i.code.as_str()).collect();
    assert_eq!(empty, vec!["UNRATE"]);

    let loaded = status.indicators.iter().find(|i| i.code == "PAYEMS").unwrap();
    assert_eq!(loaded.points, 1);
    assert_eq!(loaded.latest, Some(day));
  }
}
