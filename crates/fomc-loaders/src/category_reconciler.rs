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

//! Category hierarchy reconciliation
//!
//! Maps a hierarchy path (board, optional subcategory) onto
//! `indicator_categories` rows, creating missing levels. Lookups are scoped by
//! parent, so the same subcategory name under two boards is two rows.

use crate::{LoaderError, LoaderResult};
use fomc_database_sqlite::models::{IndicatorCategory, NewIndicatorCategory};
use fomc_database_sqlite::SqliteConnection;
use std::collections::HashMap;
use tracing::info;

/// Deepest hierarchy level the sheet can express
pub const MAX_DEPTH: usize = 2;

/// Resolves hierarchy paths to category ids with a name→id lookup.
///
/// The lookup only holds rows this reconciler has seen; call
/// [`CategoryReconciler::invalidate`] after rolling back a unit of work that
/// may have created some of them, and [`CategoryReconciler::commit`] after
/// committing one.
#[derive(Debug, Default)]
pub struct CategoryReconciler {
  lookup: HashMap<(Option<i32>, String), i32>,
  pending: usize,
  created: usize,
}

impl CategoryReconciler {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the id of the last level of `path`, creating levels as needed
  pub fn reconcile(&mut self, conn: &mut SqliteConnection, path: &[String]) -> LoaderResult<i32> {
    if path.is_empty() || path.len() > MAX_DEPTH {
      return Err(LoaderError::InvalidData(format!(
        "category path must have 1 to {} levels, got {:?}",
        MAX_DEPTH, path
      )));
    }

    let mut parent: Option<i32> = None;
    for (depth, name) in path.iter().enumerate() {
      let level = depth as i32 + 1;
      let id = self.resolve_level(conn, name, level, parent)?;
      parent = Some(id);
    }

    parent.ok_or_else(|| LoaderError::InvalidData("empty category path".to_string()))
  }

  fn resolve_level(
    &mut self,
    conn: &mut SqliteConnection,
    name: &str,
    level: i32,
    parent: Option<i32>,
  ) -> LoaderResult<i32> {
    let key = (parent, name.to_string());
    if let Some(id) = self.lookup.get(&key) {
      return Ok(*id);
    }

    let id = match IndicatorCategory::find_in_scope(conn, name, level, parent)? {
      Some(existing) => existing.id,
      None => {
        let siblings = IndicatorCategory::count_siblings(conn, level, parent)?;
        let created = NewIndicatorCategory {
          name,
          parent_id: parent,
          level,
          sort_order: siblings as i32 + 1,
        }
        .insert(conn)?;
        self.pending += 1;
        info!("Created category {} (level {}, sort order {})", name, level, created.sort_order);
        created.id
      }
    };

    self.lookup.insert(key, id);
    Ok(id)
  }

  /// Forget cached ids
  pub fn invalidate(&mut self) {
    self.lookup.clear();
    self.pending = 0;
  }

  /// Count the current unit's new categories as durable
  pub fn commit(&mut self) {
    self.created += std::mem::take(&mut self.pending);
  }

  /// Categories created by this reconciler in committed units
  pub fn created(&self) -> usize {
    self.created
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use fomc_database_sqlite::establish_connection;
  use fomc_database_sqlite::repository::{begin_unit, rollback_unit};

  fn path(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
  }

  #[test]
  fn test_reconcile_is_idempotent() {
    let mut conn = establish_connection(":memory:").unwrap();
    let mut reconciler = CategoryReconciler::new();

    let first = reconciler.reconcile(&mut conn, &path(&["就业", "分部门新增就业"])).unwrap();
    // fresh reconciler goes to storage rather than its lookup
    let second =
      CategoryReconciler::new().reconcile(&mut conn, &path(&["就业", "分部门新增就业"])).unwrap();

    assert_eq!(first, second);
    assert_eq!(IndicatorCategory::count(&mut conn).unwrap(), 2);
    reconciler.commit();
    assert_eq!(reconciler.created(), 2);
  }

  #[test]
  fn test_levels_and_parents() {
    let mut conn = establish_connection(":memory:").unwrap();
    let mut reconciler = CategoryReconciler::new();

    let board = reconciler.reconcile(&mut conn, &path(&["通胀"])).unwrap();
    let sub = reconciler.reconcile(&mut conn, &path(&["通胀", "分项 CPI"])).unwrap();

    let board_row = IndicatorCategory::find_by_id(&mut conn, board).unwrap();
    let sub_row = IndicatorCategory::find_by_id(&mut conn, sub).unwrap();
    assert_eq!((board_row.level, board_row.parent_id), (1, None));
    assert_eq!((sub_row.level, sub_row.parent_id), (2, Some(board)));
  }

  #[test]
  fn test_same_subcategory_name_under_different_boards() {
    let mut conn = establish_connection(":memory:").unwrap();
    let mut reconciler = CategoryReconciler::new();

    let a = reconciler.reconcile(&mut conn, &path(&["就业", "分项"])).unwrap();
    let b = reconciler.reconcile(&mut conn, &path(&["通胀", "分项"])).unwrap();
    assert_ne!(a, b);
    assert_eq!(IndicatorCategory::count(&mut conn).unwrap(), 4);
  }

  #[test]
  fn test_sort_order_counts_siblings() {
    let mut conn = establish_connection(":memory:").unwrap();
    let mut reconciler = CategoryReconciler::new();

    reconciler.reconcile(&mut conn, &path(&["A"])).unwrap();
    let b = reconciler.reconcile(&mut conn, &path(&["B"])).unwrap();
    let b1 = reconciler.reconcile(&mut conn, &path(&["B", "B1"])).unwrap();
    let b2 = reconciler.reconcile(&mut conn, &path(&["B", "B2"])).unwrap();

    assert_eq!(IndicatorCategory::find_by_id(&mut conn, b).unwrap().sort_order, 2);
    assert_eq!(IndicatorCategory::find_by_id(&mut conn, b1).unwrap().sort_order, 1);
    assert_eq!(IndicatorCategory::find_by_id(&mut conn, b2).unwrap().sort_order, 2);
  }

  #[test]
  fn test_invalid_paths() {
    let mut conn = establish_connection(":memory:").unwrap();
    let mut reconciler = CategoryReconciler::new();
    assert!(matches!(reconciler.reconcile(&mut conn, &[]), Err(LoaderError::InvalidData(_))));
    assert!(reconciler.reconcile(&mut conn, &path(&["a", "b", "c"])).is_err());
  }

  #[test]
  fn test_invalidate_after_rollback() {
    let mut conn = establish_connection(":memory:").unwrap();
    let mut reconciler = CategoryReconciler::new();

    begin_unit(&mut conn).unwrap();
    reconciler.reconcile(&mut conn, &path(&["临时"])).unwrap();
    rollback_unit(&mut conn).unwrap();
    reconciler.invalidate();
    reconciler.commit();
    assert_eq!(reconciler.created(), 0);

    let id = reconciler.reconcile(&mut conn, &path(&["临时"])).unwrap();
    reconciler.commit();
    assert_eq!(reconciler.created(), 1);
    assert!(IndicatorCategory::find_in_scope(&mut conn, "临时", 1, None).unwrap().is_some());
    assert_eq!(IndicatorCategory::count(&mut conn).unwrap(), 1);
    assert_eq!(IndicatorCategory::find_by_id(&mut conn, id).unwrap().name, "临时");
  }
}
