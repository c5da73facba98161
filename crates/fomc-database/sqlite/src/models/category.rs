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

//! Category tree rows

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::indicator_categories;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = indicator_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IndicatorCategory {
  pub id: i32,
  pub name: String,
  pub parent_id: Option<i32>,
  pub level: i32,
  pub sort_order: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = indicator_categories)]
pub struct NewIndicatorCategory<'a> {
  pub name: &'a str,
  pub parent_id: Option<i32>,
  pub level: i32,
  pub sort_order: i32,
}

impl IndicatorCategory {
  /// Find a category by exact name inside one parent scope.
  ///
  /// `parent = None` searches the roots.
  pub fn find_in_scope(
    conn: &mut SqliteConnection,
    category_name: &str,
    category_level: i32,
    parent: Option<i32>,
  ) -> QueryResult<Option<Self>> {
    use crate::schema::indicator_categories::dsl::*;

    let mut query = indicator_categories
      .filter(name.eq(category_name))
      .filter(level.eq(category_level))
      .into_boxed();

    query = match parent {
      Some(pid) => query.filter(parent_id.eq(pid)),
      None => query.filter(parent_id.is_null()),
    };

    query.select(IndicatorCategory::as_select()).first(conn).optional()
  }

  /// Number of categories already sharing a parent scope at a level
  pub fn count_siblings(
    conn: &mut SqliteConnection,
    category_level: i32,
    parent: Option<i32>,
  ) -> QueryResult<i64> {
    use crate::schema::indicator_categories::dsl::*;

    let mut query = indicator_categories.filter(level.eq(category_level)).into_boxed();
    query = match parent {
      Some(pid) => query.filter(parent_id.eq(pid)),
      None => query.filter(parent_id.is_null()),
    };

    query.count().get_result(conn)
  }

  pub fn find_by_id(conn: &mut SqliteConnection, category_id: i32) -> QueryResult<Self> {
    use crate::schema::indicator_categories::dsl::*;

    indicator_categories.find(category_id).select(IndicatorCategory::as_select()).first(conn)
  }

  /// All categories, parents before children, siblings in sort order
  pub fn all_ordered(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
    use crate::schema::indicator_categories::dsl::*;

    indicator_categories
      .order((level.asc(), sort_order.asc(), id.asc()))
      .select(IndicatorCategory::as_select())
      .load(conn)
  }

  pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
    indicator_categories::table.count().get_result(conn)
  }
}

impl NewIndicatorCategory<'_> {
  /// Insert the row and read it back through its unique scope
  pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<IndicatorCategory> {
    diesel::insert_into(indicator_categories::table).values(self).execute(conn)?;

    IndicatorCategory::find_in_scope(conn, self.name, self.level, self.parent_id)?
      .ok_or(diesel::result::Error::NotFound)
  }
}
