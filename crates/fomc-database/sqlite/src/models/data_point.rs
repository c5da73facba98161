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

//! Daily observations for one indicator

use chrono::NaiveDate;
use diesel::dsl::{count_star, max};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::economic_data_points;

/// Rows per INSERT statement, keeps well under SQLite's bind variable limit
pub const INSERT_CHUNK_SIZE: usize = 1000;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = economic_data_points)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EconomicDataPoint {
  pub id: i32,
  pub indicator_id: i32,
  pub date: NaiveDate,
  pub value: f64,
}

#[derive(Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = economic_data_points)]
pub struct NewEconomicDataPoint {
  pub indicator_id: i32,
  pub date: NaiveDate,
  pub value: f64,
}

impl EconomicDataPoint {
  /// Most recent stored observation date
  pub fn latest_date(
    conn: &mut SqliteConnection,
    for_indicator: i32,
  ) -> QueryResult<Option<NaiveDate>> {
    economic_data_points::table
      .filter(economic_data_points::indicator_id.eq(for_indicator))
      .select(max(economic_data_points::date))
      .first(conn)
  }

  /// Stored dates inside `[start, end]`
  pub fn dates_between(
    conn: &mut SqliteConnection,
    for_indicator: i32,
    start: NaiveDate,
    end: NaiveDate,
  ) -> QueryResult<Vec<NaiveDate>> {
    economic_data_points::table
      .filter(economic_data_points::indicator_id.eq(for_indicator))
      .filter(economic_data_points::date.between(start, end))
      .select(economic_data_points::date)
      .load(conn)
  }

  pub fn for_indicator(conn: &mut SqliteConnection, for_indicator: i32) -> QueryResult<Vec<Self>> {
    economic_data_points::table
      .filter(economic_data_points::indicator_id.eq(for_indicator))
      .order(economic_data_points::date.asc())
      .select(EconomicDataPoint::as_select())
      .load(conn)
  }

  pub fn count_for_indicator(conn: &mut SqliteConnection, for_indicator: i32) -> QueryResult<i64> {
    economic_data_points::table
      .filter(economic_data_points::indicator_id.eq(for_indicator))
      .count()
      .get_result(conn)
  }

  pub fn delete_for_indicator(conn: &mut SqliteConnection, for_indicator: i32) -> QueryResult<usize> {
    diesel::delete(
      economic_data_points::table.filter(economic_data_points::indicator_id.eq(for_indicator)),
    )
    .execute(conn)
  }

  /// `(indicator_id, point count, latest date)` for every indicator with data
  pub fn summary_by_indicator(
    conn: &mut SqliteConnection,
  ) -> QueryResult<Vec<(i32, i64, Option<NaiveDate>)>> {
    economic_data_points::table
      .group_by(economic_data_points::indicator_id)
      .select((economic_data_points::indicator_id, count_star(), max(economic_data_points::date)))
      .load(conn)
  }

  pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
    economic_data_points::table.count().get_result(conn)
  }
}

impl NewEconomicDataPoint {
  /// Insert rows in chunks. Returns the number of rows written.
  pub fn insert_batch(conn: &mut SqliteConnection, points: &[Self]) -> QueryResult<usize> {
    let mut written = 0;
    for chunk in points.chunks(INSERT_CHUNK_SIZE) {
      written += diesel::insert_into(economic_data_points::table).values(chunk).execute(conn)?;
    }
    Ok(written)
  }
}
