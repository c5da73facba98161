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

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::economic_indicators;

#[derive(Queryable, Selectable, Identifiable, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[diesel(table_name = economic_indicators)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct EconomicIndicator {
  pub id: i32,
  pub name: String,
  pub english_name: Option<String>,
  pub code: String,
  pub description: Option<String>,
  pub frequency: Option<String>,
  pub units: Option<String>,
  pub seasonal_adjustment: Option<String>,
  pub last_updated: Option<NaiveDateTime>,
  pub category_id: i32,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = economic_indicators)]
pub struct NewEconomicIndicator<'a> {
  pub name: &'a str,
  pub english_name: Option<&'a str>,
  pub code: &'a str,
  pub description: Option<&'a str>,
  pub frequency: Option<&'a str>,
  pub units: Option<&'a str>,
  pub seasonal_adjustment: Option<&'a str>,
  pub last_updated: Option<NaiveDateTime>,
  pub category_id: i32,
}

/// Descriptive fields refreshed from remote metadata.
/// `None` leaves the stored column untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = economic_indicators)]
pub struct IndicatorDescriptionChanges<'a> {
  pub description: Option<&'a str>,
  pub frequency: Option<&'a str>,
  pub units: Option<&'a str>,
  pub seasonal_adjustment: Option<&'a str>,
  pub last_updated: Option<NaiveDateTime>,
}

impl IndicatorDescriptionChanges<'_> {
  pub fn is_empty(&self) -> bool {
    self.description.is_none()
      && self.frequency.is_none()
      && self.units.is_none()
      && self.seasonal_adjustment.is_none()
      && self.last_updated.is_none()
  }
}

impl EconomicIndicator {
  pub fn find_by_code(
    conn: &mut SqliteConnection,
    series_code: &str,
  ) -> QueryResult<Option<Self>> {
    use crate::schema::economic_indicators::dsl::*;

    economic_indicators
      .filter(code.eq(series_code))
      .select(EconomicIndicator::as_select())
      .first(conn)
      .optional()
  }

  pub fn find_by_id(conn: &mut SqliteConnection, indicator_id: i32) -> QueryResult<Option<Self>> {
    use crate::schema::economic_indicators::dsl::*;

    economic_indicators
      .find(indicator_id)
      .select(EconomicIndicator::as_select())
      .first(conn)
      .optional()
  }

  pub fn all_ordered(conn: &mut SqliteConnection) -> QueryResult<Vec<Self>> {
    use crate::schema::economic_indicators::dsl::*;

    economic_indicators.order((category_id.asc(), id.asc())).select(EconomicIndicator::as_select()).load(conn)
  }

  pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
    economic_indicators::table.count().get_result(conn)
  }

  /// Rewrite the name fields and hierarchy placement
  pub fn update_placement(
    conn: &mut SqliteConnection,
    indicator_id: i32,
    new_name: &str,
    new_english_name: Option<&str>,
    new_category_id: i32,
  ) -> QueryResult<usize> {
    use crate::schema::economic_indicators::dsl::*;

    diesel::update(economic_indicators.find(indicator_id))
      .set((
        name.eq(new_name),
        english_name.eq(new_english_name),
        category_id.eq(new_category_id),
      ))
      .execute(conn)
  }

  /// Apply non-empty description changes. Returns rows touched.
  pub fn update_description(
    conn: &mut SqliteConnection,
    indicator_id: i32,
    changes: &IndicatorDescriptionChanges<'_>,
  ) -> QueryResult<usize> {
    use crate::schema::economic_indicators::dsl::*;

    if changes.is_empty() {
      return Ok(0);
    }
    diesel::update(economic_indicators.find(indicator_id)).set(changes).execute(conn)
  }
}

impl NewEconomicIndicator<'_> {
  /// Insert the row and read it back by code
  pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<EconomicIndicator> {
    diesel::insert_into(economic_indicators::table).values(self).execute(conn)?;

    EconomicIndicator::find_by_code(conn, self.code)?.ok_or(diesel::result::Error::NotFound)
  }
}
