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

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::info;

use crate::repository::{RepositoryError, RepositoryResult};

/// Migrations compiled into the binary from `migrations/`
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Open a connection with foreign key enforcement turned on.
///
/// Accepts a file path or `:memory:`.
pub fn open_connection(database_url: &str) -> RepositoryResult<SqliteConnection> {
  let mut conn = SqliteConnection::establish(database_url)
    .map_err(|e| RepositoryError::ConnectionError(format!("{}: {}", database_url, e)))?;

  diesel::sql_query("PRAGMA foreign_keys = ON").execute(&mut conn)?;
  Ok(conn)
}

/// Apply pending migrations and return the versions that ran
pub fn run_migrations(conn: &mut SqliteConnection) -> RepositoryResult<Vec<String>> {
  let applied = conn
    .run_pending_migrations(MIGRATIONS)
    .map_err(|e| RepositoryError::MigrationError(e.to_string()))?;

  let versions: Vec<String> = applied.iter().map(|v| v.to_string()).collect();
  if !versions.is_empty() {
    info!("Applied {} migration(s): {}", versions.len(), versions.join(", "));
  }
  Ok(versions)
}

/// Establish a database connection with the schema up to date
pub fn establish_connection(database_url: &str) -> RepositoryResult<SqliteConnection> {
  let mut conn = open_connection(database_url)?;
  run_migrations(&mut conn)?;
  Ok(conn)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_establish_in_memory_runs_migrations() {
    let mut conn = establish_connection(":memory:").unwrap();
    // second run is a no-op
    let again = run_migrations(&mut conn).unwrap();
    assert!(again.is_empty());

    let count: i64 =
      crate::schema::indicator_categories::table.count().get_result(&mut conn).unwrap();
    assert_eq!(count, 0);
  }

  #[test]
  fn test_open_connection_reports_bad_path() {
    let Err(err) = open_connection("/nonexistent-dir/for/sure/fomc.db") else {
      panic!("opened a database under a missing directory");
    };
    assert!(matches!(err, RepositoryError::ConnectionError(_)));
  }

  #[test]
  fn test_file_database_persists_between_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fomc.db");
    let url = path.to_string_lossy().to_string();

    let mut conn = establish_connection(&url).unwrap();
    let first = run_migrations(&mut conn).unwrap();
    assert!(first.is_empty());
    drop(conn);

    let mut conn = open_connection(&url).unwrap();
    let pending = run_migrations(&mut conn).unwrap();
    assert!(pending.is_empty());
  }
}
