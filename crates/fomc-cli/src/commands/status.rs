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

use anyhow::{bail, Context, Result};
use clap::Args;
use fomc_database_sqlite::repository::{database_status, DatabaseStatus};
use fomc_database_sqlite::{open_connection, SqliteConnection};
use std::fmt::Write;
use std::path::Path;

use crate::config::Config;

#[derive(Args, Debug)]
pub struct StatusArgs {
  /// List every indicator with its point count and latest date
  #[arg(short, long)]
  detailed: bool,

  /// Print the report as JSON
  #[arg(long, conflicts_with = "detailed")]
  json: bool,
}

pub fn handle_status(args: StatusArgs, config: Config) -> Result<()> {
  let mut conn = open_existing(&config.database_url)?;
  let status = database_status(&mut conn)
    .context("Failed to read database status, run `fomc migrate` first")?;

  if args.json {
    println!("{}", serde_json::to_string_pretty(&status)?);
  } else {
    print!("{}", render_status(&status, args.detailed));
  }
  Ok(())
}

/// Read-only commands never create or migrate a database
fn open_existing(database_url: &str) -> Result<SqliteConnection> {
  if database_url != ":memory:" && !Path::new(database_url).exists() {
    bail!("Database {} does not exist", database_url);
  }
  open_connection(database_url).with_context(|| format!("Failed to open database {}", database_url))
}

fn render_status(status: &DatabaseStatus, detailed: bool) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Categories: {}", status.categories.len());
  for board in status.children_of(None) {
    let _ = writeln!(out, "  {} ({} indicators)", board.name, board.indicators);
    for sub in status.children_of(Some(board.id)) {
      let _ = writeln!(out, "    {} ({} indicators)", sub.name, sub.indicators);
    }
  }

  let _ = writeln!(out, "Indicators: {}", status.indicators.len());
  let _ = writeln!(out, "Data points: {}", status.total_points);

  if detailed {
    for indicator in &status.indicators {
      let latest = indicator.latest.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
      let _ = writeln!(
        out,
        "  {:<16} {:>8}  {}  {}",
        indicator.code, indicator.points, latest, indicator.name
      );
    }
  }

  let empty: Vec<&str> = status.empty_indicators().map(|i| i.code.as_str()).collect();
  if !empty.is_empty() {
    let _ = writeln!(out, "Without data: {}", empty.join(", "));
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::NaiveDate;
  use fomc_database_sqlite::establish_connection;
  use fomc_database_sqlite::repository::{CategoryStatus, IndicatorStatus};
  use std::path::PathBuf;

  fn config_for(database_url: &str) -> Config {
    Config {
      database_url: database_url.to_string(),
      indicator_sheet: PathBuf::from("unused.xlsx"),
      membership_file: None,
      utc_offset_hours: -5,
    }
  }

  fn sample() -> DatabaseStatus {
    DatabaseStatus {
      categories: vec![
        CategoryStatus { id: 1, name: "就业".into(), parent_id: None, level: 1, sort_order: 1, indicators: 1 },
        CategoryStatus {
          id: 2,
          name: "分部门新增就业".into(),
          parent_id: Some(1),
          level: 2,
          sort_order: 1,
          indicators: 1,
        },
      ],
      indicators: vec![
        IndicatorStatus {
          id: 1,
          code: "PAYEMS".into(),
          name: "非农就业总数".into(),
          category_id: 1,
          points: 2,
          latest: NaiveDate::from_ymd_opt(2024, 2, 1),
        },
        IndicatorStatus {
          id: 2,
          code: "MANEMP".into(),
          name: "制造业".into(),
          category_id: 2,
          points: 0,
          latest: None,
        },
      ],
      total_points: 2,
    }
  }

  #[test]
  fn test_render_tree_and_totals() {
    let text = render_status(&sample(), false);
    assert!(text.contains("Categories: 2"));
    assert!(text.contains("  就业 (1 indicators)\n    分部门新增就业 (1 indicators)"));
    assert!(text.contains("Data points: 2"));
    assert!(text.contains("Without data: MANEMP"));
    assert!(!text.contains("2024-02-01"));
  }

  #[test]
  fn test_render_detailed_lists_indicators() {
    let text = render_status(&sample(), true);
    assert!(text.contains("PAYEMS"));
    assert!(text.contains("2024-02-01"));
  }

  #[test]
  fn test_status_of_fresh_database() {
    let mut conn = establish_connection(":memory:").unwrap();
    let status = database_status(&mut conn).unwrap();
    let text = render_status(&status, true);
    assert!(text.starts_with("Categories: 0\n"));
    assert!(!text.contains("Without data"));
  }

  #[test]
  fn test_missing_database_is_not_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("typo.db");
    let url = path.to_string_lossy().to_string();

    let args = StatusArgs { detailed: false, json: false };
    let err = handle_status(args, config_for(&url)).unwrap_err();
    assert!(err.to_string().contains("does not exist"), "{}", err);
    assert!(!path.exists());
  }

  #[test]
  fn test_existing_database_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fomc.db");
    let url = path.to_string_lossy().to_string();
    drop(establish_connection(&url).unwrap());

    let args = StatusArgs { detailed: true, json: false };
    assert!(handle_status(args, config_for(&url)).is_ok());
  }
}
