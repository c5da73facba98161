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

//! Indicator definition sheet
//!
//! The sheet lists boards, subcategories and indicators top to bottom. Board
//! cells are usually filled only on the first row of a block and left blank
//! below it, so the current board and subcategory are carried forward as a
//! cursor while scanning. Each row is parsed once into a [`SheetRow`] and then
//! folded through a [`DefinitionCursor`] which emits [`IndicatorRecord`]s.
//!
//! Accepted inputs are the original workbook (`.xlsx`, first worksheet unless
//! a sheet name is given) and CSV exports with the same header row.

use crate::membership::Membership;
use crate::{LoaderError, LoaderResult};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Characters that survive copy/paste from web pages but are never part of a code
const INVISIBLE_CHARS: &[char] = &['\u{200b}', '\u{200c}', '\u{200d}', '\u{2060}', '\u{feff}'];

const CATEGORY_HEADERS: &[&str] = &["板块", "category", "board"];
const NAME_HEADERS: &[&str] = &["经济指标", "name", "indicatorname"];
const ENGLISH_NAME_HEADERS: &[&str] = &["indicator", "englishname"];
const CODE_HEADERS: &[&str] = &["fred代码", "code", "fredcode", "seriescode"];

/// Strip invisible characters and surrounding whitespace
pub fn clean_cell(raw: &str) -> String {
  raw.chars().filter(|c| !INVISIBLE_CHARS.contains(c)).collect::<String>().trim().to_string()
}

fn non_empty(raw: Option<&str>) -> Option<String> {
  raw.map(clean_cell).filter(|s| !s.is_empty())
}

fn normalize_header(raw: &str) -> String {
  clean_cell(raw).chars().filter(|c| !c.is_whitespace()).collect::<String>().to_lowercase()
}

/// One sheet row, cleaned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
  /// 1-based row number in the source, header included
  pub row_number: usize,
  pub category: Option<String>,
  pub name: Option<String>,
  pub english_name: Option<String>,
  pub code: Option<String>,
}

/// What a row means for the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
  Blank,
  CategoryMarker,
  SubcategoryMarker(String),
  Indicator(String),
}

impl SheetRow {
  pub fn is_blank(&self) -> bool {
    self.category.is_none() && self.name.is_none()
  }

  /// Classify against the board in effect for this row.
  ///
  /// A row without a code, or whose code repeats the name verbatim, is a
  /// marker. Markers named after the board (or unnamed) mark the board
  /// itself; any other marker opens a subcategory.
  pub fn classify(&self, current_category: Option<&str>) -> RowKind {
    if self.is_blank() {
      return RowKind::Blank;
    }

    let board = self.category.as_deref().or(current_category);
    match (&self.code, &self.name) {
      (Some(code), Some(name)) if code != name => RowKind::Indicator(code.clone()),
      (Some(code), None) => RowKind::Indicator(code.clone()),
      (_, None) => RowKind::CategoryMarker,
      (_, Some(name)) if Some(name.as_str()) == board => RowKind::CategoryMarker,
      (_, Some(name)) => RowKind::SubcategoryMarker(name.clone()),
    }
  }
}

/// One indicator with its place in the hierarchy
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRecord {
  pub name: String,
  pub english_name: Option<String>,
  pub code: String,
  /// Board, then optional subcategory
  pub category_path: Vec<String>,
  pub row_number: usize,
}

impl IndicatorRecord {
  pub fn category(&self) -> &str {
    self.category_path.first().map(String::as_str).unwrap_or_default()
  }

  pub fn subcategory(&self) -> Option<&str> {
    self.category_path.get(1).map(String::as_str)
  }
}

/// Scanning state threaded through the rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionCursor {
  pub current_category: Option<String>,
  pub current_subcategory: Option<String>,
  previous_code: Option<String>,
}

impl DefinitionCursor {
  /// Advance over one row, possibly emitting an indicator
  pub fn step(mut self, row: &SheetRow, membership: &Membership) -> (Self, Option<IndicatorRecord>) {
    if row.is_blank() {
      return (self, None);
    }

    if let Some(category) = &row.category {
      if self.current_category.as_ref() != Some(category) {
        self.current_category = Some(category.clone());
        self.current_subcategory = None;
      }
    }

    let previous_code = std::mem::replace(&mut self.previous_code, row.code.clone());

    match row.classify(self.current_category.as_deref()) {
      RowKind::Blank => (self, None),
      RowKind::CategoryMarker => {
        self.current_subcategory = None;
        (self, None)
      }
      RowKind::SubcategoryMarker(name) => {
        debug!("row {}: subcategory {}", row.row_number, name);
        self.current_subcategory = Some(name);
        (self, None)
      }
      RowKind::Indicator(code) => {
        if previous_code.as_deref() == Some(code.as_str()) {
          debug!("row {}: repeated code {}, skipped", row.row_number, code);
          return (self, None);
        }

        let Some(category) = self.current_category.clone() else {
          warn!("row {}: {} appears before any board, skipped", row.row_number, code);
          return (self, None);
        };
        let Some(name) = row.name.clone() else {
          warn!("row {}: {} has no indicator name, skipped", row.row_number, code);
          return (self, None);
        };

        let mut category_path = vec![category];
        if let Some(subcategory) = &self.current_subcategory {
          if membership.admits(subcategory, &name) {
            category_path.push(subcategory.clone());
          }
        }

        let record = IndicatorRecord {
          name,
          english_name: row.english_name.clone(),
          code,
          category_path,
          row_number: row.row_number,
        };
        (self, Some(record))
      }
    }
  }
}

/// Fold rows into indicator records
pub fn fold_rows<I>(rows: I, membership: &Membership) -> Vec<IndicatorRecord>
where
  I: IntoIterator<Item = SheetRow>,
{
  let (_, records) = rows.into_iter().fold(
    (DefinitionCursor::default(), Vec::new()),
    |(cursor, mut records), row| {
      let (cursor, emitted) = cursor.step(&row, membership);
      records.extend(emitted);
      (cursor, records)
    },
  );
  records
}

/// Header positions of the four columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
  pub category: usize,
  pub name: usize,
  pub english_name: Option<usize>,
  pub code: usize,
}

impl ColumnMap {
  pub fn from_headers<S: AsRef<str>>(headers: &[Option<S>]) -> LoaderResult<Self> {
    let normalized: Vec<String> =
      headers.iter().map(|h| h.as_ref().map(|s| normalize_header(s.as_ref())).unwrap_or_default()).collect();
    let find = |aliases: &[&str]| normalized.iter().position(|h| aliases.contains(&h.as_str()));

    let required = |aliases: &[&str], label: &str| {
      find(aliases).ok_or_else(|| LoaderError::DefinitionError(format!("missing column {}", label)))
    };

    Ok(Self {
      category: required(CATEGORY_HEADERS, "板块")?,
      name: required(NAME_HEADERS, "经济指标")?,
      english_name: find(ENGLISH_NAME_HEADERS),
      code: required(CODE_HEADERS, "FRED 代码")?,
    })
  }

  fn row(&self, row_number: usize, cells: &[Option<String>]) -> SheetRow {
    let cell = |idx: usize| non_empty(cells.get(idx).and_then(|c| c.as_deref()));
    SheetRow {
      row_number,
      category: cell(self.category),
      name: cell(self.name),
      english_name: self.english_name.and_then(cell),
      code: cell(self.code),
    }
  }
}

/// Turn a raw table into rows. The first non-empty row is the header.
/// `first_row` is the 1-based source row number of `table[0]`.
fn rows_from_table(table: Vec<Vec<Option<String>>>, first_row: usize) -> LoaderResult<Vec<SheetRow>> {
  let mut numbered = table.into_iter().enumerate().map(|(idx, cells)| (first_row + idx, cells));

  let header = numbered
    .by_ref()
    .find(|(_, cells)| cells.iter().any(|c| c.as_deref().is_some_and(|s| !clean_cell(s).is_empty())))
    .ok_or_else(|| LoaderError::DefinitionError("sheet is empty".to_string()))?;
  let columns = ColumnMap::from_headers(&header.1)?;

  Ok(numbered.map(|(row_number, cells)| columns.row(row_number, &cells)).collect())
}

fn read_csv_rows(path: &Path) -> LoaderResult<Vec<SheetRow>> {
  let mut reader = csv::ReaderBuilder::new().has_headers(false).flexible(true).from_path(path)?;

  let mut table = Vec::new();
  for record in reader.records() {
    let record = record?;
    table.push(record.iter().map(|field| Some(field.to_string())).collect());
  }
  rows_from_table(table, 1)
}

fn cell_text(cell: &Data) -> Option<String> {
  match cell {
    Data::Empty => None,
    other => Some(other.to_string()),
  }
}

fn read_workbook_rows(path: &Path, sheet: Option<&str>) -> LoaderResult<Vec<SheetRow>> {
  let mut workbook = open_workbook_auto(path)?;
  let range = match sheet {
    Some(name) => workbook.worksheet_range(name)?,
    None => workbook
      .worksheet_range_at(0)
      .ok_or_else(|| LoaderError::DefinitionError("workbook has no worksheets".to_string()))??,
  };

  let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);
  let table = range.rows().map(|cells| cells.iter().map(cell_text).collect()).collect();
  rows_from_table(table, first_row)
}

/// Read the rows of a definition sheet, by file extension
pub fn read_rows(path: &Path, sheet: Option<&str>) -> LoaderResult<Vec<SheetRow>> {
  if !path.exists() {
    return Err(LoaderError::IoError(format!("definition sheet not found: {}", path.display())));
  }

  let extension =
    path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).unwrap_or_default();
  match extension.as_str() {
    "csv" => read_csv_rows(path),
    "xlsx" | "xlsm" | "xls" | "ods" => read_workbook_rows(path, sheet),
    other => Err(LoaderError::DefinitionError(format!("unsupported sheet format: .{}", other))),
  }
}

/// Read a sheet and fold it into indicator records
pub fn read_definitions(
  path: &Path,
  sheet: Option<&str>,
  membership: &Membership,
) -> LoaderResult<Vec<IndicatorRecord>> {
  let rows = read_rows(path, sheet)?;
  let row_count = rows.len();
  let records = fold_rows(rows, membership);

  info!("Read {} rows from {}, {} indicators", row_count, path.display(), records.len());
  if records.is_empty() {
    warn!("No indicators found in {}", path.display());
  }
  Ok(records)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;
  use std::io::Write;

  fn row(n: usize, category: &str, name: &str, english: &str, code: &str) -> SheetRow {
    let opt = |s: &str| non_empty(Some(s));
    SheetRow { row_number: n, category: opt(category), name: opt(name), english_name: opt(english), code: opt(code) }
  }

  fn codes(records: &[IndicatorRecord]) -> Vec<&str> {
    records.iter().map(|r| r.code.as_str()).collect()
  }

  #[test]
  fn test_clean_cell_strips_invisible() {
    assert_eq!(clean_cell("\u{200b}PAYEMS\u{200d} "), "PAYEMS");
    assert_eq!(clean_cell("\u{feff}UNRATE"), "UNRATE");
    assert_eq!(clean_cell(" \u{200c} "), "");
  }

  #[test]
  fn test_classify() {
    assert_eq!(row(2, "", "", "", "").classify(Some("就业")), RowKind::Blank);
    assert_eq!(row(2, "", "", "", "X").classify(None), RowKind::Blank);
    assert_eq!(row(2, "就业", "", "", "").classify(None), RowKind::CategoryMarker);
    assert_eq!(row(2, "", "就业", "", "").classify(Some("就业")), RowKind::CategoryMarker);
    assert_eq!(
      row(2, "", "分部门新增就业", "", "分部门新增就业").classify(Some("就业")),
      RowKind::SubcategoryMarker("分部门新增就业".to_string())
    );
    assert_eq!(
      row(2, "", "失业率", "Unemployment Rate", "UNRATE").classify(Some("就业")),
      RowKind::Indicator("UNRATE".to_string())
    );
  }

  #[test]
  fn test_forward_fill_category() {
    let rows = vec![
      row(2, "非农就业", "非农就业总数", "Total Nonfarm Payrolls", "PAYEMS"),
      row(3, "", "私人非农", "Total Private", "USPRIV"),
      row(4, "", "商品生产", "Goods-Producing", "USGOOD"),
      row(5, "", "服务提供", "Service-Providing", "SRVPRD"),
    ];
    let records = fold_rows(rows, &Membership::empty());

    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.category_path == vec!["非农就业".to_string()]));
    assert_eq!(codes(&records), vec!["PAYEMS", "USPRIV", "USGOOD", "SRVPRD"]);
  }

  #[test]
  fn test_blank_rows_and_markers_are_not_emitted() {
    let rows = vec![
      row(2, "就业", "就业", "", ""),
      row(3, "", "", "", ""),
      row(4, "", "失业率", "Unemployment Rate", "UNRATE"),
      row(5, "", "", "", "ORPHAN"),
    ];
    let records = fold_rows(rows, &Membership::empty());
    assert_eq!(codes(&records), vec!["UNRATE"]);
    assert_eq!(records[0].row_number, 4);
  }

  #[test]
  fn test_consecutive_duplicate_code_skipped() {
    let rows = vec![
      row(2, "通胀", "CPI", "CPI", "CPIAUCSL"),
      row(3, "", "CPI 同比", "CPI YoY", "CPIAUCSL"),
      row(4, "", "核心 CPI", "Core CPI", "CPILFESL"),
      row(5, "", "CPI 再现", "CPI again", "CPIAUCSL"),
    ];
    let records = fold_rows(rows, &Membership::empty());
    // only the immediately repeated row is dropped
    assert_eq!(codes(&records), vec!["CPIAUCSL", "CPILFESL", "CPIAUCSL"]);
  }

  #[test]
  fn test_subcategory_membership() {
    let rows = vec![
      row(2, "就业", "非农就业总数", "Total Nonfarm Payrolls", "PAYEMS"),
      row(3, "", "分部门新增就业", "", "分部门新增就业"),
      row(4, "", "制造业", "Manufacturing", "MANEMP"),
      row(5, "", "政府", "Government", "USGOVT"),
      row(6, "", "平均时薪", "Average Hourly Earnings", "CES0500000003"),
      row(7, "通胀", "CPI", "CPI", "CPIAUCSL"),
    ];
    let records = fold_rows(rows, &Membership::default());

    let paths: Vec<Vec<String>> = records.iter().map(|r| r.category_path.clone()).collect();
    assert_eq!(
      paths,
      vec![
        vec!["就业".to_string()],
        vec!["就业".to_string(), "分部门新增就业".to_string()],
        vec!["就业".to_string(), "分部门新增就业".to_string()],
        vec!["就业".to_string()],
        vec!["通胀".to_string()],
      ]
    );
    assert_eq!(records[1].subcategory(), Some("分部门新增就业"));
    assert_eq!(records[3].category(), "就业");
  }

  #[test]
  fn test_unrestricted_subcategory_keeps_everything() {
    let rows = vec![
      row(2, "GDP", "GDP", "", ""),
      row(3, "", "GDP 分项", "", ""),
      row(4, "", "个人消费支出", "PCE", "PCE"),
      row(5, "", "私人投资", "Gross Private Domestic Investment", "GPDI"),
    ];
    let records = fold_rows(rows, &Membership::default());
    assert!(records.iter().all(|r| r.subcategory() == Some("GDP 分项")));
  }

  #[test]
  fn test_new_board_resets_subcategory() {
    let rows = vec![
      row(2, "就业", "", "", ""),
      row(3, "", "季调各类型失业率", "", "季调各类型失业率"),
      row(4, "", "U-3", "U-3", "UNRATE"),
      row(5, "通胀", "U-3", "U-3 again", "UNRATE2"),
    ];
    let records = fold_rows(rows, &Membership::default());
    assert_eq!(records[0].category_path, vec!["就业".to_string(), "季调各类型失业率".to_string()]);
    assert_eq!(records[1].category_path, vec!["通胀".to_string()]);
  }

  #[test]
  fn test_column_map_aliases() {
    let headers = [Some("\u{feff}板块"), Some("经济指标"), Some("Indicator"), Some("FRED代码")];
    let map = ColumnMap::from_headers(&headers).unwrap();
    assert_eq!(map, ColumnMap { category: 0, name: 1, english_name: Some(2), code: 3 });

    let english = [Some("Code"), Some("Category"), Some("Name")];
    let map = ColumnMap::from_headers(&english).unwrap();
    assert_eq!(map, ColumnMap { category: 1, name: 2, english_name: None, code: 0 });
  }

  #[test]
  fn test_column_map_missing_code() {
    let headers = [Some("板块"), Some("经济指标"), Some("Indicator"), None];
    let err = ColumnMap::from_headers(&headers).unwrap_err();
    assert!(err.to_string().contains("FRED 代码"));
  }

  #[test]
  fn test_read_csv_definitions() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "板块,经济指标,Indicator,FRED 代码").unwrap();
    writeln!(file, "非农就业,非农就业总数,Total Nonfarm Payrolls,PAYEMS\u{200b}").unwrap();
    writeln!(file, ",,,").unwrap();
    writeln!(file, ",失业率,Unemployment Rate,UNRATE").unwrap();
    file.flush().unwrap();

    let records = read_definitions(file.path(), None, &Membership::default()).unwrap();
    assert_eq!(codes(&records), vec!["PAYEMS", "UNRATE"]);
    assert_eq!(records[0].english_name.as_deref(), Some("Total Nonfarm Payrolls"));
    assert_eq!(records[0].row_number, 2);
    assert_eq!(records[1].row_number, 4);
    assert_eq!(records[1].category(), "非农就业");
  }

  #[test]
  fn test_read_rows_errors() {
    let missing = read_rows(Path::new("/definitely/not/here.xlsx"), None).unwrap_err();
    assert!(matches!(missing, LoaderError::IoError(_)));

    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let unsupported = read_rows(file.path(), None).unwrap_err();
    assert!(matches!(unsupported, LoaderError::DefinitionError(_)));
  }

  #[test]
  fn test_empty_csv_is_definition_error() {
    let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    let err = read_rows(file.path(), None).unwrap_err();
    assert!(matches!(err, LoaderError::DefinitionError(_)));
  }
}
