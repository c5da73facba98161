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

//! Definition sheets read from an `.xlsx` workbook

use fomc_loaders::{read_definitions, LoaderError, Membership};
use fomc_loaders::definition_source::read_rows;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn workbook() -> PathBuf {
  PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/indicators.xlsx")
}

#[test]
fn test_first_worksheet_forward_fills_category() {
  let records = read_definitions(&workbook(), None, &Membership::empty()).unwrap();

  let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
  assert_eq!(codes, vec!["PAYEMS", "USPRIV", "MANEMP"]);
  for record in &records {
    assert_eq!(record.category(), "非农就业");
    assert_eq!(record.subcategory(), None);
  }
  assert_eq!(records[0].english_name.as_deref(), Some("Total Nonfarm Payrolls"));
}

#[test]
fn test_row_numbers_follow_the_worksheet() {
  // the header sits on row 2, the first row is empty
  let rows = read_rows(&workbook(), None).unwrap();
  let numbers: Vec<usize> = rows.iter().map(|r| r.row_number).collect();
  assert_eq!(numbers, vec![3, 4, 5]);

  let records = read_definitions(&workbook(), None, &Membership::empty()).unwrap();
  assert_eq!(records[2].row_number, 5);
}

#[test]
fn test_named_worksheet_and_numeric_code() {
  let records = read_definitions(&workbook(), Some("Rates"), &Membership::empty()).unwrap();

  assert_eq!(records.len(), 2);
  assert_eq!(records[0].code, "DFF");
  assert_eq!(records[0].row_number, 2);
  // a code typed as a number comes back as its text
  assert_eq!(records[1].code, "12345");
  assert_eq!(records[1].category(), "利率");
}

#[test]
fn test_unknown_worksheet_is_spreadsheet_error() {
  let err = read_definitions(&workbook(), Some("Missing"), &Membership::empty()).unwrap_err();
  assert!(matches!(err, LoaderError::SpreadsheetError(_)));
}
