//! The `Table` abstraction: ordered named columns over typed cell rows.
//!
//! Sources are XLSX workbooks (calamine) or CSV (sniffed by the ZIP magic
//! bytes, since browser uploads carry unreliable content types). Column
//! names are trimmed on load; cell access is by resolved column name.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook_auto};
use chrono::NaiveDate;
use lomarosa_core::key::number_to_text;

use crate::error::{IngestError, Result};

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Empty,
  Text(String),
  Number(f64),
  Date(NaiveDate),
  Bool(bool),
}

impl Cell {
  pub fn is_blank(&self) -> bool {
    match self {
      Cell::Empty => true,
      Cell::Text(s) => s.trim().is_empty(),
      _ => false,
    }
  }

  /// Text representation. Numbers render without the `.0` artifact so a
  /// code read as `123.0` and one read as `"123"` agree.
  pub fn as_text(&self) -> Option<String> {
    match self {
      Cell::Empty => None,
      Cell::Text(s) => {
        let t = s.trim();
        if t.is_empty() { None } else { Some(t.to_string()) }
      }
      Cell::Number(n) => Some(number_to_text(*n)),
      Cell::Date(d) => Some(d.to_string()),
      Cell::Bool(b) => Some(b.to_string()),
    }
  }

  /// Tolerant numeric parse; handles currency text like `"$ 1,250"`.
  /// Returns `None` rather than guessing when the cell is not a number.
  pub fn as_number(&self) -> Option<f64> {
    match self {
      Cell::Number(n) => Some(*n),
      Cell::Text(s) => {
        let cleaned: String = s
          .trim()
          .chars()
          .filter(|c| !matches!(c, '$' | ',' | ' '))
          .collect();
        if cleaned.is_empty() { None } else { cleaned.parse().ok() }
      }
      Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
      _ => None,
    }
  }

  /// Date value, parsing ISO and day-first text forms when needed.
  pub fn as_date(&self) -> Option<NaiveDate> {
    match self {
      Cell::Date(d) => Some(*d),
      Cell::Text(s) => {
        let t = s.trim();
        NaiveDate::parse_from_str(t, "%Y-%m-%d")
          .or_else(|_| NaiveDate::parse_from_str(t, "%d/%m/%Y"))
          .ok()
      }
      _ => None,
    }
  }
}

// ─── Sheet selection ─────────────────────────────────────────────────────────

/// Which worksheet of a workbook to read. CSV sources ignore this.
#[derive(Debug, Clone, Default)]
pub enum SheetSelector {
  #[default]
  First,
  Name(String),
  Index(usize),
}

// ─── Table ───────────────────────────────────────────────────────────────────

/// An in-memory tabular source: trimmed column names plus typed rows.
#[derive(Debug, Clone)]
pub struct Table {
  pub columns: Vec<String>,
  pub rows:    Vec<Vec<Cell>>,
}

impl Table {
  /// Load from raw upload bytes, sniffing XLSX (ZIP magic `PK`) vs CSV.
  pub fn from_bytes(
    bytes: &[u8],
    sheet: &SheetSelector,
    header_offset: usize,
  ) -> Result<Self> {
    if bytes.starts_with(b"PK") {
      Self::from_xlsx_bytes(bytes, sheet, header_offset)
    } else {
      Self::from_csv_bytes(bytes, header_offset)
    }
  }

  pub fn from_xlsx_bytes(
    bytes: &[u8],
    sheet: &SheetSelector,
    header_offset: usize,
  ) -> Result<Self> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let name = pick_sheet(&workbook.sheet_names(), sheet)?;
    let range = workbook.worksheet_range(&name)?;
    from_range(&range, header_offset)
  }

  /// Load from a workbook on disk (xlsx/xls/ods, auto-detected by
  /// calamine).
  pub fn from_workbook_path(
    path: &Path,
    sheet: &SheetSelector,
    header_offset: usize,
  ) -> Result<Self> {
    let mut workbook = open_workbook_auto(path)?;
    let name = pick_sheet(&workbook.sheet_names(), sheet)?;
    let range = workbook.worksheet_range(&name)?;
    from_range(&range, header_offset)
  }

  pub fn from_csv_bytes(bytes: &[u8], header_offset: usize) -> Result<Self> {
    let mut reader = csv::ReaderBuilder::new()
      .has_headers(false)
      .flexible(true)
      .from_reader(bytes);

    let mut records = Vec::new();
    for record in reader.records() {
      records.push(record?);
    }

    if records.len() <= header_offset {
      return Err(IngestError::NoHeaderRow {
        offset: header_offset,
        rows:   records.len(),
      });
    }

    let columns: Vec<String> = records[header_offset]
      .iter()
      .map(|c| c.trim().to_string())
      .collect();

    let rows = records[header_offset + 1..]
      .iter()
      .map(|record| {
        (0..columns.len())
          .map(|i| match record.get(i) {
            None => Cell::Empty,
            Some(s) if s.trim().is_empty() => Cell::Empty,
            Some(s) => Cell::Text(s.to_string()),
          })
          .collect()
      })
      .collect();

    Ok(Table { columns, rows })
  }

  pub fn column_index(&self, name: &str) -> Option<usize> {
    self.columns.iter().position(|c| c.trim() == name.trim())
  }

  /// Cell at `column` in `row`; [`Cell::Empty`] when the column is absent
  /// or the row is short.
  pub fn cell<'a>(&self, row: &'a [Cell], column: &str) -> &'a Cell {
    self
      .column_index(column)
      .and_then(|i| row.get(i))
      .unwrap_or(&Cell::Empty)
  }
}

fn pick_sheet(names: &[String], selector: &SheetSelector) -> Result<String> {
  let found = match selector {
    SheetSelector::First => names.first().cloned(),
    SheetSelector::Index(i) => names.get(*i).cloned(),
    SheetSelector::Name(wanted) => names
      .iter()
      .find(|n| n.trim().eq_ignore_ascii_case(wanted.trim()))
      .cloned(),
  };
  found.ok_or_else(|| {
    IngestError::SheetNotFound(match selector {
      SheetSelector::First => "<first sheet>".to_string(),
      SheetSelector::Index(i) => format!("#{i}"),
      SheetSelector::Name(n) => n.clone(),
    })
  })
}

fn from_range(
  range: &calamine::Range<Data>,
  header_offset: usize,
) -> Result<Table> {
  let mut rows_iter = range.rows().skip(header_offset);

  let header = rows_iter.next().ok_or(IngestError::NoHeaderRow {
    offset: header_offset,
    rows:   range.rows().count(),
  })?;

  let columns: Vec<String> = header
    .iter()
    .map(|d| match d {
      Data::String(s) => s.trim().to_string(),
      Data::Empty => String::new(),
      other => data_to_cell(other)
        .as_text()
        .unwrap_or_default(),
    })
    .collect();

  let rows = rows_iter
    .map(|row| {
      (0..columns.len())
        .map(|i| row.get(i).map(data_to_cell).unwrap_or(Cell::Empty))
        .collect()
    })
    .collect();

  Ok(Table { columns, rows })
}

fn data_to_cell(data: &Data) -> Cell {
  match data {
    Data::Empty | Data::Error(_) => Cell::Empty,
    Data::String(s) => {
      if s.trim().is_empty() {
        Cell::Empty
      } else {
        Cell::Text(s.clone())
      }
    }
    Data::Float(f) => Cell::Number(*f),
    Data::Int(i) => Cell::Number(*i as f64),
    Data::Bool(b) => Cell::Bool(*b),
    Data::DateTime(dt) => match dt.as_datetime() {
      Some(naive) => Cell::Date(naive.date()),
      None => Cell::Empty,
    },
    Data::DateTimeIso(s) => NaiveDate::parse_from_str(&s[..s.len().min(10)], "%Y-%m-%d")
      .map(Cell::Date)
      .unwrap_or(Cell::Empty),
    Data::DurationIso(s) => Cell::Text(s.clone()),
  }
}
