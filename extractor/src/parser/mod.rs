//! Spreadsheet reader.
//!
//! Turns one sheet of a workbook (or a CSV export of it) into a [`Grid`]:
//! a header row plus data rows of JSON cell values. Column positions are
//! absolute, so index 0 is always spreadsheet column A even when the used
//! range starts further right. No equipment-specific logic here.

use calamine::{open_workbook_auto, Data, Range, Reader};
use serde_json::{Number, Value};
use std::path::Path;

use crate::error::{WorkbookError, WorkbookResult};
use crate::logs::log_warning;

/// One sheet, header row split from the data rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    /// Name of the sheet the grid was read from (file stem for CSV).
    pub sheet: String,
    /// 1-based spreadsheet row number of the header row.
    pub header_row: usize,
    /// Header labels as text, untrimmed. Empty string for blank cells.
    pub headers: Vec<String>,
    /// Data rows, all padded with nulls to the grid width.
    pub rows: Vec<Vec<Value>>,
}

impl Grid {
    /// Build a grid whose first row is the header row.
    pub fn from_rows(
        sheet: impl Into<String>,
        header_row: usize,
        mut rows: Vec<Vec<Value>>,
    ) -> WorkbookResult<Self> {
        let sheet = sheet.into();
        if rows.is_empty() {
            return Err(WorkbookError::EmptySheet(sheet));
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in rows.iter_mut() {
            row.resize(width, Value::Null);
        }

        let header_cells = rows.remove(0);
        let headers = header_cells
            .iter()
            .map(|c| cell_text(c).unwrap_or_default())
            .collect();

        Ok(Self {
            sheet,
            header_row,
            headers,
            rows,
        })
    }

    /// Number of columns, counted from column A.
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Spreadsheet row number (1-based) of the data row at `index`.
    pub fn row_number(&self, index: usize) -> usize {
        self.header_row + 1 + index
    }
}

// =============================================================================
// Cells
// =============================================================================

/// Convert a calamine cell. Error cells (`#N/A`, `#REF!`...) count as missing,
/// dates keep their serial number.
pub fn cell_from_data(data: &Data) -> Value {
    match data {
        Data::Int(i) => Value::from(*i),
        Data::Float(f) => float_value(*f),
        Data::String(s) => Value::String(s.clone()),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) => float_value(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
}

/// Text form of a cell, `None` when the cell is missing.
///
/// Whole numbers print without a fractional part so a model typed as `540`
/// keys as `"540"`.
pub fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        }),
        other => Some(other.to_string()),
    }
}

/// Trim whitespace and byte-order marks from both ends.
///
/// U+FEFF is not `char::is_whitespace`, yet the output schema's `\S` treats
/// it as whitespace.
pub fn trim_text(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

// =============================================================================
// Sheet lookup
// =============================================================================

/// Find the sheet to read.
///
/// Exact name first, then trimmed case-insensitive, then the first sheet whose
/// name contains every word of `wanted` (so "DATA EQUIP" still finds
/// "Data Equip (2)").
pub fn find_sheet(names: &[String], wanted: &str) -> Option<String> {
    if let Some(name) = names.iter().find(|n| n.as_str() == wanted) {
        return Some(name.clone());
    }

    let wanted_upper = wanted.trim().to_uppercase();
    if let Some(name) = names.iter().find(|n| n.trim().to_uppercase() == wanted_upper) {
        return Some(name.clone());
    }

    let words: Vec<&str> = wanted_upper.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }
    names
        .iter()
        .find(|n| {
            let upper = n.to_uppercase();
            words.iter().all(|w| upper.contains(w))
        })
        .cloned()
}

// =============================================================================
// Workbooks
// =============================================================================

/// Read one sheet of a spreadsheet file.
///
/// CSV/TSV exports are recognised by extension; everything else goes through
/// calamine (`xlsx`, `xlsm`, `xlsb`, `xls`, `ods`).
pub fn read_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> WorkbookResult<Grid> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(WorkbookError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => read_csv_file(path),
        _ => read_workbook_sheet(path, sheet_name),
    }
}

/// Sheet names of a workbook, in workbook order.
pub fn sheet_names<P: AsRef<Path>>(path: P) -> WorkbookResult<Vec<String>> {
    let path = path.as_ref();
    let workbook = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(workbook.sheet_names())
}

fn read_workbook_sheet(path: &Path, sheet_name: &str) -> WorkbookResult<Grid> {
    let mut workbook = open_workbook_auto(path).map_err(|e| WorkbookError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let names = workbook.sheet_names();
    let sheet = find_sheet(&names, sheet_name).ok_or_else(|| WorkbookError::SheetNotFound {
        wanted: sheet_name.to_string(),
        available: names.clone(),
    })?;
    if sheet != sheet_name {
        log_warning(format!("Sheet '{}' not found, using '{}'", sheet_name, sheet));
    }

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| WorkbookError::Read {
            sheet: sheet.clone(),
            message: e.to_string(),
        })?;

    grid_from_range(&sheet, &range)
}

/// Build a grid from a calamine range, re-anchoring it at cell A1.
pub fn grid_from_range(sheet: &str, range: &Range<Data>) -> WorkbookResult<Grid> {
    let (start_row, start_col) = match range.start() {
        Some(start) if !range.is_empty() => start,
        _ => return Err(WorkbookError::EmptySheet(sheet.to_string())),
    };

    let lead = start_col as usize;
    let rows: Vec<Vec<Value>> = range
        .rows()
        .map(|cells| {
            let mut row = vec![Value::Null; lead];
            row.extend(cells.iter().map(cell_from_data));
            row
        })
        .collect();

    Grid::from_rows(sheet, start_row as usize + 1, rows)
}

// =============================================================================
// CSV exports
// =============================================================================

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes; unknown encodings fall back to lossy UTF-8.
///
/// Latin-1 goes through windows-1252, which agrees with it outside 0x80-0x9F.
pub fn decode_content(bytes: &[u8], encoding: &str) -> String {
    match encoding.to_lowercase().as_str() {
        "iso-8859-1" | "latin-1" | "latin1" | "windows-1252" | "cp1252" => {
            encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()
        }
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = ',';
    let mut best_count = 0;
    for sep in [';', ',', '\t', '|'] {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best = sep;
        }
    }
    best
}

fn read_csv_file(path: &Path) -> WorkbookResult<Grid> {
    let bytes = std::fs::read(path)?;
    let encoding = detect_encoding(&bytes);
    let content = decode_content(&bytes, &encoding);
    let delimiter = detect_delimiter(&content);

    let sheet = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("csv");
    parse_csv_grid(sheet, &content, delimiter)
}

/// Parse CSV text into a grid. Blank fields become nulls, the rest stay text.
pub fn parse_csv_grid(sheet: &str, content: &str, delimiter: char) -> WorkbookResult<Grid> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Value::Null
                    } else {
                        Value::String(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Grid::from_rows(sheet, 1, rows)
}
