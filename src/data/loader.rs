//! CSV Data Loader Module
//! Decodes legacy-encoded exports and splits the packed
//! "sick days, age, gender" column into typed records using Polars.

use super::dataset::{Dataset, EmployeeRecord};
use encoding_rs::Encoding;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Header of the packed column. The export wraps the three field names in a
/// single quoted CSV cell.
pub const PACKED_HEADER: &str = "Количество больничных дней,\"Возраст\",\"Пол\"";

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Unknown text encoding '{0}'")]
    UnknownEncoding(String),
    #[error("Packed column '{expected}' not found (columns: {found:?})")]
    MissingColumn {
        expected: &'static str,
        found: Vec<String>,
    },
    #[error("More than one column matches the packed header: {0:?}")]
    AmbiguousColumn(Vec<String>),
    #[error("Row {row}: empty packed cell")]
    EmptyCell { row: usize },
    #[error("Row {row}: expected 3 comma-separated fields, got {parts} in '{value}'")]
    MalformedRow {
        row: usize,
        parts: usize,
        value: String,
    },
    #[error("Row {row}: {field} '{value}' is not an integer")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    #[error("Row {row}: {field} value {value} is out of range")]
    OutOfRange {
        row: usize,
        field: &'static str,
        value: i64,
    },
    #[error("Row {row}: gender value is missing")]
    MissingGender { row: usize },
    #[error("Text cannot be represented in {0}")]
    Unencodable(&'static str),
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Loads employee exports in a fixed text encoding.
#[derive(Debug, Clone, Copy)]
pub struct DataLoader {
    encoding: &'static Encoding,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::WINDOWS_1251,
        }
    }
}

impl DataLoader {
    /// Create a loader for a WHATWG encoding label such as `windows-1251` or `cp1251`.
    pub fn new(encoding_label: &str) -> Result<Self, ParseError> {
        let encoding = Encoding::for_label(encoding_label.trim().as_bytes())
            .ok_or_else(|| ParseError::UnknownEncoding(encoding_label.to_string()))?;
        Ok(Self { encoding })
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Read and parse a file from disk.
    pub fn load_file(&self, path: &Path) -> Result<Dataset, LoadError> {
        let raw = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = raw.len(), "Read CSV file");
        Ok(self.load_bytes(&raw)?)
    }

    /// Parse raw CSV bytes. Any bad row fails the whole load.
    pub fn load_bytes(&self, raw: &[u8]) -> Result<Dataset, ParseError> {
        let (text, _, _) = self.encoding.decode(raw);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            // Read every column as text; the packed column is split by hand
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text.into_owned().into_bytes()))
            .finish()?;

        let column_name = Self::find_packed_column(&df)?;
        let cells = df.column(&column_name)?.str()?;

        let mut records = Vec::with_capacity(df.height());
        for (idx, cell) in cells.into_iter().enumerate() {
            let row = idx + 1;
            let cell = cell.ok_or(ParseError::EmptyCell { row })?;
            records.push(parse_packed_cell(cell, row)?);
        }

        info!(
            records = records.len(),
            encoding = self.encoding.name(),
            "Loaded employee dataset"
        );
        Ok(Dataset::from_records(records)?)
    }

    /// Serialize a dataset back into the packed single-column export format.
    pub fn to_csv_bytes(&self, dataset: &Dataset) -> Result<Vec<u8>, ParseError> {
        let mut text = quote_cell(PACKED_HEADER);
        text.push('\n');
        for record in dataset.records() {
            text.push_str(&quote_cell(&record.to_composite()));
            text.push('\n');
        }

        let (bytes, _, unmappable) = self.encoding.encode(&text);
        if unmappable {
            return Err(ParseError::Unencodable(self.encoding.name()));
        }
        Ok(bytes.into_owned())
    }

    fn find_packed_column(df: &DataFrame) -> Result<String, ParseError> {
        let expected = normalize_header(PACKED_HEADER);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let matches: Vec<String> = names
            .iter()
            .filter(|name| normalize_header(name) == expected)
            .cloned()
            .collect();

        match matches.len() {
            1 => Ok(matches.into_iter().next().unwrap_or_default()),
            0 => Err(ParseError::MissingColumn {
                expected: PACKED_HEADER,
                found: names,
            }),
            _ => Err(ParseError::AmbiguousColumn(matches)),
        }
    }
}

/// Split one packed cell (`5,39,"Ж"`) into a record. `row` is 1-based.
pub fn parse_packed_cell(cell: &str, row: usize) -> Result<EmployeeRecord, ParseError> {
    let parts: Vec<&str> = cell.split(',').collect();
    if parts.len() != 3 {
        return Err(ParseError::MalformedRow {
            row,
            parts: parts.len(),
            value: cell.to_string(),
        });
    }

    let sick_days = parse_int(parts[0], "sick days", row)?;
    if sick_days < 0 {
        return Err(ParseError::OutOfRange {
            row,
            field: "sick days",
            value: sick_days,
        });
    }

    let age = parse_int(parts[1], "age", row)?;
    if age <= 0 {
        return Err(ParseError::OutOfRange {
            row,
            field: "age",
            value: age,
        });
    }

    let gender = parts[2].replace('"', "").trim().to_string();
    if gender.is_empty() {
        return Err(ParseError::MissingGender { row });
    }

    Ok(EmployeeRecord {
        sick_days,
        age,
        gender,
    })
}

fn parse_int(raw: &str, field: &'static str, row: usize) -> Result<i64, ParseError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ParseError::InvalidNumber {
            row,
            field,
            value: raw.to_string(),
        })
}

/// Header comparison ignores quoting: exports differ in whether the inner
/// quotes survive CSV unescaping.
fn normalize_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .replace('"', "")
        .trim()
        .to_string()
}

fn quote_cell(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed_csv(rows: &[&str]) -> String {
        let mut text = quote_cell(PACKED_HEADER);
        text.push('\n');
        for row in rows {
            text.push_str(&quote_cell(row));
            text.push('\n');
        }
        text
    }

    fn cp1251(text: &str) -> Vec<u8> {
        let (bytes, _, unmappable) = encoding_rs::WINDOWS_1251.encode(text);
        assert!(!unmappable);
        bytes.into_owned()
    }

    #[test]
    fn splits_packed_cell() {
        let record = parse_packed_cell("5,39,\"Ж\"", 1).unwrap();
        assert_eq!(record.sick_days, 5);
        assert_eq!(record.age, 39);
        assert_eq!(record.gender, "Ж");
    }

    #[test]
    fn rejects_wrong_field_count() {
        let err = parse_packed_cell("5,39", 4).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRow { row: 4, parts: 2, .. }));

        let err = parse_packed_cell("5,39,\"Ж\",x", 2).unwrap_err();
        assert!(matches!(err, ParseError::MalformedRow { parts: 4, .. }));
    }

    #[test]
    fn rejects_non_numeric_and_out_of_range_fields() {
        assert!(matches!(
            parse_packed_cell("abc,25,\"M\"", 1),
            Err(ParseError::InvalidNumber { field: "sick days", .. })
        ));
        assert!(matches!(
            parse_packed_cell("3,-1,\"M\"", 1),
            Err(ParseError::OutOfRange { field: "age", .. })
        ));
        assert!(matches!(
            parse_packed_cell("3,40,\"\"", 1),
            Err(ParseError::MissingGender { row: 1 })
        ));
    }

    #[test]
    fn loads_windows_1251_export() {
        let raw = cp1251(&packed_csv(&["5,39,\"Ж\"", "4,54,\"М\"", "0,26,\"М\""]));
        let ds = DataLoader::default().load_bytes(&raw).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[1].gender, "М");
        assert_eq!(ds.records()[2].sick_days, 0);
    }

    #[test]
    fn one_bad_row_fails_the_whole_load() {
        let raw = cp1251(&packed_csv(&["5,39,\"Ж\"", "abc,25,\"M\"", "1,30,\"М\""]));
        let err = DataLoader::default().load_bytes(&raw).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { row: 2, .. }));
    }

    #[test]
    fn missing_packed_column_is_reported() {
        let raw = cp1251("a,b,c\n1,2,3\n");
        let err = DataLoader::default().load_bytes(&raw).unwrap_err();
        match err {
            ParseError::MissingColumn { found, .. } => assert_eq!(found, vec!["a", "b", "c"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_without_inner_quotes_still_matches() {
        let raw = cp1251(
            "\"Количество больничных дней,Возраст,Пол\"\n\"5,39,Ж\"\n\"2,41,М\"\n",
        );
        let ds = DataLoader::default().load_bytes(&raw).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].gender, "Ж");
        assert_eq!(ds.records()[1].age, 41);
    }

    #[test]
    fn two_packed_columns_are_ambiguous() {
        let text = format!(
            "{},\"Количество больничных дней,Возраст,Пол\"\n\"5,39,Ж\",\"5,39,Ж\"\n",
            quote_cell(PACKED_HEADER)
        );
        let err = DataLoader::default().load_bytes(&cp1251(&text)).unwrap_err();
        match err {
            ParseError::AmbiguousColumn(columns) => assert_eq!(columns.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_packed_cell_names_its_row() {
        let text = format!(
            "{},note\n{},a\n,b\n",
            quote_cell(PACKED_HEADER),
            quote_cell("5,39,\"Ж\"")
        );
        let err = DataLoader::default().load_bytes(&cp1251(&text)).unwrap_err();
        assert!(matches!(err, ParseError::EmptyCell { row: 2 }));
    }

    #[test]
    fn unknown_encoding_label_is_rejected() {
        assert!(matches!(
            DataLoader::new("klingon-7"),
            Err(ParseError::UnknownEncoding(_))
        ));
        assert_eq!(DataLoader::new("cp1251").unwrap().encoding_name(), "windows-1251");
    }

    #[test]
    fn csv_export_reloads_identically() {
        let loader = DataLoader::default();
        let raw = cp1251(&packed_csv(&["5,39,\"Ж\"", "4,54,\"М\""]));
        let ds = loader.load_bytes(&raw).unwrap();

        let reloaded = loader.load_bytes(&loader.to_csv_bytes(&ds).unwrap()).unwrap();
        assert_eq!(reloaded.records(), ds.records());
    }
}
