//! Spreadsheet-friendly CSV files.
//!
//! Files are written the way desktop spreadsheets in `;`-locales expect
//! them: UTF-8 with a byte-order mark, `;` between fields, quotes only where
//! a field needs them, CRLF line endings, and a header row first. NULL cells
//! are written empty and blobs as their size placeholder.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use sqlite_viewer_core::ResultSet;
use tracing::info;

use crate::error::{ExportError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options for writing and reading CSV files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: char,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: ';' }
    }
}

impl CsvOptions {
    fn delimiter_byte(&self) -> Result<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ExportError::InvalidDelimiter(self.delimiter))
        }
    }
}

/// Header and string cells read back from a CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Writes `set` to `path`, replacing any existing file.
///
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns [`ExportError::NothingToExport`] if the result set has no columns
/// or no rows; nothing is written in that case.
pub fn write_csv(path: impl AsRef<Path>, set: &ResultSet, options: &CsvOptions) -> Result<usize> {
    let path = path.as_ref();
    check_exportable(set)?;
    let delimiter = options.delimiter_byte()?;

    let file = File::create(path)?;
    let written = write_records(file, set, delimiter)?;
    info!(path = %path.display(), rows = written, "exported csv");
    Ok(written)
}

/// Writes `set` as CSV (with byte-order mark) to any writer.
pub fn write_csv_to<W: Write>(writer: W, set: &ResultSet, options: &CsvOptions) -> Result<usize> {
    check_exportable(set)?;
    write_records(writer, set, options.delimiter_byte()?)
}

fn check_exportable(set: &ResultSet) -> Result<()> {
    if set.columns.is_empty() || set.is_empty() {
        return Err(ExportError::NothingToExport);
    }
    Ok(())
}

fn write_records<W: Write>(mut writer: W, set: &ResultSet, delimiter: u8) -> Result<usize> {
    writer.write_all(UTF8_BOM)?;

    let mut csv = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    csv.write_record(&set.columns)?;
    for row in &set.rows {
        csv.write_record(row.values().map(|value| value.export_text()))?;
    }
    csv.flush()?;
    Ok(set.len())
}

/// Reads a CSV file written by [`write_csv`] back into strings.
pub fn read_csv(path: impl AsRef<Path>, options: &CsvOptions) -> Result<CsvTable> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    read_csv_from(&bytes, options)
}

/// Parses CSV bytes, skipping a leading byte-order mark.
pub fn read_csv_from(bytes: &[u8], options: &CsvOptions) -> Result<CsvTable> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .has_headers(true)
        .from_reader(body);

    let headers = reader.headers()?.iter().map(str::to_owned).collect();
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_owned).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, _>>()?;

    Ok(CsvTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlite_viewer_core::Value;

    fn sample() -> ResultSet {
        ResultSet::from_values(
            vec!["id".into(), "Group".into(), "note".into()],
            vec![
                vec![Value::Integer(1), Value::from("a;b"), Value::Null],
                vec![Value::Integer(2), Value::from("say \"hi\""), Value::Blob(vec![1, 2, 3])],
                vec![Value::Integer(3), Value::from("line\nbreak"), Value::Real(2.5)],
            ],
        )
    }

    #[test]
    fn test_output_has_bom_semicolons_and_minimal_quotes() {
        let mut out = Vec::new();
        let written = write_csv_to(&mut out, &sample(), &CsvOptions::default()).unwrap();
        assert_eq!(written, 3);
        assert!(out.starts_with(UTF8_BOM));

        let text = String::from_utf8(out[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "id;Group;note\r\n\
             1;\"a;b\";\r\n\
             2;\"say \"\"hi\"\"\";[BLOB 3 bytes]\r\n\
             3;\"line\nbreak\";2.5\r\n"
        );
    }

    #[test]
    fn test_read_back_strips_bom() {
        let mut out = Vec::new();
        write_csv_to(&mut out, &sample(), &CsvOptions::default()).unwrap();
        let table = read_csv_from(&out, &CsvOptions::default()).unwrap();
        assert_eq!(table.headers, ["id", "Group", "note"]);
        assert_eq!(table.rows[0], ["1", "a;b", ""]);
        assert_eq!(table.rows[2], ["3", "line\nbreak", "2.5"]);
    }

    #[test]
    fn test_empty_result_is_rejected() {
        let empty = ResultSet::from_values(vec!["id".into()], Vec::new());
        let mut out = Vec::new();
        assert!(matches!(
            write_csv_to(&mut out, &empty, &CsvOptions::default()),
            Err(ExportError::NothingToExport)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_non_ascii_delimiter_is_rejected() {
        let options = CsvOptions { delimiter: '§' };
        assert!(matches!(
            write_csv_to(Vec::new(), &sample(), &options),
            Err(ExportError::InvalidDelimiter('§'))
        ));
    }

    #[test]
    fn test_comma_delimiter() {
        let mut out = Vec::new();
        let options = CsvOptions { delimiter: ',' };
        write_csv_to(&mut out, &sample(), &options).unwrap();
        let table = read_csv_from(&out, &options).unwrap();
        assert_eq!(table.rows[0], ["1", "a;b", ""]);
    }
}
