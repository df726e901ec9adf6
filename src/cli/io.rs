//! File and stdout handling for the CLI
//!
//! - Input files are single JSON documents, UTF-8 only
//! - Rows are written to stdout as one JSON object per line

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;

use crate::value::ResultRow;

use super::errors::{CliError, CliResult};

/// Reads a JSON document from a file
pub fn read_json_file(path: &Path) -> CliResult<Value> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("{}: {}", path.display(), e)))?;

    serde_json::from_str(&content)
        .map_err(|e| CliError::io_error(format!("{}: invalid JSON: {}", path.display(), e)))
}

/// Writes one row as a JSON line
pub fn write_row<W: Write>(writer: &mut W, row: &ResultRow) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, &row.to_json())
        .map_err(|e| CliError::io_error(e.to_string()))?;
    writeln!(writer)?;
    Ok(())
}

/// Writes plain text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ExprValue;

    #[test]
    fn test_write_row_is_one_line() {
        let row = ResultRow::new()
            .with("avg(age)", ExprValue::Double(42.5))
            .with("count(*)", ExprValue::Long(7));

        let mut buffer = Vec::new();
        write_row(&mut buffer, &row).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\"avg(age)\":42.5,\"count(*)\":7}\n"
        );
    }

    #[test]
    fn test_read_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"index": "accounts"}}"#).unwrap();

        let value = read_json_file(file.path()).unwrap();
        assert_eq!(value["index"], "accounts");
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = read_json_file(file.path()).unwrap_err();
        assert!(err.message().contains("invalid JSON"));
    }
}
