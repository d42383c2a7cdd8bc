//! Flat text export and import.
//!
//! Export goes through the `csv` writer with every field quoted and embedded
//! quotes doubled. Import is the naive counterpart used by the upload path:
//! it splits on newlines and commas and trims each field, without any
//! unquoting.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{SheetError, SheetResult};

fn export_error(err: impl std::fmt::Display) -> SheetError {
    SheetError::Export {
        message: err.to_string(),
    }
}

/// Join rows of display values into CSV text with no trailing newline
pub fn rows_to_csv<'a, R, F>(rows: R) -> SheetResult<String>
where
    R: IntoIterator<Item = F>,
    F: IntoIterator<Item = &'a str>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row).map_err(export_error)?;
    }

    let bytes = writer.into_inner().map_err(export_error)?;
    let mut text = String::from_utf8(bytes).map_err(export_error)?;
    // Records are terminated, the export is only separated
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Split import text into trimmed raw field values, row by row
pub fn parse_import_text(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .map(|row| row.split(',').map(|field| field.trim().to_string()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rows_to_csv() {
        let rows = vec![vec!["1", "2"], vec!["a,b", "c"]];
        assert_eq!(rows_to_csv(rows).unwrap(), "\"1\",\"2\"\n\"a,b\",\"c\"");
    }

    #[test]
    fn test_rows_to_csv_quoting() {
        let rows = vec![vec!["say \"hi\"", "", "line\nbreak"]];
        assert_eq!(
            rows_to_csv(rows).unwrap(),
            "\"say \"\"hi\"\"\",\"\",\"line\nbreak\""
        );
    }

    #[test]
    fn test_rows_to_csv_keeps_inner_trailing_newline() {
        // Only the final record terminator is dropped
        let rows = vec![vec!["a\n"]];
        assert_eq!(rows_to_csv(rows).unwrap(), "\"a\n\"");
    }

    #[test]
    fn test_rows_to_csv_empty() {
        let rows: Vec<Vec<&str>> = Vec::new();
        assert_eq!(rows_to_csv(rows).unwrap(), "");
    }

    #[test]
    fn test_parse_import_text() {
        let parsed = parse_import_text("1, 2 ,3\n=REF(A1),x");
        assert_eq!(
            parsed,
            vec![
                vec!["1".to_string(), "2".to_string(), "3".to_string()],
                vec!["=REF(A1)".to_string(), "x".to_string()],
            ]
        );
    }

    #[test]
    fn test_import_does_not_unquote() {
        let parsed = parse_import_text("\"a\",\"b\"\"c\"");
        assert_eq!(parsed, vec![vec!["\"a\"".to_string(), "\"b\"\"c\"".to_string()]]);
    }
}
