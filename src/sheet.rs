//! Fetching and decoding the published spreadsheet.
//!
//! A spreadsheet's first tab is exported as CSV from the `gviz` endpoint:
//!
//! ```text
//! https://docs.google.com/spreadsheets/d/<spreadsheet-id>/gviz/tq?tqx=out:csv&gid=0
//! ```
//!
//! [`fetch_sheet`] issues a single GET against that URL, buffers the whole body
//! and hands it to [`decode_csv`]. There are no retries and no caching: every
//! call goes back to the upstream endpoint.
//!
//! ## Decoding
//!
//! The first record becomes the header row and every following record a data
//! row. Rows are not validated against the header width and cells are kept as
//! the exact strings the export contained (empty cells included).
//!
//! Quoting is checked strictly before the records are read. A quoted field
//! must be closed, and its closing quote must end the field. A `"` inside an
//! unquoted field is rejected. Both are reported as [`SheetError::Parse`]
//! with the line they were found on.

use csv::ReaderBuilder;
use reqwest::{Client, StatusCode};
use std::fmt;
use thiserror::Error;

/// Scheme and host of the public spreadsheet export endpoint.
pub const DEFAULT_SHEET_HOST: &str = "https://docs.google.com";

/// The tab that gets exported. Always the first one.
pub const DEFAULT_SHEET_GID: &str = "0";

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("could not fetch sheet data: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("could not parse CSV: {0}")]
    Parse(String),
    #[error("no data found in sheet")]
    Empty,
}

impl From<csv::Error> for SheetError {
    fn from(err: csv::Error) -> Self {
        SheetError::Parse(err.to_string())
    }
}

/// Address of a spreadsheet's CSV export. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUrl(String);

impl SheetUrl {
    /// URL for `spreadsheet_id` on the public export host.
    pub fn new(spreadsheet_id: &str) -> Self {
        Self::with_base(DEFAULT_SHEET_HOST, spreadsheet_id)
    }

    /// URL for `spreadsheet_id` on an arbitrary host, e.g. a local stub.
    pub fn with_base(base: &str, spreadsheet_id: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self(format!(
            "{base}/spreadsheets/d/{spreadsheet_id}/gviz/tq?tqx=out:csv&gid={DEFAULT_SHEET_GID}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded export: the header record and the data records after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// GET the export and decode it.
///
/// Anything other than `200 OK` is reported as [`SheetError::Status`] without
/// looking at the body.
pub async fn fetch_sheet(client: &Client, url: &SheetUrl) -> Result<Sheet, SheetError> {
    let response = client.get(url.as_str()).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(SheetError::Status(status.as_u16()));
    }

    let body = response.bytes().await?;
    decode_csv(&body)
}

/// Decode a CSV body into a [`Sheet`].
///
/// Records may have any number of fields. Zero records is an error.
pub fn decode_csv(body: &[u8]) -> Result<Sheet, SheetError> {
    check_quoting(body).map_err(SheetError::Parse)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_owned).collect::<Vec<_>>());
    }

    let mut records = records.into_iter();
    let headers = records.next().ok_or(SheetError::Empty)?;
    Ok(Sheet {
        headers,
        rows: records.collect(),
    })
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A `"` was seen inside a quoted field: either an escaped quote or the end.
    QuoteInQuoted,
    /// Closed quoted field followed by `\r`. Only a separator may follow.
    Closed,
}

/// Reject unterminated quoted fields, text after a closing quote, and bare
/// quotes in unquoted fields. Lines are counted from 1.
fn check_quoting(body: &[u8]) -> Result<(), String> {
    use QuoteState::*;

    let extraneous =
        |line: usize| format!("line {line}: extraneous or missing \" in quoted field");
    let mut state = FieldStart;
    let mut line = 1;
    let mut field_line = 1;

    for &byte in body {
        state = match (state, byte) {
            (FieldStart, b'"') => {
                field_line = line;
                Quoted
            }
            (Quoted, b'"') => QuoteInQuoted,
            (QuoteInQuoted, b'"') => Quoted,
            (Unquoted, b'"') => return Err(format!("line {line}: bare \" in non-quoted field")),
            (Quoted, b'\n') => {
                line += 1;
                Quoted
            }
            (Quoted, _) => Quoted,
            (_, b'\n') => {
                line += 1;
                FieldStart
            }
            (_, b',') => FieldStart,
            (QuoteInQuoted | Closed, b'\r') => Closed,
            (QuoteInQuoted | Closed, _) => return Err(extraneous(line)),
            (FieldStart | Unquoted, _) => Unquoted,
        };
    }

    match state {
        Quoted => Err(extraneous(field_line)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn url_targets_first_tab_csv_export() {
        let url = SheetUrl::new("abc123");
        assert_eq!(
            url.as_str(),
            "https://docs.google.com/spreadsheets/d/abc123/gviz/tq?tqx=out:csv&gid=0"
        );
    }

    #[test]
    fn url_with_base_strips_trailing_slash() {
        let url = SheetUrl::with_base("http://127.0.0.1:9000/", "xyz");
        assert_eq!(
            url.to_string(),
            "http://127.0.0.1:9000/spreadsheets/d/xyz/gviz/tq?tqx=out:csv&gid=0"
        );
    }

    #[test]
    fn decode_splits_headers_from_rows() {
        let body = b"Header1,Header2\nRow1Col1,Row1Col2\nRow2Col1,Row2Col2\n";
        let sheet = decode_csv(body).unwrap();
        assert_eq!(sheet.headers, strings(&["Header1", "Header2"]));
        assert_eq!(
            sheet.rows,
            vec![
                strings(&["Row1Col1", "Row1Col2"]),
                strings(&["Row2Col1", "Row2Col2"]),
            ]
        );
    }

    #[test]
    fn decode_without_trailing_newline() {
        let sheet = decode_csv(b"a,b\n1,2").unwrap();
        assert_eq!(sheet.rows, vec![strings(&["1", "2"])]);
    }

    #[test]
    fn decode_header_only_has_no_rows() {
        let sheet = decode_csv(b"Name,Score\n").unwrap();
        assert_eq!(sheet.headers, strings(&["Name", "Score"]));
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn decode_keeps_empty_cells() {
        let sheet = decode_csv(b"a,b,c\n1,,3\n,,\n").unwrap();
        assert_eq!(sheet.rows[0], strings(&["1", "", "3"]));
        assert_eq!(sheet.rows[1], strings(&["", "", ""]));
    }

    #[test]
    fn decode_honours_quoted_commas_and_newlines() {
        let body = b"name,note\n\"Smith, Jane\",\"line one\nline two\"\n\"say \"\"hi\"\"\",x\n";
        let sheet = decode_csv(body).unwrap();
        assert_eq!(sheet.rows[0], strings(&["Smith, Jane", "line one\nline two"]));
        assert_eq!(sheet.rows[1], strings(&["say \"hi\"", "x"]));
    }

    #[test]
    fn decode_does_not_enforce_header_width() {
        let sheet = decode_csv(b"a,b\n1\n1,2,3\n").unwrap();
        assert_eq!(sheet.rows[0], strings(&["1"]));
        assert_eq!(sheet.rows[1], strings(&["1", "2", "3"]));
    }

    #[test]
    fn decode_crlf_line_endings() {
        let sheet = decode_csv(b"a,b\r\n1,2\r\n").unwrap();
        assert_eq!(sheet.headers, strings(&["a", "b"]));
        assert_eq!(sheet.rows, vec![strings(&["1", "2"])]);
    }

    #[test]
    fn decode_empty_body_is_empty_error() {
        let err = decode_csv(b"").unwrap_err();
        assert!(matches!(err, SheetError::Empty));
        assert_eq!(err.to_string(), "no data found in sheet");
    }

    #[test]
    fn decode_invalid_utf8_is_parse_error() {
        let err = decode_csv(b"a,b\n\xff\xfe,2\n").unwrap_err();
        assert!(matches!(err, SheetError::Parse(_)));
        assert!(err.to_string().starts_with("could not parse CSV: "));
    }

    #[test]
    fn decode_unterminated_quote_is_parse_error() {
        let err = decode_csv(b"a,b\n\"open,2\n3,4\n").unwrap_err();
        assert!(matches!(err, SheetError::Parse(_)));
        assert_eq!(
            err.to_string(),
            "could not parse CSV: line 2: extraneous or missing \" in quoted field"
        );
    }

    #[test]
    fn decode_bare_quote_in_unquoted_field_is_parse_error() {
        let err = decode_csv(b"a,b\nx\"y,2\n").unwrap_err();
        assert!(matches!(err, SheetError::Parse(_)));
        assert_eq!(
            err.to_string(),
            "could not parse CSV: line 2: bare \" in non-quoted field"
        );
    }

    #[test]
    fn decode_text_after_closing_quote_is_parse_error() {
        let err = decode_csv(b"a,b\n\"one\"two,2\n").unwrap_err();
        assert!(matches!(err, SheetError::Parse(_)));
    }

    #[test]
    fn decode_quoted_field_with_crlf_and_at_end_of_input() {
        let sheet = decode_csv(b"a,b\r\n\"x\",\"y\"\r\n\"last\"").unwrap();
        assert_eq!(sheet.rows, vec![strings(&["x", "y"]), strings(&["last"])]);
    }

    #[test]
    fn status_error_message_carries_code() {
        assert_eq!(
            SheetError::Status(404).to_string(),
            "unexpected status code: 404"
        );
    }
}
