//! The rendering payload handed to page templates.
//!
//! A [`PageData`] is built fresh for every render, either from a decoded
//! [`Sheet`] or from the error that prevented one. Fetch and decode failures
//! never abort a render; they become a banner message instead.
//!
//! ## Template context
//!
//! [`PageData::to_value`] exposes three fields to the template:
//!
//! | Field | Type | Contents |
//! |-------|------|----------|
//! | `Headers` | list of strings | header record |
//! | `Rows` | list of lists of strings | data records |
//! | `Error` | string | banner text, empty on success |
//!
//! Spreadsheet content is untrusted. Every string is HTML-escaped before it is
//! bound, so a template printing `{{.}}` can never emit markup taken from a
//! cell.

use crate::sheet::{Sheet, SheetError};
use gtmpl::Value;
use maud::html;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Banner text. Empty when the sheet loaded.
    pub error: String,
}

impl PageData {
    pub fn from_sheet(sheet: Sheet) -> Self {
        Self {
            headers: sheet.headers,
            rows: sheet.rows,
            error: String::new(),
        }
    }

    pub fn from_error(err: &SheetError) -> Self {
        Self {
            error: format!("Could not load data: {err}"),
            ..Self::default()
        }
    }

    pub fn from_fetch(result: Result<Sheet, SheetError>) -> Self {
        match result {
            Ok(sheet) => Self::from_sheet(sheet),
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// Template context object with every string escaped.
    pub fn to_value(&self) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("Headers".to_owned(), string_list(&self.headers));
        m.insert(
            "Rows".to_owned(),
            Value::Array(self.rows.iter().map(|row| string_list(row)).collect()),
        );
        m.insert("Error".to_owned(), Value::String(escape(&self.error)));
        Value::Object(m)
    }
}

fn string_list(cells: &[String]) -> Value {
    Value::Array(cells.iter().map(|c| Value::String(escape(c))).collect())
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Sheet {
        Sheet {
            headers: vec!["Name".into(), "Score".into()],
            rows: vec![vec!["Ada".into(), "10".into()]],
        }
    }

    fn field<'a>(value: &'a Value, name: &str) -> &'a Value {
        match value {
            Value::Object(m) => m.get(name).unwrap(),
            _ => panic!("expected an object"),
        }
    }

    fn items(value: &Value) -> &[Value] {
        match value {
            Value::Array(items) => items,
            _ => panic!("expected an array"),
        }
    }

    fn text(value: &Value) -> &str {
        match value {
            Value::String(s) => s,
            _ => panic!("expected a string"),
        }
    }

    #[test]
    fn from_fetch_success_has_no_error() {
        let data = PageData::from_fetch(Ok(sample()));
        assert!(!data.has_error());
        assert_eq!(data.headers, vec!["Name", "Score"]);
        assert_eq!(data.rows, vec![vec!["Ada", "10"]]);
    }

    #[test]
    fn from_fetch_failure_sets_banner_only() {
        let data = PageData::from_fetch(Err(SheetError::Status(500)));
        assert_eq!(data.error, "Could not load data: unexpected status code: 500");
        assert!(data.headers.is_empty());
        assert!(data.rows.is_empty());
    }

    #[test]
    fn header_only_sheet_is_not_an_error() {
        let data = PageData::from_sheet(Sheet {
            headers: vec!["Only".into()],
            rows: vec![],
        });
        assert!(!data.has_error());
        assert!(data.rows.is_empty());
    }

    #[test]
    fn to_value_escapes_cells() {
        let data = PageData::from_sheet(Sheet {
            headers: vec!["<b>".into()],
            rows: vec![vec!["<script>alert(1)</script>".into(), "a & b".into()]],
        });
        let value = data.to_value();

        assert_eq!(text(&items(field(&value, "Headers"))[0]), "&lt;b&gt;");
        let row = items(&items(field(&value, "Rows"))[0]);
        assert_eq!(text(&row[0]), "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert_eq!(text(&row[1]), "a &amp; b");
    }

    #[test]
    fn to_value_has_empty_error_on_success() {
        let value = PageData::from_sheet(sample()).to_value();
        assert_eq!(text(field(&value, "Error")), "");
    }
}
