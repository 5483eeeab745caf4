//! CLI output formatting for `sheet-site build`.
//!
//! Each report has a `format_*` function returning lines, for testability, and
//! a `print_*` wrapper that writes them to stdout.
//!
//! ```text
//! Sheet: 2 columns, 14 rows
//! Page → public/index.html
//! Assets: 3 files from static/
//! ```
//!
//! When the sheet could not be loaded the first line carries the banner text
//! instead, since that is what the generated page shows:
//!
//! ```text
//! Sheet: Could not load data: unexpected status code: 404
//! ```

use crate::generate::GenerateSummary;
use std::path::Path;

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

pub fn format_generate_output(summary: &GenerateSummary, static_dir: &Path) -> Vec<String> {
    let sheet = match &summary.fetch_error {
        Some(error) => format!("Sheet: {error}"),
        None => format!(
            "Sheet: {}, {}",
            plural(summary.columns, "column", "columns"),
            plural(summary.rows, "row", "rows")
        ),
    };

    vec![
        sheet,
        format!("Page → {}", summary.page.display()),
        format!(
            "Assets: {} from {}/",
            plural(summary.assets, "file", "files"),
            static_dir.display()
        ),
    ]
}

pub fn print_generate_output(summary: &GenerateSummary, static_dir: &Path) {
    for line in format_generate_output(summary, static_dir) {
        println!("{}", line);
    }
}
