//! Page rendering from Go-template files.
//!
//! Templates are read from disk at render time, so the page layout can be
//! edited without rebuilding. The template sees the context described in
//! [`crate::page`]: a table built from `Headers` and `Rows`, and an `Error`
//! banner when the sheet could not be loaded.
//!
//! Template and output failures are returned to the caller. What happens next
//! depends on the mode: the server answers with a 500, static generation
//! aborts the run.

use crate::page::PageData;
use gtmpl::{Context, Template};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("could not open template {path:?}: {source}")]
    OpenTemplate { path: PathBuf, source: io::Error },
    #[error("could not parse template: {0}")]
    ParseTemplate(String),
    #[error("could not execute template: {0}")]
    Execute(String),
    #[error("could not create output file {path:?}: {source}")]
    CreateOutput { path: PathBuf, source: io::Error },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Built-in page template, printed by `sheet-site gen-template`.
pub const STOCK_TEMPLATE: &str = include_str!("../templates/index.html.tmpl");

/// Parse template source text.
pub fn parse_template(source: &str) -> Result<Template, RenderError> {
    let mut template = Template::default();
    template.parse(source).map_err(RenderError::ParseTemplate)?;
    Ok(template)
}

/// Read and parse the template at `path`.
pub fn load_template(path: &Path) -> Result<Template, RenderError> {
    let source = fs::read_to_string(path).map_err(|source| RenderError::OpenTemplate {
        path: path.to_owned(),
        source,
    })?;
    parse_template(&source)
}

/// Execute `template` against `data`, writing the page to `writer`.
pub fn render_page<W: Write>(
    template: &Template,
    data: &PageData,
    writer: &mut W,
) -> Result<(), RenderError> {
    let context = Context::from(data.to_value()).map_err(RenderError::Execute)?;
    template
        .execute(writer, &context)
        .map_err(RenderError::Execute)
}

/// Render into an in-memory string.
pub fn render_to_string(template: &Template, data: &PageData) -> Result<String, RenderError> {
    let mut buf = Vec::new();
    render_page(template, data, &mut buf)?;
    String::from_utf8(buf).map_err(|e| RenderError::Execute(e.to_string()))
}

/// Render into a newly created (or truncated) file at `path`.
pub fn render_to_file(
    template: &Template,
    data: &PageData,
    path: &Path,
) -> Result<(), RenderError> {
    let file = File::create(path).map_err(|source| RenderError::CreateOutput {
        path: path.to_owned(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    render_page(template, data, &mut writer)?;
    writer.flush()?;
    Ok(())
}
