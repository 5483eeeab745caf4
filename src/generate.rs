//! Static site generation.
//!
//! One run of `sheet-site build`:
//!
//! ```text
//! 1. Fetch    sheet URL             →  PageData   (errors become the banner)
//! 2. Render   templates/index.html.tmpl  →  public/index.html
//! 3. Publish  static/               →  public/
//! ```
//!
//! A failed fetch still produces a page. Everything after the fetch is
//! file-system work, and any failure there aborts the run.
//!
//! The output is a function of the upstream CSV, the template and the static
//! tree only, so two runs against unchanged inputs write identical files.

use crate::page::PageData;
use crate::publish::{PublishError, copy_static_assets};
use crate::render::{RenderError, load_template, render_to_file};
use crate::sheet::{SheetUrl, fetch_sheet};
use reqwest::Client;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("could not create output directory {path:?}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("could not copy static assets: {0}")]
    Publish(#[from] PublishError),
}

/// Inputs and outputs of a static build.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub sheet_url: SheetUrl,
    /// Page template, e.g. `templates/index.html.tmpl`.
    pub template: PathBuf,
    /// Output directory; the page lands at `<output_dir>/index.html`.
    pub output_dir: PathBuf,
    /// Tree mirrored into `output_dir` after the page is written.
    pub static_dir: PathBuf,
}

/// What a build produced, for the CLI report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub page: PathBuf,
    pub columns: usize,
    pub rows: usize,
    /// Banner text when the sheet could not be loaded.
    pub fetch_error: Option<String>,
    pub assets: usize,
}

/// Fetch the sheet and write the site.
pub async fn generate(
    client: &Client,
    options: &GenerateOptions,
) -> Result<GenerateSummary, GenerateError> {
    let data = PageData::from_fetch(fetch_sheet(client, &options.sheet_url).await);
    if data.has_error() {
        warn!(url = %options.sheet_url, error = %data.error, "rendering error banner");
    }
    write_site(&data, options)
}

/// Write the page for `data` and mirror the static tree.
pub fn write_site(
    data: &PageData,
    options: &GenerateOptions,
) -> Result<GenerateSummary, GenerateError> {
    fs::create_dir_all(&options.output_dir).map_err(|source| {
        GenerateError::CreateOutputDir {
            path: options.output_dir.clone(),
            source,
        }
    })?;

    let template = load_template(&options.template)?;
    let page = options.output_dir.join("index.html");
    render_to_file(&template, data, &page)?;

    let assets = copy_static_assets(&options.static_dir, &options.output_dir)?;

    info!(page = %page.display(), rows = data.rows.len(), assets, "generated static site");

    Ok(GenerateSummary {
        page,
        columns: data.headers.len(),
        rows: data.rows.len(),
        fetch_error: data.has_error().then(|| data.error.clone()),
        assets,
    })
}
