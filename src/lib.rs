//! # Sheet Site
//!
//! Publishes a spreadsheet's contents as an HTML page. The spreadsheet is the
//! data source: its first tab is fetched as CSV from the public export
//! endpoint and rendered into a table, either on every request by a small
//! HTTP server or once into a static `public/` directory.
//!
//! # Pipeline
//!
//! ```text
//! 1. Fetch    sheet URL  →  CSV bytes      (one GET, no retries, no cache)
//! 2. Decode   CSV bytes  →  headers + rows
//! 3. Render   template   →  index.html     (HTTP response or file)
//! 4. Publish  static/    →  public/        (static builds only)
//! ```
//!
//! Every stage is synchronous with respect to the next and single-shot. A
//! failure in stages 1-2 is not fatal: the page is rendered with an error
//! banner in place of the table. A failure in stages 3-4 is: the server
//! answers 500, a static build stops.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`sheet`] | Export URL, HTTP fetch, CSV decoding |
//! | [`page`] | The rendering payload and its template context |
//! | [`render`] | Go-template loading and execution |
//! | [`publish`] | Recursive static-asset mirroring |
//! | [`config`] | Two-column CSV key/value config |
//! | [`generate`] | Static build: fetch → render → publish |
//! | [`server`] | HTTP surface: `/` and `/public/*` |
//! | [`output`] | CLI output formatting for builds |
//!
//! # Design Decisions
//!
//! ## Runtime Templates
//!
//! The page layout lives in a template file (`templates/index.html.tmpl` for
//! builds, `public/index.html` for the server) rather than in the binary, so
//! the page can be restyled without a rebuild. The server re-reads its
//! template on every request.
//!
//! Asset links differ between the two. A static build is deployed with
//! `public/` as the site root, so the stock template links `style.css`
//! relative to the page. The server renders at `/` and serves files under
//! `/public/`, so a server template links `/public/style.css`.
//!
//! ## Escape Before Binding
//!
//! Cell contents are untrusted. Every string is HTML-escaped while the template
//! context is built, so no template can reflect spreadsheet markup into the
//! page, whatever it does with the values.
//!
//! ## No Caching
//!
//! Every request and every build re-fetches the sheet. The page is always as
//! fresh as the spreadsheet's published export.

pub mod config;
pub mod generate;
pub mod output;
pub mod page;
pub mod publish;
pub mod render;
pub mod server;
pub mod sheet;
