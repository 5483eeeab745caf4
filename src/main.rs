use clap::{Parser, Subcommand};
use sheet_site::config::{self, SPREADSHEET_ID_KEY};
use sheet_site::generate::{self, GenerateOptions};
use sheet_site::output;
use sheet_site::render::STOCK_TEMPLATE;
use sheet_site::server::{self, ServeOptions};
use sheet_site::sheet::{DEFAULT_SHEET_HOST, SheetUrl};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sheet-site")]
#[command(about = "Publish a spreadsheet as an HTML page")]
#[command(long_about = "\
Publish a spreadsheet as an HTML page

The spreadsheet's first tab is fetched as CSV from its public export and
rendered into a table, either live on every request or once into a static
site.

Static build layout:

  templates/index.html.tmpl   # Page template (Go template syntax)
  static/                     # Copied verbatim into public/
  public/index.html           # Generated page

Template context:

  .Headers   header row
  .Rows      data rows, each a list of cells
  .Error     error banner text, empty when the sheet loaded

Values are HTML-escaped before they reach the template; print them with {{.}}.

The starter template links style.css relative to the page, which fits a
static build deployed with public/ as the site root. A template for 'serve'
is rendered at / and must link its assets under /public/ instead.

Run 'sheet-site gen-template' to print a starter template.")]
#[command(version)]
struct Cli {
    /// Scheme and host of the spreadsheet export endpoint
    #[arg(long, default_value = DEFAULT_SHEET_HOST, global = true)]
    sheet_base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the sheet once and write a static site
    Build {
        /// Spreadsheet identifier
        #[arg(long, env = "SPREADSHEET_ID")]
        spreadsheet_id: Option<String>,

        /// Page template
        #[arg(long, default_value = "templates/index.html.tmpl")]
        template: PathBuf,

        /// Output directory
        #[arg(long = "output", default_value = "public")]
        output_dir: PathBuf,

        /// Static assets copied into the output directory
        #[arg(long, default_value = "static")]
        static_dir: PathBuf,
    },
    /// Serve the sheet over HTTP, re-fetching on every request
    Serve {
        /// Spreadsheet identifier
        #[arg(long, env = "SPREADSHEET_ID")]
        spreadsheet_id: Option<String>,

        /// Two-column CSV config providing `spreadsheetID` (takes precedence)
        #[arg(long = "config")]
        config_file: Option<PathBuf>,

        /// Address to listen on
        #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8080")]
        listen: SocketAddr,

        /// Page template, re-read on every request
        #[arg(long, default_value = "public/index.html")]
        template: PathBuf,

        /// Directory served under /public/
        #[arg(long, default_value = "public")]
        public_dir: PathBuf,
    },
    /// Print a starter page template
    GenTemplate,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("FATAL: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Build {
            spreadsheet_id,
            template,
            output_dir,
            static_dir,
        } => {
            let spreadsheet_id = require_spreadsheet_id(spreadsheet_id)?;
            let options = GenerateOptions {
                sheet_url: SheetUrl::with_base(&cli.sheet_base_url, &spreadsheet_id),
                template,
                output_dir,
                static_dir,
            };
            let summary = generate::generate(&reqwest::Client::new(), &options).await?;
            output::print_generate_output(&summary, &options.static_dir);
        }
        Command::Serve {
            spreadsheet_id,
            config_file,
            listen,
            template,
            public_dir,
        } => {
            let spreadsheet_id = match config_file {
                Some(path) => config::load_config(&path)?
                    .require(SPREADSHEET_ID_KEY)?
                    .to_owned(),
                None => require_spreadsheet_id(spreadsheet_id)?,
            };
            let options = ServeOptions {
                sheet_url: SheetUrl::with_base(&cli.sheet_base_url, &spreadsheet_id),
                template,
                public_dir,
            };
            server::serve(listen, reqwest::Client::new(), options).await?;
        }
        Command::GenTemplate => {
            print!("{}", STOCK_TEMPLATE);
        }
    }

    Ok(())
}

/// An unset or empty `SPREADSHEET_ID` is fatal.
fn require_spreadsheet_id(id: Option<String>) -> Result<String, &'static str> {
    id.filter(|id| !id.is_empty())
        .ok_or("SPREADSHEET_ID environment variable not set")
}
