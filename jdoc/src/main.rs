//! jdoc renders API reference documentation from structured site files.
//!
//! Site files (JSON, YAML or TOML) describe REST endpoints and guide pages
//! arranged in a navigation tree. Subcommands:
//!
//! - **render**: static HTML/Markdown/JSON output, one file per section
//! - **snippet**: print one endpoint's code sample in a given language
//! - **simulate**: run the mock submission form on a JSON payload
//! - **browse**: interactive session over stdin/stdout
//! - **check**: load and validate site files

mod clipboard;
mod loader;
mod logging;
mod render;
mod session;
mod toc;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use jdoc_core::codegen::{self, Lang};
use jdoc_core::model::Site;
use jdoc_core::nav;
use jdoc_core::simulate::{evaluate, simulate};
use jdoc_core::surface::Surface;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "jdoc",
    version,
    about = "Render API reference documentation from structured site files"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Override the site title shown in the sidebar
    #[arg(long, global = true)]
    title: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the site, or a single section, to a static format
    Render {
        /// Site files, directories or glob patterns
        #[arg(required = true)]
        files: Vec<String>,

        /// Output directory (required unless --section is given)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format: html (default), markdown, json
        #[arg(short = 'f', long, default_value = "html")]
        format: String,

        /// Print only this section to stdout
        #[arg(long)]
        section: Option<String>,

        /// Code sample tab selected in the output
        #[arg(long, default_value = "HTTP")]
        tab: String,
    },

    /// Print the code sample for one endpoint
    Snippet {
        #[arg(required = true)]
        files: Vec<String>,

        /// Endpoint section id
        #[arg(long)]
        section: String,

        /// HTTP, JavaScript, PHP, Python or Go
        #[arg(long, default_value = "HTTP")]
        lang: String,
    },

    /// Run the mock call simulator on a JSON payload (argument or stdin)
    Simulate {
        payload: Option<String>,

        /// Skip the simulated network latency
        #[arg(long)]
        no_delay: bool,
    },

    /// Interactive session over stdin/stdout
    Browse {
        #[arg(required = true)]
        files: Vec<String>,

        /// Output format for rendered views
        #[arg(short = 'f', long, default_value = "markdown")]
        format: String,

        /// Shell command that receives copied text on stdin
        #[arg(long, env = "JDOC_CLIPBOARD")]
        clipboard_cmd: Option<String>,
    },

    /// Load and validate site files
    Check {
        #[arg(required = true)]
        files: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    match &cli.command {
        Commands::Render {
            files,
            output,
            format,
            section,
            tab,
        } => {
            let site = load_site(files, cli.title.as_deref())?;
            let tab: Lang = tab.parse()?;
            let renderer = render::create_renderer(format)?;
            match (output, section) {
                (Some(dir), _) => {
                    let written = render::write_site(&site, renderer.as_ref(), tab, dir)?;
                    info!(files = written.len(), dir = %dir.display(), "site rendered");
                }
                (None, Some(id)) => {
                    let mut surface = Surface::new(&site);
                    surface.state_mut().select(id.as_str());
                    surface.state_mut().select_tab(tab);
                    print!("{}", renderer.render(&surface));
                }
                (None, None) => bail!("--output is required unless --section is given"),
            }
        }
        Commands::Snippet {
            files,
            section,
            lang,
        } => {
            let site = load_site(files, cli.title.as_deref())?;
            let lang: Lang = lang.parse()?;
            let spec = nav::resolve(&site.sections, section)
                .spec()
                .with_context(|| format!("section '{}' is not an endpoint", section))?;
            println!("{}", codegen::generate(spec, lang));
        }
        Commands::Simulate { payload, no_delay } => {
            let raw = match payload {
                Some(p) => p.clone(),
                None => {
                    let mut input = String::new();
                    io::stdin()
                        .read_to_string(&mut input)
                        .context("failed to read stdin")?;
                    input
                }
            };
            let result = if *no_delay {
                evaluate(&raw)
            } else {
                runtime()?.block_on(simulate(&raw))
            };
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Browse {
            files,
            format,
            clipboard_cmd,
        } => {
            let site = load_site(files, cli.title.as_deref())?;
            let renderer = render::create_renderer(format)?;
            let clipboard = clipboard::CommandClipboard::new(clipboard_cmd.clone());
            let session = session::Session::new(&site, renderer, Box::new(clipboard), io::stdout());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            runtime()?.block_on(session.run(stdin))?;
        }
        Commands::Check { files } => {
            let mut site = loader::load(files)?;
            if let Some(title) = &cli.title {
                site.title = Some(title.clone());
            }
            let diagnostics = loader::validate(&site);
            for diagnostic in &diagnostics {
                println!("{}", diagnostic);
            }
            let errors = diagnostics.iter().filter(|d| d.is_error()).count();
            if errors > 0 {
                bail!("{} error(s) found", errors);
            }
            println!(
                "ok: {} sections, {} pages and endpoints",
                site.sections.len(),
                nav::leaf_ids(&site.sections).len()
            );
        }
    }

    Ok(())
}

/// Load, apply the title override, and refuse sites with validation errors.
fn load_site(files: &[String], title: Option<&str>) -> Result<Site> {
    let mut site = loader::load(files)?;
    if let Some(title) = title {
        site.title = Some(title.to_string());
    }
    loader::ensure_valid(&site)?;
    Ok(site)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start async runtime")
}
