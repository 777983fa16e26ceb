//! sheetgantt CLI - Gantt charts from spreadsheets
//!
//! Command-line interface for rendering, exporting and storing task sheets.

mod logging;
mod settings;
mod store;
mod tabular;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sheetgantt_core::{
    ChartSession, CollapseStrategy, Connector, DependencyEdge, Renderer, RowGeometry, Task,
    TimelineRange,
};
use sheetgantt_render::{GanttTheme, HtmlGanttRenderer, SvgRenderer, TextRenderer};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use settings::{RenderSettings, Settings};
use store::{BlobStore, LocalBlobStore, StoreError};

#[derive(Parser)]
#[command(name = "sheetgantt")]
#[command(author, version, about = "Gantt charts from spreadsheet task lists", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Settings file (TOML with [layout] and [render] tables)
    #[arg(long, global = true, value_name = "PATH", env = "SHEETGANTT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a task sheet as a chart
    Render {
        /// Input file path (.csv or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,

        /// Collapse a project before rendering (repeatable)
        #[arg(long = "collapse", value_name = "ID")]
        collapse: Vec<String>,

        /// Collapse every project
        #[arg(long)]
        collapse_all: bool,

        /// Collapse strategy (single-level or transitive)
        #[arg(long)]
        strategy: Option<CollapseStrategy>,

        /// Dark theme for HTML and SVG output
        #[arg(long)]
        dark: bool,

        /// Date used for due-state and the empty-sheet window
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<NaiveDate>,
    },

    /// Dump tasks, row geometry and connectors as JSON
    Layout {
        /// Input file path (.csv or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Date used for due-state and the empty-sheet window
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<NaiveDate>,
    },

    /// Replace the stored task sheet
    Upload {
        /// Input file path (.csv or .json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Store directory
        #[arg(long, value_name = "DIR")]
        store: PathBuf,
    },

    /// Print the download URL of the stored task sheet
    Download {
        /// Store directory
        #[arg(long, value_name = "DIR")]
        store: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Html,
    Svg,
    Text,
    Json,
}

/// Serialized view of a session
#[derive(Serialize)]
struct LayoutExport<'a> {
    today: NaiveDate,
    timeline: &'a TimelineRange,
    canvas_width: f64,
    canvas_height: f64,
    tasks: &'a [Task],
    rows: &'a [RowGeometry],
    edges: &'a [DependencyEdge],
    connectors: &'a [Connector],
    collapsed: Vec<&'a str>,
}

impl<'a> LayoutExport<'a> {
    fn from_session(session: &'a ChartSession) -> Self {
        let layout = session.layout();
        Self {
            today: session.today(),
            timeline: session.timeline(),
            canvas_width: layout.canvas_width,
            canvas_height: layout.canvas_height,
            tasks: session.tasks(),
            rows: &layout.rows,
            edges: session.edges(),
            connectors: session.connectors(),
            collapsed: session.visibility().collapsed().collect(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load_from_path(path),
        None => Settings::default(),
    };

    match cli.command {
        Commands::Render {
            file,
            output,
            format,
            collapse,
            collapse_all,
            strategy,
            dark,
            today,
        } => {
            let mut settings = settings;
            if let Some(strategy) = strategy {
                settings.layout.collapse_strategy = strategy;
            }
            settings.render.dark |= dark;

            let mut session = load_session(&file, &settings, today)?;
            if collapse_all {
                session.collapse_all();
            }
            for id in &collapse {
                if !session.set_expanded(id, false) {
                    warn!("no project with id '{}' to collapse", id);
                }
            }

            let rendered = render(&session, format, &settings.render, &file)?;
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Layout { file, today } => {
            let session = load_session(&file, &settings, today)?;
            let json = layout_json(&session)?;
            write_output(None, &json)?;
        }
        Commands::Upload { file, store } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read file: {}", file.display()))?;
            // Reject sheets the tabular source cannot read before replacing the stored one
            tabular::parse_bytes(&bytes, tabular::Format::from_path(&file))
                .with_context(|| format!("Not a readable task sheet: {}", file.display()))?;
            let url = upload(&store, &file, &bytes)?;
            println!("{}", url);
        }
        Commands::Download { store } => {
            let url = download(&store)?;
            println!("{}", url);
        }
    }

    Ok(())
}

fn load_session(file: &Path, settings: &Settings, today: Option<NaiveDate>) -> Result<ChartSession> {
    let grid = tabular::read_grid(file)
        .with_context(|| format!("Failed to load task sheet: {}", file.display()))?;
    let config = settings.layout.clone();
    let mut session = match today {
        Some(day) => ChartSession::with_today(config, day),
        None => ChartSession::new(config),
    };
    session.load(&grid);
    Ok(session)
}

fn render(
    session: &ChartSession,
    format: OutputFormat,
    render_settings: &RenderSettings,
    file: &Path,
) -> Result<String> {
    let frame = session.frame();
    let rendered = match format {
        OutputFormat::Html => {
            let title = render_settings.title.clone().unwrap_or_else(|| {
                file.file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Gantt chart".to_string())
            });
            let mut renderer = HtmlGanttRenderer::new().title(title);
            if render_settings.dark {
                renderer = renderer.dark_theme();
            }
            if let Some(width) = render_settings.label_width {
                renderer = renderer.label_width(width);
            }
            if !render_settings.show_dependencies {
                renderer = renderer.hide_dependencies();
            }
            if !render_settings.show_today {
                renderer = renderer.hide_today();
            }
            renderer.render(&frame)?
        }
        OutputFormat::Svg => {
            let mut renderer = SvgRenderer::new();
            if render_settings.dark {
                renderer = renderer.theme(GanttTheme::dark());
            }
            if let Some(width) = render_settings.label_width {
                renderer = renderer.label_width(width);
            }
            renderer.render(&frame)?
        }
        OutputFormat::Text => TextRenderer.render(&frame)?,
        OutputFormat::Json => layout_json(session)?,
    };
    Ok(rendered)
}

fn layout_json(session: &ChartSession) -> Result<String> {
    let export = LayoutExport::from_session(session);
    let mut json = serde_json::to_string_pretty(&export).context("Failed to serialize layout")?;
    json.push('\n');
    Ok(json)
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            debug!(path = %path.display(), bytes = content.len(), "wrote output");
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// One store per accepted sheet format; only one holds a document at a time
fn stores(dir: &Path) -> [LocalBlobStore; 2] {
    [
        LocalBlobStore::new(dir),
        LocalBlobStore::new(dir).with_file_name("current.json"),
    ]
}

fn upload(dir: &Path, file: &Path, bytes: &[u8]) -> Result<String> {
    let [csv_store, json_store] = stores(dir);
    let (target, other) = match tabular::Format::from_path(file) {
        tabular::Format::Json => (json_store, csv_store),
        tabular::Format::Csv => (csv_store, json_store),
    };

    target
        .put(bytes)
        .with_context(|| format!("Upload to {} failed", dir.display()))?;
    let stale = other.document_path();
    if stale.exists() {
        std::fs::remove_file(&stale)
            .with_context(|| format!("Failed to remove previous document: {}", stale.display()))?;
    }
    Ok(target.get()?)
}

fn download(dir: &Path) -> Result<String> {
    for store in stores(dir) {
        match store.get() {
            Ok(url) => return Ok(url),
            Err(StoreError::NotFound(_)) => continue,
            Err(e) => return Err(e).context("Download failed"),
        }
    }
    bail!("Download failed: {}", StoreError::NotFound(dir.display().to_string()))
}
