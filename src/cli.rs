use crate::config::{Config, load_config};
use crate::fetch::fetch_rows;
use crate::record::normalize;
use crate::render::{render_flowchart, render_timeline, write_text};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "famtree",
    version,
    about = "Genealogy CSV to Mermaid family tree and lifespan timeline"
)]
pub struct Args {
    /// Input CSV file or '-' for stdin.
    /// Takes precedence over `--url` / `CSV_URL`.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Download the CSV from this URL
    #[arg(short = 'u', long = "url", env = "CSV_URL")]
    pub url: Option<String>,

    /// Output directory. Diagrams go to stdout if omitted.
    #[arg(short = 'o', long = "out-dir", env = "OUT_FOLDER")]
    pub out_dir: Option<PathBuf>,

    /// Which diagrams to generate
    #[arg(short = 'd', long = "diagram", value_enum, default_value = "all")]
    pub diagram: DiagramKind,

    /// Config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Year used as "now" when computing ages of living persons
    #[arg(long = "year")]
    pub year: Option<i32>,

    /// Log assumptions made while building the timeline
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramKind {
    Flowchart,
    Timeline,
    All,
}

impl DiagramKind {
    fn includes_flowchart(self) -> bool {
        matches!(self, Self::Flowchart | Self::All)
    }

    fn includes_timeline(self) -> bool {
        matches!(self, Self::Timeline | Self::All)
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(year) = args.year {
        config.reference_year = Some(year);
    }

    let source = resolve_source(&args);
    let rows = fetch_rows(&source)?;
    let persons = normalize(&rows);
    tracing::info!(source = %source, persons = persons.len(), "loaded genealogy");

    for (kind, output) in resolve_outputs(args.diagram, args.out_dir.as_deref(), &config) {
        let text = match kind {
            DiagramKind::Flowchart => render_flowchart(&persons, &config),
            DiagramKind::Timeline => render_timeline(&persons, &config),
            DiagramKind::All => unreachable!("resolve_outputs splits `all` into both kinds"),
        };
        write_text(output.as_deref(), &text)?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env("FAMTREE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn resolve_source(args: &Args) -> String {
    if let Some(input) = &args.input {
        return input.to_string_lossy().into_owned();
    }
    args.url.clone().unwrap_or_else(|| "-".to_string())
}

fn resolve_outputs(
    diagram: DiagramKind,
    out_dir: Option<&Path>,
    config: &Config,
) -> Vec<(DiagramKind, Option<PathBuf>)> {
    let mut outputs = Vec::new();
    if diagram.includes_flowchart() {
        outputs.push((
            DiagramKind::Flowchart,
            out_dir.map(|dir| dir.join(&config.output.flowchart_file)),
        ));
    }
    if diagram.includes_timeline() {
        outputs.push((
            DiagramKind::Timeline,
            out_dir.map(|dir| dir.join(&config.output.timeline_file)),
        ));
    }
    outputs
}
