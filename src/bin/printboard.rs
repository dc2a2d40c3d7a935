use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use printboard::{
    EngineConfig, FileFetcher, ImageFetcher, JobOutput, LayoutRequest, PRINT_PRESETS, PrintEngine,
    PrintError,
};

#[derive(Parser, Debug)]
#[command(name = "printboard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a layout request into JPEG artifacts.
    Compose(ComposeArgs),
    /// Print the grid plan for an image count as JSON.
    Plan(PlanArgs),
    /// List the named print sizes.
    Sizes,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input layout request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory the artifacts are written to.
    #[arg(long)]
    out_dir: PathBuf,

    /// Root for relative image paths. Defaults to the request's directory.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Override acquisition worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Number of images.
    #[arg(long)]
    count: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Sizes => cmd_sizes(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "printboard failed");
            match serde_json::to_string(&err.report()) {
                Ok(json) => println!("{json}"),
                Err(_) => eprintln!("{err}"),
            }
            if err.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn cmd_compose(args: ComposeArgs) -> Result<(), PrintError> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read request '{}'", args.in_path.display()))?;
    let req = LayoutRequest::from_json(&text)?;

    let mut config = match &args.config {
        Some(p) => EngineConfig::from_path(p)?,
        None => EngineConfig::default(),
    };
    if args.threads.is_some() {
        config.threads = args.threads;
    }

    let root = args.root.clone().unwrap_or_else(|| {
        args.in_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf()
    });
    let engine = PrintEngine::new(config, build_fetcher(root)?)?;
    let output = engine.run(&req)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    let mut written = Vec::new();
    for artifact in output.artifacts() {
        let path = args.out_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)
            .with_context(|| format!("write artifact '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
        written.push(path);
    }

    print_json(&summary(&output, &written))
}

fn summary(output: &JobOutput, written: &[PathBuf]) -> serde_json::Value {
    serde_json::json!({
        "output": output,
        "files": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
    })
}

#[cfg(feature = "http")]
fn build_fetcher(root: PathBuf) -> Result<Box<dyn ImageFetcher>, PrintError> {
    let http = printboard::HttpFetcher::new(&printboard::HttpFetcherConfig::default())?;
    Ok(Box::new(printboard::RoutingFetcher::new(
        http,
        FileFetcher::rooted(root),
    )))
}

#[cfg(not(feature = "http"))]
fn build_fetcher(root: PathBuf) -> Result<Box<dyn ImageFetcher>, PrintError> {
    Ok(Box::new(FileFetcher::rooted(root)))
}

fn cmd_plan(args: PlanArgs) -> Result<(), PrintError> {
    let grid = printboard::plan(args.count)?;
    print_json(&serde_json::json!({
        "cols": grid.cols,
        "rows": grid.rows,
        "layout_rows": grid.layout_rows(),
        "slots": grid.slots(),
    }))
}

fn cmd_sizes() -> Result<(), PrintError> {
    let sizes: Vec<_> = PRINT_PRESETS
        .iter()
        .map(|p| serde_json::json!({ "name": p.name, "width": p.width, "height": p.height }))
        .collect();
    print_json(&serde_json::Value::Array(sizes))
}

fn print_json(value: &serde_json::Value) -> Result<(), PrintError> {
    let text = serde_json::to_string_pretty(value).context("serialize json output")?;
    println!("{text}");
    Ok(())
}
