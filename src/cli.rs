use crate::{
    config::Config,
    pipeline::Pipeline,
    render::DocxRenderer,
    render::DocxStyle,
    report::RunSummary,
    reporter::{ReportSettings, Reporter},
    source::{FileSource, SocrataSource, Source},
    util::{ensure_dir, format_date, today},
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::{Path, PathBuf};
use time::Date;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "covid-testing-report")]
#[command(about = "Per-state COVID-19 testing reports bundled into one zip")]
pub struct Args {
    /// Path to config TOML. If omitted, uses ./covid-testing-report.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Read rows from a saved JSON export instead of the API.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory for the archive and the transient working directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn dispatch(args: Args) -> Result<()> {
    let mut cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(input) = &args.input {
        cfg.source.input_path = input.display().to_string();
    }
    if let Some(out_dir) = &args.out_dir {
        cfg.output.out_dir = out_dir.display().to_string();
    }

    // Resolve the local date before logging spawns its writer thread;
    // the local offset is unavailable once the process is multi-threaded.
    let run_date = today();

    let log_path = resolve_log_path(&cfg);
    let _guard = init_logging(&args, &cfg, log_path.as_deref())?;

    run(&cfg, run_date)
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("covid-testing-report.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stdout_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn resolve_log_path(cfg: &Config) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }
    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }
    Some(PathBuf::from("logs").join("covid-testing-report.log"))
}

fn build_source(cfg: &Config) -> Result<Box<dyn Source>> {
    if cfg.source.input_path.is_empty() {
        Ok(Box::new(SocrataSource::new(cfg)?))
    } else {
        Ok(Box::new(FileSource::new(&cfg.source.input_path)))
    }
}

fn run(cfg: &Config, run_date: Date) -> Result<()> {
    info!("run_date={} out_dir={}", format_date(run_date), cfg.output.out_dir);

    let source = build_source(cfg)?;
    let reporter = Reporter::new(
        ReportSettings::from_config(cfg),
        DocxRenderer::new(DocxStyle::from_config(cfg)),
    );
    let pipeline = Pipeline::new(source, reporter);

    let out = pipeline.run(run_date)?;

    if cfg.global.print_summary {
        let summary = RunSummary {
            status: "ok".into(),
            run_date: format_date(run_date),
            archive: out.archive.path.display().to_string(),
            sha256: out.archive.sha256.clone(),
            entries: out.archive.entries.len(),
            raw_rows: out.raw_rows,
            reshaped_rows: out.reshaped_rows,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
