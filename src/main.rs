use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use traceview::trace::{Environment, TraceStore};
use traceview::ui::install_panic_hook;
use traceview::viewer::{ViewerId, ViewerInstance, ViewerRegistry};
use traceview::{util, App, Config, FsMediaLoader};

/// Step through recorded automation traces
#[derive(Parser, Debug)]
#[command(name = "traceview")]
#[command(about = "Step through recorded automation traces", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to <data-dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for config and logs (defaults to ~/.traceview)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Asset URL prefix; implies --production
    #[arg(long, global = true)]
    base_path: Option<String>,

    /// Resolve asset paths for the production deployment
    #[arg(long, global = true)]
    production: bool,

    /// Directory resolved asset URLs are served from
    #[arg(long, global = true)]
    asset_root: Option<PathBuf>,

    /// Auto-play dwell time per step in milliseconds
    #[arg(long, global = true)]
    interval_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open one viewer per trace file
    View {
        /// Viewer ids, assigned to traces in order
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Trace files, optionally as `id=path`
        #[arg(required = true)]
        traces: Vec<String>,
    },

    /// Load and validate traces without starting the UI
    Check {
        /// Viewer ids, assigned to traces in order
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Trace files, optionally as `id=path`
        #[arg(required = true)]
        traces: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    util::init_data_dir(cli.data_dir.clone());
    init_logging()?;

    let config = build_config(&cli)?;

    match &cli.command {
        Command::View { ids, traces } => {
            run_view(config, assign_ids(ids, traces)).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { ids, traces } => Ok(run_check(&config, assign_ids(ids, traces))),
    }
}

/// Log to <data_dir>/logs/traceview.log; the terminal belongs to the UI.
fn init_logging() -> Result<()> {
    fs::create_dir_all(util::logs_dir()).context("Failed to create log directory")?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if cli.production {
        config = config.with_environment(Environment::Production);
    }
    if let Some(base_path) = &cli.base_path {
        config = config.with_base_path(base_path.clone());
    }
    if let Some(root) = &cli.asset_root {
        config = config.with_asset_root(root.clone());
    }
    if let Some(ms) = cli.interval_ms {
        if ms == 0 {
            bail!("--interval-ms must be greater than zero");
        }
        config = config.with_step_interval(Duration::from_millis(ms));
    }

    Ok(config)
}

/// Pair each trace argument with a viewer id.
///
/// An `id=path` argument names its own id; otherwise the next `--id` is used,
/// then the default `viewerN` for its position.
fn assign_ids(ids: &[String], traces: &[String]) -> Vec<(ViewerId, PathBuf)> {
    let mut explicit = ids.iter();
    traces
        .iter()
        .enumerate()
        .map(|(i, arg)| match arg.split_once('=') {
            Some((id, path)) if !id.is_empty() && !id.contains('/') => {
                (ViewerId::new(id), PathBuf::from(path))
            }
            _ => {
                let id = explicit
                    .next()
                    .map(|id| ViewerId::new(id.as_str()))
                    .unwrap_or_else(|| ViewerId::nth(i + 1));
                (id, PathBuf::from(arg))
            }
        })
        .collect()
}

async fn run_view(config: Config, targets: Vec<(ViewerId, PathBuf)>) -> Result<()> {
    install_panic_hook();

    let base = config.base_path();
    let settings = config.playback_settings();
    let mut registry = ViewerRegistry::new(config.max_viewers);

    for (id, path) in targets {
        let store = TraceStore::load(&path, &base).map(Arc::new);
        registry
            .mount(ViewerInstance::mount(id, None, store, &settings))
            .with_context(|| format!("Failed to open {}", path.display()))?;
    }

    let loader = Arc::new(FsMediaLoader::new(config.asset_root.clone(), base));
    let mut app = App::new(config, registry, loader);
    app.run().await
}

fn run_check(config: &Config, targets: Vec<(ViewerId, PathBuf)>) -> ExitCode {
    let base = config.base_path();
    let mut failed = false;

    for (id, path) in targets {
        match TraceStore::load(&path, &base) {
            Ok(store) => println!("ok {id} {} steps", store.len()),
            Err(e) => {
                failed = true;
                println!("error {id}: {e}");
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
