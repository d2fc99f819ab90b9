//! SpendScope - customer spend analytics CLI
//!
//! Computes one report per invocation, or answers a stream of JSON
//! requests on stdin with `--session`.
//!
//! Exit codes:
//!   0 - Report rendered (including load-failure and empty-dataset notices)
//!   1 - Invalid arguments, unreadable config, or an unexpected fault

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use spendscope::cli::{Args, OutputFormat};
use spendscope::config::{Config, CONFIG_FILE};
use spendscope::models::{Outcome, ReportKind};
use spendscope::report::{self, ReportMetadata};
use spendscope::{session, Pipeline};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Config is read before logging starts so `verbose = true` applies
    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&args, &config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    info!("SpendScope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let result = if args.session {
        run_session(config)
    } else {
        run_once(&args, config)
    };

    if let Err(e) = result {
        error!("Run failed: {:#}", e);
        eprintln!("Ocorreu um erro inesperado: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .spendscope.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        return Err(anyhow!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        ));
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to set the dataset path and default filters.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let level = if config.general.verbose && !args.quiet {
        Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Load configuration from file or use defaults, then apply CLI overrides.
///
/// Runs before the subscriber is installed, so problems go to stderr directly.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        // An explicit config path must be readable
        Some(ref config_path) => Config::load(config_path)?,
        None => match Config::load_default() {
            Ok(Some(config)) => config,
            Ok(None) => Config::default(),
            Err(e) => {
                eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE, e);
                Config::default()
            }
        },
    };

    config.merge_with_args(args);
    Ok(config)
}

fn spinner(args: &Args) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .ok()?,
    );
    pb.set_message("Carregando dados...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn render(outcome: &Outcome, format: OutputFormat, metadata: &ReportMetadata) -> Result<String> {
    match format {
        OutputFormat::Json => report::generate_json_report(outcome, metadata),
        OutputFormat::Markdown => Ok(report::generate_markdown_report(outcome, metadata)),
    }
}

/// Compute a single report and print or save it.
fn run_once(args: &Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let kind = args
        .report
        .map(ReportKind::from)
        .ok_or_else(|| anyhow!("--report is required"))?;
    let request = config.to_request(kind);
    debug!("Request: {:?}", request);

    let mut pipeline = Pipeline::new(&config.general.data_path);
    let pb = spinner(args);
    let outcome = pipeline.run(&request);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let metadata = ReportMetadata {
        data_path: config.general.data_path.display().to_string(),
        generated_at: Utc::now(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };
    let output = render(&outcome, config.general.format, &metadata)?;

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                eprintln!("✅ Report saved to: {}", path.display());
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }

    if let Outcome::Halted(notice) = &outcome {
        warn!("No report computed: {}", notice.message);
    }

    Ok(())
}

/// Answer JSON requests from stdin, one per line, reusing the dataset cache.
fn run_session(config: Config) -> Result<()> {
    debug!("Session defaults: {:?}", config);

    let mut pipeline = Pipeline::new(&config.general.data_path);
    info!("Session started on {}", pipeline.data_path().display());

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let answered = session::serve(&mut pipeline, &config, stdin, stdout)
        .context("Session ended on an I/O error")?;

    info!(
        "Session finished: {} responses, {} cached record sets",
        answered,
        pipeline.cache().len()
    );
    Ok(())
}
