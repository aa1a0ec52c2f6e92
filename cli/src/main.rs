//! CLI entrypoint for mindgate
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use mindgate_application::{DatasetLogger, NoDatasetLogger, PromptOrchestrator, ProviderAdapter};
use mindgate_domain::{ProviderProfile, Turn};
use mindgate_infrastructure::{
    AdapterFactory, ConfigLoader, CsvDatasetLogger, DatasetExporter, ExportOptions, FileConfig,
    ResolvedConfig,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.verbose, cli.log_dir.as_deref())?;

    let config = ConfigLoader::load(cli.config.as_deref()).context("loading configuration")?;

    if let Command::Config = cli.command {
        show_config(&config, cli.config.as_deref());
        return Ok(());
    }

    let issues = config.validate();
    for issue in &issues {
        warn!("{}", issue);
    }
    if FileConfig::has_errors(&issues) {
        bail!("configuration has errors, see warnings above");
    }
    let resolved = config.resolve()?;

    match cli.command {
        Command::Ask {
            message,
            code,
            image,
        } => ask(&resolved, &message, code, image.as_deref()).await,
        Command::Stats { root } => {
            let root = root.unwrap_or_else(|| resolved.logging.root.clone());
            let counters = CsvDatasetLogger::scan(&root);
            println!("Dataset root: {}", root.display());
            println!("  normal:    {}", counters.normal);
            println!("  reasoning: {}", counters.reasoning);
            println!("  vision:    {}", counters.vision);
            Ok(())
        }
        Command::Export {
            output,
            vision,
            code_only,
            root,
        } => {
            let root = root.unwrap_or_else(|| resolved.logging.root.clone());
            let mut options = ExportOptions::new(output);
            options.vision = vision;
            options.code_only = code_only;
            let report = DatasetExporter::new(&root)
                .with_markers(resolved.gateway.markers.clone())
                .export(&options)
                .with_context(|| format!("exporting {}", root.display()))?;
            println!(
                "Wrote {} examples to {} ({} rows read, {} rejected, {} duplicates)",
                report.written,
                options.output.display(),
                report.rows_read,
                report.rejected,
                report.duplicates
            );
            Ok(())
        }
        Command::Config => Ok(()),
    }
}

/// Console output filtered by `-v` (or `RUST_LOG`), plus an optional daily
/// rotated file.
fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "mindgate.log");
            let (file, guard) = tracing_appender::non_blocking(appender);
            builder
                .with_writer(std::io::stderr.and(file))
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

fn build_adapter(profile: &ProviderProfile) -> Result<Arc<dyn ProviderAdapter>> {
    AdapterFactory::build(profile).with_context(|| format!("building adapter for {}", profile))
}

fn build_orchestrator(config: &ResolvedConfig) -> Result<PromptOrchestrator> {
    let chat = build_adapter(&config.profile)?;

    let dataset_logger: Arc<dyn DatasetLogger> = if config.logging.any_enabled() {
        Arc::new(
            CsvDatasetLogger::open(&config.logging.root, config.logging.flags())
                .with_markers(config.gateway.markers.clone())
                .with_summary_intervals(
                    config.logging.text_summary_every,
                    config.logging.vision_summary_every,
                ),
        )
    } else {
        Arc::new(NoDatasetLogger)
    };

    let mut orchestrator =
        PromptOrchestrator::new(chat, config.gateway.clone(), config.orchestrator.clone())
            .with_dataset_logger(dataset_logger);

    if let Some(profile) = &config.code_profile {
        orchestrator = orchestrator.with_code_adapter(build_adapter(profile)?);
    }
    if let Some(profile) = &config.vision_profile {
        orchestrator = orchestrator.with_vision_adapter(build_adapter(profile)?);
    }
    if let Some(profile) = &config.embedding_profile {
        orchestrator = orchestrator.with_embedding_adapter(build_adapter(profile)?);
    }

    info!(
        agent = config.orchestrator.agent_name.as_str(),
        profile = %config.profile,
        "Orchestrator ready"
    );
    Ok(orchestrator)
}

async fn ask(config: &ResolvedConfig, message: &str, code: bool, image: Option<&Path>) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    orchestrator.note_inbound_message();
    let history = vec![Turn::user(message)];
    let context = orchestrator.context(&[], &[]);

    let reply = match image {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading image {}", path.display()))?;
            orchestrator.prompt_vision(&history, &bytes, context).await
        }
        None if code => orchestrator.prompt_coding(&history, context).await,
        None => orchestrator.prompt_conversation(&history, context).await,
    };

    println!("{}", reply);
    Ok(())
}

fn show_config(config: &FileConfig, explicit: Option<&Path>) {
    println!("Configuration sources (in priority order):");
    for line in ConfigLoader::describe_sources(explicit) {
        println!("  {}", line);
    }
    println!();
    println!(
        "Profile: {}/{}  logging root: {}",
        config.profile.kind,
        config.profile.model,
        PathBuf::from(&config.logging.root).display()
    );
    let issues = config.validate();
    if issues.is_empty() {
        println!("No issues found.");
    }
    for issue in issues {
        println!("  {}", issue);
    }
}
