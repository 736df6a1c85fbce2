//! CLI entrypoint for triplet
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use triplet_application::RunConsensusUseCase;
use triplet_domain::ConsensusRequest;
use triplet_infrastructure::{
    ConfigLoader, FileConfig, FileOutputFormat, JsonlConversationLogger, ProviderRegistry,
};
use triplet_presentation::{
    BatchResponse, Cli, ConsoleFormatter, OutputFormat, ProgressReporter, StreamMultiplexer,
    request_from_args, request_from_json,
};

/// Install the tracing subscriber. Diagnostics go to stderr (stdout carries
/// results and stream frames) and optionally to a daily-rotated file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "triplet.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(level));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(EnvFilter::new(level)),
        )
        .with(file_layer)
        .init();

    guard
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if !cli.provider.is_empty() {
        config.triplet.providers = cli.provider.clone();
    }

    Ok(config)
}

fn build_request(cli: &Cli, config: &FileConfig) -> Result<ConsensusRequest> {
    let skip_verdict = cli.skip_verdict || config.triplet.skip_verdict;
    let request = match &cli.request {
        Some(path) => request_from_json(path, skip_verdict)?,
        None => request_from_args(cli.question.as_deref(), &cli.attach, skip_verdict)?,
    };
    Ok(request)
}

fn output_format(cli: &Cli, config: &FileConfig) -> OutputFormat {
    cli.output.unwrap_or(match config.output.format.unwrap_or_default() {
        FileOutputFormat::Full => OutputFormat::Full,
        FileOutputFormat::Verdict => OutputFormat::Verdict,
        FileOutputFormat::Json => OutputFormat::Json,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = load_config(&cli)?;

    let log_dir = cli.log_dir.as_ref().or(config.logging.log_dir.as_ref());
    let _log_guard = init_logging(cli.verbose, log_dir.map(|p| p.as_path()));

    info!("Starting triplet");

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            error!("{}", problem);
            eprintln!("config error: {}", problem);
        }
        bail!("Invalid configuration ({} problem(s))", problems.len());
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    // Reject malformed requests before any provider is called
    let request = build_request(&cli, &config)?;

    // === Dependency Injection ===
    let registry = ProviderRegistry::from_config(&config)?;
    let adapters = registry.build_adapters(&config)?;
    let judge = Arc::new(registry.build_judge(&config)?);
    let mut use_case = RunConsensusUseCase::new(adapters, judge)?;

    let conversation_log = cli
        .conversation_log
        .as_ref()
        .or(config.logging.conversation_log.as_ref());
    if let Some(path) = conversation_log {
        match JsonlConversationLogger::new(path) {
            Some(logger) => {
                info!("Conversation log: {}", logger.path().display());
                use_case = use_case.with_logger(Arc::new(logger));
            }
            None => warn!("Conversation logging disabled"),
        }
    }

    // Streaming mode
    if cli.stream {
        let stream = use_case.run_streaming(request);
        match StreamMultiplexer::pump(stream, tokio::io::stdout()).await {
            Ok(frames) => info!("Wrote {} frames", frames),
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                info!("Output closed; stopping the stream")
            }
            Err(e) => return Err(e).context("Failed to write stream frames"),
        }
        return Ok(());
    }

    // Batch mode
    let format = output_format(&cli, &config);
    let question = request.prompt().content().to_string();

    let show_progress = !cli.quiet && config.output.show_progress && format != OutputFormat::Json;
    let result = if show_progress {
        let progress = ProgressReporter::new();
        use_case.run_batch_with_progress(request, &progress).await
    } else {
        use_case.run_batch(request).await
    };

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&question, &result),
        OutputFormat::Verdict => ConsoleFormatter::format_verdict_only(&result),
        OutputFormat::Json => BatchResponse::new(&result).to_json(),
    };

    println!("{}", output);

    Ok(())
}
