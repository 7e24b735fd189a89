//! CLI entrypoint for buildrig
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use buildrig_application::{
    CollectDependenciesUseCase, ExecutableProbe, FileSystemPort, InvocationLogger,
    NoInvocationLogger, NoOutput, OutputSink, ProcessExecutor, ProcessRunner, RunDotNetInput,
    RunDotNetUseCase, RunMsBuildInput, RunMsBuildUseCase, RunVsTestInput, RunVsTestUseCase,
    SetProjectVersionUseCase, ToolLocator, ToolServices, Toolchain,
};
use buildrig_domain::{OperationReport, OutputFormat};
use buildrig_domain::config::config_key::known_keys;
use buildrig_infrastructure::{
    ConfigLoader, FileConfig, JsonlInvocationLogger, LocalFileSystem, LocalProcessExecutor,
    SshProcessExecutor, WhichProbe, detect_host_layout, system_store,
};
use buildrig_presentation::{Cli, Command, ConsoleFormatter, ConsoleOutput, ReportFormatter};
use clap::Parser;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _log_guard = match init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            return ExitCode::from(2);
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

/// Initialize logging based on verbosity level, optionally teeing to a file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("--log-file {} has no file name", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

async fn run(cli: Cli) -> Result<ExitCode> {
    info!("Starting buildrig");

    let config = ConfigLoader::load(cli.config.as_deref())
        .map_err(|e| anyhow!("failed to load configuration: {}", e))?;
    for issue in config.validate() {
        warn!("{}: {}", issue.key, issue.message);
    }

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.format.unwrap_or(config.output.format);

    if let Command::Config(args) = &cli.command {
        let text = if args.keys {
            ConsoleFormatter::format_keys(known_keys(), format)
        } else {
            describe_config(&config, cli.config.as_deref())?
        };
        println!("{}", text.trim_end());
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping the running tool");
                cancel.cancel();
            }
        }
    });

    let executor: Arc<dyn ProcessExecutor> = match config.remote.host() {
        Some(host) => {
            info!("Running tools on {} via {}", host, config.remote.ssh_program);
            Arc::new(SshProcessExecutor::new(host, &config.remote.ssh_program))
        }
        None => Arc::new(LocalProcessExecutor::new()),
    };
    let invocation_logger: Arc<dyn InvocationLogger> = match config
        .logging
        .invocation_log
        .as_deref()
        .and_then(|path| JsonlInvocationLogger::open(path))
    {
        Some(logger) => Arc::new(logger),
        None => Arc::new(NoInvocationLogger),
    };

    let files: Arc<dyn FileSystemPort> = Arc::new(LocalFileSystem::new());
    let probe: Arc<dyn ExecutableProbe> = Arc::new(WhichProbe::new());
    let runner = ProcessRunner::new(executor).with_invocation_logger(invocation_logger);
    let locator = ToolLocator::new(system_store(), probe, files.clone(), runner.clone())
        .with_cancellation(cancel.clone());
    let toolchain = Toolchain::new(detect_host_layout(), config.tool_overrides());
    let services = ToolServices::new(toolchain, locator, runner, files.clone());

    let output = ConsoleOutput::new()
        .with_debug(cli.verbose > 0)
        .with_stderr(format == OutputFormat::Json);
    let echo = !cli.quiet && config.output.show_tool_output;
    let sink: &dyn OutputSink = if echo { &output } else { &NoOutput };

    let working_dir = std::env::current_dir().context("reading the current directory")?;

    let report: OperationReport = match cli.command {
        Command::Build(args) => {
            let input = RunMsBuildInput {
                settings: args.into_settings(),
                working_dir,
            };
            RunMsBuildUseCase::new(services)
                .execute(input, sink, &cancel)
                .await?
        }
        Command::Dotnet(args) => {
            let input = RunDotNetInput {
                settings: args.into_settings(),
                working_dir,
            };
            RunDotNetUseCase::new(services)
                .execute(input, sink, &cancel)
                .await?
        }
        Command::Test(args) => {
            let input = RunVsTestInput {
                settings: args.into_settings(),
                working_dir,
            };
            RunVsTestUseCase::new(services)
                .execute(input, sink, &cancel)
                .await?
        }
        Command::Deps(args) => {
            CollectDependenciesUseCase::new(files)
                .execute(&args.into_settings())
                .await?
        }
        Command::SetVersion(args) => {
            SetProjectVersionUseCase::new(files)
                .execute(&args.into_settings())
                .await?
        }
        Command::Locate(args) => {
            let path = services.locate_named(&args.tool).await?;
            println!(
                "{}",
                ConsoleFormatter::format_located(&args.tool, &path, format)
            );
            return Ok(ExitCode::SUCCESS);
        }
        Command::Config(_) => return Ok(ExitCode::SUCCESS),
    };

    println!("{}", ConsoleFormatter.render(&report, format).trim_end());

    Ok(if report.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Sources, effective values and issues for `buildrig config`.
fn describe_config(config: &FileConfig, explicit: Option<&Path>) -> Result<String> {
    let effective = toml::to_string_pretty(config).context("rendering configuration")?;
    let issues: Vec<(String, String)> = config
        .validate()
        .into_iter()
        .map(|issue| (issue.key, issue.message))
        .collect();
    Ok(ConsoleFormatter::format_config(
        &ConfigLoader::describe_sources(explicit),
        &effective,
        &issues,
    ))
}
