//! CLI entrypoint for tool-relay
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use relay_application::{
    DispatchLogger, Dispatcher, ExecutorPort, NoProgress, SelfTestCase, SelfTestProgress,
    SelfTestUseCase,
};
use relay_domain::{AliasResolver, InvocationMode, default_intent_recognizer};
use relay_infrastructure::{ConfigLoader, FileConfig, JsonlDispatchLogger, registry_from_config};
use relay_presentation::{
    Cli, Command, OutputFormat, OutputFormatter, ProgressReporter, Resolution, formatter_for,
};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli)?;
    let _log_guard = init_logging(cli.verbose, &config);

    info!("Starting tool-relay");

    let Some(command) = cli.command else {
        bail!("No command given. Run `tool-relay --help` for usage.");
    };

    // === Dependency Injection ===
    let resolver = Arc::new(config.build_alias_resolver());
    let recognizer = Arc::new(default_intent_recognizer());
    let logger: Option<Arc<dyn DispatchLogger>> = config
        .logging
        .dispatch_log
        .as_ref()
        .and_then(JsonlDispatchLogger::new)
        .map(|logger| Arc::new(logger) as Arc<dyn DispatchLogger>);

    let build_dispatcher = |dry_run: bool| {
        let registry: Arc<dyn ExecutorPort> =
            Arc::new(registry_from_config(&config.executor, dry_run));
        let mut dispatcher = Dispatcher::new(Arc::clone(&resolver), Arc::clone(&recognizer))
            .with_executor(registry)
            .with_params(config.dispatch_params());
        if let Some(logger) = &logger {
            dispatcher = dispatcher.with_logger(Arc::clone(logger));
        }
        dispatcher
    };

    let formatter = formatter_for(cli.output);
    let show_progress = !cli.quiet && cli.output == OutputFormat::Text;

    let succeeded = match command {
        Command::Dispatch { name, args, text } => {
            let dispatcher = build_dispatcher(cli.dry_run);
            let result = dispatcher
                .dispatch_tool_call(
                    &name,
                    args.params(),
                    text.as_deref().unwrap_or(""),
                    InvocationMode::Forced,
                    args.context(),
                )
                .await;
            print!("{}", formatter.dispatch_result(&result));
            result.is_success()
        }

        Command::Ask {
            text,
            tool,
            min_confidence,
            args,
        } => {
            let dispatcher = build_dispatcher(cli.dry_run);
            match dispatcher
                .dispatch_by_intent(&text, tool.as_deref(), args.context(), min_confidence)
                .await
            {
                Some(result) => {
                    print!("{}", formatter.dispatch_result(&result));
                    result.is_success()
                }
                None => {
                    let threshold = min_confidence.unwrap_or(dispatcher.params().min_confidence);
                    let candidates =
                        dispatcher.suggest_tools(&text, dispatcher.params().suggestion_limit);
                    print!("{}", formatter.no_match(&text, threshold, &candidates));
                    false
                }
            }
        }

        Command::Suggest { text, limit } => {
            let dispatcher = build_dispatcher(cli.dry_run);
            let matches = dispatcher.suggest_tools(&text, limit);
            print!("{}", formatter.suggestions(&text, &matches));
            true
        }

        Command::Resolve { name } => {
            let resolution = resolve(&resolver, &name, config.dispatch.suggestion_limit);
            let found = resolution.canonical.is_some();
            print!("{}", formatter.resolution(&resolution));
            found
        }

        Command::Agent { name, args } => {
            let dispatcher = build_dispatcher(cli.dry_run);
            let result = dispatcher
                .dispatch_agent_call(&name, args.params(), args.context())
                .await;
            print!("{}", formatter.dispatch_result(&result));
            result.is_success()
        }

        Command::Flow { name, args } => {
            let dispatcher = build_dispatcher(cli.dry_run);
            let result = dispatcher
                .dispatch_flow_call(&name, args.params(), args.context())
                .await;
            print!("{}", formatter.dispatch_result(&result));
            result.is_success()
        }

        Command::Tools => {
            let dispatcher = build_dispatcher(cli.dry_run);
            let tools = dispatcher.get_available_tools().await;
            print!("{}", formatter.tools(&tools));
            true
        }

        Command::SelfTest { concurrency, live } => {
            let dispatcher = Arc::new(build_dispatcher(cli.dry_run || !live));
            let mut use_case = SelfTestUseCase::new(Arc::clone(&dispatcher));
            if let Some(n) = concurrency {
                use_case = use_case.with_concurrency(n);
            }
            if let Some(logger) = &logger {
                use_case = use_case.with_logger(Arc::clone(logger));
            }

            let cases = SelfTestCase::for_catalog(resolver.as_ref());
            let progress: Box<dyn SelfTestProgress> = if show_progress {
                Box::new(ProgressReporter::new())
            } else {
                Box::new(NoProgress)
            };
            let report = use_case.run(cases, progress.as_ref()).await?;

            print!("{}", formatter.self_test(&report, &dispatcher.get_stats()));
            report.all_passed()
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn load_config(cli: &Cli) -> Result<FileConfig> {
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        if let Some(path) = &cli.config
            && !path.exists()
        {
            bail!("Config file not found: {}", path.display());
        }
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Initialize logging based on verbosity level, plus an optional log file
fn init_logging(verbose: u8, config: &FileConfig) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match config.logging.file.as_deref() {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            match (path.file_name(), std::fs::create_dir_all(dir)) {
                (Some(name), Ok(())) => {
                    let appender = tracing_appender::rolling::never(dir, name);
                    let (writer, guard) = tracing_appender::non_blocking(appender);
                    let layer = tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false);
                    (Some(layer), Some(guard))
                }
                _ => {
                    eprintln!("Cannot open log file {}", path.display());
                    (None, None)
                }
            }
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    if guard.is_some() {
        info!("Logging to file");
    }
    guard
}

fn resolve(resolver: &AliasResolver, name: &str, suggestion_limit: usize) -> Resolution {
    match resolver.normalize(name) {
        Some(canonical) => Resolution {
            input: name.to_string(),
            canonical: Some(canonical.to_string()),
            aliases: resolver.aliases_for(canonical),
            suggestions: Vec::new(),
        },
        None => Resolution {
            input: name.to_string(),
            canonical: None,
            aliases: Vec::new(),
            suggestions: resolver.suggest(name, suggestion_limit),
        },
    }
}
