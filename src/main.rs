// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
pub mod config;
mod error;
mod kubernetes;
mod operation;
mod output;
pub mod progress;
mod projection;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::{Map, Value, json};
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};
use tracing_subscriber::prelude::*;

use cli::{Args, Command, OutputFormat};
use error::ListError;
use kubernetes::{ClusterApi, KubeCluster};
use operation::{ListResourcesInput, OPERATION_NAME, OperationOutput};
use output::FormatOptions;
use progress::{ProgressReporter, ProgressUpdate, create_progress_handle, create_spinner};

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // Rotate daily or at 10MB, keeping 5 files
    let log_path = log_dir.join("kubelist.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024);

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    let (non_blocking, _guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(_guard);

    let filter = if verbose { "kubelist=debug" } else { "kubelist=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if verbose {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Another provider may already be installed; either way one is in place
    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let args = Args::parse();
    init_logging(args.verbose);

    let config = match config::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Ignoring config: {:#}", e);
            config::Config::default()
        }
    };

    let arguments = match &args.command {
        Command::List(list) => list.to_arguments(),
        Command::Discover { group } => {
            let mut map = Map::new();
            map.insert("groupFilter".to_string(), json!(group));
            map
        }
        Command::Invoke { arguments } => read_invocation(arguments.as_deref()).await?,
        Command::Config {
            default_context,
            default_timeout,
            default_output,
        } => {
            return update_config(
                config,
                default_context.clone(),
                *default_timeout,
                *default_output,
            );
        }
    };

    let format = args
        .output
        .or_else(|| {
            config
                .output
                .as_deref()
                .and_then(|name| OutputFormat::from_str(name, true).ok())
        })
        .unwrap_or_default();
    let context = args.context.clone().or_else(|| config.context.clone());

    match run(arguments, context.as_deref(), config.default_timeout_seconds, format).await {
        Ok(result) => {
            let options = FormatOptions {
                no_headers: args.no_headers,
            };
            println!("{}", output::render(&result, &format, &options)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if e.downcast_ref::<ListError>().is_some_and(ListError::is_timeout) {
                eprintln!("Hint: raise the limit with --timeout or timeoutSeconds");
            }
            std::process::exit(1);
        }
    }
}

/// Parse the argument object for `invoke`, from the command line or stdin
async fn read_invocation(arguments: Option<&str>) -> Result<Map<String, Value>> {
    let text = match arguments {
        Some(text) => text.to_string(),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read arguments from stdin")?;
            buf
        }
    };
    match serde_json::from_str::<Value>(&text).context("Arguments must be valid JSON")? {
        Value::Object(map) => Ok(map),
        other => Err(ListError::InvalidArgument(format!(
            "arguments must be a JSON object, got {}",
            other
        ))
        .into()),
    }
}

fn update_config(
    mut config: config::Config,
    context: Option<String>,
    timeout: Option<u64>,
    output: Option<OutputFormat>,
) -> Result<()> {
    if context.is_some() {
        config.context = context;
    }
    if timeout.is_some() {
        config.default_timeout_seconds = timeout;
    }
    if let Some(format) = output.and_then(|f| f.to_possible_value()) {
        config.output = Some(format.get_name().to_string());
    }
    config.save()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

async fn run(
    mut arguments: Map<String, Value>,
    context: Option<&str>,
    default_timeout: Option<u64>,
    format: OutputFormat,
) -> Result<OperationOutput> {
    if let Some(timeout) = default_timeout
        && !arguments.contains_key("timeoutSeconds")
    {
        arguments.insert("timeoutSeconds".to_string(), json!(timeout));
    }

    let input = ListResourcesInput::from_args(&arguments)?;
    debug!(operation = OPERATION_NAME, mode = ?input.mode(), "Invoking");

    let cluster = tokio::select! {
        cluster = KubeCluster::connect(context) => cluster?,
        () = interrupted() => return Err(ListError::Cancelled.into()),
    };
    debug!(context = %cluster.context(), "Connected");

    let progress = create_progress_handle();
    let result = if format == OutputFormat::Table {
        with_spinner(&cluster, &input, &progress).await
    } else {
        operation::execute_until(&cluster, &input, &progress, interrupted()).await
    };
    Ok(result?)
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn with_spinner(
    api: &dyn ClusterApi,
    input: &ListResourcesInput,
    progress: &ProgressReporter,
) -> error::Result<OperationOutput> {
    let spinner = create_spinner("Discovering resource types...");
    let mut progress_rx = progress.subscribe();
    let mut handle = Box::pin(operation::execute_until(api, input, progress, interrupted()));

    let result = loop {
        tokio::select! {
            biased;
            update = progress_rx.recv() => {
                match update {
                    Ok(ProgressUpdate::Discovering) => {
                        spinner.set_message("Discovering resource types...");
                    }
                    Ok(ProgressUpdate::DiscoveryComplete { type_count, .. }) => {
                        spinner.set_message(format!("{} resource types found", type_count));
                    }
                    Ok(ProgressUpdate::Listing { resource }) => {
                        spinner.set_message(format!("Listing {}...", resource));
                    }
                    Ok(ProgressUpdate::ListComplete { items, .. }) => {
                        spinner.set_message(format!("{} items", items));
                    }
                    // Sender lives as long as `progress`; keep waiting on the operation
                    Err(_) => {
                        break (&mut handle).await;
                    }
                }
            }
            result = &mut handle => {
                break result;
            }
        }
    };

    spinner.finish_and_clear();
    if result.is_ok() {
        debug!(items = progress.items_listed(), "Operation complete");
    }
    result
}
