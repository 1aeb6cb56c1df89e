// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tokio::task::LocalSet;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use thud_clunk::backends::fs::ReadFile;
use thud_clunk::backends::local::{default_encoding, CheckRead, LocalStageFactory};
use thud_clunk::config::consts::FAILURE_EXIT_CODE;
use thud_clunk::config::{load_and_validate_config, Config};
use thud_clunk::{exit_status, Invoker, Pipeline, RunReport, Stage};

struct CliArgs {
    trace: bool,
    config: Option<String>,
    files: Vec<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = env::args().skip(1);
    let mut cli = CliArgs {
        trace: false,
        config: None,
        files: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--trace" => cli.trace = true,
            "--config" => {
                cli.config = Some(args.next().context("--config needs a file path")?);
            }
            flag if flag.starts_with("--") => bail!("unknown flag '{}'", flag),
            _ => cli.files.push(arg),
        }
    }

    if cli.files.is_empty() {
        bail!("Usage: thud [--trace] [--config <file.yaml|file.toml>] <file>...");
    }
    Ok(cli)
}

fn init_tracing(trace: bool) {
    let fallback = if trace { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
                ),
        )
        .init();
}

/// `read_file` followed by the configured stages.
fn read_invoker(config: &Config) -> Result<Invoker> {
    let mut builder = Pipeline::builder("read_file").operation(ReadFile::new());
    for name in &config.stages {
        builder = builder.stage(LocalStageFactory::create(name)?);
    }
    Ok(builder
        .build()?
        .invoker()
        .with_preprocessor(default_encoding())
        .with_config(config.engine.clone()))
}

/// Nests a bare read pipeline as the operation and an upper-casing
/// sub-pipeline as a stage.
fn render_invoker(config: &Config) -> Result<Invoker> {
    let read = Pipeline::builder("read_checked")
        .operation(ReadFile::new())
        .stage(CheckRead::transform())
        .build()?
        .invoker()
        .with_config(config.engine.clone());

    let stage = LocalStageFactory::create;
    let upper = Pipeline::builder("render_upper")
        .stage(stage("change_case_upper")?)
        .stage(stage("print")?)
        .build_sub_pipeline()
        .with_config(config.engine.clone());

    Ok(Pipeline::builder("render")
        .operation(read)
        .stage(CheckRead::transform())
        .stage(stage("trim_eof")?)
        .stage(Stage::from(upper))
        .stage(stage("report_end")?)
        .build()?
        .invoker()
        .with_preprocessor(default_encoding())
        .with_config(config.engine.clone()))
}

async fn run_all(invoker: &Invoker, files: &[String]) -> Vec<RunReport> {
    // Start every run before waiting on any of them.
    let handles: Vec<_> = files
        .iter()
        .map(|file| invoker.invoke(vec![file.as_str().into()]))
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.finished().await);
    }
    reports
}

fn load(cli: &CliArgs) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("failed to load config '{}'", path))?,
        None => Config::default(),
    };
    config.engine.trace |= cli.trace;
    Ok(config)
}

async fn run(config: Config, files: Vec<String>) -> Result<ExitCode> {
    let read = read_invoker(&config)?;
    let render = render_invoker(&config)?;

    let mut reports = run_all(&read, &files).await;
    reports.extend(run_all(&render, &files).await);

    Ok(ExitCode::from(exit_status(&reports)))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let (config, files) = match parse_args().and_then(|cli| Ok((load(&cli)?, cli.files))) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(FAILURE_EXIT_CODE);
        }
    };
    init_tracing(config.engine.trace);

    let local = LocalSet::new();
    match local.run_until(run(config, files)).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}
