// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Subscriber setup for the `mfdesk` binary. The TUI owns the terminal, so
//! interactive sessions log to a file; one-shot runs log to stderr.

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub const LOG_ENV: &str = "MFDESK_LOG";

const WORKSPACE_TARGETS: [&str; 5] = ["mfdesk", "mfdesk_cli", "mfdesk_app", "mfdesk_db", "mfdesk_tui"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    pub target: LogTarget,
}

pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = build_env_filter(&config.level);
    match &config.target {
        LogTarget::Stderr => init_with_writer(filter, io::stderr, true),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| {
                    format!(
                        "open log file {}; set [log].file to a writable path",
                        path.display()
                    )
                })?;
            init_with_writer(filter, Mutex::new(file), false)
        }
    }
}

fn init_with_writer<W>(filter: EnvFilter, writer: W, ansi: bool) -> Result<()>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .compact()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("install tracing subscriber")
}

// MFDESK_LOG wins over the configured level when it parses.
fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn default_directives(level: &str) -> String {
    let mut directives = vec!["warn".to_owned()];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.join(",")
}
