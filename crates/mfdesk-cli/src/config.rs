// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use mfdesk_app::{ReportKind, SummaryScope};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub default_report: Option<String>,
    pub summary_scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("MFDESK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set MFDESK_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(mfdesk_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [storage], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1. Run `mfdesk --print-example-config` and migrate your values into that template",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            mfdesk_db::validate_db_path(db_path)?;
        }

        if let Some(report) = &self.ui.default_report
            && ReportKind::parse(report).is_none()
        {
            bail!(
                "ui.default_report in {} is {:?}; expected one of: {}",
                path.display(),
                report,
                report_names()
            );
        }

        if let Some(scope) = &self.ui.summary_scope
            && SummaryScope::parse(scope).is_none()
        {
            bail!(
                "ui.summary_scope in {} is {:?}; expected \"filtered\" or \"all\"",
                path.display(),
                scope
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} is {:?}; expected one of: {}",
                path.display(),
                level,
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.db_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => mfdesk_db::default_db_path(),
        }
    }

    pub fn default_report(&self) -> ReportKind {
        self.ui
            .default_report
            .as_deref()
            .and_then(ReportKind::parse)
            .unwrap_or(ReportKind::Roles)
    }

    pub fn summary_scope(&self) -> SummaryScope {
        self.ui
            .summary_scope
            .as_deref()
            .and_then(SummaryScope::parse)
            .unwrap_or_default()
    }

    pub fn log_level(&self) -> String {
        self.log
            .level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .to_ascii_lowercase()
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log.file {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(mfdesk_db::data_dir()?.join(format!("{}.log", mfdesk_db::APP_NAME))),
        }
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# mfdesk config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/mfdesk/mfdesk.db)\n# db_path = \"/absolute/path/to/mfdesk.db\"\n\n[ui]\n# One of: {}\ndefault_report = \"roles\"\n# \"filtered\" summarizes the visible rows, \"all\" every loaded row\nsummary_scope = \"filtered\"\n\n[log]\n# MFDESK_LOG overrides this at runtime\nlevel = \"{}\"\n# file = \"/absolute/path/to/mfdesk.log\"\n",
            path.display(),
            report_names(),
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn report_names() -> String {
    ReportKind::ALL
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
