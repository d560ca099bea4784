use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use crate::data::grouping::GroupingConfig;
use crate::email::EmailConfig;
use crate::error::ConfigError;

const CONFIG_ENV: &str = "COMPLEXITY_SORTER_CONFIG";
const APP_DIR: &str = "complexity-sorter";

/// Settings read from `complexity-sorter.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Metadata file opened at startup.
    pub dataset_path: PathBuf,
    /// Primary then optional secondary grouping parameter.
    pub grouping_params: Vec<String>,
    /// Number of videos in an experiment session.
    pub experiment_size: usize,
    pub email: EmailConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("json-videos.json"),
            grouping_params: GroupingConfig::default().params().to_vec(),
            experiment_size: 5,
            email: EmailConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn grouping(&self) -> Result<GroupingConfig, ConfigError> {
        GroupingConfig::new(self.grouping_params.iter().cloned())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grouping()?;
        if self.experiment_size == 0 {
            return Err(ConfigError::ZeroExperimentSize);
        }
        Ok(())
    }

    /// Apply `EMAILJS_*` environment overrides.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fields = [
            ("EMAILJS_SERVICE_ID", &mut self.email.service_id),
            ("EMAILJS_TEMPLATE_ID", &mut self.email.template_id),
            ("EMAILJS_PUBLIC_KEY", &mut self.email.public_key),
        ];
        for (var, slot) in fields {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                *slot = value;
            }
        }
    }
}

/// Parse and validate TOML text.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).context("parsing configuration")?;
    config.validate()?;
    Ok(config)
}

/// Load the first configuration file found, falling back to defaults.
pub fn load_config(path_override: Option<&Path>) -> Result<AppConfig> {
    let mut candidates = Vec::new();
    if let Some(path) = path_override {
        candidates.push(path.to_path_buf());
    } else {
        if let Some(env_path) = env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
            candidates.push(PathBuf::from(env_path));
        }
        candidates.extend(default_config_candidates());
    }

    let mut config = AppConfig::default();
    for candidate in candidates {
        if !candidate.exists() {
            continue;
        }
        let contents = fs::read_to_string(&candidate).with_context(|| {
            format!(
                "Failed to read configuration file at {}",
                candidate.display()
            )
        })?;
        config = parse_config(&contents)
            .with_context(|| format!("Invalid configuration in {}", candidate.display()))?;
        info!("Using configuration from {}", candidate.display());
        break;
    }

    config.apply_env(|var| env::var(var).ok());
    Ok(config)
}

fn default_config_candidates() -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    let mut push_unique = |path: PathBuf| {
        if !path.as_os_str().is_empty() && seen.insert(path.clone()) {
            out.push(path);
        }
    };

    if let Ok(current_dir) = env::current_dir() {
        push_unique(current_dir.join(format!("{APP_DIR}.toml")));
    }
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        push_unique(PathBuf::from(xdg).join(APP_DIR).join("config.toml"));
    }
    if let Some(home) = env::var_os("HOME").filter(|v| !v.is_empty()) {
        push_unique(
            PathBuf::from(home)
                .join(".config")
                .join(APP_DIR)
                .join("config.toml"),
        );
    }
    out
}
