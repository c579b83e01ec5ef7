use anyhow::{Context, Result};
use directories_next::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SETTINGS_FILE_NAME: &'static str = "settings.toml";
const ENV_AUTO_ADVANCE_MS: &'static str = "QUIZ_REVIEW_AUTO_ADVANCE_MS";
const ENV_PASS_THRESHOLD: &'static str = "QUIZ_REVIEW_PASS_THRESHOLD";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub auto_advance_delay: Duration,
    pub tick_interval: Duration,
    pub pass_threshold: u32,
    pub bank_paths: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            auto_advance_delay: Duration::from_secs(8),
            tick_interval: Duration::from_millis(80),
            pass_threshold: 70,
            bank_paths: vec![PathBuf::from("questions.json")],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    auto_advance_ms: Option<u64>,
    tick_interval_ms: Option<u64>,
    pass_threshold: Option<u32>,
    bank_paths: Option<Vec<PathBuf>>,
}

impl Settings {
    /// Defaults, then the user's settings file, then environment variables.
    pub fn load() -> Result<Settings> {
        let mut settings = Settings::default();
        if let Some(path) = settings_file_path() {
            if path.exists() {
                settings.apply_file(&path)?;
            } else {
                debug!("No settings file at {}", path.display());
            }
        }
        settings.apply_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read settings from {}", path.display()))?;
        self.apply_toml(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))?;
        info!("Loaded settings from {}", path.display());
        Ok(())
    }

    pub fn apply_toml(&mut self, content: &str) -> Result<()> {
        let file: SettingsFile = toml::from_str(content)?;
        if let Some(ms) = file.auto_advance_ms {
            self.auto_advance_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = file.tick_interval_ms {
            self.tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(threshold) = file.pass_threshold {
            self.pass_threshold = threshold.min(100);
        }
        if let Some(paths) = file.bank_paths {
            if !paths.is_empty() {
                self.bank_paths = paths;
            }
        }
        Ok(())
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ms) = lookup(ENV_AUTO_ADVANCE_MS).and_then(|v| v.trim().parse::<u64>().ok()) {
            self.auto_advance_delay = Duration::from_millis(ms);
        }
        if let Some(threshold) = lookup(ENV_PASS_THRESHOLD).and_then(|v| v.trim().parse::<u32>().ok()) {
            self.pass_threshold = threshold.min(100);
        }
    }
}

fn settings_file_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "quiz-review")?;
    let mut path = dirs.config_dir().to_path_buf();
    path.push(SETTINGS_FILE_NAME);
    Some(path)
}
