use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::generator::WORDS_PER_PARAGRAPH;
use crate::persist::ResultFormat;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub corpus: Option<String>,
    pub duration_secs: Option<u64>,
    pub words_per_paragraph: usize,
    pub corpus_dir: Option<PathBuf>,
    pub results_dir: Option<PathBuf>,
    pub result_format: ResultFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: None,
            duration_secs: None,
            words_per_paragraph: WORDS_PER_PARAGRAPH,
            corpus_dir: None,
            results_dir: None,
            result_format: ResultFormat::Text,
        }
    }
}

impl Config {
    /// Results directory, falling back to the platform data directory
    pub fn results_dir(&self) -> PathBuf {
        self.results_dir
            .clone()
            .or_else(AppDirs::results_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("tak_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring invalid config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
