use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "tak")
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn results_dir() -> Option<PathBuf> {
        Self::project().map(|pd| pd.data_dir().join("results"))
    }

    /// Log files live in the XDG state dir when HOME is set
    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join("tak"))
        } else {
            Self::project().map(|pd| pd.data_local_dir().to_path_buf())
        }
    }
}
