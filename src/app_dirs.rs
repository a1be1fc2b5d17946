use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typist";

/// Centralized application directory resolution
#[derive(Debug)]
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("typist_config.json"))
    }

    /// Diagnostic log location; the terminal itself is taken by the UI
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
                .join("typist.log")
        } else {
            ProjectDirs::from("", "", APP_NAME)
                .map(|pd| pd.data_local_dir().join("typist.log"))
                .unwrap_or_else(|| PathBuf::from("typist.log"))
        }
    }
}
