use directories::ProjectDirs;
use std::path::PathBuf;

const LOG_FILE: &str = "pomo.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Diagnostic log location: the XDG state dir where the platform has one
    /// (Linux), otherwise the local data dir.
    pub fn log_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "pomo").map(|dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_local_dir())
                .join(LOG_FILE)
        })
    }
}
