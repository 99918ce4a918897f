use std::path::PathBuf;

/// File name of the persisted session under the data root.
pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub app_data_root: PathBuf,
}

impl AppDirs {
    pub fn logs_dir(&self) -> PathBuf {
        self.app_data_root.join("logs")
    }

    pub fn session_file(&self) -> PathBuf {
        self.app_data_root.join(SESSION_FILE_NAME)
    }
}
