use std::path::PathBuf;

use pd_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "proctordesk";

fn resolved_app_dir_name() -> String {
    match std::env::var("PD_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

pub struct DirsAppDirsAdapter {
    base_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_dir_override: None,
        }
    }

    /// Resolves every directory under `base` instead of the system locations.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use pd_platform::app_dirs::DirsAppDirsAdapter;
    ///
    /// let adapter = DirsAppDirsAdapter::with_base_dir(PathBuf::from("/tmp"));
    /// ```
    pub fn with_base_dir(base: PathBuf) -> Self {
        Self {
            base_dir_override: Some(base),
        }
    }

    /// Base local data directory, or `None` when the system has none.
    pub fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base_data = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        Ok(AppDirs {
            app_data_root: base_data.join(resolved_app_dir_name()),
        })
    }
}
