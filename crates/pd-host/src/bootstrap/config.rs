//! # Configuration Loader / 配置加载器
//!
//! Reads a TOML file into the `AppConfig` DTO. Every field carries a serde
//! default, so a partial file is accepted as-is.
//! 读取 TOML 配置文件；缺失字段使用默认值。

use anyhow::Context;
use std::path::PathBuf;

use pd_core::config::AppConfig;

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if:
/// - File cannot be read (I/O error)
/// - Content is not valid TOML or does not match the schema
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Load `config_path` when given, otherwise fall back to defaults.
pub fn resolve_config(config_path: Option<PathBuf>) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => Ok(AppConfig::default()),
    }
}
