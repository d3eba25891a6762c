use crate::errors::ConfigError;
use crate::features::FieldBinding;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file read when no explicit path or `IRIS_CONFIG` is given.
pub const DEFAULT_CONFIG_FILE: &str = "iris.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    /// Development mode: debug-level logs and model error detail on the page
    pub debug: bool,
    #[serde(default)]
    pub field_binding: FieldBinding,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            model_path: PathBuf::from("model.json"),
            debug: true,
            field_binding: FieldBinding::ByName,
        }
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::invalid("host cannot be empty"));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("model_path cannot be empty"));
        }
        Ok(())
    }
}

/// The TOML file `load_config` reads: `path`, else `$IRIS_CONFIG`, else
/// [`DEFAULT_CONFIG_FILE`]. The file need not exist.
pub fn config_file(path: Option<&Path>) -> PathBuf {
    match path {
        Some(p) => p.to_path_buf(),
        None => std::env::var("IRIS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}

/// Defaults, then the TOML file, then `IRIS_*` environment variables.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let file = config_file(path);

    let figment = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&file))
        .merge(Env::prefixed("IRIS_").ignore(&["config"]));

    let config: AppConfig = figment.extract()?;
    config.validate()?;

    Ok(config)
}
