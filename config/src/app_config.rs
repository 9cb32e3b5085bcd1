use directories::ProjectDirs;
use serde::Deserialize;
use std::path::PathBuf;

/// Name of the binary the configuration belongs to.
pub(crate) const BINARY_NAME: &str = "view-policy";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub(super) config_dir: PathBuf,
}

lazy_static::lazy_static! {
    /// `VIEW_POLICY_CONFIG` for the `view-policy` binary.
    pub(crate) static ref CONFIG_DIR_VAR: String = format!("{}_CONFIG", BINARY_NAME.replace('-', "_").to_uppercase());
}

/// Directory holding the optional `config.yaml`.
///
/// The `VIEW_POLICY_CONFIG` environment variable takes precedence over the
/// platform's local config directory.
pub fn get_config_dir() -> PathBuf {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_VAR.as_str()).map(PathBuf::from))
}

fn resolve_config_dir(env_override: Option<PathBuf>) -> PathBuf {
    env_override
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| ProjectDirs::from("video", "hyper", BINARY_NAME).map(|dirs| dirs.config_local_dir().to_path_buf()))
        .unwrap_or_else(|| PathBuf::from(".").join(".config"))
}
