#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod avatar_config;
mod filmstrip_config;
mod last_n;

use app_config::AppConfig;
pub use app_config::get_config_dir;
pub use args::{
    version,
    ConfigArgs,
};
pub use avatar_config::AvatarConfig;
use color_eyre::Result;
use eyre::{
    ensure,
    Context as _,
};
pub use filmstrip_config::FilmstripConfig;
pub use last_n::{
    LastNConfig,
    LastNLimits,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::path::Path;

/// Fallback display names for participants that did not set one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantsConfig {
    pub default_local_display_name: String,
    pub default_remote_display_name: String,
}

impl Default for ParticipantsConfig {
    fn default() -> Self {
        Self {
            default_local_display_name: "me".to_string(),
            default_remote_display_name: "Fellow Jitster".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    pub app_config: AppConfig,
    #[serde(default)]
    pub last_n: LastNConfig,
    #[serde(default)]
    pub filmstrip: FilmstripConfig,
    #[serde(default)]
    pub participants: ParticipantsConfig,
    #[serde(default)]
    pub avatars: AvatarConfig,
    /// Always show remote thumbnails, even in one-on-one calls.
    #[serde(default)]
    pub disable_one_on_one_mode: bool,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    pub fn new(args: &ConfigArgs) -> Result<Self, config::ConfigError> {
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args.clone());

        let cfg: Self = builder.build()?.try_deserialize()?;
        debug!(?cfg.last_n, ?cfg.filmstrip, "Loaded configuration");

        Ok(cfg)
    }

    /// Loads a configuration from a single YAML file on top of the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let cfg: Self = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml))
            .add_source(config::File::from(path).format(config::FileFormat::Yaml))
            .build()
            .and_then(|c| c.try_deserialize())
            .wrap_err_with(|| format!("Failed to load config from {path:?}"))?;
        Ok(cfg)
    }

    pub fn config_dir(&self) -> &Path {
        &self.app_config.config_dir
    }

    /// Rejects values the policies cannot work with.
    pub fn validate(&self) -> Result<()> {
        let last_n = &self.last_n;
        for (name, value) in [("start_last_n", last_n.start_last_n), ("channel_last_n", last_n.channel_last_n)] {
            if let Some(value) = value {
                ensure!(value >= -1, "last_n.{name} must be -1 or greater, got {value}");
            }
        }
        for (threshold, limit) in last_n.limits.iter() {
            ensure!(
                limit >= -1,
                "last_n.limits[{threshold}] must be -1 or greater, got {limit}"
            );
        }
        ensure!(
            self.filmstrip.thumbnail_height > 0,
            "filmstrip.thumbnail_height must be greater than zero"
        );
        for (name, ratio) in [
            ("local_thumbnail_ratio", self.filmstrip.local_thumbnail_ratio),
            ("remote_thumbnail_ratio", self.filmstrip.remote_thumbnail_ratio),
        ] {
            ensure!(
                ratio.is_finite() && ratio > 0.0,
                "filmstrip.{name} must be a positive number, got {ratio}"
            );
        }
        Ok(())
    }
}
