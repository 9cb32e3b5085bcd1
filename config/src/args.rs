/// Overrides for the stored configuration.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Initial last-N value, takes precedence over `--channel-last-n`.
    #[clap(long, value_name = "N", allow_negative_numbers = true)]
    pub start_last_n: Option<i32>,

    /// Channel last-N value used when no start value is configured.
    #[clap(long, value_name = "N", allow_negative_numbers = true)]
    pub channel_last_n: Option<i32>,

    /// Trailing debounce window for last-N updates in milliseconds.
    #[clap(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Name prefix of participants pinned outside the filmstrip.
    #[clap(long, value_name = "PREFIX")]
    pub presenter_prefix: Option<String>,

    /// Disables moving a hidden dominant speaker into the visible filmstrip.
    #[clap(long = "no-dominant-speaker-promotion", action)]
    pub no_dominant_speaker_promotion: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for ConfigArgs {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(value) = self.start_last_n {
                cache.insert("last_n.start_last_n".to_string(), i64::from(value).into());
            }
            if let Some(value) = self.channel_last_n {
                cache.insert("last_n.channel_last_n".to_string(), i64::from(value).into());
            }
            if let Some(value) = self.debounce_ms {
                cache.insert("last_n.debounce_ms".to_string(), value.into());
            }
            if let Some(prefix) = &self.presenter_prefix {
                cache.insert("filmstrip.presenter_prefix".to_string(), prefix.clone().into());
            }
            if self.no_dominant_speaker_promotion {
                cache.insert("filmstrip.dominant_speaker_promotion".to_string(), false.into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();

    format!(
        "\
Authors: {author}

Config directory: {config_dir_path}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Source as _;

    #[test]
    fn only_set_overrides_are_collected() {
        let args = ConfigArgs {
            channel_last_n: Some(-1),
            no_dominant_speaker_promotion: true,
            ..Default::default()
        };
        let collected = args.collect().unwrap();
        assert_eq!(collected.len(), 2);
        assert!(collected.contains_key("last_n.channel_last_n"));
        assert!(collected.contains_key("filmstrip.dominant_speaker_promotion"));
    }
}
