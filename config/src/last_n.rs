use serde::{
    de::{
        MapAccess,
        Visitor,
    },
    Deserialize,
    Deserializer,
    Serialize,
};
use std::{
    collections::BTreeMap,
    fmt,
    time::Duration,
};

const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Reception limit settings, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastNConfig {
    /// Takes precedence over `channel_last_n` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_last_n: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_last_n: Option<i32>,
    #[serde(default, skip_serializing_if = "LastNLimits::is_empty")]
    pub limits: LastNLimits,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Default for LastNConfig {
    fn default() -> Self {
        Self {
            start_last_n: None,
            channel_last_n: None,
            limits: LastNLimits::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl LastNConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The configured value before any participant or UI based adjustment.
    /// `-1` stands for "no explicit cap".
    pub fn base_last_n(&self) -> i32 {
        self.start_last_n.or(self.channel_last_n).unwrap_or(-1)
    }
}

/// Participant count threshold to maximum last-N, ordered by threshold.
///
/// A threshold applies once the participant count reaches it, so
/// `{5: 20, 30: 15}` caps last-N at 20 from five participants on and at 15
/// from thirty participants on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LastNLimits(BTreeMap<usize, i32>);

impl LastNLimits {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, i32)> + '_ {
        self.0.iter().map(|(threshold, limit)| (*threshold, *limit))
    }
}

impl FromIterator<(usize, i32)> for LastNLimits {
    fn from_iter<T: IntoIterator<Item = (usize, i32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// Keys arrive as integers from plain YAML but as strings once they went
// through the layered `config` builder, so both are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum Threshold {
    Number(usize),
    Text(String),
}

impl<'de> Deserialize<'de> for LastNLimits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct LimitsVisitor;

        impl<'de> Visitor<'de> for LimitsVisitor {
            type Value = LastNLimits;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of participant count thresholds to last-N limits")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut limits = BTreeMap::new();
                while let Some((threshold, limit)) = map.next_entry::<Threshold, i32>()? {
                    let threshold = match threshold {
                        Threshold::Number(n) => n,
                        Threshold::Text(text) => text.trim().parse().map_err(|_| {
                            serde::de::Error::custom(format!("invalid last-N threshold {text:?}"))
                        })?,
                    };
                    limits.insert(threshold, limit);
                }
                Ok(LastNLimits(limits))
            }
        }

        deserializer.deserialize_map(LimitsVisitor)
    }
}
