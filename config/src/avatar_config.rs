use serde::{
    Deserialize,
    Serialize,
};
use url::Url;

const GRAVATAR_BASE_URL: &str = "https://www.gravatar.com/avatar/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    pub gravatar_base_url: Url,
    /// URL prefixes that must be loaded in CORS mode.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cors_avatar_urls: Vec<String>,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            gravatar_base_url: Url::parse(GRAVATAR_BASE_URL).expect("valid gravatar url"),
            cors_avatar_urls: Vec::new(),
        }
    }
}

impl AvatarConfig {
    pub fn is_cors_avatar_url(&self, url: &Url) -> bool {
        self.cors_avatar_urls
            .iter()
            .any(|prefix| url.as_str().starts_with(prefix.as_str()))
    }
}
