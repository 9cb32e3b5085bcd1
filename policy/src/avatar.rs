//! Picks the first avatar of a participant that actually loads.

use crate::{
    error::AvatarError,
    participant::Participant,
};
use reqwest::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
};
use url::Url;
use view_policy_config::AvatarConfig;

const GRAVATAR_QUERY: &str = "d=wavatar&size=200";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    /// Built-in icon of the phone gateway participant.
    JigasiIcon,
    Url(Url),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadableAvatar {
    pub source: AvatarSource,
    pub using_cors: bool,
}

/// Outcome of a successful load. `src` is the URL the image was finally
/// served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub src: Url,
    pub using_cors: bool,
}

#[async_trait::async_trait]
pub trait AvatarLoader: Send + Sync {
    async fn load(&self, url: &Url, cors: bool) -> Result<LoadedImage, AvatarError>;
}

/// Loads avatars over HTTP. A response counts as loadable when it is
/// successful and serves an image.
#[derive(Debug, Clone, Default)]
pub struct HttpAvatarLoader {
    client: reqwest::Client,
}

impl HttpAvatarLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl AvatarLoader for HttpAvatarLoader {
    async fn load(&self, url: &Url, cors: bool) -> Result<LoadedImage, AvatarError> {
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if !content_type.starts_with("image/") {
            return Err(AvatarError::NotAnImage {
                url: url.clone(),
                content_type: content_type.to_string(),
            });
        }

        // Without the header the image still loads, just not in CORS mode.
        let using_cors = cors && response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN);
        Ok(LoadedImage {
            src: response.url().clone(),
            using_cors,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvatarCheck {
    pub loadable: bool,
    pub using_cors: bool,
}

/// Avatar URLs that were already checked. Cloning shares the cache.
#[derive(Debug, Clone, Default)]
pub struct AvatarCache {
    checked: Arc<Mutex<HashMap<Url, AvatarCheck>>>,
}

impl AvatarCache {
    fn lock(&self) -> MutexGuard<'_, HashMap<Url, AvatarCheck>> {
        self.checked.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, url: &Url) -> Option<AvatarCheck> {
        self.lock().get(url).copied()
    }

    pub fn insert(&self, url: Url, check: AvatarCheck) {
        self.lock().insert(url, check);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

/// Gravatar URL for an email address. Keys that are not email addresses are
/// taken as an already hashed id and used as given.
pub fn gravatar_url(key: &str, base_url: &Url) -> Option<Url> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    let id = if key.contains('@') {
        format!("{:x}", md5::compute(key.to_lowercase().as_bytes()))
    } else {
        key.to_string()
    };

    let mut url = base_url.clone();
    url.path_segments_mut().ok()?.pop_if_empty().push(&id);
    url.set_query(Some(GRAVATAR_QUERY));
    Some(url)
}

/// Resolves avatars one participant at a time, sharing one [`AvatarCache`].
#[derive(Debug)]
pub struct AvatarResolver<P> {
    loader: P,
    config: AvatarConfig,
    cache: AvatarCache,
    queue: tokio::sync::Mutex<()>,
}

impl<P: AvatarLoader> AvatarResolver<P> {
    pub fn new(loader: P, config: AvatarConfig) -> Self {
        Self::with_cache(loader, config, AvatarCache::default())
    }

    pub fn with_cache(loader: P, config: AvatarConfig, cache: AvatarCache) -> Self {
        Self {
            loader,
            config,
            cache,
            queue: Default::default(),
        }
    }

    pub fn cache(&self) -> &AvatarCache {
        &self.cache
    }

    /// Avatar sources in order of preference.
    pub fn candidates(&self, participant: &Participant) -> Vec<AvatarSource> {
        let jigasi = participant.is_jigasi.then_some(AvatarSource::JigasiIcon);
        let avatar_url = participant.avatar_url.clone().map(AvatarSource::Url);
        let gravatar = participant
            .email
            .as_deref()
            .and_then(|email| gravatar_url(email, &self.config.gravatar_base_url))
            .map(AvatarSource::Url);

        [jigasi, avatar_url, gravatar].into_iter().flatten().collect()
    }

    /// First candidate that loads, loading each URL at most once per cache.
    ///
    /// Concurrent calls are served one after another.
    pub async fn first_loadable_avatar(&self, participant: &Participant) -> Option<LoadableAvatar> {
        let _turn = self.queue.lock().await;

        for candidate in self.candidates(participant) {
            let url = match candidate {
                AvatarSource::JigasiIcon => {
                    return Some(LoadableAvatar {
                        source: AvatarSource::JigasiIcon,
                        using_cors: false,
                    });
                }
                AvatarSource::Url(url) => url,
            };

            if let Some(check) = self.cache.get(&url) {
                if check.loadable {
                    return Some(LoadableAvatar {
                        source: AvatarSource::Url(url),
                        using_cors: check.using_cors,
                    });
                }
                continue;
            }

            let cors = self.config.is_cors_avatar_url(&url);
            match self.loader.load(&url, cors).await {
                Ok(LoadedImage { src, using_cors }) => {
                    self.cache.insert(src.clone(), AvatarCheck {
                        loadable: true,
                        using_cors,
                    });
                    return Some(LoadableAvatar {
                        source: AvatarSource::Url(src),
                        using_cors,
                    });
                }
                Err(err) => {
                    debug!(id = %participant.id, %url, "Avatar not loadable: {err}");
                    self.cache.insert(url, AvatarCheck {
                        loadable: false,
                        using_cors: false,
                    });
                }
            }
        }

        None
    }
}
