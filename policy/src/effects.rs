use crate::{
    action::Action,
    engine::LocalVideoTrack,
    Store,
};
use serde::{
    Deserialize,
    Serialize,
};
use strum::Display;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BackgroundType {
    #[default]
    None,
    Image,
    Blur,
    DesktopShare,
}

/// What the user picked in the background selection dialog.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualBackgroundOptions {
    pub enabled: bool,
    #[serde(default)]
    pub background_type: BackgroundType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur_value: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_thumbnail: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualBackgroundState {
    pub background_effect_enabled: bool,
    pub background_type: BackgroundType,
    pub virtual_source: Option<String>,
    pub blur_value: Option<u32>,
    pub selected_thumbnail: Option<String>,
}

impl VirtualBackgroundState {
    pub(crate) fn apply(&mut self, options: &VirtualBackgroundOptions) {
        self.background_type = options.background_type;
        self.virtual_source = options.url.clone();
        self.blur_value = options.blur_value;
        self.selected_thumbnail = options.selected_thumbnail.clone();
    }
}

/// Effect handed to the engine for the local camera track.
#[derive(Debug, Clone, PartialEq)]
pub enum VideoEffect {
    VirtualBackground {
        background_type: BackgroundType,
        virtual_source: Option<String>,
        blur_value: Option<u32>,
    },
}

impl From<&VirtualBackgroundState> for VideoEffect {
    fn from(state: &VirtualBackgroundState) -> Self {
        Self::VirtualBackground {
            background_type: state.background_type,
            virtual_source: state.virtual_source.clone(),
            blur_value: state.blur_value,
        }
    }
}

/// Turns the virtual background on or off for `track`.
///
/// The enabled flag is recorded before the engine is involved. If the engine
/// fails to apply or remove the effect the flag is rolled back to disabled,
/// so the UI never shows an effect that is not running. Returns whether the
/// effect ended up enabled.
pub async fn toggle_background_effect<T>(store: &Store, options: VirtualBackgroundOptions, track: Option<&T>) -> bool
where
    T: LocalVideoTrack + ?Sized,
{
    store.dispatch(Action::BackgroundEnabled(options.enabled));
    store.dispatch(Action::SetVirtualBackground(options.clone()));

    if let Some(track) = track {
        let result = if options.enabled {
            let effect = store.with_state(|state| VideoEffect::from(&state.virtual_background));
            track.set_effect(Some(effect)).await
        } else {
            let result = track.set_effect(None).await;
            if result.is_ok() {
                store.dispatch(Action::BackgroundEnabled(false));
            }
            result
        };

        if let Err(err) = result {
            store.dispatch(Action::BackgroundEnabled(false));
            error!("Error on apply background effect: {err}");
        }
    }

    store.with_state(|state| state.virtual_background.background_effect_enabled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingTrack {
        fail: bool,
        applied: Mutex<Vec<Option<VideoEffect>>>,
    }

    #[async_trait::async_trait]
    impl LocalVideoTrack for RecordingTrack {
        async fn set_effect(&self, effect: Option<VideoEffect>) -> Result<(), EngineError> {
            self.applied.lock().unwrap().push(effect);
            if self.fail {
                return Err(EngineError::rejected("set_effect", "no gpu"));
            }
            Ok(())
        }
    }

    fn blur() -> VirtualBackgroundOptions {
        VirtualBackgroundOptions {
            enabled: true,
            background_type: BackgroundType::Blur,
            blur_value: Some(25),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn enabling_applies_the_recorded_background() {
        let store = Store::default();
        let track = RecordingTrack::default();

        assert!(toggle_background_effect(&store, blur(), Some(&track)).await);

        let applied = track.applied.lock().unwrap().clone();
        assert_eq!(
            applied,
            vec![Some(VideoEffect::VirtualBackground {
                background_type: BackgroundType::Blur,
                virtual_source: None,
                blur_value: Some(25),
            })]
        );
    }

    #[tokio::test]
    async fn failure_rolls_back_to_disabled() {
        let store = Store::default();
        let track = RecordingTrack {
            fail: true,
            ..Default::default()
        };

        assert!(!toggle_background_effect(&store, blur(), Some(&track)).await);
        let background = store.with_state(|state| state.virtual_background.clone());
        assert!(!background.background_effect_enabled);
        assert_eq!(background.background_type, BackgroundType::Blur);
    }

    #[tokio::test]
    async fn disabling_removes_the_effect() {
        let store = Store::default();
        let track = RecordingTrack::default();
        toggle_background_effect(&store, blur(), Some(&track)).await;

        let enabled = toggle_background_effect(&store, VirtualBackgroundOptions::default(), Some(&track)).await;

        assert!(!enabled);
        assert_eq!(track.applied.lock().unwrap().last(), Some(&None));
    }

    #[tokio::test]
    async fn without_a_track_only_state_changes() {
        let store = Store::default();
        assert!(toggle_background_effect::<RecordingTrack>(&store, blur(), None).await);
    }
}
