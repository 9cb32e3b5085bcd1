use crate::participant::ParticipantId;
use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumString,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaType {
    Audio,
    Video,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VideoType {
    #[default]
    Camera,
    Desktop,
}

/// Read-only view on a media engine track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub participant_id: ParticipantId,
    pub media_type: MediaType,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub video_type: VideoType,
    #[serde(default)]
    pub local: bool,
}

impl Track {
    pub fn video(participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            participant_id: participant_id.into(),
            media_type: MediaType::Video,
            muted: false,
            video_type: VideoType::Camera,
            local: false,
        }
    }

    pub fn audio(participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            media_type: MediaType::Audio,
            ..Self::video(participant_id)
        }
    }

    pub fn desktop(participant_id: impl Into<ParticipantId>) -> Self {
        Self {
            video_type: VideoType::Desktop,
            ..Self::video(participant_id)
        }
    }

    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }

    pub fn is_desktop(&self) -> bool {
        self.media_type == MediaType::Video && self.video_type == VideoType::Desktop
    }

    fn same_slot(&self, other: &Track) -> bool {
        self.participant_id == other.participant_id && self.media_type == other.media_type && self.local == other.local
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tracks(Vec<Track>);

impl Tracks {
    /// Adds a track, replacing the one in the same participant/media slot.
    pub fn add(&mut self, track: Track) {
        match self.0.iter_mut().find(|t| t.same_slot(&track)) {
            Some(existing) => *existing = track,
            None => self.0.push(track),
        }
    }

    /// Replaces a known track. Returns false if the slot is empty.
    pub fn update(&mut self, track: Track) -> bool {
        match self.0.iter_mut().find(|t| t.same_slot(&track)) {
            Some(existing) => {
                *existing = track;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, participant_id: &ParticipantId, media_type: MediaType) -> Option<Track> {
        let index = self
            .0
            .iter()
            .position(|t| &t.participant_id == participant_id && t.media_type == media_type)?;
        Some(self.0.remove(index))
    }

    pub fn remove_participant(&mut self, participant_id: &ParticipantId) {
        self.0.retain(|t| &t.participant_id != participant_id);
    }

    pub fn find(&self, media_type: MediaType, participant_id: &ParticipantId) -> Option<&Track> {
        self.0
            .iter()
            .find(|t| t.media_type == media_type && &t.participant_id == participant_id)
    }

    pub fn local_video(&self) -> Option<&Track> {
        self.0.iter().find(|t| t.local && t.media_type == MediaType::Video)
    }

    pub fn is_local_video_track_desktop(&self) -> bool {
        self.local_video().is_some_and(Track::is_desktop)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> + '_ {
        self.0.iter()
    }
}
