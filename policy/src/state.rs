use crate::{
    action::Action,
    effects::VirtualBackgroundState,
    participant::{
        ParticipantId,
        ParticipantStore,
        RecentActiveParticipants,
    },
    track::Tracks,
};
use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use strum::{
    Display,
    EnumIter,
    EnumString,
};

/// Whether the application is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AppState {
    Active,
    Inactive,
    Background,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Layout {
    TileView,
    #[default]
    VerticalFilmstrip,
    HorizontalFilmstrip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportMetrics {
    pub client_width: u32,
    pub client_height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceSession {
    pub name: String,
    pub joined_at: DateTime<Utc>,
}

/// Snapshot of everything the view policies read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceState {
    pub conference: Option<ConferenceSession>,
    pub audio_only: bool,
    /// `None` on platforms that do not report foreground changes.
    pub app_state: Option<AppState>,
    pub car_mode: bool,
    pub filmstrip_enabled: bool,
    pub filmstrip_visible: bool,
    pub filmstrip_hovered: bool,
    pub toolbox_visible: bool,
    pub callee_info_visible: bool,
    pub tile_view_enabled: bool,
    /// Layout used whenever tile view is off.
    pub stage_layout: Layout,
    pub large_video_participant: Option<ParticipantId>,
    pub remote_screen_shares: Vec<ParticipantId>,
    pub virtual_screenshare_participants: Vec<ParticipantId>,
    pub viewport: ViewportMetrics,
    pub participants: ParticipantStore,
    pub tracks: Tracks,
    pub recent_active: RecentActiveParticipants,
    /// Last value computed by the reception policy, independent of whether
    /// the engine accepted it.
    pub last_n: Option<i32>,
    pub virtual_background: VirtualBackgroundState,
}

impl Default for ConferenceState {
    fn default() -> Self {
        Self {
            conference: None,
            audio_only: false,
            app_state: None,
            car_mode: false,
            filmstrip_enabled: true,
            filmstrip_visible: true,
            filmstrip_hovered: false,
            toolbox_visible: false,
            callee_info_visible: false,
            tile_view_enabled: false,
            stage_layout: Layout::default(),
            large_video_participant: None,
            remote_screen_shares: Vec::new(),
            virtual_screenshare_participants: Vec::new(),
            viewport: ViewportMetrics::default(),
            participants: ParticipantStore::default(),
            tracks: Tracks::default(),
            recent_active: RecentActiveParticipants::default(),
            last_n: None,
            virtual_background: VirtualBackgroundState::default(),
        }
    }
}

impl ConferenceState {
    pub fn current_layout(&self) -> Layout {
        if self.tile_view_enabled {
            Layout::TileView
        } else {
            self.stage_layout
        }
    }

    pub fn reduce(&mut self, action: &Action) {
        match action {
            Action::ClientResized {
                client_width,
                client_height,
            } => {
                self.viewport = ViewportMetrics {
                    client_width: *client_width,
                    client_height: *client_height,
                };
            }
            Action::AppStateChanged(app_state) => self.app_state = Some(*app_state),
            Action::ConferenceJoined { name } => {
                self.conference = Some(ConferenceSession {
                    name: name.clone(),
                    joined_at: Utc::now(),
                });
            }
            Action::ConferenceLeft => {
                self.conference = None;
                self.last_n = None;
            }
            Action::ParticipantJoined(participant) => self.participants.join(participant.clone()),
            Action::ParticipantUpdated(participant) => {
                if !self.participants.update(&participant.id, |p| p.apply_update(participant)) {
                    debug!(id = %participant.id, "Ignoring update for unknown participant");
                }
            }
            Action::ParticipantKicked { id } | Action::ParticipantLeft { id } => self.remove_participant(id),
            Action::DominantSpeakerChanged { id } => {
                self.participants.set_dominant_speaker(id.as_ref());
                if let Some(id) = id {
                    self.recent_active.promote(id.clone());
                }
            }
            Action::SetRecentActive(recent) => self.recent_active = recent.iter().cloned().collect(),
            Action::RaiseHand { id, timestamp } => {
                self.participants.update(id, |p| p.raised_hand_timestamp = *timestamp);
            }
            Action::PinParticipant { id } => self.participants.pin(id.as_ref()),
            Action::TrackAdded(track) => self.tracks.add(track.clone()),
            Action::TrackUpdated(track) => {
                if !self.tracks.update(track.clone()) {
                    debug!(participant_id = %track.participant_id, "Ignoring update for unknown track");
                }
            }
            Action::TrackRemoved {
                participant_id,
                media_type,
            } => {
                self.tracks.remove(participant_id, *media_type);
            }
            Action::ScreenShareRemoteParticipantsUpdated(ids) => self.remote_screen_shares = ids.clone(),
            Action::VirtualScreenshareRemoteParticipantsUpdated(ids) => {
                self.virtual_screenshare_participants = ids.clone();
            }
            Action::SelectLargeVideoParticipant { id } => self.large_video_participant = id.clone(),
            Action::SetAudioOnly(enabled) => self.audio_only = *enabled,
            Action::SetCarMode(enabled) => self.car_mode = *enabled,
            Action::SetFilmstripEnabled(enabled) => self.filmstrip_enabled = *enabled,
            Action::SetFilmstripVisible(visible) => self.filmstrip_visible = *visible,
            Action::SetFilmstripHovered(hovered) => self.filmstrip_hovered = *hovered,
            Action::SetToolboxVisible(visible) => self.toolbox_visible = *visible,
            Action::SetCalleeInfoVisible(visible) => self.callee_info_visible = *visible,
            Action::SetTileView(enabled) => self.tile_view_enabled = *enabled,
            Action::SetStageLayout(layout) => self.stage_layout = *layout,
            Action::SetLastN(last_n) => self.last_n = Some(*last_n),
            Action::BackgroundEnabled(enabled) => self.virtual_background.background_effect_enabled = *enabled,
            Action::SetVirtualBackground(options) => self.virtual_background.apply(options),
        }
    }

    fn remove_participant(&mut self, id: &ParticipantId) {
        if self.participants.leave(id).is_none() {
            debug!(%id, "Participant already gone");
        }
        self.tracks.remove_participant(id);
        self.recent_active.remove(id);
        self.remote_screen_shares.retain(|share| share != id);
        if self.large_video_participant.as_ref() == Some(id) {
            self.large_video_participant = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        participant::Participant,
        track::{
            MediaType,
            Track,
        },
    };

    #[test]
    fn leaving_cleans_up_related_state() {
        let mut state = ConferenceState::default();
        state.reduce(&Action::ParticipantJoined(Participant::remote("a")));
        state.reduce(&Action::TrackAdded(Track::desktop("a")));
        state.reduce(&Action::DominantSpeakerChanged { id: Some("a".into()) });
        state.reduce(&Action::ScreenShareRemoteParticipantsUpdated(vec!["a".into()]));
        state.reduce(&Action::SelectLargeVideoParticipant { id: Some("a".into()) });

        state.reduce(&Action::ParticipantLeft { id: "a".into() });

        assert_eq!(state.participants.remote_count(), 0);
        assert!(state.tracks.find(MediaType::Video, &"a".into()).is_none());
        assert!(state.recent_active.is_empty());
        assert!(state.remote_screen_shares.is_empty());
        assert!(state.large_video_participant.is_none());
    }

    #[test]
    fn status_updates_keep_the_dominant_speaker() {
        let mut state = ConferenceState::default();
        state.reduce(&Action::ParticipantJoined(Participant::remote("g")));
        state.reduce(&Action::DominantSpeakerChanged { id: Some("g".into()) });
        state.reduce(&Action::RaiseHand {
            id: "g".into(),
            timestamp: Some(7),
        });

        state.reduce(&Action::ParticipantUpdated(Participant::remote("g").with_name("Grace")));

        let dominant = state.participants.dominant_speaker().unwrap();
        assert_eq!(dominant.id.as_str(), "g");
        assert_eq!(dominant.name.as_deref(), Some("Grace"));
        assert!(dominant.has_raised_hand());
    }

    #[test]
    fn tile_view_overrides_stage_layout() {
        let mut state = ConferenceState::default();
        assert_eq!(state.current_layout(), Layout::VerticalFilmstrip);
        state.reduce(&Action::SetStageLayout(Layout::HorizontalFilmstrip));
        assert_eq!(state.current_layout(), Layout::HorizontalFilmstrip);
        state.reduce(&Action::SetTileView(true));
        assert_eq!(state.current_layout(), Layout::TileView);
    }

    #[test]
    fn leaving_the_conference_forgets_last_n() {
        let mut state = ConferenceState::default();
        state.reduce(&Action::ConferenceJoined { name: "standup".into() });
        state.reduce(&Action::SetLastN(4));
        assert_eq!(state.last_n, Some(4));
        state.reduce(&Action::ConferenceLeft);
        assert!(state.conference.is_none());
        assert_eq!(state.last_n, None);
    }
}
