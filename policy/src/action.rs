use crate::{
    effects::VirtualBackgroundOptions,
    participant::{
        Participant,
        ParticipantId,
    },
    state::{
        AppState,
        Layout,
    },
    track::{
        MediaType,
        Track,
    },
};
use serde::{
    Deserialize,
    Serialize,
};
use strum::Display;

/// State transitions dispatched into the [`Store`](crate::Store).
#[derive(Display, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Action {
    ClientResized {
        client_width: u32,
        client_height: u32,
    },
    AppStateChanged(AppState),
    ConferenceJoined {
        name: String,
    },
    ConferenceLeft,
    ParticipantJoined(Participant),
    ParticipantUpdated(Participant),
    ParticipantKicked {
        id: ParticipantId,
    },
    ParticipantLeft {
        id: ParticipantId,
    },
    DominantSpeakerChanged {
        id: Option<ParticipantId>,
    },
    SetRecentActive(Vec<ParticipantId>),
    RaiseHand {
        id: ParticipantId,
        timestamp: Option<u64>,
    },
    PinParticipant {
        id: Option<ParticipantId>,
    },
    TrackAdded(Track),
    TrackUpdated(Track),
    TrackRemoved {
        participant_id: ParticipantId,
        media_type: MediaType,
    },
    ScreenShareRemoteParticipantsUpdated(Vec<ParticipantId>),
    VirtualScreenshareRemoteParticipantsUpdated(Vec<ParticipantId>),
    SelectLargeVideoParticipant {
        id: Option<ParticipantId>,
    },
    SetAudioOnly(bool),
    SetCarMode(bool),
    SetFilmstripEnabled(bool),
    SetFilmstripVisible(bool),
    SetFilmstripHovered(bool),
    SetToolboxVisible(bool),
    SetCalleeInfoVisible(bool),
    SetTileView(bool),
    SetStageLayout(Layout),
    SetLastN(i32),
    BackgroundEnabled(bool),
    SetVirtualBackground(VirtualBackgroundOptions),
}

impl Action {
    /// Whether the reception limit has to be recomputed after this action.
    pub fn triggers_last_n_update(&self) -> bool {
        matches!(
            self,
            Action::ClientResized { .. }
                | Action::AppStateChanged(_)
                | Action::ConferenceJoined { .. }
                | Action::ParticipantJoined(_)
                | Action::ParticipantKicked { .. }
                | Action::ParticipantLeft { .. }
                | Action::ScreenShareRemoteParticipantsUpdated(_)
                | Action::SelectLargeVideoParticipant { .. }
                | Action::SetAudioOnly(_)
                | Action::SetCarMode(_)
                | Action::SetFilmstripEnabled(_)
                | Action::SetTileView(_)
                | Action::VirtualScreenshareRemoteParticipantsUpdated(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_layout_and_roster_changes_trigger_last_n() {
        let triggering = [
            Action::ClientResized {
                client_width: 800,
                client_height: 600,
            },
            Action::AppStateChanged(AppState::Background),
            Action::ConferenceJoined { name: "room".into() },
            Action::ParticipantJoined(Participant::remote("a")),
            Action::ParticipantKicked { id: "a".into() },
            Action::ParticipantLeft { id: "a".into() },
            Action::ScreenShareRemoteParticipantsUpdated(vec![]),
            Action::SelectLargeVideoParticipant { id: None },
            Action::SetAudioOnly(true),
            Action::SetCarMode(true),
            Action::SetFilmstripEnabled(false),
            Action::SetTileView(true),
            Action::VirtualScreenshareRemoteParticipantsUpdated(vec![]),
        ];
        assert!(triggering.iter().all(Action::triggers_last_n_update));

        let quiet = [
            Action::ConferenceLeft,
            Action::DominantSpeakerChanged { id: Some("a".into()) },
            Action::TrackAdded(Track::video("a")),
            Action::SetLastN(3),
            Action::SetStageLayout(Layout::HorizontalFilmstrip),
            Action::BackgroundEnabled(true),
        ];
        assert!(!quiet.iter().any(Action::triggers_last_n_update));
    }

    #[test]
    fn actions_read_from_singleton_maps() {
        #[derive(Deserialize)]
        struct Step {
            #[serde(with = "serde_yml::with::singleton_map_recursive")]
            action: Action,
        }

        let step: Step = serde_yml::from_str("action:\n  participant-left:\n    id: bob\n").unwrap();
        assert_eq!(step.action, Action::ParticipantLeft { id: "bob".into() });
        let step: Step = serde_yml::from_str("action: conference-left\n").unwrap();
        assert_eq!(step.action, Action::ConferenceLeft);
        assert_eq!(step.action.to_string(), "conference-left");
    }
}
