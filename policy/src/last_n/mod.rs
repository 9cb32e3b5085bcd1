//! Reception limit ("last-N"): how many remote video streams the client
//! asks the media engine to forward.

use crate::state::{
    AppState,
    ConferenceState,
};
use serde::Serialize;
use strum::Display;
use view_policy_config::{
    LastNConfig,
    LastNLimits,
};

mod debounce;
mod updater;

pub use debounce::Debouncer;
pub use updater::{
    LastNMiddleware,
    LastNUpdater,
};

/// Which rule produced a last-N value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LastNReason {
    Configured,
    Background,
    CarMode,
    AudioOnly,
    FilmstripDisabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LastNDecision {
    pub value: i32,
    pub reason: LastNReason,
}

/// Limit of the greatest threshold the participant count has reached.
pub fn limit_last_n(participant_count: usize, limits: &LastNLimits) -> Option<i32> {
    limits
        .iter()
        .take_while(|(threshold, _)| participant_count >= *threshold)
        .last()
        .map(|(_, limit)| limit)
}

/// Computes the reception limit for the given state.
///
/// Returns `None` when there is no conference to apply it to. Otherwise the
/// configured value, capped by the participant count tier, is overridden by
/// the first of: app in background, car mode, audio only, filmstrip disabled.
pub fn compute_last_n(state: &ConferenceState, config: &LastNConfig) -> Option<LastNDecision> {
    if state.conference.is_none() {
        debug!("There is no active conference, not updating last N");
        return None;
    }

    let mut value = config.base_last_n();
    if let Some(limited) = limit_last_n(state.participants.count(), &config.limits) {
        value = if value == -1 { limited } else { limited.min(value) };
    }

    let decision = |value, reason| Some(LastNDecision { value, reason });

    if state.app_state.is_some_and(|app_state| app_state != AppState::Active) {
        let value = if state.tracks.is_local_video_track_desktop() { 1 } else { 0 };
        return decision(value, LastNReason::Background);
    }
    if state.car_mode {
        return decision(0, LastNReason::CarMode);
    }
    if state.audio_only {
        // Only a remote screen share on stage keeps a stream in audio only mode.
        let on_stage = state
            .large_video_participant
            .as_ref()
            .and_then(|id| state.participants.get(id))
            .filter(|participant| !participant.local);
        let value = match on_stage {
            Some(participant) if !state.tile_view_enabled && state.remote_screen_shares.contains(&participant.id) => 1,
            _ => 0,
        };
        return decision(value, LastNReason::AudioOnly);
    }
    if !state.filmstrip_enabled {
        return decision(1, LastNReason::FilmstripDisabled);
    }

    decision(value, LastNReason::Configured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        action::Action,
        participant::Participant,
        track::Track,
    };

    fn limits(entries: &[(usize, i32)]) -> LastNLimits {
        entries.iter().copied().collect()
    }

    fn conference(remote: usize) -> ConferenceState {
        let mut state = ConferenceState::default();
        state.reduce(&Action::ConferenceJoined { name: "room".into() });
        state.reduce(&Action::ParticipantJoined(Participant::local("me")));
        for i in 0..remote {
            state.reduce(&Action::ParticipantJoined(Participant::remote(format!("p{i}"))));
        }
        state
    }

    fn channel(last_n: i32) -> LastNConfig {
        LastNConfig {
            channel_last_n: Some(last_n),
            ..Default::default()
        }
    }

    #[test]
    fn no_conference_skips() {
        assert_eq!(compute_last_n(&ConferenceState::default(), &channel(20)), None);
    }

    #[test]
    fn tier_lookup_uses_greatest_reached_threshold() {
        let table = limits(&[(1, 20), (5, 15), (10, 10)]);
        assert_eq!(limit_last_n(0, &table), None);
        assert_eq!(limit_last_n(4, &table), Some(20));
        assert_eq!(limit_last_n(7, &table), Some(15));
        assert_eq!(limit_last_n(10, &table), Some(10));
        assert_eq!(limit_last_n(500, &table), Some(10));
        assert_eq!(limit_last_n(7, &LastNLimits::default()), None);
    }

    #[test]
    fn counts_below_every_threshold_leave_the_base_untouched() {
        let config = LastNConfig {
            channel_last_n: Some(8),
            limits: limits(&[(10, 2), (20, 1)]),
            ..Default::default()
        };
        for remote in 0..9 {
            assert_eq!(compute_last_n(&conference(remote), &config).map(|d| d.value), Some(8));
        }
    }

    #[test]
    fn tier_caps_channel_last_n() {
        let config = LastNConfig {
            limits: limits(&[(1, 20), (5, 15), (10, 10)]),
            ..channel(20)
        };
        // Six remote plus the local participant.
        let decision = compute_last_n(&conference(6), &config).unwrap();
        assert_eq!(decision.value, 15);
        assert_eq!(decision.reason, LastNReason::Configured);
    }

    #[test]
    fn tier_replaces_uncapped_base() {
        let config = LastNConfig {
            limits: limits(&[(3, 4)]),
            ..Default::default()
        };
        assert_eq!(compute_last_n(&conference(1), &config).map(|d| d.value), Some(-1));
        assert_eq!(compute_last_n(&conference(2), &config).map(|d| d.value), Some(4));
    }

    #[test]
    fn fake_participants_do_not_count_towards_tiers() {
        let config = LastNConfig {
            limits: limits(&[(3, 1)]),
            ..channel(6)
        };
        let mut state = conference(1);
        state.reduce(&Action::ParticipantJoined(Participant {
            is_fake_participant: true,
            ..Participant::remote("shared-video")
        }));
        assert_eq!(compute_last_n(&state, &config).map(|d| d.value), Some(6));
    }

    #[test]
    fn start_last_n_wins_over_channel_last_n() {
        let config = LastNConfig {
            start_last_n: Some(2),
            ..channel(20)
        };
        assert_eq!(compute_last_n(&conference(5), &config).map(|d| d.value), Some(2));
    }

    #[test]
    fn background_allows_only_a_local_screen_share() {
        for app_state in [AppState::Inactive, AppState::Background] {
            let mut state = conference(3);
            state.reduce(&Action::AppStateChanged(app_state));
            state.reduce(&Action::SetAudioOnly(true));
            let decision = compute_last_n(&state, &channel(20)).unwrap();
            assert_eq!(decision, LastNDecision {
                value: 0,
                reason: LastNReason::Background
            });

            state.reduce(&Action::TrackAdded(Track {
                local: true,
                ..Track::desktop("me")
            }));
            assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.value), Some(1));
        }
    }

    #[test]
    fn foreground_keeps_the_configured_value() {
        let mut state = conference(3);
        state.reduce(&Action::AppStateChanged(AppState::Active));
        assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.value), Some(20));
    }

    #[test]
    fn car_mode_requests_nothing() {
        let mut state = conference(3);
        state.reduce(&Action::SetCarMode(true));
        state.reduce(&Action::SetFilmstripEnabled(false));
        assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.reason), Some(LastNReason::CarMode));
        assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.value), Some(0));
    }

    #[test]
    fn audio_only_keeps_a_remote_screen_share_on_stage() {
        let mut state = conference(3);
        state.reduce(&Action::SetAudioOnly(true));
        state.reduce(&Action::SelectLargeVideoParticipant { id: Some("p1".into()) });
        assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.value), Some(0));

        state.reduce(&Action::ScreenShareRemoteParticipantsUpdated(vec!["p1".into()]));
        assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.value), Some(1));

        state.reduce(&Action::SetTileView(true));
        assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.value), Some(0));
    }

    #[test]
    fn audio_only_ignores_the_local_participant_on_stage() {
        let mut state = conference(3);
        state.reduce(&Action::SetAudioOnly(true));
        state.reduce(&Action::SelectLargeVideoParticipant { id: Some("me".into()) });
        state.reduce(&Action::ScreenShareRemoteParticipantsUpdated(vec!["me".into()]));
        assert_eq!(compute_last_n(&state, &channel(20)).map(|d| d.value), Some(0));
    }

    #[test]
    fn disabled_filmstrip_requests_one_stream() {
        let mut state = conference(3);
        state.reduce(&Action::SetFilmstripEnabled(false));
        assert_eq!(
            compute_last_n(&state, &channel(20)),
            Some(LastNDecision {
                value: 1,
                reason: LastNReason::FilmstripDisabled
            })
        );
    }
}
