use crate::{
    participant::ParticipantId,
    state::ConferenceState,
    track::MediaType,
};

/// Whether a video element should be rendered for `id`.
///
/// Requires an unmuted video track and an active connection. In audio only
/// mode only a remote screen share on stage is rendered.
pub fn should_render_participant_video(state: &ConferenceState, id: &ParticipantId) -> bool {
    let Some(participant) = state.participants.get(id) else {
        return false;
    };
    if !state.tracks.find(MediaType::Video, id).is_some_and(|track| !track.muted) {
        return false;
    }
    if !participant.is_active() {
        return false;
    }
    if !state.audio_only {
        return true;
    }
    state.large_video_participant.as_ref() == Some(id) && state.remote_screen_shares.contains(id)
}

/// Whether the remote thumbnails should be shown at all.
///
/// Fake participants count here since they get a thumbnail as well.
pub fn should_remote_videos_be_visible(state: &ConferenceState, disable_one_on_one_mode: bool) -> bool {
    if state.callee_info_visible {
        return false;
    }

    let count = state.participants.count_with_fake();
    let local_pinned = state.participants.pinned().is_some_and(|p| p.local);
    count > 2 || (count > 1 && (state.filmstrip_hovered || state.toolbox_visible || local_pinned)) || disable_one_on_one_mode
}
