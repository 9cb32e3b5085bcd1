//! Which remote participants get a thumbnail, and in which order.

use crate::{
    error::OrderingError,
    participant::{
        Participant,
        ParticipantId,
    },
    state::{
        ConferenceState,
        Layout,
        ViewportMetrics,
    },
    track::{
        MediaType,
        Track,
    },
};
use serde::Serialize;
use std::collections::HashMap;
use view_policy_config::FilmstripConfig;

mod sizing;
mod visibility;

pub use sizing::{
    horizontal_thumbnail_sizes,
    tile_thumbnail_size,
    vertical_filmstrip_max_width,
    vertical_filmstrip_visible_width,
    HorizontalThumbnailSizes,
    ThumbnailSize,
    TileGrid,
};
pub use visibility::{
    should_remote_videos_be_visible,
    should_render_participant_video,
};

pub const PRESENTER_RANK: usize = 1;
pub const SCREEN_SHARE_RANK: usize = 2;
pub const DOMINANT_SPEAKER_RANK: usize = 3;
pub const RECENT_SPEAKER_RANK: usize = 10;
pub const UNMUTED_VIDEO_RANK: usize = 20;
pub const DEFAULT_RANK: usize = 30;
pub const INACTIVE_RANK: usize = 100;

type Ranks = HashMap<ParticipantId, usize>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilmstripOrder {
    /// Thumbnails to render, in order.
    pub visible: Vec<ParticipantId>,
    /// Remote participants without a thumbnail, in join order.
    pub hidden: Vec<ParticipantId>,
    pub max_visible: usize,
}

/// Number of remote thumbnails that fit without scrolling.
pub fn max_visible_remote_participants(layout: Layout, viewport: ViewportMetrics, config: &FilmstripConfig) -> usize {
    if layout == Layout::TileView {
        return config.tile_view_max_visible;
    }
    viewport
        .client_height
        .saturating_sub(config.chrome_height)
        .checked_div(config.thumbnail_height)
        .unwrap_or_default() as usize
}

/// Remote participants that compete for a thumbnail, in join order.
///
/// Outside of tile view presenters are shown separately and do not take a slot.
pub fn eligible_remote_participants<'a>(state: &'a ConferenceState, config: &FilmstripConfig) -> Vec<&'a Participant> {
    let tile_view = state.current_layout() == Layout::TileView;
    state
        .participants
        .remote()
        .filter(|p| tile_view || !p.name_starts_with(&config.presenter_prefix))
        .collect()
}

/// Sort key of a participant, lower is shown first.
pub fn rank_participant(participant: &Participant, state: &ConferenceState, config: &FilmstripConfig) -> usize {
    if participant.name_starts_with(&config.presenter_prefix) {
        return PRESENTER_RANK;
    }

    let recent_index = state.recent_active.index_of(&participant.id);
    if !participant.is_active() {
        return INACTIVE_RANK + recent_index.unwrap_or_default();
    }

    let video = state.tracks.find(MediaType::Video, &participant.id);
    let remote = participant.is_remote_human();
    if remote && video.is_some_and(Track::is_desktop) {
        return SCREEN_SHARE_RANK;
    }
    if let Some(index) = recent_index {
        return RECENT_SPEAKER_RANK + index;
    }
    if remote && video.is_some_and(|track| !track.muted) {
        return UNMUTED_VIDEO_RANK;
    }
    DEFAULT_RANK
}

fn sort_by_rank(order: &mut [ParticipantId], ranks: &Ranks) {
    order.sort_by_key(|id| ranks.get(id).copied().unwrap_or(usize::MAX));
}

/// Moves a dominant speaker that would be hidden right behind the presenters
/// and screen shares. Returns whether the order changed.
fn promote_dominant_speaker(
    order: &mut [ParticipantId],
    ranks: &mut Ranks,
    dominant_speaker: Option<&ParticipantId>,
    max_visible: usize,
) -> Result<bool, OrderingError> {
    let Some(dominant_speaker) = dominant_speaker else {
        return Ok(false);
    };
    match order.iter().position(|id| id == dominant_speaker) {
        Some(index) if index >= max_visible => {}
        _ => return Ok(false),
    }

    let rank = ranks
        .get_mut(dominant_speaker)
        .ok_or_else(|| OrderingError::MissingRank(dominant_speaker.clone()))?;
    *rank = DOMINANT_SPEAKER_RANK;
    sort_by_rank(order, ranks);
    Ok(true)
}

/// Orders the remote thumbnails for the current layout and viewport.
///
/// Pure function of `state`: ranks are computed into a fresh map on every
/// call and the sort is stable, so equal ranks keep join order.
pub fn order_remote_participants(state: &ConferenceState, config: &FilmstripConfig) -> FilmstripOrder {
    let max_visible = max_visible_remote_participants(state.current_layout(), state.viewport, config);
    let eligible = eligible_remote_participants(state, config);

    let mut ranks: Ranks = eligible
        .iter()
        .map(|p| (p.id.clone(), rank_participant(p, state, config)))
        .collect();
    let mut order: Vec<ParticipantId> = eligible.iter().map(|p| p.id.clone()).collect();
    sort_by_rank(&mut order, &ranks);

    if config.dominant_speaker_promotion && order.len() > max_visible {
        let dominant_speaker = eligible.iter().find(|p| p.dominant_speaker).map(|p| &p.id);
        match promote_dominant_speaker(&mut order, &mut ranks, dominant_speaker, max_visible) {
            Ok(true) => trace!(id = ?dominant_speaker, "Promoted dominant speaker into view"),
            Ok(false) => {}
            Err(err) => warn!("Keeping filmstrip order without promotion: {err}"),
        }
    }

    order.truncate(max_visible);
    let hidden = state
        .participants
        .remote()
        .filter(|p| !order.contains(&p.id))
        .map(|p| p.id.clone())
        .collect();

    FilmstripOrder {
        visible: order,
        hidden,
        max_visible,
    }
}

/// Remote thumbnails that can show an active speaker, presenters excluded.
pub fn visible_active_speaker_count(state: &ConferenceState, config: &FilmstripConfig) -> usize {
    let max_visible = max_visible_remote_participants(state.current_layout(), state.viewport, config);
    let remote = state.participants.remote().count();
    let presenters = state
        .participants
        .remote()
        .filter(|p| p.name_starts_with(&config.presenter_prefix))
        .count();

    if state.current_layout() == Layout::TileView {
        remote.min(max_visible).saturating_sub(presenters)
    } else {
        remote.saturating_sub(presenters).min(max_visible)
    }
}
