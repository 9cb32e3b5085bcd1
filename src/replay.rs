use crate::scenario::Scenario;
use color_eyre::Result;
use serde::Serialize;
use std::{
    path::Path,
    time::Duration,
};
use tokio::time::Instant;
use view_policy_config::Config;
use view_policy_core::{
    filmstrip::{
        horizontal_thumbnail_sizes,
        order_remote_participants,
        should_remote_videos_be_visible,
        vertical_filmstrip_visible_width,
        visible_active_speaker_count,
        FilmstripOrder,
        HorizontalThumbnailSizes,
    },
    toolbox::{
        visible_buttons,
        ToolbarButton,
    },
    InMemoryEngine,
    LastNMiddleware,
    MediaEngine as _,
    Store,
};

const SETTLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Where a replay ended up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    /// Every value passed to the engine, rejected ones included.
    pub engine_calls: Vec<i32>,
    pub engine_last_n: i32,
    /// Last value the reception policy decided on.
    pub last_n: Option<i32>,
    pub filmstrip: FilmstripOrder,
    pub visible_active_speakers: usize,
    pub remote_videos_visible: bool,
    pub horizontal_thumbnails: HorizontalThumbnailSizes,
    pub vertical_filmstrip_width: u32,
    pub toolbar: Vec<ToolbarButton>,
}

impl ReplaySummary {
    pub fn log(&self) {
        info!(calls = ?self.engine_calls, engine = self.engine_last_n, intended = ?self.last_n, "last N");
        info!(
            visible = ?self.filmstrip.visible,
            hidden = ?self.filmstrip.hidden,
            max_visible = self.filmstrip.max_visible,
            active_speakers = self.visible_active_speakers,
            remote_videos_visible = self.remote_videos_visible,
            "filmstrip"
        );
        info!(
            horizontal = ?self.horizontal_thumbnails,
            vertical_width = self.vertical_filmstrip_width,
            "thumbnails"
        );
        info!(buttons = ?self.toolbar, "toolbar");
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Dispatches every step at its offset, then waits for the debounced
/// last-N update to settle.
pub async fn replay(scenario: Scenario, config: &Config) -> Result<ReplaySummary> {
    let engine = InMemoryEngine::with_last_n(scenario.engine_last_n);
    engine.set_failing(scenario.fail_set_last_n);

    let store = Store::default();
    let last_n = LastNMiddleware::install(&store, engine.clone(), config.last_n.clone());

    info!(steps = scenario.steps.len(), duration_ms = scenario.duration_ms(), "Replaying scenario");
    let start = Instant::now();
    for step in scenario.steps {
        tokio::time::sleep_until(start + Duration::from_millis(step.at_ms)).await;
        debug!(at_ms = step.at_ms, action = %step.action, "Dispatching");
        store.dispatch(step.action);
    }

    tokio::time::sleep(config.last_n.debounce()).await;
    while last_n.is_pending() {
        tokio::time::sleep(SETTLE_POLL_INTERVAL).await;
    }

    let summary = store.with_state(|state| ReplaySummary {
        engine_calls: engine.calls(),
        engine_last_n: engine.last_n(),
        last_n: state.last_n,
        filmstrip: order_remote_participants(state, &config.filmstrip),
        visible_active_speakers: visible_active_speaker_count(state, &config.filmstrip),
        remote_videos_visible: should_remote_videos_be_visible(state, config.disable_one_on_one_mode),
        horizontal_thumbnails: horizontal_thumbnail_sizes(state.viewport.client_height, &config.filmstrip),
        vertical_filmstrip_width: vertical_filmstrip_visible_width(state.viewport.client_width, &config.filmstrip),
        toolbar: visible_buttons(state.viewport.client_width).to_vec(),
    });
    Ok(summary)
}
