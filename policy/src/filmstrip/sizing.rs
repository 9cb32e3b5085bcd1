use crate::state::ViewportMetrics;
use serde::Serialize;
use view_policy_config::FilmstripConfig;

/// Margins, borders and padding on both sides of the vertical strip.
const VERTICAL_STRIP_FRAME: u32 = 18;
/// Scrollbar of the vertical strip.
const VERTICAL_STRIP_SCROLLBAR: u32 = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HorizontalThumbnailSizes {
    pub local: ThumbnailSize,
    pub remote: ThumbnailSize,
}

/// Columns and rows of the tile grid that are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub columns: u32,
    pub visible_rows: u32,
}

fn scaled(ratio: f64, height: u32) -> u32 {
    (ratio * f64::from(height)).floor() as u32
}

/// Thumbnail sizes of the horizontal strip. The height is capped at
/// `max_height`, and shrinks with the window once that no longer fits
/// together with the margin.
pub fn horizontal_thumbnail_sizes(client_height: u32, config: &FilmstripConfig) -> HorizontalThumbnailSizes {
    let margin = config.thumbnail_margin;
    let available = client_height.min(config.max_height.saturating_add(margin));
    let height = available.saturating_sub(margin);

    HorizontalThumbnailSizes {
        local: ThumbnailSize {
            width: scaled(config.local_thumbnail_ratio, height),
            height,
        },
        remote: ThumbnailSize {
            width: scaled(config.remote_thumbnail_ratio, height),
            height,
        },
    }
}

/// Size of one tile. Tiles take the full grid height and share the width
/// between the columns, a single visible tile takes the whole width.
pub fn tile_thumbnail_size(
    grid: TileGrid,
    viewport: ViewportMetrics,
    visible_thumbnails: usize,
    config: &FilmstripConfig,
) -> ThumbnailSize {
    let view_width = viewport
        .client_width
        .saturating_sub(config.tile_view_side_margin.saturating_mul(2));
    let view_height = viewport
        .client_height
        .saturating_sub(config.tile_view_padding)
        .saturating_sub(grid.visible_rows.saturating_mul(config.tile_row_margin));

    let width = if visible_thumbnails == 1 {
        view_width
    } else {
        view_width / grid.columns.max(1)
    };

    ThumbnailSize {
        width,
        height: view_height,
    }
}

/// Width the vertical strip occupies next to the large video.
pub fn vertical_filmstrip_visible_width(window_width: u32, config: &FilmstripConfig) -> u32 {
    config.max_height.saturating_add(VERTICAL_STRIP_FRAME).min(window_width)
}

/// Upper bound of the vertical strip including its scrollbar.
pub fn vertical_filmstrip_max_width(config: &FilmstripConfig) -> u32 {
    config
        .max_height
        .saturating_add(VERTICAL_STRIP_FRAME + VERTICAL_STRIP_SCROLLBAR)
}
