use serde::{
    Deserialize,
    Serialize,
};

/// Layout constants of the remote thumbnail strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilmstripConfig {
    /// Participants whose display name starts with this prefix are pinned
    /// outside the ordered filmstrip in stage layouts.
    pub presenter_prefix: String,
    /// Remote tiles shown in tile view.
    pub tile_view_max_visible: usize,
    /// Vertical space taken by the toolbar and the local thumbnail.
    pub chrome_height: u32,
    /// Height of a single remote thumbnail.
    pub thumbnail_height: u32,
    /// Move a hidden dominant speaker into the visible part of the strip.
    pub dominant_speaker_promotion: bool,
    /// Largest thumbnail height of the horizontal strip. Also the base of
    /// the vertical strip width.
    pub max_height: u32,
    /// Space kept above and below horizontal thumbnails.
    pub thumbnail_margin: u32,
    /// Width to height ratio of the local thumbnail.
    pub local_thumbnail_ratio: f64,
    /// Width to height ratio of remote thumbnails.
    pub remote_thumbnail_ratio: f64,
    /// Space kept free above and below the tile grid.
    pub tile_view_padding: u32,
    /// Space kept free on each side of the tile grid.
    pub tile_view_side_margin: u32,
    /// Space between two rows of tiles.
    pub tile_row_margin: u32,
}

impl Default for FilmstripConfig {
    fn default() -> Self {
        Self {
            presenter_prefix: "Trainer".to_string(),
            tile_view_max_visible: 5,
            chrome_height: 200,
            thumbnail_height: 120,
            dominant_speaker_promotion: true,
            max_height: 120,
            thumbnail_margin: 15,
            local_thumbnail_ratio: 16.0 / 9.0,
            remote_thumbnail_ratio: 1.0,
            tile_view_padding: 70,
            tile_view_side_margin: 0,
            tile_row_margin: 0,
        }
    }
}
