use serde::Serialize;
use strum::{
    Display,
    EnumIter,
};

/// Buttons of the main toolbar that collapse into the overflow menu on
/// narrow screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToolbarButton {
    Camera,
    Microphone,
    Desktop,
    Chat,
    RaiseHand,
    Participants,
    TileView,
}

use ToolbarButton::*;

/// Minimum client width and the buttons shown above it, widest first.
pub const THRESHOLDS: &[(u32, &[ToolbarButton])] = &[
    (520, &[Camera, Microphone, Desktop, Chat, RaiseHand, Participants, TileView]),
    (470, &[Camera, Microphone, Desktop, Chat, RaiseHand, Participants]),
    (420, &[Camera, Microphone, Desktop, Chat, Participants]),
    (370, &[Camera, Microphone, Chat, Participants]),
    (320, &[Camera, Microphone, Chat]),
    (270, &[Camera, Microphone]),
];

/// Buttons kept in the toolbar for a client of the given width.
pub fn visible_buttons(client_width: u32) -> &'static [ToolbarButton] {
    THRESHOLDS
        .iter()
        .find(|(width, _)| client_width > *width)
        .or(THRESHOLDS.last())
        .map(|(_, buttons)| *buttons)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn wide_clients_show_every_button() {
        assert_eq!(visible_buttons(1920), ToolbarButton::iter().collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(visible_buttons(520).len(), 6);
        assert_eq!(visible_buttons(521).len(), 7);
        assert_eq!(visible_buttons(371), &[Camera, Microphone, Chat, Participants]);
    }

    #[test]
    fn narrow_clients_keep_camera_and_microphone() {
        assert_eq!(visible_buttons(0), &[Camera, Microphone]);
        assert_eq!(visible_buttons(300), &[Camera, Microphone]);
    }
}
