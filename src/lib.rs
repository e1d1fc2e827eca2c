use serde::{Deserialize, Serialize};

pub mod journey;
pub mod layout;
pub mod render;
pub mod utils;

pub use journey::*;
pub use layout::*;
pub use render::*;
pub use utils::*;

pub const LAYOUT_MARGIN: f32 = 80.0;
pub const ANCHOR_SPAN: f32 = 192.0;
pub const TRAILING_PAD: f32 = 96.0;
pub const AXIS_WIDTH: f32 = 3.0;
pub const STEM_WIDTH: f32 = 2.0;
pub const LEADER_WIDTH: f32 = 2.0;
pub const EMOTION_DOT_RADIUS: f32 = 20.0;
pub const EMOTION_LABEL_GAP: f32 = 28.0;
pub const SUB_AXIS_DOT_RADIUS: f32 = 4.0;
pub const CARD_WIDTH: f32 = 192.0;
pub const CARD_HEIGHT: f32 = 56.0;
pub const CARD_LEADER_H: f32 = 30.0;
pub const CARD_LEADER_V: f32 = 20.0;
pub const CARD_ROW_INSET: f32 = 96.0;
pub const CARD_OVERLAP_H: f32 = 96.0;
pub const CARD_GAP_V: f32 = 24.0;
pub const CARD_STACK_INSET: f32 = 64.0;
pub const STAGE_SPAN_H: f32 = 320.0;
pub const STAGE_SPAN_V: f32 = 220.0;
pub const STAGE_COMPACTION_H: f32 = 160.0;
pub const STAGE_COMPACTION_V: f32 = 96.0;
pub const STEM_LENGTH_H: f32 = 140.0;
pub const STEM_LENGTH_V: f32 = 100.0;
pub const STAGE_BREADTH_H: f32 = 600.0;
pub const STAGE_BREADTH_V: f32 = 600.0;
pub const DOT_INSET_H: f32 = 48.0;
pub const DOT_INSET_V: f32 = 48.0;
pub const END_PULL_H: f32 = 80.0;
pub const END_PULL_V: f32 = 48.0;
pub const AVATAR_RADIUS: f32 = 40.0;
pub const STATUS_DISC_RADIUS: f32 = 32.0;
pub const TITLE_LINE_HEIGHT: f32 = 16.0;
pub const CARD_TEXT_LINE_HEIGHT: f32 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Horizontal,
    Vertical,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Horizontal
    }
}

impl Mode {
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Horizontal => Mode::Vertical,
            Mode::Vertical => Mode::Horizontal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Horizontal => "horizontal",
            Mode::Vertical => "vertical",
        }
    }

    pub fn metrics(self) -> LayoutMetrics {
        match self {
            Mode::Horizontal => LayoutMetrics {
                stage_span: STAGE_SPAN_H,
                stage_breadth: STAGE_BREADTH_H,
                compaction: STAGE_COMPACTION_H,
                stem_length: STEM_LENGTH_H,
                dot_inset: DOT_INSET_H,
                card_leader: CARD_LEADER_H,
                end_pull: END_PULL_H,
            },
            Mode::Vertical => LayoutMetrics {
                stage_span: STAGE_SPAN_V,
                stage_breadth: STAGE_BREADTH_V,
                compaction: STAGE_COMPACTION_V,
                stem_length: STEM_LENGTH_V,
                dot_inset: DOT_INSET_V,
                card_leader: CARD_LEADER_V,
                end_pull: END_PULL_V,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutMetrics {
    pub stage_span: f32,
    pub stage_breadth: f32,
    pub compaction: f32,
    pub stem_length: f32,
    pub dot_inset: f32,
    pub card_leader: f32,
    pub end_pull: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MapView {
    mode: Mode,
}

impl MapView {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        self.mode
    }
}
