//! Reading-mode rendering of a story.
//!
//! Everything here is a pure function of the story and the reader's scroll
//! position. Nothing computed in this module is persisted.

mod reveal;

pub use reveal::{RevealStyle, RevealTracker};

use serde::Serialize;

use crate::models::{BlockKind, BlockStyles, Story, Theme};

/// Header height with no scroll, in pixels.
pub const HEADER_MAX_HEIGHT: f64 = 600.0;
/// The header never shrinks below this height.
pub const HEADER_MIN_HEIGHT: f64 = 100.0;
/// Pixels of header lost per pixel scrolled.
pub const HEADER_SHRINK_RATE: f64 = 0.8;
/// Scroll offset at which the title overlay is fully transparent.
pub const OVERLAY_FADE_DISTANCE: f64 = 400.0;
/// Scroll offset at which the title overlay reaches its minimum scale.
pub const OVERLAY_SCALE_DISTANCE: f64 = 1000.0;
pub const OVERLAY_MIN_SCALE: f64 = 0.8;
pub const BACKGROUND_PARALLAX_RATE: f64 = 0.3;
pub const TITLE_PARALLAX_RATE: f64 = 0.5;
/// How far the content column slides over a parallax header.
pub const CONTENT_OVERLAP: f64 = 60.0;

/// Background and foreground colors of a reading theme.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: "#ffffff",
            foreground: "#1c1917",
        },
        Theme::Dark => Palette {
            background: "#0b0d10",
            foreground: "#e8e2d0",
        },
        Theme::Sepia => Palette {
            background: "#f4ecd8",
            foreground: "#5b4636",
        },
    }
}

/// Scroll-driven values of a parallax header.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParallaxFrame {
    pub height: f64,
    pub overlay_opacity: f64,
    pub overlay_scale: f64,
    pub background_offset: f64,
    pub title_offset: f64,
}

impl ParallaxFrame {
    /// Header transform at vertical scroll offset `scroll_y` (pixels).
    pub fn at(scroll_y: f64) -> Self {
        let y = if scroll_y.is_finite() { scroll_y.max(0.0) } else { 0.0 };

        Self {
            height: (HEADER_MAX_HEIGHT - y * HEADER_SHRINK_RATE).max(HEADER_MIN_HEIGHT),
            overlay_opacity: (1.0 - y / OVERLAY_FADE_DISTANCE).max(0.0),
            overlay_scale: (1.0 - y / OVERLAY_SCALE_DISTANCE).max(OVERLAY_MIN_SCALE),
            background_offset: y * BACKGROUND_PARALLAX_RATE,
            title_offset: y * TITLE_PARALLAX_RATE,
        }
    }
}

/// Story header as rendered.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HeaderView {
    #[serde(rename_all = "camelCase")]
    Parallax {
        cover_image: String,
        frame: ParallaxFrame,
        content_overlap: f64,
    },
    Static,
}

/// One block as rendered.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RenderedBlock {
    Text {
        id: String,
        html: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        styles: Option<BlockStyles>,
    },
    Image {
        id: String,
        src: String,
        reveal: RevealStyle,
    },
}

/// Complete reading surface of a story.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingView {
    pub story_id: String,
    pub title: String,
    pub summary: String,
    pub author: String,
    pub created_at: i64,
    pub theme: Theme,
    pub palette: Palette,
    pub header: HeaderView,
    pub blocks: Vec<RenderedBlock>,
}

/// Render `story` at `scroll_y`, with image reveal state taken from `reveals`.
pub fn render(story: &Story, scroll_y: f64, reveals: &RevealTracker) -> ReadingView {
    let settings = story.settings;

    let header = if settings.parallax_header {
        HeaderView::Parallax {
            cover_image: story.cover_image.clone(),
            frame: ParallaxFrame::at(scroll_y),
            content_overlap: CONTENT_OVERLAP,
        }
    } else {
        HeaderView::Static
    };

    let blocks = story
        .blocks
        .iter()
        .map(|block| match block.kind {
            BlockKind::Text => RenderedBlock::Text {
                id: block.id.clone(),
                html: block.content.clone(),
                styles: block.styles.clone(),
            },
            BlockKind::Image => RenderedBlock::Image {
                id: block.id.clone(),
                src: block.content.clone(),
                reveal: reveals.get(&block.id).style(),
            },
        })
        .collect();

    ReadingView {
        story_id: story.id.clone(),
        title: story.title.clone(),
        summary: story.summary.clone(),
        author: story.author.clone(),
        created_at: story.created_at,
        theme: settings.theme,
        palette: palette(settings.theme),
        header,
        blocks,
    }
}
