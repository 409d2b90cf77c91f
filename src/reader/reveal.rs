//! One-way fade-in of image blocks.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{BlockKind, Story};

/// Fraction of an image that must be on screen before it is revealed.
pub const REVEAL_THRESHOLD: f64 = 0.2;

/// Downward offset of a hidden image, in pixels.
const HIDDEN_OFFSET: f64 = 40.0;

/// Presentation of an image block.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RevealStyle {
    pub visible: bool,
    pub opacity: f64,
    pub translate_y: f64,
}

/// Visibility of a single image. Once visible it stays visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageReveal {
    visible: bool,
}

impl ImageReveal {
    /// Images start hidden only when the fade effect is enabled.
    pub fn new(fade_enabled: bool) -> Self {
        Self {
            visible: !fade_enabled,
        }
    }

    /// Record an intersection observation. `visible_ratio` is the fraction of
    /// the image inside the viewport. Returns true when this call revealed it.
    pub fn observe(&mut self, visible_ratio: f64) -> bool {
        if self.visible || visible_ratio.is_nan() || visible_ratio < REVEAL_THRESHOLD {
            return false;
        }
        self.visible = true;
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn style(&self) -> RevealStyle {
        if self.is_visible() {
            RevealStyle {
                visible: true,
                opacity: 1.0,
                translate_y: 0.0,
            }
        } else {
            RevealStyle {
                visible: false,
                opacity: 0.0,
                translate_y: HIDDEN_OFFSET,
            }
        }
    }
}

/// Reveal state of every image block of one story, keyed by block id.
#[derive(Debug, Clone)]
pub struct RevealTracker {
    fade_enabled: bool,
    images: HashMap<String, ImageReveal>,
}

impl RevealTracker {
    pub fn for_story(story: &Story) -> Self {
        let fade_enabled = story.settings.fade_images_on_scroll;
        let images = story
            .blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Image)
            .map(|b| (b.id.clone(), ImageReveal::new(fade_enabled)))
            .collect();

        Self {
            fade_enabled,
            images,
        }
    }

    /// Feed an observation for the image with `block_id`. Unknown ids are ignored.
    pub fn observe(&mut self, block_id: &str, visible_ratio: f64) -> bool {
        self.images
            .get_mut(block_id)
            .map(|reveal| reveal.observe(visible_ratio))
            .unwrap_or(false)
    }

    pub fn get(&self, block_id: &str) -> ImageReveal {
        self.images
            .get(block_id)
            .copied()
            .unwrap_or_else(|| ImageReveal::new(self.fade_enabled))
    }
}
