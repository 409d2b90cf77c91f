//! Story model: an ordered sequence of content blocks plus display settings.

use serde::{Deserialize, Serialize};

/// Cover used when a story has no custom cover image.
pub const DEFAULT_COVER: &str =
    "https://images.unsplash.com/photo-1519681393784-d120267933ba?auto=format&fit=crop&w=1600&q=80";

/// Author recorded on a story when no current user is known.
pub const DEFAULT_AUTHOR: &str = "Autor";

/// Reading theme palette selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    Sepia,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::Sepia => "sepia",
        }
    }
}

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Kind of content a block carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Image,
}

/// Per-block style attributes. A missing field inherits the reader default.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
}

/// One unit of story content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// Paragraph HTML for text blocks, URL or data URI for image blocks.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
}

impl Block {
    pub fn is_text(&self) -> bool {
        self.kind == BlockKind::Text
    }
}

/// Presentation settings chosen by the author.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StorySettings {
    pub parallax_header: bool,
    pub fade_images_on_scroll: bool,
    pub theme: Theme,
}

impl Default for StorySettings {
    fn default() -> Self {
        Self {
            parallax_header: true,
            fade_images_on_scroll: true,
            theme: Theme::Dark,
        }
    }
}

/// A complete narrative document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub cover_image: String,
    pub author: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub settings: StorySettings,
    #[serde(default)]
    pub is_published: bool,
}

impl Story {
    /// A fresh, unpublished story with the editor defaults.
    pub fn draft(id: String, author: Option<&str>, created_at: i64) -> Self {
        Self {
            id,
            title: String::new(),
            summary: String::new(),
            cover_image: DEFAULT_COVER.to_string(),
            author: author
                .filter(|a| !a.trim().is_empty())
                .unwrap_or(DEFAULT_AUTHOR)
                .to_string(),
            created_at,
            blocks: Vec::new(),
            settings: StorySettings::default(),
            is_published: false,
        }
    }

    pub fn has_custom_cover(&self) -> bool {
        !self.cover_image.is_empty() && self.cover_image != DEFAULT_COVER
    }
}

/// Compact story projection used by listings.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoryCard {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub cover_image: String,
    pub author: String,
    pub created_at: i64,
    pub is_published: bool,
}

impl From<&Story> for StoryCard {
    fn from(story: &Story) -> Self {
        let cover_image = if story.cover_image.is_empty() {
            DEFAULT_COVER.to_string()
        } else {
            story.cover_image.clone()
        };

        Self {
            id: story.id.clone(),
            title: story.title.clone(),
            summary: story.summary.clone(),
            cover_image,
            author: story.author.clone(),
            created_at: story.created_at,
            is_published: story.is_published,
        }
    }
}

/// Partial style update merged field by field into a text block.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockStylesPatch {
    #[serde(default)]
    pub font_size: Option<String>,
    #[serde(default)]
    pub font_style: Option<String>,
    #[serde(default)]
    pub font_weight: Option<String>,
    #[serde(default)]
    pub text_align: Option<TextAlign>,
}

/// Request body for updating a single block.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
    /// Plain text for text blocks, URL for image blocks.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub styles: Option<BlockStylesPatch>,
}

/// Partial settings update.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default)]
    pub parallax_header: Option<bool>,
    #[serde(default)]
    pub fade_images_on_scroll: Option<bool>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

/// Story-level metadata edits.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StoryPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub settings: Option<SettingsPatch>,
}

/// Request body for creating a new story.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoryRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// Request body for appending an image block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddImageBlockRequest {
    pub content: String,
}

/// Request body for moving a block one step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBlockRequest {
    pub index: usize,
    /// -1 moves towards the start, +1 towards the end.
    pub direction: i8,
}
