//! Block editor for a single story.
//!
//! An [`EditorSession`] owns a story while an author edits it. Block
//! operations never fail: unknown ids and impossible moves leave the story
//! untouched. Only saving can fail, when an upload is still in flight.

mod markup;

use std::collections::HashSet;

use markup::{canonical_text, strip_markup};

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{
    Block, BlockKind, BlockPatch, BlockStyles, BlockStylesPatch, Story, StoryPatch, TextAlign,
    DEFAULT_COVER,
};

/// Content of a freshly added text block.
pub const PLACEHOLDER_TEXT: &str = "<p>Comece a escrever aqui...</p>";

/// Font size given to new text blocks.
pub const BASE_FONT_SIZE: &str = "1.125rem";

/// One-step move of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl TryFrom<i8> for MoveDirection {
    type Error = AppError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(MoveDirection::Up),
            1 => Ok(MoveDirection::Down),
            other => Err(AppError::Validation(format!(
                "Direction must be -1 or 1, got {}",
                other
            ))),
        }
    }
}

/// Where a finished upload gets attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadTarget {
    Cover,
    Block,
}

fn new_block_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Editing state of one story.
#[derive(Debug, Clone)]
pub struct EditorSession {
    story: Story,
    active_block_id: Option<String>,
    uploading: bool,
}

impl EditorSession {
    /// Load a story for editing. Text blocks are brought to canonical form
    /// and image blocks lose any style attributes.
    pub fn open(mut story: Story) -> Self {
        for block in story.blocks.iter_mut() {
            match block.kind {
                BlockKind::Text => block.content = canonical_text(&block.content),
                BlockKind::Image => block.styles = None,
            }
        }

        Self {
            story,
            active_block_id: None,
            uploading: false,
        }
    }

    pub fn story(&self) -> &Story {
        &self.story
    }

    pub fn blocks(&self) -> &[Block] {
        &self.story.blocks
    }

    pub fn active_block_id(&self) -> Option<&str> {
        self.active_block_id.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Append a placeholder paragraph and make it the active block.
    pub fn add_text_block(&mut self) -> &Block {
        let block = Block {
            id: new_block_id(),
            kind: BlockKind::Text,
            content: PLACEHOLDER_TEXT.to_string(),
            styles: Some(BlockStyles {
                font_size: Some(BASE_FONT_SIZE.to_string()),
                text_align: Some(TextAlign::Left),
                ..Default::default()
            }),
        };
        self.active_block_id = Some(block.id.clone());
        self.push(block)
    }

    /// Append an image block referencing `content`.
    pub fn add_image_block(&mut self, content: String) -> &Block {
        let block = Block {
            id: new_block_id(),
            kind: BlockKind::Image,
            content,
            styles: None,
        };
        self.push(block)
    }

    fn push(&mut self, block: Block) -> &Block {
        self.story.blocks.push(block);
        let last = self.story.blocks.len() - 1;
        &self.story.blocks[last]
    }

    /// Merge a patch into the block with `id`. Returns false when no block matched.
    pub fn update_block(&mut self, id: &str, patch: BlockPatch) -> bool {
        let Some(block) = self.story.blocks.iter_mut().find(|b| b.id == id) else {
            return false;
        };

        match block.kind {
            BlockKind::Text => {
                if let Some(text) = patch.content {
                    block.content = canonical_text(&text);
                }
                if let Some(styles) = patch.styles {
                    merge_styles(block.styles.get_or_insert_with(Default::default), styles);
                }
            }
            BlockKind::Image => {
                if let Some(url) = patch.content {
                    block.content = url;
                }
            }
        }

        true
    }

    /// Remove the block with `id`. Returns false when no block matched.
    pub fn delete_block(&mut self, id: &str) -> bool {
        let before = self.story.blocks.len();
        self.story.blocks.retain(|b| b.id != id);

        if self.active_block_id.as_deref() == Some(id) {
            self.active_block_id = None;
        }

        self.story.blocks.len() != before
    }

    /// Swap the block at `index` with its neighbour. Returns false for
    /// first-up, last-down and out-of-range moves.
    pub fn move_block(&mut self, index: usize, direction: MoveDirection) -> bool {
        let len = self.story.blocks.len();
        if index >= len {
            return false;
        }

        let target = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < len => index + 1,
            _ => return false,
        };

        self.story.blocks.swap(index, target);
        true
    }

    /// Apply story-level metadata edits.
    pub fn apply(&mut self, patch: StoryPatch) {
        if let Some(title) = patch.title {
            self.story.title = title;
        }
        if let Some(summary) = patch.summary {
            self.story.summary = summary;
        }
        if let Some(cover) = patch.cover_image {
            self.story.cover_image = if cover.trim().is_empty() {
                DEFAULT_COVER.to_string()
            } else {
                cover
            };
        }
        if let Some(published) = patch.is_published {
            self.story.is_published = published;
        }
        if let Some(settings) = patch.settings {
            let current = &mut self.story.settings;
            if let Some(parallax) = settings.parallax_header {
                current.parallax_header = parallax;
            }
            if let Some(fade) = settings.fade_images_on_scroll {
                current.fade_images_on_scroll = fade;
            }
            if let Some(theme) = settings.theme {
                current.theme = theme;
            }
        }
    }

    pub fn remove_cover(&mut self) {
        self.story.cover_image = DEFAULT_COVER.to_string();
    }

    /// Plain text of a text block as shown in the authoring surface.
    pub fn editable_text(&self, id: &str) -> Option<String> {
        self.story
            .blocks
            .iter()
            .find(|b| b.id == id && b.is_text())
            .map(|b| strip_markup(&b.content))
    }

    pub fn begin_upload(&mut self) {
        self.uploading = true;
    }

    /// Finish an upload. A successful URL is attached to `target`; a failure
    /// leaves the story as it was and is handed back to the caller.
    pub fn finish_upload(
        &mut self,
        target: UploadTarget,
        result: Result<String, AppError>,
    ) -> Result<(), AppError> {
        self.uploading = false;
        let url = result?;

        match target {
            UploadTarget::Cover => self.story.cover_image = url,
            UploadTarget::Block => {
                self.add_image_block(url);
            }
        }
        Ok(())
    }

    /// Hand back the story to persist.
    pub fn save(self) -> Result<Story, AppError> {
        if self.is_uploading() {
            return Err(AppError::Validation(
                "Aguarde o envio da imagem terminar antes de salvar.".to_string(),
            ));
        }
        Ok(self.story)
    }
}

/// Reject a block list in which two blocks share an id.
pub fn ensure_unique_block_ids(blocks: &[Block]) -> Result<(), AppError> {
    let mut seen = HashSet::with_capacity(blocks.len());
    for block in blocks {
        if !seen.insert(block.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Duplicate block id {}",
                block.id
            )));
        }
    }
    Ok(())
}

fn merge_styles(styles: &mut BlockStyles, patch: BlockStylesPatch) {
    if let Some(size) = patch.font_size {
        styles.font_size = Some(size);
    }
    if let Some(style) = patch.font_style {
        styles.font_style = Some(style);
    }
    if let Some(weight) = patch.font_weight {
        styles.font_weight = Some(weight);
    }
    if let Some(align) = patch.text_align {
        styles.text_align = Some(align);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SettingsPatch, Theme};

    fn session() -> EditorSession {
        EditorSession::open(Story::draft("s1".to_string(), Some("ana@atlas.io"), 100))
    }

    fn ids(session: &EditorSession) -> Vec<String> {
        session.blocks().iter().map(|b| b.id.clone()).collect()
    }

    #[test]
    fn test_add_text_block_defaults() {
        let mut editor = session();
        let block = editor.add_text_block().clone();

        assert_eq!(block.kind, BlockKind::Text);
        assert_eq!(block.content, PLACEHOLDER_TEXT);
        let styles = block.styles.unwrap();
        assert_eq!(styles.text_align, Some(TextAlign::Left));
        assert_eq!(styles.font_size.as_deref(), Some(BASE_FONT_SIZE));
        assert_eq!(editor.active_block_id(), Some(block.id.as_str()));
    }

    #[test]
    fn test_add_image_block_has_no_styles() {
        let mut editor = session();
        editor.add_text_block();
        let image = editor.add_image_block("https://img/a.png".to_string()).clone();

        assert_eq!(editor.blocks().len(), 2);
        assert_eq!(editor.blocks()[1].id, image.id);
        assert!(image.styles.is_none());
        assert_ne!(editor.active_block_id(), Some(image.id.as_str()));
    }

    #[test]
    fn test_operation_sequence_applies_left_to_right() {
        let mut editor = session();
        let a = editor.add_text_block().id.clone();
        let b = editor.add_image_block("b.png".to_string()).id.clone();
        let c = editor.add_text_block().id.clone();
        let d = editor.add_image_block("d.png".to_string()).id.clone();

        assert!(editor.move_block(3, MoveDirection::Up));
        assert_eq!(ids(&editor), vec![a.clone(), b.clone(), d.clone(), c.clone()]);

        assert!(editor.delete_block(&b));
        assert_eq!(ids(&editor), vec![a.clone(), d.clone(), c.clone()]);

        assert!(editor.move_block(0, MoveDirection::Down));
        assert_eq!(ids(&editor), vec![d.clone(), a.clone(), c.clone()]);

        let e = editor.add_text_block().id.clone();
        assert_eq!(ids(&editor), vec![d, a, c, e]);
    }

    #[test]
    fn test_boundary_moves_are_noops() {
        let mut editor = session();
        editor.add_text_block();
        editor.add_image_block("x.png".to_string());
        let before = editor.blocks().to_vec();

        assert!(!editor.move_block(0, MoveDirection::Up));
        assert!(!editor.move_block(1, MoveDirection::Down));
        assert!(!editor.move_block(7, MoveDirection::Up));
        assert_eq!(editor.blocks(), before.as_slice());
    }

    #[test]
    fn test_move_on_empty_story_is_noop() {
        let mut editor = session();
        assert!(!editor.move_block(0, MoveDirection::Down));
        assert!(editor.blocks().is_empty());
    }

    #[test]
    fn test_update_merges_styles_and_canonicalizes_text() {
        let mut editor = session();
        let id = editor.add_text_block().id.clone();
        let other = editor.add_text_block().id.clone();

        let updated = editor.update_block(
            &id,
            BlockPatch {
                content: Some("Era uma <b>vez</b>".to_string()),
                styles: Some(BlockStylesPatch {
                    text_align: Some(TextAlign::Center),
                    font_weight: Some("700".to_string()),
                    ..Default::default()
                }),
            },
        );
        assert!(updated);

        let block = &editor.blocks()[0];
        assert_eq!(block.content, "<p>Era uma vez</p>");
        let styles = block.styles.as_ref().unwrap();
        assert_eq!(styles.text_align, Some(TextAlign::Center));
        assert_eq!(styles.font_weight.as_deref(), Some("700"));
        assert_eq!(styles.font_size.as_deref(), Some(BASE_FONT_SIZE));

        assert_eq!(editor.blocks()[1].id, other);
        assert_eq!(editor.blocks()[1].content, PLACEHOLDER_TEXT);
    }

    #[test]
    fn test_update_image_ignores_styles() {
        let mut editor = session();
        let id = editor.add_image_block("old.png".to_string()).id.clone();

        editor.update_block(
            &id,
            BlockPatch {
                content: Some("new.png".to_string()),
                styles: Some(BlockStylesPatch {
                    font_size: Some("2rem".to_string()),
                    ..Default::default()
                }),
            },
        );

        assert_eq!(editor.blocks()[0].content, "new.png");
        assert!(editor.blocks()[0].styles.is_none());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut editor = session();
        editor.add_text_block();
        let before = editor.blocks().to_vec();

        assert!(!editor.update_block("missing", BlockPatch::default()));
        assert!(!editor.delete_block("missing"));
        assert_eq!(editor.blocks(), before.as_slice());
    }

    #[test]
    fn test_deleting_active_block_clears_selection() {
        let mut editor = session();
        let id = editor.add_text_block().id.clone();
        assert!(editor.delete_block(&id));
        assert!(editor.active_block_id().is_none());
    }

    #[test]
    fn test_open_and_save_is_lossy_for_markup() {
        let mut story = Story::draft("s1".to_string(), None, 1);
        story.blocks.push(Block {
            id: "t".to_string(),
            kind: BlockKind::Text,
            content: "<b>Hi</b> there".to_string(),
            styles: None,
        });
        story.blocks.push(Block {
            id: "i".to_string(),
            kind: BlockKind::Image,
            content: "<not-markup>.png".to_string(),
            styles: None,
        });

        let saved = EditorSession::open(story).save().unwrap();
        assert_eq!(saved.blocks[0].content, "<p>Hi there</p>");
        assert_eq!(saved.blocks[1].content, "<not-markup>.png");
    }

    #[test]
    fn test_open_drops_image_styles() {
        let mut story = Story::draft("s1".to_string(), None, 1);
        story.blocks.push(Block {
            id: "i".to_string(),
            kind: BlockKind::Image,
            content: "a.png".to_string(),
            styles: Some(BlockStyles {
                font_weight: Some("bold".to_string()),
                ..Default::default()
            }),
        });

        let saved = EditorSession::open(story).save().unwrap();
        assert!(saved.blocks[0].styles.is_none());
    }

    #[test]
    fn test_duplicate_block_ids_rejected() {
        let block = |id: &str| Block {
            id: id.to_string(),
            kind: BlockKind::Text,
            content: String::new(),
            styles: None,
        };

        assert!(ensure_unique_block_ids(&[block("a"), block("b")]).is_ok());
        assert!(ensure_unique_block_ids(&[]).is_ok());
        let err = ensure_unique_block_ids(&[block("a"), block("b"), block("a")]).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_editable_text() {
        let mut editor = session();
        let text = editor.add_text_block().id.clone();
        let image = editor.add_image_block("a.png".to_string()).id.clone();

        assert_eq!(
            editor.editable_text(&text).as_deref(),
            Some("Comece a escrever aqui...")
        );
        assert!(editor.editable_text(&image).is_none());
    }

    #[test]
    fn test_apply_story_patch() {
        let mut editor = session();
        editor.apply(StoryPatch {
            title: Some("O Covil do Dragão".to_string()),
            is_published: Some(true),
            cover_image: Some("cover.png".to_string()),
            settings: Some(SettingsPatch {
                theme: Some(Theme::Sepia),
                ..Default::default()
            }),
            ..Default::default()
        });

        let story = editor.story();
        assert_eq!(story.title, "O Covil do Dragão");
        assert!(story.is_published);
        assert!(story.has_custom_cover());
        assert_eq!(story.settings.theme, Theme::Sepia);
        assert!(story.settings.parallax_header);

        editor.remove_cover();
        assert!(!editor.story().has_custom_cover());
    }

    #[test]
    fn test_save_blocked_while_uploading() {
        let mut editor = session();
        editor.begin_upload();
        assert!(editor.clone().save().is_err());

        editor
            .finish_upload(UploadTarget::Block, Ok("/uploads/ab/cd/abcd.png".to_string()))
            .unwrap();
        assert!(!editor.is_uploading());
        let story = editor.save().unwrap();
        assert_eq!(story.blocks.len(), 1);
        assert_eq!(story.blocks[0].kind, BlockKind::Image);
    }

    #[test]
    fn test_failed_upload_leaves_story_untouched() {
        let mut editor = session();
        editor.begin_upload();
        let result = editor.finish_upload(
            UploadTarget::Cover,
            Err(AppError::Upload("disk full".to_string())),
        );

        assert!(result.is_err());
        assert!(!editor.is_uploading());
        assert_eq!(editor.story().cover_image, DEFAULT_COVER);
    }

    #[test]
    fn test_direction_from_i8() {
        assert_eq!(MoveDirection::try_from(-1).unwrap(), MoveDirection::Up);
        assert_eq!(MoveDirection::try_from(1).unwrap(), MoveDirection::Down);
        assert!(MoveDirection::try_from(0).is_err());
        assert!(MoveDirection::try_from(2).is_err());
    }
}
