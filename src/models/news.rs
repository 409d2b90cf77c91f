//! News post model.

use serde::{Deserialize, Serialize};

/// Author recorded on a news post when no current user is known.
pub const DEFAULT_NEWS_AUTHOR: &str = "Admin";

/// A flat news post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsPost {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub banner_image: String,
    /// HTML body.
    #[serde(default)]
    pub content: String,
    /// Publication time in epoch milliseconds.
    pub date: i64,
    pub author: String,
}

/// Request body for creating or replacing a news post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveNewsRequest {
    pub title: String,
    #[serde(default)]
    pub banner_image: String,
    #[serde(default)]
    pub content: String,
}
