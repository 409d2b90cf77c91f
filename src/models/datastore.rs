//! Full snapshot of every collection.

use serde::{Deserialize, Serialize};

use super::{City, LibraryPageConfig, NewsPost, Story};

/// The root datastore containing all application data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Datastore {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub stories: Vec<Story>,
    pub news: Vec<NewsPost>,
    pub cities: Vec<City>,
    pub library_config: LibraryPageConfig,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
