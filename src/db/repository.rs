//! Database repository for document reads and full-document writes.
//!
//! Writes replace the whole stored document; there is no version check and
//! the last writer wins. Every successful write bumps the revision and
//! publishes a [`ChangeEvent`].

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tokio::sync::broadcast;

use super::{ChangeEvent, ChangeFeed, Collection};
use crate::errors::AppError;
use crate::models::{
    City, Datastore, LibraryPageConfig, LibraryPageConfigPatch, NewsPost, RevisionInfo, Story,
    LIBRARY_CONFIG_ID,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    feed: ChangeFeed,
}

fn decode<T: DeserializeOwned>(row: &SqliteRow) -> Result<T, AppError> {
    let body: String = row.try_get("body")?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Corrupt stored document: {:?}", e);
        AppError::Database(format!("Corrupt stored document: {}", e))
    })
}

fn encode<T: Serialize>(doc: &T) -> Result<String, AppError> {
    serde_json::to_string(doc).map_err(|e| AppError::Internal(format!("Encode failed: {}", e)))
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::new(),
        }
    }

    /// Listen for collection changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Record a committed write and notify listeners.
    async fn committed(&self, collection: Collection) -> Result<i64, AppError> {
        let revision_id = self.increment_revision().await?;
        self.feed.publish(ChangeEvent {
            collection,
            revision_id,
        });
        Ok(revision_id)
    }

    async fn delete_document(
        &self,
        collection: Collection,
        label: &str,
        id: &str,
    ) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", collection.as_str());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("{} {} not found", label, id)));
        }

        self.committed(collection).await?;
        Ok(())
    }

    /// Get the full datastore.
    pub async fn get_datastore(&self) -> Result<Datastore, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        Ok(Datastore {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            stories: self.list_stories().await?,
            news: self.list_news().await?,
            cities: self.list_cities().await?,
            library_config: self.get_library_config().await?,
        })
    }

    // ==================== STORY OPERATIONS ====================

    /// List all stories, newest first.
    pub async fn list_stories(&self) -> Result<Vec<Story>, AppError> {
        let rows = sqlx::query("SELECT body FROM stories ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode).collect()
    }

    /// List published stories, newest first.
    pub async fn list_published_stories(&self) -> Result<Vec<Story>, AppError> {
        let rows = sqlx::query(
            "SELECT body FROM stories WHERE is_published = 1 ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode).collect()
    }

    /// Get a story by ID.
    pub async fn get_story(&self, id: &str) -> Result<Option<Story>, AppError> {
        let row = sqlx::query("SELECT body FROM stories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode).transpose()
    }

    /// Write a story, replacing any stored document with the same id.
    pub async fn save_story(&self, story: &Story) -> Result<(), AppError> {
        let body = encode(story)?;

        sqlx::query(
            r#"INSERT INTO stories (id, created_at, is_published, body) VALUES (?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   created_at = excluded.created_at,
                   is_published = excluded.is_published,
                   body = excluded.body"#,
        )
        .bind(&story.id)
        .bind(story.created_at)
        .bind(story.is_published as i32)
        .bind(&body)
        .execute(&self.pool)
        .await?;

        self.committed(Collection::Stories).await?;
        tracing::debug!(story_id = %story.id, blocks = story.blocks.len(), "story saved");
        Ok(())
    }

    /// Delete a story.
    pub async fn delete_story(&self, id: &str) -> Result<(), AppError> {
        self.delete_document(Collection::Stories, "Story", id).await
    }

    // ==================== NEWS OPERATIONS ====================

    /// List all news posts, newest first.
    pub async fn list_news(&self) -> Result<Vec<NewsPost>, AppError> {
        let rows = sqlx::query("SELECT body FROM news ORDER BY date DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode).collect()
    }

    /// Get a news post by ID.
    pub async fn get_news(&self, id: &str) -> Result<Option<NewsPost>, AppError> {
        let row = sqlx::query("SELECT body FROM news WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode).transpose()
    }

    /// Write a news post, replacing any stored document with the same id.
    pub async fn save_news(&self, post: &NewsPost) -> Result<(), AppError> {
        let body = encode(post)?;

        sqlx::query(
            r#"INSERT INTO news (id, date, body) VALUES (?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET date = excluded.date, body = excluded.body"#,
        )
        .bind(&post.id)
        .bind(post.date)
        .bind(&body)
        .execute(&self.pool)
        .await?;

        self.committed(Collection::News).await?;
        Ok(())
    }

    /// Delete a news post.
    pub async fn delete_news(&self, id: &str) -> Result<(), AppError> {
        self.delete_document(Collection::News, "News post", id).await
    }

    // ==================== CITY OPERATIONS ====================

    /// List all cities.
    pub async fn list_cities(&self) -> Result<Vec<City>, AppError> {
        let rows = sqlx::query("SELECT body FROM cities ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode).collect()
    }

    /// Get a city by ID.
    pub async fn get_city(&self, id: &str) -> Result<Option<City>, AppError> {
        let row = sqlx::query("SELECT body FROM cities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode).transpose()
    }

    /// Write a city, replacing any stored document with the same id.
    pub async fn save_city(&self, city: &City) -> Result<(), AppError> {
        let body = encode(city)?;

        sqlx::query(
            r#"INSERT INTO cities (id, name, body) VALUES (?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET name = excluded.name, body = excluded.body"#,
        )
        .bind(&city.id)
        .bind(&city.name)
        .bind(&body)
        .execute(&self.pool)
        .await?;

        self.committed(Collection::Cities).await?;
        Ok(())
    }

    /// Delete a city.
    pub async fn delete_city(&self, id: &str) -> Result<(), AppError> {
        self.delete_document(Collection::Cities, "City", id).await
    }

    // ==================== PAGE CONFIG OPERATIONS ====================

    /// Get the library page configuration, or defaults when never written.
    pub async fn get_library_config(&self) -> Result<LibraryPageConfig, AppError> {
        let row = sqlx::query("SELECT body FROM pages WHERE id = ?")
            .bind(LIBRARY_CONFIG_ID)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => decode(&row),
            None => {
                tracing::debug!("No library config stored, using defaults");
                Ok(LibraryPageConfig::default())
            }
        }
    }

    /// Merge `patch` into the stored library configuration.
    pub async fn merge_library_config(
        &self,
        patch: LibraryPageConfigPatch,
    ) -> Result<LibraryPageConfig, AppError> {
        let mut config = self.get_library_config().await?;
        config.merge(patch);
        let body = encode(&config)?;

        sqlx::query(
            r#"INSERT INTO pages (id, body) VALUES (?, ?)
               ON CONFLICT(id) DO UPDATE SET body = excluded.body"#,
        )
        .bind(LIBRARY_CONFIG_ID)
        .bind(&body)
        .execute(&self.pool)
        .await?;

        self.committed(Collection::Pages).await?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use crate::models::{Block, BlockKind};
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    fn story(id: &str, created_at: i64, is_published: bool) -> Story {
        let mut story = Story::draft(id.to_string(), Some("ana"), created_at);
        story.is_published = is_published;
        story
    }

    #[tokio::test]
    async fn test_empty_blocks_round_trip() {
        let (repo, _dir) = repo().await;
        let saved = story("s1", 100, true);
        repo.save_story(&saved).await.unwrap();

        let loaded = repo.get_story("s1").await.unwrap().unwrap();
        assert!(loaded.blocks.is_empty());
        assert_eq!(loaded, saved);
    }

    #[tokio::test]
    async fn test_save_replaces_whole_document() {
        let (repo, _dir) = repo().await;
        let mut doc = story("s1", 100, false);
        doc.blocks.push(Block {
            id: "b".to_string(),
            kind: BlockKind::Image,
            content: "a.png".to_string(),
            styles: None,
        });
        doc.title = "Primeira".to_string();
        repo.save_story(&doc).await.unwrap();

        let replacement = story("s1", 100, true);
        repo.save_story(&replacement).await.unwrap();

        let loaded = repo.get_story("s1").await.unwrap().unwrap();
        assert_eq!(loaded.title, "");
        assert!(loaded.blocks.is_empty());
        assert_eq!(repo.list_stories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_published_query() {
        let (repo, _dir) = repo().await;
        repo.save_story(&story("a", 100, true)).await.unwrap();
        repo.save_story(&story("b", 200, false)).await.unwrap();
        repo.save_story(&story("c", 300, true)).await.unwrap();

        let published: Vec<String> = repo
            .list_published_stories()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(published, vec!["c", "a"]);

        let all: Vec<String> = repo
            .list_stories()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(all, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (repo, _dir) = repo().await;
        let err = repo.delete_city("nope").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_writes_publish_changes() {
        let (repo, _dir) = repo().await;
        let mut changes = repo.subscribe();
        let before = repo.get_revision_id().await.unwrap();

        let city = City {
            id: "c1".to_string(),
            name: "Aurora".to_string(),
            description: String::new(),
            image: String::new(),
        };
        repo.save_city(&city).await.unwrap();
        repo.delete_city("c1").await.unwrap();

        let first = changes.recv().await.unwrap();
        let second = changes.recv().await.unwrap();
        assert_eq!(first.collection, Collection::Cities);
        assert_eq!(first.revision_id, before + 1);
        assert_eq!(second.revision_id, before + 2);
        assert!(repo.list_cities().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_library_config_merge() {
        let (repo, _dir) = repo().await;
        assert_eq!(
            repo.get_library_config().await.unwrap(),
            LibraryPageConfig::default()
        );

        repo.merge_library_config(LibraryPageConfigPatch {
            hero_bg: Some("hero.png".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
        let config = repo
            .merge_library_config(LibraryPageConfigPatch {
                union_description: Some("A União".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(config.hero_bg.as_deref(), Some("hero.png"));
        assert_eq!(config.union_description.as_deref(), Some("A União"));
        assert_eq!(repo.get_library_config().await.unwrap(), config);
    }
}
