//! Listing and visibility rules over collection snapshots.
//!
//! These functions never touch the store; they take whatever snapshot the
//! caller holds and decide what each view shows and in which order.

mod world;

pub use world::{CityBrowser, WorldView};

use serde::Serialize;

use crate::models::{NewsPost, Story, StoryCard};

/// Number of "other stories" previewed on the library page.
pub const OTHER_STORIES_PREVIEW: usize = 4;

/// Library landing page content.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryOverview {
    pub latest: Option<StoryCard>,
    pub others: Vec<StoryCard>,
}

fn published(stories: &[Story]) -> impl Iterator<Item = &Story> {
    stories.iter().filter(|s| s.is_published)
}

fn newest_first(mut stories: Vec<&Story>) -> Vec<&Story> {
    stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    stories
}

/// Case-insensitive substring match against title or summary. A blank
/// query matches everything.
pub fn matches_query(story: &Story, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    story.title.to_lowercase().contains(&needle) || story.summary.to_lowercase().contains(&needle)
}

/// The published story with the greatest `createdAt`.
pub fn latest_story(stories: &[Story]) -> Option<&Story> {
    published(stories).max_by_key(|s| s.created_at)
}

/// Every published story except the latest, newest first.
pub fn other_stories(stories: &[Story]) -> Vec<&Story> {
    let latest_id = latest_story(stories).map(|s| s.id.as_str());
    newest_first(
        published(stories)
            .filter(|s| Some(s.id.as_str()) != latest_id)
            .collect(),
    )
}

pub fn library_overview(stories: &[Story]) -> LibraryOverview {
    LibraryOverview {
        latest: latest_story(stories).map(StoryCard::from),
        others: other_stories(stories)
            .into_iter()
            .take(OTHER_STORIES_PREVIEW)
            .map(StoryCard::from)
            .collect(),
    }
}

/// Public archive: published stories matching `query`, newest first.
pub fn archive(stories: &[Story], query: &str) -> Vec<StoryCard> {
    newest_first(published(stories).filter(|s| matches_query(s, query)).collect())
        .into_iter()
        .map(StoryCard::from)
        .collect()
}

/// Author dashboard: every story regardless of publication, newest first.
pub fn dashboard(stories: &[Story]) -> Vec<StoryCard> {
    newest_first(stories.iter().collect())
        .into_iter()
        .map(StoryCard::from)
        .collect()
}

/// News feed, newest first.
pub fn news_feed(mut news: Vec<NewsPost>) -> Vec<NewsPost> {
    news.sort_by(|a, b| b.date.cmp(&a.date));
    news
}
