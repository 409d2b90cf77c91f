//! Server-sent change feed.
//!
//! Every store write is pushed to listeners as the full current contents of
//! the changed collection, as seen by public readers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;

use crate::db::{ChangeEvent, Collection, Repository};
use crate::errors::AppError;
use crate::listing::{self, CityBrowser};
use crate::AppState;

/// Payload of one SSE message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSnapshot {
    pub collection: Collection,
    pub revision_id: i64,
    pub documents: serde_json::Value,
}

/// Current public contents of the collection named by `event`.
pub async fn snapshot(
    repo: &Repository,
    event: ChangeEvent,
) -> Result<CollectionSnapshot, AppError> {
    let documents = match event.collection {
        Collection::Stories => {
            serde_json::to_value(listing::dashboard(&repo.list_published_stories().await?))?
        }
        Collection::News => serde_json::to_value(listing::news_feed(repo.list_news().await?))?,
        Collection::Cities => {
            serde_json::to_value(CityBrowser::new(repo.list_cities().await?).cities())?
        }
        Collection::Pages => serde_json::to_value(repo.get_library_config().await?)?,
    };

    Ok(CollectionSnapshot {
        collection: event.collection,
        revision_id: event.revision_id,
        documents,
    })
}

/// GET /api/events - Stream collection snapshots after each write.
pub async fn stream_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.repo.subscribe();
    tracing::debug!("event stream opened");

    let events = stream::unfold(
        (receiver, Arc::clone(&state.repo)),
        |(mut receiver, repo)| async move {
            loop {
                let change = match receiver.recv().await {
                    Ok(change) => change,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event stream lagged behind");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                };

                let payload = match snapshot(&repo, change).await {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!("Failed to build snapshot: {}", e);
                        continue;
                    }
                };

                match Event::default()
                    .event(change.collection.as_str())
                    .json_data(&payload)
                {
                    Ok(event) => return Some((Ok(event), (receiver, repo))),
                    Err(e) => tracing::warn!("Failed to encode snapshot: {}", e),
                }
            }
        },
    );

    Sse::new(events).keep_alive(KeepAlive::default())
}
