//! Change feed published after every successful write.

use serde::Serialize;
use tokio::sync::broadcast;

/// Events buffered per subscriber before it starts lagging.
const FEED_CAPACITY: usize = 64;

/// Logical collection names.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Stories,
    News,
    Cities,
    Pages,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Stories => "stories",
            Collection::News => "news",
            Collection::Cities => "cities",
            Collection::Pages => "pages",
        }
    }
}

/// A collection changed; `revision_id` is the store revision after the write.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub collection: Collection,
    pub revision_id: i64,
}

/// Broadcast of change events to any number of listeners.
#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no listeners is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let listeners = self.sender.send(event).unwrap_or(0);
        tracing::debug!(
            collection = event.collection.as_str(),
            revision_id = event.revision_id,
            listeners,
            "change published"
        );
    }
}
