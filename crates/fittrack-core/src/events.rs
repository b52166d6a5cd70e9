//! Data-change notifications shared by the view models.
//!
//! Mutations emit a [`DataEvent`] after the store write succeeds;
//! aggregate views subscribe and recompute from the full store contents
//! on every event they care about. There is no incremental update.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A change to one of the underlying data sources.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new event
/// types in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum DataEvent {
    /// Water entries were inserted or deleted.
    WaterChanged,
    /// Calorie entries were inserted or deleted.
    CaloriesChanged,
    /// A weight entry was inserted, replaced, or deleted.
    WeightChanged,
    /// A preference value was written.
    PreferencesChanged,
}

/// Sender for data events.
pub type EventSender = broadcast::Sender<DataEvent>;

/// Receiver for data events.
pub type EventReceiver = broadcast::Receiver<DataEvent>;

/// Fan-out channel for [`DataEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: EventSender,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Send an event.
    pub fn send(&self, event: DataEvent) {
        // Ignore error if no receivers
        let _ = self.sender.send(event);
    }

    /// Get the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(32)
    }
}
