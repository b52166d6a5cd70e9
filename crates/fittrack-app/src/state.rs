//! Application state shared across view models.
//!
//! Every view model holds an `Arc<AppState>`: the store serializes its
//! operations behind an async mutex, and the event bus fans each
//! successful mutation out to whichever models care. Views never read
//! each other; they all recompute from the store.

use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tokio::sync::Mutex;

use fittrack_core::events::{DataEvent, EventBus, EventReceiver};
use fittrack_store::Store;

/// Shared state behind every view model.
pub struct AppState {
    /// The data store (behind a Mutex so mutations serialize).
    pub store: Mutex<Store>,
    /// Data-change fan-out driving reactive recomputation.
    events: EventBus,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
            events: EventBus::default(),
        })
    }

    /// Subscribe to data-change events.
    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Publish a data-change event.
    pub fn notify(&self, event: DataEvent) {
        self.events.send(event);
    }
}

/// Today's calendar date.
pub(crate) fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_store_access() {
        let state = AppState::new(Store::open_in_memory().unwrap());
        let store = state.store.lock().await;
        assert!(store.all_water().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_events_fan_out() {
        let state = AppState::new(Store::open_in_memory().unwrap());
        let mut rx = state.subscribe();

        state.notify(DataEvent::WaterChanged);
        assert_eq!(rx.recv().await.unwrap(), DataEvent::WaterChanged);
    }
}
