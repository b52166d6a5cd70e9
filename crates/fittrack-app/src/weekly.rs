//! Weekly weight view model.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use fittrack_core::DataEvent;
use fittrack_core::weekly::{WeeklyWeight, build_weekly_weights};
use fittrack_types::WeightUnit;

use crate::state::AppState;

/// Reactive state of the weekly weight screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyState {
    /// Monday-bucketed weekly averages, newest first.
    pub weeks: Vec<WeeklyWeight>,
    /// Display unit for weights.
    pub weight_unit: WeightUnit,
}

/// View model for the weekly weight screen.
pub struct Weekly {
    state: Arc<AppState>,
    ui: watch::Sender<WeeklyState>,
}

impl Weekly {
    /// Create the view model. Call [`refresh`](Self::refresh) or
    /// [`start`](Self::start) to populate it.
    pub fn new(state: Arc<AppState>) -> Self {
        let (ui, _) = watch::channel(WeeklyState::default());
        Self { state, ui }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<WeeklyState> {
        self.ui.subscribe()
    }

    /// Current state snapshot.
    pub fn current(&self) -> WeeklyState {
        self.ui.borrow().clone()
    }

    /// Rebuild the weekly buckets from all weight entries.
    pub async fn refresh(&self) -> Result<(), fittrack_store::Error> {
        let store = self.state.store.lock().await;
        let weights = store.all_weights()?;
        let weight_unit = store.weight_unit()?;
        drop(store);

        let weeks = build_weekly_weights(&weights);

        self.ui.send_modify(|state| {
            state.weeks = weeks;
            state.weight_unit = weight_unit;
        });

        Ok(())
    }

    /// Spawn the reactive refresh loop. Only weight and preference
    /// changes affect this view.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let model = self;
        let mut events = model.state.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(DataEvent::WeightChanged | DataEvent::PreferencesChanged) => {
                        if let Err(e) = model.refresh().await {
                            warn!("Weekly refresh failed: {e}");
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Weekly refresh lagged by {skipped} events");
                        if let Err(e) = model.refresh().await {
                            warn!("Weekly refresh failed: {e}");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use fittrack_store::Store;
    use fittrack_types::WeightEntry;

    use super::*;

    #[tokio::test]
    async fn test_refresh_builds_buckets() {
        let state = AppState::new(Store::open_in_memory().unwrap());
        let model = Weekly::new(state);
        {
            let store = model.state.store.lock().await;
            store
                .upsert_weight(&WeightEntry::new(date!(2024 - 01 - 03), 80.0))
                .unwrap();
            store
                .upsert_weight(&WeightEntry::new(date!(2024 - 01 - 08), 79.0))
                .unwrap();
            store.set_weight_unit(WeightUnit::Lbs).unwrap();
        }

        model.refresh().await.unwrap();
        let state = model.current();
        assert_eq!(state.weeks.len(), 2);
        assert_eq!(state.weeks[0].week_start, date!(2024 - 01 - 08));
        assert!((state.weeks[0].weight_change_kg.unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(state.weight_unit, WeightUnit::Lbs);
    }

    #[tokio::test]
    async fn test_empty_store_yields_no_buckets() {
        let state = AppState::new(Store::open_in_memory().unwrap());
        let model = Weekly::new(state);
        model.refresh().await.unwrap();
        assert!(model.current().weeks.is_empty());
    }
}
