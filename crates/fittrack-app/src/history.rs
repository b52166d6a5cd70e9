//! History view model: the gap-filled daily log plus backfill and
//! delete-day flows.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Date;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use fittrack_core::DataEvent;
use fittrack_core::history::{DaySummary, build_daily_history};
use fittrack_core::validation::{BackfillDraft, BackfillError, validate_backfill};
use fittrack_store::{DEFAULT_CALORIE_TARGET, DEFAULT_WATER_TARGET_ML};
use fittrack_types::{CalorieEntry, WaterEntry, WeightEntry};

use crate::state::{AppState, today};

/// Reactive state of the history screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryState {
    /// Gap-filled daily summaries, newest first.
    pub days: Vec<DaySummary>,
    /// Daily water target in millilitres, shown against each day.
    pub water_target_ml: i32,
    /// Daily calorie target, shown against each day.
    pub calorie_target: i32,
    /// Date awaiting delete confirmation, if any.
    pub pending_delete: Option<Date>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            days: Vec::new(),
            water_target_ml: DEFAULT_WATER_TARGET_ML,
            calorie_target: DEFAULT_CALORIE_TARGET,
            pending_delete: None,
        }
    }
}

/// View model for the history screen.
pub struct History {
    state: Arc<AppState>,
    ui: watch::Sender<HistoryState>,
}

impl History {
    /// Create the view model. Call [`refresh`](Self::refresh) or
    /// [`start`](Self::start) to populate it.
    pub fn new(state: Arc<AppState>) -> Self {
        let (ui, _) = watch::channel(HistoryState::default());
        Self { state, ui }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<HistoryState> {
        self.ui.subscribe()
    }

    /// Current state snapshot.
    pub fn current(&self) -> HistoryState {
        self.ui.borrow().clone()
    }

    /// Rebuild the whole history from the full store contents.
    pub async fn refresh(&self) -> Result<(), fittrack_store::Error> {
        let store = self.state.store.lock().await;
        let water = store.all_water()?;
        let calories = store.all_calories()?;
        let weights = store.all_weights()?;
        let water_target_ml = store.water_target_ml()?;
        let calorie_target = store.calorie_target()?;
        drop(store);

        let days = build_daily_history(&water, &calories, &weights, today());

        self.ui.send_modify(|state| {
            state.days = days;
            state.water_target_ml = water_target_ml;
            state.calorie_target = calorie_target;
        });

        Ok(())
    }

    /// Backfill a past day from the add-entry dialog.
    ///
    /// Validation failures are returned for the dialog to display.
    /// The water and calorie entries land at 12:00 of the chosen day;
    /// the weight upserts on its date. Store failure after validation
    /// is logged and swallowed.
    pub async fn save_day(&self, date: Date, draft: &BackfillDraft) -> Result<(), BackfillError> {
        let backfill = validate_backfill(draft)?;
        let logged_at = date.with_hms(12, 0, 0).unwrap().assume_utc();

        let result: Result<(), fittrack_store::Error> = {
            let store = self.state.store.lock().await;
            (|| {
                store.insert_water(&WaterEntry::new(backfill.water_ml, logged_at))?;
                store.insert_calories(&CalorieEntry::new(backfill.calories, logged_at))?;
                store.upsert_weight(&WeightEntry::new(date, backfill.weight_kg))?;
                Ok(())
            })()
        };

        match result {
            Ok(()) => {
                self.state.notify(DataEvent::WaterChanged);
                self.state.notify(DataEvent::CaloriesChanged);
                self.state.notify(DataEvent::WeightChanged);
            }
            Err(e) => warn!("Failed to backfill {date}: {e}"),
        }

        if let Err(e) = self.refresh().await {
            warn!("History refresh failed: {e}");
        }

        Ok(())
    }

    /// Stage a date for deletion, pending confirmation.
    pub fn request_delete(&self, date: Date) {
        self.ui.send_modify(|s| s.pending_delete = Some(date));
    }

    /// Drop the staged deletion.
    pub fn cancel_delete(&self) {
        self.ui.send_modify(|s| s.pending_delete = None);
    }

    /// Delete every entry of every kind for the staged date.
    ///
    /// The three per-kind deletes are independent; a partial failure is
    /// logged and the surviving kinds still notify.
    pub async fn confirm_delete(&self) {
        let Some(date) = self.current().pending_delete else {
            return;
        };

        let deletion = {
            let store = self.state.store.lock().await;
            store.delete_day(date)
        };

        if !deletion.fully_succeeded() {
            warn!("Partial delete for {date}: {deletion:?}");
        }
        if deletion.water.is_ok() {
            self.state.notify(DataEvent::WaterChanged);
        }
        if deletion.calories.is_ok() {
            self.state.notify(DataEvent::CaloriesChanged);
        }
        if deletion.weight.is_ok() {
            self.state.notify(DataEvent::WeightChanged);
        }

        self.ui.send_modify(|s| s.pending_delete = None);

        if let Err(e) = self.refresh().await {
            warn!("History refresh failed: {e}");
        }
    }

    /// Spawn the reactive refresh loop: rebuild on every data event.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let model = self;
        let mut events = model.state.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) => {
                        if let Err(e) = model.refresh().await {
                            warn!("History refresh failed: {e}");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("History refresh lagged by {skipped} events");
                        if let Err(e) = model.refresh().await {
                            warn!("History refresh failed: {e}");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
