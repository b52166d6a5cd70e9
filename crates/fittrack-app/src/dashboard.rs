//! Dashboard view model: today's running totals against targets.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use fittrack_core::DataEvent;
use fittrack_core::targets::{AdjustmentThresholds, Targets, suggest_targets};
use fittrack_core::validation::{AmountError, parse_quick_amount, parse_weight_input};
use fittrack_store::{DEFAULT_CALORIE_TARGET, DEFAULT_HEIGHT_CM, DEFAULT_WATER_TARGET_ML};
use fittrack_types::{CalorieEntry, Gender, WaterEntry, WeightEntry, WeightUnit};

use crate::state::{AppState, today};

/// Reactive state of the dashboard screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardState {
    /// Water consumed today in millilitres, floored at zero.
    pub water_consumed_ml: i32,
    /// Daily water target in millilitres.
    pub water_target_ml: i32,
    /// Calories consumed today, floored at zero.
    pub calories_consumed: i32,
    /// Daily calorie target.
    pub calorie_target: i32,
    /// Most recent weight measurement, if any exists.
    pub current_weight_kg: Option<f32>,
    /// Display unit for weights.
    pub weight_unit: WeightUnit,
    /// Height in centimetres.
    pub height_cm: i32,
    /// Gender.
    pub gender: Gender,
    /// Pending target suggestion awaiting user confirmation.
    pub suggested_targets: Option<Targets>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            water_consumed_ml: 0,
            water_target_ml: DEFAULT_WATER_TARGET_ML,
            calories_consumed: 0,
            calorie_target: DEFAULT_CALORIE_TARGET,
            current_weight_kg: None,
            weight_unit: WeightUnit::Kg,
            height_cm: DEFAULT_HEIGHT_CM,
            gender: Gender::Male,
            suggested_targets: None,
        }
    }
}

/// View model for the dashboard screen.
pub struct Dashboard {
    state: Arc<AppState>,
    ui: watch::Sender<DashboardState>,
    thresholds: AdjustmentThresholds,
}

impl Dashboard {
    /// Create the view model. Call [`refresh`](Self::refresh) or
    /// [`start`](Self::start) to populate it.
    pub fn new(state: Arc<AppState>) -> Self {
        let (ui, _) = watch::channel(DashboardState::default());
        Self {
            state,
            ui,
            thresholds: AdjustmentThresholds::default(),
        }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.ui.subscribe()
    }

    /// Current state snapshot.
    pub fn current(&self) -> DashboardState {
        self.ui.borrow().clone()
    }

    /// Recompute the whole state from the stores.
    ///
    /// A full recombination of every contributing source; the pending
    /// target suggestion is the only carried-over field.
    pub async fn refresh(&self) -> Result<(), fittrack_store::Error> {
        let date = today();

        let store = self.state.store.lock().await;
        let water = store.water_total_for_date(date)?.unwrap_or(0);
        let calories = store.calorie_total_for_date(date)?.unwrap_or(0);
        let weight = store.latest_weight()?;
        let water_target_ml = store.water_target_ml()?;
        let calorie_target = store.calorie_target()?;
        let weight_unit = store.weight_unit()?;
        let height_cm = store.height_cm()?;
        let gender = store.gender()?;
        drop(store);

        self.ui.send_modify(|state| {
            state.water_consumed_ml = water.max(0) as i32;
            state.calories_consumed = calories.max(0) as i32;
            state.current_weight_kg = weight.map(|e| e.weight_kg);
            state.water_target_ml = water_target_ml;
            state.calorie_target = calorie_target;
            state.weight_unit = weight_unit;
            state.height_cm = height_cm;
            state.gender = gender;
        });

        Ok(())
    }

    /// Log water intake.
    ///
    /// A negative amount is a correction: it is clamped so the day
    /// total cannot drop below zero, and the clamped adjustment is what
    /// gets persisted. A clamp down to zero adjustment inserts nothing.
    /// Store failure is logged and swallowed.
    pub async fn add_water(&self, amount_ml: i32) {
        let applied = if amount_ml < 0 {
            let consumed = self.current().water_consumed_ml;
            (consumed + amount_ml).max(0) - consumed
        } else {
            amount_ml
        };

        if applied != 0 {
            let entry = WaterEntry::new(applied, OffsetDateTime::now_utc());
            let result = {
                let store = self.state.store.lock().await;
                store.insert_water(&entry)
            };
            match result {
                Ok(_) => self.state.notify(DataEvent::WaterChanged),
                Err(e) => warn!("Failed to store water entry: {e}"),
            }
        }

        if let Err(e) = self.refresh().await {
            warn!("Dashboard refresh failed: {e}");
        }
    }

    /// Log water from raw dialog input.
    pub async fn add_water_input(&self, input: &str) -> Result<(), AmountError> {
        let amount_ml = parse_quick_amount(input)?;
        self.add_water(amount_ml).await;
        Ok(())
    }

    /// Log calorie intake; same correction clamping as water.
    pub async fn add_calories(&self, calories: i32) {
        let applied = if calories < 0 {
            let consumed = self.current().calories_consumed;
            (consumed + calories).max(0) - consumed
        } else {
            calories
        };

        if applied != 0 {
            let entry = CalorieEntry::new(applied, OffsetDateTime::now_utc());
            let result = {
                let store = self.state.store.lock().await;
                store.insert_calories(&entry)
            };
            match result {
                Ok(_) => self.state.notify(DataEvent::CaloriesChanged),
                Err(e) => warn!("Failed to store calorie entry: {e}"),
            }
        }

        if let Err(e) = self.refresh().await {
            warn!("Dashboard refresh failed: {e}");
        }
    }

    /// Log calories from raw dialog input.
    pub async fn add_calories_input(&self, input: &str) -> Result<(), AmountError> {
        let calories = parse_quick_amount(input)?;
        self.add_calories(calories).await;
        Ok(())
    }

    /// Record today's weight, replacing an earlier measurement for the
    /// day, then recompute the BMI-banded target suggestion against the
    /// current targets. A materially different suggestion is held in
    /// the state until accepted or dismissed.
    pub async fn add_weight(&self, weight_kg: f32) {
        let entry = WeightEntry::new(today(), weight_kg);
        let result = {
            let store = self.state.store.lock().await;
            store.upsert_weight(&entry)
        };

        match result {
            Ok(()) => {
                self.state.notify(DataEvent::WeightChanged);

                let state = self.current();
                let current = Targets {
                    water_ml: state.water_target_ml,
                    calories: state.calorie_target,
                };
                let suggested = suggest_targets(weight_kg, state.height_cm, state.gender);
                if self.thresholds.is_significant(current, suggested) {
                    self.ui
                        .send_modify(|s| s.suggested_targets = Some(suggested));
                }
            }
            Err(e) => warn!("Failed to store weight entry: {e}"),
        }

        if let Err(e) = self.refresh().await {
            warn!("Dashboard refresh failed: {e}");
        }
    }

    /// Record a weight from raw dialog input.
    pub async fn add_weight_input(&self, input: &str) -> Result<(), AmountError> {
        let weight_kg = parse_weight_input(input)?;
        self.add_weight(weight_kg).await;
        Ok(())
    }

    /// Accept the pending suggestion, overwriting the persisted targets.
    pub async fn accept_suggested_targets(&self) {
        let Some(suggested) = self.current().suggested_targets else {
            return;
        };

        let result = {
            let store = self.state.store.lock().await;
            store
                .set_water_target_ml(suggested.water_ml)
                .and_then(|()| store.set_calorie_target(suggested.calories))
        };
        match result {
            Ok(()) => self.state.notify(DataEvent::PreferencesChanged),
            Err(e) => warn!("Failed to store adjusted targets: {e}"),
        }

        self.ui.send_modify(|s| s.suggested_targets = None);
        if let Err(e) = self.refresh().await {
            warn!("Dashboard refresh failed: {e}");
        }
    }

    /// Dismiss the pending suggestion without changing targets. Covers
    /// both the keep-manual-targets and plain-cancel choices, which are
    /// identical in effect.
    pub fn dismiss_suggested_targets(&self) {
        self.ui.send_modify(|s| s.suggested_targets = None);
    }

    /// Spawn the reactive refresh loop: recompute on every data event.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let model = self;
        let mut events = model.state.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(_) => {
                        if let Err(e) = model.refresh().await {
                            warn!("Dashboard refresh failed: {e}");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Dashboard refresh lagged by {skipped} events");
                        if let Err(e) = model.refresh().await {
                            warn!("Dashboard refresh failed: {e}");
                        }
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
