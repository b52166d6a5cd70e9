//! Settings view model: daily targets, weight unit and theme.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use fittrack_core::DataEvent;
use fittrack_core::validation::validate_target_fields;
use fittrack_store::{DEFAULT_CALORIE_TARGET, DEFAULT_WATER_TARGET_ML};
use fittrack_types::WeightUnit;

use crate::state::AppState;

/// Reactive state of the settings screen.
///
/// Target fields are kept as entered text; they are parsed and
/// validated only when the user saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsState {
    /// Daily water target in millilitres, as text.
    pub water_target_ml: String,
    /// Daily calorie target, as text.
    pub calorie_target: String,
    /// Display unit for weights.
    pub weight_unit: WeightUnit,
    /// Whether the dark theme is active.
    pub dark_mode: bool,
    /// Whether a save is in flight.
    pub saving: bool,
    /// Confirmation shown after a successful save.
    pub success: Option<String>,
    /// Validation or persistence failure message.
    pub error: Option<String>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            water_target_ml: DEFAULT_WATER_TARGET_ML.to_string(),
            calorie_target: DEFAULT_CALORIE_TARGET.to_string(),
            weight_unit: WeightUnit::Kg,
            dark_mode: true,
            saving: false,
            success: None,
            error: None,
        }
    }
}

/// View model for the settings screen.
pub struct Settings {
    state: Arc<AppState>,
    ui: watch::Sender<SettingsState>,
}

impl Settings {
    /// Create the view model. Call [`load`](Self::load) or
    /// [`start`](Self::start) to populate it.
    pub fn new(state: Arc<AppState>) -> Self {
        let (ui, _) = watch::channel(SettingsState::default());
        Self { state, ui }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<SettingsState> {
        self.ui.subscribe()
    }

    /// Current state snapshot.
    pub fn current(&self) -> SettingsState {
        self.ui.borrow().clone()
    }

    /// Reload the editable fields from the persisted preferences,
    /// discarding unsaved edits and clearing messages.
    pub async fn load(&self) -> Result<(), fittrack_store::Error> {
        let store = self.state.store.lock().await;
        let water_target_ml = store.water_target_ml()?;
        let calorie_target = store.calorie_target()?;
        let weight_unit = store.weight_unit()?;
        let dark_mode = store.is_dark_mode()?;
        drop(store);

        self.ui.send_modify(|state| {
            state.water_target_ml = water_target_ml.to_string();
            state.calorie_target = calorie_target.to_string();
            state.weight_unit = weight_unit;
            state.dark_mode = dark_mode;
            state.saving = false;
            state.success = None;
            state.error = None;
        });

        Ok(())
    }

    /// Edit the water target field.
    pub fn set_water_target(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.water_target_ml = value;
            s.success = None;
            s.error = None;
        });
    }

    /// Edit the calorie target field.
    pub fn set_calorie_target(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.calorie_target = value;
            s.success = None;
            s.error = None;
        });
    }

    /// Switch the weight display unit.
    pub fn set_weight_unit(&self, unit: WeightUnit) {
        self.ui.send_modify(|s| {
            s.weight_unit = unit;
            s.success = None;
            s.error = None;
        });
    }

    /// Persist the edited targets and unit.
    ///
    /// The target fields are validated water first, then calories; a
    /// failure surfaces its message and nothing is written. A store
    /// failure surfaces the cause and the user may resubmit.
    pub async fn save(&self) {
        let state = self.current();

        let (water_target_ml, calorie_target) =
            match validate_target_fields(&state.water_target_ml, &state.calorie_target) {
                Ok(targets) => targets,
                Err(e) => {
                    self.ui.send_modify(|s| s.error = Some(e.to_string()));
                    return;
                }
            };

        self.ui.send_modify(|s| {
            s.saving = true;
            s.success = None;
            s.error = None;
        });

        let result = {
            let store = self.state.store.lock().await;
            store
                .set_water_target_ml(water_target_ml)
                .and_then(|()| store.set_calorie_target(calorie_target))
                .and_then(|()| store.set_weight_unit(state.weight_unit))
        };

        match result {
            Ok(()) => {
                self.state.notify(DataEvent::PreferencesChanged);
                self.ui.send_modify(|s| {
                    s.saving = false;
                    s.success = Some("Settings saved successfully!".to_string());
                });
            }
            Err(e) => {
                self.ui.send_modify(|s| {
                    s.saving = false;
                    s.error = Some(format!("Error saving settings: {e}"));
                });
            }
        }
    }

    /// Persist the dark-mode flag immediately (no save button involved).
    pub async fn set_dark_mode(&self, dark: bool) {
        let result = {
            let store = self.state.store.lock().await;
            store.set_dark_mode(dark)
        };
        match result {
            Ok(()) => {
                self.state.notify(DataEvent::PreferencesChanged);
                self.ui.send_modify(|s| s.dark_mode = dark);
            }
            Err(e) => warn!("Failed to store dark mode flag: {e}"),
        }
    }

    /// Clear any success or error message.
    pub fn clear_messages(&self) {
        self.ui.send_modify(|s| {
            s.success = None;
            s.error = None;
        });
    }

    /// Spawn the reactive reload loop. Only preference changes affect
    /// this view.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        let model = self;
        let mut events = model.state.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(DataEvent::PreferencesChanged) => {
                        if let Err(e) = model.load().await {
                            warn!("Settings reload failed: {e}");
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Settings reload lagged by {skipped} events");
                        if let Err(e) = model.load().await {
                            warn!("Settings reload failed: {e}");
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
    use fittrack_store::Store;

    use super::*;

    async fn settings() -> Settings {
        let state = AppState::new(Store::open_in_memory().unwrap());
        Settings::new(state)
    }

    #[tokio::test]
    async fn test_load_reads_prefs() {
        let model = settings().await;
        {
            let store = model.state.store.lock().await;
            store.set_water_target_ml(2600).unwrap();
            store.set_dark_mode(false).unwrap();
        }

        model.load().await.unwrap();
        let state = model.current();
        assert_eq!(state.water_target_ml, "2600");
        assert!(!state.dark_mode);
    }

    #[tokio::test]
    async fn test_save_persists_targets_and_unit() {
        let model = settings().await;
        model.set_water_target("2750");
        model.set_calorie_target("2100");
        model.set_weight_unit(WeightUnit::Lbs);
        model.save().await;

        let state = model.current();
        assert!(!state.saving);
        assert_eq!(state.success.as_deref(), Some("Settings saved successfully!"));
        assert!(state.error.is_none());

        let store = model.state.store.lock().await;
        assert_eq!(store.water_target_ml().unwrap(), 2750);
        assert_eq!(store.calorie_target().unwrap(), 2100);
        assert_eq!(store.weight_unit().unwrap(), WeightUnit::Lbs);
    }

    #[tokio::test]
    async fn test_save_validates_water_first() {
        let model = settings().await;
        model.set_water_target("plenty");
        model.set_calorie_target("also wrong");
        model.save().await;

        let state = model.current();
        assert_eq!(
            state.error.as_deref(),
            Some("Please enter a valid water target")
        );
        assert!(state.success.is_none());

        // Nothing was written.
        let store = model.state.store.lock().await;
        assert_eq!(store.water_target_ml().unwrap(), 2000);
    }

    #[tokio::test]
    async fn test_save_rejects_zero_calorie_target() {
        let model = settings().await;
        model.set_water_target("2500");
        model.set_calorie_target("0");
        model.save().await;

        assert_eq!(
            model.current().error.as_deref(),
            Some("Please enter a valid calorie target")
        );
    }

    #[tokio::test]
    async fn test_editing_clears_messages() {
        let model = settings().await;
        model.set_water_target("2500");
        model.set_calorie_target("2100");
        model.save().await;
        assert!(model.current().success.is_some());

        model.set_water_target("2600");
        assert!(model.current().success.is_none());
    }

    #[tokio::test]
    async fn test_dark_mode_persists_immediately() {
        let model = settings().await;
        model.set_dark_mode(false).await;

        assert!(!model.current().dark_mode);
        let store = model.state.store.lock().await;
        assert!(!store.is_dark_mode().unwrap());
    }

    #[tokio::test]
    async fn test_clear_messages() {
        let model = settings().await;
        model.set_water_target("bad");
        model.save().await;
        assert!(model.current().error.is_some());

        model.clear_messages();
        assert!(model.current().error.is_none());
    }
}
