//! First-run onboarding: a two-step state machine.
//!
//! Step one captures the profile (name, gender, height, weight); step
//! two confirms the recommended targets, prefilled from the metrics
//! formulas as editable defaults. Completing the flow persists the
//! profile, the targets, and the initial weight entry, then flips the
//! first-launch flag. The flag goes last so an interrupted save re-runs
//! onboarding.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::info;

use fittrack_core::DataEvent;
use fittrack_core::metrics;
use fittrack_core::validation::{
    GoalsDraft, ProfileDraft, validate_goals, validate_profile,
};
use fittrack_store::{
    DEFAULT_CALORIE_TARGET, DEFAULT_TARGET_WEIGHT_KG, DEFAULT_WATER_TARGET_ML,
};
use fittrack_types::{BmiCategory, WeightEntry, WeightUnit};

use crate::state::{AppState, today};

/// Which onboarding step is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnboardingStep {
    /// Profile capture: name, gender, height, weight.
    Profile,
    /// Target confirmation with editable prefilled values.
    Goals,
}

/// Reactive state of the onboarding flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingState {
    /// Current step.
    pub step: OnboardingStep,
    /// Display name field.
    pub name: String,
    /// Gender field ("male" or "female").
    pub gender: String,
    /// Height field in centimetres, as text.
    pub height_cm: String,
    /// Current weight field in kilograms, as text.
    pub weight_kg: String,
    /// BMI computed when advancing to step two.
    pub bmi: f32,
    /// BMI category computed when advancing to step two.
    pub bmi_category: Option<BmiCategory>,
    /// Recommended daily water in millilitres.
    pub recommended_water_ml: i32,
    /// Recommended daily calories.
    pub recommended_calories: i32,
    /// Recommended goal weight in kilograms.
    pub recommended_weight_kg: f32,
    /// Editable water target field, prefilled with the recommendation.
    pub water_target_ml: String,
    /// Editable calorie target field, prefilled with the recommendation.
    pub calorie_target: String,
    /// Editable goal weight field, prefilled with the recommendation.
    pub target_weight_kg: String,
    /// Whether the final save is in flight.
    pub saving: bool,
    /// Validation or persistence failure message.
    pub error: Option<String>,
    /// Set once the profile has been persisted.
    pub completed: bool,
}

impl Default for OnboardingState {
    fn default() -> Self {
        Self {
            step: OnboardingStep::Profile,
            name: String::new(),
            gender: String::new(),
            height_cm: String::new(),
            weight_kg: String::new(),
            bmi: 0.0,
            bmi_category: None,
            recommended_water_ml: DEFAULT_WATER_TARGET_ML,
            recommended_calories: DEFAULT_CALORIE_TARGET,
            recommended_weight_kg: DEFAULT_TARGET_WEIGHT_KG,
            water_target_ml: DEFAULT_WATER_TARGET_ML.to_string(),
            calorie_target: DEFAULT_CALORIE_TARGET.to_string(),
            target_weight_kg: DEFAULT_TARGET_WEIGHT_KG.to_string(),
            saving: false,
            error: None,
            completed: false,
        }
    }
}

/// View model for the onboarding flow.
///
/// Unlike the screen models this one does not react to store events;
/// it is a plain form state machine that writes once at the end.
pub struct Onboarding {
    state: Arc<AppState>,
    ui: watch::Sender<OnboardingState>,
}

impl Onboarding {
    /// Create the view model.
    pub fn new(state: Arc<AppState>) -> Self {
        let (ui, _) = watch::channel(OnboardingState::default());
        Self { state, ui }
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<OnboardingState> {
        self.ui.subscribe()
    }

    /// Current state snapshot.
    pub fn current(&self) -> OnboardingState {
        self.ui.borrow().clone()
    }

    /// Edit the name field.
    pub fn set_name(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.name = value;
            s.error = None;
        });
    }

    /// Edit the gender field.
    pub fn set_gender(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.gender = value;
            s.error = None;
        });
    }

    /// Edit the height field.
    pub fn set_height(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.height_cm = value;
            s.error = None;
        });
    }

    /// Edit the current weight field.
    pub fn set_weight(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.weight_kg = value;
            s.error = None;
        });
    }

    /// Edit the water target field (step two).
    pub fn set_water_target(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.water_target_ml = value;
            s.error = None;
        });
    }

    /// Edit the calorie target field (step two).
    pub fn set_calorie_target(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.calorie_target = value;
            s.error = None;
        });
    }

    /// Edit the goal weight field (step two).
    pub fn set_target_weight(&self, value: impl Into<String>) {
        let value = value.into();
        self.ui.send_modify(|s| {
            s.target_weight_kg = value;
            s.error = None;
        });
    }

    fn profile_draft(state: &OnboardingState) -> ProfileDraft {
        ProfileDraft {
            name: state.name.clone(),
            gender: state.gender.clone(),
            height_cm: state.height_cm.clone(),
            weight_kg: state.weight_kg.clone(),
        }
    }

    /// Validate the profile step and, on success, prefill step two with
    /// freshly computed recommendations and advance. On failure the
    /// first failing field's message is surfaced and the step stays.
    pub fn advance(&self) {
        let state = self.current();

        match validate_profile(&Self::profile_draft(&state)) {
            Ok(profile) => {
                let bmi = metrics::bmi(profile.weight_kg, profile.height_cm);
                let category = BmiCategory::from_bmi(bmi);
                let water = metrics::recommended_water_ml(profile.weight_kg);
                let calories = metrics::recommended_calories(
                    profile.weight_kg,
                    profile.height_cm,
                    profile.gender,
                );
                let ideal = metrics::ideal_weight_kg(profile.height_cm, profile.gender);

                self.ui.send_modify(|s| {
                    s.step = OnboardingStep::Goals;
                    s.bmi = bmi;
                    s.bmi_category = Some(category);
                    s.recommended_water_ml = water;
                    s.recommended_calories = calories;
                    s.recommended_weight_kg = ideal;
                    s.water_target_ml = water.to_string();
                    s.calorie_target = calories.to_string();
                    s.target_weight_kg = format!("{ideal:.1}");
                    s.error = None;
                });
            }
            Err(e) => {
                self.ui.send_modify(|s| s.error = Some(e.to_string()));
            }
        }
    }

    /// Return to the profile step, preserving everything entered.
    /// Nothing is re-validated on the way back.
    pub fn back(&self) {
        self.ui.send_modify(|s| {
            if s.step == OnboardingStep::Goals {
                s.step = OnboardingStep::Profile;
                s.error = None;
            }
        });
    }

    /// Validate step two and persist the whole profile.
    ///
    /// On success the profile fields, the targets, and the initial
    /// weight entry are written and `completed` is set. A store failure
    /// surfaces the cause and clears the saving flag so the user can
    /// resubmit.
    pub async fn complete(&self) {
        let state = self.current();

        let goals = match validate_goals(&GoalsDraft {
            water_target_ml: state.water_target_ml.clone(),
            calorie_target: state.calorie_target.clone(),
            target_weight_kg: state.target_weight_kg.clone(),
        }) {
            Ok(goals) => goals,
            Err(e) => {
                self.ui.send_modify(|s| s.error = Some(e.to_string()));
                return;
            }
        };

        // Step one gated on this already; re-validate rather than trust
        // the raw strings.
        let profile = match validate_profile(&Self::profile_draft(&state)) {
            Ok(profile) => profile,
            Err(e) => {
                self.ui.send_modify(|s| s.error = Some(e.to_string()));
                return;
            }
        };

        self.ui.send_modify(|s| {
            s.saving = true;
            s.error = None;
        });

        let result: Result<(), fittrack_store::Error> = {
            let store = self.state.store.lock().await;
            (|| {
                store.set_water_target_ml(goals.water_target_ml)?;
                store.set_calorie_target(goals.calorie_target)?;
                store.set_weight_unit(WeightUnit::Kg)?;
                store.set_height_cm(profile.height_cm)?;
                store.set_gender(profile.gender)?;
                store.set_target_weight_kg(goals.target_weight_kg)?;
                store.set_user_name(&profile.name)?;
                store.upsert_weight(&WeightEntry::new(today(), profile.weight_kg))?;
                // Flag last so an interrupted save re-runs onboarding.
                store.set_first_launch_completed()?;
                Ok(())
            })()
        };

        match result {
            Ok(()) => {
                info!("Onboarding completed for {}", profile.name);
                self.state.notify(DataEvent::PreferencesChanged);
                self.state.notify(DataEvent::WeightChanged);
                self.ui.send_modify(|s| {
                    s.saving = false;
                    s.completed = true;
                });
            }
            Err(e) => {
                self.ui.send_modify(|s| {
                    s.saving = false;
                    s.error = Some(format!("Error: {e}"));
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use fittrack_store::Store;
    use fittrack_types::Gender;

    use super::*;

    async fn onboarding() -> Onboarding {
        let state = AppState::new(Store::open_in_memory().unwrap());
        Onboarding::new(state)
    }

    fn fill_profile(model: &Onboarding) {
        model.set_name("Alex");
        model.set_gender("male");
        model.set_height("175");
        model.set_weight("70");
    }

    #[tokio::test]
    async fn test_advance_computes_recommendations() {
        let model = onboarding().await;
        fill_profile(&model);
        model.advance();

        let state = model.current();
        assert_eq!(state.step, OnboardingStep::Goals);
        assert!((state.bmi - 22.857).abs() < 0.001);
        assert_eq!(state.bmi_category, Some(BmiCategory::Normal));
        assert_eq!(state.recommended_water_ml, 2450);
        assert_eq!(state.recommended_calories, 1978);
        assert!((state.recommended_weight_kg - 72.65).abs() < 0.01);

        // Prefilled as editable text, goal weight to one decimal.
        assert_eq!(state.water_target_ml, "2450");
        assert_eq!(state.calorie_target, "1978");
        assert_eq!(state.target_weight_kg, "72.6");
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_advance_reports_first_invalid_field() {
        let model = onboarding().await;
        model.advance();
        assert_eq!(
            model.current().error.as_deref(),
            Some("Please enter your name")
        );
        assert_eq!(model.current().step, OnboardingStep::Profile);

        model.set_name("Alex");
        model.advance();
        assert_eq!(
            model.current().error.as_deref(),
            Some("Please select your gender")
        );

        model.set_gender("male");
        model.set_height("90");
        model.advance();
        assert_eq!(
            model.current().error.as_deref(),
            Some("Please enter a valid height (100-250 cm)")
        );

        model.set_height("175");
        model.set_weight("500");
        model.advance();
        assert_eq!(
            model.current().error.as_deref(),
            Some("Please enter a valid weight (30-300 kg)")
        );
    }

    #[tokio::test]
    async fn test_editing_clears_error() {
        let model = onboarding().await;
        model.advance();
        assert!(model.current().error.is_some());

        model.set_name("Alex");
        assert!(model.current().error.is_none());
    }

    #[tokio::test]
    async fn test_back_preserves_fields() {
        let model = onboarding().await;
        fill_profile(&model);
        model.advance();
        model.set_water_target("2600");
        model.back();

        let state = model.current();
        assert_eq!(state.step, OnboardingStep::Profile);
        assert_eq!(state.name, "Alex");
        assert_eq!(state.height_cm, "175");
        // Step-two edits survive the round trip too.
        assert_eq!(state.water_target_ml, "2600");
    }

    #[tokio::test]
    async fn test_back_on_profile_step_is_a_noop() {
        let model = onboarding().await;
        model.back();
        assert_eq!(model.current().step, OnboardingStep::Profile);
    }

    #[tokio::test]
    async fn test_complete_persists_everything() {
        let model = onboarding().await;
        fill_profile(&model);
        model.advance();
        model.set_water_target("2600");
        model.complete().await;

        let state = model.current();
        assert!(state.completed);
        assert!(!state.saving);
        assert!(state.error.is_none());

        let store = model.state.store.lock().await;
        assert!(!store.is_first_launch().unwrap());
        assert_eq!(store.water_target_ml().unwrap(), 2600);
        assert_eq!(store.calorie_target().unwrap(), 1978);
        assert_eq!(store.weight_unit().unwrap(), WeightUnit::Kg);
        assert_eq!(store.height_cm().unwrap(), 175);
        assert_eq!(store.gender().unwrap(), Gender::Male);
        assert!((store.target_weight_kg().unwrap() - 72.6).abs() < 0.01);
        assert_eq!(store.user_name().unwrap(), "Alex");

        let weight = store.latest_weight().unwrap().unwrap();
        assert_eq!(weight.entry_date, crate::state::today());
        assert!((weight.weight_kg - 70.0).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_complete_validates_targets_in_order() {
        let model = onboarding().await;
        fill_profile(&model);
        model.advance();

        model.set_water_target("0");
        model.complete().await;
        assert_eq!(
            model.current().error.as_deref(),
            Some("Please enter a valid water target")
        );

        model.set_water_target("2500");
        model.set_calorie_target("no");
        model.complete().await;
        assert_eq!(
            model.current().error.as_deref(),
            Some("Please enter a valid calorie target")
        );

        // Nothing persisted; still first launch.
        let store = model.state.store.lock().await;
        assert!(store.is_first_launch().unwrap());
        assert!(store.latest_weight().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_complete_emits_events() {
        let model = onboarding().await;
        let mut rx = model.state.subscribe();
        fill_profile(&model);
        model.advance();
        model.complete().await;

        assert_eq!(rx.recv().await.unwrap(), DataEvent::PreferencesChanged);
        assert_eq!(rx.recv().await.unwrap(), DataEvent::WeightChanged);
    }
}
