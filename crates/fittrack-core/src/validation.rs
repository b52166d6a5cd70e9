//! User-input validation for onboarding, settings and entry dialogs.
//!
//! Every form is checked field-by-field in a fixed order and the first
//! failure wins, so callers surface exactly one message at a time. The
//! `Display` strings of the error enums are the user-visible messages.

use thiserror::Error;

use fittrack_types::Gender;

/// Height accepted at onboarding, in centimetres.
pub const HEIGHT_RANGE_CM: std::ops::RangeInclusive<i32> = 100..=250;

/// Weight accepted at onboarding, in kilograms.
pub const WEIGHT_RANGE_KG: std::ops::RangeInclusive<f32> = 30.0..=300.0;

/// Raw profile fields as entered on the first onboarding step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Display name; must be non-blank.
    pub name: String,
    /// Gender string; must parse as [`Gender`].
    pub gender: String,
    /// Height in centimetres, as text.
    pub height_cm: String,
    /// Current weight in kilograms, as text.
    pub weight_kg: String,
}

/// A validated onboarding profile.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Height in centimetres.
    pub height_cm: i32,
    /// Current weight in kilograms.
    pub weight_kg: f32,
}

/// First validation failure for a [`ProfileDraft`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    /// Name was blank.
    #[error("Please enter your name")]
    MissingName,
    /// Gender was blank or not one of male/female.
    #[error("Please select your gender")]
    MissingGender,
    /// Height did not parse or was outside [`HEIGHT_RANGE_CM`].
    #[error("Please enter a valid height (100-250 cm)")]
    InvalidHeight,
    /// Weight did not parse or was outside [`WEIGHT_RANGE_KG`].
    #[error("Please enter a valid weight (30-300 kg)")]
    InvalidWeight,
}

/// Validate the profile step: name, then gender, then height, then
/// weight; the first failing field is reported.
pub fn validate_profile(draft: &ProfileDraft) -> Result<Profile, ProfileError> {
    if draft.name.trim().is_empty() {
        return Err(ProfileError::MissingName);
    }

    let gender: Gender = draft
        .gender
        .parse()
        .map_err(|_| ProfileError::MissingGender)?;

    let height_cm = draft
        .height_cm
        .parse::<i32>()
        .ok()
        .filter(|h| HEIGHT_RANGE_CM.contains(h))
        .ok_or(ProfileError::InvalidHeight)?;

    let weight_kg = draft
        .weight_kg
        .parse::<f32>()
        .ok()
        .filter(|w| WEIGHT_RANGE_KG.contains(w))
        .ok_or(ProfileError::InvalidWeight)?;

    Ok(Profile {
        name: draft.name.clone(),
        gender,
        height_cm,
        weight_kg,
    })
}

/// Raw target fields as entered on the second onboarding step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalsDraft {
    /// Daily water target in millilitres, as text.
    pub water_target_ml: String,
    /// Daily calorie target, as text.
    pub calorie_target: String,
    /// Goal weight in kilograms, as text.
    pub target_weight_kg: String,
}

/// Validated daily targets and goal weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Goals {
    /// Daily water target in millilitres.
    pub water_target_ml: i32,
    /// Daily calorie target.
    pub calorie_target: i32,
    /// Goal weight in kilograms.
    pub target_weight_kg: f32,
}

/// First validation failure for a [`GoalsDraft`] or the settings form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GoalsError {
    /// Water target did not parse or was not positive.
    #[error("Please enter a valid water target")]
    InvalidWaterTarget,
    /// Calorie target did not parse or was not positive.
    #[error("Please enter a valid calorie target")]
    InvalidCalorieTarget,
    /// Target weight did not parse or was not positive.
    #[error("Please enter a valid target weight")]
    InvalidTargetWeight,
}

/// Validate the two intake target fields: water first, then calories;
/// each must parse and be greater than zero.
///
/// Shared by the settings screen (which has no target-weight field)
/// and [`validate_goals`].
pub fn validate_target_fields(water: &str, calories: &str) -> Result<(i32, i32), GoalsError> {
    let water_target_ml = water
        .parse::<i32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or(GoalsError::InvalidWaterTarget)?;

    let calorie_target = calories
        .parse::<i32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or(GoalsError::InvalidCalorieTarget)?;

    Ok((water_target_ml, calorie_target))
}

/// Validate the targets step: water, then calories, then target weight.
pub fn validate_goals(draft: &GoalsDraft) -> Result<Goals, GoalsError> {
    let (water_target_ml, calorie_target) =
        validate_target_fields(&draft.water_target_ml, &draft.calorie_target)?;

    let target_weight_kg = draft
        .target_weight_kg
        .parse::<f32>()
        .ok()
        .filter(|v| *v > 0.0)
        .ok_or(GoalsError::InvalidTargetWeight)?;

    Ok(Goals {
        water_target_ml,
        calorie_target,
        target_weight_kg,
    })
}

/// Validation failure for a quick-add dialog value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AmountError {
    /// Amount did not parse or was zero.
    #[error("Please enter a valid amount")]
    InvalidAmount,
    /// Weight did not parse or was not positive.
    #[error("Please enter a valid weight")]
    InvalidWeight,
}

/// Parse a water/calorie quick-add amount: any non-zero integer.
/// Negative values are corrections against the day's total.
pub fn parse_quick_amount(input: &str) -> Result<i32, AmountError> {
    input
        .parse::<i32>()
        .ok()
        .filter(|v| *v != 0)
        .ok_or(AmountError::InvalidAmount)
}

/// Parse a weight dialog value: must be positive.
pub fn parse_weight_input(input: &str) -> Result<f32, AmountError> {
    input
        .parse::<f32>()
        .ok()
        .filter(|v| *v > 0.0)
        .ok_or(AmountError::InvalidWeight)
}

/// Raw fields of the add-history-day dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillDraft {
    /// Water for the day in millilitres, as text.
    pub water_ml: String,
    /// Calories for the day, as text.
    pub calories: String,
    /// Weight for the day in kilograms, as text.
    pub weight_kg: String,
}

/// Validated values for a backfilled history day.
#[derive(Debug, Clone, PartialEq)]
pub struct Backfill {
    /// Water for the day in millilitres.
    pub water_ml: i32,
    /// Calories for the day.
    pub calories: i32,
    /// Weight for the day in kilograms.
    pub weight_kg: f32,
}

/// First validation failure for a [`BackfillDraft`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackfillError {
    /// Water did not parse or was not positive.
    #[error("Please enter valid water amount")]
    InvalidWater,
    /// Calories did not parse or were not positive.
    #[error("Please enter valid calories")]
    InvalidCalories,
    /// Weight did not parse or was not positive.
    #[error("Please enter valid weight")]
    InvalidWeight,
}

/// Validate a backfill dialog: water, then calories, then weight; each
/// must parse and be greater than zero.
pub fn validate_backfill(draft: &BackfillDraft) -> Result<Backfill, BackfillError> {
    let water_ml = draft
        .water_ml
        .parse::<i32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or(BackfillError::InvalidWater)?;

    let calories = draft
        .calories
        .parse::<i32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or(BackfillError::InvalidCalories)?;

    let weight_kg = draft
        .weight_kg
        .parse::<f32>()
        .ok()
        .filter(|v| *v > 0.0)
        .ok_or(BackfillError::InvalidWeight)?;

    Ok(Backfill {
        water_ml,
        calories,
        weight_kg,
    })
}
