//! Body-metric formulas behind the onboarding recommendations.
//!
//! Pure, deterministic functions: no state, no I/O, no error paths.
//! Malformed numeric input is rejected before these are called (see
//! [`crate::validation`]).

use fittrack_types::Gender;

/// Age, in years, assumed by [`recommended_calories`].
///
/// The profile captures no age field, so the BMR estimate runs on this
/// fixed value. A known limitation, kept deliberately.
pub const ASSUMED_AGE_YEARS: f64 = 30.0;

/// Sedentary activity factor applied to the BMR estimate.
pub const ACTIVITY_FACTOR: f64 = 1.2;

/// Body Mass Index: weight over height squared, in kg/m².
///
/// # Examples
///
/// ```
/// let bmi = fittrack_core::metrics::bmi(70.0, 175);
/// assert!((bmi - 22.86).abs() < 0.01);
/// ```
#[must_use]
pub fn bmi(weight_kg: f32, height_cm: i32) -> f32 {
    let height_m = height_cm as f32 / 100.0;
    weight_kg / (height_m * height_m)
}

/// Daily water recommendation: 35 ml per kilogram of body weight,
/// truncated to whole millilitres.
#[must_use]
pub fn recommended_water_ml(weight_kg: f32) -> i32 {
    (weight_kg * 35.0) as i32
}

/// Daily calorie recommendation from the Mifflin-St Jeor BMR estimate
/// at [`ASSUMED_AGE_YEARS`], scaled by [`ACTIVITY_FACTOR`] and
/// truncated.
#[must_use]
pub fn recommended_calories(weight_kg: f32, height_cm: i32, gender: Gender) -> i32 {
    let weight = f64::from(weight_kg);
    let height = f64::from(height_cm);
    let bmr = match gender {
        Gender::Male => 10.0 * weight + 6.25 * height - 5.0 * ASSUMED_AGE_YEARS + 5.0,
        Gender::Female => 10.0 * weight + 6.25 * height - 5.0 * ASSUMED_AGE_YEARS - 161.0,
    };
    (bmr * ACTIVITY_FACTOR) as i32
}

/// Ideal body weight estimate from height, Devine-style: a base value
/// plus a per-inch increment over five feet.
///
/// Linear all the way down, so heights well below five feet produce
/// implausibly small (even negative) results. Callers get the raw
/// value either way.
#[must_use]
pub fn ideal_weight_kg(height_cm: i32, gender: Gender) -> f32 {
    let height_inches = f64::from(height_cm) / 2.54;
    let inches_over_5_feet = height_inches - 60.0;
    let ideal = match gender {
        Gender::Male => 52.0 + 1.9 * inches_over_5_feet,
        Gender::Female => 49.0 + 1.7 * inches_over_5_feet,
    };
    ideal as f32
}
