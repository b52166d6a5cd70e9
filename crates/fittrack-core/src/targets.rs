//! BMI-banded daily target suggestion and the adjustment gate.
//!
//! Deliberately coarser than the onboarding formulas in
//! [`crate::metrics`]: after a weight update the dashboard only needs a
//! band-level suggestion, and the materiality gate keeps insignificant
//! differences from nagging the user on every entry.

use serde::{Deserialize, Serialize};

use fittrack_types::{BmiCategory, Gender};

use crate::metrics;

/// A pair of daily intake targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    /// Daily water target in millilitres.
    pub water_ml: i32,
    /// Daily calorie target.
    pub calories: i32,
}

/// Suggest daily targets from the BMI band and gender.
///
/// # Examples
///
/// ```
/// use fittrack_core::targets::suggest_targets;
/// use fittrack_types::Gender;
///
/// // BMI 22.9 is the Normal band.
/// let t = suggest_targets(70.0, 175, Gender::Male);
/// assert_eq!(t.water_ml, 2500);
/// assert_eq!(t.calories, 2200);
/// ```
#[must_use]
pub fn suggest_targets(weight_kg: f32, height_cm: i32, gender: Gender) -> Targets {
    let category = BmiCategory::from_bmi(metrics::bmi(weight_kg, height_cm));

    let water_ml = match category {
        BmiCategory::Underweight => 2000,
        BmiCategory::Normal => 2500,
        BmiCategory::Overweight => 3000,
        BmiCategory::Obese => 3500,
    };

    let calories = match (category, gender) {
        (BmiCategory::Underweight, Gender::Male) => 2500,
        (BmiCategory::Underweight, Gender::Female) => 2200,
        (BmiCategory::Normal, Gender::Male) => 2200,
        (BmiCategory::Normal, Gender::Female) => 1900,
        (BmiCategory::Overweight, Gender::Male) => 2000,
        (BmiCategory::Overweight, Gender::Female) => 1700,
        (BmiCategory::Obese, Gender::Male) => 1800,
        (BmiCategory::Obese, Gender::Female) => 1500,
    };

    Targets { water_ml, calories }
}

/// Minimum deltas a suggestion must reach before it is surfaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentThresholds {
    /// Minimum absolute water delta, in millilitres.
    pub water_ml: i32,
    /// Minimum absolute calorie delta.
    pub calories: i32,
}

impl Default for AdjustmentThresholds {
    fn default() -> Self {
        Self {
            water_ml: 500,
            calories: 250,
        }
    }
}

impl AdjustmentThresholds {
    /// True when the suggestion differs enough from the current targets
    /// to be worth surfacing: either delta at or above its threshold.
    #[must_use]
    pub fn is_significant(&self, current: Targets, suggested: Targets) -> bool {
        (suggested.water_ml - current.water_ml).abs() >= self.water_ml
            || (suggested.calories - current.calories).abs() >= self.calories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: Targets = Targets {
        water_ml: 2000,
        calories: 2000,
    };

    #[test]
    fn test_suggest_targets_underweight() {
        // 50 kg at 175 cm is BMI 16.3
        assert_eq!(
            suggest_targets(50.0, 175, Gender::Male),
            Targets {
                water_ml: 2000,
                calories: 2500
            }
        );
        assert_eq!(suggest_targets(50.0, 175, Gender::Female).calories, 2200);
    }

    #[test]
    fn test_suggest_targets_normal() {
        // 70 kg at 175 cm is BMI 22.9
        assert_eq!(
            suggest_targets(70.0, 175, Gender::Female),
            Targets {
                water_ml: 2500,
                calories: 1900
            }
        );
    }

    #[test]
    fn test_suggest_targets_overweight() {
        // 85 kg at 170 cm is BMI 29.4
        assert_eq!(
            suggest_targets(85.0, 170, Gender::Male),
            Targets {
                water_ml: 3000,
                calories: 2000
            }
        );
    }

    #[test]
    fn test_suggest_targets_obese() {
        // 100 kg at 170 cm is BMI 34.6
        assert_eq!(
            suggest_targets(100.0, 170, Gender::Female),
            Targets {
                water_ml: 3500,
                calories: 1500
            }
        );
    }

    #[test]
    fn test_adjustment_fires_at_water_threshold() {
        let thresholds = AdjustmentThresholds::default();
        let suggested = Targets {
            water_ml: 2500,
            calories: 2000,
        };
        assert!(thresholds.is_significant(CURRENT, suggested));
    }

    #[test]
    fn test_adjustment_quiet_below_both_thresholds() {
        let thresholds = AdjustmentThresholds::default();
        let suggested = Targets {
            water_ml: 2400,
            calories: 2100,
        };
        assert!(!thresholds.is_significant(CURRENT, suggested));
    }

    #[test]
    fn test_adjustment_fires_at_calorie_threshold() {
        let thresholds = AdjustmentThresholds::default();
        let suggested = Targets {
            water_ml: 2000,
            calories: 2250,
        };
        assert!(thresholds.is_significant(CURRENT, suggested));
    }

    #[test]
    fn test_adjustment_is_symmetric_in_direction() {
        let thresholds = AdjustmentThresholds::default();
        let lower = Targets {
            water_ml: 1500,
            calories: 2000,
        };
        assert!(thresholds.is_significant(CURRENT, lower));
    }
}
