//! Metrics and aggregation engine for the fittrack daily log.
//!
//! This crate holds everything with actual logic in it and nothing
//! else: the body-metric formulas behind onboarding recommendations,
//! the BMI-banded target suggestions, the daily history and weekly
//! weight aggregation, ordered form validation, and the data-change
//! event bus the view models react to.
//!
//! Everything here is a pure function of its inputs; persistence lives
//! in `fittrack-store` and orchestration in `fittrack-app`.
//!
//! # Example
//!
//! ```
//! use fittrack_core::{metrics, targets::suggest_targets};
//! use fittrack_types::{BmiCategory, Gender};
//!
//! let bmi = metrics::bmi(70.0, 175);
//! assert_eq!(BmiCategory::from_bmi(bmi), BmiCategory::Normal);
//!
//! let suggestion = suggest_targets(70.0, 175, Gender::Male);
//! assert_eq!(suggestion.water_ml, 2500);
//! ```

pub mod events;
pub mod history;
pub mod metrics;
pub mod targets;
pub mod validation;
pub mod weekly;

pub use events::{DataEvent, EventBus, EventReceiver, EventSender};
pub use history::{DaySummary, build_daily_history};
pub use targets::{AdjustmentThresholds, Targets, suggest_targets};
pub use validation::{
    Backfill, BackfillDraft, BackfillError, Goals, GoalsDraft, GoalsError, Profile, ProfileDraft,
    ProfileError, validate_backfill, validate_goals, validate_profile,
};
pub use weekly::{WeeklyWeight, build_weekly_weights, week_start};
