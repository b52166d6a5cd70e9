//! Shared data types for the fittrack daily log.
//!
//! This crate provides the plain records and small enums used by every
//! other fittrack crate: the three entry kinds (water, calorie, weight),
//! the string-encoded preference enums, and the BMI category scale.
//!
//! # Features
//!
//! - Entry records with the date/timestamp invariant enforced at creation
//! - `Gender` / `WeightUnit` with their preference-store string forms
//! - `BmiCategory` banding
//! - Error types for parsing string-encoded values
//!
//! # Example
//!
//! ```
//! use fittrack_types::{BmiCategory, Gender};
//!
//! let gender: Gender = "female".parse().unwrap();
//! assert_eq!(gender.as_str(), "female");
//! assert_eq!(BmiCategory::from_bmi(22.0), BmiCategory::Normal);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{BmiCategory, CalorieEntry, Gender, WaterEntry, WeightEntry, WeightUnit};
