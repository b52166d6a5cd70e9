//! Core types for fittrack daily logs.

use core::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use time::{Date, OffsetDateTime};

use crate::error::ParseError;

/// User gender, as captured at onboarding.
///
/// Only the two values the recommendation formulas distinguish are
/// supported. Stored in preferences as the lowercase strings `"male"`
/// and `"female"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// The preference-store representation of this gender.
    ///
    /// # Examples
    ///
    /// ```
    /// use fittrack_types::Gender;
    ///
    /// assert_eq!(Gender::Male.as_str(), "male");
    /// assert_eq!(Gender::Female.as_str(), "female");
    /// ```
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = ParseError;

    /// Parse a gender string (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use fittrack_types::Gender;
    ///
    /// assert_eq!("male".parse(), Ok(Gender::Male));
    /// assert_eq!("Female".parse(), Ok(Gender::Female));
    /// assert!("other".parse::<Gender>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("male") {
            Ok(Gender::Male)
        } else if s.eq_ignore_ascii_case("female") {
            Ok(Gender::Female)
        } else {
            Err(ParseError::UnknownGender(s.to_string()))
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display unit for body weight.
///
/// A label only: weights are always stored in kilograms and no numeric
/// conversion is applied anywhere in the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WeightUnit {
    /// Kilograms.
    #[default]
    Kg,
    /// Pounds.
    Lbs,
}

impl WeightUnit {
    /// The preference-store representation of this unit.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

impl FromStr for WeightUnit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("kg") {
            Ok(WeightUnit::Kg)
        } else if s.eq_ignore_ascii_case("lbs") {
            Ok(WeightUnit::Lbs)
        } else {
            Err(ParseError::UnknownWeightUnit(s.to_string()))
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body Mass Index category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BmiCategory {
    /// BMI below 18.5.
    Underweight,
    /// BMI from 18.5 up to (but not including) 25.
    Normal,
    /// BMI from 25 up to (but not including) 30.
    Overweight,
    /// BMI of 30 or above.
    Obese,
}

impl BmiCategory {
    /// Categorize a BMI value.
    ///
    /// Each boundary belongs to the category above it: 18.5 is Normal,
    /// 25.0 is Overweight, 30.0 is Obese.
    ///
    /// # Examples
    ///
    /// ```
    /// use fittrack_types::BmiCategory;
    ///
    /// assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
    /// assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
    /// ```
    #[must_use]
    pub fn from_bmi(bmi: f32) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmiCategory::Underweight => write!(f, "Underweight"),
            BmiCategory::Normal => write!(f, "Normal"),
            BmiCategory::Overweight => write!(f, "Overweight"),
            BmiCategory::Obese => write!(f, "Obese"),
        }
    }
}

/// A single logged water intake.
///
/// Entries accumulate: several per day are expected, and a negative
/// `amount_ml` records a correction against earlier entries of the same
/// day. Immutable once created except for deletion.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WaterEntry {
    /// Row id assigned by the store (0 until persisted).
    pub id: i64,
    /// Amount in millilitres. May be negative for corrections.
    pub amount_ml: i32,
    /// When the entry was logged.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub logged_at: OffsetDateTime,
    /// Calendar date of `logged_at`, stored redundantly for date queries.
    pub entry_date: Date,
}

impl WaterEntry {
    /// Create an unsaved entry; the date is derived from the timestamp.
    #[must_use]
    pub fn new(amount_ml: i32, logged_at: OffsetDateTime) -> Self {
        Self {
            id: 0,
            amount_ml,
            logged_at,
            entry_date: logged_at.date(),
        }
    }
}

/// A single logged calorie intake.
///
/// Same lifecycle shape as [`WaterEntry`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalorieEntry {
    /// Row id assigned by the store (0 until persisted).
    pub id: i64,
    /// Calories. May be negative for corrections.
    pub calories: i32,
    /// When the entry was logged.
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub logged_at: OffsetDateTime,
    /// Calendar date of `logged_at`, stored redundantly for date queries.
    pub entry_date: Date,
}

impl CalorieEntry {
    /// Create an unsaved entry; the date is derived from the timestamp.
    #[must_use]
    pub fn new(calories: i32, logged_at: OffsetDateTime) -> Self {
        Self {
            id: 0,
            calories,
            logged_at,
            entry_date: logged_at.date(),
        }
    }
}

/// A body weight measurement.
///
/// At most one entry per calendar date; inserting for an existing date
/// replaces the prior value (upsert), unlike the accumulating water and
/// calorie entries.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeightEntry {
    /// Calendar date of the measurement (unique key).
    pub entry_date: Date,
    /// Weight in kilograms.
    pub weight_kg: f32,
}

impl WeightEntry {
    /// Create a weight measurement for a date.
    #[must_use]
    pub fn new(entry_date: Date, weight_kg: f32) -> Self {
        Self {
            entry_date,
            weight_kg,
        }
    }
}
