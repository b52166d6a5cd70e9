//! Typed preference accessors over the key-value table.
//!
//! Every getter carries a hard-coded default so a fresh database (or a
//! value that fails to parse back) behaves like first launch rather
//! than erroring.

use rusqlite::OptionalExtension;
use tracing::debug;

use fittrack_types::{Gender, WeightUnit};

use crate::error::Result;
use crate::store::Store;

/// Default daily water target in millilitres.
pub const DEFAULT_WATER_TARGET_ML: i32 = 2000;

/// Default daily calorie target.
pub const DEFAULT_CALORIE_TARGET: i32 = 2000;

/// Default height in centimetres.
pub const DEFAULT_HEIGHT_CM: i32 = 170;

/// Default goal weight in kilograms.
pub const DEFAULT_TARGET_WEIGHT_KG: f32 = 70.0;

mod keys {
    pub const IS_FIRST_LAUNCH: &str = "is_first_launch";
    pub const WATER_TARGET_ML: &str = "water_target_ml";
    pub const CALORIE_TARGET: &str = "calorie_target";
    pub const WEIGHT_UNIT: &str = "weight_unit";
    pub const HEIGHT_CM: &str = "height_cm";
    pub const GENDER: &str = "gender";
    pub const TARGET_WEIGHT_KG: &str = "target_weight_kg";
    pub const IS_DARK_MODE: &str = "is_dark_mode";
    pub const USER_NAME: &str = "user_name";
}

impl Store {
    fn pref(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    fn set_pref(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            [key, value],
        )?;

        debug!("Preference {} set", key);
        Ok(())
    }

    fn pref_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T> {
        Ok(self
            .pref(key)?
            .and_then(|v| v.parse().ok())
            .unwrap_or(default))
    }

    /// Whether onboarding has not been completed yet. Defaults to true.
    pub fn is_first_launch(&self) -> Result<bool> {
        self.pref_parsed(keys::IS_FIRST_LAUNCH, true)
    }

    /// Mark onboarding as completed.
    pub fn set_first_launch_completed(&self) -> Result<()> {
        self.set_pref(keys::IS_FIRST_LAUNCH, "false")
    }

    /// Daily water target in millilitres.
    pub fn water_target_ml(&self) -> Result<i32> {
        self.pref_parsed(keys::WATER_TARGET_ML, DEFAULT_WATER_TARGET_ML)
    }

    /// Set the daily water target.
    pub fn set_water_target_ml(&self, target_ml: i32) -> Result<()> {
        self.set_pref(keys::WATER_TARGET_ML, &target_ml.to_string())
    }

    /// Daily calorie target.
    pub fn calorie_target(&self) -> Result<i32> {
        self.pref_parsed(keys::CALORIE_TARGET, DEFAULT_CALORIE_TARGET)
    }

    /// Set the daily calorie target.
    pub fn set_calorie_target(&self, target: i32) -> Result<()> {
        self.set_pref(keys::CALORIE_TARGET, &target.to_string())
    }

    /// Display unit for body weight. Defaults to kilograms.
    pub fn weight_unit(&self) -> Result<WeightUnit> {
        self.pref_parsed(keys::WEIGHT_UNIT, WeightUnit::Kg)
    }

    /// Set the weight display unit.
    pub fn set_weight_unit(&self, unit: WeightUnit) -> Result<()> {
        self.set_pref(keys::WEIGHT_UNIT, unit.as_str())
    }

    /// Height in centimetres.
    pub fn height_cm(&self) -> Result<i32> {
        self.pref_parsed(keys::HEIGHT_CM, DEFAULT_HEIGHT_CM)
    }

    /// Set the height.
    pub fn set_height_cm(&self, height_cm: i32) -> Result<()> {
        self.set_pref(keys::HEIGHT_CM, &height_cm.to_string())
    }

    /// User gender. Defaults to male.
    pub fn gender(&self) -> Result<Gender> {
        self.pref_parsed(keys::GENDER, Gender::Male)
    }

    /// Set the gender.
    pub fn set_gender(&self, gender: Gender) -> Result<()> {
        self.set_pref(keys::GENDER, gender.as_str())
    }

    /// Goal weight in kilograms.
    pub fn target_weight_kg(&self) -> Result<f32> {
        self.pref_parsed(keys::TARGET_WEIGHT_KG, DEFAULT_TARGET_WEIGHT_KG)
    }

    /// Set the goal weight.
    pub fn set_target_weight_kg(&self, weight_kg: f32) -> Result<()> {
        self.set_pref(keys::TARGET_WEIGHT_KG, &weight_kg.to_string())
    }

    /// Whether the dark theme is active. Defaults to true.
    pub fn is_dark_mode(&self) -> Result<bool> {
        self.pref_parsed(keys::IS_DARK_MODE, true)
    }

    /// Set the dark theme flag.
    pub fn set_dark_mode(&self, dark: bool) -> Result<()> {
        self.set_pref(keys::IS_DARK_MODE, if dark { "true" } else { "false" })
    }

    /// Display name. Defaults to empty.
    pub fn user_name(&self) -> Result<String> {
        Ok(self.pref(keys::USER_NAME)?.unwrap_or_default())
    }

    /// Set the display name.
    pub fn set_user_name(&self, name: &str) -> Result<()> {
        self.set_pref(keys::USER_NAME, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_on_fresh_database() {
        let store = Store::open_in_memory().unwrap();

        assert!(store.is_first_launch().unwrap());
        assert_eq!(store.water_target_ml().unwrap(), 2000);
        assert_eq!(store.calorie_target().unwrap(), 2000);
        assert_eq!(store.weight_unit().unwrap(), WeightUnit::Kg);
        assert_eq!(store.height_cm().unwrap(), 170);
        assert_eq!(store.gender().unwrap(), Gender::Male);
        assert!((store.target_weight_kg().unwrap() - 70.0).abs() < f32::EPSILON);
        assert!(store.is_dark_mode().unwrap());
        assert_eq!(store.user_name().unwrap(), "");
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let store = Store::open_in_memory().unwrap();

        store.set_water_target_ml(2750).unwrap();
        store.set_calorie_target(2100).unwrap();
        store.set_weight_unit(WeightUnit::Lbs).unwrap();
        store.set_height_cm(182).unwrap();
        store.set_gender(Gender::Female).unwrap();
        store.set_target_weight_kg(64.5).unwrap();
        store.set_dark_mode(false).unwrap();
        store.set_user_name("Alex").unwrap();

        assert_eq!(store.water_target_ml().unwrap(), 2750);
        assert_eq!(store.calorie_target().unwrap(), 2100);
        assert_eq!(store.weight_unit().unwrap(), WeightUnit::Lbs);
        assert_eq!(store.height_cm().unwrap(), 182);
        assert_eq!(store.gender().unwrap(), Gender::Female);
        assert!((store.target_weight_kg().unwrap() - 64.5).abs() < 1e-6);
        assert!(!store.is_dark_mode().unwrap());
        assert_eq!(store.user_name().unwrap(), "Alex");
    }

    #[test]
    fn test_overwrite_replaces_value() {
        let store = Store::open_in_memory().unwrap();
        store.set_water_target_ml(2500).unwrap();
        store.set_water_target_ml(3000).unwrap();
        assert_eq!(store.water_target_ml().unwrap(), 3000);
    }

    #[test]
    fn test_first_launch_flag_flip() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.is_first_launch().unwrap());

        store.set_first_launch_completed().unwrap();
        assert!(!store.is_first_launch().unwrap());
    }

    #[test]
    fn test_unparseable_value_falls_back_to_default() {
        let store = Store::open_in_memory().unwrap();
        store.set_pref(super::keys::WATER_TARGET_ML, "plenty").unwrap();
        assert_eq!(store.water_target_ml().unwrap(), 2000);

        store.set_pref(super::keys::GENDER, "unknown").unwrap();
        assert_eq!(store.gender().unwrap(), Gender::Male);
    }
}
