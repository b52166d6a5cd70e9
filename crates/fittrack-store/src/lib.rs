//! Local SQLite persistence for fittrack entries and preferences.
//!
//! This crate provides the durable side of the tracker: three entry
//! tables (water and calorie logs append; the weight table upserts on
//! its date key) and a key-value preferences table with typed
//! accessors.
//!
//! # Features
//!
//! - Append water/calorie entries, upsert weight by date
//! - Query by date, daily totals via SQL aggregates, full dumps
//! - Per-kind and whole-day deletes with observable partial failure
//! - Typed preferences with first-launch defaults
//!
//! # Example
//!
//! ```no_run
//! use fittrack_store::Store;
//! use fittrack_types::WaterEntry;
//! use time::OffsetDateTime;
//!
//! let store = Store::open_default()?;
//! store.insert_water(&WaterEntry::new(250, OffsetDateTime::now_utc()))?;
//! let target = store.water_target_ml()?;
//! # Ok::<(), fittrack_store::Error>(())
//! ```

mod error;
mod prefs;
mod schema;
mod store;

pub use error::{Error, Result};
pub use prefs::{
    DEFAULT_CALORIE_TARGET, DEFAULT_HEIGHT_CM, DEFAULT_TARGET_WEIGHT_KG, DEFAULT_WATER_TARGET_ML,
};
pub use store::{DayDeletion, Store};

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/fittrack/data.db`
/// - macOS: `~/Library/Application Support/fittrack/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\fittrack\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("fittrack")
        .join("data.db")
}
