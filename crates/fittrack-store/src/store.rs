//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, info};

use fittrack_types::{CalorieEntry, WaterEntry, WeightEntry};

use crate::error::{Error, Result};
use crate::schema;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

fn date_to_sql(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap()
}

fn date_from_sql(text: &str) -> Date {
    Date::parse(text, DATE_FORMAT).unwrap()
}

/// SQLite-based store for fittrack entries and preferences.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

fn water_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WaterEntry> {
    Ok(WaterEntry {
        id: row.get(0)?,
        amount_ml: row.get(1)?,
        logged_at: OffsetDateTime::from_unix_timestamp(row.get(2)?).unwrap(),
        entry_date: date_from_sql(&row.get::<_, String>(3)?),
    })
}

fn calorie_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CalorieEntry> {
    Ok(CalorieEntry {
        id: row.get(0)?,
        calories: row.get(1)?,
        logged_at: OffsetDateTime::from_unix_timestamp(row.get(2)?).unwrap(),
        entry_date: date_from_sql(&row.get::<_, String>(3)?),
    })
}

fn weight_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WeightEntry> {
    Ok(WeightEntry {
        entry_date: date_from_sql(&row.get::<_, String>(0)?),
        weight_kg: row.get(1)?,
    })
}

// Water entry operations
impl Store {
    /// Append a water entry. Entries accumulate; nothing is replaced.
    pub fn insert_water(&self, entry: &WaterEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO water_entries (amount_ml, logged_at, entry_date) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                entry.amount_ml,
                entry.logged_at.unix_timestamp(),
                date_to_sql(entry.entry_date),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Water entries for one date, newest first.
    pub fn water_for_date(&self, date: Date) -> Result<Vec<WaterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount_ml, logged_at, entry_date FROM water_entries
             WHERE entry_date = ? ORDER BY logged_at DESC",
        )?;

        let entries = stmt
            .query_map([date_to_sql(date)], water_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Sum of water amounts for one date; `None` when no rows exist.
    pub fn water_total_for_date(&self, date: Date) -> Result<Option<i64>> {
        let total = self.conn.query_row(
            "SELECT SUM(amount_ml) FROM water_entries WHERE entry_date = ?",
            [date_to_sql(date)],
            |row| row.get::<_, Option<i64>>(0),
        )?;

        Ok(total)
    }

    /// All water entries, newest first.
    pub fn all_water(&self) -> Result<Vec<WaterEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, amount_ml, logged_at, entry_date FROM water_entries
             ORDER BY entry_date DESC, logged_at DESC",
        )?;

        let entries = stmt
            .query_map([], water_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete one water entry by row id. No-op if absent.
    pub fn delete_water(&self, entry: &WaterEntry) -> Result<()> {
        self.conn
            .execute("DELETE FROM water_entries WHERE id = ?", [entry.id])?;
        Ok(())
    }

    /// Delete all water entries for a date, returning the removed count.
    pub fn delete_water_by_date(&self, date: Date) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM water_entries WHERE entry_date = ?",
            [date_to_sql(date)],
        )?;
        Ok(deleted)
    }
}

// Calorie entry operations
impl Store {
    /// Append a calorie entry. Entries accumulate; nothing is replaced.
    pub fn insert_calories(&self, entry: &CalorieEntry) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO calorie_entries (calories, logged_at, entry_date) VALUES (?1, ?2, ?3)",
            rusqlite::params![
                entry.calories,
                entry.logged_at.unix_timestamp(),
                date_to_sql(entry.entry_date),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    /// Calorie entries for one date, newest first.
    pub fn calories_for_date(&self, date: Date) -> Result<Vec<CalorieEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, calories, logged_at, entry_date FROM calorie_entries
             WHERE entry_date = ? ORDER BY logged_at DESC",
        )?;

        let entries = stmt
            .query_map([date_to_sql(date)], calorie_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Sum of calories for one date; `None` when no rows exist.
    pub fn calorie_total_for_date(&self, date: Date) -> Result<Option<i64>> {
        let total = self.conn.query_row(
            "SELECT SUM(calories) FROM calorie_entries WHERE entry_date = ?",
            [date_to_sql(date)],
            |row| row.get::<_, Option<i64>>(0),
        )?;

        Ok(total)
    }

    /// All calorie entries, newest first.
    pub fn all_calories(&self) -> Result<Vec<CalorieEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, calories, logged_at, entry_date FROM calorie_entries
             ORDER BY entry_date DESC, logged_at DESC",
        )?;

        let entries = stmt
            .query_map([], calorie_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete one calorie entry by row id. No-op if absent.
    pub fn delete_calories(&self, entry: &CalorieEntry) -> Result<()> {
        self.conn
            .execute("DELETE FROM calorie_entries WHERE id = ?", [entry.id])?;
        Ok(())
    }

    /// Delete all calorie entries for a date, returning the removed count.
    pub fn delete_calories_by_date(&self, date: Date) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM calorie_entries WHERE entry_date = ?",
            [date_to_sql(date)],
        )?;
        Ok(deleted)
    }
}

// Weight entry operations
impl Store {
    /// Insert a weight measurement, replacing any existing row for the
    /// same date (upsert keyed on the calendar date).
    pub fn upsert_weight(&self, entry: &WeightEntry) -> Result<()> {
        self.conn.execute(
            "INSERT INTO weight_entries (entry_date, weight_kg) VALUES (?1, ?2)
             ON CONFLICT(entry_date) DO UPDATE SET weight_kg = ?2",
            rusqlite::params![date_to_sql(entry.entry_date), entry.weight_kg],
        )?;

        Ok(())
    }

    /// Most recent weight measurement by date.
    pub fn latest_weight(&self) -> Result<Option<WeightEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT entry_date, weight_kg FROM weight_entries
                 ORDER BY entry_date DESC LIMIT 1",
                [],
                weight_from_row,
            )
            .optional()?;

        Ok(entry)
    }

    /// Weight measurement for one date, if recorded.
    pub fn weight_for_date(&self, date: Date) -> Result<Option<WeightEntry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT entry_date, weight_kg FROM weight_entries WHERE entry_date = ?",
                [date_to_sql(date)],
                weight_from_row,
            )
            .optional()?;

        Ok(entry)
    }

    /// All weight measurements, newest first.
    pub fn all_weights(&self) -> Result<Vec<WeightEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT entry_date, weight_kg FROM weight_entries ORDER BY entry_date DESC",
        )?;

        let entries = stmt
            .query_map([], weight_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete the weight measurement for an entry's date. No-op if absent.
    pub fn delete_weight(&self, entry: &WeightEntry) -> Result<()> {
        self.delete_weight_by_date(entry.entry_date).map(|_| ())
    }

    /// Delete the weight measurement for a date, returning the removed count.
    pub fn delete_weight_by_date(&self, date: Date) -> Result<usize> {
        let deleted = self.conn.execute(
            "DELETE FROM weight_entries WHERE entry_date = ?",
            [date_to_sql(date)],
        )?;
        Ok(deleted)
    }
}

/// Outcome of the three-table day deletion.
///
/// The deletes run independently and are not atomic: a failure in one
/// table does not roll back the others, so each kind carries its own
/// result and callers can observe partial deletion.
#[derive(Debug)]
pub struct DayDeletion {
    /// Result of deleting the day's water entries (removed count).
    pub water: Result<usize>,
    /// Result of deleting the day's calorie entries (removed count).
    pub calories: Result<usize>,
    /// Result of deleting the day's weight row (removed count).
    pub weight: Result<usize>,
}

impl DayDeletion {
    /// True when all three deletes succeeded.
    #[must_use]
    pub fn fully_succeeded(&self) -> bool {
        self.water.is_ok() && self.calories.is_ok() && self.weight.is_ok()
    }
}

impl Store {
    /// Remove all entries of every kind for one date.
    ///
    /// Issues three independent deletes; see [`DayDeletion`].
    pub fn delete_day(&self, date: Date) -> DayDeletion {
        let deletion = DayDeletion {
            water: self.delete_water_by_date(date),
            calories: self.delete_calories_by_date(date),
            weight: self.delete_weight_by_date(date),
        };

        debug!(
            "Deleted day {}: water={:?} calories={:?} weight={:?}",
            date_to_sql(date),
            deletion.water.as_ref().ok(),
            deletion.calories.as_ref().ok(),
            deletion.weight.as_ref().ok(),
        );

        deletion
    }
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    #[test]
    fn test_open_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.all_water().unwrap().is_empty());
        assert!(store.all_weights().unwrap().is_empty());
    }

    #[test]
    fn test_open_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data.db");

        let store = Store::open(&path).unwrap();
        store
            .insert_water(&WaterEntry::new(250, datetime!(2024-01-05 8:00 UTC)))
            .unwrap();
        drop(store);

        // Reopen and confirm the row survived.
        let store = Store::open(&path).unwrap();
        assert_eq!(store.all_water().unwrap().len(), 1);
    }

    #[test]
    fn test_insert_and_query_water_by_date() {
        let store = Store::open_in_memory().unwrap();
        let id = store
            .insert_water(&WaterEntry::new(250, datetime!(2024-01-05 8:00 UTC)))
            .unwrap();
        store
            .insert_water(&WaterEntry::new(500, datetime!(2024-01-05 12:00 UTC)))
            .unwrap();
        store
            .insert_water(&WaterEntry::new(300, datetime!(2024-01-06 9:00 UTC)))
            .unwrap();

        assert!(id > 0);

        let entries = store.water_for_date(date!(2024 - 01 - 05)).unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].amount_ml, 500);
        assert_eq!(entries[1].amount_ml, 250);
        assert_eq!(entries[0].entry_date, date!(2024 - 01 - 05));
    }

    #[test]
    fn test_water_total_sums_corrections() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_water(&WaterEntry::new(500, datetime!(2024-01-05 8:00 UTC)))
            .unwrap();
        store
            .insert_water(&WaterEntry::new(-200, datetime!(2024-01-05 9:00 UTC)))
            .unwrap();

        let total = store.water_total_for_date(date!(2024 - 01 - 05)).unwrap();
        assert_eq!(total, Some(300));
    }

    #[test]
    fn test_totals_are_none_without_rows() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(
            store.water_total_for_date(date!(2024 - 01 - 05)).unwrap(),
            None
        );
        assert_eq!(
            store.calorie_total_for_date(date!(2024 - 01 - 05)).unwrap(),
            None
        );
    }

    #[test]
    fn test_all_water_ordering() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_water(&WaterEntry::new(100, datetime!(2024-01-04 10:00 UTC)))
            .unwrap();
        store
            .insert_water(&WaterEntry::new(200, datetime!(2024-01-06 10:00 UTC)))
            .unwrap();
        store
            .insert_water(&WaterEntry::new(300, datetime!(2024-01-05 10:00 UTC)))
            .unwrap();

        let all = store.all_water().unwrap();
        assert_eq!(
            all.iter().map(|e| e.amount_ml).collect::<Vec<_>>(),
            vec![200, 300, 100]
        );
    }

    #[test]
    fn test_delete_water_by_id_noop_when_absent() {
        let store = Store::open_in_memory().unwrap();
        let id = store
            .insert_water(&WaterEntry::new(250, datetime!(2024-01-05 8:00 UTC)))
            .unwrap();

        let mut entry = WaterEntry::new(250, datetime!(2024-01-05 8:00 UTC));
        entry.id = id;
        store.delete_water(&entry).unwrap();
        assert!(store.all_water().unwrap().is_empty());

        // Deleting again is a no-op.
        store.delete_water(&entry).unwrap();
    }

    #[test]
    fn test_insert_and_query_calories() {
        let store = Store::open_in_memory().unwrap();
        store
            .insert_calories(&CalorieEntry::new(650, datetime!(2024-01-05 13:00 UTC)))
            .unwrap();
        store
            .insert_calories(&CalorieEntry::new(400, datetime!(2024-01-05 19:00 UTC)))
            .unwrap();

        let total = store.calorie_total_for_date(date!(2024 - 01 - 05)).unwrap();
        assert_eq!(total, Some(1050));

        let entries = store.calories_for_date(date!(2024 - 01 - 05)).unwrap();
        assert_eq!(entries[0].calories, 400);
    }

    #[test]
    fn test_upsert_weight_replaces_same_date() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_weight(&WeightEntry::new(date!(2024 - 01 - 05), 80.0))
            .unwrap();
        store
            .upsert_weight(&WeightEntry::new(date!(2024 - 01 - 05), 79.2))
            .unwrap();

        let all = store.all_weights().unwrap();
        assert_eq!(all.len(), 1);
        assert!((all[0].weight_kg - 79.2).abs() < 1e-6);
    }

    #[test]
    fn test_latest_weight_by_date() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.latest_weight().unwrap().is_none());

        store
            .upsert_weight(&WeightEntry::new(date!(2024 - 01 - 07), 79.0))
            .unwrap();
        store
            .upsert_weight(&WeightEntry::new(date!(2024 - 01 - 03), 81.0))
            .unwrap();

        let latest = store.latest_weight().unwrap().unwrap();
        assert_eq!(latest.entry_date, date!(2024 - 01 - 07));
    }

    #[test]
    fn test_weight_for_date() {
        let store = Store::open_in_memory().unwrap();
        store
            .upsert_weight(&WeightEntry::new(date!(2024 - 01 - 05), 80.0))
            .unwrap();

        assert!(store.weight_for_date(date!(2024 - 01 - 05)).unwrap().is_some());
        assert!(store.weight_for_date(date!(2024 - 01 - 06)).unwrap().is_none());
    }

    #[test]
    fn test_delete_day_reports_per_kind_counts() {
        let store = Store::open_in_memory().unwrap();
        let day = date!(2024 - 01 - 05);
        store
            .insert_water(&WaterEntry::new(250, datetime!(2024-01-05 8:00 UTC)))
            .unwrap();
        store
            .insert_water(&WaterEntry::new(250, datetime!(2024-01-05 9:00 UTC)))
            .unwrap();
        store
            .insert_calories(&CalorieEntry::new(500, datetime!(2024-01-05 13:00 UTC)))
            .unwrap();
        store.upsert_weight(&WeightEntry::new(day, 80.0)).unwrap();

        // An entry on another day must survive.
        store
            .insert_water(&WaterEntry::new(100, datetime!(2024-01-06 8:00 UTC)))
            .unwrap();

        let deletion = store.delete_day(day);
        assert!(deletion.fully_succeeded());
        assert_eq!(deletion.water.unwrap(), 2);
        assert_eq!(deletion.calories.unwrap(), 1);
        assert_eq!(deletion.weight.unwrap(), 1);

        assert_eq!(store.all_water().unwrap().len(), 1);
        assert!(store.all_calories().unwrap().is_empty());
        assert!(store.all_weights().unwrap().is_empty());
    }

    #[test]
    fn test_delete_day_on_empty_store() {
        let store = Store::open_in_memory().unwrap();
        let deletion = store.delete_day(date!(2024 - 01 - 05));
        assert!(deletion.fully_succeeded());
        assert_eq!(deletion.water.unwrap(), 0);
    }

    #[test]
    fn test_timestamps_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let logged_at = datetime!(2024-01-05 8:30:15 UTC);
        store.insert_water(&WaterEntry::new(250, logged_at)).unwrap();

        let entries = store.water_for_date(date!(2024 - 01 - 05)).unwrap();
        assert_eq!(entries[0].logged_at, logged_at);
    }
}
