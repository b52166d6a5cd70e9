//! Daily history reconstruction.
//!
//! Turns the raw entry collections into a contiguous, gap-filled,
//! reverse-chronological sequence of per-day summaries. Days without
//! data appear with zero totals so consecutive days stay comparable.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::Date;

use fittrack_types::{CalorieEntry, WaterEntry, WeightEntry};

/// Totals and weight movement for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    /// The calendar day.
    pub date: Date,
    /// Sum of the day's water entries, floored at zero.
    pub water_total_ml: i32,
    /// Sum of the day's calorie entries, floored at zero.
    pub calorie_total: i32,
    /// Weight recorded on this exact date, if any.
    pub weight_kg: Option<f32>,
    /// Difference to the nearest earlier day with a recorded weight.
    pub weight_change_from_previous: Option<f32>,
    /// Difference to the earliest recorded weight in the range.
    pub weight_change_from_first: Option<f32>,
    /// Itemized water entries; populated only when `is_today`.
    pub water_entries: Vec<WaterEntry>,
    /// Itemized calorie entries; populated only when `is_today`.
    pub calorie_entries: Vec<CalorieEntry>,
    /// Whether this day is the current date.
    pub is_today: bool,
    /// True when no entry of any kind exists for this date.
    pub is_empty: bool,
}

/// Sum of a day's water amounts, floored at zero.
///
/// Negative entries are corrections; the floor keeps a day total from
/// ever reading below zero.
#[must_use]
pub fn water_total_for(entries: &[WaterEntry], date: Date) -> i32 {
    entries
        .iter()
        .filter(|e| e.entry_date == date)
        .map(|e| e.amount_ml)
        .sum::<i32>()
        .max(0)
}

/// Sum of a day's calorie amounts, floored at zero.
#[must_use]
pub fn calorie_total_for(entries: &[CalorieEntry], date: Date) -> i32 {
    entries
        .iter()
        .filter(|e| e.entry_date == date)
        .map(|e| e.calories)
        .sum::<i32>()
        .max(0)
}

/// Rebuild the full daily history from raw entries, newest first.
///
/// Every calendar date between the oldest and newest entry (of any
/// kind) appears exactly once. Weight deltas compare against the
/// nearest earlier day that has a weight, and against the earliest
/// recorded weight in the range; both are `None` when either side is
/// missing. Only the `today` item carries its itemized entries.
///
/// A pure function of its inputs: recomputing from unchanged data
/// yields an identical sequence.
#[must_use]
pub fn build_daily_history(
    water: &[WaterEntry],
    calories: &[CalorieEntry],
    weights: &[WeightEntry],
    today: Date,
) -> Vec<DaySummary> {
    let mut dates_with_data: HashSet<Date> = HashSet::new();
    dates_with_data.extend(water.iter().map(|e| e.entry_date));
    dates_with_data.extend(calories.iter().map(|e| e.entry_date));
    dates_with_data.extend(weights.iter().map(|e| e.entry_date));

    let (Some(&oldest), Some(&newest)) = (
        dates_with_data.iter().min(),
        dates_with_data.iter().max(),
    ) else {
        return Vec::new();
    };

    // Every date in [oldest, newest], newest first.
    let mut dates = Vec::new();
    let mut current = oldest;
    loop {
        dates.push(current);
        if current == newest {
            break;
        }
        match current.next_day() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates.reverse();

    let first_weight = weights
        .iter()
        .min_by_key(|e| e.entry_date)
        .map(|e| e.weight_kg);

    dates
        .into_iter()
        .map(|date| {
            let weight_kg = weights
                .iter()
                .find(|e| e.entry_date == date)
                .map(|e| e.weight_kg);

            // Nearest earlier day with a recorded weight, not necessarily date - 1.
            let previous_weight = weights
                .iter()
                .filter(|e| e.entry_date < date)
                .max_by_key(|e| e.entry_date)
                .map(|e| e.weight_kg);

            let is_today = date == today;
            let water_entries: Vec<WaterEntry> = if is_today {
                water.iter().filter(|e| e.entry_date == date).cloned().collect()
            } else {
                Vec::new()
            };
            let calorie_entries: Vec<CalorieEntry> = if is_today {
                calories.iter().filter(|e| e.entry_date == date).cloned().collect()
            } else {
                Vec::new()
            };

            DaySummary {
                date,
                water_total_ml: water_total_for(water, date),
                calorie_total: calorie_total_for(calories, date),
                weight_kg,
                weight_change_from_previous: match (weight_kg, previous_weight) {
                    (Some(current), Some(previous)) => Some(current - previous),
                    _ => None,
                },
                weight_change_from_first: match (weight_kg, first_weight) {
                    (Some(current), Some(first)) => Some(current - first),
                    _ => None,
                },
                water_entries,
                calorie_entries,
                is_today,
                is_empty: !dates_with_data.contains(&date),
            }
        })
        .collect()
}
