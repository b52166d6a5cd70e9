//! Weekly weight aggregation.
//!
//! Weeks start on Monday and span seven days. Buckets exist only for
//! weeks that contain at least one measurement; unlike the daily
//! history there is no gap-filling, so adjacent buckets in the output
//! are compared even when calendar weeks between them are empty.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use fittrack_types::WeightEntry;

/// Monday of the week containing `date` (previous-or-same Monday).
///
/// # Examples
///
/// ```
/// use fittrack_core::weekly::week_start;
/// use time::macros::date;
///
/// // Wednesday maps back to Monday; Monday maps to itself.
/// assert_eq!(week_start(date!(2024 - 01 - 03)), date!(2024 - 01 - 01));
/// assert_eq!(week_start(date!(2024 - 01 - 08)), date!(2024 - 01 - 08));
/// ```
#[must_use]
pub fn week_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// Average weight and week-over-week movement for one Monday-started week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyWeight {
    /// Monday of the week.
    pub week_start: Date,
    /// Sunday of the week (`week_start + 6`).
    pub week_end: Date,
    /// Mean of the measurements falling in the week, if any.
    pub average_weight_kg: Option<f32>,
    /// Previous bucket's average minus this one (positive = loss).
    pub weight_change_kg: Option<f32>,
}

/// Bucket weight entries into Monday-started weeks, newest first.
#[must_use]
pub fn build_weekly_weights(weights: &[WeightEntry]) -> Vec<WeeklyWeight> {
    let mut starts: Vec<Date> = weights.iter().map(|e| week_start(e.entry_date)).collect();
    starts.sort_unstable();
    starts.dedup();
    starts.reverse();

    let average_for = |start: Date| -> Option<f32> {
        let end = start + Duration::days(6);
        let values: Vec<f32> = weights
            .iter()
            .filter(|e| e.entry_date >= start && e.entry_date <= end)
            .map(|e| e.weight_kg)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f32>() / values.len() as f32)
        }
    };

    starts
        .iter()
        .enumerate()
        .map(|(index, &start)| {
            let average = average_for(start);
            let previous = starts.get(index + 1).and_then(|&s| average_for(s));
            WeeklyWeight {
                week_start: start,
                week_end: start + Duration::days(6),
                average_weight_kg: average,
                weight_change_kg: match (average, previous) {
                    (Some(avg), Some(prev)) => Some(prev - avg),
                    _ => None,
                },
            }
        })
        .collect()
}
