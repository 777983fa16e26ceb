//! Visible date range and day-index arithmetic

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::model::Task;

/// Date window shown by the chart
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRange {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl TimelineRange {
    pub fn new(min_date: NaiveDate, max_date: NaiveDate) -> Self {
        Self { min_date, max_date }
    }

    /// Window derived from every start and end date in `tasks`.
    ///
    /// The earliest date is padded by `lead_padding_days` and the latest by
    /// `trail_padding_days`. Without any date the window runs from `today`
    /// for `default_window_months` calendar months.
    pub fn from_tasks(tasks: &[Task], today: NaiveDate, config: &LayoutConfig) -> Self {
        let dates: Vec<NaiveDate> = tasks
            .iter()
            .flat_map(|t| [t.start_date, t.end_date])
            .flatten()
            .collect();

        match (dates.iter().min(), dates.iter().max()) {
            (Some(&min), Some(&max)) => Self {
                min_date: shift_days(min, config.lead_padding_days.saturating_neg()),
                max_date: shift_days(max, config.trail_padding_days),
            },
            _ => Self::default_window(today, config.default_window_months),
        }
    }

    /// `today` to `today + months`, clamped to month end (Aug 31 + 6 = Feb 28/29)
    pub fn default_window(today: NaiveDate, months: u32) -> Self {
        let max_date = today
            .checked_add_months(Months::new(months))
            .unwrap_or_else(|| shift_days(today, i64::from(months) * 31));
        Self {
            min_date: today,
            max_date,
        }
    }

    /// Whole days from `min_date` to `date` (negative before the window)
    pub fn day_index(&self, date: NaiveDate) -> i64 {
        (date - self.min_date).num_days()
    }

    pub fn total_days(&self) -> i64 {
        (self.max_date - self.min_date).num_days().max(0)
    }

    /// Horizontal offset of `date` at the given day width
    pub fn x_for(&self, date: NaiveDate, day_width: f64) -> f64 {
        self.day_index(date) as f64 * day_width
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.min_date && date <= self.max_date
    }

    /// First day of each month inside the window, for header ticks
    pub fn month_starts(&self) -> Vec<NaiveDate> {
        let mut months = Vec::new();
        let Some(mut current) = self.min_date.with_day0(0) else {
            return months;
        };
        if current < self.min_date {
            current = match current.checked_add_months(Months::new(1)) {
                Some(next) => next,
                None => return months,
            };
        }
        while current <= self.max_date {
            months.push(current);
            match current.checked_add_months(Months::new(1)) {
                Some(next) => current = next,
                None => break,
            }
        }
        months
    }
}

/// Move `date` by `days`, saturating at the ends of the calendar
fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let saturated = if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX };
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(saturated)
}
