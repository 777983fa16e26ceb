//! Layout engine
//!
//! Row slots are fixed: a row's top is always `sequence_index * row_height`,
//! collapsed or not. Collapse only flips the `visible` flag, so the
//! coordinate space never shifts and connectors can be regenerated from
//! the geometry alone.

use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::model::{index_by_id, Task};
use crate::timeline::TimelineRange;
use crate::visibility::VisibilityState;

/// Horizontal extent of a task bar
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    /// Day index of the bar's first day
    pub start_day: i64,
    /// Length in days, inclusive of both endpoints, never below 1
    pub duration_days: i64,
    pub left: f64,
    pub width: f64,
    /// Drawn from a single date with the default length (`no-dates` styling)
    pub placeholder: bool,
}

impl BarGeometry {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Geometry of one row
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowGeometry {
    pub sequence_index: usize,
    pub row_top: f64,
    /// `None` when the task has neither date
    pub bar: Option<BarGeometry>,
    pub visible: bool,
}

/// Full chart geometry for one task list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub timeline: TimelineRange,
    pub row_height: f64,
    pub day_width: f64,
    pub rows: Vec<RowGeometry>,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl ChartLayout {
    pub fn row(&self, sequence_index: usize) -> Option<&RowGeometry> {
        self.rows.get(sequence_index)
    }

    /// Vertical center of a row slot
    pub fn row_center(&self, sequence_index: usize) -> f64 {
        sequence_index as f64 * self.row_height + self.row_height / 2.0
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &RowGeometry> {
        self.rows.iter().filter(|r| r.visible)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Recompute visibility flags only; slots and bars are left untouched
    pub fn apply_visibility(&mut self, tasks: &[Task], visibility: &VisibilityState, config: &LayoutConfig) {
        let by_id = index_by_id(tasks);
        for (row, task) in self.rows.iter_mut().zip(tasks) {
            row.visible = visibility.is_row_visible(task, tasks, &by_id, config.collapse_strategy);
        }
    }
}

/// Bar for a single task, or `None` when it has no date at all.
///
/// - both dates: spans start..=end (at least one day)
/// - start only: `placeholder_days` from the start
/// - end only: `placeholder_days` ending at the end date's index
pub fn bar_geometry(task: &Task, timeline: &TimelineRange, config: &LayoutConfig) -> Option<BarGeometry> {
    let (start_day, duration_days, placeholder) = match (task.start_date, task.end_date) {
        (Some(start), Some(end)) => {
            let span = (end - start).num_days() + 1;
            (timeline.day_index(start), span.max(1), false)
        }
        (Some(start), None) => (timeline.day_index(start), config.placeholder_days, true),
        (None, Some(end)) => (
            timeline.day_index(end).saturating_sub(config.placeholder_days),
            config.placeholder_days,
            true,
        ),
        (None, None) => return None,
    };

    Some(BarGeometry {
        start_day,
        duration_days,
        left: start_day as f64 * config.day_width,
        width: duration_days as f64 * config.day_width,
        placeholder,
    })
}

/// Lay out every task against `timeline`
pub fn compute_layout(
    tasks: &[Task],
    timeline: &TimelineRange,
    visibility: &VisibilityState,
    config: &LayoutConfig,
) -> ChartLayout {
    let by_id = index_by_id(tasks);

    let rows = tasks
        .iter()
        .map(|task| RowGeometry {
            sequence_index: task.sequence_index,
            row_top: task.sequence_index as f64 * config.row_height,
            bar: bar_geometry(task, timeline, config),
            visible: visibility.is_row_visible(task, tasks, &by_id, config.collapse_strategy),
        })
        .collect();

    ChartLayout {
        timeline: *timeline,
        row_height: config.row_height,
        day_width: config.day_width,
        rows,
        canvas_width: timeline.total_days() as f64 * config.day_width,
        canvas_height: tasks.len() as f64 * config.row_height,
    }
}
