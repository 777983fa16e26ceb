//! Task records and the recognized spreadsheet columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identifier of a task as written in the sheet's `ID` column
pub type TaskId = String;

/// Remaining-days threshold (inclusive) under which a task is due soon
pub const DUE_SOON_DAYS: i64 = 3;

// ============================================================================
// Columns
// ============================================================================

/// Header labels the builder recognizes, matched by exact string
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Level,
    Id,
    TaskName,
    Description,
    StartDate,
    EndDate,
    Days,
    Remaining,
    AssignedTo,
    Dependencies,
    Status,
    Type,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Level,
        Column::Id,
        Column::TaskName,
        Column::Description,
        Column::StartDate,
        Column::EndDate,
        Column::Days,
        Column::Remaining,
        Column::AssignedTo,
        Column::Dependencies,
        Column::Status,
        Column::Type,
    ];

    /// The header label as it must appear in the sheet
    pub fn label(&self) -> &'static str {
        match self {
            Column::Level => "Level",
            Column::Id => "ID",
            Column::TaskName => "Task Name",
            Column::Description => "Descripción",
            Column::StartDate => "Start Date",
            Column::EndDate => "End Date",
            Column::Days => "Días",
            Column::Remaining => "Restante",
            Column::AssignedTo => "Assigned To",
            Column::Dependencies => "Dependencies",
            Column::Status => "Status",
            Column::Type => "Type",
        }
    }

    /// Exact-match lookup; no trimming or case folding
    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.label() == header)
    }
}

// ============================================================================
// Task
// ============================================================================

/// Row kind, read from the free-text `Type` column
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskType {
    Project,
    Task,
    Subtask,
    Other(String),
    #[default]
    Unspecified,
}

impl TaskType {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_lowercase().as_str() {
            "" => TaskType::Unspecified,
            "project" | "proyecto" => TaskType::Project,
            "task" | "tarea" => TaskType::Task,
            "subtask" | "sub-task" | "sub task" | "subtarea" => TaskType::Subtask,
            _ => TaskType::Other(trimmed.to_string()),
        }
    }

    /// CSS-friendly class name used by render surfaces
    pub fn css_class(&self) -> &'static str {
        match self {
            TaskType::Project => "project",
            TaskType::Task => "task",
            TaskType::Subtask => "subtask",
            TaskType::Other(_) | TaskType::Unspecified => "other",
        }
    }
}

/// Deadline classification from the `Restante` column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DueState {
    Overdue,
    DueSoon,
    Normal,
}

impl DueState {
    pub fn from_remaining(days: i64) -> Self {
        if days < 0 {
            DueState::Overdue
        } else if days <= DUE_SOON_DAYS {
            DueState::DueSoon
        } else {
            DueState::Normal
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            DueState::Overdue => "overdue",
            DueState::DueSoon => "due-soon",
            DueState::Normal => "on-time",
        }
    }
}

/// One spreadsheet row
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Sheet identifier; empty for malformed rows
    pub id: TaskId,
    /// Indentation depth (0 = top)
    pub level: u32,
    pub name: String,
    pub task_type: TaskType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Declared duration; not reconciled with the dates
    pub duration_days: Option<i64>,
    pub remaining_days: Option<i64>,
    pub assigned_to: Option<String>,
    /// Free-text predecessor references
    pub dependencies: Option<String>,
    pub status: Option<String>,
    pub description: Option<String>,
    /// Original row order and vertical slot
    pub sequence_index: usize,
    /// Nearest preceding Project row; `None` for Projects themselves
    pub project_id: Option<TaskId>,
    /// For Project rows: nearest preceding Project with a smaller level
    pub parent_project_id: Option<TaskId>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_project(&self) -> bool {
        self.task_type == TaskType::Project
    }

    /// Rows without an id cannot be targeted by dependencies or toggles
    pub fn is_referenceable(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn has_any_date(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    pub fn due_state(&self) -> Option<DueState> {
        self.remaining_days.map(DueState::from_remaining)
    }
}

/// Map each referenceable id to the index of the first task carrying it
pub fn index_by_id(tasks: &[Task]) -> HashMap<&str, usize> {
    let mut index = HashMap::with_capacity(tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        if task.is_referenceable() {
            index.entry(task.id.as_str()).or_insert(i);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_match_exactly() {
        assert_eq!(Column::from_header("Task Name"), Some(Column::TaskName));
        assert_eq!(Column::from_header("Descripción"), Some(Column::Description));
        assert_eq!(Column::from_header("task name"), None);
        assert_eq!(Column::from_header(" ID"), None);
    }

    #[test]
    fn task_type_parsing() {
        assert_eq!(TaskType::parse("Project"), TaskType::Project);
        assert_eq!(TaskType::parse(" proyecto "), TaskType::Project);
        assert_eq!(TaskType::parse("SUBTASK"), TaskType::Subtask);
        assert_eq!(TaskType::parse(""), TaskType::Unspecified);
        assert_eq!(TaskType::parse("Milestone"), TaskType::Other("Milestone".into()));
    }

    #[test]
    fn due_state_thresholds() {
        assert_eq!(DueState::from_remaining(-1), DueState::Overdue);
        assert_eq!(DueState::from_remaining(0), DueState::DueSoon);
        assert_eq!(DueState::from_remaining(3), DueState::DueSoon);
        assert_eq!(DueState::from_remaining(4), DueState::Normal);
    }

    #[test]
    fn index_keeps_first_occurrence_and_skips_empty_ids() {
        let tasks = vec![
            Task::new("1", "a"),
            Task::new("", "malformed"),
            Task::new("1", "duplicate"),
        ];
        let index = index_by_id(&tasks);
        assert_eq!(index.get("1"), Some(&0));
        assert_eq!(index.len(), 1);
    }
}
