//! Task model builder
//!
//! Converts the reader's cell grid (row 0 = headers) into an ordered task
//! list with project linkage, and seeds the visibility map with every
//! project expanded. Nothing here fails: unknown or missing columns yield
//! default values and blank rows are skipped.

use std::collections::HashMap;
use tracing::{debug, trace};

use crate::cell::Cell;
use crate::model::{Column, Task, TaskType};
use crate::visibility::VisibilityState;

static EMPTY_CELL: Cell = Cell::Empty;

/// Result of building a document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltDocument {
    pub tasks: Vec<Task>,
    pub visibility: VisibilityState,
}

/// Header position of each recognized column (first occurrence wins)
#[derive(Debug, Default)]
struct ColumnMap {
    positions: HashMap<Column, usize>,
}

impl ColumnMap {
    fn from_header(header: &[Cell]) -> Self {
        let mut positions = HashMap::new();
        for (i, cell) in header.iter().enumerate() {
            let label = match cell {
                Cell::Text(s) => s.as_str(),
                _ => continue,
            };
            match Column::from_header(label) {
                Some(column) => {
                    positions.entry(column).or_insert(i);
                }
                None => debug!(header = label, "ignoring unrecognized column"),
            }
        }
        Self { positions }
    }

    fn cell<'a>(&self, row: &'a [Cell], column: Column) -> &'a Cell {
        self.positions
            .get(&column)
            .and_then(|&i| row.get(i))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// Build the task list from a cell grid whose first row holds the headers
pub fn build_tasks(rows: &[Vec<Cell>]) -> BuiltDocument {
    let Some((header, data)) = rows.split_first() else {
        debug!("empty document, no header row");
        return BuiltDocument::default();
    };

    let columns = ColumnMap::from_header(header);
    let mut tasks: Vec<Task> = Vec::with_capacity(data.len());
    let mut visibility = VisibilityState::new();

    for (row_number, row) in data.iter().enumerate() {
        if row.iter().all(Cell::is_blank) {
            trace!(row = row_number + 1, "skipping blank row");
            continue;
        }

        let task = build_task(&columns, row, tasks.len(), &tasks);
        if task.is_project() && task.is_referenceable() {
            visibility.register(&task.id);
        }
        tasks.push(task);
    }

    debug!(
        tasks = tasks.len(),
        projects = visibility.len(),
        "built task model"
    );

    BuiltDocument { tasks, visibility }
}

fn build_task(columns: &ColumnMap, row: &[Cell], sequence_index: usize, built: &[Task]) -> Task {
    let cell = |column| columns.cell(row, column);

    let id = cell(Column::Id).as_text();
    let task_type = TaskType::parse(&cell(Column::Type).as_text());

    let level = match cell(Column::Level).as_int() {
        Some(n) => u32::try_from(n.max(0)).unwrap_or(u32::MAX),
        None => {
            if !cell(Column::Level).is_blank() {
                debug!(row = sequence_index + 1, "unparseable level, using 0");
            }
            0
        }
    };

    let mut task = Task {
        id,
        level,
        name: cell(Column::TaskName).as_text(),
        task_type,
        start_date: cell(Column::StartDate).as_date(),
        end_date: cell(Column::EndDate).as_date(),
        duration_days: cell(Column::Days).as_int(),
        remaining_days: cell(Column::Remaining).as_int(),
        assigned_to: cell(Column::AssignedTo).as_opt_text(),
        dependencies: cell(Column::Dependencies).as_opt_text(),
        status: cell(Column::Status).as_opt_text(),
        description: cell(Column::Description).as_opt_text(),
        sequence_index,
        project_id: None,
        parent_project_id: None,
    };

    if task.is_project() {
        task.parent_project_id = built
            .iter()
            .rev()
            .find(|t| t.is_project() && t.level < task.level)
            .filter(|t| t.is_referenceable())
            .map(|t| t.id.clone());
    } else {
        task.project_id = built
            .iter()
            .rev()
            .find(|t| t.is_project())
            .filter(|t| t.is_referenceable())
            .map(|t| t.id.clone());
    }

    task
}
