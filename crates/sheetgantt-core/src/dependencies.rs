//! Dependency resolver
//!
//! Turns the free-text `Dependencies` column into task-to-task edges and
//! routes an elbow connector for every edge whose endpoints have bars in
//! the current layout. Routing reads the layout's geometry records only,
//! so a redraw can run immediately after any relayout.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::OnceLock;
use tracing::{debug, trace};

use crate::layout::ChartLayout;
use crate::model::{index_by_id, Task, TaskId};

fn paren_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\(([0-9]+)\)").ok()).as_ref()
}

// ============================================================================
// Parsing
// ============================================================================

/// Result of reading one `Dependencies` field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedDependencies {
    /// `Name (ID)` pairs; the name part is ignored
    ByParenId(Vec<TaskId>),
    /// Comma-separated bare numeric ids
    ByBareCsv(Vec<TaskId>),
    /// Nothing usable
    Unparsed,
}

impl ParsedDependencies {
    pub fn ids(&self) -> &[TaskId] {
        match self {
            ParsedDependencies::ByParenId(ids) | ParsedDependencies::ByBareCsv(ids) => ids,
            ParsedDependencies::Unparsed => &[],
        }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self, ParsedDependencies::Unparsed)
    }
}

/// Parse a dependency field.
///
/// Parenthesized numeric groups take precedence anywhere in the string.
/// Without any, the field is split on commas and purely numeric entries
/// are kept. Order of appearance is preserved.
pub fn parse_dependencies(raw: &str) -> ParsedDependencies {
    if let Some(pattern) = paren_id_pattern() {
        let ids: Vec<TaskId> = pattern
            .captures_iter(raw)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .collect();
        if !ids.is_empty() {
            return ParsedDependencies::ByParenId(ids);
        }
    }

    let ids: Vec<TaskId> = raw
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        ParsedDependencies::Unparsed
    } else {
        ParsedDependencies::ByBareCsv(ids)
    }
}

// ============================================================================
// Edges
// ============================================================================

/// A resolved predecessor link, by row position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// Predecessor row
    pub from: usize,
    /// Dependent row (the one whose field named the predecessor)
    pub to: usize,
}

/// Resolve every task's dependency field against the task ids.
///
/// Unknown ids and self-references are dropped. An id that appears on
/// several rows resolves to the first of them. Repeated references within
/// one field produce a single edge.
pub fn resolve_edges(tasks: &[Task]) -> Vec<DependencyEdge> {
    let by_id = index_by_id(tasks);
    let mut edges = Vec::new();
    let mut seen = HashSet::new();

    for (to, task) in tasks.iter().enumerate() {
        let Some(raw) = task.dependencies.as_deref() else {
            continue;
        };
        let parsed = parse_dependencies(raw);
        if parsed.is_unparsed() {
            trace!(task = %task.id, raw, "dependency field has no ids");
            continue;
        }
        for id in parsed.ids() {
            match by_id.get(id.as_str()) {
                Some(&from) if from != to => {
                    let edge = DependencyEdge { from, to };
                    if seen.insert(edge) {
                        edges.push(edge);
                    }
                }
                Some(_) => trace!(task = %task.id, "ignoring self dependency"),
                None => debug!(task = %task.id, missing = %id, "dropping unresolved dependency"),
            }
        }
    }

    edges
}

// ============================================================================
// Routing
// ============================================================================

/// Which rows may carry connectors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingScope {
    /// Both endpoints must be visible under the current collapse state
    #[default]
    VisibleOnly,
    /// Ignore visibility; used by surfaces that hide rows on their own
    AllRows,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Elbow-routed line from a predecessor's bar end to a dependent's bar start
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub from_id: TaskId,
    pub to_id: TaskId,
    pub from_index: usize,
    pub to_index: usize,
    /// Polyline: bar end, horizontal run, vertical drop, bar start
    pub points: Vec<Point>,
}

impl Connector {
    /// SVG path data (`M x y L x y ...`)
    pub fn path_data(&self) -> String {
        let mut data = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { 'M' } else { 'L' };
            if i > 0 {
                data.push(' ');
            }
            let _ = write!(data, "{} {} {}", cmd, p.x, p.y);
        }
        data
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Route connectors for `edges` over `layout`.
///
/// An edge is drawn only when the predecessor has an end date, the
/// dependent has a start date, both rows have bars, and (for
/// [`RoutingScope::VisibleOnly`]) both rows are visible.
pub fn route_connectors(
    tasks: &[Task],
    edges: &[DependencyEdge],
    layout: &ChartLayout,
    scope: RoutingScope,
    offset: f64,
) -> Vec<Connector> {
    edges
        .iter()
        .filter_map(|edge| {
            let from = tasks.get(edge.from)?;
            let to = tasks.get(edge.to)?;
            from.end_date?;
            to.start_date?;

            let from_row = layout.row(edge.from)?;
            let to_row = layout.row(edge.to)?;
            if scope == RoutingScope::VisibleOnly && !(from_row.visible && to_row.visible) {
                return None;
            }
            let from_bar = from_row.bar?;
            let to_bar = to_row.bar?;

            let y1 = layout.row_center(edge.from);
            let y2 = layout.row_center(edge.to);
            let elbow_x = from_bar.right() + offset;

            Some(Connector {
                from_id: from.id.clone(),
                to_id: to.id.clone(),
                from_index: edge.from,
                to_index: edge.to,
                points: vec![
                    Point::new(from_bar.right(), y1),
                    Point::new(elbow_x, y1),
                    Point::new(elbow_x, y2),
                    Point::new(to_bar.left, y2),
                ],
            })
        })
        .collect()
}

/// Discard `connectors` and regenerate them from the current layout.
/// Calling it repeatedly with unchanged inputs yields the same list.
pub fn redraw(
    connectors: &mut Vec<Connector>,
    tasks: &[Task],
    edges: &[DependencyEdge],
    layout: &ChartLayout,
    offset: f64,
) {
    connectors.clear();
    connectors.extend(route_connectors(tasks, edges, layout, RoutingScope::VisibleOnly, offset));
    trace!(count = connectors.len(), "redrew connectors");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::layout::compute_layout;
    use crate::model::TaskType;
    use crate::timeline::TimelineRange;
    use crate::visibility::VisibilityState;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn ids(parsed: &ParsedDependencies) -> Vec<&str> {
        parsed.ids().iter().map(String::as_str).collect()
    }

    #[test]
    fn parenthesized_ids() {
        let parsed = parse_dependencies("Design (3), Build (5)");
        assert!(matches!(parsed, ParsedDependencies::ByParenId(_)));
        assert_eq!(ids(&parsed), vec!["3", "5"]);
    }

    #[test]
    fn bare_csv_drops_non_numeric() {
        let parsed = parse_dependencies("3, 5, foo");
        assert!(matches!(parsed, ParsedDependencies::ByBareCsv(_)));
        assert_eq!(ids(&parsed), vec!["3", "5"]);
    }

    #[test]
    fn empty_and_junk_are_unparsed() {
        assert_eq!(parse_dependencies(""), ParsedDependencies::Unparsed);
        assert_eq!(parse_dependencies("  "), ParsedDependencies::Unparsed);
        assert_eq!(parse_dependencies("after design"), ParsedDependencies::Unparsed);
        assert_eq!(parse_dependencies("3a, -4"), ParsedDependencies::Unparsed);
    }

    #[test]
    fn only_ascii_digits_count_as_ids() {
        assert_eq!(parse_dependencies("Survey (١٢)"), ParsedDependencies::Unparsed);
        assert_eq!(parse_dependencies("١٢, 4"), ParsedDependencies::ByBareCsv(vec!["4".into()]));
        assert_eq!(
            parse_dependencies("Survey (١٢), Wiring (13)"),
            ParsedDependencies::ByParenId(vec!["13".into()])
        );
    }

    #[test]
    fn paren_form_wins_over_bare_ids() {
        let parsed = parse_dependencies("7, Review (12)");
        assert_eq!(ids(&parsed), vec!["12"]);
    }

    fn two_tasks(b_start: Option<NaiveDate>) -> Vec<Task> {
        vec![
            Task {
                start_date: Some(date(2024, 1, 1)),
                end_date: Some(date(2024, 1, 10)),
                ..Task::new("1", "A")
            },
            Task {
                sequence_index: 1,
                start_date: b_start,
                end_date: Some(date(2024, 1, 20)),
                dependencies: Some("A (1)".into()),
                ..Task::new("2", "B")
            },
        ]
    }

    fn connectors_for(tasks: &[Task], visibility: &VisibilityState) -> Vec<Connector> {
        let config = LayoutConfig::default();
        let timeline = TimelineRange::from_tasks(tasks, date(2024, 1, 1), &config);
        let layout = compute_layout(tasks, &timeline, visibility, &config);
        let edges = resolve_edges(tasks);
        route_connectors(tasks, &edges, &layout, RoutingScope::VisibleOnly, config.connector_offset)
    }

    #[test]
    fn one_connector_between_dated_bars() {
        let tasks = two_tasks(Some(date(2024, 1, 12)));
        let connectors = connectors_for(&tasks, &VisibilityState::new());
        assert_eq!(connectors.len(), 1);

        // timeline starts 2023-12-02: A spans days 30..=39, B starts at day 41
        let c = &connectors[0];
        assert_eq!(
            c.points,
            vec![
                Point::new(1200.0, 14.0),
                Point::new(1220.0, 14.0),
                Point::new(1220.0, 42.0),
                Point::new(1230.0, 42.0),
            ]
        );
        assert_eq!(c.path_data(), "M 1200 14 L 1220 14 L 1220 42 L 1230 42");
    }

    #[test]
    fn missing_start_date_suppresses_connector() {
        let tasks = two_tasks(None);
        assert!(connectors_for(&tasks, &VisibilityState::new()).is_empty());
    }

    #[test]
    fn hidden_rows_get_no_connectors() {
        let mut tasks = two_tasks(Some(date(2024, 1, 12)));
        tasks.insert(
            0,
            Task {
                task_type: TaskType::Project,
                ..Task::new("P", "Project")
            },
        );
        for (i, t) in tasks.iter_mut().enumerate() {
            t.sequence_index = i;
            if !t.is_project() {
                t.project_id = Some("P".into());
            }
        }
        let mut visibility = VisibilityState::new();
        visibility.register("P");
        assert_eq!(connectors_for(&tasks, &visibility).len(), 1);

        visibility.toggle("P");
        assert!(connectors_for(&tasks, &visibility).is_empty());
    }

    #[test]
    fn unresolved_self_and_repeated_refs_are_dropped() {
        let tasks = vec![
            Task::new("1", "A"),
            Task {
                dependencies: Some("1, 1, 2, 99".into()),
                ..Task::new("2", "B")
            },
        ];
        assert_eq!(resolve_edges(&tasks), vec![DependencyEdge { from: 0, to: 1 }]);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_row() {
        let tasks = vec![
            Task::new("1", "first"),
            Task::new("1", "second"),
            Task {
                dependencies: Some("1".into()),
                ..Task::new("3", "C")
            },
        ];
        assert_eq!(resolve_edges(&tasks), vec![DependencyEdge { from: 0, to: 2 }]);
    }

    #[test]
    fn redraw_replaces_previous_connectors() {
        let tasks = two_tasks(Some(date(2024, 1, 12)));
        let config = LayoutConfig::default();
        let timeline = TimelineRange::from_tasks(&tasks, date(2024, 1, 1), &config);
        let layout = compute_layout(&tasks, &timeline, &VisibilityState::new(), &config);
        let edges = resolve_edges(&tasks);

        let mut connectors = Vec::new();
        redraw(&mut connectors, &tasks, &edges, &layout, config.connector_offset);
        let first = connectors.clone();
        redraw(&mut connectors, &tasks, &edges, &layout, config.connector_offset);
        assert_eq!(connectors, first);
        assert_eq!(connectors.len(), 1);
    }
}
