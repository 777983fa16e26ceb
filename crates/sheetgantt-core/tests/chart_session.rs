//! End-to-end tests: cell grid in, layout and connectors out

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use sheetgantt_core::{
    build_tasks, compute_layout, Cell, ChartSession, CollapseStrategy, LayoutConfig, TimelineRange,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

const HEADER: [&str; 12] = [
    "Level",
    "ID",
    "Task Name",
    "Descripción",
    "Start Date",
    "End Date",
    "Días",
    "Restante",
    "Assigned To",
    "Dependencies",
    "Status",
    "Type",
];

fn grid(rows: &[[&str; 12]]) -> Vec<Vec<Cell>> {
    std::iter::once(HEADER.map(Cell::text).to_vec())
        .chain(rows.iter().map(|r| r.map(Cell::from).to_vec()))
        .collect()
}

/// Program > (Kickoff, Stream > (Build, Test)), Loose
fn nested_program() -> Vec<Vec<Cell>> {
    grid(&[
        ["0", "1", "Program", "", "2024-03-01", "2024-05-31", "92", "40", "", "", "", "Project"],
        ["1", "2", "Kickoff", "", "2024-03-01", "2024-03-02", "2", "-5", "Ana", "", "Done", "Task"],
        ["1", "3", "Stream", "", "2024-03-04", "2024-04-30", "58", "20", "", "", "", "Project"],
        ["2", "4", "Build", "", "2024-03-04", "2024-03-29", "26", "2", "Luis", "Kickoff (2)", "", "Task"],
        ["2", "5", "Test", "", "2024-04-01", "", "", "", "", "4", "", "Subtask"],
        ["0", "6", "Loose", "", "", "", "", "", "", "5", "", ""],
    ])
}

#[test]
fn builds_linkage_for_nested_program() {
    let doc = build_tasks(&nested_program());
    let projects: Vec<Option<&str>> = doc.tasks.iter().map(|t| t.project_id.as_deref()).collect();
    assert_eq!(
        projects,
        vec![None, Some("1"), None, Some("3"), Some("3"), Some("3")]
    );
    assert_eq!(doc.tasks[2].parent_project_id.as_deref(), Some("1"));
    assert_eq!(doc.visibility.len(), 2);
}

#[test]
fn connectors_follow_dates_not_placeholders() {
    let mut session = ChartSession::with_today(LayoutConfig::default(), date(2024, 1, 1));
    session.load(&nested_program());

    // Test has no end date, so Loose's reference to it cannot be drawn
    let pairs: Vec<(&str, &str)> = session
        .connectors()
        .iter()
        .map(|c| (c.from_id.as_str(), c.to_id.as_str()))
        .collect();
    assert_eq!(pairs, vec![("2", "4"), ("4", "5")]);

    let test_bar = session.layout().rows[4].bar.unwrap();
    assert!(test_bar.placeholder);
    assert_eq!(test_bar.duration_days, 7);
    assert!(session.layout().rows[5].bar.is_none());
}

#[test]
fn single_level_keeps_nested_project_children_visible() {
    let mut session = ChartSession::with_today(LayoutConfig::default(), date(2024, 1, 1));
    session.load(&nested_program());
    session.toggle("1");
    assert_eq!(session.visible_ids(), vec!["1", "3", "4", "5", "6"]);
}

#[test]
fn transitive_hides_the_whole_subtree() {
    let config = LayoutConfig::default().collapse_strategy(CollapseStrategy::Transitive);
    let mut session = ChartSession::with_today(config, date(2024, 1, 1));
    session.load(&nested_program());
    session.toggle("1");
    assert_eq!(session.visible_ids(), vec!["1"]);
    assert!(session.connectors().is_empty());

    session.set_strategy(CollapseStrategy::SingleLevel);
    assert_eq!(session.visible_ids(), vec!["1", "3", "4", "5", "6"]);
    assert_eq!(session.connectors().len(), 1);
}

#[test]
fn collapsed_rows_keep_their_vertical_slot() {
    let mut session = ChartSession::with_today(LayoutConfig::default(), date(2024, 1, 1));
    session.load(&nested_program());
    let before: Vec<f64> = session.layout().rows.iter().map(|r| r.row_top).collect();
    session.collapse_all();
    let after: Vec<f64> = session.layout().rows.iter().map(|r| r.row_top).collect();
    assert_eq!(before, after);
    assert_eq!(after[5], 140.0);
}

#[test]
fn building_twice_gives_identical_geometry() {
    let rows = nested_program();
    let config = LayoutConfig::default();
    let today = date(2024, 1, 1);

    let layout_of = || {
        let doc = build_tasks(&rows);
        let timeline = TimelineRange::from_tasks(&doc.tasks, today, &config);
        (doc.tasks.clone(), compute_layout(&doc.tasks, &timeline, &doc.visibility, &config))
    };
    assert_eq!(layout_of(), layout_of());
}

#[test]
fn empty_document_gets_six_month_window() {
    let mut session = ChartSession::with_today(LayoutConfig::default(), date(2024, 8, 31));
    session.load(&grid(&[]));
    assert_eq!(session.timeline().min_date, date(2024, 8, 31));
    assert_eq!(session.timeline().max_date, date(2025, 2, 28));
    assert_eq!(session.layout().canvas_height, 0.0);
}

#[test]
fn timeline_pads_observed_range() {
    let mut session = ChartSession::with_today(LayoutConfig::default(), date(2024, 1, 1));
    session.load(&nested_program());
    assert_eq!(session.timeline().min_date, date(2024, 1, 31));
    assert_eq!(session.timeline().max_date, date(2024, 7, 30));
}
