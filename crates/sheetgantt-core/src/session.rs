//! Chart session
//!
//! `ChartSession` owns everything one chart needs: the task list, the
//! visibility map, the timeline, the layout and the connector list. Every
//! mutation relayouts and redraws before returning, so a caller never
//! observes connectors that disagree with the bars.

use chrono::{Local, NaiveDate};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::builder::build_tasks;
use crate::cell::Cell;
use crate::config::{CollapseStrategy, LayoutConfig};
use crate::dependencies::{redraw, resolve_edges, route_connectors, Connector, DependencyEdge, RoutingScope};
use crate::layout::{compute_layout, ChartLayout};
use crate::model::{index_by_id, Task};
use crate::timeline::TimelineRange;
use crate::visibility::{gating_projects, VisibilityState};

/// State of one rendered chart
#[derive(Clone, Debug)]
pub struct ChartSession {
    config: LayoutConfig,
    today: NaiveDate,
    tasks: Vec<Task>,
    edges: Vec<DependencyEdge>,
    visibility: VisibilityState,
    timeline: TimelineRange,
    layout: ChartLayout,
    connectors: Vec<Connector>,
}

impl ChartSession {
    /// Empty session dated to the local calendar day
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_today(config, Local::now().date_naive())
    }

    /// Empty session with an explicit "today" for the default window
    pub fn with_today(config: LayoutConfig, today: NaiveDate) -> Self {
        let config = config.sanitized();
        let timeline = TimelineRange::default_window(today, config.default_window_months);
        let visibility = VisibilityState::new();
        let layout = compute_layout(&[], &timeline, &visibility, &config);
        Self {
            config,
            today,
            tasks: Vec::new(),
            edges: Vec::new(),
            visibility,
            timeline,
            layout,
            connectors: Vec::new(),
        }
    }

    /// Replace the document. Previous tasks and collapse state are discarded.
    pub fn load(&mut self, rows: &[Vec<Cell>]) {
        let built = build_tasks(rows);
        self.load_tasks(built.tasks, built.visibility);
    }

    /// Replace the document with an already-built task list
    ///
    /// Each task's `sequence_index` is reset to its position in `tasks`.
    pub fn load_tasks(&mut self, mut tasks: Vec<Task>, visibility: VisibilityState) {
        for (position, task) in tasks.iter_mut().enumerate() {
            task.sequence_index = position;
        }
        self.tasks = tasks;
        self.visibility = visibility;
        self.edges = resolve_edges(&self.tasks);
        self.timeline = TimelineRange::from_tasks(&self.tasks, self.today, &self.config);
        self.layout = compute_layout(&self.tasks, &self.timeline, &self.visibility, &self.config);
        self.redraw();
        info!(
            tasks = self.tasks.len(),
            projects = self.visibility.len(),
            edges = self.edges.len(),
            connectors = self.connectors.len(),
            "loaded chart"
        );
    }

    /// Flip one project; unknown ids leave everything untouched
    pub fn toggle(&mut self, project_id: &str) -> Option<bool> {
        let state = self.visibility.toggle(project_id)?;
        debug!(project_id, expanded = state, "toggled project");
        self.refresh_visibility();
        Some(state)
    }

    pub fn set_expanded(&mut self, project_id: &str, expanded: bool) -> bool {
        if !self.visibility.set_expanded(project_id, expanded) {
            return false;
        }
        self.refresh_visibility();
        true
    }

    pub fn expand_all(&mut self) {
        self.visibility.expand_all();
        self.refresh_visibility();
    }

    pub fn collapse_all(&mut self) {
        self.visibility.collapse_all();
        self.refresh_visibility();
    }

    pub fn set_strategy(&mut self, strategy: CollapseStrategy) {
        self.config.collapse_strategy = strategy;
        self.refresh_visibility();
    }

    fn refresh_visibility(&mut self) {
        self.layout.apply_visibility(&self.tasks, &self.visibility, &self.config);
        self.redraw();
    }

    /// Regenerate connectors from the current layout
    pub fn redraw(&mut self) {
        redraw(
            &mut self.connectors,
            &self.tasks,
            &self.edges,
            &self.layout,
            self.config.connector_offset,
        );
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn visibility(&self) -> &VisibilityState {
        &self.visibility
    }

    pub fn timeline(&self) -> &TimelineRange {
        &self.timeline
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    /// Ids of the rows currently shown, in row order
    pub fn visible_ids(&self) -> Vec<&str> {
        self.tasks
            .iter()
            .zip(&self.layout.rows)
            .filter(|(_, row)| row.visible)
            .map(|(t, _)| t.id.as_str())
            .collect()
    }

    /// Borrowed view handed to renderers
    pub fn frame(&self) -> ChartFrame<'_> {
        ChartFrame {
            tasks: &self.tasks,
            edges: &self.edges,
            layout: &self.layout,
            connectors: &self.connectors,
            visibility: &self.visibility,
            config: &self.config,
            today: self.today,
        }
    }
}

/// Read-only snapshot of a session for render surfaces
#[derive(Clone, Copy, Debug)]
pub struct ChartFrame<'a> {
    pub tasks: &'a [Task],
    pub edges: &'a [DependencyEdge],
    pub layout: &'a ChartLayout,
    /// Connectors between currently visible rows
    pub connectors: &'a [Connector],
    pub visibility: &'a VisibilityState,
    pub config: &'a LayoutConfig,
    pub today: NaiveDate,
}

impl<'a> ChartFrame<'a> {
    /// Projects that gate every row, in row order, under the configured strategy
    pub fn row_gates(&self) -> Vec<Vec<&'a str>> {
        let by_id: HashMap<&str, usize> = index_by_id(self.tasks);
        self.tasks
            .iter()
            .map(|task| gating_projects(task, self.tasks, &by_id, self.config.collapse_strategy))
            .collect()
    }

    /// Projects that gate row `index` alone. Builds an id index per call,
    /// so prefer [`ChartFrame::row_gates`] when walking every row.
    pub fn gating_projects(&self, index: usize) -> Vec<&'a str> {
        let by_id: HashMap<&str, usize> = index_by_id(self.tasks);
        match self.tasks.get(index) {
            Some(task) => gating_projects(task, self.tasks, &by_id, self.config.collapse_strategy),
            None => Vec::new(),
        }
    }

    /// Connectors for every edge regardless of collapse state, for
    /// surfaces that toggle rows themselves
    pub fn all_connectors(&self) -> Vec<Connector> {
        route_connectors(
            self.tasks,
            self.edges,
            self.layout,
            RoutingScope::AllRows,
            self.config.connector_offset,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
