//! Project collapse/expand state
//!
//! Only Project rows participate. Each registered project is either
//! expanded or collapsed; a row's visibility is derived from the state of
//! the projects that gate it, according to the active [`CollapseStrategy`].
//!
//! The map lives for one loaded document. Loading a new document discards
//! it and registers the new projects, all expanded.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::config::CollapseStrategy;
use crate::model::Task;

/// Per-project expanded flag (`true` = expanded)
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    projects: BTreeMap<String, bool>,
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project as expanded
    pub fn register(&mut self, project_id: &str) {
        self.projects.insert(project_id.to_string(), true);
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.projects.contains_key(project_id)
    }

    /// Unknown ids count as expanded so they never hide anything
    pub fn is_expanded(&self, project_id: &str) -> bool {
        self.projects.get(project_id).copied().unwrap_or(true)
    }

    /// Flip one project; returns the new state, or `None` for an unknown id
    pub fn toggle(&mut self, project_id: &str) -> Option<bool> {
        let Some(expanded) = self.projects.get_mut(project_id) else {
            debug!(project_id, "toggle ignored for unknown project");
            return None;
        };
        *expanded = !*expanded;
        Some(*expanded)
    }

    /// Set one project; returns false for an unknown id
    pub fn set_expanded(&mut self, project_id: &str, expanded: bool) -> bool {
        match self.projects.get_mut(project_id) {
            Some(state) => {
                *state = expanded;
                true
            }
            None => false,
        }
    }

    pub fn expand_all(&mut self) {
        self.projects.values_mut().for_each(|v| *v = true);
    }

    pub fn collapse_all(&mut self) {
        self.projects.values_mut().for_each(|v| *v = false);
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Registered projects in id order with their flag
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.projects.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn collapsed(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, v)| !v).map(|(k, _)| k)
    }

    /// Whether a row is shown under the current state
    pub fn is_row_visible(
        &self,
        task: &Task,
        tasks: &[Task],
        by_id: &HashMap<&str, usize>,
        strategy: CollapseStrategy,
    ) -> bool {
        gating_projects(task, tasks, by_id, strategy)
            .into_iter()
            .all(|id| self.is_expanded(id))
    }
}

/// Project ids that must all be expanded for `task` to be shown.
///
/// Under `SingleLevel` this is the row's own `project_id` (nothing for
/// Project rows). Under `Transitive` the chain continues through each
/// project's `parent_project_id`, and Project rows are gated by their
/// enclosing projects too.
pub fn gating_projects<'a>(
    task: &'a Task,
    tasks: &'a [Task],
    by_id: &HashMap<&str, usize>,
    strategy: CollapseStrategy,
) -> Vec<&'a str> {
    match strategy {
        CollapseStrategy::SingleLevel => {
            if task.is_project() {
                Vec::new()
            } else {
                task.project_id.as_deref().into_iter().collect()
            }
        }
        CollapseStrategy::Transitive => {
            let mut chain = Vec::new();
            let mut seen = HashSet::new();
            let mut current = if task.is_project() {
                task.parent_project_id.as_deref()
            } else {
                task.project_id.as_deref()
            };
            while let Some(id) = current {
                if !seen.insert(id) {
                    break;
                }
                chain.push(id);
                current = by_id
                    .get(id)
                    .and_then(|&i| tasks.get(i))
                    .and_then(|p| p.parent_project_id.as_deref());
            }
            chain
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{index_by_id, TaskType};

    fn project(id: &str, parent: Option<&str>) -> Task {
        Task {
            task_type: TaskType::Project,
            parent_project_id: parent.map(str::to_string),
            ..Task::new(id, id)
        }
    }

    fn child(id: &str, project: &str) -> Task {
        Task {
            task_type: TaskType::Task,
            project_id: Some(project.to_string()),
            ..Task::new(id, id)
        }
    }

    /// P1 > (a, P2 > b)
    fn nested() -> Vec<Task> {
        vec![
            project("P1", None),
            child("a", "P1"),
            project("P2", Some("P1")),
            child("b", "P2"),
        ]
    }

    fn state_for(tasks: &[Task]) -> VisibilityState {
        let mut state = VisibilityState::new();
        for t in tasks.iter().filter(|t| t.is_project()) {
            state.register(&t.id);
        }
        state
    }

    fn visible_ids(tasks: &[Task], state: &VisibilityState, strategy: CollapseStrategy) -> Vec<String> {
        let by_id = index_by_id(tasks);
        tasks
            .iter()
            .filter(|t| state.is_row_visible(t, tasks, &by_id, strategy))
            .map(|t| t.id.clone())
            .collect()
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut state = VisibilityState::new();
        state.register("P1");
        assert_eq!(state.toggle("P1"), Some(false));
        assert_eq!(state.toggle("P1"), Some(true));
        assert_eq!(state.toggle("missing"), None);
    }

    #[test]
    fn expand_and_collapse_all() {
        let tasks = nested();
        let mut state = state_for(&tasks);
        state.collapse_all();
        assert_eq!(state.collapsed().count(), 2);
        state.expand_all();
        assert_eq!(state.collapsed().count(), 0);
    }

    #[test]
    fn single_level_does_not_cascade() {
        let tasks = nested();
        let mut state = state_for(&tasks);
        state.set_expanded("P1", false);
        assert_eq!(
            visible_ids(&tasks, &state, CollapseStrategy::SingleLevel),
            vec!["P1", "P2", "b"]
        );
    }

    #[test]
    fn transitive_cascades_through_nested_projects() {
        let tasks = nested();
        let mut state = state_for(&tasks);
        state.set_expanded("P1", false);
        assert_eq!(
            visible_ids(&tasks, &state, CollapseStrategy::Transitive),
            vec!["P1"]
        );
    }

    #[test]
    fn gating_chain_under_transitive() {
        let tasks = nested();
        let by_id = index_by_id(&tasks);
        assert_eq!(
            gating_projects(&tasks[3], &tasks, &by_id, CollapseStrategy::Transitive),
            vec!["P2", "P1"]
        );
        assert_eq!(
            gating_projects(&tasks[3], &tasks, &by_id, CollapseStrategy::SingleLevel),
            vec!["P2"]
        );
        assert!(gating_projects(&tasks[2], &tasks, &by_id, CollapseStrategy::SingleLevel).is_empty());
    }

    #[test]
    fn unknown_projects_never_hide_rows() {
        let tasks = vec![child("x", "ghost")];
        let state = VisibilityState::new();
        assert_eq!(visible_ids(&tasks, &state, CollapseStrategy::Transitive), vec!["x"]);
    }
}
