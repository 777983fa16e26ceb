//! # sheetgantt-core
//!
//! Layout engine for Gantt charts built from spreadsheet task lists.
//!
//! This crate provides:
//! - Domain types: `Cell`, `Task`, `TaskType`, `Column`
//! - The task model builder (`build_tasks`)
//! - Timeline, layout and dependency-connector computation
//! - Project collapse/expand state (`VisibilityState`)
//! - `ChartSession`, the context object that ties the pieces together
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sheetgantt_core::{Cell, ChartSession, LayoutConfig};
//!
//! let rows = vec![
//!     vec![Cell::text("ID"), Cell::text("Task Name"), Cell::text("Type"),
//!          Cell::text("Start Date"), Cell::text("End Date"), Cell::text("Dependencies")],
//!     vec![Cell::text("1"), Cell::text("Launch"), Cell::text("Project"),
//!          Cell::text("2024-01-01"), Cell::text("2024-01-31"), Cell::Empty],
//!     vec![Cell::text("2"), Cell::text("Design"), Cell::text("Task"),
//!          Cell::text("2024-01-01"), Cell::text("2024-01-10"), Cell::Empty],
//!     vec![Cell::text("3"), Cell::text("Build"), Cell::text("Task"),
//!          Cell::text("2024-01-12"), Cell::text("2024-01-25"), Cell::text("Design (2)")],
//! ];
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let mut session = ChartSession::with_today(LayoutConfig::default(), today);
//! session.load(&rows);
//! assert_eq!(session.connectors().len(), 1);
//!
//! session.toggle("1");
//! assert!(session.connectors().is_empty());
//! ```

pub mod builder;
pub mod cell;
pub mod config;
pub mod dependencies;
pub mod layout;
pub mod model;
pub mod session;
pub mod timeline;
pub mod visibility;

pub use builder::{build_tasks, BuiltDocument};
pub use cell::Cell;
pub use config::{CollapseStrategy, LayoutConfig};
pub use dependencies::{
    parse_dependencies, redraw, resolve_edges, route_connectors, Connector, DependencyEdge,
    ParsedDependencies, Point, RoutingScope,
};
pub use layout::{bar_geometry, compute_layout, BarGeometry, ChartLayout, RowGeometry};
pub use model::{index_by_id, Column, DueState, Task, TaskId, TaskType};
pub use session::{ChartFrame, ChartSession};
pub use timeline::TimelineRange;
pub use visibility::VisibilityState;

use thiserror::Error;

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render the current state of a chart session
    fn render(&self, frame: &ChartFrame<'_>) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
