//! # sheetgantt-render
//!
//! Rendering backends for sheetgantt chart sessions.
//!
//! This crate provides:
//! - Interactive HTML Gantt chart rendering
//! - Static SVG Gantt chart rendering
//! - Text-based output
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheetgantt_core::{ChartSession, LayoutConfig, Renderer};
//! use sheetgantt_render::{HtmlGanttRenderer, SvgRenderer, TextRenderer};
//!
//! let mut session = ChartSession::new(LayoutConfig::default());
//! session.load(&rows);
//!
//! // Interactive HTML Gantt chart
//! let html = HtmlGanttRenderer::new().title("Roadmap").render(&session.frame())?;
//!
//! // Pure SVG output of the current collapse state
//! let svg = SvgRenderer::default().render(&session.frame())?;
//!
//! // Terminal summary
//! let text = TextRenderer.render(&session.frame())?;
//! ```

pub mod gantt;

pub use gantt::{GanttTheme, HtmlGanttRenderer};

use gantt::{translated_path, truncate};
use svg::node::element::{Definitions, Group, Line, Marker, Path, Polygon, Rectangle, Text};
use svg::Document;
use sheetgantt_core::{ChartFrame, DueState, RenderError, Renderer, Task};

/// Reject frames whose layout does not describe their task list
pub(crate) fn check_frame(frame: &ChartFrame<'_>) -> Result<(), RenderError> {
    if frame.layout.rows.len() != frame.tasks.len() {
        return Err(RenderError::InvalidData(format!(
            "layout has {} rows for {} tasks",
            frame.layout.rows.len(),
            frame.tasks.len()
        )));
    }
    Ok(())
}

/// SVG Gantt chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Colors, shared with the HTML renderer
    pub theme: GanttTheme,
    /// Font family
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            label_width: 220,
            header_height: 40,
            padding: 20,
            theme: GanttTheme::default(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure label column width
    pub fn label_width(mut self, width: u32) -> Self {
        self.label_width = width;
        self
    }

    pub fn theme(mut self, theme: GanttTheme) -> Self {
        self.theme = theme;
        self
    }

    fn chart_x0(&self) -> f64 {
        (self.padding + self.label_width) as f64
    }

    fn chart_y0(&self) -> f64 {
        (self.padding + self.header_height) as f64
    }

    /// Month labels along the top
    fn render_header(&self, frame: &ChartFrame<'_>) -> Group {
        let layout = frame.layout;
        let mut group = Group::new().set("class", "header");

        let header_bg = Rectangle::new()
            .set("x", self.padding)
            .set("y", self.padding)
            .set("width", self.label_width as f64 + layout.canvas_width)
            .set("height", self.header_height)
            .set("fill", self.theme.header_bg.as_str());
        group = group.add(header_bg);

        for month in layout.timeline.month_starts() {
            let x = self.chart_x0() + layout.timeline.x_for(month, layout.day_width);
            let tick = Line::new()
                .set("x1", x)
                .set("y1", self.chart_y0() - 8.0)
                .set("x2", x)
                .set("y2", self.chart_y0())
                .set("stroke", self.theme.text_color.as_str())
                .set("stroke-width", 1);
            group = group.add(tick);

            let label = Text::new(month.format("%b %Y").to_string())
                .set("x", x + 4.0)
                .set("y", self.chart_y0() - 12.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size - 1)
                .set("fill", self.theme.text_color.as_str());
            group = group.add(label);
        }

        group
    }

    /// Row separators for every slot, hidden or not
    fn render_grid(&self, frame: &ChartFrame<'_>) -> Group {
        let layout = frame.layout;
        let mut group = Group::new().set("class", "grid");
        let right = self.chart_x0() + layout.canvas_width;

        for i in 0..=layout.rows.len() {
            let y = self.chart_y0() + i as f64 * layout.row_height;
            let line = Line::new()
                .set("x1", self.padding)
                .set("y1", y)
                .set("x2", right)
                .set("y2", y)
                .set("stroke", self.theme.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        group
    }

    /// Label and bar of one visible row
    fn render_task(&self, frame: &ChartFrame<'_>, task: &Task, index: usize) -> Option<Group> {
        let row = frame.layout.row(index).filter(|r| r.visible)?;
        let row_height = frame.layout.row_height;
        let y = self.chart_y0() + row.row_top;
        let mut group = Group::new()
            .set("class", format!("task {}", task.task_type.css_class()))
            .set("data-row", index);

        let indent = task.level.min(8) as f64 * 12.0;
        let label = Text::new(truncate(&task.name, 28))
            .set("x", self.padding as f64 + 8.0 + indent)
            .set("y", y + row_height / 2.0 + 4.0)
            .set("font-family", self.font_family.as_str())
            .set("font-size", self.font_size)
            .set("fill", self.theme.text_color.as_str());
        group = group.add(label);

        if let Some(bar) = row.bar {
            let bar_height = row_height * 0.6;
            let fill = if bar.placeholder {
                self.theme.placeholder_color.as_str()
            } else {
                self.theme.fill_for(&task.task_type)
            };
            let mut rect = Rectangle::new()
                .set("x", self.chart_x0() + bar.left)
                .set("y", y + (row_height - bar_height) / 2.0)
                .set("width", bar.width)
                .set("height", bar_height)
                .set("rx", 3)
                .set("ry", 3)
                .set("fill", fill);
            if bar.placeholder {
                rect = rect
                    .set("class", "no-dates")
                    .set("stroke", self.theme.text_color.as_str())
                    .set("stroke-dasharray", "4,3");
            }
            match task.due_state() {
                Some(DueState::Overdue) => {
                    rect = rect
                        .set("stroke", self.theme.overdue_color.as_str())
                        .set("stroke-width", 2);
                }
                Some(DueState::DueSoon) => {
                    rect = rect
                        .set("stroke", self.theme.due_soon_color.as_str())
                        .set("stroke-width", 2);
                }
                _ => {}
            }
            group = group.add(rect);
        }

        Some(group)
    }

    /// Connectors between visible rows
    fn render_connectors(&self, frame: &ChartFrame<'_>) -> Group {
        let mut group = Group::new().set("class", "dependencies");
        let (dx, dy) = (self.chart_x0(), self.chart_y0());

        for connector in frame.connectors {
            let path = Path::new()
                .set("d", translated_path(connector, dx, dy))
                .set("fill", "none")
                .set("stroke", self.theme.arrow_color.as_str())
                .set("stroke-width", 1.5)
                .set("marker-end", "url(#arrowhead)")
                .set("data-from", connector.from_id.as_str())
                .set("data-to", connector.to_id.as_str());
            group = group.add(path);
        }

        group
    }

    fn arrowhead(&self) -> Definitions {
        let marker = Marker::new()
            .set("id", "arrowhead")
            .set("markerWidth", 8)
            .set("markerHeight", 6)
            .set("refX", 8)
            .set("refY", 3)
            .set("orient", "auto")
            .add(
                Polygon::new()
                    .set("points", "0 0, 8 3, 0 6")
                    .set("fill", self.theme.arrow_color.as_str()),
            );
        Definitions::new().add(marker)
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, frame: &ChartFrame<'_>) -> Result<String, RenderError> {
        check_frame(frame)?;
        let layout = frame.layout;

        let width = self.chart_x0() + layout.canvas_width + self.padding as f64;
        let height = self.chart_y0() + layout.canvas_height + self.padding as f64;

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(self.arrowhead());

        let background = Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", self.theme.background_color.as_str());
        document = document.add(background);

        document = document.add(self.render_grid(frame));
        document = document.add(self.render_header(frame));

        for (index, task) in frame.tasks.iter().enumerate() {
            if let Some(group) = self.render_task(frame, task, index) {
                document = document.add(group);
            }
        }

        document = document.add(self.render_connectors(frame));

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Plain text renderer for console output
///
/// One line per visible row: indentation by level, bar start day and
/// length, and due state. Ends with the connector count.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, frame: &ChartFrame<'_>) -> Result<String, RenderError> {
        check_frame(frame)?;
        let timeline = &frame.layout.timeline;
        let mut out = format!(
            "Timeline: {} to {} ({} days)\n",
            timeline.min_date,
            timeline.max_date,
            timeline.total_days()
        );

        for (task, row) in frame.tasks.iter().zip(&frame.layout.rows) {
            if !row.visible {
                continue;
            }
            let marker = if task.is_project() {
                if frame.visibility.is_expanded(&task.id) {
                    "[-] "
                } else {
                    "[+] "
                }
            } else {
                ""
            };
            let bar = match row.bar {
                Some(bar) if bar.placeholder => format!("day {} +{}d (no dates)", bar.start_day, bar.duration_days),
                Some(bar) => format!("day {} +{}d", bar.start_day, bar.duration_days),
                None => "no bar".to_string(),
            };
            let due = match task.due_state() {
                Some(DueState::Overdue) => " OVERDUE",
                Some(DueState::DueSoon) => " due soon",
                _ => "",
            };
            out.push_str(&format!(
                "{indent}{marker}{id:>4} {name}  {bar}{due}\n",
                indent = "  ".repeat(task.level.min(8) as usize),
                marker = marker,
                id = task.id,
                name = task.name,
                bar = bar,
                due = due
            ));
        }

        out.push_str(&format!("Connectors: {}\n", frame.connectors.len()));
        Ok(out)
    }
}
