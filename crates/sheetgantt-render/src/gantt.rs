//! Interactive HTML Gantt Chart Renderer
//!
//! Generates standalone HTML files with an embedded SVG Gantt chart.
//! Features:
//! - Task bars colored by row type, outlined by due state
//! - Dashed placeholder bars for rows with a single date
//! - Elbow dependency connectors
//! - Hover tooltips with task details
//! - Project toggles plus expand-all / collapse-all controls
//! - Zoom controls
//!
//! Every row carries the ids of the projects that gate it, and every
//! connector carries its two row indexes, so the page script hides rows
//! and connectors exactly the way the session would.

use chrono::NaiveDate;
use serde::Serialize;
use sheetgantt_core::{ChartFrame, Connector, RenderError, Renderer, Task, TaskType};

/// HTML Gantt chart renderer configuration
#[derive(Clone, Debug)]
pub struct HtmlGanttRenderer {
    /// Page and chart title
    pub title: String,
    /// Width of the label column in pixels
    pub label_width: u32,
    /// Header height in pixels
    pub header_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Theme (light or dark)
    pub theme: GanttTheme,
    /// Show dependency connectors
    pub show_dependencies: bool,
    /// Enable interactivity (tooltips, toggles, zoom)
    pub interactive: bool,
    /// Draw a vertical line at the session's "today"
    pub show_today: bool,
}

/// Color theme for the Gantt chart
#[derive(Clone, Debug)]
pub struct GanttTheme {
    pub project_color: String,
    pub task_color: String,
    pub subtask_color: String,
    pub other_color: String,
    pub placeholder_color: String,
    pub overdue_color: String,
    pub due_soon_color: String,
    pub background_color: String,
    pub grid_color: String,
    pub text_color: String,
    pub header_bg: String,
    pub arrow_color: String,
    pub today_color: String,
}

impl Default for GanttTheme {
    fn default() -> Self {
        Self::light()
    }
}

impl GanttTheme {
    pub fn light() -> Self {
        Self {
            project_color: "#2c3e50".into(),
            task_color: "#3498db".into(),
            subtask_color: "#1abc9c".into(),
            other_color: "#95a5a6".into(),
            placeholder_color: "#bdc3c7".into(),
            overdue_color: "#e74c3c".into(),
            due_soon_color: "#f39c12".into(),
            background_color: "#ffffff".into(),
            grid_color: "#ecf0f1".into(),
            text_color: "#2c3e50".into(),
            header_bg: "#f8f9fa".into(),
            arrow_color: "#7f8c8d".into(),
            today_color: "#e53935".into(),
        }
    }

    pub fn dark() -> Self {
        Self {
            project_color: "#ecf0f1".into(),
            task_color: "#3498db".into(),
            subtask_color: "#1abc9c".into(),
            other_color: "#7f8c8d".into(),
            placeholder_color: "#4b5563".into(),
            overdue_color: "#e74c3c".into(),
            due_soon_color: "#f39c12".into(),
            background_color: "#1a1a2e".into(),
            grid_color: "#2d2d44".into(),
            text_color: "#eaeaea".into(),
            header_bg: "#16213e".into(),
            arrow_color: "#95a5a6".into(),
            today_color: "#ef5350".into(),
        }
    }

    /// Bar fill for a row type
    pub fn fill_for(&self, task_type: &TaskType) -> &str {
        match task_type {
            TaskType::Project => &self.project_color,
            TaskType::Task => &self.task_color,
            TaskType::Subtask => &self.subtask_color,
            TaskType::Other(_) | TaskType::Unspecified => &self.other_color,
        }
    }
}

impl Default for HtmlGanttRenderer {
    fn default() -> Self {
        Self {
            title: "Gantt Chart".into(),
            label_width: 320,
            header_height: 50,
            padding: 20,
            theme: GanttTheme::default(),
            show_dependencies: true,
            interactive: true,
            show_today: true,
        }
    }
}

impl HtmlGanttRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Use dark theme
    pub fn dark_theme(mut self) -> Self {
        self.theme = GanttTheme::dark();
        self
    }

    /// Configure label column width
    pub fn label_width(mut self, width: u32) -> Self {
        self.label_width = width;
        self
    }

    /// Disable dependency connectors
    pub fn hide_dependencies(mut self) -> Self {
        self.show_dependencies = false;
        self
    }

    /// Disable interactivity
    pub fn static_chart(mut self) -> Self {
        self.interactive = false;
        self
    }

    pub fn hide_today(mut self) -> Self {
        self.show_today = false;
        self
    }

    fn chart_x0(&self) -> f64 {
        (self.padding + self.label_width) as f64
    }

    fn chart_y0(&self) -> f64 {
        (self.padding + self.header_height) as f64
    }

    fn generate_html(&self, frame: &ChartFrame<'_>) -> Result<String, RenderError> {
        let layout = frame.layout;
        let total_width = self.chart_x0() + layout.canvas_width + self.padding as f64;
        let total_height = self.chart_y0() + layout.canvas_height + self.padding as f64;

        let svg_content = self.generate_svg(frame);
        let css = self.generate_css();
        let js = if self.interactive {
            self.generate_js(frame)?
        } else {
            String::new()
        };
        let controls = if self.interactive {
            r#"            <div class="gantt-controls">
                <button onclick="expandAll()" title="Expand all projects">Expand all</button>
                <button onclick="collapseAll()" title="Collapse all projects">Collapse all</button>
                <button onclick="zoomIn()" title="Zoom In">+</button>
                <button onclick="zoomOut()" title="Zoom Out">−</button>
                <button onclick="resetZoom()" title="Reset">Reset</button>
            </div>"#
        } else {
            ""
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <div class="gantt-container">
        <div class="gantt-header">
            <h1>{title}</h1>
{controls}
        </div>
        <div class="gantt-wrapper" id="gantt-wrapper">
            <svg id="gantt-svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">
{svg_content}
            </svg>
        </div>
        <div class="gantt-legend">
            <span class="legend-item"><span class="legend-box project"></span>Project</span>
            <span class="legend-item"><span class="legend-box task"></span>Task</span>
            <span class="legend-item"><span class="legend-box subtask"></span>Subtask</span>
            <span class="legend-item"><span class="legend-box no-dates"></span>Missing date</span>
            <span class="legend-item"><span class="legend-box overdue"></span>Overdue</span>
            <span class="legend-item"><span class="legend-box due-soon"></span>Due soon</span>
        </div>
        <div id="tooltip" class="tooltip"></div>
    </div>
    <script>
{js}
    </script>
</body>
</html>"#,
            title = html_escape(&self.title),
            css = css,
            controls = controls,
            width = total_width,
            height = total_height,
            svg_content = svg_content,
            js = js,
        ))
    }

    /// Generate the SVG content (without the outer <svg> tag)
    fn generate_svg(&self, frame: &ChartFrame<'_>) -> String {
        let mut svg = String::new();

        svg.push_str(&format!(
            r#"                <defs><marker id="arrowhead" markerWidth="8" markerHeight="6" refX="8" refY="3" orient="auto"><polygon points="0 0, 8 3, 0 6" fill="{}"/></marker></defs>"#,
            self.theme.arrow_color
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"                <rect width="100%" height="100%" fill="{}"/>"#,
            self.theme.background_color
        ));
        svg.push('\n');

        svg.push_str(&self.render_grid(frame));
        svg.push_str(&self.render_header(frame));

        svg.push_str("                <g class=\"rows\">\n");
        let gates = frame.row_gates();
        for (index, task) in frame.tasks.iter().enumerate() {
            let row_gates = gates.get(index).map_or(&[][..], Vec::as_slice);
            svg.push_str(&self.render_task_row(frame, task, index, row_gates));
        }
        svg.push_str("                </g>\n");

        if self.show_dependencies {
            svg.push_str(&self.render_dependencies(frame));
        }

        if self.show_today {
            svg.push_str(&self.render_today_line(frame));
        }

        svg
    }

    /// Month labels and ticks
    fn render_header(&self, frame: &ChartFrame<'_>) -> String {
        let mut svg = String::new();
        let layout = frame.layout;
        let timeline = &layout.timeline;

        svg.push_str(&format!(
            r#"                <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
            self.padding,
            self.padding,
            self.label_width as f64 + layout.canvas_width,
            self.header_height,
            self.theme.header_bg
        ));
        svg.push('\n');

        let tick_bottom = self.chart_y0();
        for month in timeline.month_starts() {
            let x = self.chart_x0() + timeline.x_for(month, layout.day_width);
            svg.push_str(&format!(
                r#"                <line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="{color}" stroke-width="1"/>"#,
                x = x,
                y1 = tick_bottom - 10.0,
                y2 = tick_bottom,
                color = self.theme.text_color
            ));
            svg.push('\n');
            svg.push_str(&format!(
                r#"                <text x="{x}" y="{y}" font-size="11" fill="{color}">{label}</text>"#,
                x = x + 4.0,
                y = tick_bottom - 15.0,
                color = self.theme.text_color,
                label = month.format("%b %Y")
            ));
            svg.push('\n');
        }

        svg.push_str(&format!(
            r#"                <text x="{x}" y="{y}" font-size="12" font-weight="bold" fill="{color}">{label}</text>"#,
            x = self.padding + 8,
            y = self.padding + 22,
            color = self.theme.text_color,
            label = format_range(timeline.min_date, timeline.max_date)
        ));
        svg.push('\n');

        svg
    }

    /// Row separators and month lines
    fn render_grid(&self, frame: &ChartFrame<'_>) -> String {
        let mut svg = String::new();
        let layout = frame.layout;
        let top = self.chart_y0();
        let bottom = top + layout.canvas_height;
        let right = self.chart_x0() + layout.canvas_width;

        for i in 0..=layout.rows.len() {
            let y = top + i as f64 * layout.row_height;
            svg.push_str(&format!(
                r#"                <line x1="{x1}" y1="{y}" x2="{x2}" y2="{y}" stroke="{color}" stroke-width="1"/>"#,
                x1 = self.padding,
                y = y,
                x2 = right,
                color = self.theme.grid_color
            ));
            svg.push('\n');
        }

        for month in layout.timeline.month_starts() {
            let x = self.chart_x0() + layout.timeline.x_for(month, layout.day_width);
            svg.push_str(&format!(
                r#"                <line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="{color}" stroke-width="1"/>"#,
                x = x,
                y1 = top,
                y2 = bottom,
                color = self.theme.grid_color
            ));
            svg.push('\n');
        }

        svg
    }

    /// One row: label, project toggle, bar
    fn render_task_row(&self, frame: &ChartFrame<'_>, task: &Task, index: usize, gates: &[&str]) -> String {
        let Some(row) = frame.layout.row(index) else {
            return String::new();
        };
        let row_height = frame.layout.row_height;
        let y = self.chart_y0() + row.row_top;
        let text_y = y + row_height / 2.0 + 4.0;

        let gates_json = serde_json::to_string(gates).unwrap_or_else(|_| "[]".into());
        let hidden = if row.visible { "" } else { r#" style="display:none""# };

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"                <g class="gantt-row {kind}" data-row="{index}" data-gates="{gates}"{hidden}>"#,
            kind = task.task_type.css_class(),
            index = index,
            gates = html_escape(&gates_json),
            hidden = hidden
        ));
        svg.push('\n');

        let indent = task.level.min(8) as f64 * 16.0;
        let label_x = self.padding as f64 + 20.0 + indent;

        if task.is_project() && task.is_referenceable() {
            let icon = if frame.visibility.is_expanded(&task.id) { "▼" } else { "▶" };
            svg.push_str(&format!(
                r#"                    <text x="{x}" y="{y}" font-size="10" fill="{color}" class="collapse-icon" data-project="{id}" style="cursor:pointer">{icon}</text>"#,
                x = label_x - 14.0,
                y = text_y,
                color = self.theme.text_color,
                id = html_escape(&task.id),
                icon = icon
            ));
            svg.push('\n');
        }

        // ~7px per char at 12px font
        let available_px = (self.label_width as f64 - indent - 28.0).max(0.0);
        let max_chars = (available_px / 7.0) as usize;
        let weight = if task.is_project() { r#" font-weight="bold""# } else { "" };
        svg.push_str(&format!(
            r#"                    <text x="{x}" y="{y}" font-size="12" fill="{color}"{weight}>{label}</text>"#,
            x = label_x,
            y = text_y,
            color = self.theme.text_color,
            weight = weight,
            label = html_escape(&truncate(&task.name, max_chars.max(10)))
        ));
        svg.push('\n');

        if let Some(bar) = row.bar {
            let bar_height = row_height * 0.6;
            let bar_y = y + (row_height - bar_height) / 2.0;
            let mut classes = vec!["task-bar", task.task_type.css_class()];
            let fill = if bar.placeholder {
                classes.push("no-dates");
                self.theme.placeholder_color.as_str()
            } else {
                self.theme.fill_for(&task.task_type)
            };
            let stroke = match task.due_state() {
                Some(state) => {
                    classes.push(state.css_class());
                    match state {
                        sheetgantt_core::DueState::Overdue => self.theme.overdue_color.as_str(),
                        sheetgantt_core::DueState::DueSoon => self.theme.due_soon_color.as_str(),
                        sheetgantt_core::DueState::Normal => "none",
                    }
                }
                None => "none",
            };
            let dash = if bar.placeholder { r#" stroke-dasharray="4,3""# } else { "" };

            svg.push_str(&format!(
                r#"                    <rect x="{x}" y="{y}" width="{w}" height="{h}" rx="3" fill="{fill}" stroke="{stroke}" stroke-width="2"{dash} class="{classes}" data-row="{index}"/>"#,
                x = self.chart_x0() + bar.left,
                y = bar_y,
                w = bar.width,
                h = bar_height,
                fill = fill,
                stroke = stroke,
                dash = dash,
                classes = classes.join(" "),
                index = index
            ));
            svg.push('\n');
        }

        svg.push_str("                </g>\n");
        svg
    }

    /// Connectors for every resolvable edge; the ones touching hidden rows start hidden
    fn render_dependencies(&self, frame: &ChartFrame<'_>) -> String {
        let mut svg = String::new();
        svg.push_str(r#"                <g class="dependencies">"#);
        svg.push('\n');

        for connector in frame.all_connectors() {
            let visible = [connector.from_index, connector.to_index]
                .iter()
                .all(|&i| frame.layout.row(i).map_or(false, |r| r.visible));
            svg.push_str(&format!(
                r#"                    <path d="{path}" fill="none" stroke="{color}" stroke-width="1.5" marker-end="url(#arrowhead)" class="dep-arrow" data-from="{from}" data-to="{to}"{hidden}/>
"#,
                path = translated_path(&connector, self.chart_x0(), self.chart_y0()),
                color = self.theme.arrow_color,
                from = connector.from_index,
                to = connector.to_index,
                hidden = if visible { "" } else { r#" style="display:none""# }
            ));
        }

        svg.push_str("                </g>\n");
        svg
    }

    fn render_today_line(&self, frame: &ChartFrame<'_>) -> String {
        let layout = frame.layout;
        if !layout.timeline.contains(frame.today) {
            return String::new();
        }
        let x = self.chart_x0() + layout.timeline.x_for(frame.today, layout.day_width);
        format!(
            r#"                <line x1="{x}" y1="{y1}" x2="{x}" y2="{y2}" stroke="{color}" stroke-width="2" class="today-line"/>
"#,
            x = x,
            y1 = self.chart_y0(),
            y2 = self.chart_y0() + layout.canvas_height,
            color = self.theme.today_color
        )
    }

    fn generate_css(&self) -> String {
        format!(
            r#"        :root {{
            --project-color: {project};
            --task-color: {task};
            --subtask-color: {subtask};
            --placeholder-color: {placeholder};
            --overdue-color: {overdue};
            --due-soon-color: {due_soon};
            --bg-color: {bg};
            --text-color: {text};
        }}
        * {{ margin: 0; padding: 0; box-sizing: border-box; }}
        body {{
            font-family: system-ui, -apple-system, sans-serif;
            background: var(--bg-color);
            color: var(--text-color);
            padding: 20px;
        }}
        .gantt-container {{
            max-width: 100%;
            overflow-x: auto;
        }}
        .gantt-header {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-bottom: 16px;
        }}
        .gantt-header h1 {{
            font-size: 1.5rem;
            font-weight: 600;
        }}
        .gantt-controls button {{
            padding: 8px 16px;
            margin-left: 8px;
            border: 1px solid var(--text-color);
            background: transparent;
            color: var(--text-color);
            cursor: pointer;
            border-radius: 4px;
            font-size: 14px;
        }}
        .gantt-controls button:hover {{
            background: rgba(128,128,128,0.2);
        }}
        .gantt-wrapper {{
            overflow-x: auto;
            border: 1px solid rgba(128,128,128,0.3);
            border-radius: 8px;
        }}
        .gantt-legend {{
            display: flex;
            gap: 24px;
            margin-top: 16px;
            font-size: 13px;
        }}
        .legend-item {{
            display: flex;
            align-items: center;
            gap: 6px;
        }}
        .legend-box {{
            width: 16px;
            height: 12px;
            border-radius: 2px;
        }}
        .legend-box.project {{ background: var(--project-color); }}
        .legend-box.task {{ background: var(--task-color); }}
        .legend-box.subtask {{ background: var(--subtask-color); }}
        .legend-box.no-dates {{ background: var(--placeholder-color); border: 1px dashed var(--text-color); }}
        .legend-box.overdue {{ border: 2px solid var(--overdue-color); }}
        .legend-box.due-soon {{ border: 2px solid var(--due-soon-color); }}
        .task-bar {{
            cursor: pointer;
            transition: opacity 0.2s;
        }}
        .task-bar:hover {{
            opacity: 0.8;
        }}
        .dep-arrow {{
            opacity: 0.7;
        }}
        .today-line {{
            pointer-events: none;
            stroke-dasharray: 6,4;
        }}
        .tooltip {{
            position: fixed;
            background: rgba(0,0,0,0.9);
            color: white;
            padding: 12px;
            border-radius: 6px;
            font-size: 13px;
            pointer-events: none;
            opacity: 0;
            transition: opacity 0.2s;
            z-index: 1000;
            max-width: 320px;
        }}
        .tooltip.visible {{
            opacity: 1;
        }}
        .tooltip .task-name {{
            font-weight: 600;
            margin-bottom: 8px;
        }}
        .tooltip .task-dates {{
            color: #aaa;
        }}"#,
            project = self.theme.project_color,
            task = self.theme.task_color,
            subtask = self.theme.subtask_color,
            placeholder = self.theme.placeholder_color,
            overdue = self.theme.overdue_color,
            due_soon = self.theme.due_soon_color,
            bg = self.theme.background_color,
            text = self.theme.text_color,
        )
    }

    /// Generate JavaScript for tooltips, toggles and zoom
    fn generate_js(&self, frame: &ChartFrame<'_>) -> Result<String, RenderError> {
        let task_data: Vec<TooltipData<'_>> = frame.tasks.iter().map(TooltipData::from_task).collect();
        let task_data = script_json(&task_data)?;

        let state: std::collections::BTreeMap<&str, bool> = frame.visibility.iter().collect();
        let collapse_state = script_json(&state)?;

        Ok(format!(
            r#"        const taskData = {task_data};
        const collapseState = {collapse_state};

        // Collapse / expand
        function rowVisible(row) {{
            const gates = JSON.parse(row.getAttribute('data-gates') || '[]');
            return gates.every(id => collapseState[id] !== false);
        }}

        function applyVisibility() {{
            const shown = {{}};
            document.querySelectorAll('.gantt-row').forEach(row => {{
                const visible = rowVisible(row);
                shown[row.getAttribute('data-row')] = visible;
                row.style.display = visible ? '' : 'none';
            }});
            document.querySelectorAll('.dep-arrow').forEach(path => {{
                const visible = shown[path.getAttribute('data-from')] && shown[path.getAttribute('data-to')];
                path.style.display = visible ? '' : 'none';
            }});
            document.querySelectorAll('.collapse-icon').forEach(icon => {{
                const id = icon.getAttribute('data-project');
                icon.textContent = collapseState[id] === false ? '▶' : '▼';
            }});
        }}

        function toggleProject(id) {{
            if (!(id in collapseState)) return;
            collapseState[id] = !collapseState[id];
            applyVisibility();
        }}

        function expandAll() {{
            Object.keys(collapseState).forEach(id => {{ collapseState[id] = true; }});
            applyVisibility();
        }}

        function collapseAll() {{
            Object.keys(collapseState).forEach(id => {{ collapseState[id] = false; }});
            applyVisibility();
        }}

        document.querySelectorAll('.collapse-icon').forEach(icon => {{
            icon.addEventListener('click', () => toggleProject(icon.getAttribute('data-project')));
        }});

        // Zoom functionality
        let currentZoom = 1;
        const svg = document.getElementById('gantt-svg');

        function zoomIn() {{
            currentZoom = Math.min(currentZoom * 1.2, 3);
            applyZoom();
        }}

        function zoomOut() {{
            currentZoom = Math.max(currentZoom / 1.2, 0.5);
            applyZoom();
        }}

        function resetZoom() {{
            currentZoom = 1;
            applyZoom();
        }}

        function applyZoom() {{
            svg.style.transform = `scale(${{currentZoom}})`;
            svg.style.transformOrigin = 'top left';
        }}

        // Tooltip functionality
        const tooltip = document.getElementById('tooltip');

        function escapeHtml(value) {{
            return String(value).replace(/[&<>"]/g, c => ({{ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }})[c]);
        }}

        document.querySelectorAll('.task-bar').forEach(bar => {{
            bar.addEventListener('mouseenter', () => {{
                const data = taskData[Number(bar.getAttribute('data-row'))];
                if (!data) return;
                const lines = [
                    `<div class="task-name">${{escapeHtml(data.name)}}</div>`,
                    `<div class="task-dates">${{data.start || '?'}} → ${{data.end || '?'}}</div>`,
                ];
                if (data.assigned_to) lines.push(`<div>Assigned: ${{escapeHtml(data.assigned_to)}}</div>`);
                if (data.status) lines.push(`<div>Status: ${{escapeHtml(data.status)}}</div>`);
                if (data.duration_days !== null) lines.push(`<div>Duration: ${{data.duration_days}} days</div>`);
                if (data.remaining_days !== null) lines.push(`<div>Remaining: ${{data.remaining_days}} days</div>`);
                if (data.description) lines.push(`<div>${{escapeHtml(data.description)}}</div>`);
                tooltip.innerHTML = lines.join('');
                tooltip.classList.add('visible');
            }});

            bar.addEventListener('mousemove', (e) => {{
                tooltip.style.left = (e.clientX + 15) + 'px';
                tooltip.style.top = (e.clientY + 15) + 'px';
            }});

            bar.addEventListener('mouseleave', () => {{
                tooltip.classList.remove('visible');
            }});
        }});"#,
            task_data = task_data,
            collapse_state = collapse_state,
        ))
    }
}

/// Per-row tooltip payload, indexed by row in the page script
#[derive(Serialize)]
struct TooltipData<'a> {
    id: &'a str,
    name: &'a str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    assigned_to: Option<&'a str>,
    status: Option<&'a str>,
    description: Option<&'a str>,
    duration_days: Option<i64>,
    remaining_days: Option<i64>,
}

impl<'a> TooltipData<'a> {
    fn from_task(task: &'a Task) -> Self {
        Self {
            id: &task.id,
            name: &task.name,
            start: task.start_date,
            end: task.end_date,
            assigned_to: task.assigned_to.as_deref(),
            status: task.status.as_deref(),
            description: task.description.as_deref(),
            duration_days: task.duration_days,
            remaining_days: task.remaining_days,
        }
    }
}

impl Renderer for HtmlGanttRenderer {
    type Output = String;

    fn render(&self, frame: &ChartFrame<'_>) -> Result<String, RenderError> {
        crate::check_frame(frame)?;
        self.generate_html(frame)
    }
}

/// JSON for embedding inside a `<script>` element
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    let json = serde_json::to_string(value)
        .map_err(|e| RenderError::Format(format!("Failed to encode script data: {}", e)))?;
    Ok(json.replace("</", "<\\/"))
}

/// Connector path shifted into page coordinates
pub(crate) fn translated_path(connector: &Connector, dx: f64, dy: f64) -> String {
    connector
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}{},{}", if i == 0 { 'M' } else { 'L' }, p.x + dx, p.y + dy))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_range(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} – {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
}

/// HTML-escape a string
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Truncate a string with ellipsis
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!(
            "{}…",
            s.chars().take(max.saturating_sub(1)).collect::<String>()
        )
    }
}
