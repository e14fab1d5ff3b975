use anyhow::Result;
use bike_dashboard::{
    Chart, ChartGroup, ChartKind, Dashboard, DashboardView, DateRange, GroupOutcome,
};
use chrono::{Duration, Months, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart as LineChart, Dataset,
        GraphType, Paragraph, Row, Table, Wrap,
    },
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    Start,
    End,
}

impl DateField {
    pub fn toggle(&self) -> Self {
        match self {
            DateField::Start => DateField::End,
            DateField::End => DateField::Start,
        }
    }
}

pub struct App {
    pub dashboard: Dashboard,
    pub range: DateRange,
    pub focus: DateField,
    pub selected_group: usize,
    pub zoomed: bool,
    pub view: DashboardView,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let range = dashboard.full_range();
        let view = dashboard.render(range);

        Self {
            dashboard,
            range,
            focus: DateField::Start,
            selected_group: 0,
            zoomed: false,
            view,
        }
    }

    /// Recompute every chart group for the current range
    pub fn refresh(&mut self) {
        self.view = self.dashboard.render(self.range);
        self.range = self.view.range;
    }

    fn set_focused(&mut self, date: NaiveDate) {
        let (min, max) = (self.view.min_date, self.view.max_date);
        let date = date.clamp(min, max);
        match self.focus {
            DateField::Start => self.range.start = date,
            DateField::End => self.range.end = date,
        }
        self.refresh();
    }

    fn focused_date(&self) -> NaiveDate {
        match self.focus {
            DateField::Start => self.range.start,
            DateField::End => self.range.end,
        }
    }

    pub fn shift_days(&mut self, days: i64) {
        let date = self.focused_date() + Duration::days(days);
        self.set_focused(date);
    }

    pub fn shift_months(&mut self, months: i32) {
        let current = self.focused_date();
        let shifted = if months >= 0 {
            current.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            current.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        if let Some(date) = shifted {
            self.set_focused(date);
        }
    }

    pub fn toggle_field(&mut self) {
        self.focus = self.focus.toggle();
    }

    pub fn reset_range(&mut self) {
        self.range = self.dashboard.full_range();
        self.refresh();
    }

    pub fn next_group(&mut self) {
        let len = self.view.groups.len();
        if len > 0 {
            self.selected_group = (self.selected_group + 1) % len;
        }
    }

    pub fn previous_group(&mut self) {
        let len = self.view.groups.len();
        if len > 0 {
            self.selected_group = (self.selected_group + len - 1) % len;
        }
    }

    pub fn toggle_zoom(&mut self) {
        self.zoomed = !self.zoomed;
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab | KeyCode::BackTab => app.toggle_field(),
                KeyCode::Left | KeyCode::Char('h') => app.shift_days(-1),
                KeyCode::Right | KeyCode::Char('l') => app.shift_days(1),
                KeyCode::Up | KeyCode::Char('k') => app.shift_months(1),
                KeyCode::Down | KeyCode::Char('j') => app.shift_months(-1),
                KeyCode::PageDown => app.next_group(),
                KeyCode::PageUp => app.previous_group(),
                KeyCode::Enter => app.toggle_zoom(),
                KeyCode::Char('r') => app.reset_range(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(34), // Sidebar
            Constraint::Min(0),     // Main panel
        ])
        .split(f.size());

    render_sidebar(f, columns[0], app);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header + subheader
            Constraint::Min(0),    // Chart groups
            Constraint::Length(3), // Status bar
        ])
        .split(columns[1]);

    render_header(f, rows[0], app);
    render_groups(f, rows[1], app);
    render_status_bar(f, rows[2]);
}

// ============================================================================
// SIDEBAR
// ============================================================================

fn render_sidebar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Logo
            Constraint::Length(7), // Date picker
            Constraint::Min(0),    // Summary
        ])
        .split(area);

    let logo = Paragraph::new(vec![
        Line::from(Span::styled(
            "🚲 Bike Sharing",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            app.view.logo_url.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(logo, chunks[0]);

    let field = |label: &str, date: NaiveDate, focused: bool| {
        let style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::raw(if focused { "→ " } else { "  " }),
            Span::styled(format!("{:<6}", label), Style::default().fg(Color::Gray)),
            Span::styled(date.format("%Y-%m-%d").to_string(), style),
        ])
    };

    let mut picker = vec![
        field("Start", app.range.start, app.focus == DateField::Start),
        field("End", app.range.end, app.focus == DateField::End),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} .. {}", app.view.min_date, app.view.max_date),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if app.range.is_inverted() {
        picker.push(Line::from(Span::styled(
            "  start is after end",
            Style::default().fg(Color::Red),
        )));
    }

    let picker = Paragraph::new(picker).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Date Range "),
    );
    f.render_widget(picker, chunks[1]);

    let summary = &app.view.summary;
    let summary_lines = vec![
        Line::from(format!("Days        {:>10}", summary.days)),
        Line::from(format!("Rentals     {:>10}", summary.total_rentals)),
        Line::from(Span::styled(
            format!("Casual      {:>10}", summary.casual_rentals),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            format!("Registered  {:>10}", summary.registered_rentals),
            Style::default().fg(Color::Blue),
        )),
    ];
    let summary_widget = Paragraph::new(summary_lines)
        .block(Block::default().borders(Borders::ALL).title(" Summary "));
    f.render_widget(summary_widget, chunks[2]);
}

// ============================================================================
// MAIN PANEL
// ============================================================================

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            app.view.header.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.view.subheader.clone(),
            Style::default().fg(Color::White),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_groups(f: &mut Frame, area: Rect, app: &App) {
    let groups = &app.view.groups;
    if groups.is_empty() {
        return;
    }

    if app.zoomed {
        if let Some(outcome) = groups.get(app.selected_group) {
            render_outcome(f, area, outcome, true);
        }
        return;
    }

    let constraints: Vec<Constraint> = groups
        .iter()
        .map(|_| Constraint::Ratio(1, groups.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, outcome) in groups.iter().enumerate() {
        render_outcome(f, chunks[i], outcome, i == app.selected_group);
    }
}

fn render_outcome(f: &mut Frame, area: Rect, outcome: &GroupOutcome, selected: bool) {
    let border = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", outcome.title()));

    match outcome {
        GroupOutcome::Rendered(group) => {
            let inner = block.inner(area);
            f.render_widget(block, area);
            render_group(f, inner, group);
        }
        GroupOutcome::Failed { message, .. } => {
            let text = Paragraph::new(format!("Unable to render: {}", message))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(text, area);
        }
    }
}

fn render_group(f: &mut Frame, area: Rect, group: &ChartGroup) {
    if group.charts.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = group
        .charts
        .iter()
        .map(|_| Constraint::Ratio(1, group.charts.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (chart, chunk) in group.charts.iter().zip(chunks.iter()) {
        render_chart(f, *chunk, chart);
    }
}

fn render_chart(f: &mut Frame, area: Rect, chart: &Chart) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", chart.title));

    if chart.is_empty() {
        let placeholder = Paragraph::new("No data")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    match &chart.kind {
        ChartKind::Line { points } => {
            let data: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
            let y_max = points.iter().map(|p| p.y).fold(1.0, f64::max) * 1.1;

            let dataset = Dataset::default()
                .name(chart.y_label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(Color::Cyan))
                .data(&data);

            let widget = LineChart::new(vec![dataset])
                .block(block)
                .x_axis(
                    Axis::default()
                        .title(chart.x_label.clone())
                        .bounds([1.0, 12.0])
                        .labels(vec![Span::raw("Jan"), Span::raw("Jun"), Span::raw("Dec")]),
                )
                .y_axis(
                    Axis::default()
                        .bounds([0.0, y_max])
                        .labels(vec![Span::raw("0"), Span::raw(format!("{:.0}", y_max))]),
                );
            f.render_widget(widget, area);
        }
        ChartKind::Bar { bars, horizontal } => {
            let bars: Vec<Bar> = bars
                .iter()
                .map(|b| {
                    Bar::default()
                        .value(b.value.round() as u64)
                        .label(Line::from(b.label.clone()))
                        .text_value(format!("{:.0}", b.value))
                })
                .collect();

            let mut widget = BarChart::default()
                .block(block)
                .data(BarGroup::default().bars(&bars))
                .bar_style(Style::default().fg(Color::Green))
                .value_style(Style::default().fg(Color::Black).bg(Color::Green));
            widget = if *horizontal {
                widget.direction(Direction::Horizontal).bar_width(1).bar_gap(0)
            } else {
                widget.bar_width(9).bar_gap(2)
            };
            f.render_widget(widget, area);
        }
        ChartKind::Histogram { bins } => {
            let bars: Vec<Bar> = bins
                .iter()
                .map(|b| {
                    Bar::default()
                        .value(b.count as u64)
                        .label(Line::from(format!("{:.0}", b.start)))
                })
                .collect();

            let widget = BarChart::default()
                .block(block)
                .data(BarGroup::default().bars(&bars))
                .bar_width(3)
                .bar_gap(0)
                .bar_style(Style::default().fg(Color::Blue));
            f.render_widget(widget, area);
        }
        ChartKind::BoxPlot { boxes } => {
            let header = Row::new(["Month", "n", "Low", "Q1", "Median", "Q3", "High"].map(|h| {
                Cell::from(h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            }));

            let rows = boxes.iter().map(|b| {
                Row::new(vec![
                    Cell::from(b.label.clone()),
                    Cell::from(b.count.to_string()),
                    Cell::from(format!("{:.0}", b.lower_whisker)),
                    Cell::from(format!("{:.0}", b.q1)),
                    Cell::from(format!("{:.0}", b.median)).style(Style::default().fg(Color::Cyan)),
                    Cell::from(format!("{:.0}", b.q3)),
                    Cell::from(format!("{:.0}", b.upper_whisker)),
                ])
            });

            let table = Table::new(rows, [Constraint::Length(6); 7])
                .header(header)
                .block(block);
            f.render_widget(table, area);
        }
    }
}

fn render_status_bar(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));

    let status = Paragraph::new(Line::from(vec![
        key("Tab"),
        Span::raw(" Start/End | "),
        key("←/→"),
        Span::raw(" Day | "),
        key("↑/↓"),
        Span::raw(" Month | "),
        key("PgUp/PgDn"),
        Span::raw(" Group | "),
        key("Enter"),
        Span::raw(" Zoom | "),
        key("r"),
        Span::raw(" Reset | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(status, area);
}
