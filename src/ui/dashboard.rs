use crate::export::{cell_text, ChartAction, TableAction};
use crate::ui::app::{App, DatabaseStatus, FocusPanel, Speaker};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, Wrap,
    },
    Frame,
};

// Brandbook colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C); // #1f2f3c
const BRAND_ACCENT: Color = Color::Rgb(0x58, 0x6B, 0x71); // #586b71 - assistant lines
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0); // #c3d3e0
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68); // #829a68 - ready / bars
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C); // #9e683c - focus / notices
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65); // #716565 - footer

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
    let help = match app.focus_panel {
        FocusPanel::Input => " Enter Send | Tab Results | Esc Quit ",
        FocusPanel::Results => " ↑↓ Row | Tab Chat | q Quit ",
    };
    draw_footer(frame, chunks[2], help);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let (status, color) = match app.database_status() {
        DatabaseStatus::NotLoaded => ("not loaded".to_string(), BRAND_ORANGE),
        DatabaseStatus::Loading => ("loading...".to_string(), BRAND_ORANGE),
        DatabaseStatus::Ready(count) => (format!("{count} elements"), BRAND_GREEN),
    };

    let title = Line::from(vec![
        Span::styled(format!(" BIM Assistant | {} | ", app.source), HEADER_STYLE),
        Span::styled(status, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" | {} ", app.selection_summary()), HEADER_STYLE),
    ]);

    let header = Paragraph::new(title).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(40), // Chat
        Constraint::Percentage(60), // Results
    ])
    .split(area);

    draw_chat(frame, chunks[0], app);

    let outcome = app.outcome.as_ref();
    let table = outcome.and_then(|o| o.table.as_ref());
    match outcome.and_then(|o| o.chart.as_ref()) {
        Some(chart) => {
            let results = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);
            draw_results(frame, results[0], app, table);
            draw_chart(frame, results[1], chart);
        }
        None => draw_results(frame, chunks[1], app, table),
    }
}

fn draw_chat(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).split(area);

    let lines: Vec<Line> = app
        .messages
        .iter()
        .map(|m| {
            let (prefix, color) = match m.speaker {
                Speaker::User => ("> ", BRAND_DARK),
                Speaker::Assistant => ("", BRAND_ACCENT),
                Speaker::Notice => ("! ", BRAND_ORANGE),
            };
            Line::from(Span::styled(format!("{prefix}{}", m.text), Style::default().fg(color)))
        })
        .collect();

    // Keep the newest lines in view.
    let visible = (chunks[0].height as usize).saturating_sub(2);
    let skip = lines.len().saturating_sub(visible);
    let log = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>())
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" Chat ").borders(Borders::ALL));
    frame.render_widget(log, chunks[0]);

    let input = Paragraph::new(format!("{}_", app.input)).block(
        Block::default()
            .title(" Message ")
            .borders(Borders::ALL)
            .border_style(focus_border(app.focus_panel == FocusPanel::Input)),
    );
    frame.render_widget(input, chunks[1]);
}

fn draw_results(frame: &mut Frame, area: Rect, app: &App, table: Option<&TableAction>) {
    let is_focused = app.focus_panel == FocusPanel::Results;
    let block = |title: String| {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(is_focused))
    };

    let Some(table) = table else {
        let ids = app
            .outcome
            .as_ref()
            .and_then(|o| o.selection.as_ref())
            .map(|s| {
                s.ids
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let body = Paragraph::new(ids)
            .style(Style::default().fg(BRAND_MUTED))
            .wrap(Wrap { trim: true })
            .block(block(" Selection ".to_string()));
        frame.render_widget(body, area);
        return;
    };

    // Calculate visible area (subtract 3 for borders and header)
    let visible_rows = (area.height as usize).saturating_sub(3);
    let scroll_offset = if app.selected_row >= visible_rows {
        app.selected_row - visible_rows + 1
    } else {
        0
    };

    let header = Row::new(table.columns.clone()).style(HEADER_STYLE).height(1);
    let rows: Vec<Row> = table
        .rows
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|(i, cells)| {
            let style = if i == app.selected_row && is_focused {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            Row::new(cells.iter().map(cell_text).collect::<Vec<_>>()).style(style)
        })
        .collect();

    let column_count = table.columns.len().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, column_count); table.columns.len()];
    let title = format!(" {} ({} rows) ", table.title, table.rows.len());
    frame.render_widget(Table::new(rows, widths).header(header).block(block(title)), area);

    if table.rows.len() > visible_rows {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state = ScrollbarState::new(table.rows.len()).position(app.selected_row);

        let scrollbar_area = Rect {
            x: area.x + area.width - 1,
            y: area.y + 2,
            width: 1,
            height: area.height - 3,
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn draw_chart(frame: &mut Frame, area: Rect, chart: &ChartAction) {
    let Some(dataset) = chart.datasets.first() else {
        return;
    };

    // Bars take integer heights; volumes are scaled to litres and labelled in m3.
    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(&dataset.data)
        .map(|(label, value)| {
            Bar::default()
                .value((value.max(0.0) * 1000.0).round() as u64)
                .text_value(format!("{value:.3}"))
                .label(Line::from(label.clone()))
                .style(Style::default().fg(BRAND_GREEN))
        })
        .collect();

    let widget = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {} ({}) ", chart.title, dataset.label))
                .borders(Borders::ALL),
        )
        .bar_width(7)
        .bar_gap(2)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(widget, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help)
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
