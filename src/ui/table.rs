use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use grouptop::format::{format_age, truncate_unicode};
use grouptop::system::group::GroupSummary;
use grouptop::system::query::SortKey;

use crate::ui::theme::Theme;

/// Rows above this total are drawn in the warning color.
pub const HIGH_MEMORY_ROW_MB: f64 = 1000.0;

const NAME_WIDTH: usize = 32;

pub struct TableView<'a> {
    pub rows: &'a [(String, GroupSummary)],
    pub selected: usize,
    pub sort_key: SortKey,
    pub descending: bool,
    pub filter_text: &'a str,
}

pub fn render(frame: &mut Frame, area: Rect, view: &TableView<'_>, theme: &Theme) {
    let now = unix_now();
    let header = Row::new(column_titles(view.sort_key, view.descending)).style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = view
        .rows
        .iter()
        .map(|(name, summary)| {
            let style = if summary.memory_mb > HIGH_MEMORY_ROW_MB {
                Style::default().fg(theme.high_memory)
            } else {
                Style::default().fg(theme.text_primary)
            };
            Row::new(vec![
                Cell::from(truncate_unicode(name, NAME_WIDTH)),
                Cell::from(format!("{:.1}", summary.memory_mb)),
                Cell::from(format!("{:.1}", summary.cpu_percent)),
                Cell::from(summary.status.label()),
                Cell::from(summary.pid_count.to_string()),
                Cell::from(group_age(summary.start_time, now)),
            ])
            .style(style)
        })
        .collect();

    let title = if view.filter_text.is_empty() {
        format!(" Process groups ({}) ", view.rows.len())
    } else {
        format!(
            " Process groups ({}) matching \"{}\" ",
            view.rows.len(),
            view.filter_text
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.overlay_border))
            .title(Span::styled(
                title,
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::BOLD),
            )),
    )
    .row_highlight_style(
        Style::default()
            .bg(theme.selection_bg)
            .fg(theme.selection_fg)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if !view.rows.is_empty() {
        state.select(Some(view.selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

/// Column titles with an arrow on the active sort column.
fn column_titles(sort_key: SortKey, descending: bool) -> Vec<String> {
    let arrow = if descending { " \u{25bc}" } else { " \u{25b2}" };
    let mark = |key: SortKey, title: &str| {
        if key == sort_key {
            format!("{title}{arrow}")
        } else {
            title.to_string()
        }
    };
    vec![
        mark(SortKey::Name, "Name"),
        mark(SortKey::Memory, "Memory (MB)"),
        mark(SortKey::Cpu, "CPU %"),
        "Status".to_string(),
        "Count".to_string(),
        mark(SortKey::StartTime, "Uptime"),
    ]
}

fn group_age(start_time: u64, now: u64) -> String {
    if start_time == 0 {
        return "-".to_string();
    }
    format_age(now.saturating_sub(start_time))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
