pub mod detail_panel;
pub mod header;
pub mod help;
pub mod selection_bar;
pub mod statusbar;
pub mod table;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App) {
    if !app.ready {
        render_loading(frame, frame.area(), app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    if let Some(info) = &app.system {
        header::render(frame, chunks[0], info, app.rows.len(), &app.theme);
    }

    table::render(
        frame,
        chunks[1],
        &table::TableView {
            rows: &app.rows,
            selected: app.selected_index,
            sort_key: app.sort_key,
            descending: app.sort_descending,
            filter_text: &app.filter_text,
        },
        &app.theme,
    );

    let selected = app
        .selected_row()
        .map(|(name, summary)| selection_bar::SelectionInfo {
            name: name.clone(),
            pid_count: summary.pid_count,
            memory_mb: summary.memory_mb,
        });
    selection_bar::render(frame, chunks[2], selected, &app.theme);

    statusbar::render(
        frame,
        chunks[3],
        &statusbar::StatusView {
            input_mode: app.input_mode,
            filter_text: &app.filter_text,
            status: app.status_message.as_ref(),
            sort_label: app.sort_key.label(),
            instances_open: app.instances.is_some(),
        },
        &app.theme,
    );

    if let Some(panel) = &app.instances {
        detail_panel::render(frame, chunks[1], panel, &app.theme);
    }

    // Help goes last so it sits above everything else.
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);
    let text = Paragraph::new("Loading process data...")
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(app.theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(text, middle);
}
