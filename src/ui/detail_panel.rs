use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};

use grouptop::system::instances::{InstanceDetail, InstanceTag};

use crate::app::InstancePanel;
use crate::ui::help::centered_rect;
use crate::ui::theme::Theme;

/// Sum of memory and CPU over every listed instance.
pub fn totals(instances: &[InstanceDetail]) -> (f64, f64) {
    instances.iter().fold((0.0, 0.0), |(mem, cpu), i| {
        (mem + i.memory_mb, cpu + i.cpu_percent)
    })
}

pub fn render(frame: &mut Frame, area: Rect, panel: &InstancePanel, theme: &Theme) {
    let width = 64u16.min(area.width.saturating_sub(4));
    // Borders, header and the TOTAL row.
    let wanted = panel.instances.len().max(1) as u16 + 4;
    let height = wanted.min(area.height.saturating_sub(2));
    let overlay = centered_rect(width, height, area);

    frame.render_widget(Clear, overlay);

    // Instance rows plus TOTAL, below the header row.
    let total_rows = panel.instances.len() + 1;
    let visible = usize::from(overlay.height.saturating_sub(3));
    let offset = scroll_offset(panel.scroll, total_rows, visible);
    let title = if total_rows > visible && visible > 0 {
        format!(
            " {} instances {}-{} of {} ",
            panel.name,
            offset + 1,
            (offset + visible).min(panel.instances.len()),
            panel.instances.len()
        )
    } else {
        format!(" {} instances ", panel.name)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ));

    if panel.loading {
        frame.render_widget(
            Paragraph::new(" Loading instances...").block(block),
            overlay,
        );
        return;
    }
    if panel.instances.is_empty() {
        frame.render_widget(
            Paragraph::new(" No running instances").block(block),
            overlay,
        );
        return;
    }

    let mut rows: Vec<Row> = panel
        .instances
        .iter()
        .map(|instance| {
            let tag_cell = match instance.tag {
                Some(tag) => Cell::from(tag.as_str()).style(Style::default().fg(tag_color(tag, theme))),
                None => Cell::from(""),
            };
            Row::new(vec![
                Cell::from(instance.pid.to_string()),
                Cell::from(format!("{:.1}", instance.memory_mb)),
                Cell::from(format!("{:.1}", instance.cpu_percent)),
                Cell::from(instance.status.label()),
                tag_cell,
            ])
            .style(Style::default().fg(theme.text_primary))
        })
        .collect();

    let (memory, cpu) = totals(&panel.instances);
    rows.push(
        Row::new(vec![
            Cell::from("TOTAL"),
            Cell::from(format!("{memory:.1}")),
            Cell::from(format!("{cpu:.1}")),
            Cell::from(""),
            Cell::from(""),
        ])
        .style(
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
    );

    let header = Row::new(vec!["PID", "Memory (MB)", "CPU %", "Status", "Tag"]).style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .block(block);

    let mut state = TableState::default().with_offset(offset);
    frame.render_stateful_widget(table, overlay, &mut state);
}

/// Keeps the last page full: scrolling past it pins the TOTAL row to the
/// bottom edge.
fn scroll_offset(scroll: usize, total_rows: usize, visible: usize) -> usize {
    scroll.min(total_rows.saturating_sub(visible))
}

fn tag_color(tag: InstanceTag, theme: &Theme) -> ratatui::style::Color {
    match tag {
        InstanceTag::HighMem => theme.tag_high_mem,
        InstanceTag::HighCpu => theme.tag_high_cpu,
    }
}
