use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph, Sparkline};

use grouptop::system::info::{DiskUsage, SystemInfo};

use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    info: &SystemInfo,
    group_count: usize,
    theme: &Theme,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
        ])
        .split(area);

    render_branding(frame, chunks[0], info, group_count, theme);
    render_cpu_sparkline(frame, chunks[1], info, theme);
    render_memory_sparkline(frame, chunks[2], info, theme);
    render_disk_gauge(frame, chunks[3], primary_disk(&info.disks), theme);
}

fn bordered<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            title,
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ))
}

fn render_branding(
    frame: &mut Frame,
    area: Rect,
    info: &SystemInfo,
    group_count: usize,
    theme: &Theme,
) {
    let block = bordered(String::new(), theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let muted = Style::default().fg(theme.text_secondary);
    let lines = vec![
        Line::from(vec![
            Span::styled(
                " grouptop ",
                Style::default()
                    .fg(theme.header_accent_fg)
                    .bg(theme.header_accent_bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("Groups: {group_count}"), muted),
        ]),
        Line::from(vec![
            Span::styled(format!(" Cores: {}", info.cpu_count), muted),
            Span::raw("  "),
            Span::styled(format!("Up: {}", info.uptime), muted),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_cpu_sparkline(frame: &mut Frame, area: Rect, info: &SystemInfo, theme: &Theme) {
    let block = bordered(format!(" CPU {:.0}% ", info.cpu_percent), theme);
    let data = sparkline_data(&info.cpu_history);
    let sparkline = Sparkline::default()
        .block(block)
        .data(&data)
        .max(10_000)
        .style(Style::default().fg(theme.sparkline_color));
    frame.render_widget(sparkline, area);
}

/// Percentages scaled by 100 so the sparkline keeps two decimals.
fn sparkline_data(history: &[f32]) -> Vec<u64> {
    history
        .iter()
        .map(|v| (v.clamp(0.0, 100.0) * 100.0) as u64)
        .collect()
}

fn render_memory_sparkline(frame: &mut Frame, area: Rect, info: &SystemInfo, theme: &Theme) {
    let block = bordered(
        format!(
            " RAM {:.0}% of {:.0} GB ",
            info.memory_percent, info.memory_total_gb
        ),
        theme,
    );
    let data = sparkline_data(&info.memory_history);
    let sparkline = Sparkline::default()
        .block(block)
        .data(&data)
        .max(10_000)
        .style(Style::default().fg(theme.gauge_filled));
    frame.render_widget(sparkline, area);
}

fn render_disk_gauge(frame: &mut Frame, area: Rect, disk: Option<&DiskUsage>, theme: &Theme) {
    let (ratio, label, title) = match disk {
        Some(disk) => (
            (disk.percent / 100.0).clamp(0.0, 1.0),
            format!("{:.0}/{:.0} GB", disk.used_gb, disk.total_gb),
            format!(" Disk {} ", disk.mount_point),
        ),
        None => (0.0, "n/a".to_string(), " Disk ".to_string()),
    };
    let gauge = Gauge::default()
        .block(bordered(title, theme))
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(label);
    frame.render_widget(gauge, area);
}

/// The root mount when there is one, otherwise the first disk listed.
fn primary_disk(disks: &[DiskUsage]) -> Option<&DiskUsage> {
    disks
        .iter()
        .find(|d| d.mount_point == "/")
        .or_else(|| disks.first())
}
