use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use grouptop::format::{format_megabytes, truncate_unicode};

use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
pub struct SelectionInfo {
    pub name: String,
    pub pid_count: usize,
    pub memory_mb: f64,
}

pub fn render(frame: &mut Frame, area: Rect, selected: Option<SelectionInfo>, theme: &Theme) {
    let style = Style::default()
        .bg(theme.statusbar_bg)
        .fg(theme.text_primary);
    let width = area.width as usize;
    let line = match selected {
        Some(selection) => format_selection_line(&selection, width),
        None => " ".repeat(width),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, style))).style(style),
        area,
    );
}

/// Group name on the left, instance count and memory pinned right.
fn format_selection_line(selection: &SelectionInfo, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut right = format!(
        "{} \u{00d7} {}",
        selection.pid_count,
        format_megabytes(selection.memory_mb)
    );
    if right.width() > width {
        right = truncate_unicode(&right, width);
        let pad = width.saturating_sub(right.width());
        return format!("{}{}", " ".repeat(pad), right);
    }

    let right_width = right.width();
    let left_capacity = width.saturating_sub(right_width + 1);
    let name = truncate_unicode(&selection.name, left_capacity);
    let gap = width.saturating_sub(name.width() + right_width);
    format!("{name}{}{right}", " ".repeat(gap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_memory_right_aligned() {
        let line = format_selection_line(
            &SelectionInfo {
                name: "Very Long Process Group Name".to_string(),
                pid_count: 3,
                memory_mb: 2048.0,
            },
            28,
        );
        assert_eq!(line.width(), 28);
        assert!(line.ends_with("3 \u{00d7} 2.0 GB"));
    }

    #[test]
    fn zero_width_is_empty() {
        let selection = SelectionInfo {
            name: "bash".to_string(),
            pid_count: 1,
            memory_mb: 4.0,
        };
        assert_eq!(format_selection_line(&selection, 0), "");
    }
}
