use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{InputMode, StatusMessage};
use crate::ui::theme::Theme;

pub struct StatusView<'a> {
    pub input_mode: InputMode,
    pub filter_text: &'a str,
    pub status: Option<&'a StatusMessage>,
    pub sort_label: &'a str,
    pub instances_open: bool,
}

pub fn render(frame: &mut Frame, area: Rect, view: &StatusView<'_>, theme: &Theme) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    if let Some(status) = view.status {
        let color = if status.is_error {
            theme.status_err
        } else {
            theme.status_ok
        };
        let line = Line::from(Span::styled(
            format!(" {}", status.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).style(bg_style), area);
        return;
    }

    let line = match view.input_mode {
        InputMode::Filter => {
            let mut spans = vec![
                Span::styled(
                    " / ",
                    Style::default()
                        .fg(theme.pill_key_fg)
                        .bg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(" {}", view.filter_text),
                    Style::default().fg(theme.pill_desc_fg),
                ),
                Span::styled("\u{2588}", Style::default().fg(theme.pill_key_bg)),
            ];
            spans.extend(pill_spans("Esc", "Cancel", theme));
            spans.extend(pill_spans("Enter", "Apply", theme));
            Line::from(spans)
        }
        InputMode::Normal | InputMode::Help => {
            let mut spans = Vec::new();
            if !view.filter_text.is_empty() {
                spans.push(Span::styled(
                    format!(" Filter: {} ", view.filter_text),
                    Style::default()
                        .fg(theme.pill_key_bg)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            spans.extend(pill_spans("q", "Quit", theme));
            spans.extend(pill_spans("/", "Filter", theme));
            if view.instances_open {
                spans.extend(pill_spans("Esc", "Close", theme));
            } else {
                spans.extend(pill_spans("Enter", "Instances", theme));
            }
            spans.extend(pill_spans("k", "Kill", theme));
            spans.extend(pill_spans("s", view.sort_label, theme));
            spans.extend(pill_spans("?", "Help", theme));
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {desc}"), Style::default().fg(theme.pill_desc_fg)),
    ]
}
