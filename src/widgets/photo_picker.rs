use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::form;
use crate::photo_picker::PhotoPicker;

pub fn render(f: &mut ratatui::Frame, picker: &PhotoPicker) {
    let title = format!("Choose Photo: {}", picker.dir.display());
    let inner = form::render_modal_frame(f, &title, 60, 60);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let mut lines: Vec<Line> = Vec::new();
    if picker.scanning {
        lines.push(Line::from("Scanning..."));
    }

    // Keep the selected row visible.
    let visible = sections[0].height as usize;
    let offset = picker.selected.saturating_sub(visible.saturating_sub(1));
    for (i, path) in picker.entries.iter().enumerate().skip(offset).take(visible) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let decoding = picker.decoding.as_ref() == Some(path);
        let prefix = if i == picker.selected { "> " } else { "  " };
        let suffix = if decoding { "  decoding..." } else { "" };
        let style = if i == picker.selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}{}", prefix, name, suffix),
            style,
        )));
    }
    f.render_widget(Paragraph::new(lines), sections[0]);

    if let Some(ref flash) = picker.flash {
        f.render_widget(
            Paragraph::new(Span::styled(flash.as_str(), Style::default().fg(Color::Red))),
            sections[1],
        );
    }

    f.render_widget(
        Paragraph::new(Span::styled(
            "[j/k] move  [Enter] choose  [Esc] cancel",
            Style::default().fg(Color::DarkGray),
        )),
        sections[2],
    );
}
