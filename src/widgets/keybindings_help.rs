use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use super::form;

fn heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn render(f: &mut ratatui::Frame) {
    let inner = form::render_modal_frame(f, "Keybindings", 64, 66);

    let lines = vec![
        heading("Meal List"),
        Line::from("  j / k or Up / Down: move selection"),
        Line::from("  a: add a meal"),
        Line::from("  Enter or e: edit selected meal"),
        Line::from("  x: delete selected meal"),
        Line::from("  q: quit"),
        Line::from(""),
        heading("Meal Form"),
        Line::from("  Tab / Shift+Tab: next / previous field"),
        Line::from("  (name) type to edit, Enter to finish"),
        Line::from("  (photo) Enter: choose a photo"),
        Line::from("  (rating) 0-5: pick stars, same star again clears"),
        Line::from("  (rating) Left / Right: one star less / more"),
        Line::from("  Ctrl+S: save (needs a name)"),
        Line::from("  Esc: cancel"),
        Line::from(""),
        heading("Photo Picker"),
        Line::from("  j / k or Up / Down: move selection"),
        Line::from("  Enter: use photo"),
        Line::from("  Esc: cancel"),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let body = Paragraph::new(lines).block(Block::default());
    f.render_widget(body, inner);
}
