use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::widgets::rating;

pub fn render(f: &mut ratatui::Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Your Meals ({}) ", app.meals.len()));

    if app.meals.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No meals yet. Press a to add one.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let name_width = app
        .meals
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = app
        .meals
        .iter()
        .enumerate()
        .map(|(i, meal)| {
            let selected = i == app.selected_index;
            let marker = if selected { "> " } else { "  " };
            let name_style = if selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };
            let photo = meal
                .photo
                .as_ref()
                .map(|p| p.file_name())
                .unwrap_or_else(|| "-".to_string());

            Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<width$}", meal.name, width = name_width),
                    name_style,
                ),
                Span::raw("  "),
                Span::styled(rating::stars(meal.rating), Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled(photo, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    // Keep the selected row in view.
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = app
        .selected_index
        .saturating_sub(inner_height.saturating_sub(1)) as u16;

    let list = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(list, area);
}
