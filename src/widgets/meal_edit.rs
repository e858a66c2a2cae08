use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::{form, rating};
use crate::meal_form::{FormField, FormMode, MealForm};
use crate::navigation::Presentation;

fn frame_title(state: &MealForm) -> String {
    match (state.title(), state.mode()) {
        (Some(title), _) if !title.trim().is_empty() => title.to_string(),
        (_, FormMode::Create) => "New Meal".to_string(),
        (_, FormMode::Edit { .. }) => "Edit Meal".to_string(),
    }
}

/// Draw the meal form. Modal forms float over the list; pushed forms take
/// the whole content area.
pub fn render(f: &mut ratatui::Frame, area: Rect, state: &MealForm) {
    let title = frame_title(state);
    let inner = match state.host() {
        Some(Presentation::Pushed) => form::render_frame(f, &format!("Meals › {}", title), area),
        _ => form::render_modal_frame(f, &title, 50, 50),
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    form::render_text_input(
        &mut lines,
        "Name",
        &state.name,
        state.focused() == FormField::Name,
        state.is_editing_name(),
    );

    lines.push(Line::from(""));

    let photo_focused = state.focused() == FormField::Photo;
    let photo_value = match &state.photo {
        Some(photo) => Span::styled(photo.describe(), Style::default().fg(Color::White)),
        None => Span::styled("No photo", Style::default().fg(Color::DarkGray)),
    };
    let mut photo_spans = vec![photo_value];
    if state.is_picker_open() {
        photo_spans.push(Span::styled(
            "  choosing...",
            Style::default().fg(Color::DarkGray),
        ));
    } else if photo_focused {
        photo_spans.push(Span::styled(
            "  [Enter] choose",
            Style::default().fg(Color::DarkGray),
        ));
    }
    form::render_value_row(&mut lines, "Photo", photo_spans, photo_focused);

    lines.push(Line::from(""));

    let rating_focused = state.focused() == FormField::Rating;
    form::render_value_row(
        &mut lines,
        "Rating",
        rating::spans(state.rating, rating_focused),
        rating_focused,
    );

    lines.push(Line::from(""));
    lines.push(Line::from(""));

    let save_style = if state.save_enabled() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(vec![
        Span::styled("[Ctrl+S] save", save_style),
        Span::styled(
            "  [Tab] next field  [0-5 / ←→] rating  [Esc] cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ]));

    f.render_widget(Paragraph::new(lines), inner);
}
