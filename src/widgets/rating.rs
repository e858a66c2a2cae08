use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

use crate::meal::Rating;

const FILLED: char = '★';
const EMPTY: char = '☆';

pub fn stars(rating: Rating) -> String {
    (1..=Rating::MAX)
        .map(|star| if star <= rating.value() { FILLED } else { EMPTY })
        .collect()
}

/// Star spans for the rating control; highlighted while focused.
pub fn spans(rating: Rating, focused: bool) -> Vec<Span<'static>> {
    let filled = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let mut spans = vec![Span::styled(stars(rating), filled)];
    if focused {
        spans.push(Span::styled(
            format!("  {}/{}", rating.value(), Rating::MAX),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_fill_up_to_rating() {
        assert_eq!(stars(Rating::default()), "☆☆☆☆☆");
        assert_eq!(stars(Rating::clamped(3)), "★★★☆☆");
        assert_eq!(stars(Rating::clamped(5)), "★★★★★");
    }

    #[test]
    fn focused_control_shows_numeric_value() {
        assert_eq!(spans(Rating::clamped(2), false).len(), 1);
        let focused = spans(Rating::clamped(2), true);
        assert_eq!(focused[1].content, "  2/5");
    }
}
