use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn render_modal_frame(
    f: &mut ratatui::Frame,
    title: &str,
    percent_x: u16,
    percent_y: u16,
) -> Rect {
    let area = centered_rect(percent_x, percent_y, f.area());
    render_frame(f, title, area)
}

/// Clear `area` and draw a titled border around it, returning the inside.
pub fn render_frame(f: &mut ratatui::Frame, title: &str, area: Rect) -> Rect {
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}

fn label_style(focused: bool) -> Style {
    Style::default().fg(if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    })
}

/// Render a single-line text input with label. The cursor shows only while
/// the field is being edited.
pub fn render_text_input(
    lines: &mut Vec<Line>,
    label: &str,
    value: &str,
    focused: bool,
    editing: bool,
) {
    let cursor = if editing { "_" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(format!("{}: ", label), label_style(focused)),
        Span::styled(
            value.to_string(),
            Style::default().fg(Color::White).add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }),
        ),
        Span::styled(cursor, Style::default().fg(Color::DarkGray)),
    ]));
}

/// Render a labelled row whose value is already styled.
pub fn render_value_row<'a>(
    lines: &mut Vec<Line<'a>>,
    label: &str,
    value: Vec<Span<'a>>,
    focused: bool,
) {
    let mut spans = vec![Span::styled(format!("{}: ", label), label_style(focused))];
    spans.extend(value);
    lines.push(Line::from(spans));
}
