//! Button component for TUI

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Button height in rows (top border + content + bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Render a bordered button showing its shortcut before the label
pub fn render_key_button(
    frame: &mut Frame,
    area: Rect,
    key: &str,
    label: &str,
    is_primary: bool,
    is_enabled: bool,
) {
    let accent = if !is_enabled {
        Color::DarkGray
    } else if is_primary {
        Color::Cyan
    } else {
        Color::Gray
    };

    let label_style = if is_enabled && is_primary {
        Style::default().fg(accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(accent)
    };

    let content = Line::from(vec![
        Span::styled(format!(" {key} "), Style::default().fg(Color::DarkGray)),
        Span::styled(label.to_string(), label_style),
    ])
    .centered();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));

    frame.render_widget(Paragraph::new(content).block(block), area);
}
