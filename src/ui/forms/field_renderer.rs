//! Field rendering utilities for forms

use crate::state::attachment::Attachment;
use crate::state::forms::FieldKind;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows a field of this kind takes up
pub fn field_height(kind: FieldKind) -> u16 {
    match kind {
        FieldKind::Checkbox => 1,
        _ => 3,
    }
}

fn border_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn field_block(label: &str, is_active: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style(is_active))
}

/// Draw a bordered single-line text field with a cursor when active
pub fn draw_text_field(frame: &mut Frame, area: Rect, label: &str, value: &str, is_active: bool) {
    let style = if is_active {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };

    let display_value = if value.is_empty() && !is_active {
        "(empty)"
    } else {
        value
    };
    let cursor = if is_active { "▌" } else { "" };

    // Keep the tail visible when the value outgrows the box
    let inner_width = area.width.saturating_sub(3) as usize;
    let chars = display_value.chars().count();
    let shown: String = if chars > inner_width {
        display_value.chars().skip(chars - inner_width).collect()
    } else {
        display_value.to_string()
    };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(shown, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));
    frame.render_widget(content.block(field_block(label, is_active)), area);
}

/// Draw a derived value the user cannot edit
pub fn draw_read_only(frame: &mut Frame, area: Rect, label: &str, value: &str) {
    let display_value = if value.is_empty() { "-" } else { value };
    let content = Paragraph::new(Line::from(Span::styled(
        display_value.to_string(),
        Style::default().fg(Color::Green),
    )));
    let block = Block::default()
        .title(format!(" {label} (calculated) "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(content.block(block), area);
}

/// Draw a single-row checkbox
pub fn draw_checkbox(frame: &mut Frame, area: Rect, label: &str, checked: bool, is_active: bool) {
    let mark = if checked { "[x]" } else { "[ ]" };
    let mark_style = if checked {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let label_style = if is_active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };
    let pointer = if is_active { "▸ " } else { "  " };

    let line = Line::from(vec![
        Span::styled(pointer, Style::default().fg(Color::Cyan)),
        Span::styled(mark, mark_style),
        Span::raw(" "),
        Span::styled(label.to_string(), label_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Draw a bordered row of mutually exclusive options
pub fn draw_choice(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    options: &[&str],
    selected: Option<usize>,
    is_active: bool,
) {
    let mut spans = Vec::with_capacity(options.len() * 2);
    for (idx, option) in options.iter().enumerate() {
        let is_selected = selected == Some(idx);
        let marker = if is_selected { "(•) " } else { "( ) " };
        let style = if is_selected {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!("{marker}{option}"), style));
        spans.push(Span::raw("   "));
    }
    if is_active {
        spans.push(Span::styled("←→ change", Style::default().fg(Color::DarkGray)));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(field_block(label, is_active)),
        area,
    );
}

/// Draw a file slot: the accepted file, or the path being typed
pub fn draw_file_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    attached: Option<&Attachment>,
    pending_path: &str,
    is_active: bool,
) {
    let line = if is_active && !pending_path.is_empty() {
        Line::from(vec![
            Span::styled(pending_path.to_string(), Style::default().fg(Color::White)),
            Span::styled("▌", Style::default().fg(Color::Cyan)),
            Span::styled("  Enter to attach", Style::default().fg(Color::DarkGray)),
        ])
    } else if let Some(file) = attached {
        Line::from(vec![
            Span::styled("✓ ", Style::default().fg(Color::Green)),
            Span::styled(file.file_name.clone(), Style::default().fg(Color::White)),
            Span::styled(
                format!("  {}", format_size(file.size())),
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else if is_active {
        Line::from(vec![
            Span::styled("▌", Style::default().fg(Color::Cyan)),
            Span::styled(
                " type a file path, then Enter",
                Style::default().fg(Color::DarkGray),
            ),
        ])
    } else {
        Line::from(Span::styled(
            "(no file)",
            Style::default().fg(Color::DarkGray),
        ))
    };

    frame.render_widget(
        Paragraph::new(line).block(field_block(label, is_active)),
        area,
    );
}

/// Human-readable byte count
pub fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = KIB * 1024;
    if bytes >= MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Draw help text at the bottom of a form
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text.to_string()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_checkbox_is_one_row() {
        assert_eq!(field_height(FieldKind::Checkbox), 1);
        assert_eq!(field_height(FieldKind::Text), 3);
    }
}
