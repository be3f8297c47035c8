//! Confirmation dialog shown before the form is posted

use super::base::{key_hint, render_dialog, DialogConfig};
use crate::state::payment::format_naira;
use crate::state::ConfirmSubmit;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};
use rust_decimal::Decimal;

const MESSAGE: &str = "Once submitted, the form cannot be edited. \
A copy will be sent to the email address you provided.";

/// Render the submit confirmation with Cancel/Submit options
pub fn render_confirm_submit_dialog(frame: &mut Frame, confirm: &ConfirmSubmit, total: Decimal) {
    let mut details = vec![
        Line::from(vec![
            Span::styled("Total payable: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_naira(total),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    let options = [(false, "Cancel", Color::White), (true, "Submit", Color::Green)];
    for (is_submit, label, color) in options {
        let is_selected = confirm.selected_option == is_submit;
        let prefix = if is_selected { "▸ " } else { "  " };
        let style = if is_selected {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        details.push(Line::from(Span::styled(format!("{prefix}{label}"), style)));
    }

    render_dialog(
        frame,
        DialogConfig {
            title: "Submit Rights Form?",
            accent: Color::Yellow,
            message: MESSAGE,
            details,
            hint: Some(key_hint(&[
                ("←→", " select  "),
                ("Enter", " confirm  "),
                ("Esc", " cancel"),
            ])),
            max_width: 60,
        },
    );
}
