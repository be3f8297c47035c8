//! Confirmation shown after a successful submission

use crate::app::App;
use crate::state::payment::format_naira;
use crate::state::SubmissionReceipt;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const PANEL_WIDTH: u16 = 64;
const PANEL_HEIGHT: u16 = 17;

fn detail_row<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<16}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

/// Receipt body for a submitted form
pub fn receipt_lines(receipt: &SubmissionReceipt) -> Vec<Line<'static>> {
    let form = &receipt.form;
    vec![
        Line::from(Span::styled(
            "✓ Form submitted successfully",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        detail_row("Reg. account", form.reg_account_number.clone()),
        detail_row("Name", form.name.clone()),
        detail_row("CHN", form.chn.clone()),
        detail_row("Submitted on", form.submitted_on()),
        Line::from(vec![
            Span::styled(
                format!("{:<16}", "Total payable"),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format_naira(receipt.total),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "A copy of your filled form has been sent to your email address.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("v", Style::default().fg(Color::Cyan)),
            Span::styled(" view form  ", Style::default().fg(Color::DarkGray)),
            Span::styled("d", Style::default().fg(Color::Cyan)),
            Span::styled(" download  ", Style::default().fg(Color::DarkGray)),
            Span::styled("b", Style::default().fg(Color::Cyan)),
            Span::styled(" back to search", Style::default().fg(Color::DarkGray)),
        ]),
    ]
}

/// Draw the submitted summary
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(receipt) = app.state.submitted.as_ref() else {
        return;
    };

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(PANEL_HEIGHT.min(area.height)),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(PANEL_WIDTH.min(area.width)),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    let mut lines = receipt_lines(receipt);
    if app.state.previewing {
        lines.push(Line::from(Span::styled(
            "Preparing form...",
            Style::default().fg(Color::Yellow),
        )));
    }

    let panel = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Submission received ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green)),
    );
    frame.render_widget(panel, horizontal[1]);
}
