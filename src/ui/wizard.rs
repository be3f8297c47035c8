//! Eight-step participation wizard

use super::components::{render_key_button, BUTTON_HEIGHT};
use super::forms::{
    draw_checkbox, draw_choice, draw_file_field, draw_help_text, draw_read_only, draw_text_field,
    field_height,
};
use super::widgets::{render_scrollable_list, visible_window};
use crate::app::App;
use crate::platform::{BACK_SHORTCUT, NEXT_SHORTCUT};
use crate::state::forms::{ActionType, FieldId, FieldKind, RightsForm, SignatureMode};
use crate::state::payment::{format_naira, format_units, parse_amount};
use crate::state::{AppState, Wizard, WizardStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

const CARD_WIDTH: u16 = 34;
const BROKER_LIST_HEIGHT: u16 = 8;

const INSTRUCTIONS: &[&str] = &[
    "1. Acceptance and renunciation of the rights must be made on this form. \
     Photocopies or scanned copies are not accepted.",
    "2. Payments of ₦10 million and above must be made by SWIFT, RTGS or NEFT \
     into the issue proceeds account, and evidence of the transfer submitted with the form.",
    "3. If you accept only part of your provisional allotment, complete box B \
     (renunciation or partial acceptance).",
    "4. If you renounce your rights and wish to trade them on the floor of NGX, \
     obtain a Transfer Form from your stockbroker.",
    "5. If you apply for additional shares, complete items (ii) and (iii) of box A.",
    "6. Cheques are presented for payment on receipt. Returned cheques invalidate the application.",
    "7. Joint allottees must each sign on a separate line.",
];

/// Draw the wizard for the open session
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(wizard) = app.state.wizard.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Progress
            Constraint::Min(0),                // Body
            Constraint::Length(BUTTON_HEIGHT), // Actions
        ])
        .split(area);

    draw_progress(frame, chunks[0], wizard.step());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(CARD_WIDTH), Constraint::Min(0)])
        .split(chunks[1]);
    draw_shareholder_card(frame, body[0], wizard);
    draw_step(frame, body[1], &app.state, wizard);

    draw_actions(frame, chunks[2], app, wizard.step());
}

/// Numbered step chips over a progress gauge
fn draw_progress(frame: &mut Frame, area: Rect, current: WizardStep) {
    let mut spans = Vec::with_capacity(WizardStep::ALL.len() * 2);
    for step in WizardStep::ALL {
        let style = if step == current {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if step.number() < current.number() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let chip = if step.number() < current.number() {
            format!(" ✓{} ", step.number())
        } else {
            format!(" {} ", step.number())
        };
        spans.push(Span::styled(chip, style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        format!(" {} ", current.title()),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    let total = WizardStep::ALL.len();
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(Color::Cyan))
        .unfilled_style(Style::default().fg(Color::DarkGray))
        .label(format!("Step {} of {total}", current.number()))
        .ratio(current.number() as f64 / total as f64);
    frame.render_widget(gauge, rows[1]);
}

fn card_row<'a>(label: &'a str, value: String) -> Vec<Line<'a>> {
    vec![
        Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(value, Style::default().fg(Color::White))),
    ]
}

fn naira_or_dash(raw: &str) -> String {
    parse_amount(raw)
        .map(format_naira)
        .unwrap_or_else(|| "-".to_string())
}

/// Prefilled facts plus the running total
fn draw_shareholder_card(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let prefill = &wizard.form().prefill;
    let mut lines = Vec::new();
    lines.extend(card_row("Reg. account", prefill.reg_account_number.clone()));
    lines.extend(card_row("Name", prefill.name.clone()));
    lines.extend(card_row("Holdings", format_units(&prefill.holdings)));
    lines.extend(card_row("Rights due", format_units(&prefill.rights_issue)));
    lines.extend(card_row("Holdings after", format_units(&prefill.holdings_after)));
    lines.extend(card_row("Amount due", naira_or_dash(&prefill.amount_due)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Total payable",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        format_naira(wizard.form().total_payable()),
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));

    let card = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Shareholder ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(card, area);
}

fn draw_step(frame: &mut Frame, area: Rect, state: &AppState, wizard: &Wizard) {
    let step = wizard.step();
    let block = Block::default()
        .title(format!(" {}. {} ", step.number(), step.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);
    draw_help_text(frame, chunks[0], step.description());

    match step {
        WizardStep::ShareholderInfo => draw_shareholder_info(frame, chunks[1], wizard),
        WizardStep::Instructions => draw_instructions(frame, chunks[1], state, wizard),
        WizardStep::Summary => draw_summary(frame, chunks[1], wizard),
        _ => draw_fields(frame, chunks[1], state, wizard),
    }
}

fn draw_shareholder_info(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    let holder = wizard.shareholder();
    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<18}"), Style::default().fg(Color::DarkGray)),
            Span::styled(value, Style::default().fg(Color::White)),
        ])
    };
    let lines = vec![
        row("Reg. account", holder.reg_account_number.clone()),
        row("Name", holder.name.clone()),
        row("Holdings", format_units(&holder.holdings)),
        row("Rights issue", format_units(&holder.rights_issue)),
        row("Holdings after", format_units(&holder.holdings_after)),
        row("Amount due", naira_or_dash(&holder.amount_due)),
        Line::from(""),
        Line::from(Span::styled(
            "If these details are yours, press Enter to continue.",
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn draw_instructions(frame: &mut Frame, area: Rect, state: &AppState, wizard: &Wizard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let mut lines = Vec::with_capacity(INSTRUCTIONS.len() * 2);
    for item in INSTRUCTIONS {
        lines.push(Line::from(Span::styled(*item, Style::default().fg(Color::White))));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), chunks[0]);

    draw_field(
        frame,
        chunks[1],
        state,
        wizard.form(),
        FieldId::InstructionsRead,
        state.active_field == 0,
    );
}

/// Editable fields, scrolled so the focused one is visible
fn draw_fields(frame: &mut Frame, area: Rect, state: &AppState, wizard: &Wizard) {
    let fields = wizard.step().fields(wizard.form());
    if fields.is_empty() {
        let hint = Paragraph::new("Choose an action on the previous step first.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, area);
        return;
    }

    let picking = state.active_field_id() == Some(FieldId::Stockbroker);
    let (fields_area, picker_area) = if picking {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(BROKER_LIST_HEIGHT)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let heights: Vec<u16> = fields.iter().map(|f| field_height(f.kind())).collect();
    let window = visible_window(&heights, state.active_field, fields_area.height);

    let mut y = fields_area.y;
    for idx in window {
        let field_area = Rect {
            y,
            height: heights[idx],
            ..fields_area
        };
        draw_field(
            frame,
            field_area,
            state,
            wizard.form(),
            fields[idx],
            idx == state.active_field,
        );
        y += heights[idx];
    }

    if let Some(picker_area) = picker_area {
        draw_broker_picker(frame, picker_area, state);
    }
}

fn action_short_label(action: ActionType) -> &'static str {
    match action {
        ActionType::FullAcceptance => "Full acceptance",
        ActionType::RenunciationPartial => "Renunciation / partial",
    }
}

fn draw_field(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    form: &RightsForm,
    field: FieldId,
    is_active: bool,
) {
    let label = field.label();
    match field.kind() {
        FieldKind::Text | FieldKind::Numeric => {
            draw_text_field(frame, area, &label, form.text(field).unwrap_or_default(), is_active)
        }
        FieldKind::ReadOnly => {
            let value = form.text(field).map(naira_or_dash).unwrap_or_default();
            draw_read_only(frame, area, &label, &value);
        }
        FieldKind::Checkbox => draw_checkbox(
            frame,
            area,
            &label,
            form.flag(field).unwrap_or(false),
            is_active,
        ),
        FieldKind::Choice => match field {
            FieldId::ActionType => {
                let options = ActionType::ALL.map(action_short_label);
                let selected = form
                    .action_type()
                    .and_then(|a| ActionType::ALL.iter().position(|o| *o == a));
                draw_choice(frame, area, &label, &options, selected, is_active);
            }
            _ => {
                let modes = [SignatureMode::Single, SignatureMode::Joint];
                let options = modes.map(|m| m.label());
                let selected = modes.iter().position(|m| *m == form.signatures.mode);
                draw_choice(frame, area, &label, &options, selected, is_active);
            }
        },
        FieldKind::File => {
            let attached = match field {
                FieldId::Receipt => form.receipt.as_ref(),
                FieldId::Signature(index) => {
                    form.signatures.slots.get(index).and_then(Option::as_ref)
                }
                _ => None,
            };
            draw_file_field(
                frame,
                area,
                &label,
                attached,
                state.pending_path(field),
                is_active,
            );
        }
        FieldKind::BrokerPicker => {
            let selected = form.stockbroker.as_ref().and_then(|id| {
                state
                    .stockbrokers
                    .iter()
                    .find(|b| &b.id == id)
                    .map(|b| b.name.as_str())
            });
            let value = if is_active && !state.broker_filter.is_empty() {
                state.broker_filter.as_str()
            } else {
                selected.unwrap_or_default()
            };
            draw_text_field(frame, area, &label, value, is_active);
        }
    }
}

fn draw_broker_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    let brokers = state.filtered_brokers();
    let block = Block::default()
        .title(" ↑↓ choose, Enter select ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if brokers.is_empty() {
        let empty = Paragraph::new("No options found")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = brokers
        .iter()
        .enumerate()
        .map(|(idx, broker)| {
            let is_selected = idx == state.broker_index;
            let style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if is_selected { "▸ " } else { "  " };
            ListItem::new(Line::from(Span::styled(
                format!("{prefix}{}", broker.name),
                style,
            )))
        })
        .collect();

    render_scrollable_list(frame, area, List::new(items).block(block), state.broker_index);
}

fn summary_row<'a>(label: &'a str, value: String) -> Line<'a> {
    let value = if value.trim().is_empty() {
        "-".to_string()
    } else {
        value
    };
    Line::from(vec![
        Span::styled(format!("{label:<22}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(Color::White)),
    ])
}

fn summary_heading(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Lines describing everything that will be submitted
pub fn summary_lines(wizard: &Wizard) -> Vec<Line<'_>> {
    let form = wizard.form();
    let text = |field: FieldId| form.text(field).unwrap_or_default().to_string();
    let yes_no = |field: FieldId| {
        if form.flag(field).unwrap_or(false) {
            "Yes".to_string()
        } else {
            "No".to_string()
        }
    };

    let mut lines = vec![
        summary_heading("Stockbroker"),
        summary_row(
            "Stockbroker",
            wizard.selected_broker_name().unwrap_or_default().to_string(),
        ),
        summary_row("CHN", form.chn.clone()),
        Line::from(""),
        summary_heading("Action"),
    ];

    match form.action_type() {
        Some(ActionType::FullAcceptance) => {
            lines.push(summary_row(
                "Action",
                action_short_label(ActionType::FullAcceptance).to_string(),
            ));
            lines.push(summary_row("Accept in full", yes_no(FieldId::AcceptFull)));
            lines.push(summary_row("Additional shares", format_units(&text(FieldId::AdditionalShares))));
            lines.push(summary_row("Additional amount", naira_or_dash(&text(FieldId::AdditionalAmount))));
            lines.push(summary_row(
                "Smaller allotment",
                yes_no(FieldId::AcceptSmallerAllotment),
            ));
        }
        Some(ActionType::RenunciationPartial) => {
            lines.push(summary_row(
                "Action",
                action_short_label(ActionType::RenunciationPartial).to_string(),
            ));
            lines.push(summary_row("Shares accepted", format_units(&text(FieldId::SharesAccepted))));
            lines.push(summary_row("Amount payable", naira_or_dash(&text(FieldId::AmountPayable))));
            lines.push(summary_row("Shares renounced", format_units(&text(FieldId::SharesRenounced))));
            lines.push(summary_row("Renounce rights", yes_no(FieldId::RenounceRights)));
            lines.push(summary_row("Trade rights", yes_no(FieldId::TradeRights)));
        }
        None => lines.push(summary_row("Action", String::new())),
    }
    lines.push(summary_row("Bank", text(FieldId::BankName)));
    lines.push(summary_row("Cheque / reference", text(FieldId::ChequeNumber)));
    lines.push(summary_row("Branch", text(FieldId::Branch)));

    lines.push(Line::from(""));
    lines.push(summary_heading("Contact"));
    lines.push(summary_row("Contact name", form.personal.contact_name.clone()));
    lines.push(summary_row("Mobile phone", form.personal.mobile_phone.clone()));
    lines.push(summary_row("Email", form.personal.email.clone()));
    lines.push(summary_row("E-dividend bank", form.bank.bank_name_edividend.clone()));
    lines.push(summary_row("Account number", form.bank.account_number.clone()));

    lines.push(Line::from(""));
    lines.push(summary_heading("Documents"));
    lines.push(summary_row(
        "Signature type",
        form.signatures.mode.label().to_string(),
    ));
    lines.push(summary_row(
        "Signatures",
        format!("{} attached", form.signatures.submitted().len()),
    ));
    lines.push(summary_row(
        "Payment receipt",
        form.receipt
            .as_ref()
            .map(|r| r.file_name.clone())
            .unwrap_or_default(),
    ));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("{:<22}", "Total payable"),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format_naira(form.total_payable()),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines
}

fn draw_summary(frame: &mut Frame, area: Rect, wizard: &Wizard) {
    frame.render_widget(
        Paragraph::new(summary_lines(wizard)).wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_actions(frame: &mut Frame, area: Rect, app: &App, step: WizardStep) {
    let at_last = step == WizardStep::LAST;
    let busy = app.state.submitting || app.state.previewing;

    let buttons: Vec<(String, &str, bool, bool)> = if at_last {
        vec![
            (format!("PgUp/{BACK_SHORTCUT}"), "Back", false, !busy),
            ("p".to_string(), "Preview", false, !busy),
            ("d".to_string(), "Download", false, !busy),
            (
                "Enter".to_string(),
                if app.state.submitting {
                    "Submitting..."
                } else {
                    "Submit"
                },
                true,
                !busy,
            ),
        ]
    } else {
        vec![
            (
                format!("PgUp/{BACK_SHORTCUT}"),
                "Back",
                false,
                step != WizardStep::FIRST,
            ),
            ("Esc".to_string(), "Leave", false, step == WizardStep::FIRST),
            (format!("PgDn/{NEXT_SHORTCUT}"), "Next", true, true),
        ]
    };

    let constraints: Vec<Constraint> = buttons
        .iter()
        .map(|_| Constraint::Ratio(1, buttons.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for ((key, label, is_primary, is_enabled), chunk) in buttons.iter().zip(chunks.iter()) {
        render_key_button(frame, *chunk, key, label, *is_primary, *is_enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Shareholder;

    fn wizard() -> Wizard {
        Wizard::new(Shareholder {
            id: "7".to_string(),
            reg_account_number: "RA-0007".to_string(),
            name: "Ada Obi".to_string(),
            amount_due: "1000".to_string(),
            ..Default::default()
        })
    }

    fn rendered(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_summary_shows_total_payable() {
        let w = wizard();
        let text = rendered(&summary_lines(&w));
        let total = text
            .iter()
            .find(|l| l.starts_with("Total payable"))
            .unwrap();
        assert!(total.ends_with("₦1,000.00"));
    }

    #[test]
    fn test_summary_dashes_missing_values() {
        let w = wizard();
        let text = rendered(&summary_lines(&w));
        let chn = text.iter().find(|l| l.starts_with("CHN")).unwrap();
        assert!(chn.trim_end().ends_with('-'));
        assert!(text.iter().any(|l| l.starts_with("Signature type") && l.ends_with("Single")));
    }

    #[test]
    fn test_naira_or_dash() {
        assert_eq!(naira_or_dash("1700"), "₦1,700.00");
        assert_eq!(naira_or_dash(""), "-");
    }
}
