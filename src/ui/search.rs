//! Search screen and disambiguation list

use super::widgets::render_scrollable_list;
use crate::app::App;
use crate::state::payment::{format_naira, format_units, parse_amount};
use crate::state::search::MIN_QUERY_CHARS;
use crate::state::SearchFocus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

const COLUMN_WIDTH: u16 = 72;

/// Horizontally centred column no wider than `COLUMN_WIDTH`
fn centered_column(area: Rect) -> Rect {
    let width = area.width.min(COLUMN_WIDTH);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Draw the name search screen with the issue documents below it
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let column = centered_column(area);
    let resources_height = (app.state.resources.len() as u16 + 2).max(3);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                // Top padding
            Constraint::Length(3),                // Intro
            Constraint::Length(3),                // Input
            Constraint::Length(2),                // Status line
            Constraint::Length(resources_height), // Documents
            Constraint::Min(0),
        ])
        .split(column);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "Find your shareholding",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Enter your name as it appears on the register to start your rights form.",
            Style::default().fg(Color::Gray),
        )),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, chunks[1]);

    draw_search_input(frame, chunks[2], app);

    let status = if app.state.searching {
        Line::from(Span::styled(
            "Searching...",
            Style::default().fg(Color::Yellow),
        ))
    } else if app.state.loading_shareholder.is_some() {
        Line::from(Span::styled(
            "Loading shareholder details...",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            format!("At least {MIN_QUERY_CHARS} characters, first name or surname."),
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(status), chunks[3]);

    draw_resources(frame, chunks[4], app);
}

fn draw_search_input(frame: &mut Frame, area: Rect, app: &App) {
    let is_active = app.state.search_focus == SearchFocus::Input;
    let border_color = if is_active { Color::Cyan } else { Color::DarkGray };

    let mut spans = vec![Span::styled("🔍 ", Style::default().fg(Color::DarkGray))];
    if app.state.search_input.is_empty() && !is_active {
        spans.push(Span::styled(
            "Search by name...",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            app.state.search_input.as_str(),
            Style::default().fg(Color::White),
        ));
    }
    if is_active && !app.state.searching {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Shareholder name ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    frame.render_widget(input, area);
}

fn draw_resources(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.state.search_focus == SearchFocus::Resources;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let items: Vec<ListItem> = app
        .state
        .resources
        .iter()
        .enumerate()
        .map(|(idx, link)| {
            let is_selected = is_focused && idx == app.state.resource_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled("📄 ", Style::default().fg(Color::DarkGray)),
                Span::styled(link.title.as_str(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Issue documents ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );
    render_scrollable_list(frame, area, list, app.state.resource_index);
}

/// Draw the list shown when several shareholders match
pub fn draw_results(frame: &mut Frame, area: Rect, app: &App) {
    let column = centered_column(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2), // Header
            Constraint::Min(0),    // List
        ])
        .split(column);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{} shareholders match ", app.state.search_results.len()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("\"{}\"", app.state.results_query),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(". Select yours.", Style::default().fg(Color::Gray)),
    ]));
    frame.render_widget(header, chunks[1]);

    let loading = app.state.loading_shareholder.as_deref();
    let items: Vec<ListItem> = app
        .state
        .search_results
        .iter()
        .enumerate()
        .map(|(idx, holder)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸ " } else { "  " };
            let name_style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let due = parse_amount(&holder.amount_due)
                .map(format_naira)
                .unwrap_or_else(|| "-".to_string());

            let mut lines = vec![
                Line::from(vec![
                    Span::styled(prefix, name_style),
                    Span::styled(holder.name.as_str(), name_style),
                ]),
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        holder.reg_account_number.as_str(),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(
                        format!("  holdings {}", format_units(&holder.holdings)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("  due {due}"),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
            ];
            if loading == Some(holder.id.as_str()) {
                lines.push(Line::from(Span::styled(
                    "    Loading...",
                    Style::default().fg(Color::Yellow),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Search results ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, chunks[2], list, app.state.selected_index);
}
