//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::{BACK_SHORTCUT, NEXT_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{NoticeKind, SearchFocus, View, WizardStep};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const TITLE: &str = " Rights Issue Portal ";
const BUSY_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Split the screen into header, content and status bar rows
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

/// Draw the one-line header with the portal title and current shareholder
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        TITLE,
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];

    if let Some(wizard) = app.state.wizard.as_ref() {
        let holder = wizard.shareholder();
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            holder.name.clone(),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled(
            format!("  {}", holder.reg_account_number),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    if app.is_busy() {
        spans.push(Span::styled(
            format!(" {} ", busy_frame()),
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::raw(" "));
    }

    // A notice replaces the hints while it is showing
    match &app.state.notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Success => Color::Green,
                NoticeKind::Info => Color::Cyan,
                NoticeKind::Error => Color::Red,
            };
            spans.push(Span::styled(
                notice.text.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ));
        }
        None => spans.push(Span::styled(
            view_hints(app),
            Style::default().fg(Color::Gray),
        )),
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    let quit_hint = " ^C:quit ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

fn busy_frame() -> &'static str {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    BUSY_FRAMES[(millis / 150) as usize % BUSY_FRAMES.len()]
}

/// Get keyboard hints for the current view
fn view_hints(app: &App) -> String {
    let state = &app.state;
    match state.current_view {
        View::Splash => "Press any key to skip".to_string(),
        View::Search => match state.search_focus {
            SearchFocus::Input => "Enter:search  Tab:documents  Esc:clear".to_string(),
            SearchFocus::Resources => {
                "j/k:nav  Enter:open  y:copy link  Tab:search  q:quit".to_string()
            }
        },
        View::SearchResults => "j/k:nav  Enter:select  Esc:back  q:quit".to_string(),
        View::Wizard if state.confirm_submit.is_some() => {
            "←→:select  Enter:confirm  Esc:cancel".to_string()
        }
        View::Wizard => {
            let at_last = state
                .wizard
                .as_ref()
                .is_some_and(|w| w.step() == WizardStep::LAST);
            if at_last {
                format!("Enter/{SUBMIT_SHORTCUT}:submit  p:preview  d:download  Esc:back")
            } else {
                format!("Tab:next field  {NEXT_SHORTCUT}:next step  {BACK_SHORTCUT}:back  Esc:back")
            }
        }
        View::Submitted => "v:view form  d:download  b:new search  q:quit".to_string(),
    }
}
