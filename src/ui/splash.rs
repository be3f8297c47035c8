//! Splash screen rendering with ASCII art banner

use crate::state::SplashState;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Letters of the banner, five rows each, all rows of a letter equal width
const GLYPHS: [[&str; 5]; 6] = [
    [r" ____  ", r"|  _ \ ", r"| |_) |", r"|  _ < ", r"|_| \_\"],
    [r" ___ ", r"|_ _|", r" | | ", r" | | ", r"|___|"],
    [r"  ____ ", r" / ___|", r"| |  _ ", r"| |_| |", r" \____|"],
    [r" _   _ ", r"| | | |", r"| |_| |", r"|  _  |", r"|_| |_|"],
    [r" _____ ", r"|_   _|", r"  | |  ", r"  | |  ", r"  |_|  "],
    [r" ____  ", r"/ ___| ", r"\___ \ ", r" ___) |", r"|____/ "],
];

const SUBTITLE: &str = "P  O  R  T  A  L";

fn banner_rows() -> Vec<String> {
    (0..5)
        .map(|row| GLYPHS.iter().map(|glyph| glyph[row]).collect::<String>())
        .collect()
}

/// Build the banner text with styling
fn build_banner() -> (Vec<Line<'static>>, u16) {
    let style = Style::default().fg(Color::Cyan);
    let rows = banner_rows();
    let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u16;

    let mut lines: Vec<Line> = rows
        .into_iter()
        .map(|row| Line::from(Span::styled(row, style)))
        .collect();
    lines.push(Line::from(""));
    lines.push(
        Line::from(Span::styled(
            SUBTITLE,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
        .centered(),
    );
    (lines, width)
}

/// Draw the splash screen
pub fn draw(frame: &mut Frame, area: Rect, splash_state: &SplashState) {
    let (lines, logo_width) = build_banner();
    let logo_height = lines.len() as u16;

    // Center position with scroll offset (can go above the screen)
    let base_y = area.y as i32 + (area.height.saturating_sub(logo_height)) as i32 / 2;
    let y_pos = base_y - splash_state.scroll_offset as i32;
    let x = area.x + (area.width.saturating_sub(logo_width)) / 2;

    let lines_off_top = if y_pos < 0 { (-y_pos) as usize } else { 0 };
    if lines_off_top >= lines.len() {
        return;
    }

    let visible_lines: Vec<Line> = lines.into_iter().skip(lines_off_top).collect();
    let visible_height = visible_lines.len() as u16;
    let render_y = if y_pos < 0 { area.y } else { y_pos as u16 };

    let logo_area = Rect {
        x,
        y: render_y,
        width: logo_width.min(area.width),
        height: visible_height.min(area.height.saturating_sub(render_y.saturating_sub(area.y))),
    };
    frame.render_widget(Paragraph::new(visible_lines), logo_area);

    // Only while the banner is still
    if splash_state.scroll_offset < 1.0 && area.height >= 2 {
        let hint = "Press any key to skip";
        let hint_area = Rect {
            x: area.x + (area.width.saturating_sub(hint.len() as u16)) / 2,
            y: area.y + area.height - 2,
            width: (hint.len() as u16).min(area.width),
            height: 1,
        };
        let hint_line = Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        frame.render_widget(Paragraph::new(hint_line), hint_area);
    }
}
