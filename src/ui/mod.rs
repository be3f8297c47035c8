//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod search;
mod splash;
mod submitted;
mod widgets;
mod wizard;

use crate::app::App;
use crate::state::View;
use components::{render_confirm_submit_dialog, render_error_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.state.current_view == View::Splash {
        if let Some(splash_state) = app.splash_state.as_ref() {
            splash::draw(frame, area, splash_state);
        }
        return;
    }

    let (header_area, main_area, status_area) = layout::create_layout(area);
    layout::draw_header(frame, header_area, app);

    // Draw main content based on current view
    match app.state.current_view {
        View::Splash => {}
        View::Search => search::draw(frame, main_area, app),
        View::SearchResults => search::draw_results(frame, main_area, app),
        View::Wizard => wizard::draw(frame, main_area, app),
        View::Submitted => submitted::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, status_area, app);

    // Overlays, error on top
    if let Some(confirm) = app.state.confirm_submit.as_ref() {
        let total = app
            .state
            .wizard
            .as_ref()
            .map(|w| w.form().total_payable())
            .unwrap_or_default();
        render_confirm_submit_dialog(frame, confirm, total);
    }
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message, app.state.error_queue.len().saturating_sub(1));
    }
}
