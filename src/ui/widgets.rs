//! Reusable UI widget helpers

use ratatui::{
    layout::Rect,
    widgets::{List, ListState},
    Frame,
};
use std::ops::Range;

/// Render a scrollable list that automatically keeps the selected item visible.
///
/// This is the preferred way to render lists in the app. It wraps `render_stateful_widget`
/// with a `ListState`, ensuring the list scrolls to keep the selected item in view.
///
/// # Example
/// ```ignore
/// let list = List::new(items).block(block);
/// render_scrollable_list(frame, area, list, app.state.selected_index);
/// ```
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Pick the run of stacked items to draw so that `active` is on screen.
///
/// Items are laid out top to bottom with the given row heights. The window
/// starts at the top and only scrolls once the active item would fall
/// below `available` rows. An item taller than the space is shown alone.
pub fn visible_window(heights: &[u16], active: usize, available: u16) -> Range<usize> {
    if heights.is_empty() {
        return 0..0;
    }
    let active = active.min(heights.len() - 1);

    // Walk back from the active item while it still fits
    let mut start = active;
    let mut used = heights[active];
    while start > 0 && used + heights[start - 1] <= available {
        start -= 1;
        used += heights[start];
    }

    // Prefer the top of the list when everything up to `active` fits
    let top_fits = heights[..=active].iter().sum::<u16>() <= available;
    if top_fits {
        start = 0;
        used = heights[..=active].iter().sum();
    }

    let mut end = active + 1;
    while end < heights.len() && used + heights[end] <= available {
        used += heights[end];
        end += 1;
    }
    start..end
}
