//! Form rendering module
//!
//! Widgets for each kind of wizard input. Which field shows which widget
//! is decided by the wizard screen.

mod field_renderer;

pub use field_renderer::{
    draw_checkbox, draw_choice, draw_file_field, draw_help_text, draw_read_only,
    draw_text_field, field_height,
};
