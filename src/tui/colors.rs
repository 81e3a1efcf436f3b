//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Used for completed tasks
pub const DONE_GREEN: Color = Color::Rgb(0, 135, 0);
/// Used for open tasks
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for error messages in the status bar
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
