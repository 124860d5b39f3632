/// State management module
///
/// This module handles the visible application state:
/// - UI phase machine and status line (ui.rs)

pub mod ui;
