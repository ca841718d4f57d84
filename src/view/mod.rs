//! Renderings of the page state: a standalone HTML document and terminal text.

pub mod html;
pub mod text;

/// Column width for terminal output when none is given.
pub const DEFAULT_WIDTH: usize = 80;
