//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No file I/O happens here.

pub mod background;
pub mod layout;
pub mod nav;
pub mod page;
pub mod popup;
pub mod spinner;
pub mod theme;
