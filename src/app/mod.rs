//! Application orchestration: state management, event loop, asset loading
//! and input handling.

pub mod assets;
pub mod background;
pub mod event;
pub mod handler;
pub mod settings;
pub mod state;
