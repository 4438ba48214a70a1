//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Task spawning and browser launch
//! - `render` - Layout and overlay dispatch
//! - `tabs`, `search`, `books`, `status` - Main screen widgets
//! - `detail`, `help` - Overlays

mod books;
mod detail;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod search;
mod status;
mod tabs;

pub use loop_runner::{run, Action};
