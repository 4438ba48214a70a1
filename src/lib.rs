//! Shelf: an infinitely scrolling book feed over the Open Library catalog.
//!
//! The [`feed`] module holds the pagination logic and performs no I/O.
//! [`catalog`] talks to the remote API, and [`ui`] wires both into a
//! terminal interface.

pub mod app;
pub mod catalog;
pub mod config;
pub mod feed;
pub mod headless;
pub mod keybindings;
pub mod theme;
pub mod ui;
pub mod util;
