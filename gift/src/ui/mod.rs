//! UI module for the gift TUI

pub mod layout;
pub mod render;
pub mod screens;
pub mod snapshot;
pub mod theme;
pub mod widgets;

pub use render::Overlay;
