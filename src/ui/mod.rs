//! UI module for the ByteBot widget.
//!
//! This module contains all rendering logic:
//! - Widget layout (launcher bubble and chat panel)
//! - Gradient utilities
//! - Text wrapping

mod gradient;
mod render;
pub mod text;

pub use render::{
    render, transcript_lines, INPUT_PLACEHOLDER, PANEL_SUBTITLE, PANEL_TITLE, TYPING_INDICATOR,
};
