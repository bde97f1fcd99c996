//! ByteBot - ByteCode Labs' assistant widget.
//!
//! This library exposes the chat session core and its terminal front-end
//! for testing and reuse.

pub mod config;
pub mod gateway;
pub mod input;
pub mod llm;
pub mod logging;
pub mod message;
pub mod persona;
pub mod session;
pub mod transcript;
pub mod ui;
