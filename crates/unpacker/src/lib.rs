//! Telegram bot that unpacks archives and relays the contained files.
//!
//! The transport lives behind [`Conversation`]; [`handler`] holds the
//! per-document pipeline and [`telegram`] wires it into teloxide.

pub use context::AppContext;
pub use conversation::{Conversation, HandlerError};

pub mod commands;
pub mod config;
mod context;
mod conversation;
pub mod handler;
pub mod telegram;
