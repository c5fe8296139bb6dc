//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Routes incoming messages and sends replies
//! - `callback_handler`: Routes inline keyboard callback queries
//! - `dialogue_manager`: Item entry state machine
//! - `ui_builder`: Creates keyboards and formats messages
//! - `context`: Dependencies shared by all handlers

pub mod callback_handler;
pub mod context;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::{callback_handler, route_callback};
pub use context::AppContext;
pub use message_handler::{message_handler, route_text, send_replies};
pub use ui_builder::Reply;
