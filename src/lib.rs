//! # Storekeeper Telegram Bot
//!
//! A Telegram bot that lets administrators add inventory items through a
//! guided conversation and lets anyone list the stored catalog.

pub mod bot;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod errors;
pub mod localization;
pub mod session;
