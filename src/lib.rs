//! Debo Bots — Telegram intake bots for an Ethiopian professionals
//! directory, backed by Google Sheets and Drive.

pub mod auth;
pub mod bots;
pub mod config;
pub mod drive;
pub mod error;
pub mod flows;
pub mod health;
pub mod monitor;
pub mod records;
pub mod session;
pub mod sheets;
pub mod telegram;
pub mod validate;

pub use error::{Error, Result};
