//! Общие типы и утилиты для sqlscan

pub mod config;
pub mod error;

pub use config::*;
pub use error::{Error, Result};
