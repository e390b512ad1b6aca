pub mod config;
pub mod core;
pub mod models;
pub mod utils;

pub use crate::config::AppSettings;
pub use crate::core::pack_service::PackService;
pub use crate::models::error::SError;
