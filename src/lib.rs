pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod grades;
pub mod layout;
pub mod models;
pub mod render;
pub mod service;
pub mod source;
pub mod validate;

pub use error::{AppError, Result};
