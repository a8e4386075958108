pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod messaging;
pub mod ui;

pub use error::{Error, Result};
