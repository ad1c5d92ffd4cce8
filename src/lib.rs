pub mod config;
pub mod diagnostics;
pub mod dispatch;
pub mod error;
pub mod view;

pub use error::{Error, Result};
