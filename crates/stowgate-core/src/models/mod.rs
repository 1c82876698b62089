//! Data models for the application

mod account;
mod upload;

pub use account::*;
pub use upload::*;
