//! Crobot Core - Fundamental types shared across the level pipeline

mod error;
mod types;

pub use error::*;
pub use types::*;
