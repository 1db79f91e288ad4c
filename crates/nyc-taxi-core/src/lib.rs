pub mod config;
pub mod db;
pub mod error;
pub mod identifiers;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{Error, Result};
