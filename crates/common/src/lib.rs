//! Common types for the asset manager API client

mod error;

pub use error::{Error, Result};
