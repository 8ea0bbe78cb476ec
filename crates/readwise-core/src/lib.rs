//! # readwise-core
//!
//! Core types, traits, and abstractions for the readwise highlights API.
//!
//! This crate provides the domain models, the [`Storage`] trait that every
//! backend implements, the error taxonomy, and the parser that turns an
//! uploaded Kindle extract into a [`RawExtractBook`].

pub mod defaults;
pub mod error;
pub mod extract;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use extract::{parse_extract, validate_user_id};
pub use models::*;
pub use traits::*;
