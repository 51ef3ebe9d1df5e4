//! Core library modules for butterfly-path
//!
//! Path elements, their binary records, traffic accounting and the ambient
//! error and configuration types.

pub mod codec;
pub mod config;
pub mod distance;
pub mod element;
pub mod error;
pub mod message;
pub mod position;
pub mod track;
pub mod traffic;

// Re-export main types for internal use
pub use element::{InProgressPath, PathElement, PendingStep};
pub use error::{Error, Result};
