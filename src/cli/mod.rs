//! CLI-specific utilities for butterfly-path
//!
//! This module contains code specific to the command-line interface,
//! separate from the core library functionality.

pub mod output;

pub use output::{format_element, ElementView};
