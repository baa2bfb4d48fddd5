//! Error types for `medhist`.
//!
//! The CLI shares the library's error enum; `anyhow` is only used at the
//! top-level dispatch boundary.

pub use medhist_lib::error::{MedHistError, Result};
