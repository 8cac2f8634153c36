//! Shared helpers

pub mod paths;

pub use paths::{absolutize, entry_name, normalize_path};
