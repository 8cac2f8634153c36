//! grepzip: find files whose lines match a regex and zip them
//!
//! The pipeline is bind, walk, match, archive:
//!
//! - [`config`] turns positional tokens into a [`config::SearchConfig`].
//! - [`scan`] walks the tree and stages files the [`matcher`] accepts.
//! - [`archive`] writes the staged files into a deflate zip, naming each
//!   entry relative to the scan root.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod matcher;
pub mod scan;
pub mod utils;
