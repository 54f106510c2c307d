//! Subcommand implementations.

pub mod info;
pub mod measure;
pub mod schema;
pub mod section;
