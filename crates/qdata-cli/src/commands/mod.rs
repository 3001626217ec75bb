//! CLI command implementations.

pub mod common;
pub mod generate;
pub mod inspect;
pub mod version;
