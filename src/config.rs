//! Configuration loader and schema types.
//!
//! This module exposes the settings that feed the indexer, publisher,
//! scheduler and observer, and helpers to load them from disk and the
//! environment.

mod load;
mod schema;

pub use schema::*;

#[cfg(test)]
mod tests;
