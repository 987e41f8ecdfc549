//! Selection policy: decides which file fills each destination track.
//!
//! The random source is passed in so a seeded generator gives repeatable
//! shuffles.

mod policy;

pub use policy::*;

#[cfg(test)]
mod tests;
