//! Small pure helpers shared across modules.

pub mod merge;

pub use merge::{deep_merge, merged};
