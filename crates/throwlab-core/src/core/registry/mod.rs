//! Loaders for the immutable reference tables the engine reads: wax archetypes and
//! molecules. Both are loaded once and then shared read-only.

pub mod molecule;
pub mod wax;
