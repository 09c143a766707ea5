//! # Workflows Module
//!
//! High-level entry points that chain the engine tasks into complete analyses.
//!
//! - **Diagnosis** ([`diagnose`]) resolves the wax (archetype or blend), builds the throw
//!   profile, estimates the maximum load and the cure time, optionally compares every
//!   archetype, then scores the result and proposes an optimization plan.
//! - **Comparison** ([`compare`]) profiles one fragrance in every registered archetype.
//!
//! Workflows never load files themselves; registries and molecule databases are passed in
//! already loaded, so the same instances can be shared across many analyses.

pub mod compare;
pub mod diagnose;
