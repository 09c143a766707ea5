//! # Engine Module
//!
//! Analysis tasks and the infrastructure around them.
//!
//! - **Configuration** ([`config`]) - Wax selection, fragrance flash point and comparison toggle
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for front ends
//! - **Error Handling** ([`error`]) - Engine-wide error type
//! - **Tasks** ([`tasks`]) - One module per computation, each with a `run` entry point
//!
//! Every task is a pure function of borrowed, immutable inputs. The archetype comparison is
//! the only fan-out and runs in parallel when the `parallel` feature is enabled.

pub mod config;
pub mod error;
pub mod progress;
pub mod tasks;
