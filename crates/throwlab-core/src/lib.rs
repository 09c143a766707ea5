//! # Throwlab Core Library
//!
//! Thermodynamic diagnostics of candle fragrance throw: how strongly a fragrance is perceived
//! from an unlit candle (cold throw) and from its melt pool (hot throw), for a given wax or
//! wax blend.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `WaxThermoProfile`),
//!   the physical laws used for estimation (Clausius–Clapeyron, Stokes–Einstein,
//!   Flory–Huggins) and the read-only registries loaded from data files.
//!
//! - **[`engine`]: The Logic Core.** Self-contained analysis tasks (throw profile, blend
//!   combination, maximum load, cure time, scoring, archetype comparison, optimization advice),
//!   together with configuration, progress reporting and error types.
//!
//! - **[`workflows`]: The Public API.** Complete procedures that chain the tasks, such as the
//!   full diagnosis of a fragrance in a wax.

pub mod core;
pub mod engine;
pub mod workflows;
