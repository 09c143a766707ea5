//! # Core Module
//!
//! This module provides the stateless foundation of the throw engine: reference data models,
//! the physical laws governing fragrance release, and the loaders for the reference tables.
//!
//! ## Overview
//!
//! Nothing in this module holds state between calls. Models are plain records, physical laws
//! are pure functions of their inputs, and registries are read-only once loaded. The
//! [`crate::engine`] layer composes these pieces into complete analyses.
//!
//! ## Architecture
//!
//! - **Reference Data** ([`models`]) - Molecules, formula components and wax profiles
//! - **Physical Laws** ([`physics`]) - Boiling point estimation, Clausius–Clapeyron vapor
//!   pressure, Stokes–Einstein diffusion and throw indices
//! - **Reference Tables** ([`registry`]) - TOML wax archetype registry and CSV/TOML molecule database
//! - **Static Tables** ([`rules`]) - Volatility aliases, family keywords and literature citations
//!
//! ## Scientific Foundation
//!
//! - **Clausius–Clapeyron** with Trouton's rule for the enthalpy of vaporization
//! - **Stokes–Einstein** mobility of a solute in the liquid melt pool
//! - **Hildebrand and Hansen** solubility parameters for fragrance/wax compatibility
//! - **Avrami** crystallization kinetics and **Fick** solid-state diffusion for curing

pub mod models;
pub mod physics;
pub mod registry;
pub mod rules;
