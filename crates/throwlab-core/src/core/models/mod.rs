//! # Core Models Module
//!
//! This module contains the reference data structures the throw engine reads: fragrance
//! molecules, formula components and wax thermophysical profiles.
//!
//! ## Overview
//!
//! Models are immutable records. They are loaded once by the registries in
//! [`crate::core::registry`] and shared by reference across every analysis, so they carry
//! no interior mutability and are safe to read from many threads at once.
//!
//! ## Key Components
//!
//! - [`molecule`] - Molecule records, volatility classes and olfactive registers
//! - [`component`] - Formula lines, their working concentration and resolution against a database
//! - [`wax`] - Wax archetype profiles, crystal structures, cure kinetics and blend composition
//!
//! ## Usage
//!
//! ```ignore
//! use throwlab::core::models::{component::Component, molecule::{Molecule, Volatility}};
//!
//! let linalool = Molecule::new("78-70-6", "Linalool")
//!     .with_family("terpene-alcohol")
//!     .with_molecular_weight(154.25)
//!     .with_volatility(Volatility::High);
//! let line = Component::new("78-70-6", 8.0, 12.0);
//! assert_eq!(line.midpoint(), 10.0);
//! ```

pub mod component;
pub mod molecule;
pub mod wax;
