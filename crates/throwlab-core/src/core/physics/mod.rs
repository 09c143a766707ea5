//! Physical laws behind fragrance release from a wax matrix.
//!
//! Each submodule is a set of stateless functions: boiling point and enthalpy estimation
//! ([`estimator`]), Clausius–Clapeyron vapor pressure ([`vapor`]), Stokes–Einstein
//! mobility in the melt pool ([`diffusion`]), Hildebrand and Flory–Huggins compatibility
//! ([`solubility`]) and the combination into cold and hot throw indices ([`throw_index`]).

pub mod diffusion;
pub mod estimator;
pub mod solubility;
pub mod throw_index;
pub mod vapor;
