use super::estimator::GAS_CONSTANT;
use serde::Serialize;

const HILDEBRAND_INTERCEPT: f64 = 20.0; // MPa½
const HILDEBRAND_LOGP_SLOPE: f64 = 0.5;
const FRAGRANCE_DENSITY: f64 = 0.92; // g/cm³

const MISCIBLE_MAX_DIFFERENCE: f64 = 2.0;
const PARTIAL_MAX_DIFFERENCE: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Miscibility {
    Miscible,
    Partial,
    Incompatible,
}

/// Hildebrand solubility parameter of a fragrance molecule estimated from its logP.
#[inline]
pub fn hildebrand_from_logp(logp: f64) -> f64 {
    HILDEBRAND_INTERCEPT - HILDEBRAND_LOGP_SLOPE * logp
}

/// Molar volume in cm³/mol.
#[inline]
pub fn molar_volume(molecular_weight: f64) -> f64 {
    molecular_weight / FRAGRANCE_DENSITY
}

/// Flory–Huggins interaction parameter `χ = Vm·Δδ² / (R·T)`.
#[inline]
pub fn flory_huggins_chi(molar_volume: f64, delta_difference: f64, temperature_k: f64) -> f64 {
    molar_volume * delta_difference.powi(2) / (GAS_CONSTANT * temperature_k)
}

pub fn miscibility(delta_difference: f64) -> Miscibility {
    let diff = delta_difference.abs();
    if diff < MISCIBLE_MAX_DIFFERENCE {
        Miscibility::Miscible
    } else if diff < PARTIAL_MAX_DIFFERENCE {
        Miscibility::Partial
    } else {
        Miscibility::Incompatible
    }
}
