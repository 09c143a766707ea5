use super::diffusion::relative_diffusion;
use super::vapor::relative_vapor_pressure;
use crate::core::models::molecule::Molecule;
use crate::core::models::wax::WaxThermoProfile;
use serde::Serialize;

/// Surfaces at or below this temperature are scored as a cold candle.
pub const COLD_REGIME_MAX_C: f64 = 25.0;
pub const DEFAULT_ODOR_THRESHOLD: f64 = 50.0; // µg/m³

const MIN_ODOR_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ThrowIndex {
    pub physical: f64,
    pub perceptual: f64,
}

/// Weight applied to a physical index to account for how easily the molecule is smelled.
#[inline]
pub fn perceptual_weight(odor_threshold: Option<f64>) -> f64 {
    DEFAULT_ODOR_THRESHOLD / odor_threshold.unwrap_or(DEFAULT_ODOR_THRESHOLD).max(MIN_ODOR_THRESHOLD)
}

/// Throw index of one molecule at `concentration` (fraction, not percent) and `temperature_c`.
///
/// A cold surface releases by surface migration only; a melt pool releases by diffusion
/// through the liquid and the crystalline channels.
pub fn throw_index(
    molecule: &Molecule,
    wax: &WaxThermoProfile,
    temperature_c: f64,
    concentration: f64,
) -> ThrowIndex {
    let pvap = relative_vapor_pressure(molecule, temperature_c);
    let physical = if temperature_c <= COLD_REGIME_MAX_C {
        pvap * wax.surface_migration * concentration
    } else {
        let diffusion = relative_diffusion(molecule, wax, temperature_c);
        pvap * diffusion * wax.channel_factor * concentration
    };
    ThrowIndex {
        physical,
        perceptual: physical * perceptual_weight(molecule.odor_threshold),
    }
}
