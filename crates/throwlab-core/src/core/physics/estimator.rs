use crate::core::models::molecule::Molecule;

pub const GAS_CONSTANT: f64 = 8.314; // J/(mol·K)
pub const KELVIN_OFFSET: f64 = 273.15;

const DEFAULT_BOILING_POINT_C: f64 = 250.0;
const TROUTON_HYDROGEN_BONDED: f64 = 110.0; // J/(mol·K)
const TROUTON_HEAVY_FIXATIVE: f64 = 95.0;
const TROUTON_DEFAULT: f64 = 88.0;

#[inline]
pub fn to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

/// Boiling point in °C, estimated from the best available property.
///
/// Preference order: measured boiling point, flash point correlation
/// (`1.5·FP + 73`), molecular weight correlation (`2.5·MW + 20`), then 250 °C.
pub fn boiling_point(molecule: &Molecule) -> f64 {
    if let Some(bp) = molecule.boiling_point.filter(|&v| v > 0.0) {
        return bp;
    }
    if let Some(fp) = molecule.flash_point.filter(|&v| v > 0.0) {
        return 1.5 * fp + 73.0;
    }
    if let Some(mw) = molecule.molecular_weight.filter(|&v| v > 0.0) {
        return 2.5 * mw + 20.0;
    }
    DEFAULT_BOILING_POINT_C
}

/// Trouton coefficient for the molecule's family, in J/(mol·K).
pub fn trouton_coefficient(molecule: &Molecule) -> f64 {
    if molecule.is_hydrogen_bonded() {
        TROUTON_HYDROGEN_BONDED
    } else if molecule.is_heavy_fixative() {
        TROUTON_HEAVY_FIXATIVE
    } else {
        TROUTON_DEFAULT
    }
}

/// Enthalpy of vaporization in J/mol for a boiling point given in Kelvin.
#[inline]
pub fn enthalpy_of_vaporization(molecule: &Molecule, boiling_point_k: f64) -> f64 {
    trouton_coefficient(molecule) * boiling_point_k
}
