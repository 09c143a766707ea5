use super::estimator::to_kelvin;
use crate::core::models::molecule::Molecule;
use crate::core::models::wax::WaxThermoProfile;

pub const DEFAULT_MOLECULAR_WEIGHT: f64 = 154.0;

const REFERENCE_TEMPERATURE_K: f64 = 333.0;
const REFERENCE_VISCOSITY_CST: f64 = 4.5;

/// Stokes–Einstein mobility `T / (η·MW^(1/3))`, unnormalized.
#[inline]
pub fn stokes_einstein(temperature_k: f64, viscosity: f64, molecular_weight: f64) -> f64 {
    temperature_k / (viscosity * molecular_weight.cbrt())
}

/// Diffusion coefficient relative to a 154 g/mol molecule in paraffin at 333 K.
pub fn relative_diffusion(molecule: &Molecule, wax: &WaxThermoProfile, temperature_c: f64) -> f64 {
    let mw = molecule
        .molecular_weight
        .filter(|&v| v > 0.0)
        .unwrap_or(DEFAULT_MOLECULAR_WEIGHT);
    let reference = stokes_einstein(
        REFERENCE_TEMPERATURE_K,
        REFERENCE_VISCOSITY_CST,
        DEFAULT_MOLECULAR_WEIGHT,
    );
    stokes_einstein(to_kelvin(temperature_c), wax.viscosity, mw) / reference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::wax::test_support::archetype;

    #[test]
    fn reference_molecule_in_reference_wax_is_close_to_one() {
        let wax = archetype("paraffin");
        let mol = Molecule::new("x", "X").with_molecular_weight(154.0);
        let d = relative_diffusion(&mol, &wax, 333.0 - 273.15);
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn diffusion_decreases_with_molecular_weight() {
        let wax = archetype("paraffin");
        let light = Molecule::new("l", "L").with_molecular_weight(120.0);
        let heavy = Molecule::new("h", "H").with_molecular_weight(280.0);
        assert!(relative_diffusion(&light, &wax, 60.0) > relative_diffusion(&heavy, &wax, 60.0));
    }

    #[test]
    fn diffusion_decreases_with_viscosity() {
        let fluid = archetype("paraffin");
        let mut thick = archetype("soy");
        thick.viscosity = 35.0;
        let mol = Molecule::new("x", "X").with_molecular_weight(154.0);
        assert!(relative_diffusion(&mol, &fluid, 60.0) > relative_diffusion(&mol, &thick, 60.0));
    }

    #[test]
    fn unknown_molecular_weight_uses_default() {
        let wax = archetype("paraffin");
        let unknown = Molecule::new("u", "U");
        let reference = Molecule::new("r", "R").with_molecular_weight(DEFAULT_MOLECULAR_WEIGHT);
        assert_eq!(
            relative_diffusion(&unknown, &wax, 60.0),
            relative_diffusion(&reference, &wax, 60.0)
        );
    }
}
