use super::estimator::{GAS_CONSTANT, boiling_point, enthalpy_of_vaporization, to_kelvin};
use crate::core::models::molecule::Molecule;

/// Clausius–Clapeyron vapor pressure relative to the pressure at the boiling point.
///
/// The result is clamped to `[0, 1]`; at or above the boiling point it saturates at 1.
#[inline]
pub fn clausius_clapeyron(enthalpy: f64, temperature_k: f64, boiling_point_k: f64) -> f64 {
    let exponent = -enthalpy / GAS_CONSTANT * (1.0 / temperature_k - 1.0 / boiling_point_k);
    exponent.exp().clamp(0.0, 1.0)
}

pub fn relative_vapor_pressure(molecule: &Molecule, temperature_c: f64) -> f64 {
    let teb_k = to_kelvin(boiling_point(molecule));
    let enthalpy = enthalpy_of_vaporization(molecule, teb_k);
    clausius_clapeyron(enthalpy, to_kelvin(temperature_c), teb_k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limonene_like() -> Molecule {
        Molecule::new("5989-27-5", "Limonene")
            .with_family("terpene")
            .with_molecular_weight(136.24)
            .with_flash_point(48.0)
    }

    #[test]
    fn vapor_pressure_is_one_at_boiling_point() {
        assert!((clausius_clapeyron(36_000.0, 400.0, 400.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn vapor_pressure_saturates_above_boiling_point() {
        assert_eq!(clausius_clapeyron(36_000.0, 450.0, 400.0), 1.0);
    }

    #[test]
    fn vapor_pressure_strictly_increases_with_temperature_below_boiling() {
        let mol = limonene_like();
        let mut previous = relative_vapor_pressure(&mol, 0.0);
        for t in (5..=140).step_by(5) {
            let current = relative_vapor_pressure(&mol, t as f64);
            assert!(
                current > previous,
                "Pvap({t}) = {current} is not above {previous}"
            );
            previous = current;
        }
    }

    #[test]
    fn vapor_pressure_stays_within_unit_interval() {
        let mol = limonene_like();
        for t in [-40.0, 0.0, 20.0, 60.0, 145.0, 300.0] {
            let p = relative_vapor_pressure(&mol, t);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn heavier_molecule_is_less_volatile_at_cold_surface() {
        let light = limonene_like();
        let heavy = Molecule::new("1222-05-5", "Galaxolide")
            .with_family("musk-polycyclic")
            .with_molecular_weight(258.4)
            .with_flash_point(135.0);
        assert!(relative_vapor_pressure(&light, 20.0) > relative_vapor_pressure(&heavy, 20.0));
    }
}
