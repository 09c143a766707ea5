//! Analysis tasks of the throw engine.
//!
//! Each submodule is one self-contained computation with a `run` entry point: building a
//! throw profile and its diagnostic, combining wax blends, estimating the maximum load and
//! the cure time, scoring, comparing archetypes and assembling an optimization plan. Tasks
//! borrow their inputs immutably and can be composed freely by the workflows.

pub mod advisor;
pub mod blend;
pub mod charge;
pub mod comparison;
pub mod curing;
pub mod diagnostic;
pub mod profile;
pub mod scoring;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::models::molecule::{Molecule, Volatility};
    use crate::core::registry::molecule::MoleculeDatabase;
    use crate::core::registry::wax::WaxRegistry;

    pub fn registry() -> WaxRegistry {
        WaxRegistry::builtin().unwrap()
    }

    fn reference(
        id: &str,
        name: &str,
        family: &str,
        mw: f64,
        fp: f64,
        logp: f64,
        volatility: Volatility,
    ) -> Molecule {
        Molecule::new(id, name)
            .with_family(family)
            .with_molecular_weight(mw)
            .with_flash_point(fp)
            .with_logp(logp)
            .with_volatility(volatility)
    }

    pub fn molecule_db() -> MoleculeDatabase {
        use Volatility::*;
        vec![
            reference("78-70-6", "Linalool", "terpene-alcohol", 154.25, 76.0, 2.97, High),
            reference("5989-27-5", "Limonene", "terpene", 136.24, 48.0, 4.57, VeryHigh),
            reference("87-44-5", "Caryophyllene", "sesquiterpene", 204.36, 110.0, 6.3, Medium),
            reference("77-53-2", "Cedrol", "sesquiterpene-alcohol", 222.37, 140.0, 4.33, Low),
            reference("104-55-2", "Cinnamaldehyde", "aromatic-aldehyde", 132.16, 71.0, 1.9, High),
            reference("121-33-5", "Vanillin", "aromatic-aldehyde", 152.15, 147.0, 1.21, Low),
            reference("1222-05-5", "Galaxolide", "musk-polycyclic", 258.40, 135.0, 5.9, VeryLow),
            reference("54464-57-2", "Iso E Super", "woody-ketone", 234.38, 111.0, 5.2, Low),
            reference("104-67-6", "gamma-Undecalactone", "lactone", 184.28, 123.0, 3.06, Low),
            reference("97-53-0", "Eugenol", "phenol", 164.20, 112.0, 2.27, Medium),
        ]
        .into_iter()
        .collect()
    }
}
