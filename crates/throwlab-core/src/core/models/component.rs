use super::molecule::Molecule;
use crate::core::registry::molecule::MoleculeLookup;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One line of a fragrance formula: a molecule and its concentration range in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub molecule_id: String,
    pub percentage_min: f64,
    pub percentage_max: f64,
}

impl Component {
    pub fn new(molecule_id: impl Into<String>, percentage_min: f64, percentage_max: f64) -> Self {
        Self {
            molecule_id: molecule_id.into(),
            percentage_min,
            percentage_max,
        }
    }

    pub fn fixed(molecule_id: impl Into<String>, percentage: f64) -> Self {
        Self::new(molecule_id, percentage, percentage)
    }

    #[inline]
    pub fn midpoint(&self) -> f64 {
        (self.percentage_min + self.percentage_max) / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolvedComponent<'a> {
    pub molecule: &'a Molecule,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution<'a> {
    pub resolved: Vec<ResolvedComponent<'a>>,
    pub unidentified: usize,
}

/// Resolves components against a molecule source.
///
/// Unknown molecules are counted as unidentified. Components with a non-positive
/// midpoint carry no material and are dropped without being counted. Both are logged.
pub fn resolve<'a, L>(components: &[Component], molecules: &'a L) -> Resolution<'a>
where
    L: MoleculeLookup + ?Sized,
{
    let mut resolution = Resolution::default();
    for component in components {
        match molecules.molecule(&component.molecule_id) {
            Some(molecule) => {
                let percentage = component.midpoint();
                if percentage > 0.0 {
                    resolution.resolved.push(ResolvedComponent {
                        molecule,
                        percentage,
                    });
                } else {
                    warn!(
                        molecule_id = %component.molecule_id,
                        percentage,
                        "Component carries no material; skipping."
                    );
                }
            }
            None => {
                warn!(
                    molecule_id = %component.molecule_id,
                    "Molecule not found in database; counting as unidentified."
                );
                resolution.unidentified += 1;
            }
        }
    }
    resolution
}

/// Concentration-weighted mean of an optional molecular property.
///
/// Molecules without the property still count toward the weight, using `default`.
pub fn weighted_mean<F>(components: &[ResolvedComponent<'_>], default: f64, property: F) -> f64
where
    F: Fn(&Molecule) -> Option<f64>,
{
    let total: f64 = components.iter().map(|c| c.percentage).sum();
    if total <= 0.0 {
        return default;
    }
    components
        .iter()
        .map(|c| property(c.molecule).unwrap_or(default) * c.percentage)
        .sum::<f64>()
        / total
}
