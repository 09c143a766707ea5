use super::diagnostic::{self, Diagnostic};
use crate::core::models::component::{Component, resolve};
use crate::core::models::molecule::{Molecule, Register, Volatility};
use crate::core::models::wax::WaxThermoProfile;
use crate::core::physics::diffusion::relative_diffusion;
use crate::core::physics::estimator::boiling_point;
use crate::core::physics::solubility::{Miscibility, hildebrand_from_logp, miscibility};
use crate::core::physics::throw_index::throw_index;
use crate::core::physics::vapor::relative_vapor_pressure;
use crate::core::registry::molecule::MoleculeLookup;
use crate::engine::error::EngineError;
use serde::Serialize;
use tracing::{debug, instrument, warn};

const COLD_ONLY_RATIO: f64 = 3.0;
const COLD_DOMINANT_RATIO: f64 = 1.5;
const HOT_ONLY_RATIO: f64 = 5.0;
const HOT_DOMINANT_RATIO: f64 = 2.0;
const INERT_THRESHOLD: f64 = 1e-8;

const WEAK_OVERALL_THRESHOLD: f64 = 1e-7;
const BALANCE_HOT_DOMINANT_RATIO: f64 = 5.0;
const BALANCE_COLD_DOMINANT_RATIO: f64 = 0.5;

const ULTRA_VOLATILE_MAX_FP: f64 = 50.0;
const VOLATILE_MAX_FP: f64 = 80.0;
const SEMI_FIXATIVE_MAX_FP: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Behavior {
    ColdOnly,
    ColdDominant,
    Balanced,
    HotDominant,
    HotOnly,
    Inert,
}

impl Behavior {
    pub fn classify(cold: f64, hot: f64) -> Self {
        if cold > COLD_ONLY_RATIO * hot {
            Behavior::ColdOnly
        } else if cold > COLD_DOMINANT_RATIO * hot {
            Behavior::ColdDominant
        } else if hot > HOT_ONLY_RATIO * cold {
            Behavior::HotOnly
        } else if hot > HOT_DOMINANT_RATIO * cold {
            Behavior::HotDominant
        } else if cold < INERT_THRESHOLD && hot < INERT_THRESHOLD {
            Behavior::Inert
        } else {
            Behavior::Balanced
        }
    }

    pub fn leans_cold(self) -> bool {
        matches!(self, Behavior::ColdOnly | Behavior::ColdDominant)
    }

    pub fn leans_hot(self) -> bool {
        matches!(self, Behavior::HotOnly | Behavior::HotDominant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Balance {
    ColdDominant,
    Balanced,
    HotDominant,
    WeakOverall,
}

impl Balance {
    pub fn classify(cold_total: f64, hot_total: f64, ratio: Option<f64>) -> Self {
        if cold_total < WEAK_OVERALL_THRESHOLD && hot_total < WEAK_OVERALL_THRESHOLD {
            return Balance::WeakOverall;
        }
        match ratio {
            None => Balance::HotDominant,
            Some(r) if r > BALANCE_HOT_DOMINANT_RATIO => Balance::HotDominant,
            Some(r) if r < BALANCE_COLD_DOMINANT_RATIO => Balance::ColdDominant,
            Some(_) => Balance::Balanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HildebrandMatch {
    pub molecule_delta: f64,
    pub wax_delta: f64,
    pub difference: f64,
    pub miscibility: Miscibility,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleculeThrow {
    pub id: String,
    pub name: String,
    pub family: String,
    pub molecular_weight: Option<f64>,
    pub flash_point: Option<f64>,
    pub logp: Option<f64>,
    pub odor_threshold: Option<f64>,
    pub volatility: Volatility,
    pub register: Register,
    pub percentage: f64,
    pub boiling_point_estimated: f64,
    pub pvap_cold: f64,
    pub pvap_hot: f64,
    /// Hot over cold vapor pressure; absent when the cold value is zero.
    pub pvap_ratio: Option<f64>,
    pub diffusion_hot: f64,
    pub cold_physical: f64,
    pub hot_physical: f64,
    pub cold_contribution: f64,
    pub hot_contribution: f64,
    pub behavior: Behavior,
    pub hildebrand: Option<HildebrandMatch>,
    pub aromatic_aldehyde: bool,
}

impl MoleculeThrow {
    pub fn is_incompatible(&self) -> bool {
        self.hildebrand
            .is_some_and(|h| h.miscibility == Miscibility::Incompatible)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegisterShare {
    pub register: Register,
    pub percentage: f64,
    pub cold: f64,
    pub hot: f64,
    pub molecules: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlashPointZone {
    UltraVolatile,
    Volatile,
    SemiFixative,
    Fixative,
}

impl FlashPointZone {
    pub const ALL: [FlashPointZone; 4] = [
        FlashPointZone::UltraVolatile,
        FlashPointZone::Volatile,
        FlashPointZone::SemiFixative,
        FlashPointZone::Fixative,
    ];

    pub fn from_flash_point(fp: f64) -> Self {
        if fp < ULTRA_VOLATILE_MAX_FP {
            FlashPointZone::UltraVolatile
        } else if fp < VOLATILE_MAX_FP {
            FlashPointZone::Volatile
        } else if fp < SEMI_FIXATIVE_MAX_FP {
            FlashPointZone::SemiFixative
        } else {
            FlashPointZone::Fixative
        }
    }

    pub fn role(self) -> &'static str {
        match self {
            FlashPointZone::UltraVolatile => {
                "Fleeting top notes: intense but brief cold throw, gone from the melt pool within 30 minutes"
            }
            FlashPointZone::Volatile => {
                "Heart of the fragrance: balances diffusion and tenacity, the ideal candle zone"
            }
            FlashPointZone::SemiFixative => {
                "Heart to base: diffuses mostly when hot, with good duration"
            }
            FlashPointZone::Fixative => {
                "Base notes: anchor the fragrance, with almost no cold throw"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneShare {
    pub zone: FlashPointZone,
    pub percentage: f64,
    /// Share of the formula whose flash point is known, in percent.
    pub relative_percentage: f64,
    pub molecules: Vec<String>,
}

/// Cold and hot throw of a fragrance in one wax, with per-molecule detail and diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThrowProfile {
    pub wax: WaxThermoProfile,
    pub molecules: Vec<MoleculeThrow>,
    pub cold_throw_index: f64,
    pub hot_throw_index: f64,
    /// Hot over cold throw; absent when no cold throw exists.
    pub ratio_hot_cold: Option<f64>,
    pub balance: Balance,
    pub registers: Vec<RegisterShare>,
    pub flash_point_zones: Vec<ZoneShare>,
    pub total_components_identified: usize,
    pub total_components_unidentified: usize,
    pub diagnostic: Diagnostic,
}

impl ThrowProfile {
    pub fn register(&self, register: Register) -> Option<&RegisterShare> {
        self.registers.iter().find(|r| r.register == register)
    }

    pub fn percentage_where<F>(&self, predicate: F) -> f64
    where
        F: Fn(&MoleculeThrow) -> bool,
    {
        self.molecules
            .iter()
            .filter(|m| predicate(m))
            .map(|m| m.percentage)
            .sum()
    }
}

#[instrument(skip_all, name = "throw_profile_task", fields(wax = %wax.key))]
pub fn run<L>(
    components: &[Component],
    molecules: &L,
    wax: &WaxThermoProfile,
) -> Result<ThrowProfile, EngineError>
where
    L: MoleculeLookup + ?Sized,
{
    if components.is_empty() {
        return Err(EngineError::EmptyComponents);
    }

    let resolution = resolve(components, molecules);
    if resolution.unidentified > 0 {
        warn!(
            unidentified = resolution.unidentified,
            "Some components are not in the molecule database and were skipped."
        );
    }

    let entries: Vec<MoleculeThrow> = resolution
        .resolved
        .iter()
        .map(|c| molecule_throw(c.molecule, c.percentage, wax))
        .collect();

    let cold_total: f64 = entries.iter().map(|m| m.cold_contribution).sum();
    let hot_total: f64 = entries.iter().map(|m| m.hot_contribution).sum();
    let ratio = (cold_total > 0.0).then(|| hot_total / cold_total);
    let balance = Balance::classify(cold_total, hot_total, ratio);

    debug!(
        cold = cold_total,
        hot = hot_total,
        ?balance,
        "Throw totals computed."
    );

    let registers = register_shares(&entries);
    let flash_point_zones = flash_point_zones(&entries);

    let mut profile = ThrowProfile {
        wax: wax.clone(),
        molecules: entries,
        cold_throw_index: cold_total,
        hot_throw_index: hot_total,
        ratio_hot_cold: ratio,
        balance,
        registers,
        flash_point_zones,
        total_components_identified: resolution.resolved.len(),
        total_components_unidentified: resolution.unidentified,
        diagnostic: Diagnostic::default(),
    };
    profile.diagnostic = diagnostic::run(&profile);
    Ok(profile)
}

fn molecule_throw(molecule: &Molecule, percentage: f64, wax: &WaxThermoProfile) -> MoleculeThrow {
    let concentration = percentage / 100.0;
    let cold = throw_index(molecule, wax, wax.cold_temperature, concentration);
    let hot = throw_index(molecule, wax, wax.melt_pool_temperature, concentration);

    let pvap_cold = relative_vapor_pressure(molecule, wax.cold_temperature);
    let pvap_hot = relative_vapor_pressure(molecule, wax.melt_pool_temperature);

    let hildebrand = molecule.logp.map(|logp| {
        let molecule_delta = hildebrand_from_logp(logp);
        let difference = (molecule_delta - wax.hildebrand).abs();
        HildebrandMatch {
            molecule_delta,
            wax_delta: wax.hildebrand,
            difference,
            miscibility: miscibility(difference),
        }
    });

    let volatility = molecule.volatility_or_default();
    MoleculeThrow {
        id: molecule.id.clone(),
        name: molecule.name.clone(),
        family: molecule.family.clone(),
        molecular_weight: molecule.molecular_weight,
        flash_point: molecule.flash_point,
        logp: molecule.logp,
        odor_threshold: molecule.odor_threshold,
        volatility,
        register: volatility.register(),
        percentage,
        boiling_point_estimated: boiling_point(molecule),
        pvap_cold,
        pvap_hot,
        pvap_ratio: (pvap_cold > 0.0).then(|| pvap_hot / pvap_cold),
        diffusion_hot: relative_diffusion(molecule, wax, wax.melt_pool_temperature),
        cold_physical: cold.physical,
        hot_physical: hot.physical,
        cold_contribution: cold.perceptual,
        hot_contribution: hot.perceptual,
        behavior: Behavior::classify(cold.perceptual, hot.perceptual),
        hildebrand,
        aromatic_aldehyde: molecule.is_aromatic_aldehyde(),
    }
}

fn register_shares(entries: &[MoleculeThrow]) -> Vec<RegisterShare> {
    [Register::Top, Register::Heart, Register::Base]
        .into_iter()
        .map(|register| {
            let members: Vec<&MoleculeThrow> =
                entries.iter().filter(|m| m.register == register).collect();
            RegisterShare {
                register,
                percentage: members.iter().map(|m| m.percentage).sum(),
                cold: members.iter().map(|m| m.cold_contribution).sum(),
                hot: members.iter().map(|m| m.hot_contribution).sum(),
                molecules: members.iter().map(|m| m.name.clone()).collect(),
            }
        })
        .collect()
}

fn flash_point_zones(entries: &[MoleculeThrow]) -> Vec<ZoneShare> {
    let covered: f64 = entries
        .iter()
        .filter(|m| m.flash_point.is_some_and(|fp| fp > 0.0))
        .map(|m| m.percentage)
        .sum();

    FlashPointZone::ALL
        .into_iter()
        .map(|zone| {
            let mut members: Vec<&MoleculeThrow> = entries
                .iter()
                .filter(|m| {
                    m.flash_point
                        .filter(|&fp| fp > 0.0)
                        .is_some_and(|fp| FlashPointZone::from_flash_point(fp) == zone)
                })
                .collect();
            members.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
            let percentage: f64 = members.iter().map(|m| m.percentage).sum();
            ZoneShare {
                zone,
                percentage,
                relative_percentage: if covered > 0.0 {
                    percentage / covered * 100.0
                } else {
                    0.0
                },
                molecules: members.iter().map(|m| m.name.clone()).collect(),
            }
        })
        .collect()
}
