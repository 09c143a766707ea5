use crate::core::models::component::{ResolvedComponent, weighted_mean};
use crate::core::models::wax::WaxThermoProfile;
use crate::core::physics::diffusion::DEFAULT_MOLECULAR_WEIGHT;
use crate::core::physics::estimator::to_kelvin;
use crate::core::physics::solubility::{flory_huggins_chi, hildebrand_from_logp, molar_volume};
use serde::Serialize;
use tracing::{debug, instrument};

pub const BASE_CHARGE_PCT: f64 = 12.0;
pub const MIN_CHARGE_PCT: f64 = 4.0;
const CHARGE_RANGE_WIDTH: f64 = 2.0;
const DEFAULT_LOGP: f64 = 3.0;

const MIN_SOLUBILITY_FACTOR: f64 = 0.3;
const VISCOSITY_REFERENCE_CST: f64 = 20.0;
const LOW_FLASH_POINT_C: f64 = 55.0;
const MODERATE_FLASH_POINT_C: f64 = 65.0;
const SAFE_FLASH_POINT_C: f64 = 80.0;

// Upper flash-point bound of each tier and the load factor applied below it.
const SAFETY_TIERS: [(f64, f64); 3] = [
    (LOW_FLASH_POINT_C, 0.5),
    (MODERATE_FLASH_POINT_C, 0.7),
    (SAFE_FLASH_POINT_C, 0.85),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlashPointSource {
    Fragrance,
    Component,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Impact {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeFactor {
    pub name: &'static str,
    pub value: String,
    pub score: f64,
    pub impact: Impact,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FragranceParameters {
    pub mean_logp: f64,
    pub mean_molecular_weight: f64,
    pub hildebrand: f64,
    pub hildebrand_difference: f64,
    pub molar_volume: f64,
    pub chi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeMax {
    pub charge_min_pct: f64,
    pub charge_max_pct: f64,
    pub solubility_factor: f64,
    pub crystal_factor: f64,
    pub viscosity_factor: f64,
    pub safety_factor: f64,
    pub flash_point_used: Option<f64>,
    pub flash_point_source: FlashPointSource,
    pub fragrance: FragranceParameters,
    pub factors: Vec<ChargeFactor>,
}

/// Safety reduction applied for a flash point in °C; lower flash points are never allowed
/// a larger load than higher ones.
pub fn safety_factor(flash_point: Option<f64>) -> f64 {
    flash_point
        .and_then(|fp| {
            SAFETY_TIERS
                .iter()
                .find(|(bound, _)| fp < *bound)
                .map(|(_, factor)| *factor)
        })
        .unwrap_or(1.0)
}

#[instrument(skip_all, name = "charge_max_task")]
pub fn run(
    components: &[ResolvedComponent<'_>],
    wax: &WaxThermoProfile,
    fragrance_flash_point: Option<f64>,
) -> ChargeMax {
    let mean_logp = weighted_mean(components, DEFAULT_LOGP, |m| m.logp);
    let mean_mw = weighted_mean(components, DEFAULT_MOLECULAR_WEIGHT, |m| {
        m.molecular_weight.filter(|&v| v > 0.0)
    });

    let fragrance_delta = hildebrand_from_logp(mean_logp);
    let delta_difference = (fragrance_delta - wax.hildebrand).abs();
    let vm = molar_volume(mean_mw);
    let chi = flory_huggins_chi(vm, delta_difference, to_kelvin(wax.melt_pool_temperature));

    let solubility_factor = (1.0 - chi / 3.0).max(MIN_SOLUBILITY_FACTOR);
    let crystal_factor = 0.5 + 0.5 * wax.channel_factor;
    let viscosity_factor =
        (0.7 + 0.3 * (wax.viscosity / VISCOSITY_REFERENCE_CST).min(1.0)).min(1.0);

    let lowest_component_fp = components
        .iter()
        .filter_map(|c| c.molecule.flash_point)
        .filter(|&fp| fp > 0.0)
        .min_by(f64::total_cmp);
    let (flash_point_used, flash_point_source) = match fragrance_flash_point {
        Some(fp) if fp > 0.0 => (Some(fp), FlashPointSource::Fragrance),
        _ => match lowest_component_fp {
            Some(fp) => (Some(fp), FlashPointSource::Component),
            None => (None, FlashPointSource::Unknown),
        },
    };
    let safety = safety_factor(flash_point_used);

    let raw = BASE_CHARGE_PCT * solubility_factor * crystal_factor * viscosity_factor;
    let charge_max_pct = round1(raw * safety);
    let charge_min_pct = round1(charge_max_pct - CHARGE_RANGE_WIDTH)
        .max(MIN_CHARGE_PCT)
        .min(charge_max_pct);

    debug!(
        chi,
        charge_min_pct, charge_max_pct, "Maximum fragrance load estimated."
    );

    let fragrance = FragranceParameters {
        mean_logp,
        mean_molecular_weight: mean_mw,
        hildebrand: fragrance_delta,
        hildebrand_difference: delta_difference,
        molar_volume: vm,
        chi,
    };

    let mut factors = vec![
        hildebrand_factor(&fragrance, wax, solubility_factor),
        chi_factor(&fragrance),
        crystal_factor_entry(wax, crystal_factor),
        viscosity_factor_entry(wax, viscosity_factor),
    ];
    if safety < 1.0 {
        factors.push(safety_factor_entry(
            components,
            flash_point_used.unwrap_or_default(),
            flash_point_source,
            safety,
        ));
    }

    ChargeMax {
        charge_min_pct,
        charge_max_pct,
        solubility_factor,
        crystal_factor,
        viscosity_factor,
        safety_factor: safety,
        flash_point_used,
        flash_point_source,
        fragrance,
        factors,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn hildebrand_factor(p: &FragranceParameters, wax: &WaxThermoProfile, score: f64) -> ChargeFactor {
    let diff = p.hildebrand_difference;
    let (impact, explanation) = if diff < 1.5 {
        (
            Impact::Positive,
            "Excellent: the fragrance is highly compatible with this wax (Hildebrand gap below 1.5). \
             Homogeneous dissolution, no sweating expected.",
        )
    } else if diff < 3.0 {
        (
            Impact::Neutral,
            "Fair: average compatibility. The fragrance dissolves but may sweat at high load.",
        )
    } else {
        (
            Impact::Negative,
            "Poor: Hildebrand gap above 3. Phase separation and sweating are likely even at low load.",
        )
    };
    ChargeFactor {
        name: "Hildebrand compatibility",
        value: format!(
            "fragrance δ ≈ {:.1} MPa½, wax δ = {:.1} MPa½, gap {:.1}",
            p.hildebrand, wax.hildebrand, diff
        ),
        score,
        impact,
        explanation: explanation.to_string(),
    }
}

fn chi_factor(p: &FragranceParameters) -> ChargeFactor {
    let (score, impact, explanation) = if p.chi < 0.5 {
        (
            1.0,
            Impact::Positive,
            "Full miscibility predicted (χ below 0.5).",
        )
    } else if p.chi < 1.5 {
        (
            0.7,
            Impact::Neutral,
            "Partial miscibility (χ between 0.5 and 1.5); compatible below the computed maximum load.",
        )
    } else {
        (
            0.4,
            Impact::Negative,
            "Limited miscibility (χ above 1.5); phase separation is likely at high concentration.",
        )
    };
    ChargeFactor {
        name: "Flory–Huggins parameter",
        value: format!("χ = {:.2} (Vm = {:.0} cm³/mol)", p.chi, p.molar_volume),
        score,
        impact,
        explanation: explanation.to_string(),
    }
}

fn crystal_factor_entry(wax: &WaxThermoProfile, score: f64) -> ChargeFactor {
    let (impact, explanation) = if wax.channel_factor > 0.7 {
        (
            Impact::Positive,
            "Open macrocrystals with wide intercrystalline channels; the fragrance fits easily into the matrix.",
        )
    } else if wax.channel_factor > 0.3 {
        (
            Impact::Neutral,
            "Mixed structure; absorption is fair but not optimal.",
        )
    } else {
        (
            Impact::Negative,
            "Polymorphic or amorphous crystals hold the fragrance but limit initial absorption.",
        )
    };
    ChargeFactor {
        name: "Crystal structure",
        value: format!(
            "channel factor {:.2}, {} crystals",
            wax.channel_factor, wax.crystal_structure
        ),
        score,
        impact,
        explanation: explanation.to_string(),
    }
}

fn viscosity_factor_entry(wax: &WaxThermoProfile, score: f64) -> ChargeFactor {
    let (impact, explanation) = if wax.viscosity < 10.0 {
        (
            Impact::Positive,
            "Fluid wax; the fragrance disperses easily when incorporated.",
        )
    } else if wax.viscosity < 25.0 {
        (
            Impact::Neutral,
            "Medium viscosity; stir well to homogenize.",
        )
    } else {
        (
            Impact::Negative,
            "Thick wax; the fragrance can form pockets. Stir vigorously.",
        )
    };
    ChargeFactor {
        name: "Melt pool viscosity",
        value: format!("{:.1} cSt", wax.viscosity),
        score,
        impact,
        explanation: explanation.to_string(),
    }
}

fn safety_factor_entry(
    components: &[ResolvedComponent<'_>],
    flash_point: f64,
    source: FlashPointSource,
    score: f64,
) -> ChargeFactor {
    let risky = components
        .iter()
        .filter(|c| c.molecule.flash_point.is_some_and(|fp| fp > 0.0 && fp < LOW_FLASH_POINT_C))
        .take(6)
        .map(|c| {
            format!(
                "{} FP={:.0} °C",
                c.molecule.name,
                c.molecule.flash_point.unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let explanation = match source {
        FlashPointSource::Fragrance => format!(
            "Flash point of the fragrance blend is {flash_point:.0} °C. Below {MODERATE_FLASH_POINT_C:.0} °C the load must be reduced.{}",
            if risky.is_empty() {
                String::new()
            } else {
                format!(" Most volatile components: {risky}")
            }
        ),
        _ => format!(
            "No fragrance flash point given; estimate based on the most flammable component \
             ({flash_point:.0} °C). The real flash point of the blend is probably higher.{}",
            if risky.is_empty() {
                String::new()
            } else {
                format!(" Components at risk: {risky}")
            }
        ),
    };

    ChargeFactor {
        name: "Flash point safety",
        value: format!(
            "flash point {flash_point:.0} °C, load reduced by {:.0} %",
            (1.0 - score) * 100.0
        ),
        score,
        impact: Impact::Negative,
        explanation,
    }
}
