use crate::core::models::component::{ResolvedComponent, weighted_mean};
use crate::core::models::wax::WaxThermoProfile;
use crate::core::physics::diffusion::DEFAULT_MOLECULAR_WEIGHT;
use crate::core::rules::citations;
use serde::Serialize;
use std::f64::consts::PI;
use tracing::{debug, instrument};

const AMBIENT_TEMPERATURE_C: f64 = 20.0;
const POUR_OVERHEAT_C: f64 = 10.0;
const AVRAMI_REFERENCE_UNDERCOOLING: f64 = 30.0;
const AVRAMI_UNDERCOOLING_EXPONENT: f64 = 1.5;
// ln(20): time to 95 % transformed.
const AVRAMI_T95_NUMERATOR: f64 = 3.0;
const MIN_AVRAMI_RATE: f64 = 0.001;

const SOLID_DIFFUSION_BASE: f64 = 1e-12; // m²/s
const DEFAULT_LOGP: f64 = 3.0;

const RANGE_LOW_FACTOR: f64 = 0.7;
const RANGE_HIGH_FACTOR: f64 = 1.3;
const QUICK_CURE_MAX_DAYS: u32 = 2;
const HEAVY_MEAN_MW: f64 = 200.0;
const POLAR_MEAN_LOGP: f64 = 2.5;
const DENSE_NETWORK_SPACING_UM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CurePhaseKind {
    Crystallization,
    PolymorphicTransition,
    SolidDiffusion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurePhase {
    pub phase: CurePhaseKind,
    pub hours: f64,
    pub law: String,
    pub justification: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CureParameters {
    pub pour_temperature: f64,
    pub ambient_temperature: f64,
    pub undercooling: f64,
    pub mean_molecular_weight: f64,
    pub mean_logp: f64,
    pub amorphous_fraction: f64,
    pub solid_diffusion: f64,
    pub avrami_n: f64,
    pub avrami_k: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CureEstimate {
    pub crystallization_hours: f64,
    pub polymorph_hours: f64,
    pub diffusion_hours: f64,
    pub total_hours: f64,
    pub rate_limiting_phase: CurePhaseKind,
    pub central_days: u32,
    pub min_days: u32,
    pub max_days: u32,
    pub phases: Vec<CurePhase>,
    pub parameters: CureParameters,
    pub recommendations: Vec<String>,
}

/// Avrami rate constant corrected for undercooling, in h⁻ⁿ.
#[inline]
pub fn avrami_rate(k_base: f64, undercooling: f64) -> f64 {
    k_base * (undercooling.max(0.0) / AVRAMI_REFERENCE_UNDERCOOLING).powf(AVRAMI_UNDERCOOLING_EXPONENT)
}

/// Hours until 95 % of the wax has crystallized.
#[inline]
pub fn avrami_t95_hours(k: f64, n: f64) -> f64 {
    (AVRAMI_T95_NUMERATOR / k.max(MIN_AVRAMI_RATE)).powf(1.0 / n)
}

/// Effective solid-state diffusion coefficient in m²/s.
pub fn solid_diffusion(amorphous_fraction: f64, mean_mw: f64, mean_logp: f64) -> f64 {
    let mw_factor = (150.0 / mean_mw.max(100.0)).sqrt();
    let logp_factor = if mean_logp > 4.0 {
        1.2
    } else if mean_logp > 2.5 {
        1.0
    } else {
        0.7
    };
    SOLID_DIFFUSION_BASE * amorphous_fraction.powi(2) * mw_factor * logp_factor
}

/// Characteristic time `L² / (π²·D)` in hours for a spacing given in µm.
#[inline]
pub fn diffusion_hours(spacing_um: f64, diffusion: f64) -> f64 {
    let l = spacing_um * 1e-6;
    l * l / (PI * PI * diffusion) / 3600.0
}

#[instrument(skip_all, name = "curing_task")]
pub fn run(components: &[ResolvedComponent<'_>], wax: &WaxThermoProfile) -> CureEstimate {
    let kinetics = &wax.kinetics;
    let undercooling = (wax.melt_pool_temperature - AMBIENT_TEMPERATURE_C).max(0.0);

    let k = avrami_rate(kinetics.avrami_k_base, undercooling);
    let crystallization_hours = avrami_t95_hours(k, kinetics.avrami_n);
    let polymorph_hours = kinetics.polymorph_hours.max(0.0);

    let mean_mw = weighted_mean(components, DEFAULT_MOLECULAR_WEIGHT, |m| {
        m.molecular_weight.filter(|&v| v > 0.0)
    });
    let mean_logp = weighted_mean(components, DEFAULT_LOGP, |m| m.logp);
    let phi = kinetics.amorphous_fraction;
    let d_solid = solid_diffusion(phi, mean_mw, mean_logp);
    let diffusion_hours = diffusion_hours(kinetics.intercrystal_spacing_um, d_solid);

    let total_hours = crystallization_hours.max(polymorph_hours).max(diffusion_hours);
    let rate_limiting_phase = if polymorph_hours > 0.0 && total_hours == polymorph_hours {
        CurePhaseKind::PolymorphicTransition
    } else if total_hours == diffusion_hours {
        CurePhaseKind::SolidDiffusion
    } else {
        CurePhaseKind::Crystallization
    };

    let min_days = days(total_hours * RANGE_LOW_FACTOR).max(1);
    let max_days = days(total_hours * RANGE_HIGH_FACTOR).max(1);
    let central_days = days(total_hours);

    debug!(
        total_hours,
        ?rate_limiting_phase,
        "Cure time estimated."
    );

    let mut phases = vec![CurePhase {
        phase: CurePhaseKind::Crystallization,
        hours: crystallization_hours,
        law: format!(
            "Avrami: X(t) = 1 - exp(-{k:.4}·t^{}), undercooling {undercooling:.0} °C",
            kinetics.avrami_n
        ),
        justification: justification(kinetics.crystallization_note.as_deref(), "avrami"),
    }];
    if polymorph_hours > 0.0 {
        phases.push(CurePhase {
            phase: CurePhaseKind::PolymorphicTransition,
            hours: polymorph_hours,
            law: "Metastable to stable polymorph reorganization".to_string(),
            justification: justification(kinetics.polymorph_note.as_deref(), "polymorphism"),
        });
    }
    phases.push(CurePhase {
        phase: CurePhaseKind::SolidDiffusion,
        hours: diffusion_hours,
        law: format!(
            "Fick/Crank: t ≈ L²/(π²·D), L = {:.1} µm, D = {d_solid:.2e} m²/s",
            kinetics.intercrystal_spacing_um
        ),
        justification: justification(None, "fick"),
    });

    let mut recommendations = Vec::new();
    if min_days <= QUICK_CURE_MAX_DAYS {
        recommendations.push("Quick cure: the candle can be tested after 48 hours.".to_string());
    }
    if polymorph_hours > 0.0 {
        recommendations.push(format!(
            "Wait for the end of the polymorphic transition ({:.0} days) before judging the final \
             scent; the fragrance redistributes during this phase.",
            polymorph_hours / 24.0
        ));
    }
    if mean_mw > HEAVY_MEAN_MW {
        recommendations.push(format!(
            "Heavy molecules (mean {mean_mw:.0} g/mol): allow a longer cure so base notes can settle."
        ));
    }
    if wax.crystal_structure.is_amorphous()
        && kinetics.intercrystal_spacing_um < DENSE_NETWORK_SPACING_UM
    {
        recommendations.push(
            "Very dense crystalline network with slow diffusion; adding 10 to 20 % paraffin opens \
             intercrystalline channels."
                .to_string(),
        );
    }
    if mean_logp < POLAR_MEAN_LOGP {
        recommendations.push(format!(
            "Polar fragrance (mean logP {mean_logp:.1}) with low affinity for the wax; watch for \
             sweating during the first days of curing."
        ));
    }

    CureEstimate {
        crystallization_hours,
        polymorph_hours,
        diffusion_hours,
        total_hours,
        rate_limiting_phase,
        central_days,
        min_days,
        max_days,
        phases,
        parameters: CureParameters {
            pour_temperature: wax.melt_pool_temperature + POUR_OVERHEAT_C,
            ambient_temperature: AMBIENT_TEMPERATURE_C,
            undercooling,
            mean_molecular_weight: mean_mw,
            mean_logp,
            amorphous_fraction: phi,
            solid_diffusion: d_solid,
            avrami_n: kinetics.avrami_n,
            avrami_k: k,
        },
        recommendations,
    }
}

fn days(hours: f64) -> u32 {
    (hours / 24.0).round().max(0.0) as u32
}

fn justification(note: Option<&str>, law: &str) -> Vec<String> {
    note.into_iter()
        .chain(citations(law).iter().copied())
        .map(str::to_string)
        .collect()
}
