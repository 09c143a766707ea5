use crate::core::models::wax::{
    BlendComposition, BlendShare, CrystalStructure, CureKinetics, HansenParameters,
    WaxCategory, WaxThermoProfile,
};
use crate::core::registry::wax::WaxRegistry;
use crate::engine::config::BlendPart;
use crate::engine::error::EngineError;
use itertools::Itertools;
use tracing::{debug, instrument};

struct NormalizedPart<'a> {
    wax: &'a WaxThermoProfile,
    fraction: f64,
}

/// Derives the thermophysical profile of a wax blend from its archetypes.
///
/// Fractions may be given in any unit and are renormalized. Temperatures, solubility
/// parameters and surface migration mix linearly; viscosity mixes log-linearly; the
/// crystalline channels of the dominant archetype are obstructed exponentially by every
/// other archetype in proportion to its fraction.
#[instrument(skip_all, name = "wax_blend_task")]
pub fn run(parts: &[BlendPart], registry: &WaxRegistry) -> Result<WaxThermoProfile, EngineError> {
    let parts = merge_duplicates(parts);
    if parts.is_empty() {
        return Err(EngineError::EmptyBlend);
    }

    for part in &parts {
        if !part.fraction.is_finite() || part.fraction < 0.0 {
            return Err(EngineError::InvalidBlendFraction {
                key: part.key.clone(),
                fraction: part.fraction,
            });
        }
    }
    let total: f64 = parts.iter().map(|p| p.fraction).sum();
    if total <= 0.0 {
        return Err(EngineError::InvalidBlendFraction {
            key: parts.iter().map(|p| p.key.as_str()).join("+"),
            fraction: total,
        });
    }

    let normalized = parts
        .iter()
        .map(|p| {
            registry
                .get(&p.key)
                .map(|wax| NormalizedPart {
                    wax,
                    fraction: p.fraction / total,
                })
                .ok_or_else(|| EngineError::UnknownWax { key: p.key.clone() })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let [single] = normalized.as_slice() {
        return Ok(single.wax.clone());
    }

    let dominant_index = dominant(&normalized);
    let dominant = normalized[dominant_index].wax;

    let additive = |f: &dyn Fn(&WaxThermoProfile) -> f64| -> f64 {
        normalized.iter().map(|p| f(p.wax) * p.fraction).sum()
    };

    let viscosity = normalized
        .iter()
        .map(|p| p.fraction * p.wax.viscosity.ln())
        .sum::<f64>()
        .exp();

    let channel_factor = normalized
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != dominant_index)
        .fold(dominant.channel_factor, |cf, (_, p)| {
            cf * (-p.wax.kinetics.obstruction_alpha * p.fraction).exp()
        });

    let hansen = HansenParameters {
        dispersion: additive(&|w| w.hansen_or_default().dispersion),
        polar: additive(&|w| w.hansen_or_default().polar),
        hydrogen_bonding: additive(&|w| w.hansen_or_default().hydrogen_bonding),
    };

    let slowest_polymorph = normalized
        .iter()
        .max_by(|a, b| {
            a.wax
                .kinetics
                .polymorph_hours
                .total_cmp(&b.wax.kinetics.polymorph_hours)
        })
        .map(|p| p.wax)
        .unwrap_or(dominant);

    let kinetics = CureKinetics {
        obstruction_alpha: additive(&|w| w.kinetics.obstruction_alpha),
        avrami_n: dominant.kinetics.avrami_n,
        avrami_k_base: dominant.kinetics.avrami_k_base,
        polymorph_hours: slowest_polymorph.kinetics.polymorph_hours,
        intercrystal_spacing_um: dominant.kinetics.intercrystal_spacing_um,
        amorphous_fraction: additive(&|w| w.kinetics.amorphous_fraction),
        crystallization_note: dominant.kinetics.crystallization_note.clone(),
        polymorph_note: slowest_polymorph.kinetics.polymorph_note.clone(),
    };

    let interactions = normalized
        .iter()
        .tuple_combinations()
        .flat_map(|(a, b)| {
            registry
                .interactions()
                .iter()
                .filter(move |note| note.involves(&a.wax.key, &b.wax.key))
                .filter(move |note| {
                    let (host, guest) = if note.waxes[0] == a.wax.key { (a, b) } else { (b, a) };
                    host.fraction > note.min_fraction && guest.fraction > 0.0
                })
        })
        .cloned()
        .collect::<Vec<_>>();

    let shares: Vec<BlendShare> = normalized
        .iter()
        .map(|p| BlendShare {
            key: p.wax.key.clone(),
            fraction: p.fraction,
        })
        .collect();

    let label = normalized
        .iter()
        .map(|p| format!("{} {:.0} %", p.wax.name, p.fraction * 100.0))
        .join(" + ");

    debug!(
        channel_factor,
        viscosity,
        interactions = interactions.len(),
        "Blend profile derived."
    );

    Ok(WaxThermoProfile {
        key: shares
            .iter()
            .map(|s| format!("{}:{:.0}", s.key, s.fraction * 100.0))
            .join("+"),
        name: format!("Blend: {label}"),
        melt_pool_temperature: additive(&|w| w.melt_pool_temperature),
        cold_temperature: dominant.cold_temperature,
        viscosity,
        crystal_structure: combined_structure(&normalized, dominant.crystal_structure),
        channel_factor,
        surface_migration: additive(&|w| w.surface_migration),
        hildebrand: additive(&|w| w.hildebrand),
        hansen: Some(hansen),
        category: combined_category(&normalized),
        description: format!(
            "Derived blend of {label}. Channels of {} obstructed by the other components.",
            dominant.name
        ),
        kinetics,
        blend: Some(BlendComposition {
            parts: shares,
            interactions,
        }),
    })
}

fn merge_duplicates(parts: &[BlendPart]) -> Vec<BlendPart> {
    let mut merged: Vec<BlendPart> = Vec::with_capacity(parts.len());
    for part in parts {
        match merged.iter_mut().find(|p| p.key == part.key) {
            Some(existing) => existing.fraction += part.fraction,
            None => merged.push(part.clone()),
        }
    }
    merged
}

// Highest fraction wins; the first listed wins a tie.
fn dominant(parts: &[NormalizedPart<'_>]) -> usize {
    let mut best = 0;
    for (i, part) in parts.iter().enumerate().skip(1) {
        if part.fraction > parts[best].fraction {
            best = i;
        }
    }
    best
}

fn combined_structure(parts: &[NormalizedPart<'_>], dominant: CrystalStructure) -> CrystalStructure {
    let has = |s: CrystalStructure| parts.iter().any(|p| p.wax.crystal_structure == s);
    let macro_ = has(CrystalStructure::Macro);
    let polymorphic = has(CrystalStructure::Polymorphic);
    let amorphous = has(CrystalStructure::Amorphous);

    if polymorphic && amorphous {
        CrystalStructure::AmorphousPolymorphic
    } else if amorphous && macro_ {
        CrystalStructure::MacroAmorphous
    } else if polymorphic && macro_ {
        CrystalStructure::MacroPolymorphic
    } else {
        dominant
    }
}

fn combined_category(parts: &[NormalizedPart<'_>]) -> WaxCategory {
    let mineral = parts.iter().any(|p| p.wax.category != WaxCategory::Vegetable);
    let vegetable = parts.iter().any(|p| p.wax.category != WaxCategory::Mineral);
    match (mineral, vegetable) {
        (true, false) => WaxCategory::Mineral,
        (false, true) => WaxCategory::Vegetable,
        _ => WaxCategory::Mixed,
    }
}
