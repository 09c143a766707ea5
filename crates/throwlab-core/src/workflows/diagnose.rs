use crate::core::models::component::{Component, resolve};
use crate::core::models::wax::WaxThermoProfile;
use crate::core::registry::molecule::MoleculeLookup;
use crate::core::registry::wax::WaxRegistry;
use crate::engine::config::{AnalysisConfig, WaxSelection};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks::advisor::{self, OptimizationPlan};
use crate::engine::tasks::charge::{self, ChargeMax};
use crate::engine::tasks::comparison::{self, WaxComparison};
use crate::engine::tasks::curing::{self, CureEstimate};
use crate::engine::tasks::profile::{self, ThrowProfile};
use crate::engine::tasks::scoring::{self, ScoreReport};
use crate::engine::tasks::blend;
use serde::Serialize;
use tracing::{info, instrument};

/// Complete throw diagnosis of one fragrance in one wax.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub profile: ThrowProfile,
    pub charge: ChargeMax,
    pub curing: CureEstimate,
    pub comparison: Option<WaxComparison>,
    pub scores: ScoreReport,
    pub optimization: OptimizationPlan,
}

/// Resolves a wax selection to a single thermophysical profile.
pub fn resolve_wax(
    selection: &WaxSelection,
    registry: &WaxRegistry,
) -> Result<WaxThermoProfile, EngineError> {
    match selection {
        WaxSelection::Archetype(key) => registry
            .get(key)
            .cloned()
            .ok_or_else(|| EngineError::UnknownWax { key: key.clone() }),
        WaxSelection::Blend(parts) => blend::run(parts, registry),
    }
}

#[instrument(skip_all, name = "diagnosis_workflow")]
pub fn run<L>(
    components: &[Component],
    molecules: &L,
    registry: &WaxRegistry,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<Diagnosis, EngineError>
where
    L: MoleculeLookup + ?Sized,
{
    if components.is_empty() {
        return Err(EngineError::EmptyComponents);
    }

    // === Phase 1: Wax resolution ===
    let wax = reporter.phase("Wax resolution", || resolve_wax(&config.wax, registry))?;
    info!(wax = %wax.key, blend = wax.is_blend(), "Wax resolved.");

    // === Phase 2: Throw profile ===
    let profile = reporter.phase("Throw profile", || profile::run(components, molecules, &wax))?;
    info!(
        identified = profile.total_components_identified,
        unidentified = profile.total_components_unidentified,
        balance = ?profile.balance,
        "Throw profile built."
    );

    // === Phase 3: Maximum load and cure time ===
    let resolution = resolve(components, molecules);
    let charge = reporter.phase("Maximum load", || {
        charge::run(&resolution.resolved, &wax, config.fragrance_flash_point)
    });
    let curing = reporter.phase("Cure time", || curing::run(&resolution.resolved, &wax));
    info!(
        charge_max = charge.charge_max_pct,
        cure_days = curing.central_days,
        "Load and cure estimated."
    );

    // === Phase 4: Archetype comparison (optional) ===
    let comparison = if config.compare_archetypes {
        let comparison = reporter.phase("Archetype comparison", || {
            comparison::run(components, molecules, registry, reporter)
        })?;
        Some(comparison)
    } else {
        info!("Archetype comparison disabled.");
        None
    };

    // === Phase 5: Scoring and optimization ===
    let scores = reporter.phase("Scoring", || scoring::run(&profile));
    let optimization = reporter.phase("Optimization", || {
        advisor::run(&profile, &scores, comparison.as_ref())
    });

    info!(
        score_cold = scores.score_cold,
        score_hot = scores.score_hot,
        focus = ?optimization.focus,
        "Diagnosis complete."
    );
    Ok(Diagnosis {
        profile,
        charge,
        curing,
        comparison,
        scores,
        optimization,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::molecule::{Molecule, Volatility};
    use crate::core::registry::molecule::MoleculeDatabase;
    use crate::engine::config::{AnalysisConfigBuilder, BlendPart};
    use crate::engine::progress::Progress;
    use crate::engine::tasks::charge::FlashPointSource;
    use crate::engine::tasks::profile::{Balance, Behavior};
    use std::sync::{Arc, Mutex};

    fn registry() -> WaxRegistry {
        WaxRegistry::builtin().unwrap()
    }

    fn molecules() -> MoleculeDatabase {
        vec![
            Molecule::new("5989-27-5", "Limonene")
                .with_family("terpene")
                .with_molecular_weight(136.0)
                .with_flash_point(48.0)
                .with_logp(4.57)
                .with_volatility(Volatility::VeryHigh),
            Molecule::new("78-70-6", "Linalool")
                .with_family("terpene-alcohol")
                .with_molecular_weight(154.25)
                .with_flash_point(90.0)
                .with_logp(2.97)
                .with_volatility(Volatility::High),
            Molecule::new("1222-05-5", "Galaxolide")
                .with_family("musk-polycyclic")
                .with_molecular_weight(258.4)
                .with_flash_point(135.0)
                .with_logp(5.9)
                .with_odor_threshold(0.9)
                .with_volatility(Volatility::VeryLow),
        ]
        .into_iter()
        .collect()
    }

    fn formula() -> Vec<Component> {
        vec![
            Component::new("78-70-6", 20.0, 30.0),
            Component::new("1222-05-5", 10.0, 20.0),
        ]
    }

    #[test]
    fn single_volatile_molecule_in_paraffin_is_not_inert() {
        let config = AnalysisConfigBuilder::new()
            .archetype("paraffin")
            .build()
            .unwrap();
        let diagnosis = run(
            &[Component::fixed("5989-27-5", 100.0)],
            &molecules(),
            &registry(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_ne!(diagnosis.profile.molecules[0].behavior, Behavior::Inert);

        let micro = diagnosis
            .comparison
            .as_ref()
            .and_then(|c| c.profile("microcrystalline"))
            .unwrap();
        assert!(diagnosis.scores.score_cold > scoring::run(micro).score_cold);
    }

    #[test]
    fn unresolvable_formula_yields_weak_profile_instead_of_error() {
        let config = AnalysisConfigBuilder::new()
            .archetype("soy")
            .compare_archetypes(false)
            .build()
            .unwrap();
        let diagnosis = run(
            &[Component::fixed("0000-00-0", 30.0)],
            &molecules(),
            &registry(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(diagnosis.profile.total_components_identified, 0);
        assert_eq!(diagnosis.profile.total_components_unidentified, 1);
        assert_eq!(diagnosis.profile.balance, Balance::WeakOverall);
        assert!(diagnosis.comparison.is_none());
        assert_eq!(diagnosis.charge.flash_point_source, FlashPointSource::Unknown);
    }

    #[test]
    fn measured_fragrance_flash_point_overrides_components() {
        let config = AnalysisConfigBuilder::new()
            .archetype("paraffin")
            .fragrance_flash_point(Some(50.0))
            .compare_archetypes(false)
            .build()
            .unwrap();
        let diagnosis = run(
            &[Component::fixed("78-70-6", 10.0)],
            &molecules(),
            &registry(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(diagnosis.charge.flash_point_used, Some(50.0));
        assert_eq!(diagnosis.charge.flash_point_source, FlashPointSource::Fragrance);
        assert_eq!(diagnosis.charge.safety_factor, 0.5);
    }

    #[test]
    fn blend_selection_is_combined_before_analysis() {
        let config = AnalysisConfigBuilder::new()
            .blend(vec![
                BlendPart::new("paraffin", 80.0),
                BlendPart::new("microcrystalline", 20.0),
            ])
            .compare_archetypes(false)
            .build()
            .unwrap();
        let diagnosis = run(
            &formula(),
            &molecules(),
            &registry(),
            &config,
            &ProgressReporter::new(),
        )
        .unwrap();
        let wax = &diagnosis.profile.wax;
        assert!(wax.is_blend());
        assert!((wax.channel_factor - (-0.8f64).exp()).abs() < 1e-3);
    }

    #[test]
    fn unknown_archetype_is_reported() {
        let config = AnalysisConfigBuilder::new()
            .archetype("beeswax")
            .build()
            .unwrap();
        let result = run(
            &formula(),
            &molecules(),
            &registry(),
            &config,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::UnknownWax { key }) if key == "beeswax"));
    }

    #[test]
    fn empty_formula_is_rejected() {
        let config = AnalysisConfigBuilder::new()
            .archetype("paraffin")
            .build()
            .unwrap();
        let result = run(
            &[],
            &molecules(),
            &registry(),
            &config,
            &ProgressReporter::new(),
        );
        assert!(matches!(result, Err(EngineError::EmptyComponents)));
    }

    #[test]
    fn phases_are_reported_in_order() {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::PhaseStart { name } = event {
                sink.lock().unwrap().push(name);
            }
        }));
        let config = AnalysisConfigBuilder::new()
            .archetype("coconut")
            .build()
            .unwrap();
        run(&formula(), &molecules(), &registry(), &config, &reporter).unwrap();
        assert_eq!(
            *phases.lock().unwrap(),
            vec![
                "Wax resolution",
                "Throw profile",
                "Maximum load",
                "Cure time",
                "Archetype comparison",
                "Scoring",
                "Optimization",
            ]
        );
    }
}
