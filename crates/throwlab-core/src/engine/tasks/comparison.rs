use super::profile::{self, ThrowProfile};
use crate::core::models::component::Component;
use crate::core::registry::molecule::MoleculeLookup;
use crate::core::registry::wax::WaxRegistry;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Stand-in ratio when a profile has no cold throw.
const MISSING_RATIO: f64 = 0.01;

/// Throw profiles of one fragrance across every wax archetype, with rankings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaxComparison {
    /// One profile per archetype, in registry key order.
    pub profiles: Vec<ThrowProfile>,
    pub best_cold: Option<String>,
    pub best_hot: Option<String>,
    pub best_balance: Option<String>,
    pub ranking_cold: Vec<String>,
    pub ranking_hot: Vec<String>,
    pub ranking_balance: Vec<String>,
}

impl WaxComparison {
    pub fn profile(&self, key: &str) -> Option<&ThrowProfile> {
        self.profiles.iter().find(|p| p.wax.key == key)
    }

    pub fn best_cold_profile(&self) -> Option<&ThrowProfile> {
        self.best_cold.as_deref().and_then(|k| self.profile(k))
    }

    pub fn best_hot_profile(&self) -> Option<&ThrowProfile> {
        self.best_hot.as_deref().and_then(|k| self.profile(k))
    }

    pub fn best_balance_profile(&self) -> Option<&ThrowProfile> {
        self.best_balance.as_deref().and_then(|k| self.profile(k))
    }
}

/// Distance of a profile from a 1:1 hot/cold ratio on a log scale.
pub fn balance_distance(profile: &ThrowProfile) -> f64 {
    let ratio = profile
        .ratio_hot_cold
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(MISSING_RATIO);
    ratio.ln().abs()
}

#[instrument(skip_all, name = "wax_comparison_task")]
pub fn run<L>(
    components: &[Component],
    molecules: &L,
    registry: &WaxRegistry,
    reporter: &ProgressReporter,
) -> Result<WaxComparison, EngineError>
where
    L: MoleculeLookup + ?Sized,
{
    if components.is_empty() {
        return Err(EngineError::EmptyComponents);
    }

    let archetypes: Vec<_> = registry.iter().map(|(_, wax)| wax).collect();
    info!(archetypes = archetypes.len(), "Comparing wax archetypes.");
    reporter.report(Progress::TaskStart {
        total_steps: archetypes.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = archetypes.iter();

    #[cfg(feature = "parallel")]
    let iterator = archetypes.par_iter();

    let results: Vec<Result<ThrowProfile, EngineError>> = iterator
        .map(|wax| {
            let result = profile::run(components, molecules, wax);
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let profiles = results.into_iter().collect::<Result<Vec<_>, _>>()?;

    let ranking_cold = rank_by(&profiles, |a, b| b.cold_throw_index.total_cmp(&a.cold_throw_index));
    let ranking_hot = rank_by(&profiles, |a, b| b.hot_throw_index.total_cmp(&a.hot_throw_index));
    let ranking_balance =
        rank_by(&profiles, |a, b| balance_distance(a).total_cmp(&balance_distance(b)));

    let comparison = WaxComparison {
        best_cold: ranking_cold.first().cloned(),
        best_hot: ranking_hot.first().cloned(),
        best_balance: ranking_balance.first().cloned(),
        ranking_cold,
        ranking_hot,
        ranking_balance,
        profiles,
    };
    debug!(
        best_cold = ?comparison.best_cold,
        best_hot = ?comparison.best_hot,
        best_balance = ?comparison.best_balance,
        "Archetype comparison finished."
    );
    Ok(comparison)
}

fn rank_by<F>(profiles: &[ThrowProfile], compare: F) -> Vec<String>
where
    F: Fn(&ThrowProfile, &ThrowProfile) -> Ordering,
{
    let mut ordered: Vec<&ThrowProfile> = profiles.iter().collect();
    ordered.sort_by(|a, b| compare(a, b));
    ordered.into_iter().map(|p| p.wax.key.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tasks::test_support::{molecule_db, registry};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

    fn formula() -> Vec<Component> {
        vec![
            Component::fixed("78-70-6", 25.0),
            Component::fixed("5989-27-5", 20.0),
            Component::fixed("1222-05-5", 15.0),
            Component::fixed("54464-57-2", 10.0),
        ]
    }

    #[test]
    fn compares_every_archetype_in_key_order() {
        let registry = registry();
        let db = molecule_db();
        let comparison = run(&formula(), &db, &registry, &ProgressReporter::new()).unwrap();
        let keys: Vec<&str> = comparison.profiles.iter().map(|p| p.wax.key.as_str()).collect();
        assert_eq!(keys, registry.keys().collect::<Vec<_>>());
        assert_eq!(comparison.ranking_cold.len(), registry.len());
        assert_eq!(comparison.ranking_hot.len(), registry.len());
        assert_eq!(comparison.ranking_balance.len(), registry.len());
    }

    #[test]
    fn best_archetypes_head_their_rankings() {
        let registry = registry();
        let db = molecule_db();
        let comparison = run(&formula(), &db, &registry, &ProgressReporter::new()).unwrap();

        let best_cold = comparison.best_cold_profile().unwrap();
        assert!(
            comparison
                .profiles
                .iter()
                .all(|p| p.cold_throw_index <= best_cold.cold_throw_index)
        );
        let best_hot = comparison.best_hot_profile().unwrap();
        assert!(
            comparison
                .profiles
                .iter()
                .all(|p| p.hot_throw_index <= best_hot.hot_throw_index)
        );
        let best_balance = comparison.best_balance_profile().unwrap();
        assert!(
            comparison
                .profiles
                .iter()
                .all(|p| balance_distance(p) >= balance_distance(best_balance))
        );
        assert_eq!(comparison.ranking_cold[0], comparison.best_cold.clone().unwrap());
    }

    #[test]
    fn paraffin_ranks_above_microcrystalline_on_hot_throw() {
        let registry = registry();
        let db = molecule_db();
        let comparison = run(&formula(), &db, &registry, &ProgressReporter::new()).unwrap();
        let position = |key: &str| comparison.ranking_hot.iter().position(|k| k == key).unwrap();
        assert!(position("paraffin") < position("microcrystalline"));
    }

    #[test]
    fn reports_one_increment_per_archetype() {
        let registry = registry();
        let db = molecule_db();
        let increments = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&increments);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            if let Progress::TaskIncrement = event {
                counter.fetch_add(1, AtomicOrdering::SeqCst);
            }
        }));
        run(&formula(), &db, &registry, &reporter).unwrap();
        assert_eq!(increments.load(AtomicOrdering::SeqCst), registry.len() as u64);
    }

    #[test]
    fn empty_formula_is_rejected() {
        let registry = registry();
        let db = molecule_db();
        let result = run(&[], &db, &registry, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::EmptyComponents)));
    }

    #[test]
    fn missing_cold_throw_uses_stand_in_ratio() {
        let registry = registry();
        let db = molecule_db();
        let mut profile =
            profile::run(&formula(), &db, registry.get("paraffin").unwrap()).unwrap();
        profile.ratio_hot_cold = None;
        assert!((balance_distance(&profile) - MISSING_RATIO.ln().abs()).abs() < 1e-12);
        profile.ratio_hot_cold = Some(1.0);
        assert_eq!(balance_distance(&profile), 0.0);
    }
}
