use crate::core::models::component::Component;
use crate::core::registry::molecule::MoleculeLookup;
use crate::core::registry::wax::WaxRegistry;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks::comparison::{self, WaxComparison};
use tracing::{info, instrument};

/// Profiles a fragrance in every registered archetype and ranks them.
#[instrument(skip_all, name = "comparison_workflow")]
pub fn run<L>(
    components: &[Component],
    molecules: &L,
    registry: &WaxRegistry,
    reporter: &ProgressReporter,
) -> Result<WaxComparison, EngineError>
where
    L: MoleculeLookup + ?Sized,
{
    let result = reporter.phase("Archetype comparison", || {
        comparison::run(components, molecules, registry, reporter)
    })?;
    info!(
        archetypes = result.profiles.len(),
        best_cold = ?result.best_cold,
        best_hot = ?result.best_hot,
        best_balance = ?result.best_balance,
        "Comparison complete."
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::molecule::{Molecule, Volatility};
    use crate::engine::progress::Progress;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[test]
    fn comparison_is_bracketed_by_a_single_phase() {
        let registry = WaxRegistry::builtin().unwrap();
        let molecule = Molecule::new("78-70-6", "Linalool")
            .with_family("terpene-alcohol")
            .with_molecular_weight(154.25)
            .with_flash_point(76.0)
            .with_volatility(Volatility::High);
        let molecules = HashMap::from([(molecule.id.clone(), molecule)]);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            let label = match event {
                Progress::PhaseStart { .. } => "start",
                Progress::PhaseFinish => "finish",
                _ => return,
            };
            sink.lock().unwrap().push(label);
        }));

        let result = run(
            &[Component::fixed("78-70-6", 10.0)],
            &molecules,
            &registry,
            &reporter,
        )
        .unwrap();
        assert_eq!(result.profiles.len(), registry.len());
        assert_eq!(*events.lock().unwrap(), vec!["start", "finish"]);
    }
}
