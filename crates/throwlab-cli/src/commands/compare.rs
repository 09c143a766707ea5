use super::write_report;
use crate::cli::CompareArgs;
use crate::error::Result;
use crate::input::{FragranceFile, load_molecules, load_registry};
use crate::utils::progress::CliProgressHandler;
use serde::Serialize;
use throwlab::engine::progress::ProgressReporter;
use throwlab::engine::tasks::comparison::WaxComparison;
use throwlab::workflows;
use tracing::info;

#[derive(Serialize)]
struct ComparisonReport<'a> {
    fragrance: &'a str,
    #[serde(flatten)]
    comparison: &'a WaxComparison,
}

pub fn run(args: CompareArgs, hide_progress: bool) -> Result<()> {
    let fragrance = FragranceFile::from_file(&args.fragrance)?;
    let registry = load_registry(args.waxes.as_deref())?;
    let molecules = load_molecules(&args.molecules)?;

    let progress_handler = CliProgressHandler::new(hide_progress);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Comparing '{}' across {} archetypes...", fragrance.name, registry.len());
    let comparison =
        workflows::compare::run(&fragrance.components(), &molecules, &registry, &reporter)?;

    write_report(
        &ComparisonReport {
            fragrance: &fragrance.name,
            comparison: &comparison,
        },
        args.output.as_deref(),
    )?;

    if let Some(path) = &args.output {
        eprintln!(
            "✓ Best cold throw: {}, best hot throw: {}, most balanced: {}. Report written to {}",
            comparison.best_cold.as_deref().unwrap_or("-"),
            comparison.best_hot.as_deref().unwrap_or("-"),
            comparison.best_balance.as_deref().unwrap_or("-"),
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::write_inputs;
    use serde_json::Value;
    use tempfile::tempdir;

    #[test]
    fn report_ranks_every_builtin_archetype() {
        let dir = tempdir().unwrap();
        let (fragrance, molecules) = write_inputs(dir.path());
        let output = dir.path().join("comparison.json");

        run(
            CompareArgs {
                fragrance,
                molecules,
                waxes: None,
                output: Some(output.clone()),
            },
            true,
        )
        .unwrap();

        let report: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let archetypes = load_registry(None).unwrap().len();
        assert_eq!(report["fragrance"], "Clean musk");
        assert_eq!(report["profiles"].as_array().unwrap().len(), archetypes);
        assert_eq!(report["ranking_hot"].as_array().unwrap().len(), archetypes);
        assert_eq!(report["best_hot"], report["ranking_hot"][0]);
    }
}
