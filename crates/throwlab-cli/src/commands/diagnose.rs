use super::write_report;
use crate::cli::DiagnoseArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::input::{FragranceFile, load_molecules, load_registry};
use crate::utils::progress::CliProgressHandler;
use serde::Serialize;
use throwlab::engine::progress::ProgressReporter;
use throwlab::workflows::{self, diagnose::Diagnosis};
use tracing::{info, warn};

#[derive(Serialize)]
struct DiagnosisReport<'a> {
    fragrance: &'a str,
    #[serde(flatten)]
    diagnosis: &'a Diagnosis,
}

pub fn run(args: DiagnoseArgs, hide_progress: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args)?;

    let fragrance = FragranceFile::from_file(&app_config.fragrance_path)?;
    let components = fragrance.components();
    if components.is_empty() {
        warn!(fragrance = %fragrance.name, "Fragrance lists no components.");
    }

    let registry = load_registry(app_config.waxes_path.as_deref())?;
    let molecules = load_molecules(&app_config.molecules_path)?;

    // A flash point given on the command line or in the config wins over the fragrance file.
    let mut analysis = app_config.core_config;
    if analysis.fragrance_flash_point.is_none() {
        analysis.fragrance_flash_point = fragrance.flash_point;
    }

    let progress_handler = CliProgressHandler::new(hide_progress);
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the diagnosis workflow...");
    let diagnosis = workflows::diagnose::run(&components, &molecules, &registry, &analysis, &reporter)?;

    info!(
        wax = %diagnosis.profile.wax.key,
        score_cold = diagnosis.scores.score_cold,
        score_hot = diagnosis.scores.score_hot,
        "Diagnosis finished."
    );

    write_report(
        &DiagnosisReport {
            fragrance: &fragrance.name,
            diagnosis: &diagnosis,
        },
        app_config.output_path.as_deref(),
    )?;

    if let Some(path) = &app_config.output_path {
        eprintln!(
            "✓ '{}' in {}: cold {}/10, hot {}/10, max load {:.1}%, cure ~{} days. Report written to {}",
            fragrance.name,
            diagnosis.profile.wax.name,
            diagnosis.scores.score_cold,
            diagnosis.scores.score_hot,
            diagnosis.charge.charge_max_pct,
            diagnosis.curing.central_days,
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::WaxChoice;
    use crate::commands::test_support::write_inputs;
    use crate::error::CliError;
    use serde_json::Value;
    use std::path::PathBuf;
    use tempfile::tempdir;
    use throwlab::engine::error::EngineError;

    fn args(fragrance: PathBuf, molecules: PathBuf, output: PathBuf) -> DiagnoseArgs {
        DiagnoseArgs {
            fragrance,
            molecules: Some(molecules),
            waxes: None,
            config: None,
            output: Some(output),
            wax: WaxChoice::default(),
            flash_point: None,
            no_compare: false,
            set_values: vec![],
        }
    }

    #[test]
    fn writes_complete_report_for_a_blend() {
        let dir = tempdir().unwrap();
        let (fragrance, molecules) = write_inputs(dir.path());
        let output = dir.path().join("report.json");
        let mut args = args(fragrance, molecules, output.clone());
        args.wax.blend = Some("paraffin=80,microcrystalline=20".to_string());
        args.flash_point = Some(62.0);

        run(args, true).unwrap();

        let report: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(report["fragrance"], "Clean musk");
        for key in ["profile", "charge", "curing", "comparison", "scores", "optimization"] {
            assert!(report.get(key).is_some(), "missing section {key}");
        }
        assert_eq!(report["charge"]["flash_point_used"], 62.0);
        assert!(report["profile"]["wax"]["blend"].is_object());
        assert!(report["comparison"]["profiles"].is_array());
    }

    #[test]
    fn no_compare_leaves_comparison_empty() {
        let dir = tempdir().unwrap();
        let (fragrance, molecules) = write_inputs(dir.path());
        let output = dir.path().join("report.json");
        let mut args = args(fragrance, molecules, output.clone());
        args.wax.wax = Some("soy".to_string());
        args.no_compare = true;

        run(args, true).unwrap();

        let report: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert!(report["comparison"].is_null());
        assert_eq!(report["profile"]["wax"]["key"], "soy");
    }

    #[test]
    fn unknown_wax_surfaces_as_core_error() {
        let dir = tempdir().unwrap();
        let (fragrance, molecules) = write_inputs(dir.path());
        let mut args = args(fragrance, molecules, dir.path().join("report.json"));
        args.wax.wax = Some("beeswax".to_string());

        let result = run(args, true);
        assert!(matches!(
            result,
            Err(CliError::Core(EngineError::UnknownWax { ref key })) if key == "beeswax"
        ));
    }
}
