use super::defaults::DefaultsConfig;
use super::file::{FileBlendPart, FileConfig};
use super::models::AppConfig;
use crate::cli::DiagnoseArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use std::path::PathBuf;
use throwlab::engine::config as core_config;

pub fn build_config(args: &DiagnoseArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let file_config = apply_set_values(file_config, &args.set_values)?;

    let wax = resolve_wax_selection(args, &file_config, &defaults)?;

    let flash_point = args.flash_point.or(file_config.flash_point);
    if let Some(fp) = flash_point {
        if !fp.is_finite() {
            return Err(CliError::Config(format!("Invalid flash point: {}", fp)));
        }
    }

    let compare = if args.no_compare {
        false
    } else {
        file_config.compare.unwrap_or(defaults.compare)
    };

    let molecules_path = args
        .molecules
        .clone()
        .or(file_config.molecules)
        .ok_or_else(|| {
            CliError::Config(
                "A molecule database is required: pass --molecules or set `molecules` in the config file.".to_string(),
            )
        })?;

    let core_config = core_config::AnalysisConfigBuilder::new()
        .wax(wax)
        .fragrance_flash_point(flash_point)
        .compare_archetypes(compare)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        fragrance_path: args.fragrance.clone(),
        molecules_path,
        waxes_path: args.waxes.clone().or(file_config.waxes),
        output_path: args.output.clone(),
        core_config,
    })
}

fn resolve_wax_selection(
    args: &DiagnoseArgs,
    file_config: &FileConfig,
    defaults: &DefaultsConfig,
) -> Result<core_config::WaxSelection> {
    if let Some(key) = &args.wax.wax {
        return Ok(core_config::WaxSelection::Archetype(key.clone()));
    }
    if let Some(spec) = &args.wax.blend {
        let parts = parser::parse_blend(spec).map_err(|e| CliError::Argument(e.to_string()))?;
        return Ok(core_config::WaxSelection::Blend(parts));
    }

    match (&file_config.wax, &file_config.blend) {
        (Some(_), Some(_)) => Err(CliError::Config(
            "`wax` and `blend` cannot both be set; choose one.".to_string(),
        )),
        (Some(key), None) => Ok(core_config::WaxSelection::Archetype(key.clone())),
        (None, Some(parts)) => Ok(core_config::WaxSelection::Blend(
            parts.iter().cloned().map(Into::into).collect(),
        )),
        (None, None) => Ok(core_config::WaxSelection::Archetype(defaults.wax.clone())),
    }
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for assignment in set_values {
        let (key, value) =
            parser::parse_key_value(assignment).map_err(|e| CliError::Config(e.to_string()))?;

        match key {
            "wax" => {
                config.wax = Some(value.to_string());
                config.blend = None;
            }
            "blend" => {
                let parts = parser::parse_blend(value)
                    .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))?;
                config.blend = Some(
                    parts
                        .into_iter()
                        .map(|p| FileBlendPart {
                            wax: p.key,
                            percentage: p.fraction,
                        })
                        .collect(),
                );
                config.wax = None;
            }
            "flash-point" => {
                config.flash_point = Some(value.parse().map_err(|_| {
                    CliError::Config(format!("Invalid float value for {}: {}", key, value))
                })?);
            }
            "compare" => {
                config.compare = Some(value.parse().map_err(|_| {
                    CliError::Config(format!("Invalid boolean value for {}: {}", key, value))
                })?);
            }
            "molecules" => config.molecules = Some(PathBuf::from(value)),
            "waxes" => config.waxes = Some(PathBuf::from(value)),
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::WaxChoice;
    use throwlab::engine::config::{BlendPart, WaxSelection};
    use std::fs;
    use tempfile::tempdir;

    fn base_args() -> DiagnoseArgs {
        DiagnoseArgs {
            fragrance: PathBuf::from("fig.toml"),
            molecules: Some(PathBuf::from("molecules.csv")),
            waxes: None,
            config: None,
            output: None,
            wax: WaxChoice::default(),
            flash_point: None,
            no_compare: false,
            set_values: vec![],
        }
    }

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let app = build_config(&base_args()).unwrap();
        assert_eq!(
            app.core_config.wax,
            WaxSelection::Archetype("paraffin".to_string())
        );
        assert!(app.core_config.compare_archetypes);
        assert_eq!(app.core_config.fragrance_flash_point, None);
        assert_eq!(app.molecules_path, PathBuf::from("molecules.csv"));
        assert!(app.waxes_path.is_none());
    }

    #[test]
    fn file_values_fill_in_missing_arguments() {
        let (dir, path) = write_config(
            "wax = \"coconut\"\nflash-point = 58\ncompare = false\nmolecules = \"db.toml\"\n",
        );
        let mut args = base_args();
        args.config = Some(path);
        args.molecules = None;

        let app = build_config(&args).unwrap();
        assert_eq!(
            app.core_config.wax,
            WaxSelection::Archetype("coconut".to_string())
        );
        assert_eq!(app.core_config.fragrance_flash_point, Some(58.0));
        assert!(!app.core_config.compare_archetypes);
        assert_eq!(app.molecules_path, dir.path().join("db.toml"));
    }

    #[test]
    fn cli_arguments_override_set_values_which_override_the_file() {
        let (_dir, path) = write_config("wax = \"coconut\"\nflash-point = 58\n");
        let mut args = base_args();
        args.config = Some(path);
        args.set_values = vec!["flash-point=61".to_string(), "wax=soy".to_string()];

        let app = build_config(&args).unwrap();
        assert_eq!(app.core_config.wax, WaxSelection::Archetype("soy".to_string()));
        assert_eq!(app.core_config.fragrance_flash_point, Some(61.0));

        args.flash_point = Some(64.0);
        args.wax.blend = Some("paraffin=80,microcrystalline=20".to_string());
        let app = build_config(&args).unwrap();
        assert_eq!(app.core_config.fragrance_flash_point, Some(64.0));
        assert_eq!(
            app.core_config.wax,
            WaxSelection::Blend(vec![
                BlendPart::new("paraffin", 80.0),
                BlendPart::new("microcrystalline", 20.0),
            ])
        );
    }

    #[test]
    fn set_blend_replaces_file_wax() {
        let (_dir, path) = write_config("wax = \"coconut\"\n");
        let mut args = base_args();
        args.config = Some(path);
        args.set_values = vec!["blend=soy=70,coconut=30".to_string()];

        let app = build_config(&args).unwrap();
        assert_eq!(
            app.core_config.wax,
            WaxSelection::Blend(vec![BlendPart::new("soy", 70.0), BlendPart::new("coconut", 30.0)])
        );
    }

    #[test]
    fn file_blend_is_used_when_no_wax_is_given() {
        let (_dir, path) = write_config(
            "blend = [{ wax = \"paraffin\", percentage = 60 }, { wax = \"soy\", percentage = 40 }]\n",
        );
        let mut args = base_args();
        args.config = Some(path);

        let app = build_config(&args).unwrap();
        assert!(matches!(app.core_config.wax, WaxSelection::Blend(ref parts) if parts.len() == 2));
    }

    #[test]
    fn no_compare_flag_wins_over_file() {
        let (_dir, path) = write_config("compare = true\n");
        let mut args = base_args();
        args.config = Some(path);
        args.no_compare = true;

        let app = build_config(&args).unwrap();
        assert!(!app.core_config.compare_archetypes);
    }

    #[test]
    fn conflicting_or_invalid_settings_are_rejected() {
        let (_dir, path) = write_config(
            "wax = \"soy\"\nblend = [{ wax = \"paraffin\", percentage = 100 }]\n",
        );
        let mut args = base_args();
        args.config = Some(path);
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_args();
        args.set_values = vec!["wick=cotton".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_args();
        args.set_values = vec!["flash-point=hot".to_string()];
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));

        let mut args = base_args();
        args.wax.blend = Some("paraffin".to_string());
        assert!(matches!(build_config(&args), Err(CliError::Argument(_))));
    }

    #[test]
    fn missing_molecule_database_is_reported() {
        let mut args = base_args();
        args.molecules = None;
        assert!(matches!(build_config(&args), Err(CliError::Config(msg)) if msg.contains("--molecules")));
    }
}
