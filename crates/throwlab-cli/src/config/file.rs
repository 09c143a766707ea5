use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use throwlab::engine::config::BlendPart;
use tracing::debug;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileBlendPart {
    pub wax: String,
    pub percentage: f64,
}

impl From<FileBlendPart> for BlendPart {
    fn from(p: FileBlendPart) -> Self {
        BlendPart::new(p.wax, p.percentage)
    }
}

/// Analysis configuration as written on disk. Every field is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub wax: Option<String>,
    pub blend: Option<Vec<FileBlendPart>>,
    pub flash_point: Option<f64>,
    pub molecules: Option<PathBuf>,
    pub waxes: Option<PathBuf>,
    pub compare: Option<bool>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.resolve_relative_paths(path.parent().unwrap_or(Path::new("")));
        Ok(config)
    }

    // Paths inside a config file are relative to the file itself.
    fn resolve_relative_paths(&mut self, base: &Path) {
        for path in [&mut self.molecules, &mut self.waxes].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_full_configuration_with_kebab_case_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        fs::write(
            &path,
            r#"
            wax = "soy"
            flash-point = 62.5
            molecules = "db/molecules.csv"
            compare = false
            blend = [
                { wax = "paraffin", percentage = 80 },
                { wax = "microcrystalline", percentage = 20 },
            ]
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        assert_eq!(config.wax.as_deref(), Some("soy"));
        assert_eq!(config.flash_point, Some(62.5));
        assert_eq!(config.compare, Some(false));
        assert_eq!(config.molecules, Some(dir.path().join("db/molecules.csv")));
        assert!(config.waxes.is_none());

        let blend: Vec<BlendPart> = config.blend.unwrap().into_iter().map(Into::into).collect();
        assert_eq!(blend[0], BlendPart::new("paraffin", 80.0));
        assert_eq!(blend[1], BlendPart::new("microcrystalline", 20.0));
    }

    #[test]
    fn absolute_paths_are_kept_as_written() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        fs::write(&path, "waxes = \"/opt/throwlab/waxes.toml\"\n").unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        if cfg!(unix) {
            assert_eq!(config.waxes, Some(PathBuf::from("/opt/throwlab/waxes.toml")));
        }
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("analysis.toml");
        fs::write(&path, "wax = \"soy\"\nwick = \"cotton\"\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
