use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use throwlab::core::models::component::Component;
use throwlab::core::registry::molecule::MoleculeDatabase;
use throwlab::core::registry::wax::WaxRegistry;
use tracing::{debug, info};

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileComponent {
    molecule_id: String,
    percentage_min: f64,
    percentage_max: f64,
}

/// A fragrance formula read from a TOML file.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FragranceFile {
    pub name: String,
    pub flash_point: Option<f64>,
    #[serde(default)]
    components: Vec<FileComponent>,
}

impl FragranceFile {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading fragrance from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let fragrance: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        if let Some(bad) = fragrance.components.iter().find(|c| {
            c.percentage_min < 0.0 || c.percentage_max < c.percentage_min
        }) {
            return Err(CliError::FileParsing {
                path: path.to_path_buf(),
                source: anyhow::anyhow!(
                    "component '{}' has an invalid range {}..{}",
                    bad.molecule_id,
                    bad.percentage_min,
                    bad.percentage_max
                ),
            });
        }

        info!(
            name = %fragrance.name,
            components = fragrance.components.len(),
            "Fragrance loaded."
        );
        Ok(fragrance)
    }

    pub fn components(&self) -> Vec<Component> {
        self.components
            .iter()
            .map(|c| Component::new(c.molecule_id.clone(), c.percentage_min, c.percentage_max))
            .collect()
    }
}

pub fn load_registry(path: Option<&Path>) -> Result<WaxRegistry> {
    let registry = match path {
        Some(path) => WaxRegistry::load(path)?,
        None => WaxRegistry::builtin()?,
    };
    debug!(archetypes = registry.len(), "Wax table ready.");
    Ok(registry)
}

pub fn load_molecules(path: &Path) -> Result<MoleculeDatabase> {
    let db = MoleculeDatabase::load(path)?;
    info!(molecules = db.len(), path = ?path, "Molecule database loaded.");
    Ok(db)
}
