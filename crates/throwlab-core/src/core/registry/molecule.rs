use crate::core::models::molecule::{Molecule, Volatility};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Read access to molecule reference data, keyed by chemical identifier.
pub trait MoleculeLookup: Send + Sync {
    fn molecule(&self, id: &str) -> Option<&Molecule>;
}

impl MoleculeLookup for HashMap<String, Molecule> {
    fn molecule(&self, id: &str) -> Option<&Molecule> {
        self.get(id)
    }
}

#[derive(Debug, Deserialize)]
struct MoleculeRecord {
    #[serde(default)]
    id: String,
    name: String,
    #[serde(default)]
    family: String,
    molecular_weight: Option<f64>,
    flash_point: Option<f64>,
    boiling_point: Option<f64>,
    logp: Option<f64>,
    odor_threshold: Option<f64>,
    volatility: Option<String>,
}

impl MoleculeRecord {
    fn into_molecule(self) -> Result<Molecule, MoleculeDbError> {
        let volatility = match self.volatility.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => Some(label.parse::<Volatility>().map_err(|_| {
                MoleculeDbError::UnknownVolatility {
                    id: self.id.clone(),
                    value: label.to_string(),
                }
            })?),
        };
        Ok(Molecule {
            id: self.id,
            name: self.name,
            family: self.family,
            molecular_weight: self.molecular_weight,
            flash_point: self.flash_point,
            boiling_point: self.boiling_point,
            logp: self.logp,
            odor_threshold: self.odor_threshold,
            volatility,
        })
    }
}

#[derive(Debug, Deserialize)]
struct MoleculeTomlFile {
    molecules: HashMap<String, MoleculeRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct MoleculeDatabase {
    molecules: HashMap<String, Molecule>,
}

impl MoleculeDatabase {
    /// Loads a database from a `.csv` or `.toml` file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, MoleculeDbError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => Self::load_csv(path),
            Some("toml") => Self::load_toml(path),
            _ => Err(MoleculeDbError::UnsupportedFormat {
                path: path.to_string_lossy().to_string(),
            }),
        }
    }

    fn load_csv(path: &Path) -> Result<Self, MoleculeDbError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| MoleculeDbError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        let mut db = Self::default();
        for result in reader.deserialize() {
            let record: MoleculeRecord = result.map_err(|e| MoleculeDbError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            db.insert(record.into_molecule()?);
        }
        Ok(db)
    }

    fn load_toml(path: &Path) -> Result<Self, MoleculeDbError> {
        let content = std::fs::read_to_string(path).map_err(|e| MoleculeDbError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let file: MoleculeTomlFile =
            toml::from_str(&content).map_err(|e| MoleculeDbError::Toml {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;

        let mut db = Self::default();
        for (id, mut record) in file.molecules {
            if record.id.is_empty() {
                record.id = id;
            }
            db.insert(record.into_molecule()?);
        }
        Ok(db)
    }

    pub fn insert(&mut self, molecule: Molecule) {
        self.molecules.insert(molecule.id.clone(), molecule);
    }

    pub fn get(&self, id: &str) -> Option<&Molecule> {
        self.molecules.get(id)
    }

    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }
}

impl FromIterator<Molecule> for MoleculeDatabase {
    fn from_iter<I: IntoIterator<Item = Molecule>>(iter: I) -> Self {
        let mut db = Self::default();
        for molecule in iter {
            db.insert(molecule);
        }
        db
    }
}

impl MoleculeLookup for MoleculeDatabase {
    fn molecule(&self, id: &str) -> Option<&Molecule> {
        self.get(id)
    }
}

#[derive(Debug, Error)]
pub enum MoleculeDbError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Molecule '{id}' has unrecognized volatility '{value}'")]
    UnknownVolatility { id: String, value: String },
    #[error("Unsupported molecule database format for '{path}' (expected .csv or .toml)")]
    UnsupportedFormat { path: String },
}
