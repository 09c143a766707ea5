use crate::core::models::wax::{InteractionNote, WaxThermoProfile};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

const BUILTIN_ARCHETYPES: &str = include_str!("../../../data/waxes.toml");
const BUILTIN_ORIGIN: &str = "<builtin waxes.toml>";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WaxRegistryFile {
    archetypes: BTreeMap<String, WaxThermoProfile>,
    #[serde(default)]
    interactions: Vec<InteractionNote>,
}

/// Read-only table of wax archetypes and their pairwise interaction notes.
///
/// Keys iterate in sorted order, which keeps every cross-archetype analysis deterministic.
#[derive(Debug, Clone, Default)]
pub struct WaxRegistry {
    archetypes: BTreeMap<String, WaxThermoProfile>,
    interactions: Vec<InteractionNote>,
}

impl WaxRegistry {
    pub fn load(path: &Path) -> Result<Self, RegistryLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| RegistryLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// The six reference archetypes shipped with the library.
    pub fn builtin() -> Result<Self, RegistryLoadError> {
        Self::from_toml_str(BUILTIN_ARCHETYPES, BUILTIN_ORIGIN)
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, RegistryLoadError> {
        let file: WaxRegistryFile =
            toml::from_str(content).map_err(|e| RegistryLoadError::Toml {
                path: origin.to_string(),
                source: e,
            })?;

        let mut archetypes = file.archetypes;
        for (key, profile) in archetypes.iter_mut() {
            profile.key = key.clone();
            profile
                .validate()
                .map_err(|reason| RegistryLoadError::InvalidArchetype {
                    key: key.clone(),
                    reason,
                })?;
        }

        for note in &file.interactions {
            for wax in &note.waxes {
                if !archetypes.contains_key(wax) {
                    return Err(RegistryLoadError::UnknownInteractionWax {
                        key: wax.clone(),
                        kind: note.kind.clone(),
                    });
                }
            }
        }

        Ok(Self {
            archetypes,
            interactions: file.interactions,
        })
    }

    pub fn get(&self, key: &str) -> Option<&WaxThermoProfile> {
        self.archetypes.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WaxThermoProfile)> {
        self.archetypes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn interactions(&self) -> &[InteractionNote] {
        &self.interactions
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum RegistryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid wax archetype '{key}': {reason}")]
    InvalidArchetype { key: String, reason: String },
    #[error("Interaction '{kind}' references unknown wax archetype '{key}'")]
    UnknownInteractionWax { key: String, kind: String },
}
