use super::config::ConfigError;
use crate::core::registry::molecule::MoleculeDbError;
use crate::core::registry::wax::RegistryLoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown wax archetype: '{key}'")]
    UnknownWax { key: String },

    #[error("Fragrance has no components to analyze")]
    EmptyComponents,

    #[error("Wax blend has no components")]
    EmptyBlend,

    #[error("Invalid fraction {fraction} for wax '{key}' in blend")]
    InvalidBlendFraction { key: String, fraction: f64 },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Wax registry error: {source}")]
    Registry {
        #[from]
        source: RegistryLoadError,
    },

    #[error("Molecule database error: {source}")]
    MoleculeDb {
        #[from]
        source: MoleculeDbError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::component::Component;
    use crate::core::registry::molecule::MoleculeDatabase;
    use crate::core::registry::wax::WaxRegistry;
    use crate::engine::config::{AnalysisConfigBuilder, BlendPart};
    use crate::engine::tasks::{blend, comparison};
    use crate::engine::progress::ProgressReporter;
    use std::path::Path;

    fn message(error: &EngineError) -> &'static str {
        match error {
            EngineError::UnknownWax { .. } => "unknown-wax",
            EngineError::EmptyComponents => "empty-components",
            EngineError::EmptyBlend => "empty-blend",
            EngineError::InvalidBlendFraction { .. } => "invalid-fraction",
            EngineError::Config { .. } => "config",
            EngineError::Registry { .. } => "registry",
            EngineError::MoleculeDb { .. } => "molecule-db",
        }
    }

    #[test]
    fn every_variant_is_raised_by_a_real_operation() {
        let registry = WaxRegistry::builtin().unwrap();
        let mut raised = Vec::new();

        let unknown = blend::run(&[BlendPart::new("beeswax", 1.0)], &registry).unwrap_err();
        assert_eq!(unknown.to_string(), "Unknown wax archetype: 'beeswax'");
        raised.push(unknown);

        raised.push(blend::run(&[], &registry).unwrap_err());
        raised.push(blend::run(&[BlendPart::new("soy", -1.0)], &registry).unwrap_err());
        raised.push(
            comparison::run(
                &[] as &[Component],
                &MoleculeDatabase::default(),
                &registry,
                &ProgressReporter::new(),
            )
            .unwrap_err(),
        );
        raised.push(AnalysisConfigBuilder::new().build().unwrap_err().into());
        raised.push(WaxRegistry::load(Path::new("/nonexistent/waxes.toml")).unwrap_err().into());
        raised.push(
            MoleculeDatabase::load(Path::new("molecules.json"))
                .unwrap_err()
                .into(),
        );

        let mut kinds: Vec<&str> = raised.iter().map(message).collect();
        kinds.sort_unstable();
        assert_eq!(
            kinds,
            vec![
                "config",
                "empty-blend",
                "empty-components",
                "invalid-fraction",
                "molecule-db",
                "registry",
                "unknown-wax",
            ]
        );
    }
}
