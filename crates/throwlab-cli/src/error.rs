use std::path::PathBuf;
use thiserror::Error;
use throwlab::core::registry::molecule::MoleculeDbError;
use throwlab::core::registry::wax::RegistryLoadError;
use throwlab::engine::error::EngineError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] EngineError),

    #[error("Wax table error: {0}")]
    Registry(#[from] RegistryLoadError),

    #[error("Molecule database error: {0}")]
    MoleculeDb(#[from] MoleculeDbError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
