use std::path::PathBuf;
use throwlab::engine::config as core_config;

pub struct AppConfig {
    pub fragrance_path: PathBuf,
    pub molecules_path: PathBuf,
    pub waxes_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub core_config: core_config::AnalysisConfig,
}
