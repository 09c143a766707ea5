use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// One archetype and its share of a blend, in any unit (percent or fraction).
#[derive(Debug, Clone, PartialEq)]
pub struct BlendPart {
    pub key: String,
    pub fraction: f64,
}

impl BlendPart {
    pub fn new(key: impl Into<String>, fraction: f64) -> Self {
        Self {
            key: key.into(),
            fraction,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WaxSelection {
    Archetype(String),
    Blend(Vec<BlendPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub wax: WaxSelection,
    pub fragrance_flash_point: Option<f64>,
    pub compare_archetypes: bool,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    wax: Option<WaxSelection>,
    fragrance_flash_point: Option<f64>,
    compare_archetypes: Option<bool>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wax(mut self, selection: WaxSelection) -> Self {
        self.wax = Some(selection);
        self
    }
    pub fn archetype(mut self, key: impl Into<String>) -> Self {
        self.wax = Some(WaxSelection::Archetype(key.into()));
        self
    }
    pub fn blend(mut self, parts: Vec<BlendPart>) -> Self {
        self.wax = Some(WaxSelection::Blend(parts));
        self
    }
    pub fn fragrance_flash_point(mut self, flash_point: Option<f64>) -> Self {
        self.fragrance_flash_point = flash_point;
        self
    }
    pub fn compare_archetypes(mut self, enabled: bool) -> Self {
        self.compare_archetypes = Some(enabled);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        Ok(AnalysisConfig {
            wax: self.wax.ok_or(ConfigError::MissingParameter("wax"))?,
            fragrance_flash_point: self.fragrance_flash_point,
            compare_archetypes: self.compare_archetypes.unwrap_or(true),
        })
    }
}
