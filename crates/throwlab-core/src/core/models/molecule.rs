use crate::core::rules::{FAMILY_TRAITS, FamilyTrait, VOLATILITY_ALIASES};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Volatility {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl Volatility {
    pub fn register(self) -> Register {
        match self {
            Volatility::VeryHigh | Volatility::High => Register::Top,
            Volatility::Medium => Register::Heart,
            Volatility::Low | Volatility::VeryLow => Register::Base,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVolatilityError(pub String);

impl fmt::Display for ParseVolatilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized volatility label '{}'", self.0)
    }
}

impl std::error::Error for ParseVolatilityError {}

impl FromStr for Volatility {
    type Err = ParseVolatilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        VOLATILITY_ALIASES
            .get(normalized.as_str())
            .copied()
            .ok_or_else(|| ParseVolatilityError(s.to_string()))
    }
}

impl fmt::Display for Volatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Volatility::VeryHigh => "very high",
            Volatility::High => "high",
            Volatility::Medium => "medium",
            Volatility::Low => "low",
            Volatility::VeryLow => "very low",
        };
        f.write_str(label)
    }
}

/// Olfactive register a molecule belongs to, derived from its volatility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Register {
    Top,
    Heart,
    Base,
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Top => f.write_str("top"),
            Register::Heart => f.write_str("heart"),
            Register::Base => f.write_str("base"),
        }
    }
}

/// Reference record for a single fragrance molecule.
///
/// Every physical property is optional; the estimators fall back to documented
/// defaults when a value is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    pub id: String,
    pub name: String,
    pub family: String,
    pub molecular_weight: Option<f64>,
    pub flash_point: Option<f64>,
    pub boiling_point: Option<f64>,
    pub logp: Option<f64>,
    pub odor_threshold: Option<f64>,
    pub volatility: Option<Volatility>,
}

impl Molecule {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            family: String::new(),
            molecular_weight: None,
            flash_point: None,
            boiling_point: None,
            logp: None,
            odor_threshold: None,
            volatility: None,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }
    pub fn with_molecular_weight(mut self, mw: f64) -> Self {
        self.molecular_weight = Some(mw);
        self
    }
    pub fn with_flash_point(mut self, fp: f64) -> Self {
        self.flash_point = Some(fp);
        self
    }
    pub fn with_boiling_point(mut self, bp: f64) -> Self {
        self.boiling_point = Some(bp);
        self
    }
    pub fn with_logp(mut self, logp: f64) -> Self {
        self.logp = Some(logp);
        self
    }
    pub fn with_odor_threshold(mut self, threshold: f64) -> Self {
        self.odor_threshold = Some(threshold);
        self
    }
    pub fn with_volatility(mut self, volatility: Volatility) -> Self {
        self.volatility = Some(volatility);
        self
    }

    /// Volatility class, `Medium` when the record does not carry one.
    pub fn volatility_or_default(&self) -> Volatility {
        self.volatility.unwrap_or(Volatility::Medium)
    }

    pub fn register(&self) -> Register {
        self.volatility_or_default().register()
    }

    pub fn has_trait(&self, family_trait: FamilyTrait) -> bool {
        let family = self.family.to_lowercase();
        FAMILY_TRAITS
            .entries()
            .any(|(keyword, t)| *t == family_trait && family.contains(keyword))
    }

    pub fn is_hydrogen_bonded(&self) -> bool {
        self.has_trait(FamilyTrait::HydrogenBonded)
    }

    pub fn is_heavy_fixative(&self) -> bool {
        self.has_trait(FamilyTrait::HeavyFixative)
    }

    pub fn is_aromatic_aldehyde(&self) -> bool {
        self.has_trait(FamilyTrait::AromaticAldehyde)
    }
}
