use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature of a cold candle surface, in °C.
pub const COLD_SURFACE_TEMPERATURE_C: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrystalStructure {
    Macro,
    Mixed,
    Polymorphic,
    Amorphous,
    Liquid,
    MacroPolymorphic,
    MacroAmorphous,
    AmorphousPolymorphic,
}

impl CrystalStructure {
    pub fn is_polymorphic(self) -> bool {
        matches!(
            self,
            CrystalStructure::Polymorphic
                | CrystalStructure::MacroPolymorphic
                | CrystalStructure::AmorphousPolymorphic
        )
    }

    pub fn is_amorphous(self) -> bool {
        matches!(
            self,
            CrystalStructure::Amorphous
                | CrystalStructure::MacroAmorphous
                | CrystalStructure::AmorphousPolymorphic
        )
    }
}

impl fmt::Display for CrystalStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CrystalStructure::Macro => "macrocrystalline",
            CrystalStructure::Mixed => "mixed",
            CrystalStructure::Polymorphic => "polymorphic",
            CrystalStructure::Amorphous => "amorphous",
            CrystalStructure::Liquid => "liquid",
            CrystalStructure::MacroPolymorphic => "macrocrystalline + polymorphic",
            CrystalStructure::MacroAmorphous => "macrocrystalline + amorphous (partial channels)",
            CrystalStructure::AmorphousPolymorphic => "amorphous + polymorphic",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaxCategory {
    Mineral,
    Vegetable,
    Mixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HansenParameters {
    pub dispersion: f64,
    pub polar: f64,
    pub hydrogen_bonding: f64,
}

impl Default for HansenParameters {
    fn default() -> Self {
        Self {
            dispersion: 16.0,
            polar: 0.0,
            hydrogen_bonding: 0.0,
        }
    }
}

/// Calibration constants governing maturation and channel obstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CureKinetics {
    #[serde(default = "default_obstruction_alpha")]
    pub obstruction_alpha: f64,
    pub avrami_n: f64,
    pub avrami_k_base: f64,
    #[serde(default)]
    pub polymorph_hours: f64,
    #[serde(default = "default_spacing_um")]
    pub intercrystal_spacing_um: f64,
    #[serde(default = "default_amorphous_fraction")]
    pub amorphous_fraction: f64,
    #[serde(default)]
    pub crystallization_note: Option<String>,
    #[serde(default)]
    pub polymorph_note: Option<String>,
}

fn default_obstruction_alpha() -> f64 {
    1.0
}
fn default_spacing_um() -> f64 {
    20.0
}
fn default_amorphous_fraction() -> f64 {
    0.30
}
fn default_cold_temperature() -> f64 {
    COLD_SURFACE_TEMPERATURE_C
}

/// Qualitative note attached to a pair of archetypes that behave non-additively together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InteractionNote {
    pub waxes: [String; 2],
    /// Fraction the first (host) wax must exceed for the note to apply; the second only has
    /// to be present.
    #[serde(default)]
    pub min_fraction: f64,
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub cold_impact: Option<String>,
    #[serde(default)]
    pub hot_impact: Option<String>,
    #[serde(default)]
    pub mechanical_impact: Option<String>,
}

impl InteractionNote {
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.waxes[0] == a && self.waxes[1] == b) || (self.waxes[0] == b && self.waxes[1] == a)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendShare {
    pub key: String,
    pub fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlendComposition {
    pub parts: Vec<BlendShare>,
    pub interactions: Vec<InteractionNote>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaxThermoProfile {
    #[serde(skip_deserializing)]
    pub key: String,
    pub name: String,
    pub melt_pool_temperature: f64,
    #[serde(default = "default_cold_temperature")]
    pub cold_temperature: f64,
    pub viscosity: f64,
    pub crystal_structure: CrystalStructure,
    pub channel_factor: f64,
    pub surface_migration: f64,
    pub hildebrand: f64,
    #[serde(default)]
    pub hansen: Option<HansenParameters>,
    pub category: WaxCategory,
    #[serde(default)]
    pub description: String,
    pub kinetics: CureKinetics,
    #[serde(skip_deserializing)]
    pub blend: Option<BlendComposition>,
}

impl WaxThermoProfile {
    pub fn hansen_or_default(&self) -> HansenParameters {
        self.hansen.unwrap_or_default()
    }

    pub fn is_blend(&self) -> bool {
        self.blend.is_some()
    }

    /// Checks the bounds every archetype must respect, returning a reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.channel_factor) {
            return Err(format!(
                "channel_factor {} is outside [0, 1]",
                self.channel_factor
            ));
        }
        if !(0.0..=1.0).contains(&self.surface_migration) {
            return Err(format!(
                "surface_migration {} is outside [0, 1]",
                self.surface_migration
            ));
        }
        if !(0.0..=1.0).contains(&self.kinetics.amorphous_fraction) {
            return Err(format!(
                "amorphous_fraction {} is outside [0, 1]",
                self.kinetics.amorphous_fraction
            ));
        }
        if self.viscosity <= 0.0 {
            return Err(format!("viscosity {} must be positive", self.viscosity));
        }
        if self.melt_pool_temperature <= self.cold_temperature {
            return Err(format!(
                "melt_pool_temperature {} must exceed cold_temperature {}",
                self.melt_pool_temperature, self.cold_temperature
            ));
        }
        if self.kinetics.avrami_n <= 0.0 {
            return Err(format!(
                "avrami_n {} must be positive",
                self.kinetics.avrami_n
            ));
        }
        if self.kinetics.intercrystal_spacing_um <= 0.0 {
            return Err(format!(
                "intercrystal_spacing_um {} must be positive",
                self.kinetics.intercrystal_spacing_um
            ));
        }
        Ok(())
    }
}
