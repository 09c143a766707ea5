use crate::core::models::molecule::Volatility;
use phf::{Map, phf_map};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FamilyTrait {
    HydrogenBonded,
    HeavyFixative,
    AromaticAldehyde,
}

// Keys are lower-case with spaces and hyphens folded to underscores.
#[rustfmt::skip]
pub static VOLATILITY_ALIASES: Map<&'static str, Volatility> = phf_map! {
    "very_high" => Volatility::VeryHigh, "veryhigh" => Volatility::VeryHigh,
    "très_haute" => Volatility::VeryHigh, "tres_haute" => Volatility::VeryHigh,
    "high" => Volatility::High, "haute" => Volatility::High,
    "medium" => Volatility::Medium, "moderate" => Volatility::Medium, "moyenne" => Volatility::Medium,
    "low" => Volatility::Low, "basse" => Volatility::Low,
    "very_low" => Volatility::VeryLow, "verylow" => Volatility::VeryLow,
    "très_basse" => Volatility::VeryLow, "tres_basse" => Volatility::VeryLow,
};

// Substring keywords matched against the lower-cased family tag.
#[rustfmt::skip]
pub static FAMILY_TRAITS: Map<&'static str, FamilyTrait> = phf_map! {
    // Hydrogen-bond donors (Trouton coefficient 110)
    "alcohol" => FamilyTrait::HydrogenBonded, "alcool" => FamilyTrait::HydrogenBonded,
    "phenol" => FamilyTrait::HydrogenBonded, "phénol" => FamilyTrait::HydrogenBonded,

    // Musks and lactones (Trouton coefficient 95)
    "musk" => FamilyTrait::HeavyFixative, "musc" => FamilyTrait::HeavyFixative,
    "lactone" => FamilyTrait::HeavyFixative,

    "aromatic-aldehyde" => FamilyTrait::AromaticAldehyde,
    "aromatic aldehyde" => FamilyTrait::AromaticAldehyde,
    "aromatic_aldehyde" => FamilyTrait::AromaticAldehyde,
    "aldéhyde aromatique" => FamilyTrait::AromaticAldehyde,
    "aldéhyde-aromatique" => FamilyTrait::AromaticAldehyde,
    "aldehyde aromatique" => FamilyTrait::AromaticAldehyde,
};

// Literature backing each physical law used by the engine.
#[rustfmt::skip]
pub static LAW_CITATIONS: Map<&'static str, &'static [&'static str]> = phf_map! {
    "avrami" => &[
        "Avrami (1939) J. Chem. Phys. 7, 1103",
        "Avrami (1940) J. Chem. Phys. 8, 212",
        "Wunderlich (1976) Macromolecular Physics Vol. 2",
    ],
    "polymorphism" => &[
        "Sato (2001) Chem. Eng. Sci. 56, 2255",
        "Marangoni & Wesdorp (2013) Structure and Properties of Fat Crystal Networks",
    ],
    "fick" => &[
        "Crank (1975) The Mathematics of Diffusion, 2nd ed.",
        "Fick (1855) Ann. Phys. 170, 59",
    ],
    "clausius-clapeyron" => &[
        "Clausius (1850) Ann. Phys. 155, 500",
        "Trouton (1884) Phil. Mag. 18, 54",
    ],
    "stokes-einstein" => &[
        "Einstein (1905) Ann. Phys. 322, 549",
    ],
    "flory-huggins" => &[
        "Flory (1942) J. Chem. Phys. 10, 51",
        "Hildebrand & Scott (1950) The Solubility of Nonelectrolytes",
        "Hansen (2007) Hansen Solubility Parameters, 2nd ed.",
    ],
    "grunberg-nissan" => &[
        "Grunberg & Nissan (1949) Nature 164, 799",
    ],
};

pub fn citations(law: &str) -> &'static [&'static str] {
    LAW_CITATIONS.get(law).copied().unwrap_or(&[])
}
