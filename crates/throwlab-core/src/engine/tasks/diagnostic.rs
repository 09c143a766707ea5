use super::profile::{Balance, Behavior, MoleculeThrow, ThrowProfile};
use crate::core::models::wax::{CrystalStructure, WaxThermoProfile};
use serde::Serialize;

const ISSUE_MIN_PERCENTAGE: f64 = 1.0;
const COLD_ONLY_MIN_SHARE_OF_COLD: f64 = 0.3;
const COLD_ONLY_MAX_SHARE_OF_HOT: f64 = 0.05;
const HOT_ONLY_MIN_SHARE_OF_HOT: f64 = 0.2;
const HOT_ONLY_MAX_SHARE_OF_COLD: f64 = 0.01;
const HOT_ONLY_MIN_PERCENTAGE: f64 = 3.0;
const TRAPPED_MIN_PERCENTAGE: f64 = 2.0;
const CRYSTALLIZATION_MIN_PERCENTAGE: f64 = 2.0;

const VISCOSITY_LIMIT_CST: f64 = 20.0;
const CHANNEL_FACTOR_LIMIT: f64 = 0.5;
const MELT_POOL_LIMIT_C: f64 = 50.0;
const REFERENCE_VISCOSITY_CST: f64 = 4.5;
const REFERENCE_MELT_POOL_C: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    ColdOnly,
    HotOnly,
    Trapped,
    Crystallization,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoleculeIssue {
    pub kind: IssueKind,
    pub molecule_id: String,
    pub name: String,
    pub percentage: f64,
    pub problem: String,
    pub science: String,
    pub formulation_fix: Option<String>,
    pub wax_fix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaxIssueKind {
    HighViscosity,
    ObstructedChannels,
    LowMeltPool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaxIssue {
    pub kind: WaxIssueKind,
    pub problem: String,
    pub science: String,
    pub fix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostic {
    pub explanation: String,
    pub molecule_issues: Vec<MoleculeIssue>,
    pub wax_issues: Vec<WaxIssue>,
}

pub fn run(profile: &ThrowProfile) -> Diagnostic {
    Diagnostic {
        explanation: explain_balance(profile),
        molecule_issues: molecule_issues(profile),
        wax_issues: wax_issues(&profile.wax),
    }
}

fn explain_balance(profile: &ThrowProfile) -> String {
    let wax = &profile.wax;
    match profile.balance {
        Balance::WeakOverall if profile.total_components_identified == 0 => {
            "No component of the formula was found in the molecule database, so no throw can be \
             estimated. Check the identifiers of the formula."
                .to_string()
        }
        Balance::WeakOverall => format!(
            "Throw is almost zero in this wax. Molecules are either trapped by an unsuitable crystal \
             structure or the melt is too viscous for diffusion. Cause: {}",
            wax.description
        ),
        Balance::HotDominant => {
            let ratio = profile
                .ratio_hot_cold
                .map(|r| format!("{r:.2}x"))
                .unwrap_or_else(|| "infinitely".to_string());
            format!(
                "Hot throw is {ratio} stronger than cold throw. Heavy base molecules barely evaporate \
                 at room temperature and need the thermal energy of the {:.0} °C melt pool to reach a \
                 useful vapor pressure (Clausius–Clapeyron).",
                wax.melt_pool_temperature
            )
        }
        Balance::ColdDominant => format!(
            "Cold throw exceeds hot throw (hot/cold ratio {:.2}). The fragrance is dominated by light \
             molecules with a high vapor pressure at {:.0} °C; in the melt pool they evaporate so fast \
             that the hot throw fades after 30 to 45 minutes (Clausius–Clapeyron).",
            profile.ratio_hot_cold.unwrap_or_default(),
            wax.cold_temperature
        ),
        Balance::Balanced => format!(
            "Cold and hot throw are reasonably balanced (hot/cold ratio {:.2}). Top notes carry the \
             cold throw while heart and base notes sustain the hot throw.",
            profile.ratio_hot_cold.unwrap_or_default()
        ),
    }
}

fn molecule_issues(profile: &ThrowProfile) -> Vec<MoleculeIssue> {
    let total_cold = profile.cold_throw_index;
    let total_hot = profile.hot_throw_index;
    let wax = &profile.wax;

    let mut sorted: Vec<&MoleculeThrow> = profile.molecules.iter().collect();
    sorted.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));

    let mut issues = Vec::new();
    for mol in sorted
        .into_iter()
        .filter(|m| m.percentage >= ISSUE_MIN_PERCENTAGE)
    {
        if mol.cold_contribution > total_cold * COLD_ONLY_MIN_SHARE_OF_COLD
            && mol.hot_contribution < total_hot * COLD_ONLY_MAX_SHARE_OF_HOT
        {
            issues.push(issue(
                mol,
                IssueKind::ColdOnly,
                format!(
                    "{} ({:.1} %) provides {:.0} % of the cold throw but only {:.0} % of the hot throw.",
                    mol.name,
                    mol.percentage,
                    share(mol.cold_contribution, total_cold),
                    share(mol.hot_contribution, total_hot)
                ),
                format!(
                    "Estimated boiling point {:.0} °C. At {:.0} °C its relative vapor pressure is {:.3}, \
                     so it leaves the melt pool within 30 minutes.",
                    mol.boiling_point_estimated, wax.melt_pool_temperature, mol.pvap_hot
                ),
                Some(format!(
                    "Reduce {} from {:.1} % to {:.0} % and compensate with a heavier ester carrying the \
                     same note.",
                    mol.name,
                    mol.percentage,
                    (mol.percentage * 0.5).round().max(1.0)
                )),
                Some("Add 5 % microcrystalline wax to slow evaporation from the melt pool.".to_string()),
            ));
        }

        if mol.hot_contribution > total_hot * HOT_ONLY_MIN_SHARE_OF_HOT
            && mol.cold_contribution < total_cold * HOT_ONLY_MAX_SHARE_OF_COLD
            && mol.percentage > HOT_ONLY_MIN_PERCENTAGE
        {
            issues.push(issue(
                mol,
                IssueKind::HotOnly,
                format!(
                    "{} ({:.1} %) only contributes to the hot throw and is invisible when cold.",
                    mol.name, mol.percentage
                ),
                format!(
                    "Relative vapor pressure at {:.0} °C is {:.2e}, below the gas-phase concentration \
                     needed for perception.",
                    wax.cold_temperature, mol.pvap_cold
                ),
                Some(
                    "Add 2 to 3 % of a complementary light top note (terpene below 140 g/mol)."
                        .to_string(),
                ),
                Some(
                    "Blend in 5 to 8 % coconut wax: its liquid fraction at room temperature feeds the \
                     cold throw."
                        .to_string(),
                ),
            ));
        }

        if mol.behavior == Behavior::Inert && mol.percentage > TRAPPED_MIN_PERCENTAGE {
            issues.push(issue(
                mol,
                IssueKind::Trapped,
                format!(
                    "{} ({:.1} %) is trapped in the wax and contributes nothing to the throw.",
                    mol.name, mol.percentage
                ),
                format!(
                    "In {} the release factor is {:.2}. Combined with a relative vapor pressure of {:.2e} \
                     and a relative diffusion of {:.2}, the mass flux is negligible.",
                    wax.name, wax.channel_factor, mol.pvap_hot, mol.diffusion_hot
                ),
                None,
                Some(
                    "Switch to a wax with open crystalline channels such as paraffin (release factor \
                     1.0)."
                        .to_string(),
                ),
            ));
        }

        if mol.aromatic_aldehyde && mol.percentage > CRYSTALLIZATION_MIN_PERCENTAGE {
            issues.push(issue(
                mol,
                IssueKind::Crystallization,
                format!(
                    "{} (aromatic aldehyde, {:.1} %) may crystallize in the cold wax.",
                    mol.name, mol.percentage
                ),
                "Aromatic aldehydes have limited solubility in waxes (below 2 % at 20 °C). Above it, \
                 micro-crystals form as visible white spots and the crystalline fraction is odorless."
                    .to_string(),
                Some(
                    "Keep total aromatic aldehydes below 2 % of the combined wax and fragrance weight."
                        .to_string(),
                ),
                Some(
                    "Add 1 % of a polymer additive to hold the aldehydes in solution.".to_string(),
                ),
            ));
        }
    }
    issues
}

fn issue(
    mol: &MoleculeThrow,
    kind: IssueKind,
    problem: String,
    science: String,
    formulation_fix: Option<String>,
    wax_fix: Option<String>,
) -> MoleculeIssue {
    MoleculeIssue {
        kind,
        molecule_id: mol.id.clone(),
        name: mol.name.clone(),
        percentage: mol.percentage,
        problem,
        science,
        formulation_fix,
        wax_fix,
    }
}

fn wax_issues(wax: &WaxThermoProfile) -> Vec<WaxIssue> {
    let mut issues = Vec::new();

    if wax.viscosity > VISCOSITY_LIMIT_CST {
        issues.push(WaxIssue {
            kind: WaxIssueKind::HighViscosity,
            problem: format!(
                "Melt pool viscosity is {:.1} cSt, limiting diffusion for every molecule.",
                wax.viscosity
            ),
            science: format!(
                "Stokes–Einstein: D is inversely proportional to viscosity. At {:.1} cSt versus {:.1} \
                 in paraffin, diffusion is about {:.0}x slower.",
                wax.viscosity,
                REFERENCE_VISCOSITY_CST,
                wax.viscosity / REFERENCE_VISCOSITY_CST
            ),
            fix: "Add 5 to 10 % coconut wax to cut viscosity by 20 to 30 %, or use a larger wick to \
                  raise the melt pool temperature by about 5 °C."
                .to_string(),
        });
    }

    if wax.channel_factor < CHANNEL_FACTOR_LIMIT {
        let fix = if wax.crystal_structure.is_polymorphic() {
            "Extend curing to 14 to 21 days to complete the polymorphic transition, or add 3 % \
             cetearyl alcohol as a nucleating agent."
        } else {
            "Never use this wax alone; keep it to 3 to 10 % of a blend."
        };
        issues.push(WaxIssue {
            kind: WaxIssueKind::ObstructedChannels,
            problem: format!(
                "{} crystal structure: release factor {:.2} versus 1.0 in paraffin.",
                wax.crystal_structure, wax.channel_factor
            ),
            science: format!(
                "{}Only {:.0} % of the incorporated fragrance can be released.",
                match wax.crystal_structure {
                    CrystalStructure::Amorphous | CrystalStructure::MacroAmorphous => {
                        "The fine amorphous network traps fragrance in isolated pockets. "
                    }
                    s if s.is_polymorphic() => {
                        "Polymorphic triglyceride crystals trap fragrance in isolated pockets. "
                    }
                    _ => "",
                },
                wax.channel_factor * 100.0
            ),
            fix: fix.to_string(),
        });
    }

    if wax.melt_pool_temperature < MELT_POOL_LIMIT_C {
        let gap = REFERENCE_MELT_POOL_C - wax.melt_pool_temperature;
        issues.push(WaxIssue {
            kind: WaxIssueKind::LowMeltPool,
            problem: format!(
                "Melt pool reaches only {:.0} °C versus {:.0} °C in paraffin.",
                wax.melt_pool_temperature, REFERENCE_MELT_POOL_C
            ),
            science: format!(
                "Vapor pressure roughly doubles every 10 °C. A melt pool {gap:.0} °C colder lowers vapor \
                 pressure about {:.0}x for every molecule.",
                2f64.powf(gap / 10.0)
            ),
            fix: "Use a wick one size larger to raise the melt pool by 3 to 5 °C; watch for tunneling."
                .to_string(),
        });
    }

    issues
}

fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 { part / total * 100.0 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::component::Component;
    use crate::engine::tasks::profile;
    use crate::engine::tasks::test_support::{molecule_db, registry};

    fn kinds(diagnostic: &Diagnostic) -> Vec<IssueKind> {
        diagnostic.molecule_issues.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn paraffin_has_no_wax_issues() {
        let registry = registry();
        assert!(wax_issues(registry.get("paraffin").unwrap()).is_empty());
    }

    #[test]
    fn soy_reports_viscosity_channels_and_melt_pool() {
        let registry = registry();
        let issues: Vec<WaxIssueKind> = wax_issues(registry.get("soy").unwrap())
            .into_iter()
            .map(|i| i.kind)
            .collect();
        assert_eq!(
            issues,
            vec![
                WaxIssueKind::HighViscosity,
                WaxIssueKind::ObstructedChannels,
                WaxIssueKind::LowMeltPool
            ]
        );
    }

    #[test]
    fn microcrystalline_fix_limits_it_to_blends() {
        let registry = registry();
        let issues = wax_issues(registry.get("microcrystalline").unwrap());
        let channels = issues
            .iter()
            .find(|i| i.kind == WaxIssueKind::ObstructedChannels)
            .unwrap();
        assert!(channels.fix.contains("blend"));
    }

    #[test]
    fn aromatic_aldehyde_above_two_percent_flags_crystallization() {
        let registry = registry();
        let wax = registry.get("paraffin").unwrap();
        let components = vec![
            Component::fixed("121-33-5", 4.0),
            Component::fixed("78-70-6", 10.0),
        ];
        let profile = profile::run(&components, &molecule_db(), wax).unwrap();
        let issue = profile
            .diagnostic
            .molecule_issues
            .iter()
            .find(|i| i.kind == IssueKind::Crystallization)
            .unwrap();
        assert_eq!(issue.molecule_id, "121-33-5");
    }

    #[test]
    fn traces_below_one_percent_are_ignored() {
        let registry = registry();
        let wax = registry.get("paraffin").unwrap();
        let components = vec![Component::fixed("121-33-5", 0.5)];
        let profile = profile::run(&components, &molecule_db(), wax).unwrap();
        assert!(profile.diagnostic.molecule_issues.is_empty());
    }

    #[test]
    fn single_dominant_light_molecule_is_flagged_cold_only_when_hot_share_is_small() {
        let registry = registry();
        let wax = registry.get("paraffin").unwrap();
        let components = vec![
            Component::fixed("5989-27-5", 30.0),
            Component::fixed("1222-05-5", 30.0),
        ];
        let profile = profile::run(&components, &molecule_db(), wax).unwrap();
        let limonene = &profile.molecules[0];
        let expect_cold_only = limonene.cold_contribution > profile.cold_throw_index * 0.3
            && limonene.hot_contribution < profile.hot_throw_index * 0.05;
        assert_eq!(
            kinds(&profile.diagnostic).contains(&IssueKind::ColdOnly),
            expect_cold_only
        );
    }

    #[test]
    fn weak_profile_without_identified_molecules_says_so() {
        let registry = registry();
        let wax = registry.get("paraffin").unwrap();
        let profile =
            profile::run(&[Component::fixed("missing", 10.0)], &molecule_db(), wax).unwrap();
        assert!(profile.diagnostic.explanation.contains("molecule database"));
        assert!(profile.diagnostic.molecule_issues.is_empty());
    }

    #[test]
    fn share_of_zero_total_is_zero() {
        assert_eq!(share(1.0, 0.0), 0.0);
        assert_eq!(share(1.0, 4.0), 25.0);
    }
}
