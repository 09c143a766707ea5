use super::profile::{Behavior, MoleculeThrow, ThrowProfile};
use crate::core::models::molecule::Register;
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

const BASE_SCORE: f64 = 5.0;
const MAX_SCORE: f64 = 10.0;

const EXCELLENT_MIN: f64 = 7.0;
const FAIR_MIN: f64 = 5.0;
const WEAK_MIN: f64 = 3.0;

const COLD_COUNTED_MIN_PCT: f64 = 1.0;
const HOT_COUNTED_MIN_PCT: f64 = 2.0;
const POWERFUL_THRESHOLD: f64 = 10.0; // µg/m³
const POWERFUL_MIN_COUNT: usize = 3;
const TRAPPED_MIN_COUNT: usize = 2;

const BOOSTER_MIN_PCT: f64 = 0.5;
const BOOSTER_SHARE: f64 = 0.15;
const AMPLIFIER_THRESHOLD: f64 = 5.0;
const BLOCKER_MIN_PCT: f64 = 1.0;
const CONSUMED_COLD_SHARE: f64 = 0.4;
const CONSUMED_HOT_SHARE: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    Cold,
    Hot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Excellent,
    Fair,
    Weak,
    Insufficient,
}

impl Verdict {
    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_MIN {
            Verdict::Excellent
        } else if score >= FAIR_MIN {
            Verdict::Fair
        } else if score >= WEAK_MIN {
            Verdict::Weak
        } else {
            Verdict::Insufficient
        }
    }
}

/// A single heuristic adjustment of a throw score.
pub struct ScoreRule {
    pub axis: Axis,
    pub label: &'static str,
    pub weight: f64,
    pub explanation: &'static str,
    pub predicate: fn(&ThrowProfile) -> bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedRule {
    pub label: &'static str,
    pub weight: f64,
    pub explanation: &'static str,
}

impl From<&ScoreRule> for AppliedRule {
    fn from(rule: &ScoreRule) -> Self {
        Self {
            label: rule.label,
            weight: rule.weight,
            explanation: rule.explanation,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoosterRole {
    ColdBooster,
    HotBooster,
    OlfactiveAmplifier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booster {
    pub molecule_id: String,
    pub name: String,
    pub percentage: f64,
    pub roles: Vec<BoosterRole>,
    /// Share of the total cold throw, in percent.
    pub cold_share: f64,
    /// Share of the total hot throw, in percent.
    pub hot_share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockerProblem {
    Trapped,
    Incompatible,
    CrystallizationRisk,
    TooPolar,
    ConsumedTooFast,
}

impl fmt::Display for BlockerProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BlockerProblem::Trapped => "trapped in the wax",
            BlockerProblem::Incompatible => "incompatible with the wax",
            BlockerProblem::CrystallizationRisk => "crystallization risk",
            BlockerProblem::TooPolar => "too polar for the wax",
            BlockerProblem::ConsumedTooFast => "consumed too fast",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    Blocking,
    Brake,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Blocker {
    pub molecule_id: String,
    pub name: String,
    pub percentage: f64,
    pub problems: Vec<BlockerProblem>,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub score_cold: f64,
    pub score_hot: f64,
    pub score_overall: f64,
    pub verdict_cold: Verdict,
    pub verdict_hot: Verdict,
    pub cold_rules: Vec<AppliedRule>,
    pub hot_rules: Vec<AppliedRule>,
    pub boosters: Vec<Booster>,
    pub blockers: Vec<Blocker>,
    pub conclusion: String,
}

fn volatile_share(p: &ThrowProfile) -> f64 {
    p.percentage_where(|m| m.register == Register::Top && m.percentage > COLD_COUNTED_MIN_PCT)
}

fn heavy_share(p: &ThrowProfile) -> f64 {
    p.percentage_where(|m| m.register == Register::Base && m.percentage > HOT_COUNTED_MIN_PCT)
}

fn powerful_count(p: &ThrowProfile) -> usize {
    p.molecules
        .iter()
        .filter(|m| {
            m.percentage > COLD_COUNTED_MIN_PCT
                && m.odor_threshold.is_some_and(|t| t < POWERFUL_THRESHOLD)
        })
        .count()
}

fn trapped_count(p: &ThrowProfile) -> usize {
    p.molecules
        .iter()
        .filter(|m| m.behavior == Behavior::Inert && m.percentage > HOT_COUNTED_MIN_PCT)
        .count()
}

#[rustfmt::skip]
pub static SCORE_RULES: &[ScoreRule] = &[
    // Cold throw
    ScoreRule { axis: Axis::Cold, label: "Volatile molecules", weight: 2.0,
        explanation: "More than 30 % light top notes reach a perceptible vapor pressure at room temperature.",
        predicate: |p| volatile_share(p) > 30.0 },
    ScoreRule { axis: Axis::Cold, label: "Volatile molecules", weight: 1.0,
        explanation: "A fair share of top notes evaporates at room temperature.",
        predicate: |p| { let share = volatile_share(p); share > 15.0 && share <= 30.0 } },
    ScoreRule { axis: Axis::Cold, label: "Volatile molecules", weight: -1.0,
        explanation: "Few top notes; most molecules stay below the perception threshold at room temperature.",
        predicate: |p| (5.0..10.0).contains(&volatile_share(p)) },
    ScoreRule { axis: Axis::Cold, label: "Volatile molecules", weight: -2.0,
        explanation: "Almost no top notes; the cold candle has little to release.",
        predicate: |p| volatile_share(p) < 5.0 },
    ScoreRule { axis: Axis::Cold, label: "Surface migration", weight: 1.0,
        explanation: "The crystal structure lets fragrance migrate to the solid surface (Fick).",
        predicate: |p| p.wax.surface_migration > 0.7 },
    ScoreRule { axis: Axis::Cold, label: "Surface migration", weight: -2.0,
        explanation: "Fragrance is locked in crystalline pockets and barely reaches the surface.",
        predicate: |p| p.wax.surface_migration < 0.3 },
    ScoreRule { axis: Axis::Cold, label: "Powerful molecules", weight: 1.0,
        explanation: "Several molecules with an odor threshold below 10 µg/m³ are perceived at trace levels (Weber-Fechner).",
        predicate: |p| powerful_count(p) >= POWERFUL_MIN_COUNT },
    ScoreRule { axis: Axis::Cold, label: "Aromatic aldehydes", weight: -1.0,
        explanation: "Aromatic aldehydes above 5 % tend to crystallize at the cold surface.",
        predicate: |p| p.molecules.iter().any(|m| m.aromatic_aldehyde && m.percentage > 5.0) },
    ScoreRule { axis: Axis::Cold, label: "Wax incompatibility", weight: -1.0,
        explanation: "A molecule far from the wax solubility parameter separates from the matrix (Hildebrand).",
        predicate: |p| p.molecules.iter().any(|m| m.is_incompatible() && m.percentage > 3.0) },

    // Hot throw
    ScoreRule { axis: Axis::Hot, label: "Heart and base notes", weight: 2.0,
        explanation: "A large reservoir of heavy molecules sustains release during the burn.",
        predicate: |p| heavy_share(p) > 30.0 },
    ScoreRule { axis: Axis::Hot, label: "Heart and base notes", weight: 1.0,
        explanation: "A fair reservoir of heavy molecules feeds the melt pool.",
        predicate: |p| { let share = heavy_share(p); share > 15.0 && share <= 30.0 } },
    ScoreRule { axis: Axis::Hot, label: "Heart and base notes", weight: -1.0,
        explanation: "Few heavy molecules; hot throw may fade early in the burn.",
        predicate: |p| heavy_share(p) < 5.0 },
    ScoreRule { axis: Axis::Hot, label: "Melt pool viscosity", weight: 1.0,
        explanation: "A fluid melt pool lets molecules diffuse quickly to the surface (Stokes-Einstein).",
        predicate: |p| p.wax.viscosity < 10.0 },
    ScoreRule { axis: Axis::Hot, label: "Melt pool viscosity", weight: -1.0,
        explanation: "A viscous melt pool slows diffusion toward the surface.",
        predicate: |p| p.wax.viscosity > 15.0 && p.wax.viscosity <= 25.0 },
    ScoreRule { axis: Axis::Hot, label: "Melt pool viscosity", weight: -2.0,
        explanation: "A very viscous melt pool strongly limits diffusion.",
        predicate: |p| p.wax.viscosity > 25.0 },
    ScoreRule { axis: Axis::Hot, label: "Crystalline release", weight: 1.0,
        explanation: "Open intercrystalline channels expose the fragrance to the melt pool.",
        predicate: |p| p.wax.channel_factor > 0.8 },
    ScoreRule { axis: Axis::Hot, label: "Crystalline release", weight: -2.0,
        explanation: "A dense crystal network keeps most of the fragrance out of the melt pool.",
        predicate: |p| p.wax.channel_factor < 0.3 },
    ScoreRule { axis: Axis::Hot, label: "Melt pool temperature", weight: 1.0,
        explanation: "A hot melt pool raises the vapor pressure of heavy molecules (Clausius-Clapeyron).",
        predicate: |p| p.wax.melt_pool_temperature >= 58.0 },
    ScoreRule { axis: Axis::Hot, label: "Melt pool temperature", weight: -1.0,
        explanation: "A cool melt pool leaves heavy molecules with too little vapor pressure.",
        predicate: |p| p.wax.melt_pool_temperature < 45.0 },
    ScoreRule { axis: Axis::Hot, label: "Trapped molecules", weight: -1.0,
        explanation: "Several molecules contribute neither cold nor hot throw.",
        predicate: |p| trapped_count(p) >= TRAPPED_MIN_COUNT },
];

/// Scores cold and hot throw on a 0 to 10 scale from a throw profile.
#[instrument(skip_all, name = "scoring_task", fields(wax = %profile.wax.key))]
pub fn run(profile: &ThrowProfile) -> ScoreReport {
    let (score_cold, cold_rules) = score_axis(profile, Axis::Cold);
    let (score_hot, hot_rules) = score_axis(profile, Axis::Hot);
    let score_overall = round1((score_cold + score_hot) / 2.0);

    let boosters = boosters(profile);
    let blockers = blockers(profile);

    debug!(
        score_cold,
        score_hot,
        boosters = boosters.len(),
        blockers = blockers.len(),
        "Throw scored."
    );

    let conclusion = conclusion(profile, score_cold, score_hot, &boosters, &blockers);
    ScoreReport {
        score_cold,
        score_hot,
        score_overall,
        verdict_cold: Verdict::from_score(score_cold),
        verdict_hot: Verdict::from_score(score_hot),
        cold_rules,
        hot_rules,
        boosters,
        blockers,
        conclusion,
    }
}

fn score_axis(profile: &ThrowProfile, axis: Axis) -> (f64, Vec<AppliedRule>) {
    let applied: Vec<AppliedRule> = SCORE_RULES
        .iter()
        .filter(|rule| rule.axis == axis && (rule.predicate)(profile))
        .map(AppliedRule::from)
        .collect();
    let raw = BASE_SCORE + applied.iter().map(|r| r.weight).sum::<f64>();
    (round1(raw.clamp(0.0, MAX_SCORE)), applied)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn share(part: f64, total: f64) -> f64 {
    if total > 0.0 { part / total } else { 0.0 }
}

fn boosters(profile: &ThrowProfile) -> Vec<Booster> {
    let total_cold = profile.cold_throw_index;
    let total_hot = profile.hot_throw_index;

    profile
        .molecules
        .iter()
        .filter(|m| m.percentage >= BOOSTER_MIN_PCT)
        .filter_map(|m| {
            let cold_share = share(m.cold_contribution, total_cold);
            let hot_share = share(m.hot_contribution, total_hot);
            let mut roles = Vec::new();
            if cold_share > BOOSTER_SHARE {
                roles.push(BoosterRole::ColdBooster);
            }
            if hot_share > BOOSTER_SHARE {
                roles.push(BoosterRole::HotBooster);
            }
            if m.odor_threshold.is_some_and(|t| t < AMPLIFIER_THRESHOLD) {
                roles.push(BoosterRole::OlfactiveAmplifier);
            }
            (!roles.is_empty()).then(|| Booster {
                molecule_id: m.id.clone(),
                name: m.name.clone(),
                percentage: m.percentage,
                roles,
                cold_share: (cold_share * 100.0).round(),
                hot_share: (hot_share * 100.0).round(),
            })
        })
        .collect()
}

fn blocker_problems(m: &MoleculeThrow, total_cold: f64, total_hot: f64) -> Vec<BlockerProblem> {
    let mut problems = Vec::new();
    if m.behavior == Behavior::Inert {
        problems.push(BlockerProblem::Trapped);
    }
    if m.is_incompatible() {
        problems.push(BlockerProblem::Incompatible);
    }
    if m.aromatic_aldehyde && m.percentage > 3.0 {
        problems.push(BlockerProblem::CrystallizationRisk);
    }
    if m.logp.is_some_and(|l| l < 1.5) && m.percentage > 3.0 {
        problems.push(BlockerProblem::TooPolar);
    }
    if total_hot > 0.0
        && m.cold_contribution > total_cold * CONSUMED_COLD_SHARE
        && m.hot_contribution < total_hot * CONSUMED_HOT_SHARE
    {
        problems.push(BlockerProblem::ConsumedTooFast);
    }
    problems
}

fn blockers(profile: &ThrowProfile) -> Vec<Blocker> {
    profile
        .molecules
        .iter()
        .filter(|m| m.percentage >= BLOCKER_MIN_PCT)
        .filter_map(|m| {
            let problems =
                blocker_problems(m, profile.cold_throw_index, profile.hot_throw_index);
            if problems.is_empty() {
                return None;
            }
            let severity = if problems
                .iter()
                .any(|p| matches!(p, BlockerProblem::Trapped | BlockerProblem::Incompatible))
            {
                Severity::Blocking
            } else {
                Severity::Brake
            };
            Some(Blocker {
                molecule_id: m.id.clone(),
                name: m.name.clone(),
                percentage: m.percentage,
                problems,
                severity,
            })
        })
        .collect()
}

fn conclusion(
    profile: &ThrowProfile,
    cold: f64,
    hot: f64,
    boosters: &[Booster],
    blockers: &[Blocker],
) -> String {
    let mut parts = Vec::new();
    let headline = if cold >= EXCELLENT_MIN && hot >= EXCELLENT_MIN {
        format!(
            "This fragrance suits {}: its molecular profile diffuses well both cold and hot.",
            profile.wax.name
        )
    } else if cold >= EXCELLENT_MIN && hot < FAIR_MIN {
        "Strong cold throw from volatile top notes, but hot throw is weak: the candle smells good \
         unlit and disappoints when burning."
            .to_string()
    } else if cold < FAIR_MIN && hot >= EXCELLENT_MIN {
        "Good hot throw but almost no cold throw: the unlit candle gives little scent on the shelf."
            .to_string()
    } else if cold < FAIR_MIN && hot < FAIR_MIN {
        "Weak throw overall in this wax: the fragrance is either trapped by the crystal structure \
         or too heavy to evaporate at these temperatures."
            .to_string()
    } else {
        "Average throw profile; there is room for optimization.".to_string()
    };
    parts.push(headline);

    if !boosters.is_empty() {
        let names: Vec<&str> = boosters.iter().take(3).map(|b| b.name.as_str()).collect();
        parts.push(format!("Driving molecules: {}.", names.join(", ")));
    }
    let blocking: Vec<&str> = blockers
        .iter()
        .filter(|b| b.severity == Severity::Blocking)
        .map(|b| b.name.as_str())
        .collect();
    if !blocking.is_empty() {
        parts.push(format!("Warning: blocking molecules {}.", blocking.join(", ")));
    }
    parts.join(" ")
}
