use super::comparison::WaxComparison;
use super::diagnostic::IssueKind;
use super::profile::{Balance, ThrowProfile};
use super::scoring::{Blocker, ScoreReport, Severity};
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, instrument};

const GOOD_SCORE: f64 = 7.0;
const TARGET_SCORE: f64 = 6.0;
const OBJECTIVE_STEP: f64 = 3.0;

const BETTER_COLD_FACTOR: f64 = 1.5;
const BETTER_HOT_FACTOR: f64 = 2.0;
const LOW_SURFACE_MIGRATION: f64 = 0.6;
const HIGH_VISCOSITY_CST: f64 = 15.0;
const LOW_CHANNEL_FACTOR: f64 = 0.5;
const LOW_MELT_POOL_C: f64 = 55.0;
const MIN_COLD_LEANING_PCT: f64 = 10.0;
const MIN_HOT_LEANING_PCT: f64 = 5.0;

const MAX_SIMULATIONS: usize = 5;
const SIGNIFICANT_DELTA: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Focus {
    Maintenance,
    Cold,
    Hot,
    Global,
    Balance,
}

/// Urgency of an action; declared from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Critical,
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Objective {
    pub target: String,
    pub detail: String,
    pub goal_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Action {
    pub title: String,
    pub impact: String,
    pub explanation: String,
    pub expected_gain: Option<String>,
    pub priority: Priority,
}

impl Action {
    fn new(priority: Priority, title: impl Into<String>, impact: &str, explanation: String) -> Self {
        Self {
            title: title.into(),
            impact: impact.to_string(),
            explanation,
            expected_gain: None,
            priority,
        }
    }

    fn gain(mut self, gain: &str) -> Self {
        self.expected_gain = Some(gain.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Improvement {
    Significant,
    Slight,
    Neutral,
    Degradation,
}

impl Improvement {
    pub fn from_delta(delta: i32) -> Self {
        if delta > SIGNIFICANT_DELTA {
            Improvement::Significant
        } else if delta > 0 {
            Improvement::Slight
        } else if delta == 0 {
            Improvement::Neutral
        } else {
            Improvement::Degradation
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaxSimulation {
    pub wax: String,
    pub name: String,
    pub cold_score: i32,
    pub hot_score: i32,
    pub total_score: i32,
    pub delta: i32,
    pub improvement: Improvement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationPlan {
    pub focus: Focus,
    pub objectives: Vec<Objective>,
    pub wax_actions: Vec<Action>,
    pub process_actions: Vec<Action>,
    pub formulation_actions: Vec<Action>,
    pub simulations: Vec<WaxSimulation>,
}

/// Maps a throw index onto a 0 to 100 scale, one decade per 20 points.
pub fn normalized_score(value: f64) -> i32 {
    if value <= 0.0 {
        return 0;
    }
    ((value.log10() + 6.0) * 20.0).round().clamp(0.0, 100.0) as i32
}

fn total_score(profile: &ThrowProfile) -> i32 {
    let sum = normalized_score(profile.cold_throw_index) + normalized_score(profile.hot_throw_index);
    (f64::from(sum) / 2.0).round() as i32
}

#[instrument(skip_all, name = "optimization_task", fields(wax = %profile.wax.key))]
pub fn run(
    profile: &ThrowProfile,
    scores: &ScoreReport,
    comparison: Option<&WaxComparison>,
) -> OptimizationPlan {
    let (focus, objectives) = objectives(scores);

    let mut wax_actions = wax_actions(profile, scores, comparison);
    let mut process_actions = process_actions(profile, scores);
    let mut formulation_actions = formulation_actions(profile, scores);
    for group in [&mut wax_actions, &mut process_actions, &mut formulation_actions] {
        group.sort_by_key(|a| a.priority);
    }

    let simulations = comparison
        .map(|c| simulations(profile, c))
        .unwrap_or_default();

    debug!(
        ?focus,
        wax = wax_actions.len(),
        process = process_actions.len(),
        formulation = formulation_actions.len(),
        "Optimization plan assembled."
    );

    OptimizationPlan {
        focus,
        objectives,
        wax_actions,
        process_actions,
        formulation_actions,
        simulations,
    }
}

fn objectives(scores: &ScoreReport) -> (Focus, Vec<Objective>) {
    let cold = scores.score_cold;
    let hot = scores.score_hot;

    if cold >= GOOD_SCORE && hot >= GOOD_SCORE {
        return (
            Focus::Maintenance,
            vec![Objective {
                target: "Maintain performance".to_string(),
                detail: "The candle is already well optimized; only minor adjustments are suggested."
                    .to_string(),
                goal_score: None,
            }],
        );
    }

    let mut focus = Focus::Maintenance;
    let mut objectives = Vec::new();
    if cold < TARGET_SCORE {
        focus = Focus::Cold;
        objectives.push(Objective {
            target: "Improve cold throw".to_string(),
            detail: format!(
                "Current score {cold}/10: the unlit candle gives too little scent on the shelf."
            ),
            goal_score: Some((cold + OBJECTIVE_STEP).min(10.0)),
        });
    }
    if hot < TARGET_SCORE {
        focus = if cold < TARGET_SCORE { Focus::Global } else { Focus::Hot };
        objectives.push(Objective {
            target: "Improve hot throw".to_string(),
            detail: format!("Current score {hot}/10: the fragrance disappoints when burning."),
            goal_score: Some((hot + OBJECTIVE_STEP).min(10.0)),
        });
    }
    if cold >= TARGET_SCORE && hot >= TARGET_SCORE && scores.score_overall < GOOD_SCORE {
        focus = Focus::Balance;
        objectives.push(Objective {
            target: "Balance cold and hot throw".to_string(),
            detail: "Scores are fair but not optimal; fine-tuning is possible.".to_string(),
            goal_score: None,
        });
    }
    (focus, objectives)
}

fn wax_actions(
    profile: &ThrowProfile,
    scores: &ScoreReport,
    comparison: Option<&WaxComparison>,
) -> Vec<Action> {
    let wax = &profile.wax;
    let mut actions = Vec::new();
    let alternatives = move || {
        comparison
            .into_iter()
            .flat_map(|c| c.profiles.iter())
            .filter(move |p| p.wax.key != wax.key)
    };

    if scores.score_cold < TARGET_SCORE {
        let best_cold =
            alternatives().max_by(|a, b| a.cold_throw_index.total_cmp(&b.cold_throw_index));
        if let Some(best) = best_cold
            .filter(|b| b.cold_throw_index > profile.cold_throw_index * BETTER_COLD_FACTOR)
        {
            actions.push(
                Action::new(
                    Priority::High,
                    format!("Blend toward {}", best.wax.name),
                    "Stronger cold throw",
                    format!(
                        "{} reaches a cold throw index of {:.1e} against {:.1e} in the current wax \
                         (surface migration {:.2}).",
                        best.wax.name,
                        best.cold_throw_index,
                        profile.cold_throw_index,
                        best.wax.surface_migration
                    ),
                )
                .gain("+1 to +2 cold points"),
            );
        }
        if wax.surface_migration < LOW_SURFACE_MIGRATION {
            actions.push(
                Action::new(
                    Priority::Medium,
                    "Improve surface migration",
                    "Releases fragrance at the solid surface",
                    format!(
                        "Surface migration is {:.2}; the {} crystal structure holds molecules in \
                         crystalline pockets. A wax with open macrocrystals migrates better (Fick).",
                        wax.surface_migration, wax.crystal_structure
                    ),
                )
                .gain("+1 to +3 cold points"),
            );
        }
    }

    if scores.score_hot < TARGET_SCORE {
        if wax.viscosity > HIGH_VISCOSITY_CST {
            actions.push(
                Action::new(
                    Priority::High,
                    "Reduce melt pool viscosity",
                    "Faster diffusion in the melt pool",
                    format!(
                        "Viscosity is {:.1} cSt; above {HIGH_VISCOSITY_CST} cSt diffusion slows \
                         sharply (Stokes-Einstein). A 15 to 20 % share of a fluid wax brings it down.",
                        wax.viscosity
                    ),
                )
                .gain("+1 to +2 hot points"),
            );
        }
        if wax.channel_factor < LOW_CHANNEL_FACTOR {
            actions.push(
                Action::new(
                    Priority::Medium,
                    "Improve crystalline release",
                    "Lets fragrance escape into the melt pool",
                    format!(
                        "Only {:.0} % of the fragrance is released on melting; the crystal network \
                         keeps the rest trapped.",
                        wax.channel_factor * 100.0
                    ),
                )
                .gain("+1 hot point"),
            );
        }
        let best_hot =
            alternatives().max_by(|a, b| a.hot_throw_index.total_cmp(&b.hot_throw_index));
        if let Some(best) =
            best_hot.filter(|b| b.hot_throw_index > profile.hot_throw_index * BETTER_HOT_FACTOR)
        {
            actions.push(
                Action::new(
                    Priority::High,
                    format!("Blend toward {}", best.wax.name),
                    "Stronger hot throw",
                    format!(
                        "{} reaches a hot throw index of {:.1e} against {:.1e} in the current wax.",
                        best.wax.name, best.hot_throw_index, profile.hot_throw_index
                    ),
                )
                .gain("Depends on the blend ratio"),
            );
        }
    }

    match profile.balance {
        Balance::WeakOverall => {
            if let Some(best) = comparison
                .and_then(|c| c.best_balance_profile())
                .filter(|b| b.wax.key != wax.key)
            {
                actions.push(Action::new(
                    Priority::Critical,
                    format!("Switch to {}", best.wax.name),
                    "Restores a usable throw",
                    format!(
                        "Throw is almost zero in the current wax; {} gives the most balanced profile \
                         for this fragrance.",
                        best.wax.name
                    ),
                ));
            }
        }
        Balance::ColdDominant => actions.push(
            Action::new(
                Priority::Medium,
                "Add about 5 % microcrystalline wax",
                "Holds volatile notes for the burn",
                "Microcrystalline chains slow the surface depletion of light top notes so more of \
                 them remain for the melt pool."
                    .to_string(),
            )
            .gain("+0.5 to +1 hot point"),
        ),
        Balance::HotDominant => actions.push(
            Action::new(
                Priority::Medium,
                "Add 5 to 8 % coconut wax",
                "Raises surface migration",
                "Coconut wax is partly liquid at room temperature and carries fragrance to the \
                 surface of the unlit candle."
                    .to_string(),
            )
            .gain("+1 cold point"),
        ),
        Balance::Balanced => {}
    }

    actions
}

fn process_actions(profile: &ThrowProfile, scores: &ScoreReport) -> Vec<Action> {
    let mut actions = Vec::new();
    if scores.score_hot < GOOD_SCORE && profile.wax.melt_pool_temperature < LOW_MELT_POOL_C {
        actions.push(
            Action::new(
                Priority::Medium,
                "Extend the cure",
                "Better hot throw",
                "Low-melting waxes need a longer cure for fragrance to settle in the crystal \
                 matrix; going from 7 to 14 days noticeably improves hot throw."
                    .to_string(),
            )
            .gain("+1 hot point"),
        );
    }
    if scores.score_cold < GOOD_SCORE {
        actions.push(
            Action::new(
                Priority::Medium,
                "Cool slowly",
                "Crystal structure favorable to cold throw",
                "Slow cooling at room temperature grows ordered macrocrystals with wide \
                 intercrystalline channels through which fragrance reaches the surface."
                    .to_string(),
            )
            .gain("+0.5 to +1 cold point"),
        );
    }
    actions
}

fn blocker_action(blocker: &Blocker) -> Action {
    Action::new(
        Priority::High,
        format!("Reduce or replace {} ({:.1} %)", blocker.name, blocker.percentage),
        "Removes a throw blocker",
        format!(
            "Problems found: {}. The molecule takes up volume in the formula without \
             contributing to throw.",
            blocker.problems.iter().join(", ")
        ),
    )
}

fn formulation_actions(profile: &ThrowProfile, scores: &ScoreReport) -> Vec<Action> {
    let mut actions: Vec<Action> = scores
        .blockers
        .iter()
        .filter(|b| b.severity == Severity::Blocking)
        .map(blocker_action)
        .collect();

    let cold_leaning = profile.percentage_where(|m| m.behavior.leans_cold());
    if scores.score_cold < TARGET_SCORE && cold_leaning < MIN_COLD_LEANING_PCT {
        actions.push(
            Action::new(
                Priority::High,
                "Add 3 to 5 % volatile top notes",
                "Stronger cold throw",
                format!(
                    "Only {cold_leaning:.1} % of the formula contributes to cold throw. Light \
                     terpenes (limonene, linalool) or light aldehydes lift the unlit candle."
                ),
            )
            .gain("+1 to +2 cold points"),
        );
    }
    let hot_leaning = profile.percentage_where(|m| m.behavior.leans_hot());
    if scores.score_hot < TARGET_SCORE && hot_leaning < MIN_HOT_LEANING_PCT {
        actions.push(
            Action::new(
                Priority::High,
                "Strengthen base notes",
                "Better hot throw and tenacity",
                format!(
                    "Only {hot_leaning:.1} % of the formula carries the hot throw. Musks and woody \
                     notes sustain the fragrance during the burn."
                ),
            )
            .gain("+1 hot point"),
        );
    }

    for issue in &profile.diagnostic.molecule_issues {
        if let Some(fix) = &issue.formulation_fix {
            let priority = if issue.kind == IssueKind::Trapped {
                Priority::High
            } else {
                Priority::Medium
            };
            actions.push(Action::new(
                priority,
                format!("Adjust {} ({:.1} %)", issue.name, issue.percentage),
                "Addresses a molecule-level issue",
                fix.clone(),
            ));
        }
    }

    if profile.balance == Balance::WeakOverall && profile.total_components_identified > 0 {
        actions.push(Action::new(
            Priority::High,
            "Raise the fragrance load to the safe maximum",
            "More fragrance available for release",
            "Throw is almost zero; increasing the load up to the computed maximum gives the \
             matrix more fragrance to release."
                .to_string(),
        ));
    }

    actions
}

fn simulations(profile: &ThrowProfile, comparison: &WaxComparison) -> Vec<WaxSimulation> {
    let current = total_score(profile);
    let mut simulations: Vec<WaxSimulation> = comparison
        .profiles
        .iter()
        .filter(|p| p.wax.key != profile.wax.key)
        .map(|p| {
            let total = total_score(p);
            let delta = total - current;
            WaxSimulation {
                wax: p.wax.key.clone(),
                name: p.wax.name.clone(),
                cold_score: normalized_score(p.cold_throw_index),
                hot_score: normalized_score(p.hot_throw_index),
                total_score: total,
                delta,
                improvement: Improvement::from_delta(delta),
            }
        })
        .collect();
    simulations.sort_by(|a, b| b.delta.cmp(&a.delta));
    simulations.truncate(MAX_SIMULATIONS);
    simulations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::component::Component;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::tasks::test_support::{molecule_db, registry};
    use crate::engine::tasks::{comparison, profile, scoring};
    use crate::engine::tasks::scoring::BlockerProblem;

    fn formula() -> Vec<Component> {
        vec![
            Component::fixed("78-70-6", 20.0),
            Component::fixed("5989-27-5", 10.0),
            Component::fixed("1222-05-5", 20.0),
            Component::fixed("77-53-2", 10.0),
        ]
    }

    fn plan_for(wax: &str, components: &[Component]) -> (ThrowProfile, ScoreReport, OptimizationPlan) {
        let registry = registry();
        let db = molecule_db();
        let profile = profile::run(components, &db, registry.get(wax).unwrap()).unwrap();
        let scores = scoring::run(&profile);
        let comparison =
            comparison::run(components, &db, &registry, &ProgressReporter::new()).unwrap();
        let plan = run(&profile, &scores, Some(&comparison));
        (profile, scores, plan)
    }

    #[test]
    fn normalized_score_maps_decades_to_twenty_points() {
        assert_eq!(normalized_score(0.0), 0);
        assert_eq!(normalized_score(-1.0), 0);
        assert_eq!(normalized_score(1e-6), 0);
        assert_eq!(normalized_score(1e-3), 60);
        assert_eq!(normalized_score(1.0), 100);
        assert_eq!(normalized_score(50.0), 100);
    }

    #[test]
    fn improvement_classes_follow_delta() {
        assert_eq!(Improvement::from_delta(6), Improvement::Significant);
        assert_eq!(Improvement::from_delta(5), Improvement::Slight);
        assert_eq!(Improvement::from_delta(0), Improvement::Neutral);
        assert_eq!(Improvement::from_delta(-1), Improvement::Degradation);
    }

    #[test]
    fn priority_orders_critical_first() {
        let mut priorities = vec![Priority::Medium, Priority::Critical, Priority::High];
        priorities.sort();
        assert_eq!(priorities, vec![Priority::Critical, Priority::High, Priority::Medium]);
    }

    #[test]
    fn action_groups_are_sorted_by_priority() {
        for wax in ["paraffin", "soy", "microcrystalline", "coconut"] {
            let (_, _, plan) = plan_for(wax, &formula());
            for group in [&plan.wax_actions, &plan.process_actions, &plan.formulation_actions] {
                assert!(group.windows(2).all(|w| w[0].priority <= w[1].priority));
            }
        }
    }

    #[test]
    fn simulations_exclude_current_wax_and_are_sorted() {
        let (profile, _, plan) = plan_for("soy", &formula());
        assert!(plan.simulations.len() <= MAX_SIMULATIONS);
        assert!(plan.simulations.iter().all(|s| s.wax != profile.wax.key));
        assert!(plan.simulations.windows(2).all(|w| w[0].delta >= w[1].delta));
        for sim in &plan.simulations {
            assert_eq!(sim.improvement, Improvement::from_delta(sim.delta));
            assert!((0..=100).contains(&sim.total_score));
        }
    }

    #[test]
    fn soy_hot_throw_triggers_viscosity_action() {
        let (_, scores, plan) = plan_for("soy", &formula());
        if scores.score_hot < TARGET_SCORE {
            assert!(
                plan.wax_actions
                    .iter()
                    .any(|a| a.title == "Reduce melt pool viscosity")
            );
            assert!(matches!(plan.focus, Focus::Hot | Focus::Global));
        }
        let extends_cure = plan
            .process_actions
            .iter()
            .any(|a| a.title == "Extend the cure");
        assert!(extends_cure || scores.score_hot >= GOOD_SCORE);
    }

    #[test]
    fn focus_reflects_scores() {
        let (_, scores, plan) = plan_for("paraffin", &formula());
        let expected = match (scores.score_cold, scores.score_hot) {
            (c, h) if c >= GOOD_SCORE && h >= GOOD_SCORE => Focus::Maintenance,
            (c, h) if c < TARGET_SCORE && h < TARGET_SCORE => Focus::Global,
            (c, _) if c < TARGET_SCORE => Focus::Cold,
            (_, h) if h < TARGET_SCORE => Focus::Hot,
            _ if scores.score_overall < GOOD_SCORE => Focus::Balance,
            _ => Focus::Maintenance,
        };
        assert_eq!(plan.focus, expected);
    }

    #[test]
    fn plan_without_comparison_has_no_simulations() {
        let registry = registry();
        let db = molecule_db();
        let profile = profile::run(&formula(), &db, registry.get("paraffin").unwrap()).unwrap();
        let scores = scoring::run(&profile);
        let plan = run(&profile, &scores, None);
        assert!(plan.simulations.is_empty());
        assert!(
            plan.wax_actions
                .iter()
                .all(|a| !a.title.starts_with("Blend toward"))
        );
    }

    #[test]
    fn blocking_molecules_become_formulation_actions() {
        let (_, scores, plan) = plan_for(
            "paraffin",
            &[
                Component::fixed("5989-27-5", 30.0),
                Component::fixed("121-33-5", 8.0),
            ],
        );
        let blocking = scores
            .blockers
            .iter()
            .filter(|b| b.severity == Severity::Blocking)
            .count();
        let replace = plan
            .formulation_actions
            .iter()
            .filter(|a| a.title.starts_with("Reduce or replace"))
            .count();
        assert_eq!(blocking, replace);
    }

    #[test]
    fn blocker_explanation_lists_problems_in_plain_words() {
        let blocker = Blocker {
            molecule_id: "121-33-5".to_string(),
            name: "Vanillin".to_string(),
            percentage: 8.0,
            problems: vec![BlockerProblem::CrystallizationRisk, BlockerProblem::TooPolar],
            severity: Severity::Blocking,
        };
        let action = blocker_action(&blocker);
        assert_eq!(action.title, "Reduce or replace Vanillin (8.0 %)");
        assert_eq!(action.priority, Priority::High);
        assert!(
            action
                .explanation
                .starts_with("Problems found: crystallization risk, too polar for the wax.")
        );
        assert!(!action.explanation.contains("CrystallizationRisk"));
    }
}
