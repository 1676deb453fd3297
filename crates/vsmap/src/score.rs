//! Heuristic waste scoring of process steps.
//!
//! Each step gets a score from 0 to 10: a weighted sum of normalized waste
//! factors. A factor is 0 at or below its threshold, 1 at or above its
//! saturation point and linear in between.
//!
//! | Category       | Input                       | Weight |
//! |----------------|-----------------------------|--------|
//! | Waiting        | wait time                   | 4      |
//! | Defects        | defect rate                 | 3      |
//! | Inventory      | inventory                   | 2      |
//! | Overproduction | inventory, Push steps only  | 1      |

use log::{debug, trace};

use vsmap_core::model::{Confidence, Factor, ProcessStep, WasteCategory, WasteScore};

use crate::config::ScoringConfig;

pub const WAITING_WEIGHT: f64 = 4.0;
pub const DEFECTS_WEIGHT: f64 = 3.0;
pub const INVENTORY_WEIGHT: f64 = 2.0;
pub const OVERPRODUCTION_WEIGHT: f64 = 1.0;

/// Highest possible score.
pub const MAX_SCORE: f64 = WAITING_WEIGHT + DEFECTS_WEIGHT + INVENTORY_WEIGHT + OVERPRODUCTION_WEIGHT;

/// Threshold and saturation of one factor.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ramp {
    threshold: f64,
    saturation: f64,
}

impl Ramp {
    pub(crate) fn new((threshold, saturation): (f64, f64)) -> Self {
        Self {
            threshold,
            saturation,
        }
    }

    /// Maps `value` onto `0.0..=1.0`.
    pub(crate) fn normalize(self, value: f64) -> f64 {
        if value <= self.threshold {
            0.0
        } else if value >= self.saturation {
            1.0
        } else {
            (value - self.threshold) / (self.saturation - self.threshold)
        }
    }
}

/// Scores process steps against a set of thresholds.
///
/// # Example
///
/// ```
/// # use vsmap::{config::ScoringConfig, score::WasteScorer};
/// # use vsmap_core::model::{FlowType, ProcessStep, StepId};
/// let scorer = WasteScorer::new(&ScoringConfig::default());
/// let step = ProcessStep::new(StepId::new(2), "B")
///     .with_wait_time(Some(20.0))
///     .with_defect_rate(Some(0.2))
///     .with_inventory(Some(50.0))
///     .with_flow(FlowType::Pull);
///
/// assert_eq!(scorer.score(&step).score(), 6.29);
/// ```
#[derive(Debug, Clone)]
pub struct WasteScorer {
    wait: Ramp,
    defect: Ramp,
    inventory: Ramp,
}

impl WasteScorer {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            wait: Ramp::new(config.wait()),
            defect: Ramp::new(config.defect()),
            inventory: Ramp::new(config.inventory()),
        }
    }

    /// Scores one step.
    pub fn score(&self, step: &ProcessStep) -> WasteScore {
        let wait = usable(step.wait_time());
        let defect = usable(step.defect_rate()).filter(|rate| *rate <= 1.0);
        let inventory = usable(step.inventory());

        let mut factors = Vec::new();
        let mut add = |category, ramp: Ramp, value: Option<f64>, weight: f64| {
            let points = value.map_or(0.0, |v| ramp.normalize(v) * weight);
            if points > 0.0 {
                factors.push(Factor::new(category, points));
            }
        };

        add(WasteCategory::Waiting, self.wait, wait, WAITING_WEIGHT);
        add(WasteCategory::Defects, self.defect, defect, DEFECTS_WEIGHT);
        add(WasteCategory::Inventory, self.inventory, inventory, INVENTORY_WEIGHT);
        if !step.flow().is_pull() {
            add(
                WasteCategory::Overproduction,
                self.inventory,
                inventory,
                OVERPRODUCTION_WEIGHT,
            );
        }

        let total: f64 = factors.iter().map(Factor::points).sum();
        let score = round2(total.clamp(0.0, MAX_SCORE));
        let confidence = confidence(step);

        debug!(step = step.name(), score = score, confidence = confidence.name(); "Step scored");
        WasteScore::new(step.id(), score, confidence, factors)
    }

    /// Scores every step, keeping their order.
    pub fn score_all(&self, steps: &[ProcessStep]) -> Vec<WasteScore> {
        let scores: Vec<_> = steps.iter().map(|step| self.score(step)).collect();
        trace!(scores:?; "Waste scores");
        scores
    }
}

impl Default for WasteScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default())
    }
}

/// How complete the scoring inputs of `step` are.
///
/// Wait time, defect rate and inventory are scoring inputs; one is defaulted
/// when missing or out of range (negative, or a defect rate above 1). Cycle
/// time and notes are optional fields.
///
/// - `Low`: two or more scoring inputs defaulted
/// - `Medium`: one scoring input defaulted, or an optional field missing
/// - `High`: everything present and in range
pub fn confidence(step: &ProcessStep) -> Confidence {
    let inputs = [
        usable(step.wait_time()).is_some(),
        usable(step.defect_rate()).is_some_and(|rate| rate <= 1.0),
        usable(step.inventory()).is_some(),
    ];
    let defaulted = inputs.iter().filter(|present| !**present).count();
    let optional_complete = step.cycle_time().is_some() && step.notes().is_some();

    match defaulted {
        0 if optional_complete => Confidence::High,
        0 | 1 => Confidence::Medium,
        _ => Confidence::Low,
    }
}

/// Colour band of a score, used to fill material boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// Below 3
    Low,
    /// From 3 up to 6
    Medium,
    /// 6 or more
    High,
}

impl ScoreBand {
    pub fn of(score: f64) -> Self {
        if score < 3.0 {
            Self::Low
        } else if score < 6.0 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

pub(crate) fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= 0.0)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use vsmap_core::model::{FlowType, StepId};

    use super::*;

    fn step(wait: f64, defect: f64, inventory: f64, flow: FlowType) -> ProcessStep {
        ProcessStep::new(StepId::new(1), "Step")
            .with_cycle_time(Some(1.0))
            .with_wait_time(Some(wait))
            .with_defect_rate(Some(defect))
            .with_inventory(Some(inventory))
            .with_flow(flow)
    }

    #[test]
    fn test_ramp_normalize() {
        let ramp = Ramp::new((10.0, 20.0));
        assert_approx_eq!(f64, ramp.normalize(5.0), 0.0);
        assert_approx_eq!(f64, ramp.normalize(10.0), 0.0);
        assert_approx_eq!(f64, ramp.normalize(15.0), 0.5);
        assert_approx_eq!(f64, ramp.normalize(25.0), 1.0);
    }

    #[test]
    fn test_scenario_scores() {
        let scorer = WasteScorer::default();
        let a = scorer.score(&step(2.0, 0.01, 5.0, FlowType::Push));
        let b = scorer.score(&step(20.0, 0.2, 50.0, FlowType::Pull));
        let c = scorer.score(&step(1.0, 0.0, 0.0, FlowType::Push));

        assert_approx_eq!(f64, a.score(), 0.0);
        assert_approx_eq!(f64, b.score(), 6.29);
        assert_approx_eq!(f64, c.score(), 0.0);
        assert_eq!(
            b.top_categories(2),
            vec![WasteCategory::Defects, WasteCategory::Waiting]
        );
        assert!(a.factors().is_empty());
    }

    #[test]
    fn test_overproduction_only_for_push() {
        let scorer = WasteScorer::default();
        let push = scorer.score(&step(0.0, 0.0, 100.0, FlowType::Push));
        let pull = scorer.score(&step(0.0, 0.0, 100.0, FlowType::Pull));

        assert_approx_eq!(f64, push.score(), 3.0);
        assert_approx_eq!(f64, pull.score(), 2.0);
        assert!(
            push.factors()
                .iter()
                .any(|f| f.category() == WasteCategory::Overproduction)
        );
    }

    #[test]
    fn test_saturated_step_scores_ten() {
        let scorer = WasteScorer::default();
        let worst = scorer.score(&step(500.0, 0.9, 1000.0, FlowType::Push));
        assert_approx_eq!(f64, worst.score(), MAX_SCORE);
        assert_eq!(worst.factors().len(), 4);
    }

    #[test]
    fn test_out_of_range_inputs_are_defaulted() {
        let scorer = WasteScorer::default();
        let odd = scorer.score(&step(-5.0, 1.5, 0.0, FlowType::Pull));
        assert_approx_eq!(f64, odd.score(), 0.0);
        assert_eq!(odd.confidence(), Confidence::Low);
    }

    #[test]
    fn test_confidence_levels() {
        let full = step(1.0, 0.0, 0.0, FlowType::Push).with_notes(Some("ok".to_string()));
        assert_eq!(confidence(&full), Confidence::High);

        let no_notes = step(1.0, 0.0, 0.0, FlowType::Push);
        assert_eq!(confidence(&no_notes), Confidence::Medium);

        let one_missing = full.clone().with_wait_time(None);
        assert_eq!(confidence(&one_missing), Confidence::Medium);

        let two_missing = one_missing.with_inventory(None);
        assert_eq!(confidence(&two_missing), Confidence::Low);
    }

    #[test]
    fn test_custom_thresholds() {
        let config: ScoringConfig =
            toml::from_str("wait_threshold = 0.0\nwait_saturation = 10.0\n").unwrap();
        let scorer = WasteScorer::new(&config);
        let scored = scorer.score(&step(5.0, 0.0, 0.0, FlowType::Pull));
        assert_approx_eq!(f64, scored.score(), 2.0);
    }

    #[test]
    fn test_score_band() {
        assert_eq!(ScoreBand::of(0.0), ScoreBand::Low);
        assert_eq!(ScoreBand::of(3.0), ScoreBand::Medium);
        assert_eq!(ScoreBand::of(6.29), ScoreBand::High);
    }

    fn optional_value() -> impl Strategy<Value = Option<f64>> {
        proptest::option::of(0.0f64..200.0)
    }

    proptest! {
        #[test]
        fn test_score_bounded_and_deterministic(
            wait in optional_value(),
            defect in proptest::option::of(0.0f64..1.0),
            inventory in optional_value(),
            pull in any::<bool>(),
        ) {
            let flow = if pull { FlowType::Pull } else { FlowType::Push };
            let step = ProcessStep::new(StepId::new(1), "S")
                .with_wait_time(wait)
                .with_defect_rate(defect)
                .with_inventory(inventory)
                .with_flow(flow);

            let scorer = WasteScorer::default();
            let first = scorer.score(&step);
            prop_assert!((0.0..=MAX_SCORE).contains(&first.score()));
            prop_assert_eq!(first, scorer.score(&step));
        }

        #[test]
        fn test_confidence_monotonic_in_completeness(
            wait in optional_value(),
            defect in proptest::option::of(0.0f64..1.0),
            inventory in optional_value(),
            cycle in optional_value(),
            notes in any::<bool>(),
            drop_field in 0usize..5,
        ) {
            let step = ProcessStep::new(StepId::new(1), "S")
                .with_wait_time(wait)
                .with_defect_rate(defect)
                .with_inventory(inventory)
                .with_cycle_time(cycle)
                .with_notes(notes.then(|| "note".to_string()));

            let reduced = match drop_field {
                0 => step.clone().with_wait_time(None),
                1 => step.clone().with_defect_rate(None),
                2 => step.clone().with_inventory(None),
                3 => step.clone().with_cycle_time(None),
                _ => step.clone().with_notes(None),
            };

            prop_assert!(confidence(&reduced) <= confidence(&step));
        }
    }
}
