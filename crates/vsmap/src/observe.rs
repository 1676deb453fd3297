//! Ranked waste observations.
//!
//! Every step is rated from 0 to 5 in each [`WasteCategory`]: the rating is
//! the normalized factor of the category scaled to 5. Transportation and
//! Motion come from the optional distance and walking columns and do not
//! count towards the waste score.
//!
//! A rated category becomes an [`Observation`] with a priority in percent:
//! the rating as a share of 5, discounted by how complete the step's input
//! was (High 100%, Medium 80%, Low 60%). Observations are ranked by priority,
//! then rating, then step and category order.

use std::cmp::Ordering;

use log::{debug, trace};

use vsmap_core::model::{Confidence, ProcessStep, StepId, WasteCategory, WasteScore};

use crate::{
    config::ScoringConfig,
    score::{self, Ramp, round2},
};

/// Highest rating of one category.
pub const MAX_RATING: f64 = 5.0;

/// One rated waste of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    step: StepId,
    category: WasteCategory,
    rating: f64,
    priority: f64,
    text: String,
}

impl Observation {
    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn category(&self) -> WasteCategory {
        self.category
    }

    /// Rating in `0.0..=5.0`, two decimals.
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Priority in percent.
    pub fn priority(&self) -> f64 {
        self.priority
    }

    /// One sentence describing what was seen.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn rank(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then(other.rating.total_cmp(&self.rating))
            .then(self.step.cmp(&other.step))
            .then(self.category.cmp(&other.category))
    }
}

/// Rates steps per waste category and writes observations.
///
/// # Example
///
/// ```
/// # use vsmap::{config::ScoringConfig, observe::ObservationEngine, score::WasteScorer};
/// # use vsmap_core::model::{ProcessStep, StepId};
/// let steps = vec![
///     ProcessStep::new(StepId::new(1), "Cut").with_walk_per_unit(Some(50.0)),
/// ];
/// let scores = WasteScorer::default().score_all(&steps);
/// let observations = ObservationEngine::new(&ScoringConfig::default(), "min")
///     .observe(&steps, &scores);
///
/// assert_eq!(observations.len(), 1);
/// assert_eq!(observations[0].text(), "Operators walk 50 m per unit at Cut");
/// ```
#[derive(Debug, Clone)]
pub struct ObservationEngine {
    wait: Ramp,
    defect: Ramp,
    inventory: Ramp,
    distance: Ramp,
    walk: Ramp,
    time_unit: String,
}

impl ObservationEngine {
    pub fn new(config: &ScoringConfig, time_unit: impl Into<String>) -> Self {
        Self {
            wait: Ramp::new(config.wait()),
            defect: Ramp::new(config.defect()),
            inventory: Ramp::new(config.inventory()),
            distance: Ramp::new(config.distance()),
            walk: Ramp::new(config.walk()),
            time_unit: time_unit.into(),
        }
    }

    /// Ranked observations of `steps`, highest priority first.
    ///
    /// `scores[i]` must belong to `steps[i]`.
    pub fn observe(&self, steps: &[ProcessStep], scores: &[WasteScore]) -> Vec<Observation> {
        let mut observations: Vec<Observation> = steps
            .iter()
            .zip(scores)
            .enumerate()
            .flat_map(|(index, (step, score))| {
                let previous = index.checked_sub(1).and_then(|i| steps.get(i));
                self.observe_step(step, score.confidence(), previous)
            })
            .collect();

        observations.sort_by(Observation::rank);
        debug!(observations = observations.len(); "Observations ranked");
        trace!(observations:?; "Observations");
        observations
    }

    fn observe_step(
        &self,
        step: &ProcessStep,
        confidence: Confidence,
        previous: Option<&ProcessStep>,
    ) -> Vec<Observation> {
        WasteCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let (value, ramp) = self.input(step, category)?;
                let rating = round2(ramp.normalize(value) * MAX_RATING);
                (rating > 0.0).then(|| Observation {
                    step: step.id(),
                    category,
                    rating,
                    priority: round2(rating / MAX_RATING * discount(confidence) * 100.0),
                    text: self.describe(step, category, value, previous),
                })
            })
            .collect()
    }

    /// The usable input of `category` and the ramp rating it.
    fn input(&self, step: &ProcessStep, category: WasteCategory) -> Option<(f64, Ramp)> {
        match category {
            WasteCategory::Waiting => score::usable(step.wait_time()).map(|v| (v, self.wait)),
            WasteCategory::Defects => score::usable(step.defect_rate())
                .filter(|rate| *rate <= 1.0)
                .map(|v| (v, self.defect)),
            WasteCategory::Inventory => {
                score::usable(step.inventory()).map(|v| (v, self.inventory))
            }
            WasteCategory::Overproduction => score::usable(step.inventory())
                .filter(|_| !step.flow().is_pull())
                .map(|v| (v, self.inventory)),
            WasteCategory::Transportation => {
                score::usable(step.distance()).map(|v| (v, self.distance))
            }
            WasteCategory::Motion => score::usable(step.walk_per_unit()).map(|v| (v, self.walk)),
        }
    }

    fn describe(
        &self,
        step: &ProcessStep,
        category: WasteCategory,
        value: f64,
        previous: Option<&ProcessStep>,
    ) -> String {
        let name = step.name();
        let value_text = number(value);
        match category {
            WasteCategory::Waiting => match previous {
                Some(previous) => format!(
                    "Material waits {value_text} {} between {} and {name}",
                    self.time_unit,
                    previous.name()
                ),
                None => format!("Material waits {value_text} {} before {name}", self.time_unit),
            },
            WasteCategory::Defects => {
                format!("{}% of {name} output is defective", number(value * 100.0))
            }
            WasteCategory::Inventory => format!("{value_text} units queue in front of {name}"),
            WasteCategory::Overproduction => {
                format!("{name} pushes {value_text} units downstream ahead of demand")
            }
            WasteCategory::Transportation => {
                format!("Material travels {value_text} m to reach {name}")
            }
            WasteCategory::Motion => format!("Operators walk {value_text} m per unit at {name}"),
        }
    }
}

/// Share of the priority kept at each confidence level.
fn discount(confidence: Confidence) -> f64 {
    match confidence {
        Confidence::High => 1.0,
        Confidence::Medium => 0.8,
        Confidence::Low => 0.6,
    }
}

/// Up to one decimal, without a trailing `.0`.
fn number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
