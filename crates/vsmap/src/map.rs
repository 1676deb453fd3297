//! Pipeline results: the analysed steps and the finished map.

use vsmap_core::{
    draw::Canvas,
    model::{ProcessStep, StepId, WasteScore},
};

use crate::{layout::Diagram, metrics::LeadTime, observe::Observation};

/// Steps with their waste scores and flow metrics.
///
/// `scores[i]` always belongs to `steps[i]`.
#[derive(Debug, Clone)]
pub struct Analysis {
    steps: Vec<ProcessStep>,
    scores: Vec<WasteScore>,
    lead_time: LeadTime,
    observations: Vec<Observation>,
}

impl Analysis {
    pub(crate) fn new(steps: Vec<ProcessStep>, scores: Vec<WasteScore>, lead_time: LeadTime) -> Self {
        debug_assert_eq!(steps.len(), scores.len());
        Self {
            steps,
            scores,
            lead_time,
            observations: Vec::new(),
        }
    }

    pub(crate) fn with_observations(mut self, observations: Vec<Observation>) -> Self {
        self.observations = observations;
        self
    }

    pub fn steps(&self) -> &[ProcessStep] {
        &self.steps
    }

    pub fn scores(&self) -> &[WasteScore] {
        &self.scores
    }

    pub fn lead_time(&self) -> &LeadTime {
        &self.lead_time
    }

    /// Ranked observations, highest priority first.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn step(&self, id: StepId) -> Option<&ProcessStep> {
        self.steps.iter().find(|step| step.id() == id)
    }

    pub fn score(&self, id: StepId) -> Option<&WasteScore> {
        self.scores.iter().find(|score| score.step() == id)
    }

    /// Steps paired with their scores, in step order.
    pub fn scored_steps(&self) -> impl Iterator<Item = (&ProcessStep, &WasteScore)> {
        self.steps.iter().zip(&self.scores)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// A value stream map ready for export.
#[derive(Debug, Clone)]
pub struct ValueStreamMap {
    analysis: Analysis,
    diagram: Diagram,
    canvas: Canvas,
}

impl ValueStreamMap {
    pub(crate) fn new(analysis: Analysis, diagram: Diagram, canvas: Canvas) -> Self {
        Self {
            analysis,
            diagram,
            canvas,
        }
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// The drawn map, shared by every export format.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn title(&self) -> &str {
        self.diagram.title()
    }
}
