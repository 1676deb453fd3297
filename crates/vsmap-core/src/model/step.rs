//! Process steps and flow types.

use std::{fmt, str::FromStr};

/// Identity of a process step: its 1-based row position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(usize);

impl StepId {
    /// Creates an id from a 1-based position.
    ///
    /// # Panics
    ///
    /// Panics if `position` is zero.
    pub fn new(position: usize) -> Self {
        assert!(position > 0, "step ids are 1-based");
        Self(position)
    }

    /// The 1-based position.
    pub fn position(self) -> usize {
        self.0
    }

    /// The 0-based index into the step sequence.
    pub fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// How material moves into the next step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowType {
    /// Produced ahead of demand and pushed downstream (default)
    #[default]
    Push,
    /// Produced on demand, signalled by a Kanban
    Pull,
}

impl FlowType {
    pub fn is_pull(self) -> bool {
        matches!(self, Self::Pull)
    }
}

impl FromStr for FlowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" => Ok(Self::Push),
            "pull" => Ok(Self::Pull),
            _ => Err(format!("invalid flow type `{s}`, valid values: Push, Pull")),
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push => write!(f, "Push"),
            Self::Pull => write!(f, "Pull"),
        }
    }
}

/// One process step, as read from one input row.
///
/// Numeric attributes are `None` when the cell was empty. Steps are built
/// with [`ProcessStep::new`] and the `with_*` methods and are immutable
/// afterwards.
///
/// # Example
///
/// ```
/// # use vsmap_core::model::{FlowType, ProcessStep, StepId};
/// let step = ProcessStep::new(StepId::new(1), "Stamping")
///     .with_cycle_time(Some(1.0))
///     .with_wait_time(Some(2.0))
///     .with_flow(FlowType::Pull);
/// assert_eq!(step.name(), "Stamping");
/// assert!(step.flow().is_pull());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessStep {
    id: StepId,
    name: String,
    cycle_time: Option<f64>,
    wait_time: Option<f64>,
    defect_rate: Option<f64>,
    inventory: Option<f64>,
    flow: FlowType,
    notes: Option<String>,
    downtime_pct: Option<f64>,
    rework_pct: Option<f64>,
    changeover_time: Option<f64>,
    changeovers_per_shift: Option<f64>,
    distance: Option<f64>,
    walk_per_unit: Option<f64>,
}

impl ProcessStep {
    pub fn new(id: StepId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            cycle_time: None,
            wait_time: None,
            defect_rate: None,
            inventory: None,
            flow: FlowType::Push,
            notes: None,
            downtime_pct: None,
            rework_pct: None,
            changeover_time: None,
            changeovers_per_shift: None,
            distance: None,
            walk_per_unit: None,
        }
    }

    pub fn with_cycle_time(mut self, value: Option<f64>) -> Self {
        self.cycle_time = value;
        self
    }

    pub fn with_wait_time(mut self, value: Option<f64>) -> Self {
        self.wait_time = value;
        self
    }

    /// Defect rate as a fraction (`0.05` is 5%).
    pub fn with_defect_rate(mut self, value: Option<f64>) -> Self {
        self.defect_rate = value;
        self
    }

    pub fn with_inventory(mut self, value: Option<f64>) -> Self {
        self.inventory = value;
        self
    }

    pub fn with_flow(mut self, flow: FlowType) -> Self {
        self.flow = flow;
        self
    }

    /// Blank notes are stored as `None`.
    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self
    }

    /// Unplanned downtime, in percent.
    pub fn with_downtime_pct(mut self, value: Option<f64>) -> Self {
        self.downtime_pct = value;
        self
    }

    /// Rework rate, in percent.
    pub fn with_rework_pct(mut self, value: Option<f64>) -> Self {
        self.rework_pct = value;
        self
    }

    pub fn with_changeover_time(mut self, value: Option<f64>) -> Self {
        self.changeover_time = value;
        self
    }

    pub fn with_changeovers_per_shift(mut self, value: Option<f64>) -> Self {
        self.changeovers_per_shift = value;
        self
    }

    /// Distance material travels to reach this step, in metres.
    pub fn with_distance(mut self, value: Option<f64>) -> Self {
        self.distance = value;
        self
    }

    /// Distance an operator walks per unit produced, in metres.
    pub fn with_walk_per_unit(mut self, value: Option<f64>) -> Self {
        self.walk_per_unit = value;
        self
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cycle_time(&self) -> Option<f64> {
        self.cycle_time
    }

    pub fn wait_time(&self) -> Option<f64> {
        self.wait_time
    }

    pub fn defect_rate(&self) -> Option<f64> {
        self.defect_rate
    }

    pub fn inventory(&self) -> Option<f64> {
        self.inventory
    }

    pub fn flow(&self) -> FlowType {
        self.flow
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn downtime_pct(&self) -> Option<f64> {
        self.downtime_pct
    }

    pub fn rework_pct(&self) -> Option<f64> {
        self.rework_pct
    }

    pub fn changeover_time(&self) -> Option<f64> {
        self.changeover_time
    }

    pub fn changeovers_per_shift(&self) -> Option<f64> {
        self.changeovers_per_shift
    }

    pub fn distance(&self) -> Option<f64> {
        self.distance
    }

    pub fn walk_per_unit(&self) -> Option<f64> {
        self.walk_per_unit
    }
}
