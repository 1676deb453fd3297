//! The appendix tables shared by the PPTX and PDF backends.
//!
//! The scoring table lists every step in step order. The observations table
//! lists the ranked observations and is left out when there are none.

use crate::map::Analysis;

/// Column headings of the appendix.
pub const HEADERS: [&str; 6] = [
    "#",
    "Step",
    "Waste score",
    "Confidence",
    "Contributing factors",
    "Total step time",
];

/// Relative column widths, summing to 1.
pub(crate) const COLUMN_WEIGHTS: [f32; 6] = [0.06, 0.24, 0.12, 0.12, 0.30, 0.16];

/// Column headings of the observations table.
pub const OBSERVATION_HEADERS: [&str; 6] = [
    "Rank",
    "Step",
    "Waste",
    "Rating",
    "Priority",
    "Observation",
];

pub(crate) const OBSERVATION_WEIGHTS: [f32; 6] = [0.06, 0.16, 0.12, 0.08, 0.08, 0.50];

/// One formatted appendix row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendixRow {
    cells: [String; 6],
}

impl AppendixRow {
    pub fn cells(&self) -> &[String; 6] {
        &self.cells
    }

    pub fn number(&self) -> &str {
        &self.cells[0]
    }

    pub fn step(&self) -> &str {
        &self.cells[1]
    }

    /// The waste score with two decimals.
    pub fn score(&self) -> &str {
        &self.cells[2]
    }
}

/// One formatted observation, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationRow {
    cells: [String; 6],
}

impl ObservationRow {
    pub fn cells(&self) -> &[String; 6] {
        &self.cells
    }

    /// The step id and name, as in `P2 Welding`.
    pub fn step(&self) -> &str {
        &self.cells[1]
    }

    pub fn waste(&self) -> &str {
        &self.cells[2]
    }
}

/// A table as the backends draw it.
#[derive(Debug, Clone)]
pub(crate) struct Table<'a> {
    pub heading: &'static str,
    pub headers: &'static [&'static str],
    pub weights: &'static [f32],
    pub rows: Vec<&'a [String]>,
}

/// Per-step scoring details in step order, then ranked observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appendix {
    rows: Vec<AppendixRow>,
    observations: Vec<ObservationRow>,
}

impl Appendix {
    pub fn new(analysis: &Analysis) -> Self {
        let rows = analysis
            .scored_steps()
            .map(|(step, score)| {
                let total = analysis
                    .lead_time()
                    .step(step.id())
                    .map_or(0.0, |flow| flow.total());
                AppendixRow {
                    cells: [
                        step.id().to_string(),
                        step.name().to_string(),
                        format!("{:.2}", score.score()),
                        score.confidence().to_string(),
                        score.factor_summary(),
                        format!("{total:.2}"),
                    ],
                }
            })
            .collect();

        let observations = analysis
            .observations()
            .iter()
            .enumerate()
            .map(|(index, observation)| {
                let step = analysis
                    .step(observation.step())
                    .map_or_else(String::new, |step| format!("{} {}", step.id(), step.name()));
                ObservationRow {
                    cells: [
                        (index + 1).to_string(),
                        step,
                        observation.category().to_string(),
                        format!("{:.2}", observation.rating()),
                        format!("{:.0}%", observation.priority()),
                        observation.text().to_string(),
                    ],
                }
            })
            .collect();

        Self { rows, observations }
    }

    pub fn rows(&self) -> &[AppendixRow] {
        &self.rows
    }

    pub fn observations(&self) -> &[ObservationRow] {
        &self.observations
    }

    /// The tables to draw, scoring first.
    pub(crate) fn tables(&self) -> Vec<Table<'_>> {
        let mut tables = vec![Table {
            heading: "Scoring appendix",
            headers: &HEADERS,
            weights: &COLUMN_WEIGHTS,
            rows: self.rows.iter().map(|row| &row.cells[..]).collect(),
        }];
        if !self.observations.is_empty() {
            tables.push(Table {
                heading: "Observations",
                headers: &OBSERVATION_HEADERS,
                weights: &OBSERVATION_WEIGHTS,
                rows: self.observations.iter().map(|row| &row.cells[..]).collect(),
            });
        }
        tables
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
