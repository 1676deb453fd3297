//! Waste scores, confidence levels and contributing factors.

use std::fmt;

use crate::model::StepId;

/// Lean waste categories.
///
/// The first four make up the waste score. Transportation and Motion are
/// only rated as observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WasteCategory {
    Waiting,
    Defects,
    Inventory,
    Overproduction,
    Transportation,
    Motion,
}

impl WasteCategory {
    /// All categories in their canonical order.
    pub const ALL: [WasteCategory; 6] = [
        Self::Waiting,
        Self::Defects,
        Self::Inventory,
        Self::Overproduction,
        Self::Transportation,
        Self::Motion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Waiting => "Waiting",
            Self::Defects => "Defects",
            Self::Inventory => "Inventory",
            Self::Overproduction => "Overproduction",
            Self::Transportation => "Transportation",
            Self::Motion => "Motion",
        }
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How complete the input behind a score was.
///
/// Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A flagged waste category and the points it added to the score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Factor {
    category: WasteCategory,
    points: f64,
}

impl Factor {
    pub fn new(category: WasteCategory, points: f64) -> Self {
        Self { category, points }
    }

    pub fn category(&self) -> WasteCategory {
        self.category
    }

    pub fn points(&self) -> f64 {
        self.points
    }
}

/// Heuristic waste rating of one process step.
#[derive(Debug, Clone, PartialEq)]
pub struct WasteScore {
    step: StepId,
    score: f64,
    confidence: Confidence,
    factors: Vec<Factor>,
}

impl WasteScore {
    /// Creates a score. Factors are ordered by points, highest first, with
    /// ties broken by category order.
    pub fn new(step: StepId, score: f64, confidence: Confidence, mut factors: Vec<Factor>) -> Self {
        factors.sort_by(|a, b| {
            b.points
                .total_cmp(&a.points)
                .then(a.category.cmp(&b.category))
        });
        Self {
            step,
            score,
            confidence,
            factors,
        }
    }

    pub fn step(&self) -> StepId {
        self.step
    }

    /// Score in `0.0..=10.0`.
    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Contributing factors, highest contribution first.
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }

    /// The `n` highest contributing categories.
    pub fn top_categories(&self, n: usize) -> Vec<WasteCategory> {
        self.factors.iter().take(n).map(Factor::category).collect()
    }

    /// Category names joined for display, or `-` when nothing was flagged.
    pub fn factor_summary(&self) -> String {
        if self.factors.is_empty() {
            return "-".to_string();
        }
        self.factors
            .iter()
            .map(|f| f.category.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_order() {
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn test_factors_sorted_by_points() {
        let score = WasteScore::new(
            StepId::new(1),
            5.0,
            Confidence::High,
            vec![
                Factor::new(WasteCategory::Inventory, 1.0),
                Factor::new(WasteCategory::Defects, 3.0),
                Factor::new(WasteCategory::Waiting, 1.0),
            ],
        );

        assert_eq!(
            score.top_categories(3),
            vec![
                WasteCategory::Defects,
                WasteCategory::Waiting,
                WasteCategory::Inventory
            ]
        );
        assert_eq!(score.factor_summary(), "Defects, Waiting, Inventory");
    }

    #[test]
    fn test_factor_summary_empty() {
        let score = WasteScore::new(StepId::new(2), 0.0, Confidence::Low, Vec::new());
        assert_eq!(score.factor_summary(), "-");
        assert!(score.top_categories(2).is_empty());
    }
}
