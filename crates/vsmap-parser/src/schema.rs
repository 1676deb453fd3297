//! Column definitions and header resolution.

use std::fmt;

use indexmap::IndexMap;
use log::debug;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, LoadError},
    span::Span,
};

/// A recognized input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    StepName,
    CycleTime,
    WaitTime,
    DefectRate,
    Inventory,
    FlowType,
    Notes,
    DowntimePct,
    ReworkPct,
    ChangeoverTime,
    ChangeoversPerShift,
    Distance,
    WalkPerUnit,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Self::StepName,
        Self::CycleTime,
        Self::WaitTime,
        Self::DefectRate,
        Self::Inventory,
        Self::FlowType,
        Self::Notes,
        Self::DowntimePct,
        Self::ReworkPct,
        Self::ChangeoverTime,
        Self::ChangeoversPerShift,
        Self::Distance,
        Self::WalkPerUnit,
    ];

    /// The canonical header name.
    pub fn name(self) -> &'static str {
        match self {
            Self::StepName => "step_name",
            Self::CycleTime => "cycle_time",
            Self::WaitTime => "wait_time",
            Self::DefectRate => "defect_rate",
            Self::Inventory => "inventory",
            Self::FlowType => "flow_type",
            Self::Notes => "notes",
            Self::DowntimePct => "downtime_pct",
            Self::ReworkPct => "rework_pct",
            Self::ChangeoverTime => "changeover_time",
            Self::ChangeoversPerShift => "changeovers_per_shift",
            Self::Distance => "distance_m",
            Self::WalkPerUnit => "walk_m_per_unit",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::StepName => &["step", "name"],
            Self::Inventory => &["inventory_level"],
            Self::FlowType => &["flow"],
            Self::Distance => &["distance"],
            Self::WalkPerUnit => &["walk_m", "walk_per_unit"],
            _ => &[],
        }
    }

    /// Whether the header must contain this column.
    pub fn is_required(self) -> bool {
        !matches!(
            self,
            Self::DowntimePct
                | Self::ReworkPct
                | Self::ChangeoverTime
                | Self::ChangeoversPerShift
                | Self::Distance
                | Self::WalkPerUnit
        )
    }

    /// Finds the column named by a raw header cell.
    pub fn from_header(raw: &str) -> Option<Self> {
        let normalized = normalize_header(raw);
        Self::ALL.into_iter().find(|column| {
            column.name() == normalized || column.aliases().contains(&normalized.as_str())
        })
    }

    /// The required columns, comma separated, for help messages.
    pub fn required_list() -> String {
        Self::ALL
            .into_iter()
            .filter(|c| c.is_required())
            .map(Column::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercases and trims a header cell, turning spaces and dashes into underscores.
///
/// `" Defect Rate "` becomes `"defect_rate"`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Where each recognized column sits in the header row.
#[derive(Debug, Clone)]
pub struct Schema {
    positions: IndexMap<Column, (usize, Span)>,
    header_span: Span,
}

impl Schema {
    /// Resolves a header row into column positions.
    ///
    /// # Errors
    ///
    /// Returns a schema [`LoadError`] listing every missing required column
    /// (E100) and every duplicated column (E101).
    pub fn resolve<'a>(
        headers: impl IntoIterator<Item = &'a str>,
        source: &str,
        header_span: Span,
    ) -> Result<Self, LoadError> {
        let mut collector = DiagnosticCollector::new();
        let mut positions = IndexMap::new();

        for (index, raw) in headers.into_iter().enumerate() {
            let cell_span = header_span.field(source, index);
            match Column::from_header(raw) {
                Some(column) => {
                    if positions.contains_key(&column) {
                        collector.emit(
                            Diagnostic::error(format!("column `{column}` appears more than once"))
                                .with_code(ErrorCode::E101)
                                .with_label(cell_span, "duplicate column")
                                .with_help("remove or rename one of the columns"),
                        );
                    } else {
                        positions.insert(column, (index, cell_span));
                    }
                }
                None => collector.emit(
                    Diagnostic::warning(format!("ignoring unknown column `{}`", raw.trim()))
                        .with_label(cell_span, "not a recognized column"),
                ),
            }
        }

        let missing: Vec<_> = Column::ALL
            .into_iter()
            .filter(|c| c.is_required() && !positions.contains_key(c))
            .map(|c| format!("`{c}`"))
            .collect();

        if !missing.is_empty() {
            collector.emit(
                Diagnostic::error(format!(
                    "missing required column{}: {}",
                    if missing.len() > 1 { "s" } else { "" },
                    missing.join(", ")
                ))
                .with_code(ErrorCode::E100)
                .with_label(header_span, "header row")
                .with_help(format!("the header must name: {}", Column::required_list())),
            );
        }

        collector.finish()?;

        debug!(columns = positions.len(); "Header resolved");
        Ok(Self {
            positions,
            header_span,
        })
    }

    /// The header cell index of `column`, if present.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).map(|(index, _)| *index)
    }

    /// Span of the header cell that named `column`.
    pub fn header_cell(&self, column: Column) -> Option<Span> {
        self.positions.get(&column).map(|(_, span)| *span)
    }

    /// Number of recognized columns.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn header_span(&self) -> Span {
        self.header_span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const FULL_HEADER: [&str; 7] = [
        "step_name",
        "cycle_time",
        "wait_time",
        "defect_rate",
        "inventory",
        "flow_type",
        "notes",
    ];

    fn resolve(headers: &[&str]) -> Result<Schema, LoadError> {
        let source = headers.join(",");
        let span = Span::line_at(&source, 0);
        Schema::resolve(headers.iter().copied(), &source, span)
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(" Defect Rate "), "defect_rate");
        assert_eq!(normalize_header("Flow-Type"), "flow_type");
        assert_eq!(normalize_header("\u{feff}step_name"), "step_name");
        assert_eq!(normalize_header("Cycle  Time"), "cycle_time");
    }

    #[test]
    fn test_from_header_aliases() {
        assert_eq!(Column::from_header("Step"), Some(Column::StepName));
        assert_eq!(Column::from_header("Inventory Level"), Some(Column::Inventory));
        assert_eq!(Column::from_header("flow"), Some(Column::FlowType));
        assert_eq!(Column::from_header("Distance"), Some(Column::Distance));
        assert_eq!(Column::from_header("Walk M Per Unit"), Some(Column::WalkPerUnit));
        assert_eq!(Column::from_header("operator"), None);
    }

    #[test]
    fn test_resolve_full_header() {
        let schema = resolve(&FULL_HEADER).unwrap();
        assert_eq!(schema.len(), 7);
        assert_eq!(schema.position(Column::StepName), Some(0));
        assert_eq!(schema.position(Column::Notes), Some(6));
        assert_eq!(schema.position(Column::ReworkPct), None);
        assert_eq!(schema.header_cell(Column::CycleTime), Some(Span::new(10..20)));
    }

    #[test]
    fn test_resolve_extended_and_unknown_columns() {
        let mut headers = FULL_HEADER.to_vec();
        headers.push("Rework %");
        headers.push("rework_pct");
        headers.push("shift");
        let schema = resolve(&headers).unwrap();
        assert_eq!(schema.position(Column::ReworkPct), Some(8));
    }

    #[test]
    fn test_resolve_missing_defect_rate() {
        let headers: Vec<_> = FULL_HEADER
            .iter()
            .copied()
            .filter(|h| *h != "defect_rate")
            .collect();

        let err = resolve(&headers).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert!(diag.message().contains("`defect_rate`"), "{}", diag.message());
    }

    #[test]
    fn test_resolve_lists_every_missing_column() {
        let err = resolve(&["step_name", "notes"]).unwrap_err();
        let message = err.diagnostics()[0].message();
        assert!(message.starts_with("missing required columns"));
        for column in ["cycle_time", "wait_time", "defect_rate", "inventory", "flow_type"] {
            assert!(message.contains(column), "{message} should mention {column}");
        }
    }

    #[test]
    fn test_resolve_duplicate_column() {
        let mut headers = FULL_HEADER.to_vec();
        headers.push("Step Name");
        let err = resolve(&headers).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
        assert_eq!(err.kind(), ErrorKind::Schema);
    }
}
