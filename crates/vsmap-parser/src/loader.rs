//! Reads a process-step table into [`ProcessStep`] records.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, trace};

use vsmap_core::model::{FlowType, ProcessStep, StepId};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, LoadError},
    schema::{Column, Schema},
    span::Span,
};

/// Loads process steps from CSV text.
///
/// Steps come back in row order, numbered from 1. A header-only input yields
/// an empty vector.
///
/// # Errors
///
/// Returns a [`LoadError`] carrying every problem found: schema errors for
/// a missing or malformed header, parse errors for bad rows and cells.
///
/// # Example
///
/// ```
/// let source = "\
/// step_name,cycle_time,wait_time,defect_rate,inventory,flow_type,notes
/// Stamping,1,2,0.01,5,Push,
/// Welding,4,20,5%,40,Pull,weekly schedule
/// ";
/// let steps = vsmap_parser::load(source).unwrap();
/// assert_eq!(steps.len(), 2);
/// assert_eq!(steps[1].name(), "Welding");
/// assert_eq!(steps[1].defect_rate(), Some(0.05));
/// ```
pub fn load(source: &str) -> Result<Vec<ProcessStep>, LoadError> {
    info!(bytes = source.len(); "Loading process steps");

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(source.as_bytes());

    let headers = match reader.headers() {
        Ok(headers) => headers.clone(),
        Err(err) => return Err(csv_error(source, &err).into()),
    };

    if headers.iter().all(str::is_empty) {
        return Err(Diagnostic::error("input has no header row")
            .with_code(ErrorCode::E102)
            .with_label(Span::line_at(source, 0), "expected a header here")
            .with_help(format!("the first line must name: {}", Column::required_list()))
            .into());
    }

    let header_span = Span::line_at(source, record_offset(&headers));
    let schema = Schema::resolve(headers.iter(), source, header_span)?;

    let mut collector = DiagnosticCollector::new();
    let mut steps = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                collector.emit(csv_error(source, &err));
                break;
            }
        };

        let row = RowReader {
            source,
            schema: &schema,
            record: &record,
            number: steps.len() + 1,
            span: Span::line_at(source, record_offset(&record)),
        };

        if record.len() != headers.len() {
            collector.emit(row.field_count_error(headers.len()));
            // Keep numbering aligned with data rows
            steps.push(None);
            continue;
        }

        steps.push(row.read(&mut collector));
    }

    collector.finish()?;

    let steps: Vec<ProcessStep> = steps.into_iter().flatten().collect();
    debug!(steps = steps.len(); "Process steps loaded");
    trace!(steps:?; "Loaded steps");
    Ok(steps)
}

fn record_offset(record: &StringRecord) -> usize {
    record
        .position()
        .map(|position| position.byte() as usize)
        .unwrap_or_default()
}

fn csv_error(source: &str, err: &csv::Error) -> Diagnostic {
    let offset = err
        .position()
        .map(|position| position.byte() as usize)
        .unwrap_or_default();

    Diagnostic::error(format!("malformed CSV: {err}"))
        .with_code(ErrorCode::E001)
        .with_label(Span::line_at(source, offset), "could not read this record")
}

/// Converts one data row, reporting problems into a collector.
struct RowReader<'a> {
    source: &'a str,
    schema: &'a Schema,
    record: &'a StringRecord,
    /// 1-based data row number
    number: usize,
    span: Span,
}

impl RowReader<'_> {
    fn read(&self, collector: &mut DiagnosticCollector) -> Option<ProcessStep> {
        let before = collector.error_count();

        let name = self.cell(Column::StepName);
        if name.is_empty() {
            collector.emit(
                Diagnostic::error(format!("row {}: step name is empty", self.number))
                    .with_code(ErrorCode::E202)
                    .with_label(self.span, "this row has no step name")
                    .with_help("every step needs a name"),
            );
        }

        let flow = self.flow(collector);
        let mut numeric = |column| self.numeric(column, collector);

        let step = ProcessStep::new(StepId::new(self.number), name)
            .with_cycle_time(numeric(Column::CycleTime))
            .with_wait_time(numeric(Column::WaitTime))
            .with_defect_rate(numeric(Column::DefectRate))
            .with_inventory(numeric(Column::Inventory))
            .with_downtime_pct(numeric(Column::DowntimePct))
            .with_rework_pct(numeric(Column::ReworkPct))
            .with_changeover_time(numeric(Column::ChangeoverTime))
            .with_changeovers_per_shift(numeric(Column::ChangeoversPerShift))
            .with_distance(numeric(Column::Distance))
            .with_walk_per_unit(numeric(Column::WalkPerUnit))
            .with_flow(flow)
            .with_notes(Some(self.cell(Column::Notes).to_string()));

        (collector.error_count() == before).then_some(step)
    }

    /// The trimmed cell of `column`, empty when the column is absent.
    fn cell(&self, column: Column) -> &str {
        self.schema
            .position(column)
            .and_then(|index| self.record.get(index))
            .unwrap_or_default()
    }

    fn header_cell(&self, column: Column) -> Span {
        self.schema
            .header_cell(column)
            .unwrap_or_else(|| self.schema.header_span())
    }

    /// Span of the cell of `column` in this row.
    fn cell_span(&self, column: Column) -> Span {
        self.schema
            .position(column)
            .map_or(self.span, |index| self.span.field(self.source, index))
    }

    fn numeric(&self, column: Column, collector: &mut DiagnosticCollector) -> Option<f64> {
        let raw = self.cell(column);
        match parse_number(column, raw) {
            Ok(value) => value,
            Err(reason) => {
                collector.emit(
                    Diagnostic::error(format!(
                        "row {}: `{column}` value `{raw}` {reason}",
                        self.number
                    ))
                    .with_code(ErrorCode::E200)
                    .with_label(self.cell_span(column), "expected a number")
                    .with_secondary_label(self.header_cell(column), "in this column")
                    .with_help("leave the cell empty if the value is unknown"),
                );
                None
            }
        }
    }

    fn flow(&self, collector: &mut DiagnosticCollector) -> FlowType {
        let raw = self.cell(Column::FlowType);
        if raw.is_empty() {
            return FlowType::default();
        }

        raw.parse().unwrap_or_else(|_| {
            collector.emit(
                Diagnostic::error(format!(
                    "row {}: `flow_type` value `{raw}` is not a flow type",
                    self.number
                ))
                .with_code(ErrorCode::E201)
                .with_label(self.cell_span(Column::FlowType), "expected Push or Pull")
                .with_help("valid values are Push and Pull, in any case"),
            );
            FlowType::default()
        })
    }

    fn field_count_error(&self, expected: usize) -> Diagnostic {
        Diagnostic::error(format!(
            "row {}: expected {expected} fields, found {}",
            self.number,
            self.record.len()
        ))
        .with_code(ErrorCode::E001)
        .with_label(self.span, "wrong number of fields")
        .with_help("quote values that contain commas")
    }
}

/// Parses a numeric cell. An empty cell is `Ok(None)`.
///
/// A trailing `%` turns a defect rate into a fraction and is dropped from the
/// percentage columns; anywhere else it is an error.
fn parse_number(column: Column, raw: &str) -> Result<Option<f64>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let (digits, percent) = match raw.strip_suffix('%') {
        Some(digits) => (digits.trim_end(), true),
        None => (raw, false),
    };

    let value: f64 = digits.parse().map_err(|_| "is not a number")?;
    if !value.is_finite() {
        return Err("is not a finite number");
    }

    match (percent, column) {
        (false, _) => Ok(Some(value)),
        (true, Column::DefectRate) => Ok(Some(value / 100.0)),
        (true, Column::DowntimePct | Column::ReworkPct) => Ok(Some(value)),
        (true, _) => Err("cannot be a percentage"),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::error::ErrorKind;

    const HEADER: &str = "step_name,cycle_time,wait_time,defect_rate,inventory,flow_type,notes\n";

    fn with_rows(rows: &str) -> String {
        format!("{HEADER}{rows}")
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(Column::CycleTime, ""), Ok(None));
        assert_eq!(parse_number(Column::CycleTime, "2.5"), Ok(Some(2.5)));
        assert_eq!(parse_number(Column::DefectRate, "5%"), Ok(Some(0.05)));
        assert_eq!(parse_number(Column::ReworkPct, "12 %"), Ok(Some(12.0)));
        assert!(parse_number(Column::WaitTime, "10%").is_err());
        assert!(parse_number(Column::WaitTime, "soon").is_err());
        assert!(parse_number(Column::WaitTime, "inf").is_err());
        assert!(parse_number(Column::WaitTime, "NaN").is_err());
    }

    #[test]
    fn test_load_basic_rows() {
        let source = with_rows("Cut,1,2,0.01,5,Push,\nWeld,4,20,0.05,40,pull,weekly schedule\n");
        let steps = load(&source).unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].id(), StepId::new(1));
        assert_eq!(steps[0].name(), "Cut");
        assert_eq!(steps[0].notes(), None);
        assert_eq!(steps[1].flow(), FlowType::Pull);
        assert_eq!(steps[1].notes(), Some("weekly schedule"));
        assert_approx_eq!(f64, steps[1].inventory().unwrap(), 40.0);
    }

    #[test]
    fn test_load_empty_cells_are_missing() {
        let source = with_rows("Pack,,,,,,\n");
        let steps = load(&source).unwrap();

        let step = &steps[0];
        assert_eq!(step.cycle_time(), None);
        assert_eq!(step.wait_time(), None);
        assert_eq!(step.defect_rate(), None);
        assert_eq!(step.inventory(), None);
        assert_eq!(step.flow(), FlowType::Push);
    }

    #[test]
    fn test_load_header_only_is_empty() {
        assert!(load(HEADER).unwrap().is_empty());
    }

    #[test]
    fn test_load_empty_input_is_schema_error() {
        let err = load("").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Schema);
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E102));
    }

    #[test]
    fn test_load_reports_row_column_and_value() {
        let source = with_rows("Cut,1,2,0.01,5,Push,\nWeld,4,soon,0.05,40,Push,\n");
        let err = load(&source).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.message(), "row 2: `wait_time` value `soon` is not a number");

        let label = &diag.labels()[0];
        let span = label.span();
        assert_eq!(&source[span.start()..span.end()], "soon");
    }

    #[test]
    fn test_load_label_points_at_bad_cell_not_equal_earlier_cell() {
        let source = with_rows("soon,1,soon,0.01,5,Push,\n");
        let err = load(&source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.message(), "row 1: `wait_time` value `soon` is not a number");

        let span = diag.labels()[0].span();
        let row_start = HEADER.len();
        assert_eq!(span.start(), row_start + "soon,1,".len());
        assert_eq!(&source[span.start()..span.end()], "soon");
    }

    #[test]
    fn test_load_collects_every_bad_cell() {
        let source = with_rows("Cut,x,2,0.01,5,Sideways,\n,1,2,0.01,5,Push,\n");
        let err = load(&source).unwrap_err();

        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(codes, vec![ErrorCode::E201, ErrorCode::E200, ErrorCode::E202]);
    }

    #[test]
    fn test_load_wrong_field_count() {
        let source = with_rows("Cut,1,2\n");
        let err = load(&source).unwrap_err();

        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert!(diag.message().contains("expected 7 fields, found 3"));
    }

    #[test]
    fn test_load_aliases_and_extended_columns() {
        let source = "Step,Cycle Time,Wait Time,Defect Rate,Inventory Level,Flow,Notes,Rework %,Downtime_pct\n\
                      Cut,2,3,1%,4,Push,,10,5%\n";
        let step = &load(source).unwrap()[0];

        assert_approx_eq!(f64, step.defect_rate().unwrap(), 0.01);
        assert_eq!(step.rework_pct(), None);
        assert_approx_eq!(f64, step.downtime_pct().unwrap(), 5.0);
    }

    #[test]
    fn test_load_movement_columns() {
        let source = "step,cycle_time,wait_time,defect_rate,inventory,flow_type,notes,Distance,Walk M\n\
                      Cut,2,3,0.01,4,Push,,30,12.5\n\
                      Weld,2,3,0.01,4,Push,,,\n";
        let steps = load(source).unwrap();

        assert_approx_eq!(f64, steps[0].distance().unwrap(), 30.0);
        assert_approx_eq!(f64, steps[0].walk_per_unit().unwrap(), 12.5);
        assert_eq!(steps[1].distance(), None);
        assert_eq!(steps[1].walk_per_unit(), None);
    }

    #[test]
    fn test_load_quoted_fields() {
        let source = with_rows("\"Cut, trim\",1,2,0.01,5,Push,\"order, daily\"\n");
        let step = &load(&source).unwrap()[0];
        assert_eq!(step.name(), "Cut, trim");
        assert_eq!(step.notes(), Some("order, daily"));
    }
}
