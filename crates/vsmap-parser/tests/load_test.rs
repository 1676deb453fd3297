//! Integration tests for the CSV loader.

use proptest::prelude::*;

use vsmap_core::model::FlowType;
use vsmap_parser::{
    error::{ErrorCode, ErrorKind},
    load,
};

const HEADER: &str = "step_name,cycle_time,wait_time,defect_rate,inventory,flow_type,notes";

#[test]
fn test_scenario_rows() {
    let source = format!(
        "{HEADER}\n\
         A,1,2,0.01,5,Push,\n\
         B,4,30,0.2,80,Push,\n\
         C,2,1,0,0,Pull,\n"
    );

    let steps = load(&source).expect("scenario should load");
    let names: Vec<_> = steps.iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    assert_eq!(steps[2].flow(), FlowType::Pull);
}

#[test]
fn test_missing_defect_rate_column_is_schema_error() {
    let source = "step_name,cycle_time,wait_time,inventory,flow_type,notes\nA,1,2,5,Push,\n";

    let err = load(source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(
        err.to_string().contains("defect_rate"),
        "error should name the column: {err}"
    );
}

#[test]
fn test_crlf_line_endings() {
    let source = format!("{HEADER}\r\nA,1,2,0.01,5,Push,\r\nB,2,3,0.02,6,Pull,note\r\n");

    let steps = load(&source).unwrap();
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].notes(), Some("note"));
}

#[test]
fn test_parse_error_names_row_and_column() {
    let source = format!("{HEADER}\nA,1,2,0.01,5,Push,\nB,1,2,lots,5,Push,\n");

    let err = load(&source).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    let diag = &err.diagnostics()[0];
    assert_eq!(diag.code(), Some(ErrorCode::E200));
    assert!(diag.message().contains("row 2"));
    assert!(diag.message().contains("defect_rate"));
    assert!(diag.message().contains("lots"));
}

fn row_strategy() -> impl Strategy<Value = (String, Option<f64>, Option<f64>, bool)> {
    (
        "[A-Za-z][A-Za-z0-9 ]{0,12}[A-Za-z0-9]",
        proptest::option::of(0.0f64..1000.0),
        proptest::option::of(0.0f64..1.0),
        any::<bool>(),
    )
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

proptest! {
    #[test]
    fn test_rows_preserved_in_order(rows in prop::collection::vec(row_strategy(), 0..25)) {
        let mut source = String::from(HEADER);
        source.push('\n');
        for (name, wait, defect, pull) in &rows {
            let flow = if *pull { "Pull" } else { "Push" };
            source.push_str(&format!("{name},1,{},{},3,{flow},\n", cell(*wait), cell(*defect)));
        }

        let steps = load(&source).unwrap();
        prop_assert_eq!(steps.len(), rows.len());

        for (position, (step, (name, wait, defect, pull))) in steps.iter().zip(&rows).enumerate() {
            prop_assert_eq!(step.id().position(), position + 1);
            prop_assert_eq!(step.name(), name.as_str());
            prop_assert_eq!(step.wait_time(), *wait);
            prop_assert_eq!(step.defect_rate(), *defect);
            prop_assert_eq!(step.flow().is_pull(), *pull);
        }
    }
}
