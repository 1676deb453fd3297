use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use vsmap::VsmError;
use vsmap_cli::{Args, run};

/// Demo tables live at the workspace root, not in the crate
fn demos_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

/// Collects all .csv files from a directory
fn collect_csv_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("csv")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn args(input: &Path, output: &Path, format: &str) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        format: format.to_string(),
        title: None,
        spacing: None,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_csv_files(demos_dir());

    assert!(!demos.is_empty(), "No demo tables found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let base = temp_dir
            .path()
            .join(demo.file_stem().unwrap().to_string_lossy().as_ref());

        match run(&args(demo, &base, "pptx,pdf,svg")) {
            Ok(()) => {
                for ext in ["pptx", "pdf", "svg"] {
                    assert!(
                        base.with_extension(ext).is_file(),
                        "{} produced no .{ext}",
                        demo.display()
                    );
                }
            }
            Err(e) => failed.push((demo.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemo tables that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo table(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_csv_files(demos_dir().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error tables found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo in &error_demos {
        let base = temp_dir.path().join(format!(
            "error_{}",
            demo.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args(demo, &base, "pptx,pdf")).is_ok() {
            unexpectedly_succeeded.push(demo.clone());
        }
    }

    assert!(
        unexpectedly_succeeded.is_empty(),
        "error tables unexpectedly succeeded: {unexpectedly_succeeded:?}"
    );
    assert_eq!(
        fs::read_dir(temp_dir.path()).unwrap().count(),
        0,
        "failed runs must not leave files behind"
    );
}

#[test]
fn e2e_default_formats_are_pptx_and_pdf() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path().join("vsm");
    let input = demos_dir().join("three_step_line.csv");

    run(&args(&input, &base, "pptx,pdf")).unwrap();

    let pptx = fs::read(temp_dir.path().join("vsm.pptx")).unwrap();
    let pdf = fs::read(temp_dir.path().join("vsm.pdf")).unwrap();
    assert!(pptx.starts_with(b"PK"));
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(!temp_dir.path().join("vsm.svg").exists());
}

#[test]
fn e2e_header_only_reports_layout_error() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path().join("vsm");
    let input = demos_dir().join("errors").join("header_only.csv");

    let err = run(&args(&input, &base, "pptx,pdf")).unwrap_err();

    assert!(matches!(err, VsmError::Layout(_)));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn e2e_missing_column_reports_schema_error() {
    let temp_dir = tempdir().unwrap();
    let input = demos_dir().join("errors").join("missing_defect_rate.csv");

    let err = run(&args(&input, &temp_dir.path().join("vsm"), "pdf")).unwrap_err();

    assert!(matches!(err, VsmError::Schema { .. }));
    assert!(err.to_string().contains("defect_rate"));
}

#[test]
fn e2e_title_and_config_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[layout]\nspacing = \"wip\"\n\n[style]\nhigh_color = \"crimson\"\n",
    )
    .unwrap();

    let base = temp_dir.path().join("out").join("line");
    let mut args = args(&demos_dir().join("fabrication.csv"), &base, "svg");
    args.title = Some("Fabrication line".to_string());
    args.config = Some(config_path.to_string_lossy().to_string());

    run(&args).unwrap();

    let svg = fs::read_to_string(temp_dir.path().join("out").join("line.svg")).unwrap();
    assert!(svg.contains("Fabrication line"));
}

#[test]
fn e2e_invalid_format_is_rejected_before_writing() {
    let temp_dir = tempdir().unwrap();
    let input = demos_dir().join("three_step_line.csv");

    let err = run(&args(&input, &temp_dir.path().join("vsm"), "pdf,docx")).unwrap_err();

    assert!(matches!(err, VsmError::Config(_)));
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("absent.csv");

    let err = run(&args(&input, &temp_dir.path().join("vsm"), "pdf")).unwrap_err();
    assert!(matches!(err, VsmError::Io(_)));
}
