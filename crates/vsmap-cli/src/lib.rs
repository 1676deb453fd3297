//! CLI logic for the vsmap value stream map tool.
//!
//! Reads a CSV process table, runs it through the [`MapBuilder`] pipeline
//! and writes one document per requested format next to the output base.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{fs, path::Path, str::FromStr};

use log::{debug, info};

use vsmap::{
    Format, MapBuilder, VsmError,
    config::{AppConfig, SpacingMode},
};

use config::ConfigError;

/// Title used when neither `--title` nor a usable input file name is given.
const DEFAULT_TITLE: &str = "Value Stream Map";

/// Run the vsmap CLI application
///
/// Nothing is written unless every requested document renders.
///
/// # Errors
///
/// Returns `VsmError` for:
/// - File I/O errors
/// - Configuration loading errors and invalid options
/// - Schema and parse errors in the CSV input
/// - Layout errors (no process steps)
/// - Export errors
pub fn run(args: &Args) -> Result<(), VsmError> {
    info!(
        input_path = args.input,
        output_base = args.output;
        "Processing process table"
    );

    let formats = parse_formats(&args.format)?;
    let app_config = apply_overrides(config::load_config(args.config.as_ref())?, args)?;

    let source = fs::read_to_string(&args.input)?;
    let title = map_title(args);
    debug!(title, formats:? = formats; "Resolved options");

    let builder = MapBuilder::new(app_config);
    let map = builder.build(&title, &source)?;
    let written = builder.write_outputs(&map, Path::new(&args.output), &formats)?;

    for path in &written {
        info!(output_file = path.display().to_string(); "Document exported successfully");
    }

    Ok(())
}

/// Parse a comma-separated format list such as `pptx,pdf`.
fn parse_formats(list: &str) -> Result<Vec<Format>, ConfigError> {
    let formats = list
        .split(',')
        .filter(|item| !item.trim().is_empty())
        .map(Format::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(ConfigError::Validation)?;

    if formats.is_empty() {
        return Err(ConfigError::Validation(
            "at least one output format is required".to_string(),
        ));
    }
    Ok(formats)
}

/// Apply command-line options that take precedence over the config file.
fn apply_overrides(config: AppConfig, args: &Args) -> Result<AppConfig, ConfigError> {
    let Some(spacing) = args.spacing.as_deref() else {
        return Ok(config);
    };
    let spacing = SpacingMode::from_str(spacing).map_err(ConfigError::Validation)?;

    Ok(AppConfig::new(
        config.layout().clone().with_spacing(spacing),
        config.scoring().clone(),
        config.process().clone(),
        config.style().clone(),
    ))
}

fn map_title(args: &Args) -> String {
    if let Some(title) = &args.title {
        return title.clone();
    }
    Path::new(&args.input)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: &str) -> Args {
        Args {
            input: input.to_string(),
            output: "vsm".to_string(),
            format: "pptx,pdf".to_string(),
            title: None,
            spacing: None,
            config: None,
            log_level: "off".to_string(),
        }
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            parse_formats("pptx,pdf").unwrap(),
            vec![Format::Pptx, Format::Pdf]
        );
        assert_eq!(
            parse_formats(" SVG , pdf,").unwrap(),
            vec![Format::Svg, Format::Pdf]
        );
    }

    #[test]
    fn test_parse_formats_rejects_unknown_and_empty() {
        let err = parse_formats("pptx,docx").unwrap_err();
        assert!(err.to_string().contains("docx"));

        assert!(parse_formats(" , ").is_err());
    }

    #[test]
    fn test_map_title() {
        assert_eq!(map_title(&args("data/line_3.csv")), "line_3");

        let mut explicit = args("data/line_3.csv");
        explicit.title = Some("Line 3, week 12".to_string());
        assert_eq!(map_title(&explicit), "Line 3, week 12");

        assert_eq!(map_title(&args("")), DEFAULT_TITLE);
    }

    #[test]
    fn test_spacing_override() {
        let mut with_spacing = args("in.csv");
        with_spacing.spacing = Some("cycle-time".to_string());

        let config = apply_overrides(AppConfig::default(), &with_spacing).unwrap();
        assert_eq!(config.layout().spacing(), SpacingMode::CycleTime);

        let config = apply_overrides(AppConfig::default(), &args("in.csv")).unwrap();
        assert_eq!(config.layout().spacing(), SpacingMode::Uniform);

        with_spacing.spacing = Some("random".to_string());
        assert!(apply_overrides(AppConfig::default(), &with_spacing).is_err());
    }
}
