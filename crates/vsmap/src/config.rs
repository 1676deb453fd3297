//! Configuration types for value stream map generation.
//!
//! This module provides configuration structures that control how steps are
//! scored, how the map is laid out and how it is styled. All types implement
//! [`serde::Deserialize`] for loading from TOML files.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`LayoutConfig`] - Box sizes, gaps, spacing mode and information keywords.
//! - [`ScoringConfig`] - Waste score thresholds and saturation points.
//! - [`ProcessConfig`] - Shift length and the time unit shown on the map.
//! - [`StyleConfig`] - Colours and font size.
//!
//! # Example
//!
//! ```
//! # use vsmap::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.style().background_color().is_ok());
//! assert!(config.validate().is_ok());
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use vsmap_core::color::Color;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Scoring configuration section.
    #[serde(default)]
    scoring: ScoringConfig,

    /// Process configuration section.
    #[serde(default)]
    process: ProcessConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        scoring: ScoringConfig,
        process: ProcessConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            layout,
            scoring,
            process,
            style,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    pub fn process(&self) -> &ProcessConfig {
        &self.process
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.scoring.validate()?;
        self.process.validate()?;
        self.style.validate()
    }
}

/// How horizontal gaps between material boxes are sized.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpacingMode {
    /// Same gap after every step (default)
    #[default]
    Uniform,
    /// Wider gaps after steps with a long effective cycle time
    CycleTime,
    /// Wider gaps after steps holding more inventory
    Wip,
}

impl FromStr for SpacingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(Self::Uniform),
            "cycle-time" => Ok(Self::CycleTime),
            "wip" => Ok(Self::Wip),
            _ => Err(format!(
                "invalid spacing mode `{s}`, valid values: uniform, cycle-time, wip"
            )),
        }
    }
}

impl fmt::Display for SpacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::CycleTime => write!(f, "cycle-time"),
            Self::Wip => write!(f, "wip"),
        }
    }
}

/// Map geometry settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    spacing: SpacingMode,
    box_width: f32,
    box_height: f32,
    info_box_height: f32,
    gap: f32,
    max_extra_gap: f32,
    lane_gap: f32,
    margin: f32,
    info_keywords: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: SpacingMode::default(),
            box_width: 150.0,
            box_height: 118.0,
            info_box_height: 44.0,
            gap: 70.0,
            max_extra_gap: 90.0,
            lane_gap: 36.0,
            margin: 30.0,
            info_keywords: ["information", "info", "schedule", "order", "signal"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl LayoutConfig {
    pub fn spacing(&self) -> SpacingMode {
        self.spacing
    }

    /// Returns a copy with a different spacing mode.
    pub fn with_spacing(mut self, spacing: SpacingMode) -> Self {
        self.spacing = spacing;
        self
    }

    /// Width of a material box.
    pub fn box_width(&self) -> f32 {
        self.box_width
    }

    /// Height of a material box, title and metrics areas together.
    pub fn box_height(&self) -> f32 {
        self.box_height
    }

    pub fn info_box_height(&self) -> f32 {
        self.info_box_height
    }

    /// Base horizontal gap between consecutive boxes.
    pub fn gap(&self) -> f32 {
        self.gap
    }

    /// Largest gap added on top of [`LayoutConfig::gap`] by proportional spacing.
    pub fn max_extra_gap(&self) -> f32 {
        self.max_extra_gap
    }

    /// Vertical distance between lanes.
    pub fn lane_gap(&self) -> f32 {
        self.lane_gap
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Lowercase keywords that put a step in the information lane.
    pub fn info_keywords(&self) -> &[String] {
        &self.info_keywords
    }

    fn validate(&self) -> Result<(), String> {
        let sizes = [
            ("layout.box_width", self.box_width),
            ("layout.box_height", self.box_height),
            ("layout.info_box_height", self.info_box_height),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("`{name}` must be positive, got {value}"));
            }
        }

        let gaps = [
            ("layout.gap", self.gap),
            ("layout.max_extra_gap", self.max_extra_gap),
            ("layout.lane_gap", self.lane_gap),
            ("layout.margin", self.margin),
        ];
        for (name, value) in gaps {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("`{name}` must not be negative, got {value}"));
            }
        }
        Ok(())
    }
}

/// Thresholds of the waste score and the observation ratings.
///
/// A factor contributes nothing at or below its threshold and its full
/// weight at or above its saturation point. The distance and walk ranges
/// only rate observations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    wait_threshold: f64,
    wait_saturation: f64,
    defect_threshold: f64,
    defect_saturation: f64,
    inventory_threshold: f64,
    inventory_saturation: f64,
    distance_threshold: f64,
    distance_saturation: f64,
    walk_threshold: f64,
    walk_saturation: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            wait_threshold: 5.0,
            wait_saturation: 30.0,
            defect_threshold: 0.02,
            defect_saturation: 0.20,
            inventory_threshold: 10.0,
            inventory_saturation: 100.0,
            distance_threshold: 10.0,
            distance_saturation: 100.0,
            walk_threshold: 5.0,
            walk_saturation: 50.0,
        }
    }
}

impl ScoringConfig {
    /// Wait time threshold and saturation.
    pub fn wait(&self) -> (f64, f64) {
        (self.wait_threshold, self.wait_saturation)
    }

    /// Defect rate threshold and saturation, as fractions.
    pub fn defect(&self) -> (f64, f64) {
        (self.defect_threshold, self.defect_saturation)
    }

    /// Inventory threshold and saturation.
    pub fn inventory(&self) -> (f64, f64) {
        (self.inventory_threshold, self.inventory_saturation)
    }

    /// Transport distance threshold and saturation, in metres.
    pub fn distance(&self) -> (f64, f64) {
        (self.distance_threshold, self.distance_saturation)
    }

    /// Walking distance per unit threshold and saturation, in metres.
    pub fn walk(&self) -> (f64, f64) {
        (self.walk_threshold, self.walk_saturation)
    }

    fn validate(&self) -> Result<(), String> {
        let ranges = [
            ("wait", self.wait()),
            ("defect", self.defect()),
            ("inventory", self.inventory()),
            ("distance", self.distance()),
            ("walk", self.walk()),
        ];
        for (name, (threshold, saturation)) in ranges {
            if !(threshold.is_finite() && saturation.is_finite()) || threshold < 0.0 {
                return Err(format!(
                    "`scoring.{name}_threshold` and `scoring.{name}_saturation` must be finite and not negative"
                ));
            }
            if saturation <= threshold {
                return Err(format!(
                    "`scoring.{name}_saturation` ({saturation}) must be greater than `scoring.{name}_threshold` ({threshold})"
                ));
            }
        }
        Ok(())
    }
}

/// Process-wide figures used by the flow metrics.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessConfig {
    available_time: f64,
    time_unit: String,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            available_time: 480.0,
            time_unit: "min".to_string(),
        }
    }
}

impl ProcessConfig {
    /// Available production time per shift, in the input time unit.
    pub fn available_time(&self) -> f64 {
        self.available_time
    }

    /// Unit label printed next to times.
    pub fn time_unit(&self) -> &str {
        &self.time_unit
    }

    fn validate(&self) -> Result<(), String> {
        if !(self.available_time.is_finite() && self.available_time > 0.0) {
            return Err(format!(
                "`process.available_time` must be positive, got {}",
                self.available_time
            ));
        }
        Ok(())
    }
}

/// Visual styling configuration.
///
/// Colours are kept as strings and parsed on access so that a bad value is
/// reported with the setting it came from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    low_color: String,
    medium_color: String,
    high_color: String,
    info_color: String,
    push_color: String,
    pull_color: String,
    font_size: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            low_color: "#e3f2e1".to_string(),
            medium_color: "#fff2cc".to_string(),
            high_color: "#f8cecc".to_string(),
            info_color: "#dae8fc".to_string(),
            push_color: "#333333".to_string(),
            pull_color: "#1f6fb2".to_string(),
            font_size: 9.0,
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no colour is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured colour string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(|color| parse_color("background_color", color))
            .transpose()
    }

    /// Fill of material boxes scoring below 3.
    pub fn low_color(&self) -> Result<Color, String> {
        parse_color("low_color", &self.low_color)
    }

    /// Fill of material boxes scoring from 3 up to 6.
    pub fn medium_color(&self) -> Result<Color, String> {
        parse_color("medium_color", &self.medium_color)
    }

    /// Fill of material boxes scoring 6 or more.
    pub fn high_color(&self) -> Result<Color, String> {
        parse_color("high_color", &self.high_color)
    }

    pub fn info_color(&self) -> Result<Color, String> {
        parse_color("info_color", &self.info_color)
    }

    pub fn push_color(&self) -> Result<Color, String> {
        parse_color("push_color", &self.push_color)
    }

    pub fn pull_color(&self) -> Result<Color, String> {
        parse_color("pull_color", &self.pull_color)
    }

    /// Base font size of box text, in points.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    fn validate(&self) -> Result<(), String> {
        self.background_color()?;
        self.low_color()?;
        self.medium_color()?;
        self.high_color()?;
        self.info_color()?;
        self.push_color()?;
        self.pull_color()?;
        if !(self.font_size.is_finite() && self.font_size >= 4.0) {
            return Err(format!(
                "`style.font_size` must be at least 4, got {}",
                self.font_size
            ));
        }
        Ok(())
    }
}

fn parse_color(name: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid `style.{name}` in config: {err}"))
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.layout().spacing(), SpacingMode::Uniform);
        assert_eq!(config.process().time_unit(), "min");
        assert_eq!(config.layout().info_keywords().len(), 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
            [layout]
            spacing = "cycle-time"
            gap = 40.0

            [style]
            background_color = "#fafafa"
            "##,
        )
        .unwrap();

        assert_eq!(config.layout().spacing(), SpacingMode::CycleTime);
        assert_approx_eq!(f32, config.layout().gap(), 40.0);
        assert_approx_eq!(f32, config.layout().box_width(), 150.0);
        assert!(config.style().background_color().unwrap().is_some());
        assert_eq!(config.scoring().wait(), (5.0, 30.0));
        assert_eq!(config.scoring().walk(), (5.0, 50.0));
    }

    #[test]
    fn test_invalid_spacing_mode_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[layout]\nspacing = \"random\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_saturation_above_threshold() {
        let config: AppConfig =
            toml::from_str("[scoring]\nwait_threshold = 10.0\nwait_saturation = 10.0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("scoring.wait_saturation"), "{err}");
    }

    #[test]
    fn test_validate_distance_range() {
        let config: AppConfig = toml::from_str("[scoring]\ndistance_saturation = 5.0\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("scoring.distance_saturation"), "{err}");
    }

    #[test]
    fn test_validate_bad_color() {
        let config: AppConfig = toml::from_str("[style]\npull_color = \"not-a-color\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("style.pull_color"), "{err}");
    }

    #[test]
    fn test_validate_available_time() {
        let config: AppConfig = toml::from_str("[process]\navailable_time = 0.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_spacing_mode_from_str() {
        assert_eq!("wip".parse::<SpacingMode>(), Ok(SpacingMode::Wip));
        assert!("WIP".parse::<SpacingMode>().is_err());
        assert_eq!(SpacingMode::CycleTime.to_string(), "cycle-time");
    }
}
