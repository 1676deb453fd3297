//! vsmap - Value stream maps from process step tables.
//!
//! Loads a CSV table of process steps, scores every step for waste, ranks
//! waste observations, computes lead time metrics, lays the steps out on
//! Information and Material flow lanes and exports the result as PPTX, PDF
//! or SVG.
//!
//! The pipeline runs in fixed stages:
//!
//! ```text
//! CSV text
//!     ↓ load      (vsmap-parser)
//! Process steps
//!     ↓ analyze   (score + metrics + observations)
//! Analysis
//!     ↓ layout
//! Diagram
//!     ↓ render
//! Canvas
//!     ↓ export
//! Document bytes / files
//! ```

pub mod config;
pub mod export;
pub mod layout;
pub mod metrics;
pub mod observe;
pub mod render;
pub mod score;

mod error;
mod map;

pub use vsmap_core::{color, draw, geometry, model};

pub use error::VsmError;
pub use export::Format;
pub use map::{Analysis, ValueStreamMap};

use std::{
    ffi::OsString,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use indexmap::IndexSet;
use log::{debug, info, trace, warn};
use tempfile::NamedTempFile;

use config::AppConfig;
use draw::Canvas;
use layout::{Diagram, LayoutEngine};
use metrics::LeadTime;
use model::ProcessStep;
use observe::ObservationEngine;
use render::Renderer;
use score::WasteScorer;

/// Builder for turning process step tables into value stream maps.
///
/// Holds only configuration; every call works on fresh values, so one builder
/// can serve many inputs.
///
/// # Examples
///
/// ```rust,no_run
/// use vsmap::{Format, MapBuilder, config::AppConfig};
///
/// let source = "step,cycle_time,wait_time,defect_rate,inventory,flow_type,notes\n\
///               Cut,1,2,0.01,5,Push,\n";
///
/// let builder = MapBuilder::new(AppConfig::default());
/// let map = builder.build("Line 1", source).expect("Failed to build map");
/// let pdf = builder
///     .export_to_bytes(&map, Format::Pdf)
///     .expect("Failed to export");
/// ```
#[derive(Debug, Default)]
pub struct MapBuilder {
    config: AppConfig,
}

impl MapBuilder {
    /// Create a new map builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load process steps from CSV text.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Schema`] when required columns are missing and
    /// [`VsmError::Parse`] when a row holds an invalid value.
    pub fn load(&self, source: &str) -> Result<Vec<ProcessStep>, VsmError> {
        info!(bytes = source.len(); "Loading process steps");

        let steps =
            vsmap_parser::load(source).map_err(|err| VsmError::new_load_error(err, source))?;

        debug!(steps = steps.len(); "Process steps loaded");
        trace!(steps:?; "Loaded steps");
        Ok(steps)
    }

    /// Score the steps, compute their flow metrics and rank observations.
    pub fn analyze(&self, steps: Vec<ProcessStep>) -> Analysis {
        info!(steps = steps.len(); "Analyzing process steps");

        let scores = WasteScorer::new(self.config.scoring()).score_all(&steps);
        let lead_time = LeadTime::compute(&steps, self.config.process().available_time());
        let observations =
            ObservationEngine::new(self.config.scoring(), self.config.process().time_unit())
                .observe(&steps, &scores);
        Analysis::new(steps, scores, lead_time).with_observations(observations)
    }

    /// Place the analysed steps on the flow lanes.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Layout`] when there are no steps.
    pub fn layout(&self, title: &str, analysis: &Analysis) -> Result<Diagram, VsmError> {
        LayoutEngine::new(self.config.layout()).layout(
            title,
            analysis.steps(),
            analysis.lead_time(),
        )
    }

    /// Draw a laid out diagram.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Config`] when a configured colour is invalid.
    pub fn render(&self, diagram: &Diagram, analysis: &Analysis) -> Result<Canvas, VsmError> {
        Renderer::new(self.config.style(), self.config.process()).render(diagram, analysis)
    }

    /// Run the whole pipeline from CSV text to a finished map.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Config`] for invalid configuration, or the error
    /// of the first failing stage.
    pub fn build(&self, title: &str, source: &str) -> Result<ValueStreamMap, VsmError> {
        self.config.validate().map_err(VsmError::Config)?;

        let steps = self.load(source)?;
        let analysis = self.analyze(steps);
        let diagram = self.layout(title, &analysis)?;
        let canvas = self.render(&diagram, &analysis)?;

        info!(title, steps = analysis.steps().len(); "Value stream map built");
        Ok(ValueStreamMap::new(analysis, diagram, canvas))
    }

    /// Render `map` into the bytes of one document.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Export`] when the backend fails.
    pub fn export_to_bytes(&self, map: &ValueStreamMap, format: Format) -> Result<Vec<u8>, VsmError> {
        let bytes = format.exporter().export(map)?;
        debug!(format:? = format, bytes = bytes.len(); "Document exported");
        Ok(bytes)
    }

    /// Write `map` next to `base` once per format, as `<base>.<extension>`.
    ///
    /// Every document is rendered before any file is touched. Documents are
    /// written to temporary files in the target directory and only renamed
    /// into place once all of them were written. If renaming one of them
    /// fails, the documents already renamed by this call are removed again.
    ///
    /// Returns the written paths in the order of `formats`, duplicates removed.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Export`] if rendering or writing any document fails.
    pub fn write_outputs(
        &self,
        map: &ValueStreamMap,
        base: &Path,
        formats: &[Format],
    ) -> Result<Vec<PathBuf>, VsmError> {
        let formats: IndexSet<Format> = formats.iter().copied().collect();
        info!(base:? = base, formats:? = formats; "Writing documents");

        let documents = formats
            .iter()
            .map(|format| -> Result<_, VsmError> {
                Ok((output_path(base, *format), self.export_to_bytes(map, *format)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let dir = match base.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(export::Error::from)?;

        let mut staged = Vec::with_capacity(documents.len());
        for (path, bytes) in documents {
            let mut file = NamedTempFile::new_in(&dir).map_err(export::Error::from)?;
            file.write_all(&bytes).map_err(export::Error::from)?;
            file.flush().map_err(export::Error::from)?;
            staged.push((path, file));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (path, file) in staged {
            if let Err(err) = file.persist(&path) {
                warn!(path:? = path, written = written.len(); "Failed to persist document, rolling back");
                remove_written(&written);
                return Err(export::Error::from(err.error).into());
            }
            info!(path:? = path; "Document written");
            written.push(path);
        }

        Ok(written)
    }
}

/// Removes documents persisted by a `write_outputs` call that then failed.
fn remove_written(paths: &[PathBuf]) {
    for path in paths {
        if let Err(err) = fs::remove_file(path) {
            warn!(path:? = path, err:? = err; "Failed to remove partially written document");
        }
    }
}

/// `<base>.<extension>`, keeping any dots already in `base`.
fn output_path(base: &Path, format: Format) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("out/vsm"), Format::Pdf),
            PathBuf::from("out/vsm.pdf")
        );
        assert_eq!(
            output_path(Path::new("line.v2"), Format::Pptx),
            PathBuf::from("line.v2.pptx")
        );
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let config: AppConfig = toml::from_str("[process]\navailable_time = -1.0\n").unwrap();
        let err = MapBuilder::new(config)
            .build("t", "step,cycle_time,wait_time,defect_rate,inventory,flow_type,notes\nA,1,,,,,\n")
            .unwrap_err();
        assert!(matches!(err, VsmError::Config(_)));
    }

    #[test]
    fn test_load_error_is_schema() {
        let err = MapBuilder::default().load("step,cycle_time\nA,1\n").unwrap_err();
        assert!(matches!(err, VsmError::Schema { .. }));
    }
}
