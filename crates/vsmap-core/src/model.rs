//! Process model shared by every pipeline stage.
//!
//! - [`ProcessStep`] - one row of input, identified by its 1-based [`StepId`]
//! - [`FlowType`] - Push or Pull material flow
//! - [`WasteScore`] - the scorer's verdict for one step

mod score;
mod step;

pub use score::{Confidence, Factor, WasteCategory, WasteScore};
pub use step::{FlowType, ProcessStep, StepId};
