//! CSV loader for vsmap process-step tables.
//!
//! The single entry point is [`load`], which turns CSV text into ordered
//! [`ProcessStep`](vsmap_core::model::ProcessStep) records. Every problem
//! found in the input is reported as a [`error::Diagnostic`] with an error
//! code, a span into the source and a help message.

pub mod error;

mod loader;
mod schema;
mod span;

pub use loader::load;
pub use schema::{Column, normalize_header};
pub use span::Span;
