//! Backend-neutral drawing primitives.
//!
//! The renderer turns a laid out map into a [`Canvas`] of [`Primitive`]s.
//! Each document backend (SVG, PPTX, PDF) implements [`DrawTarget`] and the
//! canvas replays its primitives onto it in layer order, so layout and
//! rendering logic exist once regardless of the output format.

pub mod font;

mod canvas;
mod icon;
mod layer;
mod primitive;
mod stroke;
mod text;

pub use canvas::{Canvas, DrawTarget};
pub use icon::IconKind;
pub use layer::RenderLayer;
pub use primitive::{ArrowHead, IconPrimitive, LinePrimitive, Primitive, RectPrimitive, TextPrimitive};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use text::{TextAlign, TextStyle};
