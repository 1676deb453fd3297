//! The [`Canvas`] primitive collection and the [`DrawTarget`] backend trait.
//!
//! # Example
//!
//! ```
//! # use vsmap_core::draw::{Canvas, RectPrimitive, RenderLayer};
//! # use vsmap_core::geometry::{Bounds, Point, Size};
//! let mut canvas = Canvas::new(Size::new(400.0, 300.0));
//! let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(50.0, 20.0));
//! canvas.add(RenderLayer::Content, RectPrimitive::new(bounds));
//! assert_eq!(canvas.len(), 1);
//! ```

use crate::{
    draw::{IconPrimitive, LinePrimitive, Primitive, RectPrimitive, RenderLayer, TextPrimitive},
    geometry::Size,
};

/// A backend able to draw canvas primitives.
///
/// Implemented once per output format. Primitives arrive in layer order;
/// [`DrawTarget::enter_layer`] is called before the first primitive of each
/// non-empty layer.
pub trait DrawTarget {
    type Error;

    fn enter_layer(&mut self, _layer: RenderLayer) -> Result<(), Self::Error> {
        Ok(())
    }

    fn draw_rect(&mut self, rect: &RectPrimitive) -> Result<(), Self::Error>;

    fn draw_line(&mut self, line: &LinePrimitive) -> Result<(), Self::Error>;

    fn draw_icon(&mut self, icon: &IconPrimitive) -> Result<(), Self::Error>;

    fn draw_text(&mut self, text: &TextPrimitive) -> Result<(), Self::Error>;
}

/// A page-sized collection of primitives grouped by render layer.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    size: Size,
    items: Vec<(RenderLayer, Primitive)>,
}

impl Canvas {
    /// Creates an empty canvas of the given page size.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            items: Vec::new(),
        }
    }

    /// Adds a primitive to the specified layer.
    pub fn add(&mut self, layer: RenderLayer, primitive: impl Into<Primitive>) {
        self.items.push((layer, primitive.into()));
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Primitives in drawing order: by layer, then insertion order.
    pub fn primitives(&self) -> Vec<(RenderLayer, &Primitive)> {
        let mut ordered: Vec<_> = self
            .items
            .iter()
            .map(|(layer, primitive)| (*layer, primitive))
            .collect();
        // Stable sort keeps insertion order inside a layer
        ordered.sort_by_key(|(layer, _)| *layer);
        ordered
    }

    /// The text content of every text primitive, in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.primitives()
            .into_iter()
            .filter_map(|(_, primitive)| match primitive {
                Primitive::Text(text) => Some(text.content()),
                _ => None,
            })
            .collect()
    }

    /// Replays all primitives onto `target` in layer order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error reported by the target.
    pub fn draw_to<T: DrawTarget>(&self, target: &mut T) -> Result<(), T::Error> {
        let mut current_layer = None;

        for (layer, primitive) in self.primitives() {
            if current_layer != Some(layer) {
                target.enter_layer(layer)?;
                current_layer = Some(layer);
            }

            match primitive {
                Primitive::Rect(rect) => target.draw_rect(rect)?,
                Primitive::Line(line) => target.draw_line(line)?,
                Primitive::Icon(icon) => target.draw_icon(icon)?,
                Primitive::Text(text) => target.draw_text(text)?,
            }
        }

        Ok(())
    }
}
