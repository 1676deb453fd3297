//! Value stream map icon glyphs.
//!
//! Icons are described as polygons in their bounding box so that the SVG and
//! PDF backends draw exactly the same outline. The PPTX backend maps each
//! icon onto the closest native preset geometry instead.

use crate::geometry::{Bounds, Point};

/// The icon glyphs used on a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    /// Striped arrow marking material pushed to the next step.
    PushArrow,
    /// Kanban card marking a pull signal.
    Kanban,
    /// Warning triangle marking inventory waiting in front of a step.
    Inventory,
}

impl IconKind {
    /// Filled polygons making up the glyph, main outline first.
    pub fn polygons(self, bounds: Bounds) -> Vec<Vec<Point>> {
        let (x0, y0) = (bounds.min_x(), bounds.min_y());
        let (w, h) = (bounds.width(), bounds.height());
        let at = |fx: f32, fy: f32| Point::new(x0 + w * fx, y0 + h * fy);

        match self {
            Self::PushArrow => {
                let body = vec![
                    at(0.3, 0.25),
                    at(0.65, 0.25),
                    at(0.65, 0.0),
                    at(1.0, 0.5),
                    at(0.65, 1.0),
                    at(0.65, 0.75),
                    at(0.3, 0.75),
                ];
                let stripe = |from: f32, to: f32| {
                    vec![at(from, 0.25), at(to, 0.25), at(to, 0.75), at(from, 0.75)]
                };
                vec![body, stripe(0.0, 0.08), stripe(0.14, 0.22)]
            }
            Self::Kanban => vec![vec![
                at(0.0, 0.0),
                at(0.72, 0.0),
                at(1.0, 0.28),
                at(1.0, 1.0),
                at(0.0, 1.0),
            ]],
            Self::Inventory => vec![vec![at(0.5, 0.0), at(1.0, 1.0), at(0.0, 1.0)]],
        }
    }

    /// DrawingML preset geometry that approximates the glyph.
    pub fn to_ooxml_preset(self) -> &'static str {
        match self {
            Self::PushArrow => "stripedRightArrow",
            Self::Kanban => "foldedCorner",
            Self::Inventory => "triangle",
        }
    }

    /// Short caption drawn inside the glyph, if any.
    pub fn caption(self) -> Option<&'static str> {
        match self {
            Self::PushArrow => None,
            Self::Kanban => Some("K"),
            Self::Inventory => Some("I"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::PushArrow => "push",
            Self::Kanban => "kanban",
            Self::Inventory => "inventory",
        }
    }
}
