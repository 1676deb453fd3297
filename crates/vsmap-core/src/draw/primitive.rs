//! The four drawable primitives: rectangles, lines, icons and text.

use crate::{
    color::Color,
    draw::{IconKind, StrokeDefinition, TextStyle},
    geometry::{Bounds, Point},
};

/// A filled and/or outlined rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct RectPrimitive {
    bounds: Bounds,
    fill: Option<Color>,
    stroke: Option<StrokeDefinition>,
    rounded: bool,
}

impl RectPrimitive {
    /// Creates an unfilled, unstroked rectangle.
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds,
            fill: None,
            stroke: None,
            rounded: false,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_stroke(mut self, stroke: StrokeDefinition) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Draw with slightly rounded corners.
    pub fn rounded(mut self) -> Self {
        self.rounded = true;
        self
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn fill(&self) -> Option<&Color> {
        self.fill.as_ref()
    }

    pub fn stroke(&self) -> Option<&StrokeDefinition> {
        self.stroke.as_ref()
    }

    pub fn is_rounded(&self) -> bool {
        self.rounded
    }

    /// Corner radius used when the rectangle is rounded.
    pub fn corner_radius(&self) -> f32 {
        if self.rounded {
            (self.bounds.width().min(self.bounds.height()) * 0.08).min(6.0)
        } else {
            0.0
        }
    }
}

/// Decoration at the end of a line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ArrowHead {
    /// Plain line end
    #[default]
    None,
    /// Filled triangle at the last point
    End,
}

/// An open polyline with an optional arrow head.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrimitive {
    points: Vec<Point>,
    stroke: StrokeDefinition,
    head: ArrowHead,
}

impl LinePrimitive {
    /// Creates a straight line segment.
    pub fn new(from: Point, to: Point, stroke: StrokeDefinition) -> Self {
        Self::polyline(vec![from, to], stroke)
    }

    /// Creates a polyline through `points`.
    ///
    /// # Panics
    ///
    /// Panics if fewer than two points are given.
    pub fn polyline(points: Vec<Point>, stroke: StrokeDefinition) -> Self {
        assert!(points.len() >= 2, "a line needs at least two points");
        Self {
            points,
            stroke,
            head: ArrowHead::None,
        }
    }

    pub fn with_head(mut self, head: ArrowHead) -> Self {
        self.head = head;
        self
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }

    pub fn head(&self) -> ArrowHead {
        self.head
    }

    /// The bounding box of all points.
    pub fn bounds(&self) -> Bounds {
        let first = Bounds::new_from_center(self.points[0], Default::default());
        self.points.iter().skip(1).fold(first, |acc, point| {
            acc.merge(&Bounds::new_from_center(*point, Default::default()))
        })
    }

    /// Triangle for the arrow head at the end of the line, if any.
    ///
    /// The tip sits on the last point and the base is perpendicular to the
    /// final segment.
    pub fn head_polygon(&self) -> Option<[Point; 3]> {
        if self.head == ArrowHead::None {
            return None;
        }

        let tip = self.end();
        let prev = self.points[self.points.len() - 2];
        let delta = tip.sub_point(prev);
        let length = delta.hypot();
        if length <= f32::EPSILON {
            return None;
        }

        let size = 4.0 + self.stroke.width() * 2.0;
        let dir = delta.scale(1.0 / length);
        let normal = Point::new(-dir.y(), dir.x());
        let base = tip.sub_point(dir.scale(size));

        Some([
            tip,
            base.add_point(normal.scale(size * 0.5)),
            base.sub_point(normal.scale(size * 0.5)),
        ])
    }
}

/// A value stream map icon placed in a box.
#[derive(Debug, Clone, PartialEq)]
pub struct IconPrimitive {
    kind: IconKind,
    bounds: Bounds,
    fill: Color,
    stroke: StrokeDefinition,
}

impl IconPrimitive {
    pub fn new(kind: IconKind, bounds: Bounds, fill: Color, stroke: StrokeDefinition) -> Self {
        Self {
            kind,
            bounds,
            fill,
            stroke,
        }
    }

    pub fn kind(&self) -> IconKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn fill(&self) -> &Color {
        &self.fill
    }

    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

/// A single line of text placed in a line box.
///
/// The text is aligned horizontally inside `bounds` according to its style,
/// and its baseline sits at `bounds.min_y() + style.ascent()`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    bounds: Bounds,
    content: String,
    style: TextStyle,
}

impl TextPrimitive {
    pub fn new(bounds: Bounds, content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            bounds,
            content: content.into(),
            style,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// The baseline anchor point for backends that position text by anchor.
    pub fn anchor(&self) -> Point {
        let x = match self.style.align() {
            crate::draw::TextAlign::Start => self.bounds.min_x(),
            crate::draw::TextAlign::Middle => self.bounds.center().x(),
            crate::draw::TextAlign::End => self.bounds.max_x(),
        };
        Point::new(x, self.bounds.min_y() + self.style.ascent())
    }

    /// The x-coordinate where the text starts, from the measured width.
    pub fn start_x(&self) -> f32 {
        let width = self.style.measure(&self.content);
        match self.style.align() {
            crate::draw::TextAlign::Start => self.bounds.min_x(),
            crate::draw::TextAlign::Middle => self.bounds.center().x() - width / 2.0,
            crate::draw::TextAlign::End => self.bounds.max_x() - width,
        }
    }
}

/// Any drawable primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(RectPrimitive),
    Line(LinePrimitive),
    Icon(IconPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    /// The area covered by the primitive.
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Rect(rect) => rect.bounds(),
            Self::Line(line) => line.bounds(),
            Self::Icon(icon) => icon.bounds(),
            Self::Text(text) => text.bounds(),
        }
    }
}

impl From<RectPrimitive> for Primitive {
    fn from(rect: RectPrimitive) -> Self {
        Self::Rect(rect)
    }
}

impl From<LinePrimitive> for Primitive {
    fn from(line: LinePrimitive) -> Self {
        Self::Line(line)
    }
}

impl From<IconPrimitive> for Primitive {
    fn from(icon: IconPrimitive) -> Self {
        Self::Icon(icon)
    }
}

impl From<TextPrimitive> for Primitive {
    fn from(text: TextPrimitive) -> Self {
        Self::Text(text)
    }
}
