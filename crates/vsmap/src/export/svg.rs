//! SVG preview backend built on the `svg` crate.

use log::{debug, info};
use svg::{Document, Node, node::element as svg_element};

use vsmap_core::{
    color::Color,
    draw::{
        DrawTarget, IconPrimitive, LinePrimitive, RectPrimitive, RenderLayer, StrokeDefinition,
        TextPrimitive,
    },
    geometry::{Point, Size},
};

use crate::{
    export::{self, Exporter},
    map::ValueStreamMap,
};

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Exports a map as a standalone SVG image.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgExporter;

impl Exporter for SvgExporter {
    fn export(&self, map: &ValueStreamMap) -> Result<Vec<u8>, export::Error> {
        info!(title = map.title(); "Exporting SVG");

        let mut target = SvgTarget::new(map.canvas().size());
        map.canvas().draw_to(&mut target)?;
        let doc = target.finish();

        debug!("SVG document rendered");
        Ok(doc.to_string().into_bytes())
    }
}

/// Collects primitives into one SVG group per render layer.
struct SvgTarget {
    size: Size,
    layers: Vec<svg_element::Group>,
}

impl SvgTarget {
    fn new(size: Size) -> Self {
        Self {
            size,
            layers: Vec::new(),
        }
    }

    fn push(&mut self, node: impl Into<Box<dyn Node>>) {
        if self.layers.is_empty() {
            self.layers.push(svg_element::Group::new());
        }
        if let Some(group) = self.layers.last_mut() {
            group.append(node);
        }
    }

    fn finish(self) -> Document {
        let (width, height) = (self.size.width(), self.size.height());
        let doc = Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        self.layers
            .into_iter()
            .fold(doc, |doc, layer| doc.add(layer))
    }
}

fn paint(color: Option<&Color>) -> String {
    color.map_or_else(|| "none".to_string(), Color::to_css_hex)
}

fn apply_stroke<T: Node>(mut node: T, stroke: Option<&StrokeDefinition>) -> T {
    match stroke {
        Some(stroke) => {
            node.assign("stroke", stroke.color().to_css_hex());
            node.assign("stroke-width", stroke.width());
            if let Some(dasharray) = stroke.style().to_svg_value() {
                node.assign("stroke-dasharray", dasharray);
            }
        }
        None => node.assign("stroke", "none"),
    }
    node
}

fn points_attribute(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x(), p.y()))
        .collect::<Vec<_>>()
        .join(" ")
}

impl DrawTarget for SvgTarget {
    type Error = export::Error;

    fn enter_layer(&mut self, layer: RenderLayer) -> Result<(), Self::Error> {
        self.layers
            .push(svg_element::Group::new().set("class", layer.name()));
        Ok(())
    }

    fn draw_rect(&mut self, rect: &RectPrimitive) -> Result<(), Self::Error> {
        let bounds = rect.bounds();
        let mut element = svg_element::Rectangle::new()
            .set("x", bounds.min_x())
            .set("y", bounds.min_y())
            .set("width", bounds.width())
            .set("height", bounds.height())
            .set("fill", paint(rect.fill()));
        if rect.is_rounded() {
            element = element.set("rx", rect.corner_radius());
        }
        self.push(apply_stroke(element, rect.stroke()));
        Ok(())
    }

    fn draw_line(&mut self, line: &LinePrimitive) -> Result<(), Self::Error> {
        let stroke = line.stroke();
        let polyline = svg_element::Polyline::new()
            .set("points", points_attribute(line.points()))
            .set("fill", "none");
        self.push(apply_stroke(polyline, Some(stroke)));

        if let Some(head) = line.head_polygon() {
            let polygon = svg_element::Polygon::new()
                .set("points", points_attribute(&head))
                .set("fill", stroke.color().to_css_hex());
            self.push(polygon);
        }
        Ok(())
    }

    fn draw_icon(&mut self, icon: &IconPrimitive) -> Result<(), Self::Error> {
        let mut group = svg_element::Group::new().set("class", icon.kind().name());
        for polygon in icon.kind().polygons(icon.bounds()) {
            let element = svg_element::Polygon::new()
                .set("points", points_attribute(&polygon))
                .set("fill", icon.fill().to_css_hex());
            group.append(apply_stroke(element, Some(icon.stroke())));
        }
        self.push(group);
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> Result<(), Self::Error> {
        let style = text.style();
        let anchor = text.anchor();
        let mut element = svg_element::Text::new(text.content())
            .set("x", anchor.x())
            .set("y", anchor.y())
            .set("text-anchor", style.align().to_svg_value())
            .set("font-family", FONT_FAMILY)
            .set("font-size", style.font_size())
            .set("fill", style.color().to_css_hex());
        if style.is_bold() {
            element = element.set("font-weight", "bold");
        }
        self.push(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vsmap_core::{
        draw::{ArrowHead, Canvas, IconKind, StrokeDefinition, TextStyle},
        geometry::Bounds,
    };

    use super::*;

    fn color(css: &str) -> Color {
        Color::new(css).unwrap()
    }

    fn render(canvas: &Canvas) -> String {
        let mut target = SvgTarget::new(canvas.size());
        canvas.draw_to(&mut target).unwrap();
        target.finish().to_string()
    }

    #[test]
    fn test_document_size() {
        let svg = render(&Canvas::new(Size::new(640.0, 320.0)));
        assert!(svg.contains("viewBox=\"0 0 640 320\""));
        assert!(svg.contains("width=\"640\""));
    }

    #[test]
    fn test_rect_and_dashed_arrow() {
        let mut canvas = Canvas::new(Size::new(200.0, 100.0));
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(100.0, 50.0));
        canvas.add(
            RenderLayer::Content,
            RectPrimitive::new(bounds)
                .with_fill(color("#f8cecc"))
                .rounded(),
        );
        canvas.add(
            RenderLayer::Arrow,
            LinePrimitive::new(
                Point::new(60.0, 20.0),
                Point::new(120.0, 20.0),
                StrokeDefinition::dashed(color("#1f6fb2"), 1.5),
            )
            .with_head(ArrowHead::End),
        );

        let svg = render(&canvas);
        assert!(svg.contains("fill=\"#f8cecc\""));
        assert!(svg.contains("rx=\"4\""));
        assert!(svg.contains("stroke-dasharray=\"6,4\""));
        assert!(svg.contains("<polygon"));
        assert!(svg.contains("class=\"arrow\""));
    }

    #[test]
    fn test_icon_and_text() {
        let mut canvas = Canvas::new(Size::new(200.0, 100.0));
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 10.0), Size::new(30.0, 18.0));
        canvas.add(
            RenderLayer::Icon,
            IconPrimitive::new(
                IconKind::Kanban,
                bounds,
                color("white"),
                StrokeDefinition::default(),
            ),
        );
        canvas.add(
            RenderLayer::Text,
            TextPrimitive::new(bounds, "Score: 6.29", TextStyle::new(9.0).bold()),
        );

        let svg = render(&canvas);
        assert!(svg.contains("class=\"kanban\""));
        assert!(svg.contains("Score: 6.29"));
        assert!(svg.contains("font-weight=\"bold\""));
    }
}
