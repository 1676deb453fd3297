//! PDF backend built on `pdf-writer`.
//!
//! Page one is the map at canvas size, drawn with vector operators. The
//! appendix follows on A4 landscape pages. Text uses the built-in Helvetica
//! faces, so only ASCII is printed as is; other characters become `?`.
//! Content streams are left uncompressed.

use log::{debug, info};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use vsmap_core::{
    color::Color,
    draw::{
        DrawTarget, IconPrimitive, LinePrimitive, RectPrimitive, StrokeDefinition, TextPrimitive,
        TextStyle,
    },
    geometry::{Point, Size},
};

use crate::{
    export::{
        self, Exporter,
        appendix::{Appendix, Table},
    },
    map::ValueStreamMap,
};

const REGULAR: Name<'static> = Name(b"F1");
const BOLD: Name<'static> = Name(b"F2");

/// A4 landscape, in points.
const APPENDIX_PAGE: (f32, f32) = (842.0, 595.0);
const APPENDIX_MARGIN: f32 = 40.0;
const APPENDIX_HEADING: f32 = 30.0;
const APPENDIX_ROW: f32 = 18.0;
const APPENDIX_FONT: f32 = 9.0;

/// Exports a map as a PDF with the appendix on the following pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExporter;

impl Exporter for PdfExporter {
    fn export(&self, map: &ValueStreamMap) -> Result<Vec<u8>, export::Error> {
        info!(title = map.title(); "Exporting PDF");

        let size = map.canvas().size();
        let mut target = PdfTarget::new(size.height());
        map.canvas().draw_to(&mut target)?;

        let mut pages = vec![(size, target.content.finish())];

        let appendix = Appendix::new(map.analysis());
        pages.extend(
            appendix_pages(&appendix)
                .into_iter()
                .map(|content| (Size::new(APPENDIX_PAGE.0, APPENDIX_PAGE.1), content)),
        );

        debug!(pages = pages.len(); "PDF pages rendered");
        Ok(assemble(map.title(), pages))
    }
}

/// Writes the document structure around the page content streams.
fn assemble(title: &str, pages: Vec<(Size, Vec<u8>)>) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let tree_id = Ref::new(2);
    let regular_id = Ref::new(3);
    let bold_id = Ref::new(4);
    let info_id = Ref::new(5);
    let first_page = 6;

    // Each page takes two ids: the page and its content stream
    let page_ids: Vec<Ref> = (0..pages.len())
        .map(|index| Ref::new(first_page + 2 * index as i32))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .creator(TextStr("vsmap"));

    for ((size, content), page_id) in pages.into_iter().zip(&page_ids) {
        let content_id = Ref::new(page_id.get() + 1);
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, size.width(), size.height()));
        page.parent(tree_id);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(REGULAR, regular_id)
            .pair(BOLD, bold_id);
        page.finish();
        pdf.stream(content_id, &content);
    }

    pdf.type1_font(regular_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));

    pdf.finish()
}

/// Replays canvas primitives into one content stream, flipping y.
struct PdfTarget {
    content: Content,
    height: f32,
}

impl PdfTarget {
    fn new(height: f32) -> Self {
        Self {
            content: Content::new(),
            height,
        }
    }

    fn y(&self, y: f32) -> f32 {
        self.height - y
    }

    fn set_fill(&mut self, color: &Color) {
        let [r, g, b] = color.to_rgb();
        self.content.set_fill_rgb(r, g, b);
    }

    fn set_stroke(&mut self, stroke: &StrokeDefinition) {
        let [r, g, b] = stroke.color().to_rgb();
        self.content.set_stroke_rgb(r, g, b);
        self.content.set_line_width(stroke.width());
        match stroke.style().dash_pattern() {
            Some(pattern) => self.content.set_dash_pattern(pattern, 0.0),
            None => self.content.set_dash_pattern(std::iter::empty(), 0.0),
        };
    }

    fn polygon(&mut self, points: &[Point]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let y = self.y(first.y());
        self.content.move_to(first.x(), y);
        for point in rest {
            let y = self.y(point.y());
            self.content.line_to(point.x(), y);
        }
        self.content.close_path();
    }

    /// Paints the current path with the given fill and stroke.
    fn paint(&mut self, fill: Option<&Color>, stroke: Option<&StrokeDefinition>) {
        match (fill, stroke) {
            (Some(_), Some(_)) => self.content.fill_nonzero_and_stroke(),
            (Some(_), None) => self.content.fill_nonzero(),
            (None, Some(_)) => self.content.stroke(),
            (None, None) => self.content.end_path(),
        };
    }
}

impl DrawTarget for PdfTarget {
    type Error = export::Error;

    fn draw_rect(&mut self, rect: &RectPrimitive) -> Result<(), Self::Error> {
        self.content.save_state();
        if let Some(fill) = rect.fill() {
            self.set_fill(fill);
        }
        if let Some(stroke) = rect.stroke() {
            self.set_stroke(stroke);
        }

        let bounds = rect.bounds();
        let bottom = self.y(bounds.max_y());
        let radius = rect.corner_radius();
        if radius > 0.0 {
            rounded_rect(
                &mut self.content,
                bounds.min_x(),
                bottom,
                bounds.width(),
                bounds.height(),
                radius,
            );
        } else {
            self.content
                .rect(bounds.min_x(), bottom, bounds.width(), bounds.height());
        }
        self.paint(rect.fill(), rect.stroke());
        self.content.restore_state();
        Ok(())
    }

    fn draw_line(&mut self, line: &LinePrimitive) -> Result<(), Self::Error> {
        self.content.save_state();
        self.set_stroke(line.stroke());

        let points: Vec<(f32, f32)> = line
            .points()
            .iter()
            .map(|point| (point.x(), self.y(point.y())))
            .collect();
        if let Some(((x, y), rest)) = points.split_first() {
            self.content.move_to(*x, *y);
            for (x, y) in rest {
                self.content.line_to(*x, *y);
            }
            self.content.stroke();
        }

        if let Some(head) = line.head_polygon() {
            self.set_fill(line.stroke().color());
            self.polygon(&head);
            self.content.fill_nonzero();
        }
        self.content.restore_state();
        Ok(())
    }

    fn draw_icon(&mut self, icon: &IconPrimitive) -> Result<(), Self::Error> {
        self.content.save_state();
        self.set_fill(icon.fill());
        self.set_stroke(icon.stroke());
        for polygon in icon.kind().polygons(icon.bounds()) {
            self.polygon(&polygon);
            self.paint(Some(icon.fill()), Some(icon.stroke()));
        }
        self.content.restore_state();
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> Result<(), Self::Error> {
        let anchor = text.anchor();
        let baseline = self.y(anchor.y());
        show_text(
            &mut self.content,
            text.content(),
            text.style(),
            text.start_x(),
            baseline,
        );
        Ok(())
    }
}

/// Rectangle with circular-ish corners from four Bezier arcs.
///
/// `x`/`y` are the bottom-left corner in PDF space.
fn rounded_rect(content: &mut Content, x: f32, y: f32, width: f32, height: f32, radius: f32) {
    // Control point distance for a quarter circle
    let k = radius * 0.552_284_8;
    let (right, top) = (x + width, y + height);

    content.move_to(x + radius, y);
    content.line_to(right - radius, y);
    content.cubic_to(right - radius + k, y, right, y + radius - k, right, y + radius);
    content.line_to(right, top - radius);
    content.cubic_to(right, top - radius + k, right - radius + k, top, right - radius, top);
    content.line_to(x + radius, top);
    content.cubic_to(x + radius - k, top, x, top - radius + k, x, top - radius);
    content.line_to(x, y + radius);
    content.cubic_to(x, y + radius - k, x + radius - k, y, x + radius, y);
    content.close_path();
}

fn show_text(content: &mut Content, text: &str, style: &TextStyle, x: f32, baseline: f32) {
    let font = if style.is_bold() { BOLD } else { REGULAR };
    let [r, g, b] = style.color().to_rgb();
    let encoded = encode_text(text);

    content.save_state();
    content.set_fill_rgb(r, g, b);
    content.begin_text();
    content.set_font(font, style.font_size());
    content.next_line(x, baseline);
    content.show(Str(&encoded));
    content.end_text();
    content.restore_state();
}

/// Maps text onto the printable ASCII range of the standard fonts.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c as u8 } else { b'?' })
        .collect()
}

/// Every appendix table, each split over as many pages as needed.
fn appendix_pages(appendix: &Appendix) -> Vec<Vec<u8>> {
    appendix.tables().iter().flat_map(table_pages).collect()
}

fn table_pages(table: &Table<'_>) -> Vec<Vec<u8>> {
    let (width, height) = APPENDIX_PAGE;
    let table_width = width - 2.0 * APPENDIX_MARGIN;
    let table_top = APPENDIX_MARGIN + APPENDIX_HEADING;
    let rows_per_page = (((height - table_top - APPENDIX_MARGIN) / APPENDIX_ROW) as usize)
        .saturating_sub(1)
        .max(1);

    let columns: Vec<(f32, f32)> = table
        .weights
        .iter()
        .scan(APPENDIX_MARGIN, |x, weight| {
            let column = (*x, table_width * weight);
            *x += column.1;
            Some(column)
        })
        .collect();

    let chunks: Vec<_> = if table.rows.is_empty() {
        vec![&table.rows[..0]]
    } else {
        table.rows.chunks(rows_per_page).collect()
    };
    let page_count = chunks.len();

    let black = Color::default();
    let cell_style = TextStyle::new(APPENDIX_FONT).with_color(black.clone());
    let header_style = cell_style.clone().bold();
    let rule = StrokeDefinition::solid(Color::new("#999999").unwrap_or_default(), 0.5);
    let header: Vec<String> = table.headers.iter().map(|h| h.to_string()).collect();

    chunks
        .into_iter()
        .enumerate()
        .map(|(index, rows)| {
            let mut target = PdfTarget::new(height);

            let heading_style = TextStyle::new(14.0).bold().with_color(black.clone());
            let heading = if page_count > 1 {
                format!("{} ({}/{page_count})", table.heading, index + 1)
            } else {
                table.heading.to_string()
            };
            let heading_baseline = target.y(APPENDIX_MARGIN + heading_style.ascent());
            show_text(
                &mut target.content,
                &heading,
                &heading_style,
                APPENDIX_MARGIN,
                heading_baseline,
            );

            let lines = std::iter::once((&header[..], &header_style))
                .chain(rows.iter().map(|cells| (*cells, &cell_style)));

            for (line, (cells, style)) in lines.enumerate() {
                let top = table_top + line as f32 * APPENDIX_ROW;
                let baseline =
                    target.y(top + (APPENDIX_ROW - style.line_height()) / 2.0 + style.ascent());
                for ((x, column_width), cell) in columns.iter().zip(cells) {
                    let fitted = style.fit(cell, column_width - 6.0);
                    show_text(&mut target.content, &fitted, style, x + 3.0, baseline);
                }

                let below = target.y(top + APPENDIX_ROW);
                target.content.save_state();
                target.set_stroke(&rule);
                target.content.move_to(APPENDIX_MARGIN, below);
                target.content.line_to(APPENDIX_MARGIN + table_width, below);
                target.content.stroke();
                target.content.restore_state();
            }

            target.content.finish()
        })
        .collect()
}
