//! PowerPoint backend.
//!
//! Writes a minimal PresentationML package by hand: slide one holds the map
//! as native shapes, the following slides hold the appendix tables (scoring,
//! then observations) as native tables. All
//! canvas coordinates are points and are converted to EMU (12700 per point).
//! Maps wider or taller than the largest slide PowerPoint accepts are scaled
//! down uniformly.

use std::io::{Cursor, Write};

use log::{debug, info};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use vsmap_core::{
    color::Color,
    draw::{
        ArrowHead, DrawTarget, IconPrimitive, LinePrimitive, RectPrimitive, StrokeDefinition,
        TextPrimitive,
    },
    geometry::{Bounds, Point, Size},
};

use crate::{
    export::{
        self, Exporter,
        appendix::{Appendix, Table},
        escape_xml,
    },
    map::ValueStreamMap,
};

const EMU_PER_POINT: f32 = 12700.0;

/// Slide size limits accepted by PowerPoint, in EMU.
const MIN_SLIDE_EMU: i64 = 914_400;
const MAX_SLIDE_EMU: i64 = 51_206_400;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const FONT: &str = "Arial";

/// Exports a map as a PowerPoint presentation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PptxExporter;

impl Exporter for PptxExporter {
    fn export(&self, map: &ValueStreamMap) -> Result<Vec<u8>, export::Error> {
        info!(title = map.title(); "Exporting PPTX");

        let slide = SlideGeometry::new(map.canvas().size());

        let mut writer = SlideWriter::new(slide.scale);
        map.canvas().draw_to(&mut writer)?;
        let mut slides = vec![slide_document(&writer.shapes)];

        let appendix = Appendix::new(map.analysis());
        slides.extend(
            appendix
                .tables()
                .iter()
                .map(|table| appendix_slide(table, &slide)),
        );

        debug!(
            width = slide.width,
            height = slide.height,
            scale = slide.scale,
            shapes = writer.next_id - 2,
            slides = slides.len();
            "Slides rendered"
        );

        package(map.title(), &slide, &slides)
    }
}

/// Slide size in EMU and the canvas scale that fits it.
#[derive(Debug, Clone, Copy)]
struct SlideGeometry {
    width: i64,
    height: i64,
    scale: f32,
}

impl SlideGeometry {
    fn new(canvas: Size) -> Self {
        let raw_width = canvas.width() * EMU_PER_POINT;
        let raw_height = canvas.height() * EMU_PER_POINT;
        let largest = raw_width.max(raw_height);
        let scale = if largest > MAX_SLIDE_EMU as f32 {
            MAX_SLIDE_EMU as f32 / largest
        } else {
            1.0
        };

        let clamp = |v: f32| ((v * scale).round() as i64).clamp(MIN_SLIDE_EMU, MAX_SLIDE_EMU);
        Self {
            width: clamp(raw_width),
            height: clamp(raw_height),
            scale,
        }
    }
}

/// Builds the shape tree of one slide from canvas primitives.
struct SlideWriter {
    shapes: String,
    next_id: u32,
    scale: f32,
}

impl SlideWriter {
    fn new(scale: f32) -> Self {
        Self {
            shapes: String::new(),
            // Id 1 is the group shape of the tree
            next_id: 2,
            scale,
        }
    }

    fn emu(&self, points: f32) -> i64 {
        (points * self.scale * EMU_PER_POINT).round() as i64
    }

    fn id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn xfrm(&self, bounds: Bounds) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.emu(bounds.min_x()),
            self.emu(bounds.min_y()),
            self.emu(bounds.width()).max(0),
            self.emu(bounds.height()).max(0),
        )
    }

    fn line_properties(&self, stroke: Option<&StrokeDefinition>, head: ArrowHead) -> String {
        let Some(stroke) = stroke else {
            return "<a:ln><a:noFill/></a:ln>".to_string();
        };
        let tail = match head {
            ArrowHead::End => r#"<a:tailEnd type="triangle"/>"#,
            ArrowHead::None => "",
        };
        format!(
            r#"<a:ln w="{}">{}<a:prstDash val="{}"/>{tail}</a:ln>"#,
            self.emu(stroke.width()),
            solid_fill(stroke.color()),
            stroke.style().to_ooxml_value(),
        )
    }

    fn shape(&mut self, name: &str, bounds: Bounds, geometry: &str, fill: &str, line: &str) {
        let id = self.id();
        let xfrm = self.xfrm(bounds);
        self.shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name} {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{xfrm}{geometry}{fill}{line}</p:spPr></p:sp>"#
        ));
    }

    fn connector(&mut self, from: Point, to: Point, line: &str) {
        let id = self.id();
        let bounds = Bounds::new_from_top_left(
            Point::new(from.x().min(to.x()), from.y().min(to.y())),
            Size::new((to.x() - from.x()).abs(), (to.y() - from.y()).abs()),
        );
        let mut flips = String::new();
        if to.x() < from.x() {
            flips.push_str(r#" flipH="1""#);
        }
        if to.y() < from.y() {
            flips.push_str(r#" flipV="1""#);
        }
        let xfrm = self.xfrm(bounds).replacen("<a:xfrm>", &format!("<a:xfrm{flips}>"), 1);
        self.shapes.push_str(&format!(
            r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="Connector {id}"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr>{xfrm}<a:prstGeom prst="line"><a:avLst/></a:prstGeom>{line}</p:spPr></p:cxnSp>"#
        ));
    }

    /// Freeform path through `points`, relative to their bounding box.
    fn freeform(&self, points: &[Point], bounds: Bounds) -> String {
        let (w, h) = (self.emu(bounds.width()), self.emu(bounds.height()));
        let mut path = String::new();
        for (index, point) in points.iter().enumerate() {
            let x = self.emu(point.x() - bounds.min_x());
            let y = self.emu(point.y() - bounds.min_y());
            let op = if index == 0 { "moveTo" } else { "lnTo" };
            path.push_str(&format!(r#"<a:{op}><a:pt x="{x}" y="{y}"/></a:{op}>"#));
        }
        format!(
            r#"<a:custGeom><a:avLst/><a:gdLst/><a:ahLst/><a:cxnLst/><a:rect l="0" t="0" r="r" b="b"/><a:pathLst><a:path w="{w}" h="{h}">{path}</a:path></a:pathLst></a:custGeom>"#
        )
    }
}

impl DrawTarget for SlideWriter {
    type Error = export::Error;

    fn draw_rect(&mut self, rect: &RectPrimitive) -> Result<(), Self::Error> {
        let geometry = preset(if rect.is_rounded() { "roundRect" } else { "rect" });
        let fill = rect.fill().map_or_else(|| "<a:noFill/>".to_string(), solid_fill);
        let line = self.line_properties(rect.stroke(), ArrowHead::None);
        self.shape("Rectangle", rect.bounds(), &geometry, &fill, &line);
        Ok(())
    }

    fn draw_line(&mut self, line: &LinePrimitive) -> Result<(), Self::Error> {
        let properties = self.line_properties(Some(line.stroke()), line.head());
        if let [from, to] = line.points() {
            self.connector(*from, *to, &properties);
        } else {
            let bounds = line.bounds();
            let geometry = self.freeform(line.points(), bounds);
            self.shape("Freeform", bounds, &geometry, "<a:noFill/>", &properties);
        }
        Ok(())
    }

    fn draw_icon(&mut self, icon: &IconPrimitive) -> Result<(), Self::Error> {
        let geometry = preset(icon.kind().to_ooxml_preset());
        let fill = solid_fill(icon.fill());
        let line = self.line_properties(Some(icon.stroke()), ArrowHead::None);
        self.shape(icon.kind().name(), icon.bounds(), &geometry, &fill, &line);
        Ok(())
    }

    fn draw_text(&mut self, text: &TextPrimitive) -> Result<(), Self::Error> {
        let id = self.id();
        let xfrm = self.xfrm(text.bounds());
        let style = text.style();
        let run = text_run(
            text.content(),
            style.font_size() * self.scale,
            style.is_bold(),
            style.color(),
        );
        self.shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="none" lIns="0" tIns="0" rIns="0" bIns="0" anchor="t"/><a:lstStyle/><a:p><a:pPr algn="{}"/>{run}</a:p></p:txBody></p:sp>"#,
            style.align().to_ooxml_value(),
        ));
        Ok(())
    }
}

fn preset(name: &str) -> String {
    format!(r#"<a:prstGeom prst="{name}"><a:avLst/></a:prstGeom>"#)
}

fn solid_fill(color: &Color) -> String {
    format!(r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.to_hex())
}

/// Font size in hundredths of a point, within the range DrawingML accepts.
fn font_size(points: f32) -> u32 {
    ((points * 100.0).round() as u32).clamp(100, 400_000)
}

fn text_run(content: &str, size: f32, bold: bool, color: &Color) -> String {
    format!(
        r#"<a:r><a:rPr lang="en-US" sz="{}" b="{}" dirty="0">{}<a:latin typeface="{FONT}"/></a:rPr><a:t>{}</a:t></a:r>"#,
        font_size(size),
        u8::from(bold),
        solid_fill(color),
        escape_xml(content),
    )
}

fn slide_document(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}

/// One appendix slide: a heading and one native table.
///
/// Rows shrink to fit the slide height.
fn appendix_slide(table: &Table<'_>, slide: &SlideGeometry) -> String {
    let black = Color::default();
    let margin = slide.width.min(slide.height) / 20;
    let heading_height = (slide.height / 10).clamp(1, 36 * EMU_PER_POINT as i64);
    let table_top = margin + heading_height;
    let table_width = slide.width - 2 * margin;
    let available = (slide.height - table_top - margin).max(1);

    let rows = table.rows.len() as i64 + 1;
    let row_height = (available / rows).min(22 * EMU_PER_POINT as i64);
    let cell_font = (row_height as f32 / EMU_PER_POINT * 0.55).min(11.0);
    let heading_font = (heading_height as f32 / EMU_PER_POINT * 0.6).min(20.0);

    let mut shapes = String::new();
    let heading = text_run(table.heading, heading_font, true, &black);
    shapes.push_str(&format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Heading"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{margin}" y="{margin}"/><a:ext cx="{table_width}" cy="{heading_height}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="none" lIns="0" tIns="0" rIns="0" bIns="0" anchor="t"/><a:lstStyle/><a:p>{heading}</a:p></p:txBody></p:sp>"#
    ));

    let mut grid = String::new();
    let mut used = 0;
    for (index, weight) in table.weights.iter().enumerate() {
        // Last column takes the rounding remainder
        let width = if index + 1 == table.weights.len() {
            table_width - used
        } else {
            (table_width as f32 * weight).round() as i64
        };
        used += width;
        grid.push_str(&format!(r#"<a:gridCol w="{width}"/>"#));
    }

    let mut table_rows = String::new();
    table_row(&mut table_rows, table.headers, row_height, cell_font, true);
    for row in &table.rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        table_row(&mut table_rows, &cells, row_height, cell_font, false);
    }

    let table_height = row_height * rows;
    shapes.push_str(&format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="3" name="Appendix"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="{margin}" y="{table_top}"/><a:ext cx="{table_width}" cy="{table_height}"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>{grid}</a:tblGrid>{table_rows}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
    ));

    slide_document(&shapes)
}

fn table_row(out: &mut String, cells: &[&str], height: i64, font: f32, header: bool) {
    let black = Color::default();
    out.push_str(&format!(r#"<a:tr h="{height}">"#));
    for cell in cells {
        let run = text_run(cell, font, header, &black);
        let fill = if header {
            r#"<a:solidFill><a:srgbClr val="D9D9D9"/></a:solidFill>"#
        } else {
            "<a:noFill/>"
        };
        out.push_str(&format!(
            r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/><a:p>{run}</a:p></a:txBody><a:tcPr marL="45720" marR="45720" marT="22860" marB="22860" anchor="ctr">{fill}</a:tcPr></a:tc>"#
        ));
    }
    out.push_str("</a:tr>");
}

/// Zips the slides together with the fixed presentation parts.
fn package(title: &str, slide: &SlideGeometry, slides: &[String]) -> Result<Vec<u8>, export::Error> {
    let mut buffer = Cursor::new(Vec::new());
    {
        let mut zip = ZipWriter::new(&mut buffer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut add = |name: &str, content: &str| -> Result<(), export::Error> {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
            Ok(())
        };

        add("[Content_Types].xml", &content_types(slides.len()))?;
        add("_rels/.rels", ROOT_RELS)?;
        add("docProps/core.xml", &core_properties(title))?;
        add("docProps/app.xml", APP_PROPERTIES)?;
        add("ppt/presentation.xml", &presentation(slide, slides.len()))?;
        add(
            "ppt/_rels/presentation.xml.rels",
            &presentation_rels(slides.len()),
        )?;
        add("ppt/slideMasters/slideMaster1.xml", &slide_master())?;
        add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships(&[
                ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                ("rId2", "theme", "../theme/theme1.xml"),
            ]),
        )?;
        add("ppt/slideLayouts/slideLayout1.xml", &slide_layout())?;
        add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        )?;
        add("ppt/theme/theme1.xml", &theme())?;

        for (index, content) in slides.iter().enumerate() {
            let number = index + 1;
            add(&format!("ppt/slides/slide{number}.xml"), content)?;
            add(
                &format!("ppt/slides/_rels/slide{number}.xml.rels"),
                &relationships(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            )?;
        }

        zip.finish()?;
    }
    Ok(buffer.into_inner())
}

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/></Relationships>"#;

const APP_PROPERTIES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>vsmap</Application></Properties>"#;

fn content_types(slides: usize) -> String {
    let mut overrides = String::new();
    for number in 1..=slides {
        overrides.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{number}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>{overrides}</Types>"#
    )
}

fn core_properties(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title><dc:creator>vsmap</dc:creator></cp:coreProperties>"#,
        escape_xml(title)
    )
}

fn presentation(slide: &SlideGeometry, slides: usize) -> String {
    let mut ids = String::new();
    for number in 1..=slides {
        // rId1 is the master, slides follow
        ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            255 + number,
            number + 1
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        slide.width, slide.height
    )
}

fn presentation_rels(slides: usize) -> String {
    let mut entries = vec![(
        "rId1".to_string(),
        "slideMaster",
        "slideMasters/slideMaster1.xml".to_string(),
    )];
    for number in 1..=slides {
        entries.push((
            format!("rId{}", number + 1),
            "slide",
            format!("slides/slide{number}.xml"),
        ));
    }
    entries.push((
        format!("rId{}", slides + 2),
        "theme",
        "theme/theme1.xml".to_string(),
    ));

    let borrowed: Vec<_> = entries
        .iter()
        .map(|(id, kind, target)| (id.as_str(), *kind, target.as_str()))
        .collect();
    relationships(&borrowed)
}

fn relationships(entries: &[(&str, &str, &str)]) -> String {
    let mut body = String::new();
    for (id, kind, target) in entries {
        body.push_str(&format!(
            r#"<Relationship Id="{id}" Type="{REL_BASE}/{kind}" Target="{target}"/>"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{body}</Relationships>"#
    )
}

const EMPTY_TREE: &str = r#"<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld>"#;

fn slide_master() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">{EMPTY_TREE}<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn slide_layout() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1">{EMPTY_TREE}<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn theme() -> String {
    let scheme_color = |name: &str, hex: &str| format!(r#"<a:{name}><a:srgbClr val="{hex}"/></a:{name}>"#);
    let colors = [
        ("dk1", "000000"),
        ("lt1", "FFFFFF"),
        ("dk2", "44546A"),
        ("lt2", "E7E6E6"),
        ("accent1", "4472C4"),
        ("accent2", "ED7D31"),
        ("accent3", "A5A5A5"),
        ("accent4", "FFC000"),
        ("accent5", "5B9BD5"),
        ("accent6", "70AD47"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ]
    .iter()
    .map(|(name, hex)| scheme_color(name, hex))
    .collect::<String>();

    let fonts = format!(r#"<a:latin typeface="{FONT}"/><a:ea typeface=""/><a:cs typeface=""/>"#);
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{NS_A}" name="vsmap"><a:themeElements><a:clrScheme name="vsmap">{colors}</a:clrScheme><a:fontScheme name="vsmap"><a:majorFont>{fonts}</a:majorFont><a:minorFont>{fonts}</a:minorFont></a:fontScheme><a:fmtScheme name="vsmap"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#
    )
}

#[cfg(test)]
mod tests {
    use vsmap_core::draw::{Canvas, IconKind, RenderLayer, StrokeDefinition, TextStyle};

    use super::*;

    fn render(canvas: &Canvas) -> String {
        let mut writer = SlideWriter::new(1.0);
        canvas.draw_to(&mut writer).unwrap();
        writer.shapes
    }

    #[test]
    fn test_slide_geometry() {
        let slide = SlideGeometry::new(Size::new(720.0, 540.0));
        assert_eq!(slide.width, 9_144_000);
        assert_eq!(slide.height, 6_858_000);
        assert_eq!(slide.scale, 1.0);

        let wide = SlideGeometry::new(Size::new(8000.0, 400.0));
        assert!(wide.width <= MAX_SLIDE_EMU && wide.width > MAX_SLIDE_EMU - 100);
        assert!(wide.scale < 1.0);

        let tiny = SlideGeometry::new(Size::new(10.0, 10.0));
        assert_eq!(tiny.height, MIN_SLIDE_EMU);
    }

    #[test]
    fn test_shapes_use_presets() {
        let mut canvas = Canvas::new(Size::new(400.0, 200.0));
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(100.0, 50.0));
        canvas.add(
            RenderLayer::Content,
            RectPrimitive::new(bounds)
                .with_fill(Color::new("#fff2cc").unwrap())
                .rounded(),
        );
        canvas.add(
            RenderLayer::Icon,
            IconPrimitive::new(
                IconKind::PushArrow,
                bounds,
                Color::default(),
                StrokeDefinition::default(),
            ),
        );

        let xml = render(&canvas);
        assert!(xml.contains(r#"<a:off x="127000" y="254000"/>"#));
        assert!(xml.contains(r#"<a:ext cx="1270000" cy="635000"/>"#));
        assert!(xml.contains(r#"prst="roundRect""#));
        assert!(xml.contains(r#"prst="stripedRightArrow""#));
        assert!(xml.contains(r#"<a:srgbClr val="FFF2CC"/>"#));
    }

    #[test]
    fn test_connector_flips_and_dashes() {
        let mut canvas = Canvas::new(Size::new(400.0, 200.0));
        canvas.add(
            RenderLayer::Arrow,
            LinePrimitive::new(
                Point::new(100.0, 50.0),
                Point::new(20.0, 50.0),
                StrokeDefinition::dashed(Color::default(), 1.5),
            )
            .with_head(ArrowHead::End),
        );

        let xml = render(&canvas);
        assert!(xml.contains("<p:cxnSp>"));
        assert!(xml.contains(r#"<a:xfrm flipH="1">"#));
        assert!(xml.contains(r#"<a:prstDash val="dash"/>"#));
        assert!(xml.contains(r#"<a:tailEnd type="triangle"/>"#));
    }

    #[test]
    fn test_polyline_is_freeform() {
        let mut canvas = Canvas::new(Size::new(400.0, 200.0));
        canvas.add(
            RenderLayer::Arrow,
            LinePrimitive::polyline(
                vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                ],
                StrokeDefinition::default(),
            ),
        );

        let xml = render(&canvas);
        assert!(xml.contains("<a:custGeom>"));
        assert_eq!(xml.matches("<a:lnTo>").count(), 2);
        assert!(!xml.contains("tailEnd"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut canvas = Canvas::new(Size::new(400.0, 200.0));
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 12.0));
        canvas.add(
            RenderLayer::Text,
            TextPrimitive::new(bounds, "R&D <cell>", TextStyle::new(9.0).bold()),
        );

        let xml = render(&canvas);
        assert!(xml.contains("<a:t>R&amp;D &lt;cell&gt;</a:t>"));
        assert!(xml.contains(r#"sz="900" b="1""#));
    }

    #[test]
    fn test_appendix_slide_table() {
        let cells = [
            "1".to_string(),
            "P1 Paint".to_string(),
            "Motion".to_string(),
            "5.00".to_string(),
            "60%".to_string(),
            "Operators walk 80 m per unit at Paint".to_string(),
        ];
        let table = Table {
            heading: "Observations",
            headers: &crate::export::appendix::OBSERVATION_HEADERS,
            weights: &[0.5, 0.1, 0.1, 0.1, 0.1, 0.1],
            rows: vec![&cells[..]],
        };
        let slide = SlideGeometry::new(Size::new(720.0, 540.0));
        let xml = appendix_slide(&table, &slide);

        assert!(xml.contains("<a:t>Observations</a:t>"));
        assert_eq!(xml.matches("<a:tr ").count(), 2);
        assert_eq!(xml.matches("<a:gridCol ").count(), 6);
        assert!(xml.contains("<a:t>Operators walk 80 m per unit at Paint</a:t>"));
    }

    #[test]
    fn test_presentation_lists_slides() {
        let slide = SlideGeometry::new(Size::new(720.0, 540.0));
        let xml = presentation(&slide, 2);
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000"/>"#));

        let rels = presentation_rels(2);
        assert!(rels.contains(r#"Id="rId4""#));
        assert!(rels.contains("theme/theme1.xml"));
    }
}
