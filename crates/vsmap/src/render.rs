//! Turns a laid out [`Diagram`] into canvas primitives.
//!
//! The renderer decides what every box, arrow and icon looks like. Backends
//! only replay the resulting [`Canvas`], so the three export formats draw the
//! same map.

use log::{debug, info};

use vsmap_core::{
    color::Color,
    draw::{
        ArrowHead, Canvas, IconKind, IconPrimitive, LinePrimitive, RectPrimitive, RenderLayer,
        StrokeDefinition, TextAlign, TextPrimitive, TextStyle,
    },
    geometry::{Bounds, Insets, Point, Size},
    model::{FlowType, ProcessStep, WasteScore},
};

use crate::{
    VsmError,
    config::{ProcessConfig, StyleConfig},
    layout::{Arrow, Diagram, Lane, LaneAssignment},
    map::Analysis,
    score::ScoreBand,
};

const ICON_SIZE: (f32, f32) = (30.0, 18.0);
const INVENTORY_SIZE: (f32, f32) = (24.0, 20.0);
const TITLE_AREA_HEIGHT: f32 = 22.0;
const TEXT_INSET: f32 = 6.0;

/// Resolved colours of one render pass.
struct Palette {
    background: Color,
    bands: [Color; 3],
    info: Color,
    push: Color,
    pull: Color,
    ink: Color,
    lane: Color,
    lane_label: Color,
    lane_border: Color,
}

impl Palette {
    fn new(style: &StyleConfig) -> Result<Self, String> {
        let fixed = |css: &str| Color::new(css);
        Ok(Self {
            background: style.background_color()?.map_or_else(|| fixed("white"), Ok)?,
            bands: [style.low_color()?, style.medium_color()?, style.high_color()?],
            info: style.info_color()?,
            push: style.push_color()?,
            pull: style.pull_color()?,
            ink: fixed("#222222")?,
            lane: fixed("#f6f6f6")?,
            lane_label: fixed("#e6e6e6")?,
            lane_border: fixed("#bbbbbb")?,
        })
    }

    fn band(&self, score: f64) -> &Color {
        match ScoreBand::of(score) {
            ScoreBand::Low => &self.bands[0],
            ScoreBand::Medium => &self.bands[1],
            ScoreBand::High => &self.bands[2],
        }
    }

    fn flow(&self, flow: FlowType) -> &Color {
        match flow {
            FlowType::Push => &self.push,
            FlowType::Pull => &self.pull,
        }
    }
}

/// Renders diagrams with one style.
pub struct Renderer {
    style: StyleConfig,
    unit: String,
}

impl Renderer {
    pub fn new(style: &StyleConfig, process: &ProcessConfig) -> Self {
        Self {
            style: style.clone(),
            unit: process.time_unit().to_string(),
        }
    }

    /// Draws `diagram` with the scores and metrics of `analysis`.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Config`] when a configured colour does not parse.
    pub fn render(&self, diagram: &Diagram, analysis: &Analysis) -> Result<Canvas, VsmError> {
        info!(title = diagram.title(); "Rendering map");

        let palette = Palette::new(&self.style).map_err(VsmError::Config)?;
        let mut pass = Pass {
            canvas: Canvas::new(diagram.size()),
            palette,
            font_size: self.style.font_size(),
            unit: &self.unit,
        };

        pass.background(diagram);
        pass.title(diagram);
        pass.lanes(diagram);

        for assignment in diagram.assignments() {
            let (Some(step), Some(score)) = (
                analysis.step(assignment.step()),
                analysis.score(assignment.step()),
            ) else {
                continue;
            };
            match assignment.lane() {
                Lane::Material => {
                    pass.material_box(assignment, step, score);
                    pass.inventory(assignment, step);
                }
                Lane::Information => pass.info_box(assignment, step),
            }
        }

        for arrow in diagram.arrows() {
            pass.arrow(arrow);
        }

        pass.ladder(diagram, analysis);
        pass.summary(diagram, analysis);

        debug!(primitives = pass.canvas.len(); "Map rendered");
        Ok(pass.canvas)
    }
}

/// State of one render call.
struct Pass<'a> {
    canvas: Canvas,
    palette: Palette,
    font_size: f32,
    unit: &'a str,
}

impl Pass<'_> {
    fn text_style(&self) -> TextStyle {
        TextStyle::new(self.font_size).with_color(self.palette.ink.clone())
    }

    fn outline(&self) -> StrokeDefinition {
        StrokeDefinition::solid(self.palette.ink.clone(), 1.0)
    }

    /// Adds one line of text at the top of `area`, fitted to its width.
    fn line(&mut self, area: Bounds, content: &str, style: TextStyle) {
        let fitted = style.fit(content, area.width());
        let bounds = Bounds::new_from_top_left(
            area.min_point(),
            Size::new(area.width(), style.line_height()),
        );
        self.canvas
            .add(RenderLayer::Text, TextPrimitive::new(bounds, fitted, style));
    }

    /// Adds lines of text from the top of `area` downwards.
    fn lines(&mut self, area: Bounds, lines: &[String], style: &TextStyle) {
        let mut top = area.min_y();
        for content in lines {
            if top + style.line_height() > area.max_y() + 0.5 {
                break;
            }
            let row = Bounds::new_from_top_left(
                Point::new(area.min_x(), top),
                Size::new(area.width(), style.line_height()),
            );
            self.line(row, content, style.clone());
            top += style.line_height();
        }
    }

    fn background(&mut self, diagram: &Diagram) {
        let page = Bounds::new_from_top_left(Point::default(), diagram.size());
        self.canvas.add(
            RenderLayer::Background,
            RectPrimitive::new(page).with_fill(self.palette.background.clone()),
        );
    }

    fn title(&mut self, diagram: &Diagram) {
        let Some(first_lane) = diagram.lanes().first() else {
            return;
        };
        let style = TextStyle::new(self.font_size * 1.8)
            .bold()
            .with_color(self.palette.ink.clone());
        let area = Bounds::new_from_top_left(
            Point::new(
                first_lane.bounds().min_x(),
                first_lane.bounds().min_y() - style.line_height() - 8.0,
            ),
            Size::new(diagram.size().width(), style.line_height()),
        );
        self.line(area, diagram.title(), style);
    }

    fn lanes(&mut self, diagram: &Diagram) {
        for band in diagram.lanes() {
            let border = StrokeDefinition::solid(self.palette.lane_border.clone(), 0.75);
            self.canvas.add(
                RenderLayer::Lane,
                RectPrimitive::new(band.bounds())
                    .with_fill(self.palette.lane.clone())
                    .with_stroke(border.clone()),
            );
            self.canvas.add(
                RenderLayer::Lane,
                RectPrimitive::new(band.label_bounds())
                    .with_fill(self.palette.lane_label.clone())
                    .with_stroke(border),
            );

            let style = self.text_style().bold().with_align(TextAlign::Middle);
            let label = band.label_bounds();
            let top = label.center().y() - style.line_height();
            let area = Bounds::new_from_top_left(
                Point::new(label.min_x(), top),
                Size::new(label.width(), style.line_height() * 2.0),
            );
            self.lines(
                area,
                &[band.lane().label().to_string(), "flow".to_string()],
                &style,
            );
        }
    }

    fn material_box(&mut self, assignment: &LaneAssignment, step: &ProcessStep, score: &WasteScore) {
        let bounds = assignment.bounds();
        self.canvas.add(
            RenderLayer::Content,
            RectPrimitive::new(bounds)
                .with_fill(self.palette.band(score.score()).clone())
                .with_stroke(self.outline()),
        );

        // Title area
        let divider_y = bounds.min_y() + TITLE_AREA_HEIGHT;
        self.canvas.add(
            RenderLayer::Content,
            LinePrimitive::new(
                Point::new(bounds.min_x(), divider_y),
                Point::new(bounds.max_x(), divider_y),
                self.outline(),
            ),
        );
        let title_area = Bounds::new_from_top_left(
            Point::new(bounds.min_x(), bounds.min_y() + 4.0),
            Size::new(bounds.width(), TITLE_AREA_HEIGHT - 4.0),
        )
        .shrink(Insets::new(0.0, TEXT_INSET, 0.0, TEXT_INSET));
        let title = format!("{} {}", step.id(), step.name());
        self.line(
            title_area,
            &title,
            self.text_style().bold().with_align(TextAlign::Middle),
        );

        // Metrics area
        let metrics_area = Bounds::new_from_top_left(
            Point::new(bounds.min_x(), divider_y + 4.0),
            Size::new(bounds.width(), bounds.max_y() - divider_y - 4.0),
        )
        .shrink(Insets::new(0.0, TEXT_INSET, 2.0, TEXT_INSET));

        let unit = self.unit;
        let top = score.top_categories(2);
        let top = if top.is_empty() {
            "-".to_string()
        } else {
            top.iter().map(|c| c.name()).collect::<Vec<_>>().join(", ")
        };
        let lines = [
            format!("C/T: {}", time(step.cycle_time(), unit)),
            format!("Wait: {}", time(step.wait_time(), unit)),
            format!("Defects: {}", percent(step.defect_rate())),
            format!("Inventory: {}", number(step.inventory())),
            format!("Score: {:.2} ({})", score.score(), score.confidence()),
            format!("Top: {top}"),
        ];
        let style = self.text_style();
        self.lines(metrics_area, &lines, &style);
    }

    fn info_box(&mut self, assignment: &LaneAssignment, step: &ProcessStep) {
        let bounds = assignment.bounds();
        self.canvas.add(
            RenderLayer::Content,
            RectPrimitive::new(bounds)
                .with_fill(self.palette.info.clone())
                .with_stroke(self.outline())
                .rounded(),
        );

        let detail = if step.flow().is_pull() {
            "Kanban signal".to_string()
        } else {
            step.notes().unwrap_or_default().to_string()
        };

        let area = bounds.shrink(Insets::new(5.0, TEXT_INSET, 3.0, TEXT_INSET));
        let name_style = self.text_style().bold().with_align(TextAlign::Middle);
        self.line(area, step.name(), name_style.clone());
        let detail_area = Bounds::new_from_top_left(
            Point::new(area.min_x(), area.min_y() + name_style.line_height()),
            Size::new(area.width(), area.height() - name_style.line_height()),
        );
        let detail_style = self.text_style().with_align(TextAlign::Middle);
        self.lines(detail_area, &[detail], &detail_style);
    }

    /// Inventory triangle in the gap in front of a step holding inventory.
    fn inventory(&mut self, assignment: &LaneAssignment, step: &ProcessStep) {
        let Some(inventory) = step.inventory().filter(|v| *v > 0.0) else {
            return;
        };

        let bounds = assignment.bounds();
        let center = Point::new(
            bounds.min_x() - self.gap_center_offset(),
            bounds.center().y() + 10.0 + INVENTORY_SIZE.1 / 2.0,
        );
        let icon_bounds =
            Bounds::new_from_center(center, Size::new(INVENTORY_SIZE.0, INVENTORY_SIZE.1));
        self.icon(IconKind::Inventory, icon_bounds, self.palette.lane_label.clone());

        let style = self.text_style().with_align(TextAlign::Middle);
        let label = Bounds::new_from_top_left(
            Point::new(center.x() - 30.0, icon_bounds.max_y() + 2.0),
            Size::new(60.0, style.line_height()),
        );
        self.line(label, &number(Some(inventory)), style);
    }

    /// Distance from a box's left edge back to the middle of the gap before it.
    fn gap_center_offset(&self) -> f32 {
        INVENTORY_SIZE.0 / 2.0 + 8.0
    }

    fn icon(&mut self, kind: IconKind, bounds: Bounds, fill: Color) {
        self.canvas.add(
            RenderLayer::Icon,
            IconPrimitive::new(kind, bounds, fill, self.outline()),
        );
        if let Some(caption) = kind.caption() {
            let style = TextStyle::new(bounds.height() * 0.55)
                .bold()
                .with_color(self.palette.ink.clone())
                .with_align(TextAlign::Middle);
            let area = Bounds::new_from_center(
                Point::new(bounds.center().x(), bounds.center().y() + bounds.height() * 0.12),
                Size::new(bounds.width(), style.line_height()),
            );
            self.line(area, caption, style);
        }
    }

    fn arrow(&mut self, arrow: &Arrow) {
        let color = self.palette.flow(arrow.flow()).clone();
        let (stroke, kind, fill) = match arrow.flow() {
            FlowType::Push => (
                StrokeDefinition::solid(color.clone(), 1.5),
                IconKind::PushArrow,
                color,
            ),
            FlowType::Pull => (
                StrokeDefinition::dashed(color, 1.5),
                IconKind::Kanban,
                self.palette.info.clone(),
            ),
        };

        self.canvas.add(
            RenderLayer::Arrow,
            LinePrimitive::new(arrow.start(), arrow.end(), stroke).with_head(ArrowHead::End),
        );

        let mid = arrow.midpoint();
        let icon_bounds = Bounds::new_from_center(
            Point::new(mid.x(), mid.y() - 6.0 - ICON_SIZE.1 / 2.0),
            Size::new(ICON_SIZE.0, ICON_SIZE.1),
        );
        self.icon(kind, icon_bounds, fill);
    }

    fn ladder(&mut self, diagram: &Diagram, analysis: &Analysis) {
        let ladder = diagram.ladder();
        let (raised, lowered) = (ladder.raised_y(), ladder.lowered_y());
        let Some(first) = ladder.segments().first() else {
            return;
        };

        let mut points = vec![Point::new(first.queue_span().0, raised)];
        for segment in ladder.segments() {
            let (_, queue_end) = segment.queue_span();
            let (_, cycle_end) = segment.cycle_span();
            points.extend([
                Point::new(queue_end, raised),
                Point::new(queue_end, lowered),
                Point::new(cycle_end, lowered),
                Point::new(cycle_end, raised),
            ]);
        }
        self.canvas.add(
            RenderLayer::Arrow,
            LinePrimitive::polyline(points, StrokeDefinition::solid(self.palette.ink.clone(), 1.25)),
        );

        let style = self.text_style().with_align(TextAlign::Middle);
        for segment in ladder.segments() {
            let Some(flow) = analysis.lead_time().step(segment.step()) else {
                continue;
            };
            let step = analysis.step(segment.step());

            let (q0, q1) = segment.queue_span();
            let queue_label = Bounds::new_from_top_left(
                Point::new(q0, raised - style.line_height() - 2.0),
                Size::new(q1 - q0, style.line_height()),
            );
            self.line(queue_label, &time(Some(flow.queue_time()), self.unit), style.clone());

            let (c0, c1) = segment.cycle_span();
            let cycle_label = Bounds::new_from_top_left(
                Point::new(c0, lowered + 2.0),
                Size::new(c1 - c0, style.line_height()),
            );
            let cycle_time = step.and_then(ProcessStep::cycle_time);
            self.line(cycle_label, &time(cycle_time, self.unit), style.clone());
        }
    }

    fn summary(&mut self, diagram: &Diagram, analysis: &Analysis) {
        let bounds = diagram.ladder().summary_bounds();
        self.canvas.add(
            RenderLayer::Content,
            RectPrimitive::new(bounds)
                .with_fill(self.palette.background.clone())
                .with_stroke(self.outline()),
        );

        let lead = analysis.lead_time();
        let bottleneck = lead
            .bottleneck()
            .and_then(|id| analysis.step(id))
            .map_or_else(
                || "-".to_string(),
                |step| format!("{} {}", step.id(), step.name()),
            );

        let lines = [
            format!("Lead time: {}", time(Some(lead.lead_time()), self.unit)),
            format!("Value added: {}", time(Some(lead.value_added_time()), self.unit)),
            format!("PCE: {:.1}%", lead.process_cycle_efficiency() * 100.0),
            format!("Bottleneck: {bottleneck}"),
        ];
        let area = bounds.shrink(Insets::uniform(TEXT_INSET));
        let style = self.text_style();
        self.lines(area, &lines, &style);
    }
}

/// Formats a number with at most two decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_number)
}

fn time(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{} {unit}", format_number(value)),
        None => "-".to_string(),
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{}%", format_number(v * 100.0)))
}

#[cfg(test)]
mod tests {
    use vsmap_core::{
        draw::Primitive,
        model::{FlowType, StepId},
    };

    use super::*;
    use crate::{
        config::{AppConfig, LayoutConfig},
        layout::LayoutEngine,
        metrics::LeadTime,
        score::WasteScorer,
    };

    fn scenario() -> (Diagram, Analysis) {
        let steps = vec![
            ProcessStep::new(StepId::new(1), "A")
                .with_cycle_time(Some(1.0))
                .with_wait_time(Some(2.0))
                .with_defect_rate(Some(0.01))
                .with_inventory(Some(5.0)),
            ProcessStep::new(StepId::new(2), "B")
                .with_cycle_time(Some(4.0))
                .with_wait_time(Some(20.0))
                .with_defect_rate(Some(0.2))
                .with_inventory(Some(50.0))
                .with_flow(FlowType::Pull),
            ProcessStep::new(StepId::new(3), "C")
                .with_cycle_time(Some(2.0))
                .with_wait_time(Some(1.0))
                .with_defect_rate(Some(0.0))
                .with_inventory(Some(0.0)),
        ];
        let scores = WasteScorer::default().score_all(&steps);
        let lead = LeadTime::compute(&steps, 480.0);
        let diagram = LayoutEngine::new(&LayoutConfig::default())
            .layout("Scenario", &steps, &lead)
            .unwrap();
        (diagram, Analysis::new(steps, scores, lead))
    }

    fn render(diagram: &Diagram, analysis: &Analysis) -> Canvas {
        let config = AppConfig::default();
        Renderer::new(config.style(), config.process())
            .render(diagram, analysis)
            .unwrap()
    }

    fn icons(canvas: &Canvas) -> Vec<IconKind> {
        canvas
            .primitives()
            .into_iter()
            .filter_map(|(_, p)| match p {
                Primitive::Icon(icon) => Some(icon.kind()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(6.5), "6.5");
        assert_eq!(format_number(6.2889), "6.29");
        assert_eq!(format_number(-0.001), "0");
    }

    #[test]
    fn test_scenario_texts() {
        let (diagram, analysis) = scenario();
        let canvas = render(&diagram, &analysis);
        let texts = canvas.texts();

        assert!(texts.contains(&"Scenario"));
        assert!(texts.contains(&"P2 B"));
        assert!(texts.contains(&"Score: 6.29 (Medium)"));
        assert!(texts.contains(&"Top: Defects, Waiting"));
        assert!(texts.contains(&"Kanban signal"));
        assert!(texts.contains(&"Bottleneck: P2 B"));
        assert!(texts.contains(&"Lead time: 30 min"));
    }

    #[test]
    fn test_scenario_icons() {
        let (diagram, analysis) = scenario();
        let canvas = render(&diagram, &analysis);
        let icons = icons(&canvas);

        // A->B is a push arrow, B->C a pull arrow; A and B hold inventory
        assert_eq!(
            icons
                .iter()
                .filter(|k| **k == IconKind::PushArrow)
                .count(),
            1
        );
        assert_eq!(icons.iter().filter(|k| **k == IconKind::Kanban).count(), 1);
        assert_eq!(
            icons
                .iter()
                .filter(|k| **k == IconKind::Inventory)
                .count(),
            2
        );
    }

    #[test]
    fn test_pull_arrow_is_dashed() {
        let (diagram, analysis) = scenario();
        let canvas = render(&diagram, &analysis);

        let arrows: Vec<_> = canvas
            .primitives()
            .into_iter()
            .filter_map(|(_, p)| match p {
                Primitive::Line(line) if line.head() == ArrowHead::End => Some(line.clone()),
                _ => None,
            })
            .collect();

        assert_eq!(arrows.len(), 2);
        assert_eq!(
            arrows[0].stroke().style(),
            vsmap_core::draw::StrokeStyle::Solid
        );
        assert_eq!(
            arrows[1].stroke().style(),
            vsmap_core::draw::StrokeStyle::Dashed
        );
    }

    #[test]
    fn test_box_fill_follows_score_band() {
        let (diagram, analysis) = scenario();
        let canvas = render(&diagram, &analysis);
        let style = AppConfig::default().style().clone();

        let material_b = diagram
            .assignment(StepId::new(2), Lane::Material)
            .unwrap()
            .bounds();
        let fill = canvas
            .primitives()
            .into_iter()
            .find_map(|(_, p)| match p {
                Primitive::Rect(rect) if rect.bounds() == material_b => rect.fill().cloned(),
                _ => None,
            })
            .unwrap();
        assert_eq!(fill, style.high_color().unwrap());
    }

    #[test]
    fn test_wide_step_name_stays_inside_box() {
        let steps = vec![
            ProcessStep::new(StepId::new(1), "W".repeat(40))
                .with_cycle_time(Some(1.0))
                .with_wait_time(Some(2.0))
                .with_defect_rate(Some(0.01))
                .with_inventory(Some(5.0)),
        ];
        let scores = WasteScorer::default().score_all(&steps);
        let lead = LeadTime::compute(&steps, 480.0);
        let diagram = LayoutEngine::new(&LayoutConfig::default())
            .layout("Wide", &steps, &lead)
            .unwrap();
        let analysis = Analysis::new(steps, scores, lead);
        let canvas = render(&diagram, &analysis);

        let material = diagram
            .assignment(StepId::new(1), Lane::Material)
            .unwrap()
            .bounds();
        let title = canvas
            .primitives()
            .into_iter()
            .find_map(|(_, p)| match p {
                Primitive::Text(text) if text.content().starts_with("P1 W") => Some(text.clone()),
                _ => None,
            })
            .unwrap();

        let width = title.style().measure(title.content());
        assert!(title.content().ends_with("..."));
        assert!(title.start_x() >= material.min_x());
        assert!(title.start_x() + width <= material.max_x());
    }

    #[test]
    fn test_bad_color_is_config_error() {
        let (diagram, analysis) = scenario();
        let config: AppConfig = toml::from_str("[style]\nhigh_color = \"nope\"\n").unwrap();
        let err = Renderer::new(config.style(), config.process())
            .render(&diagram, &analysis)
            .unwrap_err();
        assert!(matches!(err, VsmError::Config(_)));
    }
}
