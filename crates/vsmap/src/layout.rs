//! Lane layout of a value stream map.
//!
//! The map has three horizontal rows: the information lane on top, the
//! material lane below it and the lead-time ladder at the bottom. Every step
//! gets a box in the material lane; steps that carry information flow get a
//! second box in the information lane, right above the first. Box x
//! positions grow strictly with step order.

use std::fmt;

use log::{debug, info, trace};

use vsmap_core::{
    geometry::{Bounds, Point, Size},
    model::{FlowType, ProcessStep, StepId},
};

use crate::{
    VsmError,
    config::{LayoutConfig, SpacingMode},
    metrics::LeadTime,
};

/// Width of the lane label column on the left of each lane.
const LABEL_WIDTH: f32 = 86.0;
/// Space between a lane band edge and the boxes inside it.
const LANE_PADDING: f32 = 14.0;
/// Height reserved for the title.
const TITLE_HEIGHT: f32 = 34.0;
/// Vertical distance between the raised and lowered ladder levels.
const LADDER_STEP: f32 = 26.0;
/// Room above and below the ladder for its labels.
const LADDER_LABEL_ROOM: f32 = 16.0;
pub const SUMMARY_WIDTH: f32 = 190.0;
pub const SUMMARY_HEIGHT: f32 = 74.0;

/// A horizontal row of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lane {
    /// Orders, schedules and Kanban signals
    Information,
    /// Physical flow of goods
    Material,
}

impl Lane {
    pub fn label(self) -> &'static str {
        match self {
            Self::Information => "Information",
            Self::Material => "Material",
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A step placed in a lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneAssignment {
    step: StepId,
    lane: Lane,
    bounds: Bounds,
}

impl LaneAssignment {
    pub fn step(&self) -> StepId {
        self.step
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Top-left corner of the step's box.
    pub fn position(&self) -> Point {
        self.bounds.min_point()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// A directed connection between two consecutive steps of one lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    from: StepId,
    to: StepId,
    lane: Lane,
    flow: FlowType,
    start: Point,
    end: Point,
}

impl Arrow {
    pub fn from(&self) -> StepId {
        self.from
    }

    pub fn to(&self) -> StepId {
        self.to
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    /// Flow type of the source step.
    pub fn flow(&self) -> FlowType {
        self.flow
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

/// Background band of a lane and its label cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneBand {
    lane: Lane,
    bounds: Bounds,
    label_bounds: Bounds,
}

impl LaneBand {
    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn label_bounds(&self) -> Bounds {
        self.label_bounds
    }
}

/// One step of the lead-time ladder.
///
/// The raised segment spans the gap in front of the step box and carries
/// its queue time; the lowered segment spans the box and carries its cycle
/// time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LadderSegment {
    step: StepId,
    queue: (f32, f32),
    cycle: (f32, f32),
}

impl LadderSegment {
    pub fn step(&self) -> StepId {
        self.step
    }

    /// Start and end x of the raised (queue) segment.
    pub fn queue_span(&self) -> (f32, f32) {
        self.queue
    }

    /// Start and end x of the lowered (cycle time) segment.
    pub fn cycle_span(&self) -> (f32, f32) {
        self.cycle
    }
}

/// The lead-time ladder below the material lane.
#[derive(Debug, Clone, PartialEq)]
pub struct Ladder {
    raised_y: f32,
    lowered_y: f32,
    segments: Vec<LadderSegment>,
    summary: Bounds,
}

impl Ladder {
    pub fn raised_y(&self) -> f32 {
        self.raised_y
    }

    pub fn lowered_y(&self) -> f32 {
        self.lowered_y
    }

    pub fn segments(&self) -> &[LadderSegment] {
        &self.segments
    }

    /// Box holding the lead time summary, right of the last step.
    pub fn summary_bounds(&self) -> Bounds {
        self.summary
    }
}

/// A fully laid out value stream map.
///
/// Built by [`LayoutEngine::layout`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    title: String,
    size: Size,
    lanes: Vec<LaneBand>,
    assignments: Vec<LaneAssignment>,
    arrows: Vec<Arrow>,
    ladder: Ladder,
}

impl Diagram {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Page size needed to draw the whole map.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn lanes(&self) -> &[LaneBand] {
        &self.lanes
    }

    /// Every lane assignment, material lane first, each lane in step order.
    pub fn assignments(&self) -> &[LaneAssignment] {
        &self.assignments
    }

    /// Assignments of one lane, in step order.
    pub fn lane(&self, lane: Lane) -> impl Iterator<Item = &LaneAssignment> {
        self.assignments.iter().filter(move |a| a.lane == lane)
    }

    /// The assignment of `step` in `lane`, if the step is in that lane.
    pub fn assignment(&self, step: StepId, lane: Lane) -> Option<&LaneAssignment> {
        self.assignments
            .iter()
            .find(|a| a.step == step && a.lane == lane)
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }
}

/// Whether `step` belongs in the information lane.
///
/// Pull steps always do. Other steps do when a word of their notes starts
/// with one of `keywords`, ignoring case.
pub fn is_information_step(step: &ProcessStep, keywords: &[String]) -> bool {
    if step.flow().is_pull() {
        return true;
    }

    let Some(notes) = step.notes() else {
        return false;
    };

    let notes = notes.to_lowercase();
    notes
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            keywords
                .iter()
                .any(|keyword| !keyword.is_empty() && word.starts_with(&keyword.to_lowercase()))
        })
}

/// Places steps into lanes.
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Lays out `steps` under `title`.
    ///
    /// `lead_time` feeds the cycle-time spacing mode.
    ///
    /// # Errors
    ///
    /// Returns [`VsmError::Layout`] when there are no steps.
    pub fn layout(
        &self,
        title: &str,
        steps: &[ProcessStep],
        lead_time: &LeadTime,
    ) -> Result<Diagram, VsmError> {
        if steps.is_empty() {
            return Err(VsmError::Layout(
                "no process steps to lay out, the input has no data rows".to_string(),
            ));
        }

        info!(steps = steps.len(), spacing:? = self.config.spacing(); "Laying out map");

        let cfg = &self.config;
        let margin = cfg.margin();
        let box_size = Size::new(cfg.box_width(), cfg.box_height());
        let info_size = Size::new(cfg.box_width(), cfg.info_box_height());

        // Vertical bands
        let info_top = margin + TITLE_HEIGHT;
        let info_height = info_size.height() + 2.0 * LANE_PADDING;
        let material_top = info_top + info_height + cfg.lane_gap();
        let material_height = box_size.height() + 2.0 * LANE_PADDING;
        let ladder_top = material_top + material_height + cfg.lane_gap();
        let raised_y = ladder_top + LADDER_LABEL_ROOM;
        let lowered_y = raised_y + LADDER_STEP;
        let ladder_height = (LADDER_STEP + 2.0 * LADDER_LABEL_ROOM).max(SUMMARY_HEIGHT);

        // Horizontal positions
        let lanes_left = margin;
        let first_x = lanes_left + LABEL_WIDTH + cfg.gap();
        let gaps = self.gaps_after(steps, lead_time);
        let mut xs = Vec::with_capacity(steps.len());
        let mut x = first_x;
        for gap in &gaps {
            xs.push(x);
            x += box_size.width() + gap;
        }

        let last_right = xs.last().map_or(first_x, |x| x + box_size.width());
        let summary = Bounds::new_from_top_left(
            Point::new(last_right + cfg.gap(), ladder_top),
            Size::new(SUMMARY_WIDTH, SUMMARY_HEIGHT),
        );
        let lanes_right = last_right + cfg.gap();
        let width = summary.max_x().max(lanes_right) + margin;
        let height = ladder_top + ladder_height + margin;

        let band = |lane, top, height| {
            let bounds =
                Bounds::new_from_top_left(Point::new(lanes_left, top), Size::new(lanes_right - lanes_left, height));
            let label_bounds =
                Bounds::new_from_top_left(Point::new(lanes_left, top), Size::new(LABEL_WIDTH, height));
            LaneBand {
                lane,
                bounds,
                label_bounds,
            }
        };
        let lanes = vec![
            band(Lane::Information, info_top, info_height),
            band(Lane::Material, material_top, material_height),
        ];

        // Material boxes for every step, information boxes above the
        // information-flow steps
        let material: Vec<_> = steps
            .iter()
            .zip(&xs)
            .map(|(step, x)| LaneAssignment {
                step: step.id(),
                lane: Lane::Material,
                bounds: Bounds::new_from_top_left(
                    Point::new(*x, material_top + LANE_PADDING),
                    box_size,
                ),
            })
            .collect();

        let information: Vec<_> = steps
            .iter()
            .zip(&xs)
            .filter(|(step, _)| is_information_step(step, cfg.info_keywords()))
            .map(|(step, x)| LaneAssignment {
                step: step.id(),
                lane: Lane::Information,
                bounds: Bounds::new_from_top_left(Point::new(*x, info_top + LANE_PADDING), info_size),
            })
            .collect();

        let mut arrows = connect(&material, steps);
        arrows.extend(connect(&information, steps));

        let segments = material
            .iter()
            .enumerate()
            .map(|(index, assignment)| {
                let bounds = assignment.bounds();
                let queue_start = match index {
                    0 => first_x - cfg.gap(),
                    _ => material[index - 1].bounds().max_x(),
                };
                LadderSegment {
                    step: assignment.step(),
                    queue: (queue_start, bounds.min_x()),
                    cycle: (bounds.min_x(), bounds.max_x()),
                }
            })
            .collect();

        let mut assignments = material;
        assignments.extend(information);

        let diagram = Diagram {
            title: title.to_string(),
            size: Size::new(width, height),
            lanes,
            assignments,
            arrows,
            ladder: Ladder {
                raised_y,
                lowered_y,
                segments,
                summary,
            },
        };

        debug!(
            assignments = diagram.assignments.len(),
            arrows = diagram.arrows.len(),
            width,
            height;
            "Layout calculated"
        );
        trace!(diagram:?; "Laid out diagram");
        Ok(diagram)
    }

    /// Horizontal gap after each step. The last step gets none.
    fn gaps_after(&self, steps: &[ProcessStep], lead_time: &LeadTime) -> Vec<f32> {
        let weights: Vec<f64> = match self.config.spacing() {
            SpacingMode::Uniform => vec![0.0; steps.len()],
            SpacingMode::CycleTime => steps
                .iter()
                .map(|step| {
                    lead_time
                        .step(step.id())
                        .map_or(0.0, |flow| flow.effective_cycle_time())
                })
                .collect(),
            SpacingMode::Wip => steps
                .iter()
                .map(|step| step.inventory().unwrap_or(0.0).max(0.0))
                .collect(),
        };

        let max = weights.iter().copied().fold(0.0_f64, f64::max);
        let last = steps.len().saturating_sub(1);

        weights
            .iter()
            .enumerate()
            .map(|(index, weight)| {
                if index == last {
                    0.0
                } else if max > 0.0 {
                    self.config.gap() + self.config.max_extra_gap() * (weight / max) as f32
                } else {
                    self.config.gap()
                }
            })
            .collect()
    }
}

/// Arrows between consecutive assignments of one lane, tagged with the
/// source step's flow type.
fn connect(assignments: &[LaneAssignment], steps: &[ProcessStep]) -> Vec<Arrow> {
    assignments
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            Arrow {
                from: from.step,
                to: to.step,
                lane: from.lane,
                flow: steps
                    .iter()
                    .find(|step| step.id() == from.step)
                    .map(ProcessStep::flow)
                    .unwrap_or_default(),
                start: from.bounds.right_center(),
                end: to.bounds.left_center(),
            }
        })
        .collect()
}
