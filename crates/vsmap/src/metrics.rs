//! Flow metrics: effective cycle time, queue time, lead time and PCE.
//!
//! All times share the unit of the input table. Downtime stretches a step's
//! cycle time, changeovers add their share of the shift, and a step without
//! a measured wait time queues for as long as its inventory takes to clear
//! the bottleneck.

use indexmap::IndexMap;
use log::{debug, info};

use vsmap_core::model::{ProcessStep, StepId};

/// Downtime above this fraction is treated as this fraction.
const MAX_DOWNTIME: f64 = 0.99;

/// Time figures of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepFlow {
    effective_cycle_time: f64,
    queue_time: f64,
    rework_time: f64,
}

impl StepFlow {
    pub fn new(effective_cycle_time: f64, queue_time: f64, rework_time: f64) -> Self {
        Self {
            effective_cycle_time,
            queue_time,
            rework_time,
        }
    }

    /// Cycle time including downtime and changeover losses.
    pub fn effective_cycle_time(&self) -> f64 {
        self.effective_cycle_time
    }

    /// Time spent waiting in front of the step.
    pub fn queue_time(&self) -> f64 {
        self.queue_time
    }

    pub fn rework_time(&self) -> f64 {
        self.rework_time
    }

    /// Total step time: effective cycle time, queue and rework.
    pub fn total(&self) -> f64 {
        self.effective_cycle_time + self.queue_time + self.rework_time
    }
}

/// Lead time of a whole value stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadTime {
    flows: IndexMap<StepId, StepFlow>,
    bottleneck: Option<StepId>,
    bottleneck_cycle_time: f64,
    value_added_time: f64,
}

impl LeadTime {
    /// Computes the flow metrics of `steps`.
    ///
    /// `available_time` is the production time per shift, used to spread
    /// changeover time over the parts made in a shift.
    pub fn compute(steps: &[ProcessStep], available_time: f64) -> Self {
        info!(steps = steps.len(); "Computing flow metrics");

        let effective: Vec<f64> = steps
            .iter()
            .map(|step| effective_cycle_time(step, available_time))
            .collect();

        // First step wins on ties
        let bottleneck = effective
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (index, ct)| match best {
                Some((_, best_ct)) if *ct <= best_ct => best,
                _ => Some((index, *ct)),
            })
            .filter(|(_, ct)| *ct > 0.0);

        let bottleneck_cycle_time = bottleneck.map_or(0.0, |(_, ct)| ct);

        let flows: IndexMap<_, _> = steps
            .iter()
            .zip(&effective)
            .map(|(step, ct)| {
                let queue = step
                    .wait_time()
                    .filter(|wait| *wait >= 0.0)
                    .unwrap_or_else(|| {
                        step.inventory().unwrap_or(0.0).max(0.0) * bottleneck_cycle_time
                    });
                let rework = step.rework_pct().unwrap_or(0.0).max(0.0) / 100.0
                    * step.cycle_time().unwrap_or(0.0).max(0.0);
                (step.id(), StepFlow::new(*ct, queue, rework))
            })
            .collect();

        let value_added_time = steps
            .iter()
            .filter_map(ProcessStep::cycle_time)
            .filter(|ct| *ct > 0.0)
            .sum();

        let lead_time = Self {
            flows,
            bottleneck: bottleneck.map(|(index, _)| steps[index].id()),
            bottleneck_cycle_time,
            value_added_time,
        };

        debug!(
            lead_time = lead_time.lead_time(),
            value_added = lead_time.value_added_time(),
            bottleneck:? = lead_time.bottleneck();
            "Flow metrics computed"
        );
        lead_time
    }

    /// Flow figures of `step`.
    pub fn step(&self, step: StepId) -> Option<&StepFlow> {
        self.flows.get(&step)
    }

    /// Flow figures of every step, in step order.
    pub fn flows(&self) -> impl Iterator<Item = (StepId, &StepFlow)> {
        self.flows.iter().map(|(id, flow)| (*id, flow))
    }

    /// The step with the longest effective cycle time, if any step has one.
    pub fn bottleneck(&self) -> Option<StepId> {
        self.bottleneck
    }

    pub fn bottleneck_cycle_time(&self) -> f64 {
        self.bottleneck_cycle_time
    }

    /// Sum of all step totals.
    pub fn lead_time(&self) -> f64 {
        self.flows.values().map(StepFlow::total).sum()
    }

    /// Sum of the raw cycle times.
    pub fn value_added_time(&self) -> f64 {
        self.value_added_time
    }

    /// Process cycle efficiency: value-added time over lead time, 0 for an
    /// empty stream.
    pub fn process_cycle_efficiency(&self) -> f64 {
        let lead_time = self.lead_time();
        if lead_time > 0.0 {
            self.value_added_time / lead_time
        } else {
            0.0
        }
    }
}

/// Cycle time of `step` with downtime and changeover losses added.
///
/// A missing cycle time counts as 0.
pub fn effective_cycle_time(step: &ProcessStep, available_time: f64) -> f64 {
    let cycle_time = step.cycle_time().unwrap_or(0.0).max(0.0);
    if cycle_time == 0.0 {
        return 0.0;
    }

    let downtime = (step.downtime_pct().unwrap_or(0.0) / 100.0).clamp(0.0, MAX_DOWNTIME);
    let uptime_adjusted = cycle_time / (1.0 - downtime);

    let changeover_loss = match (step.changeover_time(), step.changeovers_per_shift()) {
        (Some(time), Some(per_shift)) if time > 0.0 && per_shift > 0.0 && available_time > 0.0 => {
            time * per_shift * cycle_time / available_time
        }
        _ => 0.0,
    };

    uptime_adjusted + changeover_loss
}
