//! Plain data row types written by output backends.
//!
//! Optional values are flattened to integers for tabular storage: a missing
//! level or colour is `-1`, and the parent uses [`Parent::code`].

use wsn_core::{ProblemId, RunId, SimParams};
use wsn_sim::{NodeReport, RunReport, RunSummary};
use wsn_topology::Parent;

/// One problem instance (node layout + failure timelines).
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemRow {
    pub problem_id:  u32,
    pub description: String,
    pub node_count:  u32,
}

impl ProblemRow {
    pub fn new(problem: ProblemId, description: impl Into<String>, node_count: usize) -> Self {
        Self {
            problem_id:  problem.0,
            description: description.into(),
            node_count:  node_count as u32,
        }
    }
}

/// Parameters and summary of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRow {
    pub run_id:                u32,
    pub problem_id:            u32,
    pub variant:               String,
    pub seed:                  u64,
    pub total_simulation_time: f64,
    pub transfer_time:         f64,
    pub recovery_time:         f64,
    pub energy_rate_sensing:   f64,
    pub energy_rate_transfer:  f64,
    pub transmission_range:    f64,
    pub interference_range:    f64,
    pub actual_total_duration: f64,
    pub final_failure_count:   u64,
    pub delivered_volume:      f64,
}

impl RunRow {
    pub fn new(
        run:     RunId,
        problem: ProblemId,
        variant: impl Into<String>,
        seed:    u64,
        params:  &SimParams,
        summary: &RunSummary,
    ) -> Self {
        Self {
            run_id:                run.0,
            problem_id:            problem.0,
            variant:               variant.into(),
            seed,
            total_simulation_time: params.total_simulation_time,
            transfer_time:         params.transfer_time,
            recovery_time:         params.recovery_time,
            energy_rate_sensing:   params.energy_rate_sensing,
            energy_rate_transfer:  params.energy_rate_transfer,
            transmission_range:    params.transmission_range,
            interference_range:    params.interference_range,
            actual_total_duration: summary.actual_total_duration,
            final_failure_count:   summary.final_failure_count,
            delivered_volume:      summary.delivered_volume,
        }
    }
}

/// Per-node result of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRow {
    pub run_id:                  u32,
    pub problem_id:              u32,
    pub node_id:                 u32,
    pub x:                       f64,
    pub y:                       f64,
    pub parent:                  i64,
    pub level:                   i64,
    pub child_count:             u32,
    pub descendant_count:        u32,
    pub color:                   i64,
    pub delta_opt:               f64,
    pub collection_time:         f64,
    pub wasted_time:             f64,
    pub total_data_sent:         f64,
    pub energy_consumed:         f64,
    pub energy_wasted:           f64,
    pub sent_packet_total_delay: f64,
    pub sent_packet_count:       u64,
    pub failure_count:           u64,
    pub failure_mean_interval:   f64,
    pub timeline_exhausted:      bool,
}

impl NodeRow {
    pub fn new(run: RunId, problem: ProblemId, node: &NodeReport) -> Self {
        Self {
            run_id:                  run.0,
            problem_id:              problem.0,
            node_id:                 node.id.0,
            x:                       node.position.x,
            y:                       node.position.y,
            parent:                  node.parent.code(),
            level:                   node.level.map_or(-1, i64::from),
            child_count:             node.child_count,
            descendant_count:        node.descendant_count,
            color:                   node.color.map_or(-1, i64::from),
            delta_opt:               node.delta_opt,
            collection_time:         node.collection_time,
            wasted_time:             node.wasted_time,
            total_data_sent:         node.total_data_sent,
            energy_consumed:         node.energy_consumed,
            energy_wasted:           node.energy_wasted,
            sent_packet_total_delay: node.sent_packet_total_delay,
            sent_packet_count:       node.sent_packet_count,
            failure_count:           node.failure_count,
            failure_mean_interval:   node.failure_mean_interval,
            timeline_exhausted:      node.timeline_exhausted,
        }
    }

    /// One row per node of `report`, in id order.
    pub fn from_report(run: RunId, problem: ProblemId, report: &RunReport) -> Vec<NodeRow> {
        report.nodes.iter().map(|n| NodeRow::new(run, problem, n)).collect()
    }

    /// `true` when the node had a route to the sink.
    pub fn is_routed(&self) -> bool {
        self.parent >= 0 || self.parent == Parent::Sink.code()
    }
}
