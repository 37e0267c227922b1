//! Integration tests for wsn-sim.

use wsn_core::{Distribution, NodeId, Position, SimParams, SimRng};
use wsn_schedule::{Event, RandomDeltas, WorkingState};
use wsn_topology::{Parent, SensorNetwork};

use crate::{
    FailureBudget, NoopObserver, Packet, RunLedger, RunReport, SimBuilder, SimError, SimObserver,
    Stages,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
}

macro_rules! assert_approx {
    ($a:expr, $b:expr) => {
        assert!(approx($a, $b), "{} = {} but expected {}", stringify!($a), $a, $b)
    };
}

/// T = 10, R = 10, sensing 1/s, transfer 0.001/s/m².
fn chain_params(total: f64) -> SimParams {
    SimParams {
        total_simulation_time: total,
        transfer_time:         10.0,
        recovery_time:         10.0,
        energy_rate_sensing:   1.0,
        energy_rate_transfer:  0.001,
        transmission_range:    100.0,
        interference_range:    300.0,
    }
}

fn constant_deltas(value: f64) -> Stages {
    Stages::default().deltas(RandomDeltas::new(Distribution::Constant { value }).unwrap())
}

/// Node 0 at (50,0) talks to the sink; node 1 at (130,0) relays through
/// node 0.  Colours 0 and 1, every delta 25 s, so node 0 transfers at 20 and
/// node 1 at 30.
fn run_chain(total: f64, failures: Vec<Vec<f64>>) -> (RunReport, crate::Simulator) {
    let positions = vec![Position::new(50.0, 0.0), Position::new(130.0, 0.0)];
    let mut sim = SimBuilder::new(chain_params(total), positions, failures)
        .stages(constant_deltas(25.0))
        .build()
        .unwrap();
    let report = sim.run(&mut NoopObserver).unwrap();
    (report, sim)
}

fn scattered_problem(n: usize, seed: u64) -> (Vec<Position>, Vec<Vec<f64>>) {
    let mut rng = SimRng::new(seed);
    let positions = (0..n)
        .map(|_| Position::new(rng.gen_range(-150.0..150.0), rng.gen_range(-150.0..150.0)))
        .collect();
    let gaps = Distribution::Exponential { mean: 2_000.0 };
    let failures = (0..n)
        .map(|_| {
            let mut t = 0.0;
            let mut stamps = Vec::new();
            while t < 60_000.0 {
                t += gaps.sample(&mut rng).max(1e-3);
                stamps.push(t);
            }
            stamps
        })
        .collect();
    (positions, failures)
}

fn scattered_params() -> SimParams {
    SimParams {
        total_simulation_time: 50_000.0,
        transfer_time:         60.0,
        recovery_time:         120.0,
        ..SimParams::default()
    }
}

// ── Builder validation ────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    fn one_node(params: SimParams, failures: Vec<Vec<f64>>) -> Result<crate::Simulator, SimError> {
        SimBuilder::new(params, vec![Position::new(10.0, 0.0)], failures).build()
    }

    #[test]
    fn builds_with_defaults() {
        let sim = one_node(SimParams::default(), vec![vec![5.0]]).unwrap();
        assert_eq!(sim.network().len(), 1);
        assert_eq!(sim.network().node(NodeId(0)).parent, Parent::Sink);
        assert_eq!(sim.schedule().color_count(), 1);
        assert_eq!(sim.ledger().node(NodeId(0)).current_parent, Parent::Sink);
        assert_eq!(sim.ledger().node(NodeId(0)).current_color, Some(0));
    }

    #[test]
    fn failure_count_mismatch_errors() {
        let err = one_node(SimParams::default(), vec![]).unwrap_err();
        assert!(matches!(err, SimError::LengthMismatch { expected: 1, got: 0, .. }));
    }

    #[test]
    fn bad_params_rejected() {
        let p = SimParams { recovery_time: -1.0, ..SimParams::default() };
        assert!(matches!(one_node(p, vec![vec![]]), Err(SimError::Core(_))));

        let p = SimParams { transfer_time: 0.0, ..SimParams::default() };
        assert!(one_node(p, vec![vec![]]).is_err());

        let p = SimParams { energy_rate_transfer: f64::NAN, ..SimParams::default() };
        assert!(one_node(p, vec![vec![]]).is_err());
    }

    #[test]
    fn non_increasing_failures_rejected() {
        assert!(one_node(SimParams::default(), vec![vec![10.0, 10.0]]).is_err());
        assert!(one_node(SimParams::default(), vec![vec![10.0, 5.0]]).is_err());
    }

    #[test]
    fn negative_failure_time_rejected() {
        let err = one_node(SimParams::default(), vec![vec![-1.0, 3.0]]).unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn runs_only_once() {
        let mut sim = one_node(SimParams::default(), vec![vec![5.0]]).unwrap();
        sim.run(&mut NoopObserver).unwrap();
        assert!(matches!(sim.run(&mut NoopObserver), Err(SimError::AlreadyRan)));
    }
}

// ── Hand-checked chain ────────────────────────────────────────────────────────

#[cfg(test)]
mod chain {
    use super::*;

    #[test]
    fn relayed_packet_lost_at_failing_parent() {
        // Node 0 fails at 45, after node 1 forwarded its 30 s packet to it.
        let (report, _) = run_chain(50.0, vec![vec![45.0], vec![]]);

        let s = report.summary;
        assert_eq!(s.actual_total_duration, 55.0);
        assert_eq!(s.final_failure_count, 1);
        assert_approx!(s.delivered_volume, 20.0);
        assert_eq!(s.events_applied, 7);

        let n0 = report.node(NodeId(0));
        assert_eq!(n0.color, Some(0));
        assert_approx!(n0.collection_time, 20.0);
        assert_approx!(n0.wasted_time, 15.0);
        // 20 s sensing + 50² × 10 × 0.001 transfer + 15 s sensing lost.
        assert_approx!(n0.energy_consumed, 60.0);
        assert_approx!(n0.energy_wasted, 15.0);
        assert_approx!(n0.total_data_sent, 20.0);
        assert_eq!(n0.sent_packet_count, 1);
        assert_approx!(n0.sent_packet_total_delay, 30.0);
        assert_eq!(n0.failure_count, 1);

        let n1 = report.node(NodeId(1));
        assert_eq!(n1.color, Some(1));
        assert_eq!(n1.parent, Parent::Node(NodeId(0)));
        assert_approx!(n1.collection_time, 30.0);
        // 30 s sensing + 80² × 10 × 0.001 transfer, all of it wasted.
        assert_approx!(n1.energy_consumed, 94.0);
        assert_approx!(n1.energy_wasted, 94.0);
        assert_eq!(n1.total_data_sent, 0.0);
        assert_eq!(n1.sent_packet_count, 0);
        assert_eq!(n1.failure_count, 0);

        assert_approx!(report.total_energy_consumed(), 154.0);
        assert_approx!(report.total_energy_wasted(), 109.0);
    }

    #[test]
    fn recovering_parent_leaves_child_buffer_intact() {
        // Node 0 is recovering (35..45) when node 1 finishes its transfer at 40.
        let (report, sim) = run_chain(41.0, vec![vec![35.0], vec![]]);
        assert_eq!(report.summary.final_failure_count, 1);
        assert_eq!(report.summary.actual_total_duration, 45.0);

        let child = sim.ledger().node(NodeId(1));
        assert_approx!(child.current_data, 30.0);
        assert_eq!(child.packets.len(), 1);
        assert_eq!(child.packets[0].origin, NodeId(1));
        assert_approx!(child.packets[0].size, 30.0);
        assert_eq!(child.open_packet.map(|p| p.created), Some(40.0));
        // Nothing had reached node 0, so nothing was charged upstream.
        assert_eq!(report.node(NodeId(1)).energy_wasted, 0.0);
        assert!(sim.ledger().node(NodeId(0)).packets.is_empty());
    }

    #[test]
    fn parent_delivery_credits_origin() {
        // No failures: node 1's packet travels 1 → 0 → sink.
        let (report, _) = run_chain(100.0, vec![vec![], vec![]]);
        let n1 = report.node(NodeId(1));
        assert_eq!(n1.sent_packet_count, 1);
        assert_approx!(n1.total_data_sent, 30.0);
        // Created at 0, node 0 transfers it at 60 and delivers at 70.
        assert_approx!(n1.sent_packet_total_delay, 70.0);
        assert!(report.summary.delivered_volume >= 50.0);
        assert_eq!(report.summary.final_failure_count, 0);
    }

    #[test]
    fn completed_transfers_waste_nothing() {
        let (report, _) = run_chain(100.0, vec![vec![], vec![]]);
        for node in &report.nodes {
            assert_eq!(node.wasted_time, 0.0, "{}", node.id);
            assert_eq!(node.energy_wasted, 0.0, "{}", node.id);
        }
        assert_eq!(report.total_energy_wasted(), 0.0);
    }
}

// ── Failure semantics ─────────────────────────────────────────────────────────

#[cfg(test)]
mod failures {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        failures:  Vec<(NodeId, f64)>,
        exhausted: Vec<NodeId>,
        events:    usize,
        ended:     bool,
    }

    impl SimObserver for Recorder {
        fn on_event(&mut self, _event: &Event, _ledger: &RunLedger) {
            self.events += 1;
        }
        fn on_failure(&mut self, node: NodeId, at: f64) {
            self.failures.push((node, at));
        }
        fn on_timeline_exhausted(&mut self, node: NodeId, _now: f64) {
            self.exhausted.push(node);
        }
        fn on_sim_end(&mut self, _summary: &crate::RunSummary) {
            self.ended = true;
        }
    }

    #[test]
    fn failure_after_total_time_never_applies() {
        let p = SimParams { total_simulation_time: 1_000.0, ..SimParams::default() };
        let mut sim = SimBuilder::new(p, vec![Position::new(50.0, 0.0)], vec![vec![1_100.0]])
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();

        assert_eq!(report.summary.final_failure_count, 0);
        assert_eq!(report.node(NodeId(0)).failure_count, 0);
        assert_eq!(report.node(NodeId(0)).wasted_time, 0.0);
        assert!(rec.failures.is_empty());
        assert!(!report.node(NodeId(0)).timeline_exhausted);
        assert!(report.summary.actual_total_duration >= 1_000.0);
        assert!(rec.ended);
    }

    #[test]
    fn exhausted_timeline_is_flagged_once() {
        let p = SimParams { total_simulation_time: 20_000.0, ..SimParams::default() };
        let mut sim = SimBuilder::new(p, vec![Position::new(10.0, 10.0)], vec![vec![]])
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();

        assert_eq!(rec.exhausted, vec![NodeId(0)]);
        assert!(report.node(NodeId(0)).timeline_exhausted);
        assert_eq!(report.summary.final_failure_count, 0);
        assert!(report.summary.delivered_volume > 0.0);
    }

    #[test]
    fn observer_sees_every_failure() {
        let (positions, failures) = scattered_problem(30, 9);
        let mut sim = SimBuilder::new(scattered_params(), positions, failures)
            .seed(9)
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        let report = sim.run(&mut rec).unwrap();

        assert_eq!(rec.failures.len() as u64, report.summary.final_failure_count);
        assert_eq!(rec.events as u64, report.summary.events_applied);
        let per_node: u64 = report.nodes.iter().map(|n| n.failure_count).sum();
        assert_eq!(per_node, report.summary.final_failure_count);
        assert!(rec.failures.iter().all(|&(_, at)| at < 50_000.0));
    }

    #[test]
    fn failure_budget_stops_early() {
        let (positions, failures) = scattered_problem(30, 4);
        let stages = Stages::default().stop(FailureBudget { max_failures: 5 });
        let mut sim = SimBuilder::new(scattered_params(), positions, failures)
            .stages(stages)
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(report.summary.final_failure_count, 5);
        assert!(report.summary.actual_total_duration < 50_000.0);
    }
}

// ── Whole-run properties ──────────────────────────────────────────────────────

#[cfg(test)]
mod properties {
    use super::*;

    /// Checks that every Recovery charges the ancestor chains of the lost
    /// packets exactly their per-hop cost.
    struct Conservation<'a> {
        network: &'a SensorNetwork,
        params:  SimParams,
        packets: Vec<Vec<Packet>>,
        wasted:  Vec<f64>,
        lost:    usize,
    }

    impl Conservation<'_> {
        fn chain_cost(&self, packet: &Packet, failing: NodeId) -> f64 {
            let mut cost = 0.0;
            let mut hop = packet.origin;
            while hop != failing {
                let parent = self.network.node(hop).parent;
                let d2 = self.network.link_distance_sq(hop, parent).unwrap_or(0.0);
                cost += packet.size * self.params.energy_rate_sensing
                    + d2 * self.params.transfer_time * self.params.energy_rate_transfer;
                match parent {
                    Parent::Node(p) => hop = p,
                    _ => break,
                }
            }
            cost
        }
    }

    impl SimObserver for Conservation<'_> {
        fn on_event(&mut self, event: &Event, ledger: &RunLedger) {
            if event.state == WorkingState::Recovery {
                let failing = event.node;
                let expected: f64 = self.packets[failing.index()]
                    .iter()
                    .map(|p| self.chain_cost(p, failing))
                    .sum();
                let charged: f64 = ledger
                    .nodes()
                    .iter()
                    .enumerate()
                    .filter(|&(i, _)| i != failing.index())
                    .map(|(i, n)| n.energy_wasted - self.wasted[i])
                    .sum();
                assert!(
                    (expected - charged).abs() <= 1e-6 * (1.0 + expected),
                    "failure of {failing}: charged {charged}, expected {expected}"
                );
                if self.packets[failing.index()].iter().any(|p| p.origin != failing) {
                    self.lost += 1;
                }
            }
            self.packets = ledger.nodes().iter().map(|n| n.packets.clone()).collect();
            self.wasted = ledger.nodes().iter().map(|n| n.energy_wasted).collect();
        }
    }

    #[test]
    fn ancestor_waste_matches_lost_packets() {
        let (positions, failures) = scattered_problem(60, 21);
        let n = positions.len();
        let mut sim = SimBuilder::new(scattered_params(), positions, failures)
            .seed(21)
            .build()
            .unwrap();
        let network = sim.network().clone();
        let mut check = Conservation {
            network: &network,
            params:  scattered_params(),
            packets: vec![Vec::new(); n],
            wasted:  vec![0.0; n],
            lost:    0,
        };
        let report = sim.run(&mut check).unwrap();
        assert!(report.summary.final_failure_count > 0);
        assert!(check.lost > 0, "no relayed packet was ever lost");
    }

    #[test]
    fn identical_inputs_give_identical_reports() {
        let run = || {
            let (positions, failures) = scattered_problem(40, 8);
            let mut sim = SimBuilder::new(scattered_params(), positions, failures)
                .seed(77)
                .build()
                .unwrap();
            sim.run(&mut NoopObserver).unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn unrouted_nodes_stay_idle() {
        let (mut positions, mut failures) = scattered_problem(20, 5);
        positions.push(Position::new(5_000.0, 5_000.0));
        failures.push(vec![100.0]);
        let mut sim = SimBuilder::new(scattered_params(), positions, failures)
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();
        let far = report.nodes.last().unwrap();
        assert_eq!(far.parent, Parent::NoRoute);
        assert_eq!(far.color, None);
        assert_eq!(far.failure_count, 0);
        assert_eq!(far.energy_consumed, 0.0);
        assert_eq!(far.collection_time, 0.0);
    }

    #[test]
    fn network_without_routes_ends_immediately() {
        let positions = vec![Position::new(900.0, 900.0), Position::new(-900.0, 0.0)];
        let mut sim = SimBuilder::new(scattered_params(), positions, vec![vec![1.0], vec![]])
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();
        assert_eq!(report.summary.events_applied, 0);
        assert_eq!(report.summary.actual_total_duration, 0.0);
        assert_eq!(report.summary.delivered_volume, 0.0);
    }

    #[test]
    fn energy_and_time_are_non_negative_and_bounded() {
        let (positions, failures) = scattered_problem(50, 13);
        let mut sim = SimBuilder::new(scattered_params(), positions, failures)
            .seed(13)
            .build()
            .unwrap();
        let report = sim.run(&mut NoopObserver).unwrap();
        let horizon = report.summary.actual_total_duration;
        for node in &report.nodes {
            assert!(node.energy_consumed >= 0.0);
            assert!(node.energy_wasted >= 0.0);
            assert!(node.collection_time + node.wasted_time <= horizon + 1e-6, "{}", node.id);
            assert!(node.mean_packet_delay() >= 0.0);
        }
        let own_data: f64 = report.nodes.iter().map(|n| n.total_data_sent).sum();
        assert!(own_data <= report.summary.delivered_volume + 1e-6);
    }
}
