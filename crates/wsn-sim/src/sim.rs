//! The `Simulator` struct and its event loop.

use tracing::{debug, warn};

use wsn_core::{NodeId, SimParams};
use wsn_schedule::{Event, EventQueue, SlotSchedule, WorkingState};
use wsn_topology::{Parent, SensorNetwork};

use crate::{NodeReport, RunLedger, RunReport, RunSummary, SimError, SimObserver, SimResult, Stages};

use WorkingState::{Collection, Recovery, Transfer};

/// The per-run event engine.
///
/// Every routed node starts in Collection at time 0.  Each popped event goes
/// through the same three steps:
///
/// 1. **Stop check**: the clock moves to the event time and the stop
///    predicate is consulted.  If it fires, the run ends with the event
///    unapplied.
/// 2. **Plan**: the node's next transition is computed (Collection →
///    Transfer at its next slot, Transfer → Collection after one slot,
///    Recovery → Collection after the recovery time).  If the node's next
///    failure falls at or before that time, a Recovery at the failure time
///    is pushed instead and the failure is consumed.
/// 3. **Apply**: energy, time and data are settled against the node's
///    previous event, and the event becomes the new previous event.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
#[derive(Debug)]
pub struct Simulator {
    params:   SimParams,
    network:  SensorNetwork,
    ledger:   RunLedger,
    queue:    EventQueue,
    /// Most recently applied event per node, indexed by `NodeId`.
    last:     Vec<Event>,
    schedule: SlotSchedule,
    stages:   Stages,
    finished: bool,
}

impl Simulator {
    pub(crate) fn new(
        params:   SimParams,
        network:  SensorNetwork,
        ledger:   RunLedger,
        schedule: SlotSchedule,
        stages:   Stages,
    ) -> Self {
        let last: Vec<Event> = network.ids().map(|id| Event::new(id, Collection, 0.0)).collect();
        let mut queue = EventQueue::with_capacity(network.len());
        for id in network.routed() {
            queue.push(Event::new(id, Collection, 0.0));
        }
        Self {
            params,
            network,
            ledger,
            queue,
            last,
            schedule,
            stages,
            finished: false,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn network(&self) -> &SensorNetwork {
        &self.network
    }

    pub fn ledger(&self) -> &RunLedger {
        &self.ledger
    }

    pub fn schedule(&self) -> SlotSchedule {
        self.schedule
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Drive the event loop until the stop predicate fires or no events
    /// remain, then assemble the report.
    ///
    /// A simulator runs once; a second call returns [`SimError::AlreadyRan`].
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunReport> {
        if self.finished {
            return Err(SimError::AlreadyRan);
        }
        self.finished = true;

        debug!(pending = self.queue.len(), "run started");

        while let Some(event) = self.queue.pop() {
            self.ledger.now = event.time;
            if self.stages.stop.should_stop(event.time, &self.ledger, &self.params) {
                break;
            }

            let next = self.plan_next(&event, observer);
            self.queue.push(next);

            self.apply(&event, observer);
            self.last[event.node.index()] = event;
            self.ledger.events_applied += 1;
            observer.on_event(&event, &self.ledger);
        }

        let summary = RunSummary {
            actual_total_duration: self.ledger.now,
            final_failure_count:   self.ledger.failure_count,
            delivered_volume:      self.ledger.delivered_volume,
            events_applied:        self.ledger.events_applied,
        };
        debug!(
            duration  = summary.actual_total_duration,
            failures  = summary.final_failure_count,
            delivered = summary.delivered_volume,
            events    = summary.events_applied,
            "run finished"
        );
        observer.on_sim_end(&summary);

        let nodes = self
            .network
            .nodes()
            .iter()
            .zip(self.ledger.nodes())
            .map(|(node, state)| NodeReport::new(node, state))
            .collect();
        Ok(RunReport { summary, nodes })
    }

    // ── Planning ──────────────────────────────────────────────────────────

    /// The node's next event, with failure preemption applied.
    fn plan_next<O: SimObserver>(&mut self, event: &Event, observer: &mut O) -> Event {
        let id = event.node;
        let now = event.time;

        let planned = match event.state {
            Collection => {
                let optimal = now + self.network.node(id).delta_opt;
                let color = self.ledger.node(id).current_color.unwrap_or(0);
                Event::new(id, Transfer, self.schedule.next_transfer(now, optimal, color))
            }
            Transfer => Event::new(id, Collection, now + self.params.transfer_time),
            Recovery => Event::new(id, Collection, now + self.params.recovery_time),
        };

        let state = self.ledger.node_mut(id);
        match state.timeline.peek() {
            Some(at) if at <= planned.time => {
                state.timeline.consume();
                Event::new(id, Recovery, at)
            }
            Some(_) => planned,
            None => {
                if !state.timeline_exhausted {
                    state.timeline_exhausted = true;
                    warn!(node = %id, now, "failure timeline exhausted, assuming no further failures");
                    observer.on_timeline_exhausted(id, now);
                }
                planned
            }
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    fn apply<O: SimObserver>(&mut self, event: &Event, observer: &mut O) {
        let id = event.node;
        let now = event.time;
        let prev = self.last[id.index()];
        let elapsed = now - prev.time;

        match (prev.state, event.state) {
            (Collection, Collection) => {
                self.ledger.node_mut(id).open_packet(id, now);
            }
            (Recovery, Collection) => {
                let state = self.ledger.node_mut(id);
                state.wasted_time += self.params.recovery_time;
                state.open_packet(id, now);
            }
            (Collection, Transfer) => {
                let sensing = self.params.energy_rate_sensing;
                let state = self.ledger.node_mut(id);
                state.collection_time += elapsed;
                state.current_data += elapsed;
                state.energy_consumed += elapsed * sensing;
                state.close_packet(now);
            }
            (Transfer, Collection) => self.finish_transfer(id, now, elapsed),
            (from, Recovery) => {
                self.enter_recovery(id, from, elapsed);
                observer.on_failure(id, now);
            }
            (from, to) => {
                debug!(node = %id, %from, %to, "ignoring impossible transition");
            }
        }
    }

    /// Transfer → Collection: hand the buffer to the parent (or the sink)
    /// and start a new packet.
    ///
    /// A completed transfer adds nothing to `wasted_time`; only recovery and
    /// activity cut short by a failure count as waste.
    fn finish_transfer(&mut self, id: NodeId, now: f64, elapsed: f64) {
        let parent = self.ledger.node(id).current_parent;
        let energy = self.transfer_energy(id, parent, elapsed);

        match parent {
            Parent::Sink => {
                let state = self.ledger.node_mut(id);
                let data = std::mem::take(&mut state.current_data);
                let packets = std::mem::take(&mut state.packets);
                self.ledger.delivered_volume += data;
                for packet in packets {
                    let origin = self.ledger.node_mut(packet.origin);
                    origin.sent_packet_total_delay += now - packet.created;
                    origin.sent_packet_count += 1;
                    origin.total_data_sent += packet.size;
                }
            }
            // A recovering parent cannot receive; the child keeps its buffer.
            Parent::Node(p) if self.last[p.index()].state != Recovery => {
                let state = self.ledger.node_mut(id);
                let data = std::mem::take(&mut state.current_data);
                let packets = std::mem::take(&mut state.packets);
                let target = self.ledger.node_mut(p);
                target.current_data += data;
                target.packets.extend(packets);
            }
            _ => {}
        }

        let state = self.ledger.node_mut(id);
        state.energy_consumed += energy;
        state.open_packet(id, now);
    }

    /// Any state → Recovery: charge the interrupted activity as waste and
    /// drop the buffer.
    fn enter_recovery(&mut self, id: NodeId, from: WorkingState, elapsed: f64) {
        let parent = self.ledger.node(id).current_parent;
        let wasted_energy = match from {
            Collection => elapsed * self.params.energy_rate_sensing,
            Transfer => self.transfer_energy(id, parent, elapsed),
            Recovery => 0.0,
        };

        self.charge_lost_packets(id);

        let state = self.ledger.node_mut(id);
        state.energy_consumed += wasted_energy;
        state.energy_wasted += wasted_energy;
        state.wasted_time += elapsed;
        state.failures += 1;
        state.clear_buffer();
        self.ledger.failure_count += 1;
    }

    /// Charge every node that already spent energy on a packet lost at
    /// `failing`.  Each hop from the packet's origin up to, but excluding,
    /// the failing node pays the packet's sensing cost plus one slot of
    /// transfer over its own link.
    fn charge_lost_packets(&mut self, failing: NodeId) {
        let packets = std::mem::take(&mut self.ledger.node_mut(failing).packets);
        let sensing = self.params.energy_rate_sensing;
        let slot = self.params.transfer_time;

        for packet in &packets {
            let mut hop = packet.origin;
            while hop != failing {
                let parent = self.ledger.node(hop).current_parent;
                let cost = packet.size * sensing + self.transfer_energy(hop, parent, slot);
                self.ledger.node_mut(hop).energy_wasted += cost;
                match parent.node() {
                    Some(next) => hop = next,
                    None => break,
                }
            }
        }
    }

    /// `d(node, parent)² × duration × energy_rate_transfer`.
    fn transfer_energy(&self, id: NodeId, parent: Parent, duration: f64) -> f64 {
        self.network.link_distance_sq(id, parent).unwrap_or(0.0)
            * duration
            * self.params.energy_rate_transfer
    }
}
