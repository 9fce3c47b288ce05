use std::thread::{Scope, ScopedJoinHandle};

use crate::barrier::{Rendezvous, SpinBarrier};
use crate::boundary::BoundarySlot;
use crate::kernel::run_phase;
use crate::partition::{Partition, Partitions};
use crate::round::RoundState;
use crate::termination::Termination;
use crate::types::{Phase, WorkerId};
use tracing::{instrument, trace};

/// Everything the workers of one sort share. Owned by the orchestrator for the duration of the
/// sort and lent to every worker.
#[derive(Debug)]
pub(crate) struct Shared<T, R> {
    /// Separates the odd phase from the even phase. Workers only.
    phase_barrier: SpinBarrier,
    /// Closes every round, which also separates the even phase from the next odd phase.
    round_barrier: R,
    /// Slot `k` sits between worker `k` and worker `k + 1`.
    slots: Vec<BoundarySlot<T>>,
    round_state: RoundState,
    termination: Termination,
}

impl<T: Copy + PartialOrd, R: Rendezvous> Shared<T, R> {
    /// Build the shared state for sorting `array` split along `partitions`.
    ///
    /// `round_barrier` must have one party per worker, plus one if a controller takes part.
    pub(crate) fn new(
        array: &[T],
        partitions: Partitions,
        round_barrier: R,
        termination: Termination,
    ) -> Self {
        let num_workers: usize = partitions.num_workers();
        let slots: Vec<BoundarySlot<T>> = partitions
            .skip(1)
            .map(|upper| BoundarySlot::new(upper.start, array[upper.start - 1]))
            .collect();
        Self {
            phase_barrier: SpinBarrier::new(num_workers),
            round_barrier,
            slots,
            round_state: RoundState::new(num_workers),
            termination,
        }
    }

    pub(crate) fn round_barrier(&self) -> &R {
        &self.round_barrier
    }

    pub(crate) fn round_state(&self) -> &RoundState {
        &self.round_state
    }
}

/// One worker's exclusive share of the array.
#[derive(Debug)]
pub(crate) struct Worker<'a, T> {
    partition: Partition,
    chunk: &'a mut [T],
}

/// Split `array` into one [Worker] per partition.
pub(crate) fn split_workers<T>(mut array: &mut [T], partitions: Partitions) -> Vec<Worker<'_, T>> {
    let mut workers: Vec<Worker<'_, T>> = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let (chunk, rest) = core::mem::take(&mut array).split_at_mut(partition.len);
        workers.push(Worker { partition, chunk });
        array = rest;
    }
    workers
}

/// Start `worker` on its own thread within `scope`.
pub(crate) fn spawn_worker<'scope, 'env, T, R>(
    scope: &'scope Scope<'scope, 'env>,
    worker: Worker<'env, T>,
    shared: &'env Shared<T, R>,
) -> ScopedJoinHandle<'scope, ()>
where
    T: Copy + PartialOrd + Send + Sync,
    R: Rendezvous,
{
    scope.spawn(move || worker.run(shared))
}

impl<T: Copy + PartialOrd, R: Rendezvous> Shared<T, R> {
    /// The slot this worker exchanges through as the upper side, if it has a neighbour below.
    fn slot_below(&self, worker_id: WorkerId) -> Option<&BoundarySlot<T>> {
        worker_id.checked_sub(1).map(|below| &self.slots[below])
    }

    /// The slot this worker publishes into as the lower side, if it has a neighbour above.
    fn slot_above(&self, worker_id: WorkerId) -> Option<&BoundarySlot<T>> {
        self.slots.get(worker_id)
    }
}

impl<'a, T: Copy + PartialOrd> Worker<'a, T> {
    #[instrument(level = "debug", skip_all, fields(worker_id = self.partition.worker_id, start = self.partition.start, len = self.partition.len))]
    fn run<R: Rendezvous>(self, shared: &Shared<T, R>) {
        let Worker { partition, chunk } = self;
        let worker_id: WorkerId = partition.worker_id;
        let below: Option<&BoundarySlot<T>> = shared.slot_below(worker_id);
        let above: Option<&BoundarySlot<T>> = shared.slot_above(worker_id);
        let round_state: &RoundState = &shared.round_state;

        loop {
            let mut round_swaps: usize = 0;
            for phase in Phase::ROUND {
                let swaps: usize = run_step(chunk, &partition, phase, below, above);
                if swaps > 0 {
                    round_state.flag_swap(worker_id);
                    round_swaps += swaps;
                }
                match phase {
                    Phase::Odd => {
                        shared.phase_barrier.wait();
                    }
                    Phase::Even => match shared.termination {
                        Termination::Feedback => {
                            round_state.report_swaps(round_swaps);
                            shared.round_barrier.wait_then(|| {
                                round_state.close_round_from_reports();
                            });
                        }
                        Termination::Controller => {
                            shared.round_barrier.wait();
                        }
                    },
                }
            }
            trace!(round_swaps, "round finished");
            if round_state.is_stopped() {
                break;
            }
        }

        // the last exchange may have left our last element in the slot
        if let Some(slot) = above {
            // SAFETY: every worker has left the loop behind the final round barrier, so the upper
            // neighbour is done with the slot.
            unsafe { reclaim_last(chunk, slot) };
        }
    }
}

/// One phase of one worker: the local pass plus this worker's part of the boundary exchanges.
/// Returns the number of swaps.
fn run_step<T: Copy + PartialOrd>(
    chunk: &mut [T],
    partition: &Partition,
    phase: Phase,
    below: Option<&BoundarySlot<T>>,
    above: Option<&BoundarySlot<T>>,
) -> usize {
    let lower_side_active: Option<&BoundarySlot<T>> =
        above.filter(|slot| slot.exchange_phase() != phase);

    if let Some(slot) = lower_side_active {
        // SAFETY: outside the exchange phase only the lower worker touches the slot.
        unsafe { reclaim_last(chunk, slot) };
    }

    let mut swaps: usize = run_phase(chunk, partition.parity, phase).swaps;

    if let Some(slot) = below.filter(|slot| slot.exchange_phase() == phase) {
        // SAFETY: this is the slot's exchange phase, during which only the upper worker touches
        // it, and the lower worker's publish happened before the previous barrier.
        if unsafe { slot.exchange(&mut chunk[0]) } {
            swaps += 1;
        }
    }

    if let Some(slot) = lower_side_active {
        // SAFETY: outside the exchange phase only the lower worker touches the slot.
        unsafe { slot.publish(chunk[chunk.len() - 1]) };
    }
    swaps
}

/// # Safety
/// Same as [BoundarySlot::reclaim]: `chunk` must be the lower side of `slot`, and the upper side
/// must not be in the exchange phase.
unsafe fn reclaim_last<T: Copy + PartialOrd>(chunk: &mut [T], slot: &BoundarySlot<T>) {
    let last: usize = chunk.len() - 1;
    chunk[last] = slot.reclaim();
}
