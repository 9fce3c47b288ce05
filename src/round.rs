use crate::padding::SwapFlags;
use crate::sync::{AtomicBool, AtomicUsize, Ordering};
use crate::types::WorkerId;
use tracing::debug;

/// Progress of one sort, shared by reference between its workers and its termination detector.
#[derive(Debug)]
pub struct RoundState {
    /// The number of rounds decided so far, including the one which stopped the sort.
    round_number: AtomicUsize,
    /// Swaps reported by workers for the round in progress.
    swaps_this_round: AtomicUsize,
    /// Raised once, when a round made no swaps. Never lowered again.
    stop: AtomicBool,
    swap_flags: SwapFlags,
}

impl RoundState {
    pub fn new(num_workers: usize) -> Self {
        Self {
            round_number: AtomicUsize::new(0),
            swaps_this_round: AtomicUsize::new(0),
            stop: AtomicBool::new(false),
            swap_flags: SwapFlags::new(num_workers),
        }
    }

    pub fn round_number(&self) -> usize {
        self.round_number.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn swap_flags(&self) -> &SwapFlags {
        &self.swap_flags
    }

    /// Mark that `worker_id` swapped something in the round in progress.
    pub fn flag_swap(&self, worker_id: WorkerId) {
        self.swap_flags.raise(worker_id);
    }

    /// Add a worker's swaps to the total of the round in progress.
    pub fn report_swaps(&self, swaps: usize) {
        if swaps > 0 {
            self.swaps_this_round.fetch_add(swaps, Ordering::AcqRel);
        }
    }

    /// Close the round in progress and decide whether another one is needed. Returns `true` if
    /// the sort should stop.
    ///
    /// Only one party may call this per round, after every worker reported, and before anyone
    /// starts the next round.
    pub fn close_round(&self, swapped: bool) -> bool {
        let round: usize = self.round_number.fetch_add(1, Ordering::AcqRel) + 1;
        if swapped {
            debug!(round, "round swapped, running another");
            return false;
        }
        debug!(round, "round made no swaps, stopping");
        self.stop.store(true, Ordering::Release);
        true
    }

    /// Close the round using the swap totals the workers reported.
    pub fn close_round_from_reports(&self) -> bool {
        let swaps: usize = self.swaps_this_round.swap(0, Ordering::AcqRel);
        self.close_round(swaps > 0)
    }
}
