//! Per-worker synchronization state, one cache line per worker.
//!
//! Workers hammer their own slot while the controller scans all of them in a spin loop. Sharing a
//! cache line between two workers' slots would turn every store into an invalidation for the
//! neighbour and for the scanning controller.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::ops::Index;
use crossbeam_utils::CachePadded;

use crate::sync::{AtomicBool, Ordering};
use crate::types::WorkerId;

/// A fixed arena of cache-padded slots, indexed by [WorkerId].
#[derive(Debug)]
pub struct PaddedSlots<S> {
    slots: Box<[CachePadded<S>]>,
}

impl<S> PaddedSlots<S> {
    pub fn new(num_workers: usize, mut init: impl FnMut(WorkerId) -> S) -> Self {
        let slots: Vec<CachePadded<S>> = (0..num_workers)
            .map(|worker_id| CachePadded::new(init(worker_id)))
            .collect();
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.slots.iter().map(|slot| &**slot)
    }
}

impl<S> Index<WorkerId> for PaddedSlots<S> {
    type Output = S;

    fn index(&self, worker_id: WorkerId) -> &S {
        &self.slots[worker_id]
    }
}

/// One "did I swap this round" flag per worker.
///
/// Within a round a flag only ever goes from lowered to raised, so an observer which sees any flag
/// raised may conclude the round swapped without waiting for the round to finish.
#[derive(Debug)]
pub struct SwapFlags {
    flags: PaddedSlots<AtomicBool>,
}

impl SwapFlags {
    pub fn new(num_workers: usize) -> Self {
        Self {
            flags: PaddedSlots::new(num_workers, |_| AtomicBool::new(false)),
        }
    }

    pub fn raise(&self, worker_id: WorkerId) {
        self.flags[worker_id].store(true, Ordering::Release);
    }

    pub fn is_raised(&self, worker_id: WorkerId) -> bool {
        self.flags[worker_id].load(Ordering::Acquire)
    }

    /// Scan every flag, stopping at the first raised one.
    pub fn any_raised(&self) -> bool {
        self.flags
            .iter()
            .any(|flag| flag.load(Ordering::Acquire))
    }

    pub fn lower_all(&self) {
        self.flags
            .iter()
            .for_each(|flag| flag.store(false, Ordering::Release));
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
