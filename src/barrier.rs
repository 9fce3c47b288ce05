//! Reusable spinning rendezvous points.
//!
//! Both barriers count down a `remaining` counter and use a `generation` counter to tell one
//! release from the next. A party snapshots `generation` *before* it decrements `remaining`; the
//! party which brings `remaining` to zero resets it and bumps `generation`, and every other party
//! spins (backing off to yielding under contention) until it sees `generation` move past its
//! snapshot. Because only the last arriver resets the count, a party released early can start
//! waiting on the next generation straight away without racing the stragglers of the previous one.
//!
//! A release is a happens-before edge: everything any party wrote before calling `wait` is visible
//! to every party once its `wait` returns.

use crate::sync::{AtomicUsize, Backoff, Ordering};
use tracing::trace;

/// Tells a party whether it was the one which released the barrier.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BarrierWaitResult {
    is_leader: bool,
}

impl BarrierWaitResult {
    /// Exactly one party per generation is the leader: the last one to arrive.
    pub fn is_leader(&self) -> bool {
        self.is_leader
    }
}

/// A rendezvous point for a group of parties which is reused round after round.
pub trait Rendezvous: Sync {
    /// Block until every party of the current generation has arrived. If this party is the last
    /// to arrive, run `on_release` before letting anyone go, so that whatever it writes is visible
    /// to every party when their `wait` returns.
    fn wait_then<F: FnOnce()>(&self, on_release: F) -> BarrierWaitResult;

    /// Block until every party of the current generation has arrived.
    fn wait(&self) -> BarrierWaitResult {
        self.wait_then(|| {})
    }

    /// The number of releases so far.
    fn generation(&self) -> usize;
}

/// The generation-counting core shared by both barriers.
#[derive(Debug)]
struct Generations {
    remaining: AtomicUsize,
    generation: AtomicUsize,
}

impl Generations {
    fn new(party_count: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(party_count),
            generation: AtomicUsize::new(0),
        }
    }

    /// Count one arrival; the last arriver releases, everybody else spins.
    fn arrive_and_wait<F: FnOnce()>(
        &self,
        party_count: impl FnOnce() -> usize,
        on_release: F,
    ) -> BarrierWaitResult {
        // the snapshot has to come first: once our decrement lands the generation may move on
        let generation: usize = self.generation.load(Ordering::Acquire);

        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.release(generation, party_count(), on_release);
            return BarrierWaitResult { is_leader: true };
        }

        let backoff: Backoff = Backoff::new();
        while self.generation.load(Ordering::Acquire) == generation {
            backoff.snooze();
        }
        BarrierWaitResult { is_leader: false }
    }

    /// Count one arrival without waiting for the others.
    fn arrive(&self, party_count: impl FnOnce() -> usize) {
        let generation: usize = self.generation.load(Ordering::Acquire);
        if self.remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.release(generation, party_count(), || {});
        }
    }

    fn release<F: FnOnce()>(&self, generation: usize, party_count: usize, on_release: F) {
        on_release();
        // the reset must be visible before the bump, since released parties may arrive again
        // immediately
        self.remaining.store(party_count, Ordering::Release);
        self.generation
            .store(generation.wrapping_add(1), Ordering::Release);
        trace!(generation = generation.wrapping_add(1), "barrier released");
    }

    fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    fn generation(&self) -> usize {
        self.generation.load(Ordering::Acquire)
    }
}

/// A barrier for a fixed number of parties.
#[derive(Debug)]
pub struct SpinBarrier {
    party_count: usize,
    generations: Generations,
}

impl SpinBarrier {
    pub fn new(party_count: usize) -> Self {
        debug_assert!(party_count > 0, "a barrier without parties can never release");
        Self {
            party_count,
            generations: Generations::new(party_count),
        }
    }

    pub fn party_count(&self) -> usize {
        self.party_count
    }
}

impl Rendezvous for SpinBarrier {
    fn wait_then<F: FnOnce()>(&self, on_release: F) -> BarrierWaitResult {
        self.generations
            .arrive_and_wait(|| self.party_count, on_release)
    }

    fn generation(&self) -> usize {
        self.generations.generation()
    }
}

/// A barrier whose parties can permanently drop out of it.
///
/// Besides waiting, an observer can peek at how many parties have yet to arrive with
/// [CountingBarrier::read_remaining], and a party can leave for good with
/// [CountingBarrier::decrement_party_count]. Leaving counts as that party's arrival for the current
/// generation, and every later generation needs one arrival fewer.
#[derive(Debug)]
pub struct CountingBarrier {
    party_count: AtomicUsize,
    generations: Generations,
}

impl CountingBarrier {
    pub fn new(party_count: usize) -> Self {
        debug_assert!(party_count > 0, "a barrier without parties can never release");
        Self {
            party_count: AtomicUsize::new(party_count),
            generations: Generations::new(party_count),
        }
    }

    /// The number of parties which have not yet arrived in the current generation. Never blocks.
    pub fn read_remaining(&self) -> usize {
        self.generations.remaining()
    }

    pub fn party_count(&self) -> usize {
        self.party_count.load(Ordering::Acquire)
    }

    /// Permanently remove the calling party from the barrier without waiting.
    ///
    /// If every other party has already arrived, this releases them.
    pub fn decrement_party_count(&self) {
        let previous: usize = self.party_count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "more parties left the barrier than ever joined it");
        trace!(party_count = previous - 1, "party left barrier");
        self.generations
            .arrive(|| self.party_count.load(Ordering::Acquire));
    }
}

impl Rendezvous for CountingBarrier {
    fn wait_then<F: FnOnce()>(&self, on_release: F) -> BarrierWaitResult {
        self.generations
            .arrive_and_wait(|| self.party_count.load(Ordering::Acquire), on_release)
    }

    fn generation(&self) -> usize {
        self.generations.generation()
    }
}
