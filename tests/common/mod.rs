#![allow(dead_code)]

use oddeven::{CountingBarrier, Rendezvous, SpinBarrier};
use tracing::trace;

cfg_if::cfg_if! {
    if #[cfg(loom)] {
        pub(crate) use loom::sync::atomic::{AtomicUsize, Ordering};
        pub(crate) use loom::sync::Arc;
        pub(crate) use loom::thread;
    } else if #[cfg(feature = "shuttle")] {
        pub(crate) use shuttle::sync::atomic::{AtomicUsize, Ordering};
        pub(crate) use shuttle::sync::Arc;
        pub(crate) use shuttle::thread;
    } else {
        pub(crate) use std::sync::atomic::{AtomicUsize, Ordering};
        pub(crate) use std::sync::Arc;
        pub(crate) use std::thread;
    }
}

/// `NUM_PARTIES` threads each wait `NUM_ROUNDS` times. Every party must see each generation exactly
/// once and in order, and nobody may leave round `r` before all parties arrived at it.
pub(crate) fn barrier_rounds_test<const NUM_PARTIES: usize, const NUM_ROUNDS: usize>() {
    let barrier: Arc<SpinBarrier> = Arc::new(SpinBarrier::new(NUM_PARTIES));
    let arrivals: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
    let leaders: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));

    let join_handles: Vec<thread::JoinHandle<()>> = (0..NUM_PARTIES)
        .map(|party| {
            let barrier: Arc<SpinBarrier> = barrier.clone();
            let arrivals: Arc<AtomicUsize> = arrivals.clone();
            let leaders: Arc<AtomicUsize> = leaders.clone();
            thread::spawn(move || {
                for round in 0..NUM_ROUNDS {
                    assert_eq!(barrier.generation(), round);
                    arrivals.fetch_add(1, Ordering::AcqRel);
                    if barrier.wait().is_leader() {
                        leaders.fetch_add(1, Ordering::AcqRel);
                    }
                    trace!(party, round, "released");
                    assert!(arrivals.load(Ordering::Acquire) >= NUM_PARTIES * (round + 1));
                }
            })
        })
        .collect();

    join_handles.into_iter().for_each(|join_handle| {
        join_handle.join().expect("A party panicked");
    });
    assert_eq!(barrier.generation(), NUM_ROUNDS);
    assert_eq!(leaders.load(Ordering::Acquire), NUM_ROUNDS);
}

/// `NUM_WORKERS` threads wait `NUM_ROUNDS` times on a barrier which also counts a controller. The
/// controller takes part in the first round, then leaves the barrier while the workers are in the
/// second. Every round after that needs only the workers.
pub(crate) fn controller_leaves_test<const NUM_WORKERS: usize, const NUM_ROUNDS: usize>() {
    let barrier: Arc<CountingBarrier> = Arc::new(CountingBarrier::new(NUM_WORKERS + 1));

    let join_handles: Vec<thread::JoinHandle<()>> = (0..NUM_WORKERS)
        .map(|_| {
            let barrier: Arc<CountingBarrier> = barrier.clone();
            thread::spawn(move || {
                for _ in 0..NUM_ROUNDS {
                    barrier.wait();
                }
            })
        })
        .collect();

    barrier.wait();
    barrier.decrement_party_count();
    assert_eq!(barrier.party_count(), NUM_WORKERS);

    join_handles.into_iter().for_each(|join_handle| {
        join_handle.join().expect("A worker panicked");
    });
    assert_eq!(barrier.generation(), NUM_ROUNDS);
    assert_eq!(barrier.read_remaining(), NUM_WORKERS);
}
