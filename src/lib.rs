//! Parallel odd-even transposition sort.
//!
//! The array is split into contiguous partitions, one per worker thread. Every round, each worker
//! runs the odd phase over its own partition, the workers meet at a spin barrier, run the even
//! phase, and meet again. The single pair straddling each partition boundary is settled through a
//! one-slot mailbox shared by the two neighbours, ordered by nothing but those barriers. The sort
//! stops after the first round in which nobody swapped, detected either by a dedicated controller
//! thread watching cache-padded per-worker swap flags, or by the worker which releases the round
//! barrier. See [Termination].
//!
//! ```
//! use oddeven::{sort, Config, Termination};
//!
//! let mut array = [5, 3, 4, 1, 2];
//! let config = Config::new().with_workers(2).with_termination(Termination::Controller);
//! let report = sort(&mut array, &config).unwrap();
//! assert_eq!(array, [1, 2, 3, 4, 5]);
//! assert!(report.rounds >= 2);
//! ```
//!
//! The building blocks ([barrier], [partition()], [run_phase]) work without `std`.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod barrier;
pub mod err;
mod kernel;
mod partition;
mod sync;
mod types;

#[cfg(feature = "alloc")]
mod boundary;
#[cfg(feature = "alloc")]
mod padding;
#[cfg(feature = "alloc")]
mod round;
#[cfg(feature = "alloc")]
mod termination;

#[cfg(feature = "std")]
mod sort;
#[cfg(feature = "std")]
mod worker;

pub use barrier::{BarrierWaitResult, CountingBarrier, Rendezvous, SpinBarrier};
pub use err::ConfigError;
pub use kernel::{run_phase, sequential_sort, PassOutcome};
pub use partition::{partition, Partition, Partitions};
pub use types::{GlobalIndex, Parity, Phase, WorkerId};

#[cfg(feature = "alloc")]
pub use padding::{PaddedSlots, SwapFlags};
#[cfg(feature = "alloc")]
pub use round::RoundState;
#[cfg(feature = "alloc")]
pub use termination::{run_controller, Termination};

#[cfg(feature = "std")]
pub use sort::{sort, sort_with_workers, Config, SortReport};
