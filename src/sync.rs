//! A module which decides which synchronization primitives to use throughout the rest of the crate
//! depending on features and configuration options

cfg_if::cfg_if! {
    if #[cfg(loom)] {
        pub(crate) use loom::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

        /// Loom has to be told that a spinning thread cannot make progress on its own.
        #[derive(Debug, Default)]
        pub(crate) struct Backoff;

        impl Backoff {
            pub(crate) fn new() -> Self {
                Backoff
            }

            pub(crate) fn snooze(&self) {
                loom::thread::yield_now();
            }
        }
    } else if #[cfg(feature = "shuttle")] {
        pub(crate) use shuttle::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

        #[derive(Debug, Default)]
        pub(crate) struct Backoff;

        impl Backoff {
            pub(crate) fn new() -> Self {
                Backoff
            }

            pub(crate) fn snooze(&self) {
                shuttle::thread::yield_now();
            }
        }
    } else {
        pub(crate) use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

        /// Spins with exponential backoff, then yields the time slice once spinning stops paying
        /// off. Without `std` it only ever spins.
        pub(crate) use crossbeam_utils::Backoff;
    }
}
