//! The single-slot mailbox through which two neighbouring workers settle the pair straddling
//! their shared partition boundary.
//!
//! For the boundary at global index `b` (the first index of the upper partition), the straddling
//! pair is `(b - 1, b)` and it belongs to [Phase::of]`(b - 1)`, the *exchange phase*. The slot holds
//! the lower partition's last element across that phase:
//!
//! - in the other phase, the lower worker first [reclaims](BoundarySlot::reclaim) the element from
//!   the slot, runs its local pass, and then [publishes](BoundarySlot::publish) the element back;
//! - in the exchange phase, the upper worker [exchanges](BoundarySlot::exchange) its first element
//!   with the slot if the slot holds the greater value.
//!
//! Each side only touches the slot in its own phase, and a barrier separates consecutive phases,
//! so the slot never has two concurrent users and needs no lock. Neither side's local pass touches
//! the element the slot stands in for during that phase.

use core::cell::UnsafeCell;
use crossbeam_utils::CachePadded;

use crate::types::{GlobalIndex, Phase};

#[derive(Debug)]
pub struct BoundarySlot<T> {
    /// The first index of the upper partition.
    boundary: GlobalIndex,
    value: CachePadded<UnsafeCell<T>>,
}

// The slot is handed between exactly two threads, never used by both within the same phase, and
// every hand-over happens across a barrier release.
unsafe impl<T: Send> Sync for BoundarySlot<T> {}

impl<T: Copy + PartialOrd> BoundarySlot<T> {
    /// Create the slot for the boundary at `boundary`, seeded with the current value of the lower
    /// partition's last element.
    pub fn new(boundary: GlobalIndex, lower_last: T) -> Self {
        debug_assert!(boundary > 0, "a boundary needs a partition below it");
        Self {
            boundary,
            value: CachePadded::new(UnsafeCell::new(lower_last)),
        }
    }

    pub fn boundary(&self) -> GlobalIndex {
        self.boundary
    }

    /// The phase in which the pair straddling this boundary is compared.
    pub fn exchange_phase(&self) -> Phase {
        Phase::of(self.boundary - 1)
    }

    /// Store the lower partition's last element into the slot.
    ///
    /// # Safety
    /// Must only be called by the lower worker, outside the exchange phase.
    pub unsafe fn publish(&self, lower_last: T) {
        *self.value.get() = lower_last;
    }

    /// Load the lower partition's last element back out of the slot.
    ///
    /// # Safety
    /// Must only be called by the lower worker, outside the exchange phase.
    pub unsafe fn reclaim(&self) -> T {
        *self.value.get()
    }

    /// Compare the slot with the upper partition's first element and exchange them if the slot
    /// holds the strictly greater value. Returns whether they were exchanged.
    ///
    /// # Safety
    /// Must only be called by the upper worker, during the exchange phase.
    pub unsafe fn exchange(&self, upper_first: &mut T) -> bool {
        let lower_last: &mut T = &mut *self.value.get();
        if *lower_last > *upper_first {
            core::mem::swap(lower_last, upper_first);
            return true;
        }
        false
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use crate::boundary::BoundarySlot;
    use crate::types::Phase;
    use test_log::test;

    #[test]
    fn test_exchange_phase_follows_the_straddling_pair() {
        // pair (4, 5) is compared in the even phase
        assert_eq!(BoundarySlot::new(5, 0).exchange_phase(), Phase::Even);
        // pair (3, 4) is compared in the odd phase
        assert_eq!(BoundarySlot::new(4, 0).exchange_phase(), Phase::Odd);
    }

    #[test]
    fn test_exchange_moves_the_larger_value_up() {
        let slot: BoundarySlot<i32> = BoundarySlot::new(3, 9);
        let mut upper_first: i32 = 4;
        assert!(unsafe { slot.exchange(&mut upper_first) });
        assert_eq!(upper_first, 9);
        assert_eq!(unsafe { slot.reclaim() }, 4);

        // already in order
        assert!(!unsafe { slot.exchange(&mut upper_first) });
        assert_eq!(upper_first, 9);
    }

    #[test]
    fn test_equal_values_are_not_exchanged() {
        let slot: BoundarySlot<i32> = BoundarySlot::new(1, 2);
        let mut upper_first: i32 = 2;
        assert!(!unsafe { slot.exchange(&mut upper_first) });
    }

    #[test]
    fn test_publish_then_reclaim() {
        let slot: BoundarySlot<u8> = BoundarySlot::new(2, 0);
        unsafe { slot.publish(17) };
        assert_eq!(unsafe { slot.reclaim() }, 17);
    }
}
