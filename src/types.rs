use core::fmt::{Display, Formatter};

/// A number uniquely identifying a worker within a single sort.
///
/// Worker ids are assigned incrementally starting from 0, in the order of the partitions they own,
/// so worker `k` always owns the partition directly below worker `k + 1`'s.
pub type WorkerId = usize;

/// A global position in the array being sorted.
pub type GlobalIndex = usize;

/// The parity of a global index.
///
/// Every partition records the parity of its first global index so that a worker can tell which
/// of its local pairs belong to which [Phase] without knowing where its neighbours start.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Parity {
    Even = 0,
    Odd = 1,
}

impl Parity {
    pub fn of(index: GlobalIndex) -> Self {
        if index % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

/// One of the two compare-exchange passes which make up a round.
///
/// The odd phase compares every pair `(i, i + 1)` where `i` is odd; the even phase compares every
/// pair where `i` is even. A round always runs the odd phase first.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
    Even = 0,
    Odd = 1,
}

impl Phase {
    /// Both phases in the order they run within a round.
    pub const ROUND: [Phase; 2] = [Phase::Odd, Phase::Even];

    /// The phase which compares the pair whose left element sits at `index`.
    pub fn of(index: GlobalIndex) -> Self {
        match Parity::of(index) {
            Parity::Even => Phase::Even,
            Parity::Odd => Phase::Odd,
        }
    }

    /// The local offset of the first pair this phase compares in a range whose local index 0
    /// has parity `parity`.
    pub fn local_offset(self, parity: Parity) -> usize {
        (self as usize) ^ (parity as usize)
    }
}

impl Display for Parity {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{Parity, Phase};
    use test_log::test;

    #[test]
    fn test_phase_of_index_matches_parity() {
        assert_eq!(Phase::of(0), Phase::Even);
        assert_eq!(Phase::of(7), Phase::Odd);
        assert_eq!(Parity::of(12), Parity::Even);
        assert_eq!(Parity::of(13), Parity::Odd);
    }

    #[test]
    fn test_local_offset_lands_on_global_phase() {
        // a range starting at global index 4 begins its odd pairs at local index 1 (global 5)
        assert_eq!(Phase::Odd.local_offset(Parity::Even), 1);
        assert_eq!(Phase::Even.local_offset(Parity::Even), 0);
        // a range starting at global index 5 begins its odd pairs at local index 0
        assert_eq!(Phase::Odd.local_offset(Parity::Odd), 0);
        assert_eq!(Phase::Even.local_offset(Parity::Odd), 1);
    }
}
