use crate::types::{Parity, Phase};

/// What a single compare-exchange pass did.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PassOutcome {
    pub swaps: usize,
}

impl PassOutcome {
    pub fn swapped(&self) -> bool {
        self.swaps > 0
    }
}

/// Run one phase of odd-even transposition sort over `range`.
///
/// `parity` is the parity of the global index of `range[0]`. Every local pair `(i, i + 1)` whose
/// global left index belongs to `phase` is compared and exchanged when the left element is
/// strictly greater, so equal elements never move. Only elements inside `range` are touched; the
/// pair straddling a partition boundary is the business of the boundary exchange.
pub fn run_phase<T: PartialOrd>(range: &mut [T], parity: Parity, phase: Phase) -> PassOutcome {
    let mut swaps: usize = 0;
    let mut i: usize = phase.local_offset(parity);
    while i + 1 < range.len() {
        if range[i] > range[i + 1] {
            range.swap(i, i + 1);
            swaps += 1;
        }
        i += 2;
    }
    PassOutcome { swaps }
}

/// Sort `array` on the calling thread by alternating full odd and even passes until a round makes
/// no swaps. Returns the number of rounds, counting the final one which made none.
pub fn sequential_sort<T: PartialOrd>(array: &mut [T]) -> usize {
    if array.len() < 2 {
        return 0;
    }
    let mut rounds: usize = 0;
    loop {
        rounds += 1;
        let swaps: usize = Phase::ROUND
            .iter()
            .map(|phase| run_phase(array, Parity::Even, *phase).swaps)
            .sum();
        if swaps == 0 {
            return rounds;
        }
    }
}
