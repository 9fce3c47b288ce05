use core::fmt::{Display, Formatter};

use crate::barrier::{CountingBarrier, Rendezvous};
use crate::round::RoundState;
use crate::sync::Backoff;
use tracing::{debug, instrument};

/// How a sort finds out that it is done.
///
/// Both strategies stop after the first round in which no worker swapped anything. Every phase is
/// sequenced by a barrier, so such a round proves the whole array is in order.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Termination {
    /// Workers add up their swaps before the round barrier and the party which releases the
    /// barrier decides, so no thread besides the workers is needed.
    #[default]
    Feedback,
    /// A dedicated controller thread joins the round barrier as an extra party and watches the
    /// workers' padded swap flags while they sort. Once a round comes back clean it raises the
    /// stop flag and leaves the barrier for good.
    Controller,
}

impl Display for Termination {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The controller side of [Termination::Controller].
///
/// `round_barrier` must have one party per worker plus one for the controller.
#[instrument(level = "debug", skip_all)]
pub fn run_controller(round_barrier: &CountingBarrier, round_state: &RoundState) {
    loop {
        // Flags are only ever raised within a round, so a single raised flag settles the round
        // even while workers are still busy in it. After that only the arrival count is polled.
        let mut swapped: bool = false;
        let backoff: Backoff = Backoff::new();
        while round_barrier.read_remaining() > 1 {
            if !swapped {
                swapped = round_state.swap_flags().any_raised();
            }
            backoff.snooze();
        }
        if !swapped {
            // every worker has arrived: their last flags are visible now
            swapped = round_state.swap_flags().any_raised();
        }

        if round_state.close_round(swapped) {
            round_barrier.decrement_party_count();
            debug!(rounds = round_state.round_number(), "controller done");
            return;
        }
        // nobody can raise a flag until the barrier below releases them
        round_state.swap_flags().lower_all();
        round_barrier.wait();
    }
}

#[cfg(all(test, feature = "std", not(feature = "shuttle"), not(loom)))]
mod tests {
    use crate::barrier::{CountingBarrier, Rendezvous};
    use crate::round::RoundState;
    use crate::termination::run_controller;
    use std::thread;
    use test_log::test;

    #[test]
    fn test_controller_stops_after_first_clean_round() {
        let barrier: CountingBarrier = CountingBarrier::new(3);
        let state: RoundState = RoundState::new(2);

        thread::scope(|scope| {
            scope.spawn(|| run_controller(&barrier, &state));
            for worker_id in 0..2 {
                let barrier: &CountingBarrier = &barrier;
                let state: &RoundState = &state;
                scope.spawn(move || {
                    let mut rounds: usize = 0;
                    loop {
                        // swap in the first two rounds only
                        if rounds < 2 {
                            state.flag_swap(worker_id);
                        }
                        rounds += 1;
                        barrier.wait();
                        if state.is_stopped() {
                            break;
                        }
                    }
                    assert_eq!(rounds, 3);
                });
            }
        });

        assert_eq!(state.round_number(), 3);
        assert!(state.is_stopped());
        // the controller left the barrier when it stopped
        assert_eq!(barrier.party_count(), 2);
    }
}
