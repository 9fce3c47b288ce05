use std::num::NonZeroUsize;
use std::thread;
use std::thread::ScopedJoinHandle;

use crate::barrier::{CountingBarrier, Rendezvous, SpinBarrier};
use crate::err::ConfigError;
use crate::partition::{partition, Partitions};
use crate::termination::{run_controller, Termination};
use crate::worker::{spawn_worker, split_workers, Shared, Worker};
use tracing::{debug, instrument};

/// How to run a sort.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// `None` means one worker per available core, but never more workers than elements.
    workers: Option<usize>,
    termination: Termination,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// The number of workers to sort `num_elements` elements with.
    pub fn workers_for(&self, num_elements: usize) -> usize {
        self.workers.unwrap_or_else(|| {
            let available: usize = thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1);
            available.min(num_elements).max(1)
        })
    }
}

/// Diagnostics about a finished sort.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SortReport {
    /// Rounds executed, including the final one which made no swaps. Zero if the array was too
    /// short to need sorting.
    pub rounds: usize,
    pub workers: usize,
    pub termination: Termination,
}

/// Sort `array` in place with `workers` workers and the default termination strategy.
pub fn sort_with_workers<T>(array: &mut [T], workers: usize) -> Result<SortReport, ConfigError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    sort(array, &Config::new().with_workers(workers))
}

/// Sort `array` in place by parallel odd-even transposition.
///
/// The configuration is checked before anything is spawned. Arrays shorter than two elements are
/// returned straight away without spawning anything, whatever the worker count.
#[instrument(level = "debug", skip(array), fields(len = array.len()))]
pub fn sort<T>(array: &mut [T], config: &Config) -> Result<SortReport, ConfigError>
where
    T: Copy + PartialOrd + Send + Sync,
{
    let workers: usize = config.workers_for(array.len());
    let termination: Termination = config.termination;
    if workers == 0 {
        return Err(ConfigError::NoWorkers);
    }
    if array.len() < 2 {
        return Ok(SortReport { rounds: 0, workers, termination });
    }
    let partitions: Partitions = partition(array.len(), workers)?;

    let rounds: usize = match termination {
        Termination::Feedback => {
            let shared: Shared<T, SpinBarrier> =
                Shared::new(array, partitions.clone(), SpinBarrier::new(workers), termination);
            run_workers(array, partitions, &shared, None::<fn()>)
        }
        Termination::Controller => {
            let shared: Shared<T, CountingBarrier> = Shared::new(
                array,
                partitions.clone(),
                CountingBarrier::new(workers + 1),
                termination,
            );
            let controller = || run_controller(shared.round_barrier(), shared.round_state());
            run_workers(array, partitions, &shared, Some(controller))
        }
    };
    debug!(rounds, workers, %termination, "sorted");
    Ok(SortReport { rounds, workers, termination })
}

/// Spawn one worker per partition, plus `controller` if there is one, wait for all of them, and
/// return the number of rounds they ran.
fn run_workers<T, R, C>(
    array: &mut [T],
    partitions: Partitions,
    shared: &Shared<T, R>,
    controller: Option<C>,
) -> usize
where
    T: Copy + PartialOrd + Send + Sync,
    R: Rendezvous,
    C: FnOnce() + Send,
{
    let workers: Vec<Worker<'_, T>> = split_workers(array, partitions);
    thread::scope(|scope| {
        let controller: Option<ScopedJoinHandle<()>> =
            controller.map(|controller| scope.spawn(controller));
        let handles: Vec<ScopedJoinHandle<()>> = workers
            .into_iter()
            .map(|worker| spawn_worker(scope, worker, shared))
            .collect();

        controller
            .into_iter()
            .chain(handles)
            .for_each(|handle| {
                if let Err(panic) = handle.join() {
                    std::panic::resume_unwind(panic);
                }
            });
    });
    shared.round_state().round_number()
}
