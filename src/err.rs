use displaydoc::Display;

/// A sort was requested with a configuration it cannot run with. Nothing has been spawned and the
/// array is untouched when one of these is returned.
#[derive(Debug, Display, Eq, PartialEq)]
pub enum ConfigError {
    /// At least one worker is required to sort.
    NoWorkers,

    /** Cannot split {elements} elements between {workers} workers: every worker must own at least
        one element.
    */
    MoreWorkersThanElements { workers: usize, elements: usize },
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
