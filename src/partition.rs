use core::iter::FusedIterator;
use core::ops::Range;

use crate::err::ConfigError;
use crate::types::{GlobalIndex, Parity, WorkerId};

/// The contiguous range of the array owned by one worker.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Partition {
    pub worker_id: WorkerId,
    pub start: GlobalIndex,
    pub len: usize,
    /// The parity of `start`, which aligns local pairs with the global phases.
    pub parity: Parity,
}

impl Partition {
    /// One past the last global index of this partition.
    pub fn end(&self) -> GlobalIndex {
        self.start + self.len
    }

    pub fn range(&self) -> Range<GlobalIndex> {
        self.start..self.end()
    }
}

/// Split `num_elements` elements between `num_workers` workers.
///
/// The first `num_elements % num_workers` partitions get one element more than the rest. The
/// partitions are contiguous, ordered by worker id, and cover every index exactly once. An empty
/// array may still be handed to a single worker, but otherwise each worker must own at least one
/// element.
pub fn partition(num_elements: usize, num_workers: usize) -> Result<Partitions, ConfigError> {
    if num_workers == 0 {
        return Err(ConfigError::NoWorkers);
    }
    if num_workers > num_elements.max(1) {
        return Err(ConfigError::MoreWorkersThanElements {
            workers: num_workers,
            elements: num_elements,
        });
    }
    Ok(Partitions {
        chunk_len: num_elements / num_workers,
        num_longer: num_elements % num_workers,
        num_workers,
        next_worker: 0,
        next_start: 0,
    })
}

/// The partitions of an array, in worker id order. See [partition].
#[derive(Clone, Debug)]
pub struct Partitions {
    chunk_len: usize,
    num_longer: usize,
    num_workers: usize,
    next_worker: WorkerId,
    next_start: GlobalIndex,
}

impl Partitions {
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        if self.next_worker == self.num_workers {
            return None;
        }
        let worker_id: WorkerId = self.next_worker;
        let len: usize = self.chunk_len + usize::from(worker_id < self.num_longer);
        let partition = Partition {
            worker_id,
            start: self.next_start,
            len,
            parity: Parity::of(self.next_start),
        };
        self.next_worker += 1;
        self.next_start += len;
        Some(partition)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining: usize = self.num_workers - self.next_worker;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Partitions {}

impl FusedIterator for Partitions {}

#[cfg(all(test, feature = "std"))]
mod tests {
    use crate::err::ConfigError;
    use crate::partition::{partition, Partition};
    use crate::types::Parity;
    use test_log::test;

    #[test]
    fn test_remainder_goes_to_the_first_partitions() {
        let partitions: Vec<Partition> = partition(11, 4).unwrap().collect();
        let lens: Vec<usize> = partitions.iter().map(|partition| partition.len).collect();
        assert_eq!(lens, vec![3, 3, 3, 2]);

        let starts: Vec<usize> = partitions.iter().map(|partition| partition.start).collect();
        assert_eq!(starts, vec![0, 3, 6, 9]);

        let parities: Vec<Parity> = partitions.iter().map(|partition| partition.parity).collect();
        assert_eq!(parities, vec![Parity::Even, Parity::Odd, Parity::Even, Parity::Odd]);
    }

    #[test]
    fn test_partitions_cover_every_index_once() {
        for num_elements in 1..40 {
            for num_workers in 1..=num_elements {
                let partitions: Vec<Partition> =
                    partition(num_elements, num_workers).unwrap().collect();
                assert_eq!(partitions.len(), num_workers);

                let mut expected_start: usize = 0;
                for (worker_id, partition) in partitions.iter().enumerate() {
                    assert_eq!(partition.worker_id, worker_id);
                    assert_eq!(partition.start, expected_start);
                    assert!(partition.len >= 1);
                    assert!(partition.len <= num_elements / num_workers + 1);
                    expected_start = partition.end();
                }
                assert_eq!(expected_start, num_elements);
            }
        }
    }

    #[test]
    fn test_partitioning_is_deterministic() {
        let first: Vec<Partition> = partition(1000, 7).unwrap().collect();
        let second: Vec<Partition> = partition(1000, 7).unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exact_size() {
        let mut partitions = partition(10, 3).unwrap();
        assert_eq!(partitions.len(), 3);
        partitions.next();
        assert_eq!(partitions.len(), 2);
    }

    #[test]
    fn test_empty_array_gets_one_empty_partition() {
        let partitions: Vec<Partition> = partition(0, 1).unwrap().collect();
        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].range(), 0..0);
    }

    #[test]
    fn test_invalid_worker_counts() {
        assert_eq!(partition(10, 0).unwrap_err(), ConfigError::NoWorkers);
        assert_eq!(
            partition(3, 4).unwrap_err(),
            ConfigError::MoreWorkersThanElements { workers: 4, elements: 3 }
        );
        assert!(matches!(
            partition(0, 2),
            Err(ConfigError::MoreWorkersThanElements { .. })
        ));
    }
}
