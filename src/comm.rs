//! Collective communication used to combine per-process data.
//!
//! The DoF numbering only needs two collectives: gathering a single count from every process,
//! and gathering a variable-length index array from every process. Both deliver the
//! contributions of all processes, ordered by rank, to every process.
//!
//! Implementations:
//!
//! - [`SerialComm`]: a single process, all collectives are trivial.
//! - [`ThreadComm`]: a group of threads in the same address space, for tests and demos.
//! - `MpiComm` (feature `mpi`): the MPI world communicator.
use parking_lot::Mutex;
use std::sync::{Arc, Barrier};

/// Collective operations over a fixed group of processes.
///
/// Every process of the group must call the same collectives in the same order.
pub trait Collective {
    /// The rank of this process within the group.
    fn rank(&self) -> usize;

    /// The number of processes in the group.
    fn size(&self) -> usize;

    /// Gathers `local` from every process. Entry `r` of the result is the value of rank `r`.
    fn all_gather_count(&self, local: usize) -> Vec<usize>;

    /// Gathers a variable-length index array from every process.
    ///
    /// Entry `r` of the result is the array contributed by rank `r`.
    fn all_gather_indices(&self, local: &[usize]) -> Vec<Vec<usize>>;
}

impl<C: Collective + ?Sized> Collective for &C {
    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn size(&self) -> usize {
        (**self).size()
    }

    fn all_gather_count(&self, local: usize) -> Vec<usize> {
        (**self).all_gather_count(local)
    }

    fn all_gather_indices(&self, local: &[usize]) -> Vec<Vec<usize>> {
        (**self).all_gather_indices(local)
    }
}

/// Collectives for a single process.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SerialComm;

impl Collective for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn all_gather_count(&self, local: usize) -> Vec<usize> {
        vec![local]
    }

    fn all_gather_indices(&self, local: &[usize]) -> Vec<Vec<usize>> {
        vec![local.to_vec()]
    }
}

#[derive(Debug)]
struct ThreadGroup {
    barrier: Barrier,
    slots: Mutex<Vec<Vec<usize>>>,
}

/// Collectives among a group of threads, each acting as one process.
///
/// Every member must live on its own thread: a collective blocks until all members of the
/// group have entered it.
#[derive(Debug, Clone)]
pub struct ThreadComm {
    rank: usize,
    group: Arc<ThreadGroup>,
}

impl ThreadComm {
    /// Creates the communicators of a group of `size` threads, ordered by rank.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn group(size: usize) -> Vec<ThreadComm> {
        assert!(size > 0, "A thread group must have at least one member.");
        let group = Arc::new(ThreadGroup {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![Vec::new(); size]),
        });
        (0..size)
            .map(|rank| ThreadComm {
                rank,
                group: Arc::clone(&group),
            })
            .collect()
    }
}

impl Collective for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.group.slots.lock().len()
    }

    fn all_gather_count(&self, local: usize) -> Vec<usize> {
        self.all_gather_indices(&[local])
            .into_iter()
            .map(|counts| counts[0])
            .collect()
    }

    fn all_gather_indices(&self, local: &[usize]) -> Vec<Vec<usize>> {
        self.group.slots.lock()[self.rank] = local.to_vec();
        self.group.barrier.wait();
        let gathered = self.group.slots.lock().clone();
        // Nobody may overwrite a slot before every member has read all of them
        self.group.barrier.wait();
        gathered
    }
}

#[cfg(feature = "mpi")]
pub use self::mpi_impl::MpiComm;

#[cfg(feature = "mpi")]
mod mpi_impl {
    use super::Collective;
    use mpi::datatype::PartitionMut;
    use mpi::topology::SimpleCommunicator;
    use mpi::traits::*;
    use mpi::Count;

    /// Collectives over the MPI world communicator.
    ///
    /// MPI must have been initialized with `mpi::initialize()`, and the returned universe must
    /// outlive every `MpiComm`.
    #[derive(Debug, Default)]
    pub struct MpiComm;

    impl MpiComm {
        pub fn new() -> Self {
            Self
        }
    }

    impl Collective for MpiComm {
        fn rank(&self) -> usize {
            SimpleCommunicator::world().rank() as usize
        }

        fn size(&self) -> usize {
            SimpleCommunicator::world().size() as usize
        }

        fn all_gather_count(&self, local: usize) -> Vec<usize> {
            let world = SimpleCommunicator::world();
            let local = local as u64;
            let mut counts = vec![0u64; world.size() as usize];
            world.all_gather_into(&local, &mut counts[..]);
            counts.into_iter().map(|count| count as usize).collect()
        }

        fn all_gather_indices(&self, local: &[usize]) -> Vec<Vec<usize>> {
            let world = SimpleCommunicator::world();
            let lengths = self.all_gather_count(local.len());

            let counts: Vec<Count> = lengths.iter().map(|&len| len as Count).collect();
            let displacements: Vec<Count> = counts
                .iter()
                .scan(0, |acc, &x| {
                    let tmp = *acc;
                    *acc += x;
                    Some(tmp)
                })
                .collect();

            let send: Vec<u64> = local.iter().map(|&index| index as u64).collect();
            let mut receive = vec![0u64; lengths.iter().sum()];
            {
                let mut partition = PartitionMut::new(&mut receive[..], &counts[..], &displacements[..]);
                world.all_gather_varcount_into(&send[..], &mut partition);
            }

            let mut remaining = &receive[..];
            lengths
                .iter()
                .map(|&len| {
                    let (head, tail) = remaining.split_at(len);
                    remaining = tail;
                    head.iter().map(|&index| index as usize).collect()
                })
                .collect()
        }
    }
}
