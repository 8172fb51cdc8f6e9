use std::thread;

/// Asserts that `perm` contains every index in `0 .. perm.len()` exactly once.
#[macro_export]
macro_rules! assert_is_permutation {
    ($perm:expr) => {{
        let perm: &[usize] = &$perm;
        let mut seen = vec![false; perm.len()];
        for (position, &index) in perm.iter().enumerate() {
            assert!(
                index < perm.len(),
                "entry {} at position {} is out of bounds for a permutation of length {}",
                index,
                position,
                perm.len()
            );
            assert!(!seen[index], "index {} appears more than once", index);
            seen[index] = true;
        }
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::catch_unwind;
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(|| $e);
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}

/// Runs `f` once per communicator, each on its own thread, and returns the results in rank order.
///
/// The communicators are expected to belong to the same group, so that collectives issued
/// inside `f` can complete.
pub fn run_on_ranks<C, T, F>(comms: Vec<C>, f: F) -> Vec<T>
where
    C: Send,
    T: Send,
    F: Fn(C) -> T + Sync,
{
    let f = &f;
    thread::scope(|scope| {
        let handles: Vec<_> = comms
            .into_iter()
            .map(|comm| scope.spawn(move || f(comm)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("rank thread panicked"))
            .collect()
    })
}

/// Element-wise sum of equally long vectors, e.g. per-rank contributions to a global vector.
pub fn sum_contributions(contributions: &[Vec<usize>]) -> Vec<usize> {
    let len = contributions.first().map(Vec::len).unwrap_or(0);
    let mut sum = vec![0; len];
    for contribution in contributions {
        assert_eq!(contribution.len(), len, "All contributions must have the same length.");
        for (total, value) in sum.iter_mut().zip(contribution) {
            *total += value;
        }
    }
    sum
}
