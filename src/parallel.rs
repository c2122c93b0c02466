//! The data-parallel tile loop (C2).
//!
//! Partitions `[0, N)` into contiguous blocks and runs a closure over
//! each index exactly once, either across worker threads or, with the
//! `parallel` feature disabled (or [`TileLoop::sequential`]), in
//! ascending order on the calling thread.
//!
//! Grounded on `vfx-ops::parallel`'s use of Rayon for tile dispatch and
//! on `original_source/include/gaussianblur/helpers.hpp`'s `hybrid_loop`,
//! whose explicit block/thread-count arithmetic this reproduces exactly
//! (Rayon's own `par_chunks` does not guarantee this partitioning).

/// Controls whether [`for_each_tile`] may use worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileLoop {
    parallel: bool,
}

impl TileLoop {
    /// A tile loop that uses all available hardware concurrency (subject
    /// to the `parallel` cargo feature being enabled).
    pub fn parallel() -> Self {
        Self { parallel: true }
    }

    /// A tile loop that always runs sequentially on the calling thread,
    /// in ascending index order. Used to force determinism (P9) or to
    /// bound peak memory on small jobs.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Runs `f(i)` for every `i` in `[0, n)`, exactly once, with no
    /// ordering guarantee between indices when running in parallel.
    ///
    /// `f` must be independent across `i`: it receives no shared mutable
    /// state and is expected to own (or borrow disjoint pieces of) its
    /// working memory.
    pub fn for_each(&self, n: usize, f: impl Fn(usize) + Sync) {
        if n == 0 {
            return;
        }
        #[cfg(feature = "parallel")]
        {
            if self.parallel {
                run_parallel(n, &f);
                return;
            }
        }
        for i in 0..n {
            f(i);
        }
    }
}

impl Default for TileLoop {
    fn default() -> Self {
        Self::parallel()
    }
}

#[cfg(feature = "parallel")]
fn run_parallel(n: usize, f: &(impl Fn(usize) + Sync)) {
    let workers = rayon::current_num_threads().max(1);
    let block = n.div_ceil(workers);
    let threads_needed = n.div_ceil(block).min(workers);

    rayon::scope(|scope| {
        for tid in 0..threads_needed {
            let start = tid * block;
            let end = if tid == threads_needed - 1 {
                n
            } else {
                (start + block).min(n)
            };
            scope.spawn(move |_| {
                for i in start..end {
                    f(i);
                }
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn visits_every_index_exactly_once_parallel() {
        let seen = Mutex::new(vec![0u32; 257]);
        TileLoop::parallel().for_each(257, |i| {
            seen.lock().unwrap()[i] += 1;
        });
        assert!(seen.lock().unwrap().iter().all(|&c| c == 1));
    }

    #[test]
    fn visits_every_index_exactly_once_sequential() {
        let seen = Mutex::new(vec![0u32; 257]);
        TileLoop::sequential().for_each(257, |i| {
            seen.lock().unwrap()[i] += 1;
        });
        assert!(seen.lock().unwrap().iter().all(|&c| c == 1));
    }

    #[test]
    fn sequential_is_ascending() {
        let order = Mutex::new(Vec::new());
        TileLoop::sequential().for_each(10, |i| {
            order.lock().unwrap().push(i);
        });
        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn zero_length_is_a_noop() {
        let calls = AtomicUsize::new(0);
        TileLoop::parallel().for_each(0, |_| {
            calls.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}
