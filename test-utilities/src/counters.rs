use core::sync::atomic::{AtomicUsize, Ordering};

/// Per-test invocation counters for test callbacks, which cannot capture state.
pub struct InvocationCounts<const N: usize> {
    counts: [AtomicUsize; N],
}

impl<const N: usize> InvocationCounts<N> {
    pub const fn new() -> Self {
        Self {
            counts: [const { AtomicUsize::new(0) }; N],
        }
    }

    pub fn hit(&self, index: usize) {
        self.counts[index].fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self, index: usize) -> usize {
        self.counts[index].load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> [usize; N] {
        core::array::from_fn(|index| self.get(index))
    }

    pub fn total(&self) -> usize {
        self.snapshot().iter().sum()
    }

    pub fn reset(&self) {
        for count in &self.counts {
            count.store(0, Ordering::SeqCst);
        }
    }
}

impl<const N: usize> Default for InvocationCounts<N> {
    fn default() -> Self {
        Self::new()
    }
}
