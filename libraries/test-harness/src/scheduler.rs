//! Concurrent execution.
//!
//! Workers share one cursor into the catalog. Claiming a test means scanning
//! forward from the cursor under the lock and moving the cursor past the match;
//! the test itself runs after the lock is released. The cursor only moves
//! forward, so every selected slot is claimed exactly once.

use std::{
    io,
    num::NonZeroUsize,
    thread::{self, ScopedJoinHandle},
};

use hermit_sync::SpinMutex;
use test_catalog::{Catalog, Filter, TestDesc};

use crate::{execute, Reporter, RunConfig, RunSummary};

pub struct Scheduler<'a, 'f> {
    catalog: Catalog<'a>,
    filter: Filter<'f>,
    // index of the first slot not yet examined
    cursor: SpinMutex<usize>,
}

impl<'a, 'f> Scheduler<'a, 'f> {
    pub fn new(catalog: Catalog<'a>, filter: Filter<'f>) -> Self {
        Self {
            catalog,
            filter,
            cursor: SpinMutex::new(0),
        }
    }

    /// Reserve the next selected test, or `None` once the catalog is exhausted.
    pub fn claim_next(&self) -> Option<&'a TestDesc> {
        let mut cursor = self.cursor.lock();

        match self.catalog.next_match(*cursor, &self.filter) {
            Some((index, desc)) => {
                *cursor = index + 1;
                Some(desc)
            }
            None => {
                *cursor = self.catalog.len();
                None
            }
        }
    }

    pub fn cursor(&self) -> usize {
        *self.cursor.lock()
    }

    /// Claim and execute tests until none remain.
    pub fn work(&self, worker: usize, reporter: &Reporter<'_>) -> RunSummary {
        let mut summary = RunSummary::default();

        while let Some(desc) = self.claim_next() {
            log::trace!("worker {} claimed {}", worker, desc.function_name);

            let result = execute(desc);

            reporter.outcome(desc, &result, Some(worker));
            summary.record(&result);
        }

        log::debug!("worker {} done, {} tests executed", worker, summary.executed);

        summary
    }

    /// Run the selected tests on `workers` threads and sum up their results.
    ///
    /// No more workers are started than there are selected tests. A worker that
    /// cannot be started is reported and the run continues with the others. If
    /// none can be started the calling thread does the work.
    pub fn run(&self, workers: NonZeroUsize, reporter: &Reporter<'_>) -> RunSummary {
        self.run_with_spawner(workers, reporter, &NamedThreads)
    }

    pub(crate) fn run_with_spawner(
        &self,
        workers: NonZeroUsize,
        reporter: &Reporter<'_>,
        spawner: &impl IWorkerSpawner,
    ) -> RunSummary {
        let selected = self.catalog.matching(self.filter).count();
        let workers = workers.get().min(selected).max(1);

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);

            for worker in 0..workers {
                match spawner.spawn(scope, worker, move || self.work(worker, reporter)) {
                    Ok(handle) => handles.push(handle),
                    Err(err) => {
                        log::error!("failed to start worker {}: {}", worker, err);
                        reporter.worker_start_failed(worker, &err);
                    }
                }
            }

            log::debug!("{} of {} workers started", handles.len(), workers);

            if handles.is_empty() {
                log::warn!("no worker could be started, running tests on the calling thread");
                return self.work(0, reporter);
            }

            handles
                .into_iter()
                .enumerate()
                .map(|(worker, handle)| {
                    handle.join().unwrap_or_else(|_| {
                        log::error!("worker {} panicked outside of a test", worker);
                        RunSummary::default()
                    })
                })
                .sum()
        })
    }
}

/// Starts scheduler workers inside a thread scope.
pub(crate) trait IWorkerSpawner {
    fn spawn<'scope, F>(
        &self,
        scope: &'scope thread::Scope<'scope, '_>,
        worker: usize,
        work: F,
    ) -> io::Result<ScopedJoinHandle<'scope, RunSummary>>
    where
        F: FnOnce() -> RunSummary + Send + 'scope;
}

struct NamedThreads;

impl IWorkerSpawner for NamedThreads {
    fn spawn<'scope, F>(
        &self,
        scope: &'scope thread::Scope<'scope, '_>,
        worker: usize,
        work: F,
    ) -> io::Result<ScopedJoinHandle<'scope, RunSummary>>
    where
        F: FnOnce() -> RunSummary + Send + 'scope,
    {
        thread::Builder::new()
            .name(format!("micro-tests-worker-{}", worker))
            .spawn_scoped(scope, work)
    }
}

/// Run every selected test once, spread over `threads` workers.
pub fn run_concurrent(
    catalog: Catalog<'_>,
    config: &RunConfig,
    threads: NonZeroUsize,
    reporter: &Reporter<'_>,
) -> RunSummary {
    if config.print_banner {
        reporter.multithreaded_banner(threads.get());
    }

    let summary = Scheduler::new(catalog, config.filter()).run(threads, reporter);

    reporter.summary(summary.failures);

    summary
}
