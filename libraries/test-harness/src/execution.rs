use core::{iter::Sum, ops::AddAssign};
use std::panic::{self, AssertUnwindSafe};

use test_catalog::{Failure, TestDesc, TestResult};

/// Tally of the tests one runner (or one worker) executed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub executed: usize,
    pub failures: u64,
}

impl RunSummary {
    pub fn record(&mut self, result: &TestResult) {
        self.executed += 1;

        if let Err(failure) = result {
            self.failures += u64::from(failure.count());
        }
    }

    pub fn passed(&self) -> bool {
        self.failures == 0
    }
}

impl AddAssign for RunSummary {
    fn add_assign(&mut self, other: Self) {
        self.executed += other.executed;
        self.failures += other.failures;
    }
}

impl Sum for RunSummary {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(RunSummary::default(), |mut total, summary| {
            total += summary;
            total
        })
    }
}

/// Run one test callback. A panicking callback is reported as a failure.
pub fn execute(desc: &TestDesc) -> TestResult {
    log::trace!("running {}", desc.function_name);

    match panic::catch_unwind(AssertUnwindSafe(|| desc.run())) {
        Ok(result) => result,
        Err(payload) => Err(Failure::at(
            desc.source_file,
            desc.position.line,
            format!("panicked: {}", panic_message(&*payload)),
        )),
    }
}

/// Message of a panic payload, as far as it can be recovered.
pub(crate) fn panic_message(payload: &(dyn core::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "Box<dyn Any>"
    }
}
