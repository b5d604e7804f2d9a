//! Text output of a run.
//!
//! Formatting lives in [`Reporter`]; where the lines end up is decided by an
//! [`IOutput`] sink, so runs can be captured in tests.

use core::fmt;

use test_catalog::{Catalog, TestDesc, TestResult};

use crate::RunConfig;

/// Destination of the lines a run produces.
///
/// Each call receives exactly one line (which may itself contain newlines) and
/// must write it as a unit. Workers share the sink, so it must be `Sync`.
pub trait IOutput: Sync {
    fn stdout(&self, line: fmt::Arguments<'_>);

    fn stderr(&self, line: fmt::Arguments<'_>);
}

/// Writes to the process' standard output and error streams.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdOutput;

impl IOutput for StdOutput {
    fn stdout(&self, line: fmt::Arguments<'_>) {
        println!("{}", line);
    }

    fn stderr(&self, line: fmt::Arguments<'_>) {
        eprintln!("{}", line);
    }
}

pub struct Reporter<'o> {
    output: &'o dyn IOutput,
    quiet: bool,
    debug: bool,
}

impl<'o> Reporter<'o> {
    pub fn new(output: &'o dyn IOutput, config: &RunConfig) -> Self {
        Self {
            output,
            quiet: config.quiet,
            debug: config.debug,
        }
    }

    pub fn banner(&self) {
        self.output
            .stdout(format_args!("\nmicro-tests\n-----------\n\nRunning tests...\n"));
    }

    pub fn multithreaded_banner(&self, threads: usize) {
        self.output
            .stdout(format_args!("Running multithreaded with {} threads.\n", threads));
    }

    pub fn help(&self) {
        self.output.stdout(format_args!("{}", help_text()));
    }

    pub fn catalog_bounds(&self, catalog: &Catalog<'_>) {
        let (start, end) = catalog.bounds();

        self.output.stdout(format_args!(
            "debug: catalog start={:p}, end={:p}, slots={}",
            start,
            end,
            catalog.len()
        ));
    }

    /// Report a finished test. `worker` is set when the test ran on a scheduler worker.
    pub fn outcome(&self, desc: &TestDesc, result: &TestResult, worker: Option<usize>) {
        let prefix = WorkerPrefix(worker.filter(|_| self.debug));

        match result {
            Err(failure) => {
                log::debug!("{} failed: {}", desc.function_name, failure);

                self.output.stderr(format_args!(
                    "{}suite: {}, test: {} FAILED",
                    prefix, desc.suite, desc.name
                ));
            }
            Ok(()) if !self.quiet => self.output.stdout(format_args!(
                "{}suite: {}, test: {} OK",
                prefix, desc.suite, desc.name
            )),
            Ok(()) => {}
        }
    }

    pub fn listed(&self, desc: &TestDesc) {
        self.output
            .stdout(format_args!("suite: {}, test: {}", desc.suite, desc.name));
    }

    pub fn summary(&self, failures: u64) {
        if self.quiet {
            return;
        }

        self.output.stdout(format_args!(
            "\nTests done: {} {} failed\n",
            failures,
            if failures == 1 { "test" } else { "tests" }
        ));
    }

    pub fn worker_start_failed(&self, worker: usize, err: &std::io::Error) {
        self.output.stderr(format_args!(
            "run_multithreaded: failed to start worker {}: {}",
            worker, err
        ));
    }
}

struct WorkerPrefix(Option<usize>);

impl fmt::Display for WorkerPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(worker) => write!(f, "(worker {}) ", worker),
            None => Ok(()),
        }
    }
}

pub fn help_text() -> String {
    let mut text = String::from(
        "micro-tests usage:\n\
         \n  --help,-h             show help message\
         \n  --list                list tests\
         \n  --suite <suite-name>  run a specific suite\
         \n  --test  <test-name>   run a specific test",
    );

    if cfg!(feature = "multithreaded") {
        text.push_str(
            "\n  --multithreaded       run tests on multiple threads\
             \n  --threads <n>         specify the number n of threads (use with --multithreaded)",
        );
    }

    text.push_str(
        "\n  --no-banner           do not print the banner\
         \n  --debug               additional debug prints\
         \n  --quiet               do not print OK results",
    );

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Lines;
    use test_catalog::{Failure, SourcePosition};

    fn noop() -> TestResult {
        Ok(())
    }

    const DESC: TestDesc = TestDesc {
        suite: "base_tests",
        name: "simple_assertion",
        function_name: "base_suites::simple_assertion",
        source_file: file!(),
        position: SourcePosition { line: 1, column: 1 },
        func: noop,
    };

    #[test]
    fn test_outcome_lines() {
        let lines = Lines::default();
        let reporter = Reporter::new(&lines, &RunConfig::default());

        reporter.outcome(&DESC, &Ok(()), None);
        reporter.outcome(&DESC, &Err(Failure::new("boom")), None);

        assert_eq!(*lines.out.lock(), ["suite: base_tests, test: simple_assertion OK"]);
        assert_eq!(
            *lines.err.lock(),
            ["suite: base_tests, test: simple_assertion FAILED"]
        );
    }

    #[test]
    fn test_quiet_hides_successes_and_summary() {
        let lines = Lines::default();
        let config = RunConfig {
            quiet: true,
            ..Default::default()
        };
        let reporter = Reporter::new(&lines, &config);

        reporter.outcome(&DESC, &Ok(()), None);
        reporter.outcome(&DESC, &Err(Failure::new("boom")), None);
        reporter.summary(1);

        assert!(lines.out.lock().is_empty());
        assert_eq!(lines.err.lock().len(), 1);
    }

    #[test]
    fn test_summary_pluralization() {
        let lines = Lines::default();
        let reporter = Reporter::new(&lines, &RunConfig::default());

        reporter.summary(0);
        reporter.summary(1);
        reporter.summary(2);

        assert_eq!(
            *lines.out.lock(),
            [
                "\nTests done: 0 tests failed\n",
                "\nTests done: 1 test failed\n",
                "\nTests done: 2 tests failed\n",
            ]
        );
    }

    #[test]
    fn test_worker_prefix_only_in_debug() {
        let lines = Lines::default();

        Reporter::new(&lines, &RunConfig::default()).outcome(&DESC, &Ok(()), Some(3));

        let debug = RunConfig {
            debug: true,
            ..Default::default()
        };
        Reporter::new(&lines, &debug).outcome(&DESC, &Ok(()), Some(3));
        Reporter::new(&lines, &debug).outcome(&DESC, &Ok(()), None);

        assert_eq!(
            *lines.out.lock(),
            [
                "suite: base_tests, test: simple_assertion OK",
                "(worker 3) suite: base_tests, test: simple_assertion OK",
                "suite: base_tests, test: simple_assertion OK",
            ]
        );
    }

    #[test]
    fn test_help_lists_every_option() {
        let help = help_text();

        for option in [
            "--help,-h",
            "--list",
            "--suite <suite-name>",
            "--test  <test-name>",
            "--no-banner",
            "--debug",
            "--quiet",
        ] {
            assert!(help.contains(option), "missing {}", option);
        }

        assert_eq!(help.contains("--threads <n>"), cfg!(feature = "multithreaded"));
    }
}
