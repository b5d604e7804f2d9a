use std::num::NonZeroUsize;

use test_catalog::Filter;

/// Worker count used when `--threads` is not given.
pub const DEFAULT_THREADS: NonZeroUsize = match NonZeroUsize::new(4) {
    Some(threads) => threads,
    None => panic!("default thread count must be positive"),
};

/// Settings of one invocation. Built once by [`crate::parse_args`], read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// If specified, run a specific test suite
    pub suite: Option<String>,
    /// If specified, run a specific test
    pub test: Option<String>,
    /// Whether to run the tests with multiple threads
    pub multithreaded: bool,
    /// Number of threads to use if multithreaded is enabled
    pub threads: NonZeroUsize,
    /// Whether to show a list of the tests instead of running them
    pub show_list: bool,
    /// Whether to print the banner at the start of the tests
    pub print_banner: bool,
    /// Whether to print the help message
    pub print_help: bool,
    /// Additional debug prints
    pub debug: bool,
    /// Whether to not print OK results
    pub quiet: bool,
}

/// What an invocation does, derived from [`RunConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Help,
    List,
    Sequential,
    Concurrent(NonZeroUsize),
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            suite: None,
            test: None,
            multithreaded: false,
            threads: DEFAULT_THREADS,
            show_list: false,
            print_banner: true,
            print_help: false,
            debug: false,
            quiet: false,
        }
    }
}

impl RunConfig {
    pub fn filter(&self) -> Filter<'_> {
        Filter::new(self.suite.as_deref(), self.test.as_deref())
    }

    /// Help wins over listing, listing wins over running.
    pub fn mode(&self) -> Mode {
        match self {
            RunConfig {
                print_help: true, ..
            } => Mode::Help,
            RunConfig { show_list: true, .. } => Mode::List,
            RunConfig {
                multithreaded: true,
                threads,
                ..
            } if cfg!(feature = "multithreaded") => Mode::Concurrent(*threads),
            _ => Mode::Sequential,
        }
    }
}
