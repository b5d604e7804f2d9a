mod args;
mod config;
mod execution;
mod listing;
mod report;
mod scheduler;
mod sequential;

#[cfg(test)]
mod testing;

use std::process::ExitCode;

pub use args::{parse_args, ArgsError};
pub use config::{Mode, RunConfig, DEFAULT_THREADS};
pub use execution::{execute, RunSummary};
pub use listing::list_tests;
pub use report::{help_text, IOutput, Reporter, StdOutput};
pub use scheduler::{run_concurrent, Scheduler};
pub use sequential::run_sequential;

use test_catalog::Catalog;

/// How an invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Every executed test passed, or nothing had to be executed.
    Success,
    /// Total failure count of the run, never zero.
    Failed(u64),
    /// The command line could not be parsed; nothing was executed.
    Usage,
}

impl Exit {
    pub fn from_failures(failures: u64) -> Self {
        match failures {
            0 => Exit::Success,
            failures => Exit::Failed(failures),
        }
    }

    /// Process exit status: the failure count (saturated to what an exit status can carry),
    /// or 1 for a usage error.
    pub fn code(&self) -> u8 {
        match self {
            Exit::Success => 0,
            Exit::Failed(failures) => (*failures).min(u8::MAX as u64) as u8,
            Exit::Usage => 1,
        }
    }
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        ExitCode::from(exit.code())
    }
}

/// Run the tests linked into this executable as selected by `args`
/// (typically `std::env::args()`), printing to stdout/stderr.
pub fn run<I, S>(args: I) -> Exit
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let config = match parse_args(args) {
        Ok(config) => config,
        Err(err) => return usage_error(&err, &StdOutput),
    };

    init_logger(config.debug);

    run_config(Catalog::linked(), &config, &StdOutput)
}

/// Like [`run`], over an explicit catalog and output sink.
pub fn run_with<I, S>(args: I, catalog: Catalog<'_>, output: &dyn IOutput) -> Exit
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match parse_args(args) {
        Ok(config) => run_config(catalog, &config, output),
        Err(err) => usage_error(&err, output),
    }
}

/// Carry out an already parsed configuration.
pub fn run_config(catalog: Catalog<'_>, config: &RunConfig, output: &dyn IOutput) -> Exit {
    let reporter = Reporter::new(output, config);
    let mode = config.mode();

    log::debug!("mode: {:?}, filter: {:?}", mode, config.filter());

    let summary = match mode {
        Mode::Help => {
            reporter.help();
            return Exit::Success;
        }
        Mode::List => {
            list_tests(catalog, &config.filter(), &reporter);
            return Exit::Success;
        }
        Mode::Sequential | Mode::Concurrent(_) => {
            if config.print_banner {
                reporter.banner();
            }

            if config.debug {
                reporter.catalog_bounds(&catalog);
            }

            match mode {
                Mode::Concurrent(threads) => run_concurrent(catalog, config, threads, &reporter),
                _ => run_sequential(catalog, config, &reporter),
            }
        }
    };

    log::debug!(
        "{} tests executed, {} failures",
        summary.executed,
        summary.failures
    );

    Exit::from_failures(summary.failures)
}

fn usage_error(err: &ArgsError, output: &dyn IOutput) -> Exit {
    output.stderr(format_args!("{}", err));
    output.stderr(format_args!("Try --help or -h"));

    Exit::Usage
}

/// Install `env_logger`. `--debug` turns on debug records, otherwise `RUST_LOG`
/// decides and defaults to warnings.
fn init_logger(debug: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }

    // the host program may have installed its own logger already
    let _ = builder.try_init();
}
