use core::fmt;
use std::num::NonZeroUsize;

use crate::RunConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// A flag that takes a value was the last argument.
    MissingValue { usage: &'static str },
    /// `--threads` was given something that is not a positive integer.
    InvalidThreadCount(String),
    Unrecognized(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { usage } => write!(f, "Usage: {}", usage),
            ArgsError::InvalidThreadCount(value) => write!(
                f,
                "Error: Thread number {} must be an integer and positive number",
                value
            ),
            ArgsError::Unrecognized(arg) => write!(f, "Unrecognized argument: {}", arg),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Parse a command line into a [`RunConfig`].
///
/// The first item is the program name and is skipped, so `std::env::args()`
/// can be passed as is.
pub fn parse_args<I, S>(args: I) -> Result<RunConfig, ArgsError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut config = RunConfig::default();
    let mut args = args.into_iter().skip(1).map(Into::into);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => config.print_help = true,
            "--list" => config.show_list = true,
            "--suite" => config.suite = Some(value(&mut args, "--suite <suite-name>")?),
            "--test" => config.test = Some(value(&mut args, "--test <test-name>")?),
            "--no-banner" => config.print_banner = false,
            "--debug" => config.debug = true,
            "--quiet" => config.quiet = true,
            #[cfg(feature = "multithreaded")]
            "--multithreaded" => config.multithreaded = true,
            #[cfg(feature = "multithreaded")]
            "--threads" => config.threads = thread_count(value(&mut args, "--threads <n>")?)?,
            _ => return Err(ArgsError::Unrecognized(arg)),
        }
    }

    Ok(config)
}

fn value(args: &mut impl Iterator<Item = String>, usage: &'static str) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { usage })
}

#[cfg_attr(not(feature = "multithreaded"), allow(dead_code))]
fn thread_count(value: String) -> Result<NonZeroUsize, ArgsError> {
    value
        .parse::<usize>()
        .ok()
        .and_then(NonZeroUsize::new)
        .ok_or(ArgsError::InvalidThreadCount(value))
}
