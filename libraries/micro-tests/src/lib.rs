//! Self-registering unit tests.
//!
//! Tests are plain functions annotated with [`micro_test`]. Each one places a
//! record in a dedicated link section, so the final executable knows every test
//! it was linked with and no central list has to be maintained.
//!
//! ```ignore
//! use micro_tests::{ensure_eq, micro_test, TestResult};
//!
//! #[micro_test(base_tests)]
//! fn simple_assert_eq() -> TestResult {
//!     ensure_eq!(1 + 1, 2);
//!     Ok(())
//! }
//!
//! micro_tests::test_main!();
//! ```

pub use test_catalog::{
    Catalog, Failure, FailureLocation, Filter, SourcePosition, TestDesc, TestRecord, TestResult,
};
pub use test_harness::{
    execute, help_text, list_tests, parse_args, run, run_concurrent, run_config, run_sequential,
    run_with, ArgsError, Exit, IOutput, Mode, Reporter, RunConfig, RunSummary, Scheduler,
    StdOutput, DEFAULT_THREADS,
};
pub use test_macros::micro_test;

pub const MAJOR: u32 = 0;
pub const MINOR: u32 = 1;

#[doc(hidden)]
pub mod __private {
    pub use test_catalog::{SourcePosition, TestDesc, TestRecord};

    use std::borrow::Cow;

    use crate::Failure;

    /// Build the failure of an assertion and print its diagnostic to stderr.
    pub fn failed(file: &'static str, line: u32, message: impl Into<Cow<'static, str>>) -> Failure {
        let failure = Failure::at(file, line, message);

        std::eprintln!("{}", diagnostic(&failure));

        failure
    }

    pub fn diagnostic(failure: &Failure) -> String {
        format!("error: {}", failure)
    }
}

/// Fail the current test unless `cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::__private::failed(
                ::core::file!(),
                ::core::line!(),
                ::core::concat!("failed assertion: ", ::core::stringify!($cond)),
            ));
        }
    };
}

/// Fail the current test unless `a == b`.
#[macro_export]
macro_rules! ensure_eq {
    ($a:expr, $b:expr $(,)?) => {
        match (&$a, &$b) {
            (a, b) => {
                if !(*a == *b) {
                    return ::core::result::Result::Err($crate::__private::failed(
                        ::core::file!(),
                        ::core::line!(),
                        ::core::concat!(
                            "failed expect equal: ",
                            ::core::stringify!($a),
                            " and ",
                            ::core::stringify!($b)
                        ),
                    ));
                }
            }
        }
    };
}

/// Fail the current test if `a == b`.
#[macro_export]
macro_rules! ensure_ne {
    ($a:expr, $b:expr $(,)?) => {
        match (&$a, &$b) {
            (a, b) => {
                if *a == *b {
                    return ::core::result::Result::Err($crate::__private::failed(
                        ::core::file!(),
                        ::core::line!(),
                        ::core::concat!(
                            "failed expect not equal: ",
                            ::core::stringify!($a),
                            " and ",
                            ::core::stringify!($b)
                        ),
                    ));
                }
            }
        }
    };
}

/// End the current test successfully.
#[macro_export]
macro_rules! pass {
    () => {
        return ::core::result::Result::Ok(())
    };
}

/// End the current test with a failure.
#[macro_export]
macro_rules! fail {
    () => {
        return ::core::result::Result::Err($crate::__private::failed(
            ::core::file!(),
            ::core::line!(),
            "test failed",
        ))
    };
    ($($arg:tt)+) => {
        return ::core::result::Result::Err($crate::__private::failed(
            ::core::file!(),
            ::core::line!(),
            ::std::format!($($arg)+),
        ))
    };
}

/// Define `fn main` running every test linked into the executable.
#[macro_export]
macro_rules! test_main {
    () => {
        #[cfg_attr(test, allow(dead_code))]
        fn main() -> ::std::process::ExitCode {
            $crate::run(::std::env::args()).into()
        }
    };
}
