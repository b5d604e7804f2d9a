pub mod counters;
pub mod fixtures;
pub mod output;

pub use counters::InvocationCounts;
pub use output::{CaptureOutput, Stream};

use test_catalog::Catalog;
use test_harness::Exit;

/// Run `args` (without the program name) against `catalog`, capturing every line.
pub fn run_captured(catalog: Catalog<'_>, args: &[&str]) -> (Exit, CaptureOutput) {
    let output = CaptureOutput::new();
    let argv = core::iter::once("micro-tests").chain(args.iter().copied());

    let exit = test_harness::run_with(argv, catalog, &output);

    (exit, output)
}

#[cfg(feature = "test_log")]
#[ctor::ctor]
unsafe fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}
