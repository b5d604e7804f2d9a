//! Descriptors and records for building in-memory catalogs.

use test_catalog::{Failure, SourcePosition, TestDesc, TestRecord, TestResult};

pub fn passing() -> TestResult {
    Ok(())
}

pub fn failing() -> TestResult {
    Err(Failure::new("fixture failure"))
}

pub fn panicking() -> TestResult {
    panic!("fixture panic")
}

pub const fn desc(suite: &'static str, name: &'static str, func: fn() -> TestResult) -> TestDesc {
    TestDesc {
        suite,
        name,
        function_name: name,
        source_file: "fixtures.rs",
        position: SourcePosition { line: 1, column: 1 },
        func,
    }
}

/// A registered (marked) record.
pub const fn record(suite: &'static str, name: &'static str, func: fn() -> TestResult) -> TestRecord {
    TestRecord::new(desc(suite, name, func))
}

/// A record whose marker is not the sentinel. Catalogs must never surface it.
pub const fn padding(suite: &'static str, name: &'static str, func: fn() -> TestResult) -> TestRecord {
    TestRecord::with_marker(0xBAAD_F00D, desc(suite, name, func))
}
