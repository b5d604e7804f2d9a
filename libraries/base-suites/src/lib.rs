//! Sanity suites linked into every test runner.

use micro_tests::{ensure, ensure_eq, ensure_ne, micro_test, TestResult};

#[micro_test(base_tests)]
fn simple_assertion() -> TestResult {
    ensure!(true);
    Ok(())
}

#[micro_test(base_tests)]
fn simple_assert_eq() -> TestResult {
    ensure_eq!(1, 1);
    Ok(())
}

#[micro_test(base_tests2)]
fn simple_assert_not_eq() -> TestResult {
    ensure_ne!(1, 2);
    Ok(())
}
