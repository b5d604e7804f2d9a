use micro_tests::{ensure_eq, fail, micro_test, pass, TestResult};
use test_utilities::InvocationCounts;

pub const COUNTED_TESTS: usize = 6;

pub static COUNTED: InvocationCounts<COUNTED_TESTS> = InvocationCounts::new();
pub static LISTED_ONLY: InvocationCounts<1> = InvocationCounts::new();

#[micro_test(expected_failures)]
fn explicit_failure() -> TestResult {
    fail!("failing on purpose");
}

#[micro_test(expected_failures)]
fn unequal() -> TestResult {
    ensure_eq!(1 + 1, 3);
    pass!();
}

#[micro_test(expected_failures)]
fn panics() -> TestResult {
    let empty: Vec<u32> = Vec::new();
    ensure_eq!(empty[0], 0);
    pass!();
}

#[micro_test(expected_failures)]
fn passes() -> TestResult {
    pass!();
}

#[micro_test(listed_only)]
fn must_not_run() -> TestResult {
    LISTED_ONLY.hit(0);
    pass!();
}

macro_rules! counted_tests {
    ($($name:ident => $index:literal),* $(,)?) => {
        $(
            #[micro_test(counted)]
            fn $name() -> TestResult {
                COUNTED.hit($index);
                pass!();
            }
        )*
    };
}

counted_tests! {
    counted_0 => 0,
    counted_1 => 1,
    counted_2 => 2,
    counted_3 => 3,
    counted_4 => 4,
    counted_5 => 5,
}
