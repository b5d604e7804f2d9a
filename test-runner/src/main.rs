// see https://github.com/rust-lang/rust/issues/133491#issue-2694064193
include!(concat!(env!("OUT_DIR"), "/generated.rs"));

#[cfg(test)]
mod suites;

micro_tests::test_main!();
