#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

mod catalog;
mod desc;
mod filter;
mod outcome;
mod symbol_ptr;

pub use catalog::{Catalog, Iter};
pub use desc::{SourcePosition, TestDesc, TestRecord, SENTINEL};
pub use filter::{names_equal, Filter};
pub use outcome::{Failure, FailureLocation, TestResult};

/// Name of the link section every registered [`TestRecord`] is placed in.
///
/// On ELF targets the linker synthesizes `__start_micro_tests` and
/// `__stop_micro_tests` around it, which is why the name must stay a valid C
/// identifier.
pub const SECTION_NAME: &str = "micro_tests";

/// The Mach-O spelling of [`SECTION_NAME`] (`segment,section,type,attributes`).
pub const MACHO_SECTION_NAME: &str = "__DATA,__micro_tests,regular,no_dead_strip";
