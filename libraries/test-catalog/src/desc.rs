use crate::TestResult;

/// Marker written into every [`TestRecord`] by [`TestRecord::new`].
///
/// A catalog slot is only treated as a test if its first four bytes hold this value.
pub const SENTINEL: u32 = 0xDEAD_BEAF;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

#[repr(C)]
#[derive(Debug)]
pub struct TestDesc {
    pub suite: &'static str,
    pub name: &'static str,
    /// `module_path!()` + `::` + the function identifier, for diagnostics only.
    pub function_name: &'static str,
    pub source_file: &'static str,
    pub position: SourcePosition,
    pub func: fn() -> TestResult,
}

/// One slot of the catalog region.
///
/// The layout is fixed so that the marker can be inspected through a raw pointer
/// before anything else in the slot is trusted.
#[repr(C)]
#[derive(Debug)]
pub struct TestRecord {
    pub(crate) marker: u32,
    desc: TestDesc,
}

impl TestRecord {
    pub const fn new(desc: TestDesc) -> Self {
        Self {
            marker: SENTINEL,
            desc,
        }
    }

    /// Builds a record carrying an arbitrary marker.
    /// Only useful to exercise the catalog's slot validation.
    #[doc(hidden)]
    pub const fn with_marker(marker: u32, desc: TestDesc) -> Self {
        Self { marker, desc }
    }

    pub const fn marker(&self) -> u32 {
        self.marker
    }

    pub const fn is_valid(&self) -> bool {
        self.marker == SENTINEL
    }

    pub const fn desc(&self) -> Option<&TestDesc> {
        match self.is_valid() {
            true => Some(&self.desc),
            false => None,
        }
    }
}

impl TestDesc {
    pub fn run(&self) -> TestResult {
        (self.func)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Failure;

    fn passing() -> TestResult {
        Ok(())
    }

    fn failing() -> TestResult {
        Err(Failure::new("nope"))
    }

    const fn desc(name: &'static str, func: fn() -> TestResult) -> TestDesc {
        TestDesc {
            suite: "desc",
            name,
            function_name: name,
            source_file: file!(),
            position: SourcePosition { line: 1, column: 1 },
            func,
        }
    }

    #[test]
    fn test_new_record_carries_sentinel() {
        let record = TestRecord::new(desc("passing", passing));

        assert_eq!(record.marker(), SENTINEL);
        assert!(record.is_valid());
        assert_eq!(record.desc().map(|d| d.name), Some("passing"));
    }

    #[test]
    fn test_foreign_marker_hides_descriptor() {
        let record = TestRecord::with_marker(0, desc("passing", passing));
        assert!(!record.is_valid());
        assert!(record.desc().is_none());

        // one bit off is still not a test
        let record = TestRecord::with_marker(SENTINEL ^ 1, desc("passing", passing));
        assert!(record.desc().is_none());
    }

    #[test]
    fn test_run_invokes_callback() {
        assert_eq!(desc("passing", passing).run(), Ok(()));
        assert!(desc("failing", failing).run().is_err());
    }

    #[test]
    fn test_marker_is_first_field() {
        let record = TestRecord::new(desc("passing", passing));
        let base = &record as *const TestRecord as usize;
        let marker = core::ptr::addr_of!(record.marker) as usize;

        assert_eq!(base, marker);
    }
}
