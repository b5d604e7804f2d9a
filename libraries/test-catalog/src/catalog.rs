use core::{marker::PhantomData, mem::size_of, ptr, ptr::NonNull};

use crate::{desc::TestRecord, Filter, TestDesc, SENTINEL};

/// A read-only view over a contiguous region of [`TestRecord`] slots.
///
/// The region may contain slots that are not tests (padding, zeroed or misaligned
/// bytes). Those are skipped by every accessor; a descriptor reference is only
/// ever formed for a slot whose marker equals [`SENTINEL`].
#[derive(Clone, Copy)]
pub struct Catalog<'a> {
    start: NonNull<TestRecord>,
    len: usize,
    _region: PhantomData<&'a [TestRecord]>,
}

// The region is never written through a catalog.
unsafe impl Send for Catalog<'_> {}
unsafe impl Sync for Catalog<'_> {}

impl<'a> Catalog<'a> {
    pub fn from_records(records: &'a [TestRecord]) -> Self {
        Self {
            // slices are never null, even when empty
            start: NonNull::from(records).cast::<TestRecord>(),
            len: records.len(),
            _region: PhantomData,
        }
    }

    /// Create a catalog over `len` slots starting at `start`.
    ///
    /// # Safety
    ///
    /// The `len * size_of::<TestRecord>()` bytes at `start` must be readable for `'a`
    /// and must not be written while the catalog is alive. Every slot whose marker
    /// equals [`SENTINEL`] must hold a fully initialized [`TestRecord`].
    pub unsafe fn from_raw_parts(start: NonNull<TestRecord>, len: usize) -> Self {
        Self {
            start,
            len,
            _region: PhantomData,
        }
    }

    /// Create a catalog over the region `[start, end)`.
    ///
    /// The slot count is `(end - start) / size_of::<TestRecord>()`; trailing bytes
    /// that do not form a whole slot are ignored.
    ///
    /// # Safety
    ///
    /// Same requirements as [`Catalog::from_raw_parts`].
    pub unsafe fn from_bounds(start: NonNull<TestRecord>, end: NonNull<TestRecord>) -> Self {
        let (begin, finish) = (start.as_ptr() as usize, end.as_ptr() as usize);

        debug_assert!(begin <= finish, "catalog region ends before it starts");

        Self::from_raw_parts(start, finish.saturating_sub(begin) / size_of::<TestRecord>())
    }

    /// Number of slots in the region, valid or not.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Start and end address of the region.
    pub fn bounds(&self) -> (*const TestRecord, *const TestRecord) {
        let start = self.start.as_ptr() as *const TestRecord;

        (start, start.wrapping_add(self.len))
    }

    /// The descriptor held by slot `index`, or `None` if the index is out of range
    /// or the slot is not a registered test.
    pub fn slot(&self, index: usize) -> Option<&'a TestDesc> {
        if index >= self.len {
            return None;
        }

        let record = self.start.as_ptr().wrapping_add(index);

        if !record.is_aligned() {
            return None;
        }

        // SAFETY: the slot lies inside the region, which is readable for 'a.
        // Only the marker is read before the slot is known to be a record.
        let marker = unsafe { ptr::read_volatile(ptr::addr_of!((*record).marker)) };

        if marker != SENTINEL {
            return None;
        }

        // SAFETY: slots carrying the sentinel are initialized records
        unsafe { (*record).desc() }
    }

    /// The first valid slot at or after `from` selected by `filter`.
    pub fn next_match(&self, from: usize, filter: &Filter<'_>) -> Option<(usize, &'a TestDesc)> {
        (from..self.len).find_map(|index| {
            self.slot(index)
                .filter(|desc| filter.matches(desc))
                .map(|desc| (index, desc))
        })
    }

    /// Every valid descriptor, in region order.
    pub fn iter(&self) -> Iter<'a, 'static> {
        Iter {
            catalog: *self,
            filter: Filter::all(),
            next: 0,
        }
    }

    /// Every valid descriptor selected by `filter`, in region order.
    pub fn matching<'f>(&self, filter: Filter<'f>) -> Iter<'a, 'f> {
        Iter {
            catalog: *self,
            filter,
            next: 0,
        }
    }
}

impl<'a> IntoIterator for Catalog<'a> {
    type Item = &'a TestDesc;
    type IntoIter = Iter<'a, 'static>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl core::fmt::Debug for Catalog<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let (start, end) = self.bounds();

        f.debug_struct("Catalog")
            .field("start", &start)
            .field("end", &end)
            .field("slots", &self.len)
            .finish()
    }
}

pub struct Iter<'a, 'f> {
    catalog: Catalog<'a>,
    filter: Filter<'f>,
    next: usize,
}

impl<'a> Iterator for Iter<'a, '_> {
    type Item = &'a TestDesc;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, desc) = self.catalog.next_match(self.next, &self.filter)?;

        self.next = index + 1;

        Some(desc)
    }
}

// An unmarked slot placed in the section so that it (and the bounds the linker
// synthesizes for it) exists even when nothing registered a test. Scans skip it.
const ANCHOR_RECORD: TestRecord = TestRecord::with_marker(0, TestDesc {
    suite: "",
    name: "",
    function_name: "",
    source_file: file!(),
    position: crate::SourcePosition { line: 0, column: 0 },
    func: anchor,
});

fn anchor() -> crate::TestResult {
    Ok(())
}

#[cfg(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
    target_os = "illumos",
    target_os = "fuchsia",
))]
mod region {
    use super::*;

    #[used]
    #[link_section = "micro_tests"]
    static ANCHOR: TestRecord = ANCHOR_RECORD;

    pub(super) fn bounds() -> (NonNull<TestRecord>, NonNull<TestRecord>) {
        unsafe {
            (
                crate::symbol_ptr!("__start_micro_tests").cast(),
                crate::symbol_ptr!("__stop_micro_tests").cast(),
            )
        }
    }
}

#[cfg(any(target_os = "macos", target_os = "ios", target_os = "tvos", target_os = "watchos"))]
mod region {
    use super::*;

    #[used]
    #[link_section = "__DATA,__micro_tests,regular,no_dead_strip"]
    static ANCHOR: TestRecord = ANCHOR_RECORD;

    pub(super) fn bounds() -> (NonNull<TestRecord>, NonNull<TestRecord>) {
        unsafe {
            (
                crate::symbol_ptr!("\x01section$start$__DATA$__micro_tests").cast(),
                crate::symbol_ptr!("\x01section$end$__DATA$__micro_tests").cast(),
            )
        }
    }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd",
    target_os = "dragonfly",
    target_os = "illumos",
    target_os = "fuchsia",
    target_os = "macos",
    target_os = "ios",
    target_os = "tvos",
    target_os = "watchos",
)))]
compile_error!("micro-tests needs an ELF or Mach-O target to collect registered tests");

impl Catalog<'static> {
    /// The catalog of every test registered in this executable.
    pub fn linked() -> Self {
        let (start, end) = region::bounds();

        log::debug!("catalog region: start={:p}, end={:p}", start, end);

        // SAFETY: the linker bounds the section that only receives `TestRecord` statics
        unsafe { Self::from_bounds(start, end) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SourcePosition, TestResult};
    use core::mem::MaybeUninit;
    use std::vec::Vec;

    fn noop() -> TestResult {
        Ok(())
    }

    const fn desc(suite: &'static str, name: &'static str) -> TestDesc {
        TestDesc {
            suite,
            name,
            function_name: name,
            source_file: file!(),
            position: SourcePosition { line: 0, column: 0 },
            func: noop,
        }
    }

    static RECORDS: [TestRecord; 5] = [
        TestRecord::new(desc("base_tests", "simple_assertion")),
        TestRecord::with_marker(0, desc("base_tests", "ghost")),
        TestRecord::new(desc("base_tests", "simple_assert_eq")),
        TestRecord::with_marker(0xBEAF_DEAD, desc("base_tests2", "ghost")),
        TestRecord::new(desc("base_tests2", "simple_assert_not_eq")),
    ];

    fn names<'a>(iter: impl Iterator<Item = &'a TestDesc>) -> Vec<&'static str> {
        iter.map(|desc| desc.name).collect()
    }

    #[test]
    fn test_len_counts_every_slot() {
        let catalog = Catalog::from_records(&RECORDS);

        assert_eq!(catalog.len(), 5);
        assert!(!catalog.is_empty());
        assert!(Catalog::from_records(&[]).is_empty());
    }

    #[test]
    fn test_invalid_slots_are_skipped() {
        let catalog = Catalog::from_records(&RECORDS);

        assert!(catalog.slot(1).is_none());
        assert!(catalog.slot(3).is_none());
        assert!(catalog.slot(5).is_none());

        assert_eq!(
            names(catalog.iter()),
            ["simple_assertion", "simple_assert_eq", "simple_assert_not_eq"]
        );
    }

    #[test]
    fn test_invalid_slots_never_match_filters() {
        let catalog = Catalog::from_records(&RECORDS);

        assert_eq!(names(catalog.matching(Filter::test("ghost"))), Vec::<&str>::new());
    }

    #[test]
    fn test_next_match_scans_forward() {
        let catalog = Catalog::from_records(&RECORDS);
        let filter = Filter::suite("base_tests");

        let (first, _) = catalog.next_match(0, &filter).unwrap();
        assert_eq!(first, 0);

        let (second, desc) = catalog.next_match(first + 1, &filter).unwrap();
        assert_eq!(second, 2);
        assert_eq!(desc.name, "simple_assert_eq");

        assert!(catalog.next_match(second + 1, &filter).is_none());
        assert!(catalog.next_match(100, &Filter::all()).is_none());
    }

    #[test]
    fn test_matching_filters_by_suite() {
        let catalog = Catalog::from_records(&RECORDS);

        assert_eq!(
            names(catalog.matching(Filter::suite("base_tests2"))),
            ["simple_assert_not_eq"]
        );
        assert_eq!(names(catalog.matching(Filter::suite("base"))), Vec::<&str>::new());
    }

    #[test]
    fn test_zeroed_slots_are_skipped() {
        let mut region = MaybeUninit::<[TestRecord; 3]>::zeroed();
        let base = region.as_mut_ptr().cast::<TestRecord>();

        unsafe { base.add(1).write(TestRecord::new(desc("raw", "middle"))) };

        let catalog = unsafe { Catalog::from_raw_parts(NonNull::new(base).unwrap(), 3) };

        assert_eq!(catalog.len(), 3);
        assert!(catalog.slot(0).is_none());
        assert!(catalog.slot(2).is_none());
        assert_eq!(names(catalog.iter()), ["middle"]);
    }

    #[test]
    fn test_from_bounds_derives_count() {
        let start = NonNull::from(&RECORDS).cast::<TestRecord>();
        let end = NonNull::new(start.as_ptr().wrapping_add(RECORDS.len())).unwrap();

        let catalog = unsafe { Catalog::from_bounds(start, end) };

        assert_eq!(catalog.len(), RECORDS.len());
        assert_eq!(catalog.bounds(), (start.as_ptr() as *const _, end.as_ptr() as *const _));
    }

    #[test]
    fn test_iteration_is_repeatable() {
        let catalog = Catalog::from_records(&RECORDS);

        assert_eq!(names(catalog.iter()), names(catalog.into_iter()));
    }

    #[test]
    fn test_linked_catalog_holds_only_the_anchor() {
        // this test binary registers nothing, the section only holds the unmarked anchor
        let catalog = Catalog::linked();

        assert!(catalog.len() >= 1);
        assert_eq!(catalog.iter().count(), 0);
    }
}
