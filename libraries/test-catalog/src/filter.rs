use crate::TestDesc;

/// Suite/test name selection applied while scanning the catalog.
///
/// `None` selects everything for that key. Both keys must match for a
/// descriptor to be selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter<'f> {
    pub suite: Option<&'f str>,
    pub test: Option<&'f str>,
}

impl<'f> Filter<'f> {
    pub const fn all() -> Self {
        Self {
            suite: None,
            test: None,
        }
    }

    pub const fn new(suite: Option<&'f str>, test: Option<&'f str>) -> Self {
        Self { suite, test }
    }

    pub const fn suite(suite: &'f str) -> Self {
        Self::new(Some(suite), None)
    }

    pub const fn test(test: &'f str) -> Self {
        Self::new(None, Some(test))
    }

    pub fn matches(&self, desc: &TestDesc) -> bool {
        key_matches(self.suite, desc.suite) && key_matches(self.test, desc.name)
    }
}

fn key_matches(wanted: Option<&str>, actual: &str) -> bool {
    wanted.map_or(true, |wanted| names_equal(wanted, actual))
}

/// Exact, case-sensitive name comparison.
///
/// Lengths are compared first, then bytes until the first mismatch.
pub fn names_equal(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());

    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).all(|(x, y)| x == y)
}
