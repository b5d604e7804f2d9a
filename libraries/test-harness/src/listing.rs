use test_catalog::{Catalog, Filter};

use crate::Reporter;

/// Print every selected test without running anything. Returns how many were listed.
pub fn list_tests(catalog: Catalog<'_>, filter: &Filter<'_>, reporter: &Reporter<'_>) -> usize {
    catalog
        .matching(*filter)
        .inspect(|desc| reporter.listed(desc))
        .count()
}
