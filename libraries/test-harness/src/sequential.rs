use test_catalog::Catalog;

use crate::{execute, Reporter, RunConfig, RunSummary};

/// Run every selected test once, in catalog order, on the calling thread.
pub fn run_sequential(catalog: Catalog<'_>, config: &RunConfig, reporter: &Reporter<'_>) -> RunSummary {
    let filter = config.filter();
    let mut summary = RunSummary::default();

    for index in 0..catalog.len() {
        let Some(desc) = catalog.slot(index).filter(|desc| filter.matches(desc)) else {
            continue;
        };

        let result = execute(desc);

        reporter.outcome(desc, &result, None);
        summary.record(&result);
    }

    reporter.summary(summary.failures);

    summary
}
