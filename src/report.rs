//! Progress reporting for a single harvest run.
//!
//! The reporter is handed to the [`Harvester`](crate::executor::Harvester) and
//! lives exactly as long as that run.

use tracing::{debug, info};

use crate::executor::HarvestOutcome;
use crate::harvest::cursor::PaginationCursor;
use crate::harvest::resolver::Rejection;
use crate::model::CanonicalRepoUrl;

pub trait HarvestReporter: Send {
    fn page_fetched(&mut self, cursor: &PaginationCursor, results: usize);

    fn package_skipped(&mut self, package: &str, rejection: &Rejection);

    fn url_discovered(&mut self, package: &str, url: &CanonicalRepoUrl, total: usize);

    fn duplicate(&mut self, package: &str, url: &CanonicalRepoUrl);

    fn finished(&mut self, outcome: &HarvestOutcome);
}

/// Emits every event through `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl HarvestReporter for TracingReporter {
    fn page_fetched(&mut self, cursor: &PaginationCursor, results: usize) {
        info!(
            offset = cursor.offset(),
            size = cursor.page_size(),
            results,
            "Search page fetched"
        );
    }

    fn package_skipped(&mut self, package: &str, rejection: &Rejection) {
        debug!(package, reason = %rejection, "Package skipped");
    }

    fn url_discovered(&mut self, package: &str, url: &CanonicalRepoUrl, total: usize) {
        info!(package, url = %url, total, "Repository discovered");
    }

    fn duplicate(&mut self, package: &str, url: &CanonicalRepoUrl) {
        debug!(package, url = %url, "Repository already known");
    }

    fn finished(&mut self, outcome: &HarvestOutcome) {
        info!(
            found = outcome.urls.len(),
            reason = ?outcome.stop_reason,
            pages = outcome.stats.pages_fetched,
            detail_fetches = outcome.stats.detail_fetches,
            duplicates = outcome.stats.duplicates,
            "Harvest finished"
        );
    }
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NullReporter;

impl HarvestReporter for NullReporter {
    fn page_fetched(&mut self, _cursor: &PaginationCursor, _results: usize) {}
    fn package_skipped(&mut self, _package: &str, _rejection: &Rejection) {}
    fn url_discovered(&mut self, _package: &str, _url: &CanonicalRepoUrl, _total: usize) {}
    fn duplicate(&mut self, _package: &str, _url: &CanonicalRepoUrl) {}
    fn finished(&mut self, _outcome: &HarvestOutcome) {}
}
