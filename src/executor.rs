use crate::config::{ConfigError, HarvestConfig};
use crate::harvest::accumulator::RepoUrlSet;
use crate::harvest::cursor::{PaginationCursor, MAX_PAGE_SIZE};
use crate::harvest::resolver::{DetailResolver, Rejection, Resolution};
use crate::harvest::sink::{RepoSink, SinkError};
use crate::report::HarvestReporter;
use crate::traits::{RegistryClient, RegistryError};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Error, Debug)]
pub enum HarvestError {
    /// The search endpoint failed; nothing from this run is persisted.
    #[error("Registry unavailable at offset {offset}: {source}")]
    RegistryUnavailable {
        offset: usize,
        #[source]
        source: RegistryError,
    },

    #[error("Failed to persist repository set: {0}")]
    PersistenceFailure(#[from] SinkError),
}

/// Why the pagination loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    /// The registry returned an empty page before the target was met.
    Exhausted,
    /// `max_detail_fetches` was spent before the target was met.
    DetailBudgetExhausted,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestStats {
    pub pages_fetched: usize,
    pub detail_fetches: usize,
    pub duplicates: usize,
    pub skipped_fetch_failed: usize,
    pub skipped_malformed: usize,
    pub skipped_no_repository: usize,
    pub skipped_ineligible: usize,
}

impl HarvestStats {
    fn record_skip(&mut self, rejection: &Rejection) {
        match rejection {
            Rejection::DetailFetchFailed(_) => self.skipped_fetch_failed += 1,
            Rejection::MalformedMetadata(_) => self.skipped_malformed += 1,
            Rejection::NoRepository => self.skipped_no_repository += 1,
            Rejection::IneligibleRepository { .. } => self.skipped_ineligible += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestOutcome {
    pub urls: RepoUrlSet,
    pub stop_reason: StopReason,
    /// Cursor position after the last processed page.
    pub cursor: PaginationCursor,
    pub stats: HarvestStats,
}

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub query: String,
    pub page_size: usize,
    pub target_count: usize,
    pub recognized_host: String,
    pub max_detail_fetches: Option<usize>,
}

impl HarvestSettings {
    /// Rejects settings the pagination loop cannot make progress with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::ValidationError(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.recognized_host.is_empty() {
            return Err(ConfigError::ValidationError(
                "recognized_host must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<&HarvestConfig> for HarvestSettings {
    fn from(config: &HarvestConfig) -> Self {
        Self {
            query: config.query.clone(),
            page_size: config.page_size,
            target_count: config.target_count,
            recognized_host: config.recognized_host.clone(),
            max_detail_fetches: config.max_detail_fetches,
        }
    }
}

/// Paginates the registry search, resolves each match and accumulates
/// distinct repository URLs until the target count is reached.
///
/// Requests are issued one at a time; nothing is in flight concurrently.
pub struct Harvester<C, R>
where
    C: RegistryClient,
    R: HarvestReporter,
{
    client: C,
    reporter: R,
    settings: HarvestSettings,
}

impl<C, R> Harvester<C, R>
where
    C: RegistryClient,
    R: HarvestReporter,
{
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if `settings` fail
    /// [`HarvestSettings::validate`].
    pub fn new(client: C, reporter: R, settings: HarvestSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self {
            client,
            reporter,
            settings,
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Runs one harvest without persisting anything.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::RegistryUnavailable`] if any search request
    /// fails. Per-package failures are counted and skipped.
    #[instrument(skip_all, fields(target = self.settings.target_count, page_size = self.settings.page_size))]
    pub async fn harvest(&mut self) -> Result<HarvestOutcome, HarvestError> {
        let target = self.settings.target_count;
        let mut urls = RepoUrlSet::new();
        let mut cursor = PaginationCursor::new(self.settings.page_size);
        let mut stats = HarvestStats::default();
        let mut stop_reason = StopReason::TargetReached;

        let resolver = DetailResolver::new(&self.client, &self.settings.recognized_host);

        while urls.len() < target {
            if self.budget_spent(&stats) {
                stop_reason = StopReason::DetailBudgetExhausted;
                break;
            }

            let batch = self
                .client
                .search(&self.settings.query, &cursor)
                .await
                .map_err(|source| HarvestError::RegistryUnavailable {
                    offset: cursor.offset(),
                    source,
                })?;
            stats.pages_fetched += 1;
            self.reporter.page_fetched(&cursor, batch.len());

            if batch.is_empty() {
                info!(offset = cursor.offset(), "Registry returned an empty page");
                stop_reason = StopReason::Exhausted;
                break;
            }

            let mut budget_spent = false;
            for result in &batch {
                if self.budget_spent(&stats) {
                    budget_spent = true;
                    break;
                }

                let name = result.name();
                stats.detail_fetches += 1;
                match resolver.resolve(name).await {
                    Resolution::Resolved(url) => {
                        if urls.insert(url.clone()) {
                            self.reporter.url_discovered(name, &url, urls.len());
                        } else {
                            stats.duplicates += 1;
                            self.reporter.duplicate(name, &url);
                        }
                    }
                    Resolution::Skipped(rejection) => {
                        stats.record_skip(&rejection);
                        self.reporter.package_skipped(name, &rejection);
                    }
                }

                if urls.len() >= target {
                    break;
                }
            }

            // Nominal page size, even if the page came back short or was cut off.
            cursor.advance();

            if budget_spent {
                stop_reason = StopReason::DetailBudgetExhausted;
                break;
            }
        }

        if stop_reason == StopReason::DetailBudgetExhausted {
            warn!(
                detail_fetches = stats.detail_fetches,
                found = urls.len(),
                "Detail fetch budget exhausted before target"
            );
        }

        let outcome = HarvestOutcome {
            urls,
            stop_reason,
            cursor,
            stats,
        };
        self.reporter.finished(&outcome);
        Ok(outcome)
    }

    fn budget_spent(&self, stats: &HarvestStats) -> bool {
        self.settings
            .max_detail_fetches
            .is_some_and(|cap| stats.detail_fetches >= cap)
    }

    /// Harvests, then writes the resulting set to `sink` once.
    ///
    /// A fatal registry error returns before the sink is touched.
    pub async fn run<S>(&mut self, sink: &S) -> Result<HarvestOutcome, HarvestError>
    where
        S: RepoSink + ?Sized,
    {
        let outcome = self.harvest().await?;
        sink.save(&outcome.urls).await?;
        Ok(outcome)
    }
}

// ============================================================================
// Tests
// ============================================================================
