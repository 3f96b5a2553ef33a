//! Traversal orchestrator
//!
//! Composes the scroll loader, record extractor, and pager into one full
//! per-target run, expressed as an explicit state machine:
//!
//! ```text
//! Starting -> LoadingPage -> Extracting <-> Paginating -> Done
//!                 |               |
//!                 +---------------+--> Failed
//! ```
//!
//! The orchestrator owns the run's browser session, dedup set, and
//! accumulated result. The one hard invariant: the session is released
//! on every exit path, including errors raised mid-extraction.

use crate::browser::{BrowserSession, SessionFactory};
use crate::config::Config;
use crate::extract::{extract_card, ProductRecord};
use crate::output::write_dataset;
use crate::target::{classify_target, ClassifiedTarget};
use crate::traverse::{pager, scroll, selectors, RunOutcome, TraversalRequest};
use crate::EtalaseError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Environment override for the output directory
const OUTPUT_DIR_ENV: &str = "ETALASE_OUTPUT_DIR";

/// The states of one traversal run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraversalState {
    /// Acquiring a browser session
    Starting,
    /// Navigating to the target and waiting for the listing container
    LoadingPage,
    /// Scroll-loading the current page and extracting its cards
    Extracting,
    /// Advancing to the next page
    Paginating,
    /// Natural end of traversal
    Done,
    /// Fatal error; no output is produced
    Failed,
}

impl TraversalState {
    fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Runs one complete traversal to its terminal state
///
/// This is the task body behind [`crate::traverse::start_traversal`].
/// Nothing is surfaced as an error: failures are logged and reflected in
/// the returned [`RunOutcome`].
pub(crate) async fn run_traversal(
    config: Arc<Config>,
    factory: Arc<dyn SessionFactory>,
    request: TraversalRequest,
) -> RunOutcome {
    let target_url = match Url::parse(&request.target_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Unusable target URL '{}': {}", request.target_url, e);
            return RunOutcome::aborted();
        }
    };

    let base_url = match Url::parse(&config.site.base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Unusable base URL '{}': {}", config.site.base_url, e);
            return RunOutcome::aborted();
        }
    };

    let target = classify_target(&target_url);

    // Sold-out browsing only exists on a storefront listing; the flag is
    // forced off for keyword searches regardless of what was requested.
    let include_sold_out = request.include_sold_out && target.mode.sold_out_eligible();
    if request.include_sold_out && !include_sold_out {
        tracing::info!("Sold-out option ignored for keyword search");
    }

    let orchestrator = Orchestrator {
        config,
        factory,
        target_url: request.target_url,
        target,
        base_url,
        include_sold_out,
        session: None,
        seen: HashSet::new(),
        records: Vec::new(),
        page: 1,
    };

    orchestrator.run().await
}

/// One traversal run's mutable state
struct Orchestrator {
    config: Arc<Config>,
    factory: Arc<dyn SessionFactory>,
    target_url: String,
    target: ClassifiedTarget,
    base_url: Url,
    include_sold_out: bool,
    session: Option<Box<dyn BrowserSession>>,
    /// Names extracted so far; the run-scoped dedup key
    seen: HashSet<String>,
    /// Accumulated records, insertion-ordered by first encounter
    records: Vec<ProductRecord>,
    /// Current page number, 1-based
    page: u32,
}

impl Orchestrator {
    /// Drives the state machine to a terminal state, writes the dataset
    /// on natural completion, and releases the session unconditionally
    async fn run(mut self) -> RunOutcome {
        let mut state = TraversalState::Starting;

        while !state.is_terminal() {
            state = match self.step(state).await {
                Ok(next) => next,
                Err(e) => {
                    tracing::error!(
                        "Traversal of {} failed in {:?} on page {}: {}",
                        self.target_url,
                        state,
                        self.page,
                        e
                    );
                    TraversalState::Failed
                }
            };
        }

        let output = if state == TraversalState::Done {
            self.write_output()
        } else {
            None
        };

        self.release_session().await;

        tracing::info!(
            "Traversal of {} finished: {} records over {} page(s), output {:?}",
            self.target_url,
            self.records.len(),
            self.page,
            output
        );

        RunOutcome {
            pages_visited: self.page,
            record_count: self.records.len(),
            output,
            completed: state == TraversalState::Done,
        }
    }

    /// The single transition function of the state machine
    async fn step(&mut self, state: TraversalState) -> Result<TraversalState, EtalaseError> {
        match state {
            TraversalState::Starting => {
                tracing::info!(
                    "Starting traversal of {} ({:?} mode, identifier '{}')",
                    self.target_url,
                    self.target.mode,
                    self.target.identifier
                );
                let session = self.factory.open().await?;
                self.session = Some(session);
                Ok(TraversalState::LoadingPage)
            }

            TraversalState::LoadingPage => {
                let session = self.require_session()?;
                session.navigate(&self.target_url).await?;

                let timeout_secs = self.config.traversal.page_load_timeout;
                let found = session
                    .wait_for_element(
                        selectors::LISTING_CONTAINER,
                        Duration::from_secs(timeout_secs),
                    )
                    .await?;
                if !found {
                    return Err(EtalaseError::ListingTimeout {
                        url: self.target_url.clone(),
                        timeout_secs,
                    });
                }
                Ok(TraversalState::Extracting)
            }

            TraversalState::Extracting => {
                let session = self
                    .session
                    .as_deref()
                    .ok_or_else(session_missing)?;

                scroll::load_full_page(session, &self.config.traversal, self.include_sold_out)
                    .await?;

                let cards = session.query_all(selectors::PRODUCT_CARD).await?;
                let mut new_records = 0usize;
                for card_html in &cards {
                    if let Some(record) = extract_card(card_html, &self.base_url, &mut self.seen) {
                        self.records.push(record);
                        new_records += 1;
                    }
                }

                tracing::info!(
                    "Page {}: {} cards, {} new records ({} total)",
                    self.page,
                    cards.len(),
                    new_records,
                    self.records.len()
                );

                // A later page yielding nothing new means the listing is
                // exhausted. Page 1 is exempt: an empty first page gets
                // no special treatment and proceeds to pagination.
                if self.page > 1 && (cards.is_empty() || new_records == 0) {
                    tracing::info!("No new results on page {}, traversal complete", self.page);
                    Ok(TraversalState::Done)
                } else {
                    Ok(TraversalState::Paginating)
                }
            }

            TraversalState::Paginating => {
                let session = self.require_session()?;
                if pager::advance(session, &self.config.traversal).await {
                    self.page += 1;
                    Ok(TraversalState::Extracting)
                } else {
                    Ok(TraversalState::Done)
                }
            }

            // Terminal states never re-enter the transition function
            TraversalState::Done | TraversalState::Failed => Ok(state),
        }
    }

    fn require_session(&self) -> Result<&dyn BrowserSession, EtalaseError> {
        self.session.as_deref().ok_or_else(session_missing)
    }

    /// Writes the dataset if the run accumulated anything
    fn write_output(&self) -> Option<PathBuf> {
        if self.records.is_empty() {
            tracing::info!("Traversal yielded no records, writing no output");
            return None;
        }

        let dir = std::env::var(OUTPUT_DIR_ENV)
            .unwrap_or_else(|_| self.config.output.directory.clone());

        match write_dataset(Path::new(&dir), &self.target, &self.records) {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("Failed to write dataset: {}", e);
                None
            }
        }
    }

    /// Releases the browser session; called on every exit path
    async fn release_session(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.quit().await {
                tracing::warn!("Failed to release browser session: {}", e);
            }
        }
    }
}

fn session_missing() -> EtalaseError {
    EtalaseError::Browser(crate::browser::BrowserError::SessionStart(
        "no active browser session".to_string(),
    ))
}
