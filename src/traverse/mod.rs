//! Listing-traversal engine
//!
//! This module contains the core traversal logic, including:
//! - The per-run orchestrator state machine
//! - Incremental content loading within one page (scroll, sold-out expansion)
//! - Explicit next-page advancement with end-of-results detection
//! - The asynchronous `start_traversal` entry point

mod orchestrator;
mod pager;
mod scroll;
pub mod selectors;

use crate::browser::SessionFactory;
use crate::config::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// One traversal request, created per invocation and discarded after use
#[derive(Debug, Clone)]
pub struct TraversalRequest {
    /// The storefront or search-result URL to traverse
    pub target_url: String,

    /// Whether to expand the sold-out listing section while loading.
    /// Forced off for keyword searches, where sold-out browsing does
    /// not exist.
    pub include_sold_out: bool,
}

/// Observational summary of a finished traversal run
///
/// Failures are not surfaced as errors: a failed run is visible through
/// `completed == false` and the absence of an output file.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Number of listing pages visited
    pub pages_visited: u32,

    /// Number of unique records extracted
    pub record_count: usize,

    /// Path of the written dataset, if any
    pub output: Option<PathBuf>,

    /// True if the run reached its natural end rather than failing
    pub completed: bool,
}

impl RunOutcome {
    /// Outcome of a run that failed before visiting any page
    pub(crate) fn aborted() -> Self {
        Self {
            pages_visited: 0,
            record_count: 0,
            output: None,
            completed: false,
        }
    }
}

/// Handle to a traversal run executing on its own task
pub struct TraversalHandle {
    join: JoinHandle<RunOutcome>,
}

impl TraversalHandle {
    /// Waits for the run to finish and returns its outcome
    pub async fn wait(self) -> RunOutcome {
        self.join.await.unwrap_or_else(|e| {
            tracing::error!("Traversal task panicked: {}", e);
            RunOutcome::aborted()
        })
    }
}

/// Starts a traversal run and returns immediately
///
/// The run proceeds independently on a spawned task, owning its own
/// browser session, dedup set, and accumulated result; concurrent runs
/// are fully isolated. Completion and failure are surfaced out of band
/// (log output and the presence of a dataset file), or by awaiting the
/// returned handle.
pub fn start_traversal(
    config: Arc<Config>,
    factory: Arc<dyn SessionFactory>,
    request: TraversalRequest,
) -> TraversalHandle {
    let join = tokio::spawn(orchestrator::run_traversal(config, factory, request));
    TraversalHandle { join }
}

/// Sleeps a uniformly random interval within `[min_ms, max_ms]`
///
/// Used between every browser interaction to emulate human pacing and
/// avoid load spikes on the target.
pub(crate) async fn paced_sleep(min_ms: u64, max_ms: u64) {
    let ms = fastrand::u64(min_ms..=max_ms);
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
