//! Pager
//!
//! Advances from one listing page to the next through the explicit
//! next-page control. There is no external signal of how many pages
//! exist: a control that never becomes available IS the end-of-results
//! signal, never a failure.

use crate::browser::BrowserSession;
use crate::config::TraversalConfig;
use crate::traverse::{paced_sleep, selectors};
use std::time::Duration;

/// Attempts to advance to the next results page
///
/// Waits up to the control-wait bound for the next-page control, clicks
/// it at script level (the control may be partially obscured), then
/// sleeps a randomized delay before handing control back.
///
/// Returns `true` when the next page was requested, `false` on natural
/// end-of-results (control absent, unclickable, or any error during the
/// wait; all are logged, none propagated).
pub async fn advance(session: &dyn BrowserSession, cfg: &TraversalConfig) -> bool {
    let wait = Duration::from_secs(cfg.control_wait_timeout);

    match session
        .wait_for_element(selectors::NEXT_PAGE_BUTTON, wait)
        .await
    {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("Next-page control not found, end of results");
            return false;
        }
        Err(e) => {
            tracing::warn!("Error waiting for next-page control: {}", e);
            return false;
        }
    }

    match session.click(selectors::NEXT_PAGE_BUTTON).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!("Next-page control vanished before click, end of results");
            return false;
        }
        Err(e) => {
            tracing::warn!("Error clicking next-page control: {}", e);
            return false;
        }
    }

    paced_sleep(cfg.page_delay_min_ms, cfg.page_delay_max_ms).await;
    true
}
