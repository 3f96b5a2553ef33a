//! Scroll loader
//!
//! Forces the browser to render all content reachable within the current
//! page of results before extraction: repeated scroll-to-bottom passes
//! until the document height stabilizes, plus the optional sold-out
//! section expansion on shop pages.

use crate::browser::{BrowserResult, BrowserSession};
use crate::config::TraversalConfig;
use crate::traverse::{paced_sleep, selectors};
use std::time::Duration;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";

const DOCUMENT_HEIGHT: &str =
    "return Math.max(document.body.scrollHeight, document.documentElement.scrollHeight);";

/// Fully renders the current page of results
///
/// Scrolls to the bottom up to `max_scroll_passes` times, pausing a
/// randomized interval between passes, and stops early as soon as the
/// document height stops increasing. When `include_sold_out` is set the
/// sold-out section is expanded afterwards.
///
/// Errors from the scroll loop itself propagate (the session is in an
/// unknown state); the sold-out sub-loop swallows its own errors and
/// treats them as end-of-list.
pub async fn load_full_page(
    session: &dyn BrowserSession,
    cfg: &TraversalConfig,
    include_sold_out: bool,
) -> BrowserResult<()> {
    let mut height = document_height(session).await?;

    for pass in 0..cfg.max_scroll_passes {
        session.execute_script(SCROLL_TO_BOTTOM).await?;
        paced_sleep(cfg.scroll_pause_min_ms, cfg.scroll_pause_max_ms).await;

        let new_height = document_height(session).await?;
        tracing::debug!(
            "Scroll pass {}/{}: height {} -> {}",
            pass + 1,
            cfg.max_scroll_passes,
            height,
            new_height
        );

        if new_height <= height {
            break;
        }
        height = new_height;
    }

    if include_sold_out {
        expand_sold_out(session, cfg).await;
    }

    Ok(())
}

/// Reads the current document height
async fn document_height(session: &dyn BrowserSession) -> BrowserResult<i64> {
    let value = session.execute_script(DOCUMENT_HEIGHT).await?;
    Ok(value.as_i64().unwrap_or(0))
}

/// Expands the sold-out section by clicking its "show more" control
/// until the control disappears or the item count stops growing
///
/// Absence of the control is natural completion, not a failure. Every
/// other error in this sub-loop is logged and ends the expansion; the
/// traversal itself continues.
async fn expand_sold_out(session: &dyn BrowserSession, cfg: &TraversalConfig) {
    let wait = Duration::from_secs(cfg.control_wait_timeout);

    loop {
        match session
            .wait_for_element(selectors::SOLD_OUT_SHOW_MORE, wait)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("Sold-out expansion control gone, section fully expanded");
                break;
            }
            Err(e) => {
                tracing::warn!("Error waiting for sold-out control: {}", e);
                break;
            }
        }

        let before = match sold_out_count(session).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Error counting sold-out items: {}", e);
                break;
            }
        };

        match session.click(selectors::SOLD_OUT_SHOW_MORE).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!("Sold-out expansion control vanished before click");
                break;
            }
            Err(e) => {
                tracing::warn!("Error clicking sold-out control: {}", e);
                break;
            }
        }

        paced_sleep(cfg.scroll_pause_min_ms, cfg.scroll_pause_max_ms).await;

        match sold_out_count(session).await {
            Ok(after) if after == before => {
                tracing::debug!("Sold-out item count stable at {}", after);
                break;
            }
            Ok(after) => {
                tracing::debug!("Sold-out items: {} -> {}", before, after);
            }
            Err(e) => {
                tracing::warn!("Error counting sold-out items: {}", e);
                break;
            }
        }
    }
}

async fn sold_out_count(session: &dyn BrowserSession) -> BrowserResult<usize> {
    Ok(session.query_all(selectors::SOLD_OUT_ITEM).await?.len())
}
