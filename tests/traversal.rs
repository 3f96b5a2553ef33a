//! Integration tests for the traversal engine
//!
//! These tests drive the full orchestrator state machine end-to-end
//! against a scripted browser session serving canned DOM snapshots,
//! so no WebDriver server is required.

use async_trait::async_trait;
use etalase::browser::{BrowserError, BrowserResult, BrowserSession, SessionFactory};
use etalase::config::Config;
use etalase::traverse::{selectors, start_traversal, RunOutcome, TraversalRequest};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One scripted listing page
#[derive(Clone, Default)]
struct ScriptedPage {
    /// Card outer-HTML snapshots returned for the card selector
    cards: Vec<String>,
    /// Whether the next-page control exists on this page
    has_next: bool,
}

/// Mutable script state shared between the test and the session
struct ScriptState {
    pages: Vec<ScriptedPage>,
    current: usize,
    /// Whether the listing container ever appears
    container_present: bool,
    /// 1-based page whose card query fails, if any
    fail_cards_on_page: Option<usize>,
    /// Document heights returned per height query; last value repeats
    heights: VecDeque<i64>,
    /// Sold-out item counts returned per count query; last value repeats
    sold_out_counts: VecDeque<usize>,
    /// Whether the sold-out "show more" control exists
    sold_out_control_present: bool,
}

impl Default for ScriptState {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            current: 0,
            container_present: true,
            fail_cards_on_page: None,
            heights: VecDeque::new(),
            sold_out_counts: VecDeque::new(),
            sold_out_control_present: false,
        }
    }
}

/// Counters observable after the session has been consumed by the run
#[derive(Default)]
struct SessionCounters {
    quits: AtomicUsize,
    scrolls: AtomicUsize,
    sold_out_clicks: AtomicUsize,
}

struct ScriptedSession {
    state: Mutex<ScriptState>,
    counters: Arc<SessionCounters>,
}

impl ScriptedSession {
    fn new(state: ScriptState) -> (Self, Arc<SessionCounters>) {
        let counters = Arc::new(SessionCounters::default());
        let session = Self {
            state: Mutex::new(state),
            counters: Arc::clone(&counters),
        };
        (session, counters)
    }
}

fn drain_or_last<T: Copy>(queue: &mut VecDeque<T>, fallback: T) -> T {
    match queue.len() {
        0 => fallback,
        1 => *queue.front().unwrap(),
        _ => queue.pop_front().unwrap(),
    }
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&self, _url: &str) -> BrowserResult<()> {
        Ok(())
    }

    async fn wait_for_element(&self, selector: &str, _timeout: Duration) -> BrowserResult<bool> {
        let state = self.state.lock().unwrap();
        match selector {
            selectors::LISTING_CONTAINER => Ok(state.container_present),
            selectors::NEXT_PAGE_BUTTON => Ok(state
                .pages
                .get(state.current)
                .map(|p| p.has_next)
                .unwrap_or(false)),
            selectors::SOLD_OUT_SHOW_MORE => Ok(state.sold_out_control_present),
            _ => Ok(false),
        }
    }

    async fn execute_script(&self, js: &str) -> BrowserResult<serde_json::Value> {
        let mut state = self.state.lock().unwrap();
        if js.contains("scrollTo") {
            self.counters.scrolls.fetch_add(1, Ordering::SeqCst);
            return Ok(serde_json::Value::Null);
        }
        if js.contains("scrollHeight") {
            let height = drain_or_last(&mut state.heights, 1_000);
            return Ok(serde_json::json!(height));
        }
        Ok(serde_json::Value::Null)
    }

    async fn query_all(&self, selector: &str) -> BrowserResult<Vec<String>> {
        let mut state = self.state.lock().unwrap();
        match selector {
            selectors::PRODUCT_CARD => {
                let page_number = state.current + 1;
                if state.fail_cards_on_page == Some(page_number) {
                    return Err(BrowserError::Script(format!(
                        "stale element on page {}",
                        page_number
                    )));
                }
                Ok(state
                    .pages
                    .get(state.current)
                    .map(|p| p.cards.clone())
                    .unwrap_or_default())
            }
            selectors::SOLD_OUT_ITEM => {
                let count = drain_or_last(&mut state.sold_out_counts, 0);
                Ok(vec!["<div data-sqe=\"item\"></div>".to_string(); count])
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn click(&self, selector: &str) -> BrowserResult<bool> {
        let mut state = self.state.lock().unwrap();
        match selector {
            selectors::NEXT_PAGE_BUTTON => {
                let has_next = state
                    .pages
                    .get(state.current)
                    .map(|p| p.has_next)
                    .unwrap_or(false);
                if has_next {
                    state.current += 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            selectors::SOLD_OUT_SHOW_MORE => {
                self.counters.sold_out_clicks.fetch_add(1, Ordering::SeqCst);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn quit(self: Box<Self>) -> BrowserResult<()> {
        self.counters.quits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out one pre-built session; can be scripted to fail instead
struct ScriptedFactory {
    session: Mutex<Option<ScriptedSession>>,
    fail_open: bool,
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    async fn open(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        if self.fail_open {
            return Err(BrowserError::SessionStart(
                "connection refused".to_string(),
            ));
        }
        let session = self
            .session
            .lock()
            .unwrap()
            .take()
            .expect("factory opened more than once");
        Ok(Box::new(session))
    }
}

/// Builds a card snapshot in the target site's markup
fn card(name: &str, price: &str, sold: &str, href: &str) -> String {
    format!(
        r#"<div data-sqe="item"><a href="{href}"><div data-sqe="name">{name}</div><div data-sqe="price">{price}</div><div data-sqe="sold">{sold}</div></a></div>"#
    )
}

/// Test config: near-zero pacing, output into the given directory
fn test_config(output_dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.traversal.scroll_pause_min_ms = 0;
    config.traversal.scroll_pause_max_ms = 1;
    config.traversal.page_delay_min_ms = 0;
    config.traversal.page_delay_max_ms = 1;
    config.traversal.control_wait_timeout = 1;
    config.traversal.page_load_timeout = 1;
    config.output.directory = output_dir.to_string_lossy().into_owned();
    config
}

/// Runs a traversal against a scripted session and waits for the outcome
async fn run_scripted(
    config: Config,
    state: ScriptState,
    request: TraversalRequest,
) -> (RunOutcome, Arc<SessionCounters>) {
    let (session, counters) = ScriptedSession::new(state);
    let factory = Arc::new(ScriptedFactory {
        session: Mutex::new(Some(session)),
        fail_open: false,
    });
    let outcome = start_traversal(Arc::new(config), factory, request)
        .wait()
        .await;
    (outcome, counters)
}

#[tokio::test]
async fn test_two_page_storefront_with_cross_page_duplicate() {
    let dir = tempfile::tempdir().unwrap();

    // 20 unique cards per page; page 2 repeats one name from page 1.
    let page1_cards: Vec<String> = (0..20)
        .map(|i| card(&format!("Produk A{i}"), "Rp10.000", "500 terjual/bulan", "/p/a"))
        .collect();
    let mut page2_cards: Vec<String> = (0..19)
        .map(|i| card(&format!("Produk B{i}"), "Rp20.000", "", "/p/b"))
        .collect();
    page2_cards.push(card("Produk A0", "Rp10.000", "", "/p/a0-again"));

    let state = ScriptState {
        pages: vec![
            ScriptedPage {
                cards: page1_cards,
                has_next: true,
            },
            ScriptedPage {
                cards: page2_cards,
                has_next: false,
            },
        ],
        ..ScriptState::default()
    };

    let (outcome, counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/tokosepatu".to_string(),
            include_sold_out: false,
        },
    )
    .await;

    assert!(outcome.completed);
    assert_eq!(outcome.record_count, 39);
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(counters.quits.load(Ordering::SeqCst), 1);

    // Exactly one dataset file, named for the storefront.
    let path = outcome.output.expect("dataset should be written");
    let filename = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(filename.ends_with("_tokosepatu_products.csv"), "{filename}");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);

    // Accumulation is insertion-ordered: all of page 1 before page 2.
    let content = std::fs::read_to_string(&path).unwrap();
    let names: Vec<String> = content
        .lines()
        .skip(1)
        .map(|line| line.split(',').next().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 39);
    assert_eq!(names[0], "Produk A0");
    assert_eq!(names[19], "Produk A19");
    assert_eq!(names[20], "Produk B0");
}

#[tokio::test]
async fn test_keyword_search_forces_sold_out_off() {
    let dir = tempfile::tempdir().unwrap();

    let state = ScriptState {
        pages: vec![ScriptedPage {
            cards: vec![
                card("Sepatu Anak Biru", "Rp75.000", "", "/p/1"),
                card("Sepatu Anak Merah", "Rp80.000", "", "/p/2"),
            ],
            has_next: false,
        }],
        // The control is available: if the engine honored the flag it
        // would click it at least once.
        sold_out_control_present: true,
        sold_out_counts: VecDeque::from([1, 2]),
        ..ScriptState::default()
    };

    let (outcome, counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/search?keyword=sepatu anak".to_string(),
            include_sold_out: true,
        },
    )
    .await;

    assert!(outcome.completed);
    assert_eq!(outcome.record_count, 2);
    assert_eq!(counters.sold_out_clicks.load(Ordering::SeqCst), 0);

    // The filename carries the sanitized keyword, not a shop identifier.
    let path = outcome.output.expect("dataset should be written");
    let filename = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(
        filename.ends_with("_marketplace_sepatu_anak_search.csv"),
        "{filename}"
    );
}

#[tokio::test]
async fn test_storefront_sold_out_expansion_clicks_until_stable() {
    let dir = tempfile::tempdir().unwrap();

    let state = ScriptState {
        pages: vec![ScriptedPage {
            cards: vec![card("Produk", "Rp10.000", "", "/p/1")],
            has_next: false,
        }],
        sold_out_control_present: true,
        // 3 items before the first click, 6 after it, then stable.
        sold_out_counts: VecDeque::from([3, 6, 6, 6]),
        ..ScriptState::default()
    };

    let (outcome, counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/tokosepatu".to_string(),
            include_sold_out: true,
        },
    )
    .await;

    assert!(outcome.completed);
    // One click grows the section, the second sees a stable count.
    assert_eq!(counters.sold_out_clicks.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_terminates_on_empty_pages_but_never_on_page_one() {
    let dir = tempfile::tempdir().unwrap();

    // Page 1 is empty but must not terminate the run; page 2 is empty
    // and must. has_next stays true everywhere: termination comes from
    // the empty-page rule, not from pager exhaustion.
    let state = ScriptState {
        pages: vec![
            ScriptedPage {
                cards: Vec::new(),
                has_next: true,
            },
            ScriptedPage {
                cards: Vec::new(),
                has_next: true,
            },
        ],
        ..ScriptState::default()
    };

    let (outcome, counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/tokokosong".to_string(),
            include_sold_out: false,
        },
    )
    .await;

    assert!(outcome.completed);
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.record_count, 0);
    assert!(outcome.output.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(counters.quits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_terminates_when_page_repeats_only_duplicates() {
    let dir = tempfile::tempdir().unwrap();

    // Page 2 renders cards, but every name was already seen on page 1:
    // zero new records also ends the traversal.
    let cards: Vec<String> = (0..5)
        .map(|i| card(&format!("Produk {i}"), "Rp10.000", "", "/p"))
        .collect();
    let state = ScriptState {
        pages: vec![
            ScriptedPage {
                cards: cards.clone(),
                has_next: true,
            },
            ScriptedPage {
                cards,
                has_next: true,
            },
        ],
        ..ScriptState::default()
    };

    let (outcome, _counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/toko".to_string(),
            include_sold_out: false,
        },
    )
    .await;

    assert!(outcome.completed);
    assert_eq!(outcome.pages_visited, 2);
    assert_eq!(outcome.record_count, 5);
}

#[tokio::test]
async fn test_session_released_when_extraction_fails_mid_run() {
    let dir = tempfile::tempdir().unwrap();

    let state = ScriptState {
        pages: vec![
            ScriptedPage {
                cards: vec![card("Produk 1", "Rp10.000", "", "/p/1")],
                has_next: true,
            },
            ScriptedPage {
                cards: vec![card("Produk 2", "Rp20.000", "", "/p/2")],
                has_next: false,
            },
        ],
        fail_cards_on_page: Some(2),
        ..ScriptState::default()
    };

    let (outcome, counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/toko".to_string(),
            include_sold_out: false,
        },
    )
    .await;

    assert!(!outcome.completed);
    assert!(outcome.output.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    // Quit is still observed exactly once.
    assert_eq!(counters.quits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_session_start_failure_produces_no_output() {
    let dir = tempfile::tempdir().unwrap();

    let factory = Arc::new(ScriptedFactory {
        session: Mutex::new(None),
        fail_open: true,
    });
    let outcome = start_traversal(
        Arc::new(test_config(dir.path())),
        factory,
        TraversalRequest {
            target_url: "https://shopee.co.id/toko".to_string(),
            include_sold_out: false,
        },
    )
    .wait()
    .await;

    assert!(!outcome.completed);
    assert!(outcome.output.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_listing_container_timeout_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let state = ScriptState {
        pages: vec![ScriptedPage {
            cards: vec![card("Produk", "Rp10.000", "", "/p/1")],
            has_next: false,
        }],
        container_present: false,
        ..ScriptState::default()
    };

    let (outcome, counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/toko".to_string(),
            include_sold_out: false,
        },
    )
    .await;

    assert!(!outcome.completed);
    assert!(outcome.output.is_none());
    assert_eq!(counters.quits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_scroll_passes_stop_when_height_stabilizes() {
    let dir = tempfile::tempdir().unwrap();

    let state = ScriptState {
        pages: vec![ScriptedPage {
            cards: vec![card("Produk", "Rp10.000", "", "/p/1")],
            has_next: false,
        }],
        // Initial height 1000, grows once to 2000, then stable.
        heights: VecDeque::from([1_000, 2_000, 2_000]),
        ..ScriptState::default()
    };

    let (outcome, counters) = run_scripted(
        test_config(dir.path()),
        state,
        TraversalRequest {
            target_url: "https://shopee.co.id/toko".to_string(),
            include_sold_out: false,
        },
    )
    .await;

    assert!(outcome.completed);
    // Two scroll commands: the pass that grew the page and the pass
    // that saw it stop growing. The third configured pass never runs.
    assert_eq!(counters.scrolls.load(Ordering::SeqCst), 2);
}
