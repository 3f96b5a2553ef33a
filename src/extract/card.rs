//! Per-card record extraction
//!
//! Converts the rendered outer HTML of one product card into a
//! [`ProductRecord`], or signals "skip" for duplicates. Cards on the
//! target site carry stable `data-sqe` attributes on their name, price,
//! and sold-count nodes.

use crate::extract::text::{parse_monthly_sold, parse_price};
use crate::extract::ProductRecord;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Sentinel substituted when a card has no locatable name.
/// Participates in dedup like any other name.
pub const NAME_NOT_FOUND: &str = "(name not found)";

/// Sentinel substituted when a card has no anchor
pub const LINK_NOT_FOUND: &str = "(link not found)";

const NAME_SELECTOR: &str = "[data-sqe='name']";
const PRICE_SELECTOR: &str = "[data-sqe='price']";
const SOLD_SELECTOR: &str = "[data-sqe='sold']";
const ANCHOR_SELECTOR: &str = "a[href]";

/// Extracts a product record from one rendered card
///
/// Returns `None` when the displayed name duplicates one already seen in
/// this run. On a non-duplicate the name is inserted into `seen` before
/// the record is returned, so the set and the emitted sequence stay
/// consistent.
///
/// Field failures are recoverable per record: missing name/link become
/// sentinels, unparsable price/sold counts become 0.
///
/// # Arguments
///
/// * `card_html` - Rendered outer HTML of the card element
/// * `base_url` - Site base used to absolutize relative product links
/// * `seen` - Run-scoped set of names already extracted
pub fn extract_card(
    card_html: &str,
    base_url: &Url,
    seen: &mut HashSet<String>,
) -> Option<ProductRecord> {
    let fragment = Html::parse_fragment(card_html);

    let name = select_text(&fragment, NAME_SELECTOR)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NAME_NOT_FOUND.to_string());

    if seen.contains(&name) {
        tracing::trace!("Skipping duplicate card: {}", name);
        return None;
    }
    seen.insert(name.clone());

    let link = select_href(&fragment, base_url).unwrap_or_else(|| LINK_NOT_FOUND.to_string());

    let price = select_text(&fragment, PRICE_SELECTOR)
        .map(|t| parse_price(&t))
        .unwrap_or(0);

    let monthly_sold = select_text(&fragment, SOLD_SELECTOR)
        .map(|t| parse_monthly_sold(&t))
        .unwrap_or(0);

    Some(ProductRecord {
        name,
        price,
        monthly_sold,
        link,
    })
}

/// Returns the trimmed text content of the first match for `selector`
fn select_text(fragment: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    fragment
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
}

/// Returns the card's first anchor href as an absolute URL
fn select_href(fragment: &Html, base_url: &Url) -> Option<String> {
    let selector = Selector::parse(ANCHOR_SELECTOR).ok()?;
    let href = fragment
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))?;

    // join() resolves relative hrefs against the site base and passes
    // absolute hrefs through unchanged
    base_url.join(href.trim()).ok().map(|u| u.to_string())
}
