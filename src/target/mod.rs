//! Target classification for Etalase
//!
//! Inspects a requested URL and determines the traversal mode (keyword
//! search vs. storefront listing) plus the identifier used for output
//! naming. Classification is a pure function: malformed URLs are
//! rejected upstream by the caller, never here.

use url::Url;

/// Identifier used when a URL carries no usable shop or path segment
const IDENTIFIER_PLACEHOLDER: &str = "marketplace";

/// Path segment that marks a keyword-search results page
const SEARCH_SEGMENT: &str = "search";

/// Query parameter carrying the search term
const KEYWORD_PARAM: &str = "keyword";

/// Query parameter scoping a search to one shop
const SHOP_PARAM: &str = "shop";

/// The two kinds of listing page the engine can traverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalMode {
    /// A shop's full product listing
    Storefront,
    /// A keyword search results page
    KeywordSearch,
}

impl TraversalMode {
    /// Returns true if sold-out browsing exists for this mode
    ///
    /// Sold-out sections only appear on storefront listings; for keyword
    /// searches the option is forced off regardless of the request.
    pub fn sold_out_eligible(&self) -> bool {
        matches!(self, Self::Storefront)
    }
}

/// The classification of one requested URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTarget {
    /// Traversal mode for this URL
    pub mode: TraversalMode,
    /// Identifier embedded in the output filename (shop name or placeholder)
    pub identifier: String,
    /// Search term, present only in keyword-search mode
    pub keyword: Option<String>,
}

/// Classifies a target URL into its traversal mode and output identifier
///
/// A URL whose path contains a search segment AND whose query carries a
/// keyword parameter is a keyword search; its identifier is the `shop`
/// parameter when present, else a fixed placeholder. Every other URL is
/// a storefront listing identified by its first non-empty path segment.
///
/// Pure function: identical input always yields identical output, and
/// there is no failure path.
///
/// # Arguments
///
/// * `url` - The requested target URL, already parsed
///
/// # Examples
///
/// ```
/// use etalase::target::{classify_target, TraversalMode};
/// use url::Url;
///
/// let url = Url::parse("https://shopee.co.id/search?keyword=sepatu").unwrap();
/// let target = classify_target(&url);
/// assert_eq!(target.mode, TraversalMode::KeywordSearch);
/// assert_eq!(target.keyword.as_deref(), Some("sepatu"));
/// ```
pub fn classify_target(url: &Url) -> ClassifiedTarget {
    let has_search_segment = url
        .path_segments()
        .map(|mut segments| segments.any(|s| s == SEARCH_SEGMENT))
        .unwrap_or(false);

    let keyword = query_param(url, KEYWORD_PARAM);

    if has_search_segment && keyword.is_some() {
        let identifier =
            query_param(url, SHOP_PARAM).unwrap_or_else(|| IDENTIFIER_PLACEHOLDER.to_string());
        return ClassifiedTarget {
            mode: TraversalMode::KeywordSearch,
            identifier,
            keyword,
        };
    }

    let identifier = url
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| IDENTIFIER_PLACEHOLDER.to_string());

    ClassifiedTarget {
        mode: TraversalMode::Storefront,
        identifier,
        keyword: None,
    }
}

/// Returns the first value of a query parameter, if present and non-empty
fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Reduces a search keyword to a filesystem-safe filename fragment
///
/// Spaces become underscores; ASCII alphanumerics, underscores, and
/// hyphens are kept; everything else is removed.
pub fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => Some(c),
            _ => None,
        })
        .collect()
}
