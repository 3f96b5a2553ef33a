//! Page-level CSS selectors for the target marketplace
//!
//! Card-internal selectors live with the record extractor; these cover
//! the listing chrome the traversal engine itself interacts with.

/// Recognized listing containers: search results or a shop's catalog view
pub const LISTING_CONTAINER: &str = ".shopee-search-item-result, .shop-search-result-view";

/// One product card in either listing view
pub const PRODUCT_CARD: &str = "[data-sqe='item']";

/// The explicit next-page control
pub const NEXT_PAGE_BUTTON: &str = "button.shopee-icon-button--right";

/// "Show more" control of the sold-out section on a shop page
pub const SOLD_OUT_SHOW_MORE: &str = ".shop-sold-out__show-more";

/// One item inside the sold-out section
pub const SOLD_OUT_ITEM: &str = ".shop-sold-out [data-sqe='item']";
