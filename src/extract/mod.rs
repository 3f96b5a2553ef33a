//! Record extraction for Etalase
//!
//! This module converts one rendered product card into a structured
//! [`ProductRecord`], deduplicating by displayed name within a run:
//! - Card HTML parsing and field derivation
//! - Price and monthly-sold text normalization
//! - Sentinel fallbacks for missing name/link

mod card;
mod text;

pub use card::{extract_card, LINK_NOT_FOUND, NAME_NOT_FOUND};
pub use text::{parse_monthly_sold, parse_price};

use serde::Serialize;

/// One extracted product listing
///
/// The serialized field names double as the dataset's CSV header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductRecord {
    /// Displayed product name (dedup key within one run)
    #[serde(rename = "Nama Produk")]
    pub name: String,

    /// Price as a minor-unit-free integer (IDR has no minor unit)
    #[serde(rename = "Harga")]
    pub price: u64,

    /// Units sold per month as displayed on the card
    #[serde(rename = "Terjual per Bulan")]
    pub monthly_sold: u64,

    /// Absolute product URL
    #[serde(rename = "Link")]
    pub link: String,
}
