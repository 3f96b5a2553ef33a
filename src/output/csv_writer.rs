//! CSV dataset writer
//!
//! Serializes the accumulated records of one traversal run to a
//! timestamped, mode-aware CSV file. Output is all-or-nothing per run:
//! nothing is written mid-run, and a run yielding zero records writes no
//! file at all.

use crate::extract::ProductRecord;
use crate::output::OutputResult;
use crate::target::{sanitize_keyword, ClassifiedTarget, TraversalMode};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// UTF-8 byte-order mark, expected by spreadsheet tools for non-ASCII CSV
const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Sortable timestamp format embedded in every filename
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Writes the dataset of one completed run
///
/// Ensures `dir` exists, then writes
/// `{timestamp}_{identifier}_products.csv` (storefront) or
/// `{timestamp}_{identifier}_{keyword}_search.csv` (keyword search) with
/// a BOM, a fixed header row, and one row per record in insertion order.
///
/// # Arguments
///
/// * `dir` - Destination directory (created if absent)
/// * `target` - Classification of the traversed URL, naming the file
/// * `records` - The accumulated traversal result
///
/// # Returns
///
/// * `Ok(Some(path))` - File written
/// * `Ok(None)` - Zero records; no file written
/// * `Err(OutputError)` - Directory or file could not be written
pub fn write_dataset(
    dir: &Path,
    target: &ClassifiedTarget,
    records: &[ProductRecord],
) -> OutputResult<Option<PathBuf>> {
    if records.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(dir)?;

    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let path = dir.join(build_filename(&timestamp, target));

    let mut file = File::create(&path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::info!(
        "Wrote {} records to {}",
        records.len(),
        path.display()
    );

    Ok(Some(path))
}

/// Builds the output filename for a run
///
/// The timestamp prefix keeps directory listings in run order; keyword
/// searches carry the sanitized search term so datasets remain
/// distinguishable at a glance.
pub fn build_filename(timestamp: &str, target: &ClassifiedTarget) -> String {
    match target.mode {
        TraversalMode::Storefront => {
            format!("{}_{}_products.csv", timestamp, target.identifier)
        }
        TraversalMode::KeywordSearch => {
            let keyword = target.keyword.as_deref().unwrap_or_default();
            format!(
                "{}_{}_{}_search.csv",
                timestamp,
                target.identifier,
                sanitize_keyword(keyword)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str) -> ProductRecord {
        ProductRecord {
            name: name.to_string(),
            price: 10_000,
            monthly_sold: 50,
            link: format!("https://shopee.co.id/{}", name),
        }
    }

    fn storefront_target() -> ClassifiedTarget {
        ClassifiedTarget {
            mode: TraversalMode::Storefront,
            identifier: "tokosepatu".to_string(),
            keyword: None,
        }
    }

    fn search_target() -> ClassifiedTarget {
        ClassifiedTarget {
            mode: TraversalMode::KeywordSearch,
            identifier: "marketplace".to_string(),
            keyword: Some("sepatu anak".to_string()),
        }
    }

    #[test]
    fn test_storefront_filename() {
        let name = build_filename("20240101_120000", &storefront_target());
        assert_eq!(name, "20240101_120000_tokosepatu_products.csv");
    }

    #[test]
    fn test_search_filename_contains_sanitized_keyword() {
        let name = build_filename("20240101_120000", &search_target());
        assert_eq!(name, "20240101_120000_marketplace_sepatu_anak_search.csv");
    }

    #[test]
    fn test_zero_records_writes_no_file() {
        let dir = tempdir().unwrap();
        let result = write_dataset(dir.path(), &storefront_target(), &[]).unwrap();

        assert!(result.is_none());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_writes_bom_and_header() {
        let dir = tempdir().unwrap();
        let records = vec![record("sepatu"), record("tas")];

        let path = write_dataset(dir.path(), &storefront_target(), &records)
            .unwrap()
            .unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let content = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Nama Produk,Harga,Terjual per Bulan,Link"
        );
        assert_eq!(lines.count(), 2);
    }

    #[test]
    fn test_rows_preserve_insertion_order() {
        let dir = tempdir().unwrap();
        let records = vec![record("zzz"), record("aaa"), record("mmm")];

        let path = write_dataset(dir.path(), &storefront_target(), &records)
            .unwrap()
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let names: Vec<&str> = content
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(names, ["zzz", "aaa", "mmm"]);
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        let path = write_dataset(&nested, &storefront_target(), &[record("x")])
            .unwrap()
            .unwrap();
        assert!(path.exists());
    }
}
