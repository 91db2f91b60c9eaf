//! Embedded URL harvesting.

use crate::package::RawValue;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref URL_REGEX: Regex =
        Regex::new(r"(?i)https?://[\w\-._~:/?#\[\]@!$&'()*+,;=%]+").expect("valid URL regex");
}

/// Collects the URLs found in the given text into `urls`.
fn collect(text: &str, urls: &mut BTreeSet<String>) {
    urls.extend(URL_REGEX.find_iter(text).map(|m| m.as_str().to_owned()));
}

/// Harvests the URLs of the manifest text and of the paths in the file listing.
///
/// Either source may be missing. Entries of the listing that are not strings are skipped.
/// The result is sorted and has no duplicates.
pub fn harvest(manifest: Option<&str>, files: &[RawValue]) -> Vec<String> {
    let mut urls = BTreeSet::new();

    if let Some(manifest) = manifest {
        collect(manifest, &mut urls);
    }
    for file in files.iter().filter_map(RawValue::as_str) {
        collect(file, &mut urls);
    }

    urls.into_iter().collect()
}
