//! Query expansion
//!
//! A compound query like `tokamak_reactor` rarely matches a Wikidata label
//! verbatim, so the resolver also searches each of its components.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Delimiters a query is split on: space, `_ - + *`, parentheses and brackets
static DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ _\-+*()\[\]]").expect("delimiter pattern is valid"));

/// Expand a query into its distinct, non-empty search terms
///
/// The original query comes first, followed by its components in order of
/// first appearance. An empty query yields no terms.
pub fn expand_query(query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    std::iter::once(query)
        .chain(DELIMITER_RE.split(query))
        .filter(|term| !term.is_empty())
        .filter(|term| seen.insert(*term))
        .map(str::to_string)
        .collect()
}
