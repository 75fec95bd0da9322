//! Wikidata integration
//!
//! This module provides:
//! - API types for `wbsearchentities` and `wbgetentities`
//! - Client for fetching data from the Wikidata API
//! - Query expansion into search terms
//! - Type enrichment via "instance of" claims
//! - The resolver tying these stages together

pub mod client;
pub mod enrichment;
pub mod query;
pub mod search;
pub mod types;

pub use client::{WikidataApi, WikidataClient};
pub use enrichment::EnrichmentResult;
pub use query::expand_query;
pub use search::{EntityResolver, SearchOutcome};
pub use types::*;
