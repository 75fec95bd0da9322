//! FUEL Wikidata - entity search and type resolution
//!
//! Looks up free-text terms from the FUEL ontology in Wikidata and reports,
//! for every matching entity, what it is an instance of.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fuel_wikidata::{EntityResolver, WikidataConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let resolver = EntityResolver::from_config(WikidataConfig::default())?;
//! for hit in resolver.search("tokamak_reactor").await {
//!     println!("{} ({}): {}", hit.label, hit.id, hit.entity_type);
//! }
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Endpoint and request settings
pub mod config;

// Wikidata client, query expansion and type enrichment
pub mod wikidata;

pub use config::WikidataConfig;
pub use error::WikidataError;
pub use wikidata::{expand_query, EntityResolver, SearchHit, WikidataApi, WikidataClient};

/// Search Wikidata for `query` using `WIKIDATA_*` environment settings
///
/// Fails only if the configuration or HTTP client cannot be built; request
/// failures degrade the result instead.
pub async fn wikidata_search(query: &str) -> anyhow::Result<Vec<SearchHit>> {
    let resolver = EntityResolver::from_env()?;
    Ok(resolver.search(query).await)
}
