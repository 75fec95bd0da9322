//! Entity resolver
//!
//! Orchestrates a Wikidata lookup for a free-text query:
//!
//! ```text
//! query ─► expand_query ─► wbsearchentities (one per term)
//!       ─► dedup / merge by id
//!       ─► wbgetentities (hits) ─► P31 ids ─► wbgetentities (types)
//!       ─► labels merged into SearchHit::entity_type
//! ```
//!
//! Requests run one after another. A failing request only removes the data it
//! would have contributed; `search` itself never fails.

use super::client::{WikidataApi, WikidataClient};
use super::enrichment::{enrich_types, EnrichmentResult};
use super::query::expand_query;
use super::types::SearchHit;
use crate::config::WikidataConfig;
use anyhow::Result;
use std::collections::{HashMap, HashSet};

/// Everything a single `search` call did, for callers that want more than hits
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub hits: Vec<SearchHit>,
    /// Search terms derived from the query
    pub terms: Vec<String>,
    /// Terms whose search request failed or was not flagged successful
    pub terms_failed: usize,
    /// Hits returned across all terms, before dedup
    pub raw_hits: usize,
    pub enrichment: EnrichmentResult,
}

/// Searches Wikidata and resolves the type of each hit
pub struct EntityResolver<A = WikidataClient> {
    api: A,
}

impl EntityResolver<WikidataClient> {
    /// Resolver backed by an HTTP client built from `config`
    pub fn from_config(config: WikidataConfig) -> Result<Self> {
        Ok(Self::new(WikidataClient::new(config)?))
    }

    /// Resolver configured from `WIKIDATA_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(WikidataClient::from_env()?))
    }
}

impl<A: WikidataApi> EntityResolver<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Search for `query` and return typed hits with unique ids
    ///
    /// An empty query returns immediately without touching the network.
    pub async fn search(&self, query: &str) -> Vec<SearchHit> {
        self.search_with_outcome(query).await.hits
    }

    /// Same as [`search`](Self::search), with per-stage counts
    pub async fn search_with_outcome(&self, query: &str) -> SearchOutcome {
        let terms = expand_query(query);
        if terms.is_empty() {
            return SearchOutcome::default();
        }

        let mut index = HitIndex::default();
        let mut terms_failed = 0;
        for term in &terms {
            if !self.search_term(term, &mut index).await {
                terms_failed += 1;
            }
        }

        let raw_hits = index.raw_hits;
        let mut hits = index.into_hits();

        tracing::info!(
            query = %query,
            terms = terms.len(),
            failed = terms_failed,
            raw_hits,
            unique = hits.len(),
            "Wikidata search complete"
        );

        if hits.is_empty() {
            return SearchOutcome {
                hits,
                terms,
                terms_failed,
                raw_hits,
                enrichment: EnrichmentResult::default(),
            };
        }

        let enrichment = enrich_types(&self.api, &mut hits).await;

        SearchOutcome {
            hits,
            terms,
            terms_failed,
            raw_hits,
            enrichment,
        }
    }

    /// Search a single term into `index`; false if the request yielded nothing usable
    async fn search_term(&self, term: &str, index: &mut HitIndex) -> bool {
        match self.api.search_entities(term).await {
            Ok(response) if response.is_success() => {
                tracing::debug!(term = %term, count = response.search.len(), "Search results");
                for item in response.search {
                    index.insert(item.into());
                }
                true
            }
            Ok(_) => {
                tracing::warn!(term = %term, "Search response not flagged successful");
                false
            }
            Err(e) => {
                tracing::warn!(term = %term, error = %e, "Search request failed");
                false
            }
        }
    }
}

/// Hits keyed by id, in order of first appearance
///
/// Identical hits are dropped outright; differing hits for the same id are
/// merged into the first one seen (see [`SearchHit::merge`]).
#[derive(Debug, Default)]
struct HitIndex {
    hits: Vec<SearchHit>,
    positions: HashMap<String, usize>,
    seen: HashSet<SearchHit>,
    raw_hits: usize,
}

impl HitIndex {
    fn insert(&mut self, hit: SearchHit) {
        self.raw_hits += 1;
        if !self.seen.insert(hit.clone()) {
            return;
        }

        match self.positions.get(&hit.id) {
            Some(&pos) => self.hits[pos].merge(hit),
            None => {
                self.positions.insert(hit.id.clone(), self.hits.len());
                self.hits.push(hit);
            }
        }
    }

    fn into_hits(self) -> Vec<SearchHit> {
        self.hits
    }
}
