//! Type enrichment
//!
//! Fills `SearchHit::entity_type` in two batched `wbgetentities` calls: one
//! for the hits themselves (to read their "instance of" claim) and one for
//! the distinct type ids (to read their labels). Either call may fail; the
//! hits are then returned as they are.

use super::client::WikidataApi;
use super::types::SearchHit;
use std::collections::{BTreeSet, HashMap};

/// Summary of one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentResult {
    /// Entities returned by the detail fetch
    pub entities_fetched: usize,
    /// Distinct "instance of" targets found
    pub type_ids: usize,
    /// Type ids that resolved to a label
    pub labels_resolved: usize,
    /// Hits whose type was filled
    pub hits_typed: usize,
}

/// Resolve and apply type labels for `hits`
pub async fn enrich_types<A>(api: &A, hits: &mut [SearchHit]) -> EnrichmentResult
where
    A: WikidataApi + ?Sized,
{
    let mut result = EnrichmentResult::default();
    if hits.is_empty() {
        return result;
    }

    let ids: Vec<String> = hits.iter().map(|hit| hit.id.clone()).collect();
    let Some((fetched, type_id_by_hit)) = fetch_type_ids(api, &ids).await else {
        return result;
    };
    result.entities_fetched = fetched;

    let type_ids: BTreeSet<&str> = type_id_by_hit.values().map(String::as_str).collect();
    result.type_ids = type_ids.len();
    if type_ids.is_empty() {
        return result;
    }

    let type_ids: Vec<String> = type_ids.into_iter().map(str::to_string).collect();
    let labels = fetch_type_labels(api, &type_ids).await;
    result.labels_resolved = labels.len();

    for hit in hits.iter_mut() {
        let label = type_id_by_hit
            .get(&hit.id)
            .and_then(|type_id| labels.get(type_id));
        if let Some(label) = label {
            hit.entity_type = label.clone();
            result.hits_typed += 1;
        }
    }

    tracing::debug!(
        entities = result.entities_fetched,
        type_ids = result.type_ids,
        labels = result.labels_resolved,
        typed = result.hits_typed,
        "Type enrichment complete"
    );
    result
}

/// Fetch details for `ids` and map each surfaced id to its "instance of" target
///
/// `None` when the request fails; ids the API returns that were not asked for
/// are ignored.
async fn fetch_type_ids<A>(api: &A, ids: &[String]) -> Option<(usize, HashMap<String, String>)>
where
    A: WikidataApi + ?Sized,
{
    let response = match api.get_entities(ids).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, count = ids.len(), "Entity detail fetch failed");
            return None;
        }
    };

    let fetched = response.entities.len();
    let type_ids = response
        .entities
        .iter()
        .filter(|(id, _)| {
            let known = ids.contains(*id);
            if !known {
                tracing::debug!(id = %id, "Ignoring entity not surfaced by search");
            }
            known
        })
        .filter_map(|(id, entity)| {
            entity
                .instance_of()
                .map(|type_id| (id.clone(), type_id.to_string()))
        })
        .collect();

    Some((fetched, type_ids))
}

/// Fetch labels for `type_ids` in the API's language
///
/// Types without a label in that language are left out.
async fn fetch_type_labels<A>(api: &A, type_ids: &[String]) -> HashMap<String, String>
where
    A: WikidataApi + ?Sized,
{
    let response = match api.get_entities(type_ids).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, count = type_ids.len(), "Type label fetch failed");
            return HashMap::new();
        }
    };

    let language = api.language();
    response
        .entities
        .iter()
        .filter_map(|(id, entity)| {
            entity
                .label(language)
                .map(|label| (id.clone(), label.to_string()))
        })
        .collect()
}
