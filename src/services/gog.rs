//! Reconciles `gamefixes-gog` filenames against GOG and the umu database.
//!
//! Resolution order: the GOG products API in batches, then Steam fix
//! filenames (a GOG fix may alias a Steam app), then the umu database.
//! Whatever one batch leaves unresolved is carried into the later passes
//! together with the leftovers of every other batch.

use crate::error::FixCheckError;
use crate::models::{Endpoint, GOG_BATCH_LIMIT, GogProduct, Resolution, UmuEntry};
use crate::services::http::HttpFetch;
use crate::services::layout::{gog_candidate_ids, steam_stems};
use crate::services::stream;
use camino::Utf8Path;
use indexmap::IndexSet;
use std::ops::ControlFlow;

/// URL-encoded comma between IDs of one products request
const ID_SEPARATOR: &str = "%2C";

/// Verifies every `umu-` GOG fix names a GOG product, a Steam fix, or an
/// umu database entry.
///
/// `catalog` serves the products batches; `session` serves the single umu
/// database request. `batch_size` is clamped to [`GOG_BATCH_LIMIT`].
pub fn check_gogfixes(
    root: &Utf8Path,
    catalog_url_prefix: &str,
    fallback: &Endpoint,
    batch_size: usize,
    catalog: &dyn HttpFetch,
    session: &dyn HttpFetch,
) -> Result<Resolution, FixCheckError> {
    let candidates: Vec<String> = gog_candidate_ids(root)?.into_iter().collect();
    let mut resolution = Resolution::new(candidates.len());
    tracing::info!("Validating {} GOG app ids", candidates.len());

    let mut unresolved = IndexSet::new();
    for batch in candidates.chunks(batch_size.clamp(1, GOG_BATCH_LIMIT)) {
        let (resolved, leftover) = resolve_batch(batch, catalog_url_prefix, catalog)?;
        resolution.by_catalog += resolved;
        resolution.requests += 1;
        unresolved.extend(leftover);
    }

    if !unresolved.is_empty() {
        resolution.by_alias = resolve_from_steam_fixes(&mut unresolved, root)?;
    }

    if !unresolved.is_empty() {
        tracing::info!(
            "{} GOG app ids still unresolved, querying {}",
            unresolved.len(),
            fallback.host
        );
        resolution.by_fallback = resolve_from_umu_database(&mut unresolved, fallback, session)?;
        resolution.requests += 1;
    }

    if !unresolved.is_empty() {
        return Err(FixCheckError::InvalidGogAppIds(
            unresolved.into_iter().collect(),
        ));
    }

    tracing::info!("All {} GOG app ids are valid", resolution.candidates);
    Ok(resolution)
}

/// URL of the products request for one batch
pub fn batch_url(prefix: &str, batch: &[String]) -> String {
    format!("{}{}", prefix, batch.join(ID_SEPARATOR))
}

/// Looks up one batch in the products API.
///
/// Returns the number of IDs found and the IDs that were not.
pub fn resolve_batch(
    batch: &[String],
    url_prefix: &str,
    catalog: &dyn HttpFetch,
) -> Result<(usize, IndexSet<String>), FixCheckError> {
    let url = batch_url(url_prefix, batch);
    let mut pending: IndexSet<String> = batch.iter().cloned().collect();
    let mut resolved = 0;

    let body = catalog.get(&url)?;
    stream::for_each_at(body, &[], |product: GogProduct| {
        if pending.shift_remove(product.id.to_string().as_str()) {
            resolved += 1;
        }
        if pending.is_empty() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .map_err(|source| FixCheckError::Decode {
        url: url.clone(),
        source,
    })?;

    tracing::debug!(
        "GOG batch of {}: {} found, {} left",
        batch.len(),
        resolved,
        pending.len()
    );
    Ok((resolved, pending))
}

/// Removes IDs that also name a Steam fix. Returns how many matched.
pub fn resolve_from_steam_fixes(
    unresolved: &mut IndexSet<String>,
    root: &Utf8Path,
) -> Result<usize, FixCheckError> {
    let stems = steam_stems(root)?;
    let before = unresolved.len();
    unresolved.retain(|id| {
        let aliased = stems.contains(id);
        if aliased {
            tracing::debug!("GOG id {} matches a Steam fix", id);
        }
        !aliased
    });
    Ok(before - unresolved.len())
}

/// Removes IDs listed in the umu database. Returns how many matched.
pub fn resolve_from_umu_database(
    unresolved: &mut IndexSet<String>,
    fallback: &Endpoint,
    session: &dyn HttpFetch,
) -> Result<usize, FixCheckError> {
    let url = fallback.url();
    let body = session.get(&url)?;
    let mut resolved = 0;

    stream::for_each_at(body, &[], |entry: UmuEntry| {
        if let Some(id) = entry.bare_id() {
            if unresolved.shift_remove(id) {
                resolved += 1;
            }
        }
        if unresolved.is_empty() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .map_err(|source| FixCheckError::Decode { url, source })?;

    Ok(resolved)
}
