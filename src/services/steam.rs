//! Reconciles `gamefixes-steam` filenames against Steam.
//!
//! IDs are resolved against the bulk app list first, then one by one
//! against the store's app details endpoint. Delisted apps that still have
//! fixes are accepted through [`DELISTED_STEAM_APPS`].

use crate::error::FixCheckError;
use crate::models::{Endpoint, Resolution, SteamApp};
use crate::services::http::HttpFetch;
use crate::services::layout::steam_candidate_ids;
use crate::services::stream;
use camino::Utf8Path;
use indexmap::IndexSet;
use serde_json::Value;
use std::ops::ControlFlow;

/// App IDs that are gone from every Steam catalog but still have fixes.
pub const DELISTED_STEAM_APPS: [u64; 6] = [231990, 4730, 105400, 321040, 12840, 7850];

/// Key path of the app array in the Steam app list
const APP_LIST_PATH: [&str; 2] = ["applist", "apps"];

/// Verifies every numeric Steam fix names a real Steam app.
///
/// `catalog` serves the bulk app list, `session` the per-ID fallback
/// queries. IDs in `whitelist` never fail and are set aside before any
/// request is made.
pub fn check_steamfixes(
    root: &Utf8Path,
    catalog_url: &str,
    fallback: &Endpoint,
    whitelist: &[u64],
    catalog: &dyn HttpFetch,
    session: &dyn HttpFetch,
) -> Result<Resolution, FixCheckError> {
    let mut pending = steam_candidate_ids(root)?;
    let mut resolution = Resolution::new(pending.len());
    tracing::info!("Validating {} Steam app ids", pending.len());

    pending.retain(|id| {
        let listed = whitelist.contains(id);
        if listed {
            tracing::debug!("Steam app {} is whitelisted", id);
            resolution.whitelisted += 1;
        }
        !listed
    });

    if !pending.is_empty() {
        resolution.by_catalog = resolve_from_app_list(&mut pending, catalog_url, catalog)?;
        resolution.requests += 1;
    }

    if !pending.is_empty() {
        tracing::info!(
            "{} Steam app ids missing from the app list, querying {}",
            pending.len(),
            fallback.host
        );
        let (resolved, requests) = resolve_from_app_details(&mut pending, fallback, session)?;
        resolution.by_fallback = resolved;
        resolution.requests += requests;
    }

    if !pending.is_empty() {
        return Err(FixCheckError::InvalidSteamAppIds(
            pending.into_iter().collect(),
        ));
    }

    tracing::info!("All {} Steam app ids are valid", resolution.candidates);
    Ok(resolution)
}

/// Removes every ID listed in the bulk app list. Returns how many matched.
pub fn resolve_from_app_list(
    pending: &mut IndexSet<u64>,
    url: &str,
    catalog: &dyn HttpFetch,
) -> Result<usize, FixCheckError> {
    let body = catalog.get(url)?;
    let mut resolved = 0;

    let visited = stream::for_each_at(body, &APP_LIST_PATH, |app: SteamApp| {
        if pending.shift_remove(&app.appid) {
            resolved += 1;
        }
        if pending.is_empty() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .map_err(|source| FixCheckError::Decode {
        url: url.to_string(),
        source,
    })?;

    match visited {
        Some(count) => tracing::debug!("Scanned {} apps, matched {}", count, resolved),
        None => tracing::warn!("No applist.apps array in response from {}", url),
    }
    Ok(resolved)
}

/// Queries the app details endpoint once per pending ID, removing those
/// reported as `success`. Returns `(resolved, requests)`.
pub fn resolve_from_app_details(
    pending: &mut IndexSet<u64>,
    fallback: &Endpoint,
    session: &dyn HttpFetch,
) -> Result<(usize, usize), FixCheckError> {
    let ids: Vec<u64> = pending.iter().copied().collect();
    let mut resolved = 0;
    let mut requests = 0;

    for id in ids {
        if pending.is_empty() {
            break;
        }
        let url = fallback.url_for(id);
        let body = session.get(&url)?;
        requests += 1;

        let key = id.to_string();
        let success: Option<Value> = stream::value_at(body, &[key.as_str(), "success"])
            .map_err(|source| FixCheckError::Decode {
                url: url.clone(),
                source,
            })?;

        // Anything but a literal `true` counts as not found
        if let Some(Value::Bool(true)) = success {
            tracing::debug!("Steam app {} found via app details", id);
            pending.shift_remove(&id);
            resolved += 1;
        } else {
            tracing::warn!("Steam app {} not found via app details", id);
        }
    }

    Ok((resolved, requests))
}
