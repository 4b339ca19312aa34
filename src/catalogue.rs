//! Helpers for working with Research Catalogue search results.
//!
//! Used by `rc-proxy-cli`: building proxy search URLs, wrapping search
//! results into a dump and collecting the set of portal names that appear
//! in a dump.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::http::PROXY_PATH;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Invalid proxy URL '{url}': {source}")]
    InvalidProxyUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Catalogue dump has no top-level \"rc\" array")]
    MissingEntries,
}

/// Arrays on an entry that list the portals it belongs to.
static PORTAL_FIELDS: [&str; 2] = ["published_in", "connected_to"];

/// URL of a `/proxy` search on the proxy at `base`.
pub fn search_url(base: &str, keyword: &str, portal: &str) -> Result<Url, CatalogueError> {
    let mut url = Url::parse(base)
        .and_then(|b| b.join(PROXY_PATH))
        .map_err(|source| CatalogueError::InvalidProxyUrl {
            url: base.to_string(),
            source,
        })?;

    url.query_pairs_mut()
        .append_pair("keyword", keyword)
        .append_pair("portal", portal);
    Ok(url)
}

/// Wrap a search result as `{"<key>": result}`.
///
/// With key `rc` the output is the shape `collect_portals` reads.
pub fn wrap_dump(key: &str, results: Value) -> Value {
    let mut dump = Map::new();
    dump.insert(key.to_string(), results);
    Value::Object(dump)
}

/// Collect the distinct portal names from a dump shaped `{"rc": [entry, ...]}`.
///
/// Entries without `published_in`/`connected_to`, and items without a
/// string `name`, are skipped.
pub fn collect_portals(dump: &Value) -> Result<BTreeSet<String>, CatalogueError> {
    let entries = dump
        .get("rc")
        .and_then(Value::as_array)
        .ok_or(CatalogueError::MissingEntries)?;

    let portals = entries
        .iter()
        .flat_map(|entry| {
            PORTAL_FIELDS
                .iter()
                .filter_map(move |field| entry.get(*field).and_then(Value::as_array))
                .flatten()
        })
        .filter_map(|item| item.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect();

    Ok(portals)
}
