//! Upstream URL template.
//!
//! The template is a full URL containing one `{keyword}` and one `{portal}`
//! placeholder. Rendering percent-encodes both values with query
//! (form-urlencoded) rules and drops them into place; everything else in
//! the template is copied verbatim.

use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::error::{ForwardError, ForwardResult};

/// Research Catalogue search endpoint with every filter fixed.
pub const DEFAULT_UPSTREAM_TEMPLATE: &str = "https://www.researchcatalogue.net/portal/search-result?fulltext=&title=&autocomplete=&keyword={keyword}&portal={portal}&statusprogress=0&statusprogress=1&statuspublished=0&statuspublished=1&includelimited=0&includelimited=1&includeprivate=0&includeprivate=1&type_research=research&resulttype=research&modifiedafter=&modifiedbefore=&format=json&limit=250&page=0";

pub const KEYWORD_PLACEHOLDER: &str = "{keyword}";
pub const PORTAL_PLACEHOLDER: &str = "{portal}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("missing placeholder {0}")]
    MissingPlaceholder(&'static str),

    #[error("placeholder {0} appears more than once")]
    DuplicatePlaceholder(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Keyword,
    Portal,
}

/// A parsed template: three literal segments around two slots.
#[derive(Debug, Clone)]
pub struct UpstreamTemplate {
    segments: [String; 3],
    slots: [Slot; 2],
}

impl UpstreamTemplate {
    pub fn new(template: impl AsRef<str>) -> Result<Self, TemplateError> {
        let raw = template.as_ref();
        let keyword_at = find_once(raw, KEYWORD_PLACEHOLDER)?;
        let portal_at = find_once(raw, PORTAL_PLACEHOLDER)?;

        let (first, second) = if keyword_at < portal_at {
            ((keyword_at, KEYWORD_PLACEHOLDER, Slot::Keyword), (portal_at, PORTAL_PLACEHOLDER, Slot::Portal))
        } else {
            ((portal_at, PORTAL_PLACEHOLDER, Slot::Portal), (keyword_at, KEYWORD_PLACEHOLDER, Slot::Keyword))
        };

        let segments = [
            raw[..first.0].to_string(),
            raw[first.0 + first.1.len()..second.0].to_string(),
            raw[second.0 + second.1.len()..].to_string(),
        ];

        Ok(Self {
            segments,
            slots: [first.2, second.2],
        })
    }

    /// Substitute the encoded values into the template.
    ///
    /// Values are raw bytes; they need not be UTF-8.
    pub fn render(&self, keyword: impl AsRef<[u8]>, portal: impl AsRef<[u8]>) -> String {
        let keyword = encode_query_value(keyword);
        let portal = encode_query_value(portal);
        let value = |slot: Slot| match slot {
            Slot::Keyword => keyword.as_str(),
            Slot::Portal => portal.as_str(),
        };

        let mut out = String::with_capacity(
            self.segments.iter().map(String::len).sum::<usize>() + keyword.len() + portal.len(),
        );
        out.push_str(&self.segments[0]);
        out.push_str(value(self.slots[0]));
        out.push_str(&self.segments[1]);
        out.push_str(value(self.slots[1]));
        out.push_str(&self.segments[2]);
        out
    }

    /// Render and parse into a URL ready for the client.
    pub fn build_url(&self, keyword: impl AsRef<[u8]>, portal: impl AsRef<[u8]>) -> ForwardResult<Url> {
        let rendered = self.render(keyword, portal);
        Url::parse(&rendered).map_err(|source| ForwardError::InvalidUpstreamUrl {
            url: rendered,
            source,
        })
    }
}

fn find_once(haystack: &str, needle: &'static str) -> Result<usize, TemplateError> {
    let mut found = haystack.match_indices(needle).map(|(i, _)| i);
    let first = found.next().ok_or(TemplateError::MissingPlaceholder(needle))?;
    if found.next().is_some() {
        return Err(TemplateError::DuplicatePlaceholder(needle));
    }
    Ok(first)
}

/// Percent-encode a single query value (space becomes `+`).
pub fn encode_query_value(value: impl AsRef<[u8]>) -> String {
    form_urlencoded::byte_serialize(value.as_ref()).collect()
}
