//! Shareable unit links.
//!
//! A link carries a unit identifier in one query parameter (`unit` by
//! default), e.g. `https://punch.example/app?unit=B-Unit04`. The identifier is
//! read once at startup to open the unit directly.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::ids::UnitId;

/// Query parameter used when none is configured.
pub const DEFAULT_LINK_PARAM: &str = "unit";

/// Characters left unescaped in a query value (RFC 3986 unreserved set).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Extract the unit identifier from `link`'s query string.
///
/// Returns `None` when there is no query string, the parameter is absent, or
/// its decoded value is blank. The first occurrence of the parameter wins.
#[must_use]
pub fn unit_from_link(link: &str, param: &str) -> Option<UnitId> {
    let (_, query) = link.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| decode(key) == param)
        .map(|(_, value)| decode(value))
        .filter(|value| !value.trim().is_empty())
        .map(UnitId::from)
}

/// Build a link to `unit` on top of `base`.
#[must_use]
pub fn share_link(base: &str, param: &str, unit: &UnitId) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!(
        "{base}{sep}{param}={}",
        utf8_percent_encode(unit.as_str(), QUERY_VALUE)
    )
}

fn decode(component: &str) -> String {
    percent_decode_str(&component.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}
