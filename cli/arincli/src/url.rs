//! Request URL construction.

use reqwest::Url;

use crate::error::CliError;

/// Name of the query parameter carrying the API key.
pub const API_KEY_PARAM: &str = "apikey";

/// Build a registry request URL.
///
/// `route` is resolved against `origin`, each of `segments` is percent-escaped
/// on its own and appended in order, and the API key is set as the only
/// query parameter. A missing key still produces a URL (with an empty
/// `apikey`); the registry rejects it.
///
/// `.` and `..` are refused: URL parsing resolves them (escaped or not), so
/// the request would land on the route or its parent instead.
pub fn build_url(
    origin: &Url,
    route: &str,
    api_key: Option<&str>,
    segments: &[&str],
) -> Result<Url, CliError> {
    let mut url = origin
        .join(route.trim_start_matches('/'))
        .map_err(|e| CliError::InvalidUrl(format!("{route}: {e}")))?;

    if let Some(segment) = segments.iter().find(|s| is_dot_segment(s)) {
        return Err(CliError::InvalidUrl(format!(
            "{segment:?} is not usable as a path segment"
        )));
    }

    url.path_segments_mut()
        .map_err(|_| CliError::InvalidUrl(format!("{origin} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);

    url.query_pairs_mut()
        .clear()
        .append_pair(API_KEY_PARAM, api_key.unwrap_or_default());

    Ok(url)
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

/// Normalize an origin so routes are joined below its path rather than
/// replacing its last segment.
pub fn parse_origin(raw: &str) -> Result<Url, CliError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| CliError::InvalidUrl(format!("{raw}: {e}")))
}
