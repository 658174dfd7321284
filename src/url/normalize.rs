use crate::UrlError;
use url::Url;

/// Query keys that only track the visitor and never select content
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "ref"];

/// Link schemes that never lead to a page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Canonical identity of a page URL
///
/// Two hrefs pointing at the same listing or property page map to the same
/// `Url`: the host is lowercased, repeated slashes collapse, the fragment and
/// tracking keys go away and the remaining query pairs are sorted. Scheme and
/// trailing slash are kept as written.
///
/// ```
/// use casa_ripple::url::normalize_url;
///
/// let url = normalize_url("https://CHILEPROPIEDADES.CL/ver-publicacion/1#fotos").unwrap();
/// assert_eq!(url.as_str(), "https://chilepropiedades.cl/ver-publicacion/1");
/// ```
pub fn normalize_url(raw: &str) -> Result<Url, UrlError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlError::InvalidScheme(other.to_string())),
    }

    let host = url
        .host_str()
        .ok_or(UrlError::MissingDomain)?
        .to_ascii_lowercase();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("host '{}': {}", host, e)))?;

    let path = collapse_slashes(url.path());
    url.set_path(&path);
    url.set_fragment(None);

    let query = url.query().and_then(canonical_query);
    url.set_query(query.as_deref());

    Ok(url)
}

/// Resolves an `href` found on `base` into a normalized absolute URL
///
/// Empty hrefs, in-page anchors and non-navigational schemes resolve to
/// None, as does anything that fails [`normalize_url`].
pub fn resolve_link(href: &str, base: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let absolute = base.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}

fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        collapsed.push('/');
        collapsed.push_str(segment);
    }

    if collapsed.is_empty() || path.ends_with('/') {
        collapsed.push('/');
    }
    collapsed
}

/// Raw query pairs minus tracking keys, sorted by key then pair text
///
/// Pairs are compared as written, so percent-encoding and bare keys
/// (`?page`) reach the server unchanged.
fn canonical_query(query: &str) -> Option<String> {
    let mut pairs: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty() && !is_tracking_param(query_key(pair)))
        .collect();
    if pairs.is_empty() {
        return None;
    }

    pairs.sort_by(|a, b| query_key(a).cmp(query_key(b)).then_with(|| a.cmp(b)));
    Some(pairs.join("&"))
}

fn query_key(pair: &str) -> &str {
    pair.split_once('=').map_or(pair, |(key, _)| key)
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
