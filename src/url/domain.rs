use url::Url;

/// Lowercased host of `url`, with the port when it is not the scheme's
/// default; None for hostless URLs
///
/// ```
/// use url::Url;
/// use casa_ripple::url::extract_domain;
///
/// let page = Url::parse("https://ChilePropiedades.CL/propiedades/0").unwrap();
/// assert_eq!(extract_domain(&page).as_deref(), Some("chilepropiedades.cl"));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Politeness bucket for a URL
///
/// Hostless URLs share one bucket so they are still rate limited.
pub fn domain_key(url: &Url) -> String {
    extract_domain(url).unwrap_or_default()
}
