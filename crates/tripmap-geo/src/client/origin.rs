//! Host extraction for error messages.

/// Extracts the hostname from a request URL.
///
/// Falls back to the full URL string if parsing fails.
#[must_use]
pub fn extract_host(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| {
            tracing::warn!(url, "could not parse URL, using it verbatim as host");
            url.to_owned()
        })
}
