//! Default request headers.

/// Default headers attached to every request.
///
/// A small browser-like set: content negotiation plus `Cache-Control:
/// no-cache` so repeated fetches of the same page see fresh content.
/// Caller-supplied headers are applied after these and take precedence.
pub(crate) struct DefaultHeaders;

impl DefaultHeaders {
    /// Applies the default headers to a `reqwest::RequestBuilder`.
    pub(crate) fn apply(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
    }
}
