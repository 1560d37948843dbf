//! Form serialization and query-string composition.

use url::form_urlencoded;

/// Serializes key-value pairs to `key=value&...` form, percent-encoding the
/// values. Keys are passed through untouched; callers own key hygiene.
pub(crate) fn serialize_form(form: &[(String, String)]) -> String {
    form.iter()
        .map(|(key, value)| {
            let encoded: String = form_urlencoded::byte_serialize(value.as_bytes()).collect();
            format!("{key}={encoded}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends a serialized query to a URL, respecting whether the URL already
/// carries a query string and whether it already ends in `?` or `&`.
pub(crate) fn append_query(url: &str, query: &str) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    let joiner = if !url.contains('?') {
        "?"
    } else if url.ends_with('?') || url.ends_with('&') {
        ""
    } else {
        "&"
    };
    format!("{url}{joiner}{query}")
}
