//! Path templates, query strings and per-call request parameters.
//!
//! Path values, query keys and query values all go through the same encoder
//! (`urlencoding`): UTF-8, unreserved characters `A-Z a-z 0-9 - _ . ~` kept
//! as-is, everything else percent-encoded. A space becomes `%20`, a `/`
//! becomes `%2F`.

use tracing::warn;

/// Per-call path parameters, query parameters and headers.
///
/// Query keys keep first-insertion order; adding a value to an existing key
/// appends to that key's list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    pub path: Vec<(String, String)>,
    pub query: Vec<(String, Vec<String>)>,
    pub headers: Vec<(String, String)>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.push((name.into(), value.into()));
        self
    }

    pub fn query(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_values(key, [value.into()])
    }

    /// Add several values for one key. An empty iterator still registers the
    /// key, which then renders nothing.
    pub fn query_values<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let key = key.into();
        let values = values.into_iter().map(Into::into);
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.extend(values),
            None => self.query.push((key, values.collect())),
        }
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

pub fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Replace every `{name}` in `template` with the encoded value.
///
/// Placeholders with no matching parameter are left verbatim.
pub fn render_path(template: &str, path_params: &[(String, String)]) -> String {
    let mut path = template.to_string();
    for (name, value) in path_params {
        path = path.replace(&format!("{{{name}}}"), &encode(value));
    }
    let unresolved = unresolved_placeholders(&path);
    if !unresolved.is_empty() {
        warn!(template, path = %path, ?unresolved, "path template has unresolved placeholders");
    }
    path
}

/// Names of `{...}` placeholders still present in `path`.
pub fn unresolved_placeholders(path: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                names.push(&after[..end]);
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Prefix `path` with `base_url` unless it is already absolute.
pub fn render_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }
    match (base_url.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{base_url}{}", &path[1..]),
        _ => format!("{base_url}{path}"),
    }
}

/// Render query pairs as `?k=v&k=v2`. Returns an empty string when no pair
/// exists.
pub fn render_query(query: &[(String, Vec<String>)]) -> String {
    let pairs: Vec<String> = query
        .iter()
        .flat_map(|(key, values)| {
            let key = encode(key);
            values
                .iter()
                .map(move |value| format!("{key}={}", encode(value)))
        })
        .collect();
    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Append rendered query pairs to `url`, continuing an existing query string
/// if the URL already has one. A `#fragment` stays at the end.
pub fn append_query(url: &str, query: &[(String, Vec<String>)]) -> String {
    let rendered = render_query(query);
    if rendered.is_empty() {
        return url.to_string();
    }
    let (base, fragment) = match url.find('#') {
        Some(at) => url.split_at(at),
        None => (url, ""),
    };
    if base.contains('?') {
        format!("{base}&{}{fragment}", &rendered[1..])
    } else {
        format!("{base}{rendered}{fragment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn render_path_substitutes_and_encodes() {
        let path = render_path("/users/{id}/files/{name}", &pairs(&[("id", "a b"), ("name", "x/y")]));
        assert_eq!(path, "/users/a%20b/files/x%2Fy");
        assert!(unresolved_placeholders(&path).is_empty());
    }

    #[test]
    fn render_path_replaces_every_occurrence() {
        let path = render_path("/{id}/{id}", &pairs(&[("id", "7")]));
        assert_eq!(path, "/7/7");
    }

    #[test]
    fn render_path_leaves_unknown_placeholders() {
        let path = render_path("/users/{id}/{missing}", &pairs(&[("id", "1")]));
        assert_eq!(path, "/users/1/{missing}");
        assert_eq!(unresolved_placeholders(&path), vec!["missing"]);
    }

    #[test]
    fn render_path_encodes_unicode_as_utf8() {
        let path = render_path("/q/{term}", &pairs(&[("term", "é")]));
        assert_eq!(path, "/q/%C3%A9");
    }

    #[test]
    fn render_url_prepends_base_for_relative_paths() {
        assert_eq!(render_url("http://api.local", "/users"), "http://api.local/users");
        assert_eq!(render_url("http://api.local/", "/users"), "http://api.local/users");
        assert_eq!(render_url("http://api.local/v1/", "users"), "http://api.local/v1/users");
    }

    #[test]
    fn render_url_keeps_absolute_paths() {
        assert_eq!(
            render_url("http://api.local", "https://other.host/x"),
            "https://other.host/x"
        );
    }

    #[test]
    fn render_query_repeats_key_per_value() {
        let params = RequestParams::new().query_values("filter", ["x", "y"]);
        assert_eq!(render_query(&params.query), "?filter=x&filter=y");
    }

    #[test]
    fn render_query_skips_empty_value_lists() {
        let params = RequestParams::new()
            .query_values("empty", Vec::<String>::new())
            .query("k", "v");
        assert_eq!(render_query(&params.query), "?k=v");

        let only_empty = RequestParams::new().query_values("empty", Vec::<String>::new());
        assert_eq!(render_query(&only_empty.query), "");
    }

    #[test]
    fn render_query_encodes_keys_and_values() {
        let params = RequestParams::new().query("a key", "v&w=1");
        assert_eq!(render_query(&params.query), "?a%20key=v%26w%3D1");
    }

    #[test]
    fn query_keys_keep_first_insertion_order() {
        let params = RequestParams::new()
            .query("b", "1")
            .query("a", "2")
            .query("b", "3");
        assert_eq!(render_query(&params.query), "?b=1&b=3&a=2");
    }

    #[test]
    fn append_query_continues_existing_query() {
        let query = RequestParams::new().query("b", "2").query;
        assert_eq!(append_query("http://h/x?a=1", &query), "http://h/x?a=1&b=2");
        assert_eq!(append_query("http://h/x", &query), "http://h/x?b=2");
        assert_eq!(append_query("http://h/x", &[]), "http://h/x");
    }

    #[test]
    fn append_query_keeps_fragment_last() {
        let query = RequestParams::new().query("b", "2").query;
        assert_eq!(append_query("http://h/doc#intro", &query), "http://h/doc?b=2#intro");
        assert_eq!(append_query("http://h/doc?a=1#intro", &query), "http://h/doc?a=1&b=2#intro");
        assert_eq!(append_query("http://h/doc#intro", &[]), "http://h/doc#intro");
    }
}
