//! URL helpers.

/// Joins a base URL and a path with exactly one slash between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        base.to_string()
    } else if path.starts_with('?') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Renders `key=value` pairs as a URL-encoded query string.
///
/// Pairs whose value is `None` are left out.
pub fn query_string<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<String>)>,
{
    params
        .into_iter()
        .filter_map(|(key, value)| {
            value.map(|value| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(&value)
                )
            })
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends a query string to `path` when it is not empty.
pub fn with_query(path: String, query: &str) -> String {
    if query.is_empty() {
        path
    } else {
        format!("{path}?{query}")
    }
}

/// Percent-encodes a single path segment such as a record code.
pub fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://host/biz-ops", "/v1/batch"), "https://host/biz-ops/v1/batch");
        assert_eq!(join_url("https://host/biz-ops/", "v1/batch"), "https://host/biz-ops/v1/batch");
        assert_eq!(join_url("https://host/biz-ops//", "//graphql"), "https://host/biz-ops/graphql");
        assert_eq!(join_url("https://host", ""), "https://host");
        assert_eq!(join_url("https://host/graphql", "?query=x"), "https://host/graphql?query=x");
    }

    #[test]
    fn test_query_string() {
        let qs = query_string([
            ("foo", Some("bar".to_string())),
            ("baz", Some(123.to_string())),
        ]);
        assert_eq!(qs, "foo=bar&baz=123");
    }

    #[test]
    fn test_query_string_excludes_empty_values() {
        let qs = query_string([
            ("foo", Some("bar".to_string())),
            ("baz", None),
            ("quux", Some(0.to_string())),
        ]);
        assert_eq!(qs, "foo=bar&quux=0");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let qs = query_string([("query", Some("{ Team(code: \"a b\") { name } }".to_string()))]);
        assert_eq!(
            qs,
            "query=%7B%20Team%28code%3A%20%22a%20b%22%29%20%7B%20name%20%7D%20%7D"
        );
    }

    #[test]
    fn test_with_query_and_segments() {
        assert_eq!(with_query("/v1/batch/Team".to_string(), ""), "/v1/batch/Team");
        assert_eq!(
            with_query("/v1/batch/Team".to_string(), "dryRun=true"),
            "/v1/batch/Team?dryRun=true"
        );
        assert_eq!(encode_segment("a/b c"), "a%2Fb%20c");
    }
}
