//! Site-scoped query construction.
//!
//! A query is `site:<base> <topic>`, one per topic, in topic order.

/// The search operator that restricts results to a single site.
pub const SITE_OPERATOR: &str = "site:";

/// Splits a comma separated topic string into trimmed topics.
///
/// Empty segments (`"a,,b"`, trailing commas) are dropped.
#[must_use]
pub fn parse_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|topic| !topic.is_empty())
        .map(String::from)
        .collect()
}

/// Builds one scoped query per topic.
///
/// The output has exactly as many elements as `topics`, in the same order.
#[must_use]
pub fn build_queries<S: AsRef<str>>(base_url: &str, topics: &[S]) -> Vec<String> {
    topics
        .iter()
        .map(|topic| format!("{SITE_OPERATOR}{base_url} {}", topic.as_ref().trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_queries_one_per_topic() {
        let queries = build_queries("graphy.com", &["locations", " delhi", "mumbai "]);
        assert_eq!(
            queries,
            vec![
                "site:graphy.com locations",
                "site:graphy.com delhi",
                "site:graphy.com mumbai",
            ]
        );
    }

    #[test]
    fn test_build_queries_empty() {
        let topics: Vec<String> = Vec::new();
        assert!(build_queries("example.com", &topics).is_empty());
    }

    #[test]
    fn test_build_queries_prefix_property() {
        let topics = parse_topics("a, b ,c,d,e,f,g");
        let queries = build_queries("example.org", &topics);
        assert_eq!(queries.len(), topics.len());
        for (query, topic) in queries.iter().zip(&topics) {
            assert_eq!(query, &format!("site:example.org {topic}"));
        }
    }

    #[test]
    fn test_build_queries_keeps_duplicates() {
        let queries = build_queries("x.io", &["rust", "rust"]);
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], queries[1]);
    }

    #[test]
    fn test_parse_topics() {
        assert_eq!(
            parse_topics("locations,delhi , mumbai"),
            vec!["locations", "delhi", "mumbai"]
        );
        assert_eq!(parse_topics("a,,b,"), vec!["a", "b"]);
        assert!(parse_topics(" , ").is_empty());
        assert!(parse_topics("").is_empty());
    }
}
