//! Question-link normalization, deduplication and ordering
//!
//! Discovery produces links in arbitrary completion order, often with
//! scheme/host/query variations pointing at the same discussion. This module
//! collapses those variations and restores a deterministic document order.

use std::collections::HashSet;

use url::Url;

/// Normalizes a link down to its bare path, used as the deduplication key
///
/// # Normalization Steps
///
/// 1. Absolute links are reduced to their path (scheme and host dropped)
/// 2. Query string and fragment are dropped
/// 3. Trailing slashes are trimmed (except for the root path)
/// 4. A leading slash is ensured for relative links
///
/// # Examples
///
/// ```
/// use examharvest::links::normalize_path;
///
/// assert_eq!(normalize_path("https://example.com/d/p/5?x=1"), "/d/p/5");
/// assert_eq!(normalize_path("/d/p/5/"), "/d/p/5");
/// ```
pub fn normalize_path(link: &str) -> String {
    let raw = match Url::parse(link) {
        Ok(url) => url.path().to_string(),
        // Relative link: strip query/fragment by hand
        Err(_) => {
            let without_fragment = link.split('#').next().unwrap_or("");
            without_fragment.split('?').next().unwrap_or("").to_string()
        }
    };

    let mut path = raw.trim().to_string();
    if !path.starts_with('/') {
        path.insert(0, '/');
    }

    while path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    path
}

/// Extracts the question number embedded in a link's path
///
/// The number is parsed from the leading digits of the last path segment,
/// so both `/discussions/view/123-some-question` and `/d/p/123` yield 123.
/// Returns `None` when the last segment does not start with a digit.
pub fn question_number(link: &str) -> Option<u64> {
    let path = normalize_path(link);
    let segment = path.rsplit('/').find(|s| !s.is_empty())?;

    let digits: String = segment.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    digits.parse().ok()
}

/// Deduplicates and deterministically orders a set of discovered links
///
/// Deduplication keys on the normalized path: the first-discovered link for a
/// path wins, later variants (query strings, absolute vs relative) are
/// dropped. Ordering is ascending by embedded question number; links without
/// a parseable number sort after all numbered ones, keeping their relative
/// discovery order (the sort is stable).
///
/// The output is what determines the document's question numbering, so for a
/// fixed set of numbered links it is independent of discovery order.
pub fn order_unique(links: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = links
        .into_iter()
        .filter(|link| seen.insert(normalize_path(link)))
        .collect();

    // (true, _) sorts after (false, n), and equal keys keep discovery order
    unique.sort_by_key(|link| match question_number(link) {
        Some(n) => (false, n),
        None => (true, 0),
    });

    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_query() {
        assert_eq!(normalize_path("/d/p/5?x=1"), "/d/p/5");
    }

    #[test]
    fn test_normalize_strips_fragment() {
        assert_eq!(normalize_path("/d/p/5#answer"), "/d/p/5");
    }

    #[test]
    fn test_normalize_strips_scheme_and_host() {
        assert_eq!(normalize_path("https://example.com/d/p/5"), "/d/p/5");
        assert_eq!(normalize_path("http://other.org/d/p/5"), "/d/p/5");
    }

    #[test]
    fn test_normalize_trims_trailing_slash() {
        assert_eq!(normalize_path("/d/p/5/"), "/d/p/5");
        assert_eq!(normalize_path("/d/p/5///"), "/d/p/5");
    }

    #[test]
    fn test_normalize_keeps_root() {
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_normalize_adds_leading_slash() {
        assert_eq!(normalize_path("d/p/5"), "/d/p/5");
    }

    #[test]
    fn test_question_number_plain() {
        assert_eq!(question_number("/d/p/5"), Some(5));
    }

    #[test]
    fn test_question_number_slug() {
        assert_eq!(
            question_number("/discussions/google/view/12345-exam-question-7"),
            Some(12345)
        );
    }

    #[test]
    fn test_question_number_trailing_slash() {
        assert_eq!(question_number("/d/p/42/"), Some(42));
    }

    #[test]
    fn test_question_number_unparseable() {
        assert_eq!(question_number("/d/p/abc"), None);
        assert_eq!(question_number("/d/p/abc-12"), None);
    }

    #[test]
    fn test_order_unique_drops_duplicates_and_sorts() {
        let links = vec![
            "/d/p/5".to_string(),
            "/d/p/5?x=1".to_string(),
            "/d/p/2".to_string(),
            "/d/p/abc".to_string(),
        ];

        assert_eq!(order_unique(links), vec!["/d/p/2", "/d/p/5", "/d/p/abc"]);
    }

    #[test]
    fn test_dedup_across_scheme_and_host() {
        let links = vec![
            "https://www.example.com/d/p/9".to_string(),
            "/d/p/9".to_string(),
            "/d/p/9/".to_string(),
        ];

        let result = order_unique(links);
        assert_eq!(result, vec!["https://www.example.com/d/p/9"]);
    }

    #[test]
    fn test_first_discovered_wins() {
        let links = vec!["/d/p/3?page=2".to_string(), "/d/p/3".to_string()];
        assert_eq!(order_unique(links), vec!["/d/p/3?page=2"]);
    }

    #[test]
    fn test_ordering_is_permutation_independent() {
        let a = vec![
            "/d/p/30".to_string(),
            "/d/p/1".to_string(),
            "/d/p/200".to_string(),
            "/d/p/4".to_string(),
        ];
        let mut b = a.clone();
        b.reverse();

        assert_eq!(order_unique(a), order_unique(b));
    }

    #[test]
    fn test_numbers_sort_numerically_not_lexically() {
        let links = vec![
            "/d/p/100".to_string(),
            "/d/p/20".to_string(),
            "/d/p/3".to_string(),
        ];

        assert_eq!(order_unique(links), vec!["/d/p/3", "/d/p/20", "/d/p/100"]);
    }

    #[test]
    fn test_unparseable_keep_discovery_order() {
        let links = vec![
            "/d/p/zeta".to_string(),
            "/d/p/7".to_string(),
            "/d/p/alpha".to_string(),
        ];

        assert_eq!(
            order_unique(links),
            vec!["/d/p/7", "/d/p/zeta", "/d/p/alpha"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(order_unique(vec![]).is_empty());
    }
}
