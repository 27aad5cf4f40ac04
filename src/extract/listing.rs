//! Listing-page extraction: pagination probe and question-link discovery

use scraper::{Html, Selector};

/// Parses the total page count from a listing page's pagination control
///
/// The listing shows `Showing page <strong>N</strong> out of <strong>M</strong>`;
/// the last number inside the indicator is the page count. Returns `None`
/// when the indicator is absent or carries no parseable number, which the
/// caller treats as a fatal discovery failure.
pub fn page_count(html: &str) -> Option<usize> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(".discussion-list-page-indicator strong").ok()?;

    document
        .select(&selector)
        .filter_map(|el| {
            el.text()
                .collect::<String>()
                .trim()
                .parse::<usize>()
                .ok()
        })
        .last()
}

/// Extracts question links from a listing page, keeping those whose anchor
/// text contains `filter`
///
/// Question links are the anchors pointing at discussion view pages. The
/// match is a case-sensitive substring over the anchor text; an empty filter
/// is an explicit match-everything mode. Returned hrefs are kept verbatim
/// (usually relative) and resolved later by the content fetcher.
pub fn question_links(html: &str, filter: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            if !href.contains("/view/") {
                return None;
            }

            let text = el.text().collect::<String>();
            if filter.is_empty() || text.contains(filter) {
                Some(href.to_string())
            } else {
                None
            }
        })
        .collect()
}

/// Extracts exam links from a provider's exam index page
pub fn exam_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            if href.contains("/exams/") {
                Some(href.to_string())
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
        <span class="discussion-list-page-indicator">
            Showing page <strong>1</strong> out of <strong>42</strong>
        </span>
        <a href="/discussions/google/view/5-exam-foo-question-1/">Exam Foo question 1</a>
        <a href="/discussions/google/view/12-exam-bar-question-2/">Exam Bar question 2</a>
        <a href="/help">Help</a>
        </body></html>
    "#;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(LISTING), Some(42));
    }

    #[test]
    fn test_page_count_missing_indicator() {
        assert_eq!(page_count("<html><body>no pages here</body></html>"), None);
    }

    #[test]
    fn test_page_count_non_numeric() {
        let html = r#"<span class="discussion-list-page-indicator"><strong>n/a</strong></span>"#;
        assert_eq!(page_count(html), None);
    }

    #[test]
    fn test_question_links_filtered() {
        let links = question_links(LISTING, "Exam Foo");
        assert_eq!(links, vec!["/discussions/google/view/5-exam-foo-question-1/"]);
    }

    #[test]
    fn test_question_links_empty_filter_matches_all() {
        let links = question_links(LISTING, "");
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_question_links_filter_is_case_sensitive() {
        assert!(question_links(LISTING, "exam foo").is_empty());
    }

    #[test]
    fn test_question_links_ignores_non_view_anchors() {
        let links = question_links(LISTING, "");
        assert!(!links.iter().any(|l| l.contains("/help")));
    }

    #[test]
    fn test_exam_links() {
        let html = r#"
            <a href="/exams/google/exam-a/">Exam A</a>
            <a href="/exams/google/exam-b/">Exam B</a>
            <a href="/discussions/google/">Discussions</a>
        "#;
        let links = exam_links(html);
        assert_eq!(links, vec!["/exams/google/exam-a/", "/exams/google/exam-b/"]);
    }
}
