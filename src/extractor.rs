//! Latest-post extraction from the notice listing page.
//!
//! The listing is a table whose rows carry the post number in a
//! `td._artclTdNum` cell. Pinned notices hold a marker such as `공지` in that
//! cell instead of a number, so the first row with a purely numeric number
//! cell is the newest regular post.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// A post on the notice board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Sequential post number assigned by the board.
    pub id: u64,
    pub title: String,
    /// Absolute link to the post.
    pub link: String,
}

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("post number '{0}' does not fit in an integer")]
    IdOutOfRange(String),
    #[error("post {id} has no subject link")]
    MissingSubjectLink { id: u64 },
    #[error("post {id} subject link has no href")]
    MissingHref { id: u64 },
    #[error("post {id} has an empty title")]
    EmptyTitle { id: u64 },
    #[error("post {id} link '{href}' cannot be resolved: {source}")]
    InvalidLink {
        id: u64,
        href: String,
        #[source]
        source: url::ParseError,
    },
}

/// Typed lookups into a listing row.
struct ListingRow<'a> {
    row: ElementRef<'a>,
}

impl<'a> ListingRow<'a> {
    fn select_one(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.row.select(selector).next()
    }

    fn number(&self, selectors: &ListingSelectors) -> Option<String> {
        self.select_one(&selectors.number).map(|cell| text_of(&cell))
    }

    fn subject_link(&self, selectors: &ListingSelectors) -> Option<ElementRef<'a>> {
        self.select_one(&selectors.subject_link)
    }
}

struct ListingSelectors {
    rows: Selector,
    number: Selector,
    subject_link: Selector,
}

impl ListingSelectors {
    fn new() -> Self {
        Self {
            rows: Selector::parse("tbody > tr").expect("Invalid selector"),
            number: Selector::parse("td._artclTdNum").expect("Invalid selector"),
            subject_link: Selector::parse("td.td-subject > a").expect("Invalid selector"),
        }
    }
}

/// Extract the newest non-pinned post from a listing document.
///
/// Returns `Ok(None)` when no row carries a numeric post number.
///
/// # Errors
///
/// Returns an error if the first numeric row lacks its subject link, title
/// or href, or the href cannot be resolved against `origin`.
pub fn extract_latest_post(html: &str, origin: &Url) -> Result<Option<Post>, ParseFailure> {
    let document = Html::parse_document(html);
    let selectors = ListingSelectors::new();

    for row in document.select(&selectors.rows) {
        let row = ListingRow { row };

        let Some(number) = row.number(&selectors) else {
            continue;
        };
        if !is_post_number(&number) {
            continue;
        }

        let id = number
            .parse()
            .map_err(|_| ParseFailure::IdOutOfRange(number.clone()))?;
        return post_from_row(&row, &selectors, id, origin).map(Some);
    }

    Ok(None)
}

fn post_from_row(
    row: &ListingRow<'_>,
    selectors: &ListingSelectors,
    id: u64,
    origin: &Url,
) -> Result<Post, ParseFailure> {
    let anchor = row
        .subject_link(selectors)
        .ok_or(ParseFailure::MissingSubjectLink { id })?;

    let title = text_of(&anchor);
    if title.is_empty() {
        return Err(ParseFailure::EmptyTitle { id });
    }

    let href = anchor
        .value()
        .attr("href")
        .ok_or(ParseFailure::MissingHref { id })?;
    let link = origin
        .join(href)
        .map_err(|source| ParseFailure::InvalidLink {
            id,
            href: href.to_string(),
            source,
        })?;

    Ok(Post {
        id,
        title,
        link: link.to_string(),
    })
}

fn text_of(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn is_post_number(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://www.gachon.ac.kr").unwrap()
    }

    fn listing(rows: &str) -> String {
        format!(
            r#"
            <html>
              <body>
                <table class="board-table">
                  <thead><tr><th>번호</th><th>제목</th></tr></thead>
                  <tbody>{rows}</tbody>
                </table>
              </body>
            </html>
            "#
        )
    }

    fn row(number: &str, title: &str, href: &str) -> String {
        format!(
            r#"
            <tr>
              <td class="td-num _artclTdNum">{number}</td>
              <td class="td-subject"><a href="{href}">
                <strong>{title}</strong>
              </a></td>
              <td class="td-date">2024.03.04</td>
            </tr>
            "#
        )
    }

    #[test]
    fn test_skips_pinned_rows() {
        let html = listing(&format!(
            "{}{}{}",
            row("공지", "Pinned", "/kor/3104/view.do?id=9"),
            row("452", "Course registration", "/kor/3104/view.do?id=452"),
            row("451", "Older post", "/kor/3104/view.do?id=451"),
        ));

        let post = extract_latest_post(&html, &origin()).unwrap().unwrap();

        assert_eq!(post.id, 452);
        assert_eq!(post.title, "Course registration");
        assert_eq!(post.link, "https://www.gachon.ac.kr/kor/3104/view.do?id=452");
    }

    #[test]
    fn test_returns_first_numeric_row_only() {
        let html = listing(&format!(
            "{}{}",
            row("105", "Test Notice", "/kor/3104/view.do?id=1"),
            row("200", "Listed later", "/kor/3104/view.do?id=2"),
        ));

        let post = extract_latest_post(&html, &origin()).unwrap().unwrap();

        assert_eq!(post.id, 105);
        assert_eq!(post.link, "https://www.gachon.ac.kr/kor/3104/view.do?id=1");
    }

    #[test]
    fn test_no_numeric_rows() {
        let html = listing(&format!(
            "{}{}",
            row("공지", "Pinned", "/a"),
            row("", "Blank", "/b"),
        ));

        assert_eq!(extract_latest_post(&html, &origin()).unwrap(), None);
    }

    #[test]
    fn test_document_without_table() {
        let html = "<html><body><p>Service unavailable</p></body></html>";
        assert_eq!(extract_latest_post(html, &origin()).unwrap(), None);
    }

    #[test]
    fn test_number_cell_is_trimmed() {
        let html = listing(&row("\n   77  \n", "Spaced", "/kor/3104/view.do?id=77"));

        let post = extract_latest_post(&html, &origin()).unwrap().unwrap();
        assert_eq!(post.id, 77);
    }

    #[test]
    fn test_rows_without_number_cell_are_skipped() {
        let html = listing(&format!(
            r#"<tr><td colspan="2">No posts in this category</td></tr>{}"#,
            row("3", "Third", "/kor/3104/view.do?id=3"),
        ));

        let post = extract_latest_post(&html, &origin()).unwrap().unwrap();
        assert_eq!(post.id, 3);
    }

    #[test]
    fn test_mixed_marker_is_not_numeric() {
        let html = listing(&format!(
            "{}{}",
            row("12공지", "Marker", "/x"),
            row("11", "Plain", "/kor/3104/view.do?id=11"),
        ));

        let post = extract_latest_post(&html, &origin()).unwrap().unwrap();
        assert_eq!(post.id, 11);
    }

    #[test]
    fn test_numeric_row_without_link_fails() {
        let html = listing(
            r#"
            <tr>
              <td class="_artclTdNum">10</td>
              <td class="td-subject">No anchor</td>
            </tr>
            "#,
        );

        let err = extract_latest_post(&html, &origin()).unwrap_err();
        assert!(matches!(err, ParseFailure::MissingSubjectLink { id: 10 }));
    }

    #[test]
    fn test_numeric_row_without_href_fails() {
        let html = listing(
            r#"
            <tr>
              <td class="_artclTdNum">10</td>
              <td class="td-subject"><a>Title</a></td>
            </tr>
            "#,
        );

        let err = extract_latest_post(&html, &origin()).unwrap_err();
        assert!(matches!(err, ParseFailure::MissingHref { id: 10 }));
    }

    #[test]
    fn test_empty_title_fails() {
        let html = listing(&row("10", "   ", "/kor/3104/view.do?id=10"));

        let err = extract_latest_post(&html, &origin()).unwrap_err();
        assert!(matches!(err, ParseFailure::EmptyTitle { id: 10 }));
    }

    #[test]
    fn test_oversized_number_fails() {
        let html = listing(&row("99999999999999999999999", "Huge", "/x"));

        let err = extract_latest_post(&html, &origin()).unwrap_err();
        assert!(matches!(err, ParseFailure::IdOutOfRange(_)));
    }

    #[test]
    fn test_is_post_number() {
        assert!(is_post_number("0"));
        assert!(is_post_number("452"));
        assert!(!is_post_number(""));
        assert!(!is_post_number("공지"));
        assert!(!is_post_number("-1"));
        assert!(!is_post_number("4 5"));
        assert!(!is_post_number("٣"));
    }
}
