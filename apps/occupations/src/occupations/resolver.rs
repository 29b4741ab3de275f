//! Code Resolver: keyword search to classification codes.
//!
//! The search endpoint's markup is parsed leniently (HTML parser), unlike the
//! detail and task documents which must be well-formed XML.

use scraper::{Html, Selector};
use tracing::{error, info, warn};

use crate::occupations::{Notice, Stage};
use crate::onet_client::{Endpoints, Transport, TransportError};

/// Result of one keyword search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Codes in response order, duplicates kept.
    Codes(Vec<String>),
    /// The search succeeded but listed no codes.
    NoMatches(Notice),
    /// The search endpoint answered with a non-200 status.
    Failed(Notice),
}

/// Queries the search endpoint for `keyword` and extracts every `<code>` element's text.
///
/// Only connection-level failures are returned as errors.
pub async fn resolve_codes(
    transport: &dyn Transport,
    endpoints: &Endpoints,
    keyword: &str,
) -> Result<Resolution, TransportError> {
    let response = transport.get(&endpoints.search(keyword)).await?;

    if !response.is_ok() {
        error!(
            "Search for '{keyword}' failed with status {}: {}",
            response.status, response.body
        );
        return Ok(Resolution::Failed(Notice::error(
            Stage::Search,
            None,
            format!(
                "Failed to fetch military classification codes (status {}): {}",
                response.status, response.body
            ),
        )));
    }

    let codes = extract_codes(&response.body);

    if codes.is_empty() {
        warn!("No classification codes found for '{keyword}'");
        return Ok(Resolution::NoMatches(Notice::warning(
            Stage::Search,
            None,
            "No SOC codes found for the given keyword.",
        )));
    }

    info!("Keyword '{keyword}' resolved to {} code(s)", codes.len());
    Ok(Resolution::Codes(codes))
}

/// Text of every `code` element, trimmed, in document order.
///
/// Elements with no text are dropped; they cannot name a detail document.
/// An unclosed `<code>` is reopened by the HTML tree builder in following
/// blocks, so text there is read as further codes.
pub fn extract_codes(markup: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    let Ok(selector) = Selector::parse("code") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|code| !code.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onet_client::fake::FakeTransport;

    const BASE: &str = "https://onet.test/ws";

    const SEARCH: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<military_matches keyword="11B">
  <match active="true">
    <code>11B</code>
    <title>Infantryman</title>
    <occupations>
      <occupation><code>33-3051.00</code><title>Police Officer</title></occupation>
      <occupation><code>33-3051.00</code><title>Police Officer</title></occupation>
      <occupation><code> 55-3016.00 </code><title>Infantry</title></occupation>
    </occupations>
  </match>
</military_matches>"#;

    #[test]
    fn test_extract_codes_preserves_order_and_duplicates() {
        assert_eq!(
            extract_codes(SEARCH),
            vec!["11B", "33-3051.00", "33-3051.00", "55-3016.00"]
        );
    }

    #[test]
    fn test_extract_codes_tolerates_broken_markup() {
        let markup = "<results><code>13-1111.00</code><code>15-1252.00</results";
        assert_eq!(extract_codes(markup), vec!["13-1111.00", "15-1252.00"]);
    }

    #[test]
    fn test_extract_codes_reopens_unclosed_code_across_blocks() {
        // html5ever reconstructs the open <code> formatting element inside the next block.
        assert_eq!(extract_codes("<p><code>A</p><p>B</p>"), vec!["A", "B"]);
    }

    #[test]
    fn test_extract_codes_skips_empty_elements() {
        assert!(extract_codes("<r><code>  </code><code></code></r>").is_empty());
    }

    #[tokio::test]
    async fn test_resolve_returns_codes() {
        let endpoints = Endpoints::new(BASE);
        let transport = FakeTransport::new().respond(endpoints.search("11B"), 200, SEARCH);

        let resolution = resolve_codes(&transport, &endpoints, "11B").await.unwrap();
        let Resolution::Codes(codes) = resolution else {
            panic!("expected codes, got {resolution:?}");
        };
        assert_eq!(codes.len(), 4);
        assert_eq!(transport.calls(), vec![endpoints.search("11B")]);
    }

    #[tokio::test]
    async fn test_resolve_no_codes_is_a_warning() {
        let endpoints = Endpoints::new(BASE);
        let transport = FakeTransport::new().respond(
            endpoints.search("zzz"),
            200,
            "<military_matches keyword=\"zzz\"></military_matches>",
        );

        let resolution = resolve_codes(&transport, &endpoints, "zzz").await.unwrap();
        match resolution {
            Resolution::NoMatches(notice) => {
                assert_eq!(notice.level, crate::occupations::NoticeLevel::Warning);
                assert_eq!(notice.stage, Stage::Search);
            }
            other => panic!("expected no matches, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_non_200_is_an_error() {
        let endpoints = Endpoints::new(BASE);
        let transport =
            FakeTransport::new().respond(endpoints.search("11B"), 401, "Unauthorized");

        let resolution = resolve_codes(&transport, &endpoints, "11B").await.unwrap();
        match resolution {
            Resolution::Failed(notice) => {
                assert_eq!(notice.level, crate::occupations::NoticeLevel::Error);
                assert!(notice.message.contains("401"));
                assert!(notice.message.contains("Unauthorized"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_propagates_connection_failure() {
        let endpoints = Endpoints::new(BASE);
        let transport = FakeTransport::new().unreachable(endpoints.search("11B"));

        assert!(resolve_codes(&transport, &endpoints, "11B").await.is_err());
    }
}
