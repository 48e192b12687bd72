//! Page title fetching
//!
//! Looks up a page's title when a bookmark is added with `--fetch-title`
//! and no title of its own.

use anyhow::{bail, Result};
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Fetch the title of a page
///
/// Returns `None` on any failure; the caller then reports the title as
/// missing.
pub fn fetch_title(url: &str) -> Option<String> {
    match fetch_title_inner(url) {
        Ok(title) => title,
        Err(e) => {
            debug!("Title fetch for {} failed: {}", url, e);
            None
        }
    }
}

fn fetch_title_inner(url: &str) -> Result<Option<String>> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; sheetmarks/1.0)")
        .build()?;

    let response = client.get(url).send()?;
    if !response.status().is_success() {
        bail!("HTTP {}", response.status());
    }

    let html = response.text()?;
    Ok(parse_title(&html))
}

/// Extract a title from HTML: og:title, then twitter:title, then <title>
fn parse_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for property in ["og:title", "twitter:title"] {
        if let Some(title) = meta_content(&document, property) {
            return Some(title);
        }
    }

    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Content of a meta tag matched by property or name
fn meta_content(document: &Html, property: &str) -> Option<String> {
    for attr in ["property", "name"] {
        let Ok(selector) = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, property)) else {
            continue;
        };
        let content = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        if content.is_some() {
            return content;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title_tag() {
        let html = r#"
            <!DOCTYPE html>
            <html>
            <head><title>  Sliver C2 Documentation </title></head>
            <body></body>
            </html>
        "#;
        assert_eq!(parse_title(html), Some("Sliver C2 Documentation".to_string()));
    }

    #[test]
    fn test_parse_title_prefers_opengraph() {
        let html = r#"
            <html>
            <head>
                <title>Fallback Title</title>
                <meta property="og:title" content="OG Title">
            </head>
            </html>
        "#;
        assert_eq!(parse_title(html), Some("OG Title".to_string()));
    }

    #[test]
    fn test_parse_title_twitter_name() {
        let html = r#"<html><head><meta name="twitter:title" content="Tweet Title"></head></html>"#;
        assert_eq!(parse_title(html), Some("Tweet Title".to_string()));
    }

    #[test]
    fn test_parse_title_missing() {
        assert!(parse_title("<html><head></head><body></body></html>").is_none());
        assert!(parse_title("<html><head><title>   </title></head></html>").is_none());
    }
}
