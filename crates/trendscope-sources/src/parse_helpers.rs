//! Shared RSS parsing and HTML stripping helpers.
//!
//! Used by the feed-backed adapters (generic search RSS, news RSS) to
//! avoid duplicating item-extraction logic.

use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::SourceError;

/// One `<item>` pulled out of an RSS document, before it becomes a
/// `RawTrendItem`.
#[derive(Debug, Clone)]
pub(crate) struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// Parse an RSS XML body into [`FeedEntry`]s.
///
/// Extracts `<item>` elements, pulling `<title>`, `<link>`,
/// `<description>`, and `<pubDate>`. HTML tags in descriptions are
/// stripped. Stops after `max_entries` items.
pub(crate) fn parse_rss_feed(xml: &str, max_entries: usize) -> Result<Vec<FeedEntry>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();
    let mut pub_date = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "item" {
                    in_item = true;
                    title.clear();
                    link.clear();
                    description.clear();
                    pub_date.clear();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    if !title.is_empty() && !link.is_empty() {
                        entries.push(FeedEntry {
                            title: title.clone(),
                            link: link.clone(),
                            description: strip_html(&description),
                            published_at: parse_rfc2822(&pub_date),
                        });
                        if entries.len() >= max_entries {
                            break;
                        }
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().to_string();
                    match current_tag.as_str() {
                        "title" => title = text,
                        "link" => link = text,
                        "description" => description = text,
                        "pubDate" => pub_date = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    match current_tag.as_str() {
                        "title" => title = text,
                        "description" => description = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::Xml(e)),
            _ => {}
        }
    }

    Ok(entries)
}

/// Strip HTML tags from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an RFC 2822 `pubDate`, returning `None` on any malformation —
/// a missing date never fails the whole feed.
pub(crate) fn parse_rfc2822(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>feed</title>
    <item>
      <title>Rising demand for heat pumps</title>
      <link>https://example.com/a</link>
      <description>&lt;b&gt;Installers&lt;/b&gt; report record bookings</description>
      <pubDate>Mon, 11 Aug 2025 10:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Second story</title>
      <link>https://example.com/b</link>
      <description>plain text</description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_items_with_stripped_html() {
        let entries = parse_rss_feed(SAMPLE_RSS, 10).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Rising demand for heat pumps");
        assert_eq!(entries[0].description, "Installers report record bookings");
        assert!(entries[0].published_at.is_some());
        assert!(entries[1].published_at.is_none());
    }

    #[test]
    fn respects_max_entries() {
        let entries = parse_rss_feed(SAMPLE_RSS, 1).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn item_without_link_is_skipped() {
        let xml = "<rss><channel><item><title>no link</title></item></channel></rss>";
        let entries = parse_rss_feed(xml, 10).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn strip_html_collapses_whitespace() {
        assert_eq!(strip_html("<p>a  <i>b</i>\n c</p>"), "a b c");
    }

    #[test]
    fn bad_pub_date_is_none() {
        assert!(parse_rfc2822("yesterday-ish").is_none());
    }
}
