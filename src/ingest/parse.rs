// src/ingest/parse.rs
//! Atom / RSS 2.0 documents into a [`FeedSnapshot`].
//!
//! Parsing never fails outright: anything that is not a well-formed Atom or
//! RSS document comes back as a malformed snapshot with the reason attached.

use metrics::histogram;
use once_cell::sync::OnceCell;
use quick_xml::{de::from_str, escape::escape, events::Event, Reader};
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::ingest::types::{Entry, FeedSnapshot};
use crate::timefmt::parse_feed_time;

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    id: Option<String>,
    summary: Option<TextNode>,
    content: Option<TextNode>,
    updated: Option<String>,
    published: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Rss {
    channel: RssChannel,
}

#[derive(Debug, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    guid: Option<TextNode>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// Element text with its attributes (`type="html"`, `isPermaLink`) ignored.
#[derive(Debug, Deserialize, Default)]
struct TextNode {
    #[serde(rename = "$text", default)]
    text: String,
}

/// Parse a feed body. Format is picked from the root element.
pub fn parse_feed(body: &str) -> FeedSnapshot {
    let t0 = std::time::Instant::now();
    let xml = escape_xhtml_text_constructs(&scrub_html_entities_for_xml(body));

    let snapshot = match root_element(&xml) {
        Ok(Some(root)) if root == "feed" => parse_atom(&xml),
        Ok(Some(root)) if root == "rss" => parse_rss(&xml),
        Ok(Some(root)) => FeedSnapshot::malformed(format!("unexpected root element <{root}>")),
        Ok(None) => FeedSnapshot::malformed("document has no root element"),
        Err(e) => FeedSnapshot::malformed(format!("xml error: {e}")),
    };

    histogram!("feed_parse_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    snapshot
}

fn parse_atom(xml: &str) -> FeedSnapshot {
    let feed: AtomFeed = match from_str(xml) {
        Ok(f) => f,
        Err(e) => return FeedSnapshot::malformed(format!("atom: {e}")),
    };
    let entries = feed
        .entries
        .into_iter()
        .map(|e| Entry {
            id: non_empty(e.id),
            summary: e
                .summary
                .or(e.content)
                .map(|n| n.text)
                .unwrap_or_default(),
            updated: e.updated.as_deref().and_then(parse_feed_time),
            published: e.published.as_deref().and_then(parse_feed_time),
        })
        .collect();
    FeedSnapshot::from_entries(entries)
}

fn parse_rss(xml: &str) -> FeedSnapshot {
    let rss: Rss = match from_str(xml) {
        Ok(r) => r,
        Err(e) => return FeedSnapshot::malformed(format!("rss: {e}")),
    };
    let entries = rss
        .channel
        .items
        .into_iter()
        .map(|it| Entry {
            id: non_empty(it.guid.map(|g| g.text)),
            summary: it.description.unwrap_or_default(),
            updated: None,
            published: it.pub_date.as_deref().and_then(parse_feed_time),
        })
        .collect();
    FeedSnapshot::from_entries(entries)
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Local name of the first element, or `None` for a document without one.
fn root_element(xml: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(
                    String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                ));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Atom `type="xhtml"` summaries/content carry child elements rather than
/// escaped text. Re-escape their inner markup so it reaches the entry as text,
/// the same as `type="html"`.
fn escape_xhtml_text_constructs(xml: &str) -> String {
    static RE_SUMMARY: OnceCell<Regex> = OnceCell::new();
    static RE_CONTENT: OnceCell<Regex> = OnceCell::new();
    let re_summary = RE_SUMMARY.get_or_init(|| {
        Regex::new(r#"(?s)(<summary\s[^>]*type\s*=\s*["']xhtml["'][^>]*>)(.*?)(</summary>)"#).unwrap()
    });
    let re_content = RE_CONTENT.get_or_init(|| {
        Regex::new(r#"(?s)(<content\s[^>]*type\s*=\s*["']xhtml["'][^>]*>)(.*?)(</content>)"#).unwrap()
    });

    let reescape = |c: &Captures| format!("{}{}{}", &c[1], escape(&c[2]), &c[3]);
    let out = re_summary.replace_all(xml, reescape);
    re_content.replace_all(&out, reescape).into_owned()
}

// Status pages sometimes leak HTML named entities into the XML itself.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    const ATOM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xml:lang="en-US">
  <id>tag:status.example.com,2005:/history</id>
  <title>Example Status - Incident History</title>
  <updated>2024-01-02T10:00:00Z</updated>
  <entry>
    <id>tag:status.example.com,2005:Incident/2</id>
    <published>2024-01-02T09:00:00Z</published>
    <updated>2024-01-02T10:00:00Z</updated>
    <link rel="alternate" type="text/html" href="https://status.example.com/incidents/2"/>
    <title>Elevated errors</title>
    <content type="html">&lt;p&gt;Investigating&lt;/p&gt;&lt;ul&gt;&lt;li&gt;API&lt;/li&gt;&lt;/ul&gt;</content>
  </entry>
  <entry>
    <id>tag:status.example.com,2005:Incident/1</id>
    <published>2024-01-01T00:00:00Z</published>
    <summary type="html">Resolved</summary>
  </entry>
</feed>"#;

    #[test]
    fn atom_entries_fields() {
        let snap = parse_feed(ATOM);
        assert!(!snap.is_malformed(), "{:?}", snap.malformed);
        assert_eq!(snap.entries.len(), 2);

        let first = &snap.entries[0];
        assert_eq!(first.id.as_deref(), Some("tag:status.example.com,2005:Incident/2"));
        assert_eq!(first.summary, "<p>Investigating</p><ul><li>API</li></ul>");
        assert_eq!(
            first.timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap())
        );

        // no <updated>: falls back to published
        let second = &snap.entries[1];
        assert_eq!(second.summary, "Resolved");
        assert_eq!(
            second.timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn rss_items_map_guid_and_pubdate() {
        let xml = r#"<rss version="2.0"><channel><title>x</title>
<item><guid isPermaLink="false">inc-9</guid><description>&lt;li&gt;Files&lt;/li&gt;</description><pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate></item>
<item><description>no guid</description></item>
</channel></rss>"#;
        let snap = parse_feed(xml);
        assert!(!snap.is_malformed(), "{:?}", snap.malformed);
        assert_eq!(snap.entries.len(), 2);
        assert_eq!(snap.entries[0].id.as_deref(), Some("inc-9"));
        assert_eq!(snap.entries[0].summary, "<li>Files</li>");
        assert!(snap.entries[0].timestamp().is_some());
        assert_eq!(snap.entries[1].id, None);
    }

    #[test]
    fn atom_entries_split_by_other_elements() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
<entry><id>a</id><summary>first</summary></entry>
<link href="https://status.example.com/history.atom" rel="self"/>
<entry><id>b</id><summary>second</summary></entry>
<title>trailing</title>
<entry><id>c</id></entry>
</feed>"#;
        let snap = parse_feed(xml);
        assert!(!snap.is_malformed(), "{:?}", snap.malformed);
        let ids: Vec<_> = snap.entries.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn rss_items_split_by_other_elements() {
        let xml = r#"<rss version="2.0"><channel>
<item><guid>1</guid></item>
<lastBuildDate>Mon, 01 Jan 2024 00:00:00 +0000</lastBuildDate>
<item><guid>2</guid></item>
</channel></rss>"#;
        let snap = parse_feed(xml);
        assert!(!snap.is_malformed(), "{:?}", snap.malformed);
        let ids: Vec<_> = snap.entries.iter().filter_map(|e| e.id.as_deref()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn xhtml_content_keeps_its_markup() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry><id>x</id>
<content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>Degraded</p><ul><li>Files</li></ul></div></content>
</entry></feed>"#;
        let snap = parse_feed(xml);
        assert!(!snap.is_malformed(), "{:?}", snap.malformed);
        let summary = &snap.entries[0].summary;
        assert!(summary.contains("<li>Files</li>"), "{summary}");
        assert!(summary.contains("<p>Degraded</p>"), "{summary}");
    }

    #[test]
    fn html_page_is_malformed() {
        let snap = parse_feed("<html><body>502 Bad Gateway</body></html>");
        assert!(snap.is_malformed());
        assert!(snap.entries.is_empty());
    }

    #[test]
    fn broken_xml_is_malformed() {
        assert!(parse_feed("<feed><entry><id>1</id>").is_malformed());
        assert!(parse_feed("").is_malformed());
    }

    #[test]
    fn stray_html_entities_do_not_break_parsing() {
        let xml = "<feed><entry><id>a</id><summary>Fixed&nbsp;now</summary></entry></feed>";
        let snap = parse_feed(xml);
        assert!(!snap.is_malformed(), "{:?}", snap.malformed);
        assert_eq!(snap.entries[0].summary, "Fixed now");
    }

    #[test]
    fn empty_feed_is_well_formed() {
        let snap = parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>t</title></feed>"#);
        assert!(!snap.is_malformed());
        assert!(snap.entries.is_empty());
    }
}
