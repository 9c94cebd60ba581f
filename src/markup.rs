// src/markup.rs
//! Text helpers for status-page summaries.
//!
//! These are plain pattern transforms over angle-bracket runs, not an HTML
//! parser: entities are left as-is and malformed or nested markup is handled
//! only as far as the patterns reach.

use once_cell::sync::OnceCell;
use regex::Regex;

fn re_tag() -> &'static Regex {
    static RE_TAG: OnceCell<Regex> = OnceCell::new();
    RE_TAG.get_or_init(|| Regex::new(r"<[^<]+?>").unwrap())
}

fn re_list_item() -> &'static Regex {
    static RE_LI: OnceCell<Regex> = OnceCell::new();
    RE_LI.get_or_init(|| Regex::new(r"(?s)<li>(.*?)</li>").unwrap())
}

/// Remove every `<...>` run (no `<` inside the run) and trim the result.
///
/// Repeats until nothing matches: removing a run can splice a new one
/// together (`<<b>x>` -> `<x>`).
pub fn strip_markup(text: &str) -> String {
    let re = re_tag();
    let mut out = text.to_string();
    while re.is_match(&out) {
        out = re.replace_all(&out, "").into_owned();
    }
    out.trim().to_string()
}

/// Names of affected components, in order of appearance.
///
/// Each `<li>...</li>` span (which may cross lines) is stripped of inner tags;
/// spans that end up empty are dropped. Duplicates are kept.
pub fn extract_components(html: &str) -> Vec<String> {
    re_list_item()
        .captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| strip_markup(m.as_str()))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Last non-empty line of a cleaned summary, i.e. the newest status update
/// inside that entry. Falls back to the trimmed input when there is none.
pub fn extract_status_line(clean_summary: &str) -> String {
    clean_summary
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
        .unwrap_or_else(|| clean_summary.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_trims() {
        assert_eq!(strip_markup("  <p>Hello <b>world</b></p>\n"), "Hello world");
        assert_eq!(strip_markup(""), "");
    }

    #[test]
    fn spliced_tags_are_removed_too() {
        assert_eq!(strip_markup("<<b>x>"), "");
        assert_eq!(strip_markup("a<<i>b>c"), "ac");
    }

    #[test]
    fn entities_are_not_decoded() {
        assert_eq!(strip_markup("<p>A &amp; B</p>"), "A &amp; B");
    }

    #[test]
    fn unmatched_angle_bracket_survives() {
        // "<" followed by another "<" before any ">" is not a tag start.
        assert_eq!(strip_markup("a < b <i>c</i>"), "a < b c");
    }

    #[test]
    fn components_in_order_with_inner_tags_removed() {
        let html = "<ul><li>API</li><li>ChatGPT <b>Web</b></li></ul>";
        assert_eq!(extract_components(html), vec!["API", "ChatGPT Web"]);
    }

    #[test]
    fn components_span_lines_and_keep_duplicates() {
        let html = "<li>\n  Files\n</li><li>Files</li><li> <br> </li>";
        assert_eq!(extract_components(html), vec!["Files", "Files"]);
    }

    #[test]
    fn no_list_items_yields_empty() {
        assert!(extract_components("").is_empty());
        assert!(extract_components("<p>nothing listed</p>").is_empty());
    }

    #[test]
    fn status_line_is_last_non_empty() {
        assert_eq!(
            extract_status_line("Investigating issue\n\nMonitoring results\n"),
            "Monitoring results"
        );
        assert_eq!(extract_status_line("   \n \t\n"), "");
        assert_eq!(extract_status_line(""), "");
        assert_eq!(extract_status_line("  single  "), "single");
    }
}
