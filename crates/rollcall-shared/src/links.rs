//! Text scanning for qualifying post links and completion phrases.
//!
//! Both scanners are pure: they never touch state and never fail. Text that
//! contains nothing of interest simply yields an empty result.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::AttributedLink;

/// Post URLs on x.com / twitter.com: `https://x.com/<handle>/status/<id>`.
///
/// The whole pattern is case-insensitive so `HTTPS://X.COM/...` matches; the
/// handle character class already spans both cases and is returned verbatim.
static POST_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)(https?://(?:www\.)?(?:twitter|x)\.com/([A-Za-z0-9_]+)/status/\d+)")
        .expect("post url regex")
});

static DONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)\b(?:done|completed|ad|all done|dn)\b").expect("done phrase regex")
});

/// Extract every qualifying link from `text`, left to right.
///
/// Repeated links are all returned; each one becomes its own link record.
pub fn extract_links(text: &str) -> Vec<AttributedLink> {
    POST_URL_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let url = caps.get(1)?.as_str();
            let handle = caps.get(2)?.as_str();
            Some(AttributedLink {
                handle: handle.to_string(),
                url: url.to_string(),
            })
        })
        .collect()
}

/// Whether `text` contains one of [`DONE_PHRASES`](crate::constants::DONE_PHRASES)
/// as a whole word.
pub fn looks_like_done(text: &str) -> bool {
    DONE_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DONE_PHRASES;

    #[test]
    fn extracts_handle_and_url() {
        let links = extract_links("please like https://x.com/alice/status/12345 thanks");
        assert_eq!(
            links,
            vec![AttributedLink {
                handle: "alice".into(),
                url: "https://x.com/alice/status/12345".into(),
            }]
        );
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let text = "https://twitter.com/Bob_1/status/1 and https://www.x.com/carol/status/2 \
                    and again https://twitter.com/Bob_1/status/1";
        let handles: Vec<_> = extract_links(text).into_iter().map(|l| l.handle).collect();
        assert_eq!(handles, vec!["Bob_1", "carol", "Bob_1"]);
    }

    #[test]
    fn domain_is_case_insensitive_but_handle_is_preserved() {
        let links = extract_links("HTTPS://X.COM/MixedCase/STATUS/99");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].handle, "MixedCase");
        assert_eq!(links[0].url, "HTTPS://X.COM/MixedCase/STATUS/99");
    }

    #[test]
    fn non_post_urls_are_ignored() {
        assert!(extract_links("").is_empty());
        assert!(extract_links("https://x.com/alice").is_empty());
        assert!(extract_links("https://x.com/alice/status/abc").is_empty());
        assert!(extract_links("https://example.com/alice/status/1").is_empty());
        assert!(extract_links("x.com/alice/status/1").is_empty());
    }

    #[test]
    fn detects_done_phrases_as_whole_words() {
        assert!(looks_like_done("done"));
        assert!(looks_like_done("DONE!"));
        assert!(looks_like_done("all done here"));
        assert!(looks_like_done("ad"));
        assert!(looks_like_done("Dn ✅"));
        assert!(looks_like_done("task completed"));
    }

    #[test]
    fn rejects_partial_words() {
        assert!(!looks_like_done("undone"));
        assert!(!looks_like_done("add me"));
        assert!(!looks_like_done("dnd"));
        assert!(!looks_like_done("not yet"));
    }

    #[test]
    fn every_listed_phrase_matches() {
        for phrase in DONE_PHRASES {
            assert!(looks_like_done(phrase), "{phrase} should match");
        }
    }
}
