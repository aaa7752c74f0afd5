//! Mention and hashtag extraction from message text.
//!
//! Tokens are `@` or `#` followed by one or more word characters. The sigil
//! is stripped, so `@bob` yields `bob` and `#spark` yields `spark`; authors
//! are normalized the same way (see [`normalize_author`]) so both sides join
//! on the bare name.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

static MENTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@(\w+)").unwrap_or_else(|e| panic!("mention pattern: {e}")));
static HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").unwrap_or_else(|e| panic!("hashtag pattern: {e}")));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entities {
    pub mentions: BTreeSet<String>,
    pub hashtags: BTreeSet<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.mentions.is_empty() && self.hashtags.is_empty()
    }
}

/// Extracts the distinct mentions and hashtags of `text`. `None` and empty
/// text both yield empty sets.
pub fn extract(text: Option<&str>) -> Entities {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Entities::default();
    };
    Entities {
        mentions: captures(&MENTION, text),
        hashtags: captures(&HASHTAG, text),
    }
}

fn captures(pattern: &Regex, text: &str) -> BTreeSet<String> {
    pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Trims an author name and drops one leading `@`. Returns `None` when
/// nothing usable remains.
pub fn normalize_author(author: &str) -> Option<&str> {
    let trimmed = author.trim();
    let name = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    (!name.is_empty()).then_some(name)
}
