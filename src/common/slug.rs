use std::sync::LazyLock;

use ahash::AHashSet;
use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]+").unwrap());
static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// URL-safe identifier for a human-readable name.
///
/// Lowercases and trims, turns whitespace runs into single hyphens, strips
/// everything outside `[a-z0-9_-]`, then collapses repeated hyphens.
/// `slugify("Dhaka - 10") == "dhaka-10"`.
pub fn slugify(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lowered, "-");
    let stripped = NON_WORD.replace_all(&hyphenated, "");
    HYPHEN_RUN.replace_all(&stripped, "-").into_owned()
}

/// Hands out unique document ids within one collection.
///
/// The first claim of a slug gets it unchanged; later claims of the same slug
/// get `-2`, `-3`, ... appended.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    taken: AHashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self { Self::default() }

    /// Claim a unique id derived from `base`. Empty slugs become `unnamed`.
    pub fn claim(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "unnamed" } else { base };
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.taken.insert(candidate.clone()))
            .unwrap_or_else(|| base.to_string())
    }

    /// Number of ids handed out so far.
    pub fn len(&self) -> usize { self.taken.len() }

    pub fn is_empty(&self) -> bool { self.taken.is_empty() }
}
