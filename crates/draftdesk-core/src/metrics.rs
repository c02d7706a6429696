//! Character accounting and thread splitting.
//!
//! Lengths are counted the way the posting service counts them: every
//! `http://` or `https://` URL occupies a fixed 23 characters no matter how
//! long it really is. Text that does not fit is word-wrapped into a numbered
//! thread (`"1/3 ..."`, `"2/3 ..."`).
//!
//! Lengths are counted in UTF-16 code units, so an emoji outside the Basic
//! Multilingual Plane counts as 2.
//!
//! The free functions use [`LengthBudget::DEFAULT`]. Build a custom
//! [`LengthBudget`] to measure against a different limit.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum visible length of a single post.
pub const MAX_LENGTH: usize = 280;

/// Width every URL is counted as.
pub const URL_LENGTH: usize = 23;

/// Space kept free in each thread segment for its `"N/M "` prefix.
pub const NUMBERING_RESERVE: usize = 5;

/// Longest thread the preview considers postable.
pub const MAX_THREAD_PARTS: usize = 25;

/// Regex for URLs: a scheme followed by everything up to whitespace.
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid regex"));

/// Regex for hashtags.
static HASHTAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[A-Za-z0-9_]+").expect("valid regex"));

/// Regex for mentions anywhere in the text.
static MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("valid regex"));

/// Regex for a mention at the very start of the text.
static LEADING_MENTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@[A-Za-z0-9_]+").expect("valid regex"));

/// Length constraints for a single post and for thread segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LengthBudget {
    /// Maximum total visible length.
    pub max_length: usize,
    /// Counted width of any URL.
    pub url_length: usize,
    /// Characters reserved per segment for the numbering prefix.
    pub numbering_reserve: usize,
    /// Longest thread considered postable.
    pub max_thread_parts: usize,
}

impl LengthBudget {
    /// The 280/23/5 budget of the posting service.
    pub const DEFAULT: Self = Self {
        max_length: MAX_LENGTH,
        url_length: URL_LENGTH,
        numbering_reserve: NUMBERING_RESERVE,
        max_thread_parts: MAX_THREAD_PARTS,
    };

    /// Same budget with a different maximum length.
    pub const fn with_max_length(self, max_length: usize) -> Self {
        Self { max_length, ..self }
    }

    /// Count `text` with every URL collapsed to `url_length` characters.
    pub fn count_length(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }

        let mut count = 0;
        let mut last = 0;
        for m in URL_PATTERN.find_iter(text) {
            count += text_length(&text[last..m.start()]) + self.url_length;
            last = m.end();
        }
        count + text_length(&text[last..])
    }

    /// Whether `text` is longer than `max_length`.
    pub fn is_over_limit(&self, text: &str) -> bool {
        self.count_length(text) > self.max_length
    }

    /// Characters left before the limit. Negative when over.
    pub fn remaining(&self, text: &str) -> i64 {
        self.max_length as i64 - self.count_length(text) as i64
    }

    /// Share of the limit used, capped at 100.
    pub fn percentage(&self, text: &str) -> f64 {
        if self.max_length == 0 {
            return 100.0;
        }
        let used = self.count_length(text) as f64 / self.max_length as f64 * 100.0;
        used.min(100.0)
    }

    /// Split `text` into numbered segments that each fit `max_length`.
    ///
    /// Text that already fits comes back as a single, unnumbered segment.
    /// Otherwise words are packed greedily into segments of at most
    /// `max_length - numbering_reserve` counted characters, and each segment
    /// is prefixed with `"{index}/{total} "`. A word too long for any segment
    /// still gets a segment of its own; it is never cut.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn split_into_thread(&self, text: &str, max_length: usize) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if self.count_length(text) <= max_length {
            return vec![text.to_string()];
        }

        let segment_budget = max_length.saturating_sub(self.numbering_reserve);
        let mut parts: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in text.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if self.count_length(&candidate) <= segment_budget {
                current = candidate;
            } else {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
                current = word.to_string();
            }
        }

        if !current.is_empty() {
            parts.push(current);
        }

        let total = parts.len();
        tracing::debug!(segments = total, max_length, "split text into thread");
        parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| format!("{}/{total} {part}", i + 1))
            .collect()
    }

    /// Summarize `text` against this budget.
    pub fn measure(&self, text: &str) -> LengthReport {
        let length = self.count_length(text);
        LengthReport {
            length,
            limit: self.max_length,
            remaining: self.max_length as i64 - length as i64,
            over_limit: length > self.max_length,
            percentage: self.percentage(text),
        }
    }

    /// Split `text` at this budget's limit and report whether the thread is postable.
    pub fn preview_thread(&self, text: &str) -> ThreadPreview {
        let parts = self.split_into_thread(text, self.max_length);
        let part_count = parts.len();
        ThreadPreview {
            parts,
            part_count,
            exceeds_max_parts: part_count > self.max_thread_parts,
        }
    }
}

impl Default for LengthBudget {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Result of measuring a text against a [`LengthBudget`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LengthReport {
    /// Counted length, URLs normalized.
    pub length: usize,
    /// The limit measured against.
    pub limit: usize,
    /// `limit - length`; negative when over.
    pub remaining: i64,
    /// Whether `length > limit`.
    pub over_limit: bool,
    /// Share of the limit used, capped at 100.
    pub percentage: f64,
}

/// A thread split ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ThreadPreview {
    /// Segments in posting order.
    pub parts: Vec<String>,
    /// Number of segments.
    pub part_count: usize,
    /// Whether the thread has more segments than the service allows.
    pub exceeds_max_parts: bool,
}

/// Count `text` with every URL collapsed to 23 characters.
pub fn count_length(text: &str) -> usize {
    LengthBudget::DEFAULT.count_length(text)
}

/// Whether `text` is longer than 280 counted characters.
pub fn is_over_limit(text: &str) -> bool {
    LengthBudget::DEFAULT.is_over_limit(text)
}

/// Characters left before 280. Negative when over.
pub fn remaining(text: &str) -> i64 {
    LengthBudget::DEFAULT.remaining(text)
}

/// Share of 280 used, in `[0, 100]`.
pub fn percentage(text: &str) -> f64 {
    LengthBudget::DEFAULT.percentage(text)
}

/// Split `text` into numbered segments of at most `max_length` counted characters.
///
/// See [`LengthBudget::split_into_thread`].
pub fn split_into_thread(text: &str, max_length: usize) -> Vec<String> {
    LengthBudget::DEFAULT.split_into_thread(text, max_length)
}

/// Length of `text` in UTF-16 code units, with no URL normalization.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Unique hashtags in order of first appearance. Case-sensitive.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    unique_matches(&HASHTAG_PATTERN, text)
}

/// Unique mentions in order of first appearance. Case-sensitive.
pub fn extract_mentions(text: &str) -> Vec<String> {
    unique_matches(&MENTION_PATTERN, text)
}

/// Whether the trimmed text opens with an `@mention`.
pub fn starts_with_mention(text: &str) -> bool {
    LEADING_MENTION_PATTERN.is_match(text.trim())
}

fn unique_matches(pattern: &Regex, text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect()
}
