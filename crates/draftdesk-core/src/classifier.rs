//! Rhetorical content-type detection.
//!
//! A small rule-based heuristic that guesses whether a draft is a new post,
//! a reply, a comment, or a quote tweet. Four rule groups run in a fixed
//! order and a later match overwrites the type and confidence set by an
//! earlier one; every rule that fires leaves an indicator behind.
//!
//! The result is a guess, not a prediction from a trained model.

use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::metrics::{starts_with_mention, text_length};

/// Indicator recorded when the draft opens with a mention.
pub const MENTION_INDICATOR: &str = "Starts with @mention";
/// Indicator recorded when a quote pattern matches.
pub const QUOTE_INDICATOR: &str = "Contains quote indicators";
/// Indicator recorded when a short reaction pattern matches.
pub const SHORT_RESPONSE_INDICATOR: &str = "Short response pattern";
/// Indicator recorded for short questions and emoji reactions.
pub const SHORT_REACTIVE_INDICATOR: &str = "Short reactive content";

/// Reaction patterns only count below this trimmed length.
const SHORT_RESPONSE_MAX_LEN: usize = 50;
/// Questions and emoji only count below this trimmed length.
const SHORT_REACTIVE_MAX_LEN: usize = 30;

/// Quote-tweet patterns, checked in order.
///
/// Line anchors accept CRLF endings and word boundaries are ASCII-only.
static QUOTE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?mR)^["“”].+["“”]$"#,
        r"(?mR)^>.+",
        r"(?i)this\s*👆",
        r"(?i)(?-u:\b)quote(?-u:\b)",
        r"(?-u:\b)QT(?-u:\b)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Casual reaction openers, checked in order.
static REACTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)^(agreed|exactly|this|yes|no|true|facts|same)",
        r"(?i)^(lol|lmao|haha|wow)",
        r"(?i)^(great|nice|awesome|love this)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Emoji block counted as a reaction (Misc Symbols and Pictographs through Supplemental Symbols).
static EMOJI_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{1F300}-\x{1F9FF}]").expect("valid regex"));

/// The rhetorical type of a draft.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ContentType {
    /// A standalone post.
    #[default]
    NewPost,
    /// A reply addressed to someone.
    Reply,
    /// A short reaction.
    Comment,
    /// A post quoting another post.
    QuoteTweet,
}

impl ContentType {
    /// All content types, in display order.
    pub const ALL: [Self; 4] = [Self::NewPost, Self::Reply, Self::Comment, Self::QuoteTweet];

    /// Returns the content type as its kebab-case identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewPost => "new-post",
            Self::Reply => "reply",
            Self::Comment => "comment",
            Self::QuoteTweet => "quote-tweet",
        }
    }

    /// Human-readable label for badges.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NewPost => "New Post",
            Self::Reply => "Reply",
            Self::Comment => "Comment",
            Self::QuoteTweet => "Quote Tweet",
        }
    }

    /// Icon name for badges.
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::NewPost => "edit",
            Self::Reply => "reply",
            Self::Comment => "message-circle",
            Self::QuoteTweet => "quote",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentAnalysis {
    /// Best-guess content type.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Heuristic confidence in `[0, 1]`.
    pub confidence: f64,
    /// Signals that fired, in rule order.
    pub indicators: Vec<String>,
}

impl ContentAnalysis {
    const fn new(content_type: ContentType, confidence: f64) -> Self {
        Self {
            content_type,
            confidence,
            indicators: Vec::new(),
        }
    }

    fn mark(&mut self, content_type: ContentType, confidence: f64, indicator: &str) {
        self.content_type = content_type;
        self.confidence = confidence;
        self.indicators.push(indicator.to_string());
    }
}

/// Classify a draft into a [`ContentType`].
///
/// Empty or whitespace-only text is a new post with full confidence.
/// Otherwise the rules run in this order, each overwriting the previous
/// match:
///
/// 1. Opens with `@mention` → reply (0.9).
/// 2. Quote markers: a quoted line, a `>` line, "this 👆", "quote", "QT" →
///    quote tweet (0.7).
/// 3. Starts with a reaction word and is under 50 characters → comment (0.6).
/// 4. Under 30 characters, no leading mention, and ends with `?` or holds an
///    emoji → comment (0.5).
///
/// With no match the draft is a new post with confidence 0.5.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn classify(text: &str) -> ContentAnalysis {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return ContentAnalysis::new(ContentType::NewPost, 1.0);
    }

    let length = text_length(trimmed);
    let mut analysis = ContentAnalysis::new(ContentType::NewPost, 0.5);

    if starts_with_mention(trimmed) {
        analysis.mark(ContentType::Reply, 0.9, MENTION_INDICATOR);
    }

    if QUOTE_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        analysis.mark(ContentType::QuoteTweet, 0.7, QUOTE_INDICATOR);
    }

    if length < SHORT_RESPONSE_MAX_LEN && REACTION_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        analysis.mark(ContentType::Comment, 0.6, SHORT_RESPONSE_INDICATOR);
    }

    if length < SHORT_REACTIVE_MAX_LEN && !starts_with_mention(trimmed) {
        let is_question = trimmed.ends_with('?');
        if is_question || EMOJI_PATTERN.is_match(trimmed) {
            analysis.mark(ContentType::Comment, 0.5, SHORT_REACTIVE_INDICATOR);
        }
    }

    tracing::debug!(
        content_type = analysis.content_type.as_str(),
        confidence = analysis.confidence,
        indicators = analysis.indicators.len(),
        "classified draft"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < f64::EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn empty_input_is_confident_new_post() {
        for text in ["", "   ", "\n\t "] {
            let analysis = classify(text);
            assert_eq!(analysis.content_type, ContentType::NewPost);
            assert_close(analysis.confidence, 1.0);
            assert!(analysis.indicators.is_empty());
        }
    }

    #[test]
    fn plain_post_defaults_to_new_post() {
        let analysis = classify("Shipping the new release of our build tool today. Notes inside.");
        assert_eq!(analysis.content_type, ContentType::NewPost);
        assert_close(analysis.confidence, 0.5);
        assert!(analysis.indicators.is_empty());
    }

    #[test]
    fn leading_mention_is_reply() {
        let analysis = classify("@alice thanks!");
        assert_eq!(analysis.content_type, ContentType::Reply);
        assert_close(analysis.confidence, 0.9);
        assert_eq!(analysis.indicators, vec![MENTION_INDICATOR]);
    }

    #[test]
    fn indented_mention_is_reply() {
        let analysis = classify("   @bob see the thread above for details on this");
        assert_eq!(analysis.content_type, ContentType::Reply);
    }

    #[test]
    fn qt_token_is_quote_tweet() {
        let analysis = classify("QT this is wild");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);
        assert_close(analysis.confidence, 0.7);
        assert_eq!(analysis.indicators, vec![QUOTE_INDICATOR]);
    }

    #[test]
    fn lowercase_qt_is_not_a_quote() {
        let analysis = classify("the qt pi in the corner of the office is humming along nicely");
        assert_eq!(analysis.content_type, ContentType::NewPost);
    }

    #[test]
    fn quote_word_is_case_insensitive() {
        let analysis = classify("Favorite Quote of the week from the conference keynote speaker");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);
    }

    #[test]
    fn blockquote_line_is_quote_tweet() {
        let analysis = classify("Worth reading twice:\n> the best code is no code at all");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);
    }

    #[test]
    fn quoted_line_is_quote_tweet() {
        let analysis = classify("“Simplicity is prerequisite for reliability.” Dijkstra was right.\n\"ship it\"");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);
    }

    #[test]
    fn pointing_up_is_quote_tweet() {
        let analysis = classify("Read THIS👆 before you deploy anything on a Friday afternoon");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);
        assert_eq!(analysis.indicators.len(), 1);
    }

    #[test]
    fn quote_indicator_recorded_once() {
        let analysis = classify("QT quote > \"everything\" this 👆 and more words to pad it out");
        assert_eq!(
            analysis
                .indicators
                .iter()
                .filter(|i| *i == QUOTE_INDICATOR)
                .count(),
            1
        );
    }

    #[test]
    fn short_reaction_is_comment() {
        let analysis = classify("lol same");
        assert_eq!(analysis.content_type, ContentType::Comment);
        assert_close(analysis.confidence, 0.6);
        assert_eq!(analysis.indicators, vec![SHORT_RESPONSE_INDICATOR]);
    }

    #[test]
    fn reaction_prefix_matches_inside_words() {
        // The patterns are anchored at the start only, so "this" matches "thistle".
        let analysis = classify("Thistle season is here");
        assert_eq!(analysis.content_type, ContentType::Comment);
    }

    #[test]
    fn long_reaction_is_not_a_comment() {
        let analysis = classify(
            "Agreed, and I would add that the migration plan needs a rollback story too",
        );
        assert_eq!(analysis.content_type, ContentType::NewPost);
    }

    #[test]
    fn short_question_is_reactive_comment() {
        let analysis = classify("Is it out yet?");
        assert_eq!(analysis.content_type, ContentType::Comment);
        assert_close(analysis.confidence, 0.5);
        assert_eq!(analysis.indicators, vec![SHORT_REACTIVE_INDICATOR]);
    }

    #[test]
    fn short_emoji_is_reactive_comment() {
        let analysis = classify("Ship day 🚀");
        assert_eq!(analysis.content_type, ContentType::Comment);
        assert_close(analysis.confidence, 0.5);
    }

    #[test]
    fn reactive_threshold_counts_utf16_units() {
        // 28 + 2 = 30 units, not under the threshold.
        let at_threshold = format!("{}🚀", "a".repeat(28));
        assert_eq!(classify(&at_threshold).content_type, ContentType::NewPost);

        let under = format!("{}🚀", "a".repeat(27));
        assert_eq!(classify(&under).content_type, ContentType::Comment);
    }

    #[test]
    fn quoted_line_with_crlf_is_quote_tweet() {
        let analysis = classify("\"Ship small, ship often.\"\r\nWords to live by, every single week");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);

        let analysis = classify("Worth reading twice:\r\n> the best code is no code at all");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);
    }

    #[test]
    fn quote_word_boundary_is_ascii() {
        let analysis = classify("Favorite équote from the keynote this morning, honestly");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);

        let analysis = classify("The unquoted numbers from the keynote this morning, honestly");
        assert_eq!(analysis.content_type, ContentType::NewPost);
    }

    #[test]
    fn emoji_outside_range_is_ignored() {
        // U+2764 HEAVY BLACK HEART is below the U+1F300 block.
        let analysis = classify("Ship day ❤");
        assert_eq!(analysis.content_type, ContentType::NewPost);
    }

    #[test]
    fn reactive_rule_overrides_reaction_rule() {
        let analysis = classify("wow really?");
        assert_eq!(analysis.content_type, ContentType::Comment);
        assert_close(analysis.confidence, 0.5);
        assert_eq!(
            analysis.indicators,
            vec![SHORT_RESPONSE_INDICATOR, SHORT_REACTIVE_INDICATOR]
        );
    }

    #[test]
    fn reactive_rule_overrides_quote_rule() {
        let analysis = classify("QT anyone?");
        assert_eq!(analysis.content_type, ContentType::Comment);
        assert_eq!(
            analysis.indicators,
            vec![QUOTE_INDICATOR, SHORT_REACTIVE_INDICATOR]
        );
    }

    #[test]
    fn short_mention_question_stays_reply() {
        let analysis = classify("@bob you coming?");
        assert_eq!(analysis.content_type, ContentType::Reply);
        assert_close(analysis.confidence, 0.9);
    }

    #[test]
    fn later_rules_overwrite_reply() {
        let analysis = classify("@carol QT of the year right here, everyone");
        assert_eq!(analysis.content_type, ContentType::QuoteTweet);
        assert_eq!(analysis.indicators, vec![MENTION_INDICATOR, QUOTE_INDICATOR]);
    }

    #[test]
    fn classification_is_deterministic() {
        let text = "lol this 👆";
        assert_eq!(classify(text), classify(text));
    }

    #[test]
    fn labels_and_icons() {
        assert_eq!(ContentType::NewPost.label(), "New Post");
        assert_eq!(ContentType::QuoteTweet.label(), "Quote Tweet");
        assert_eq!(ContentType::Comment.icon(), "message-circle");
        assert_eq!(ContentType::Reply.icon(), "reply");
    }

    #[test]
    fn serializes_type_field_in_kebab_case() {
        let json = serde_json::to_value(classify("QT this is wild")).unwrap();
        assert_eq!(json["type"], "quote-tweet");
        assert_eq!(json["indicators"][0], QUOTE_INDICATOR);
    }
}
