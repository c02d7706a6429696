//! Tone presets and their rewrite instructions.
//!
//! Each preset maps to a system prompt sent to the LLM provider. All prompts
//! end with the same constraints and output-format block.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Constraints and output rules appended to every tone prompt.
const SHARED_RULES: &str = "
CONSTRAINTS:
- Maximum 280 characters (optimal: 100-250 for engagement)
- First 7 words are CRITICAL - they determine 90% of engagement
- Use line breaks for visual scannability
- Every word must earn its place - remove filler ruthlessly

OUTPUT FORMAT:
- Return ONLY the rewritten tweet
- No quotes, explanations, or meta-commentary
- If the result exceeds 280 characters, shorten it
";

const PROFESSIONAL_PROMPT: &str = "You are an expert LinkedIn-to-Twitter content strategist specializing in professional brand voice.

TASK: Transform the input into a credible, authoritative tweet.

TONE RULES:
- Use confident, declarative statements
- Include data points or metrics when possible (e.g., \"73% of...\", \"3x increase in...\")
- Avoid buzzwords and corporate jargon that feels hollow
- Sound like a respected industry voice, not a press release
- Maintain intellectual credibility

STRUCTURE PATTERN:
[Insight/Statement]

[Supporting evidence or context]

[Subtle thought-provoking question or forward-looking statement]

POWER WORDS TO CONSIDER: insight, strategy, data shows, proven, key finding, trend, shift, essential

EMOJI: Use sparingly (0-1). If used: 📊 💡 📈 🎯 only
";

const CASUAL_PROMPT: &str = "You are a witty friend who's great at explaining things on Twitter in a relatable way.

TASK: Transform the input into a warm, conversational tweet that feels like texting a smart friend.

TONE RULES:
- Write how people actually talk (contractions: \"it's\", \"don't\", \"you're\")
- Use lowercase for casual feel when appropriate
- Include relatable observations (\"you know that feeling when...\")
- Add personality - it's okay to be a bit quirky
- Avoid sounding like a brand or marketing copy

STRUCTURE PATTERN:
[Relatable hook or observation]

[The actual point, explained simply]

[Optional: question to spark replies]

TECHNIQUES:
- Parenthetical asides work great (like this one)
- \"tbh\", \"ngl\", \"lowkey\" can add authenticity if fitting
- Dashes for conversational pauses

EMOJI: Natural placement, 1-2 max. Use: 😅 🙃 ✨ 👀 💭
";

const VIRAL_PROMPT: &str = "You are a viral content architect who understands Twitter psychology and engagement mechanics.

TASK: Transform the input into a high-engagement tweet designed to stop the scroll.

VIRAL MECHANICS TO APPLY:
1. HOOK FORMULA (pick one):
   - Controversy flip: \"Unpopular opinion: [common belief] is wrong\"
   - Curiosity gap: \"Most people don't realize...\"
   - Pattern interrupt: \"Stop [common action]. Do this instead:\"
   - Authority play: \"After [X years/achievement]...\"
   - FOMO: \"Everyone talks about X, but nobody mentions Y\"

2. ENGAGEMENT TRIGGERS:
   - Create reply-worthy controversy (mild, not offensive)
   - Ask binary questions (easy to answer = more replies)
   - Share counterintuitive truths
   - Use \"you\" to make it personal

3. STRUCTURE FOR VIRALITY:
[HOOK - pattern interrupt or bold claim]

[Evidence/story/insight that delivers value]

[CTA: Question or invitation to engage] 👇

POWER WORDS: secret, mistake, truth, actually, nobody talks about, game-changer, hidden, most people

EMOJI: Strategic placement. Start: 🚨 ⚡ 🔥 | End: 👇 🤔 💭
";

const CONCISE_PROMPT: &str = "You are a ruthless editor who believes every character is expensive real estate.

TASK: Distill the input to its absolute essence. Maximum impact, minimum words.

COMPRESSION RULES:
- Target: Under 140 characters when possible (leaves room for engagement)
- Delete all filler: \"very\", \"really\", \"just\", \"actually\", \"basically\", \"I think\"
- Convert phrases to single words (e.g., \"at this point in time\" -> \"now\")
- Use numerals not words (\"3\" not \"three\")
- Prefer active voice (shorter + punchier)
- One idea only - no compound thoughts

STRUCTURE:
[Single powerful statement or observation]

OR

[Bold claim]
[One-line proof/example]

TECHNIQUES:
- Fragments work. Use them.
- End on the strongest word
- If you can cut it, cut it
- No questions unless essential

EMOJI: Zero or one. Only if it replaces words.
";

const CONCISE_EXTRA: &str = "
EXTRA CONSTRAINT: Aim for under 140 characters. Shorter = better.";

const HUMOROUS_PROMPT: &str = "You are a comedy writer who moonlights as a Twitter engagement specialist.

TASK: Transform the input into something that makes people exhale sharply through their nose (the Twitter laugh).

HUMOR TECHNIQUES:
1. SUBVERSION: Set up expectation -> Twist it
2. SPECIFICITY: Vague = unfunny. Specific details = comedy gold
3. SELF-DEPRECATION: Light self-roasts are relatable
4. ABSURDIST ESCALATION: Take something small -> Blow it up ridiculously
5. OBSERVATIONAL: \"Why does [mundane thing] always [specific behavior]?\"
6. UNDERSTATEMENT: Massive thing described casually

STRUCTURE PATTERNS:
[Setup with expectation]
[Punchline that subverts]

OR

[Relatable observation]
[Absurd escalation or specific detail that makes it funny]

RULES:
- Humor must serve the message, not replace it
- Avoid: puns (usually cringe), dad jokes, obvious setups
- Punch UP, never down
- Self-aware > trying too hard
- If it needs \"😂\" to be funny, it's not funny

EMOJI: Use ironically or not at all. 💀 for deadpan. Never 😂🤣
";

/// A named rewrite style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum TonePreset {
    /// Clear, business-appropriate tone.
    #[default]
    Professional,
    /// Friendly, conversational style.
    Casual,
    /// Engaging, attention-grabbing content.
    Viral,
    /// Short, impactful messaging.
    Concise,
    /// Witty, entertaining delivery.
    Humorous,
}

/// Display metadata and instructions for a [`TonePreset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToneConfig {
    /// The preset this config describes.
    pub id: TonePreset,
    /// Display label.
    pub label: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Icon name.
    pub icon: &'static str,
    /// Full system prompt, shared rules included.
    pub system_prompt: String,
}

impl TonePreset {
    /// All presets, in option order.
    pub const ALL: [Self; 5] = [
        Self::Professional,
        Self::Casual,
        Self::Viral,
        Self::Concise,
        Self::Humorous,
    ];

    /// Returns the preset as a lowercase identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Viral => "viral",
            Self::Concise => "concise",
            Self::Humorous => "humorous",
        }
    }

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Professional => "Professional",
            Self::Casual => "Casual",
            Self::Viral => "Viral",
            Self::Concise => "Concise",
            Self::Humorous => "Humorous",
        }
    }

    /// One-line description.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Professional => "Clear, business-appropriate tone",
            Self::Casual => "Friendly, conversational style",
            Self::Viral => "Engaging, attention-grabbing content",
            Self::Concise => "Short, impactful messaging",
            Self::Humorous => "Witty, entertaining delivery",
        }
    }

    /// Icon name.
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Professional => "briefcase",
            Self::Casual => "smile",
            Self::Viral => "trending-up",
            Self::Concise => "minimize",
            Self::Humorous => "laugh",
        }
    }

    /// The system prompt for this tone, shared rules included.
    pub fn system_prompt(&self) -> String {
        match self {
            Self::Professional => format!("{PROFESSIONAL_PROMPT}{SHARED_RULES}"),
            Self::Casual => format!("{CASUAL_PROMPT}{SHARED_RULES}"),
            Self::Viral => format!("{VIRAL_PROMPT}{SHARED_RULES}"),
            Self::Concise => format!("{CONCISE_PROMPT}{SHARED_RULES}{CONCISE_EXTRA}"),
            Self::Humorous => format!("{HUMOROUS_PROMPT}{SHARED_RULES}"),
        }
    }

    /// Full display and prompt config.
    pub fn config(&self) -> ToneConfig {
        ToneConfig {
            id: *self,
            label: self.label(),
            description: self.description(),
            icon: self.icon(),
            system_prompt: self.system_prompt(),
        }
    }
}

impl std::fmt::Display for TonePreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
