//! Core data model types for hskquiz.
//!
//! These are the fundamental types the entire quiz system uses to represent
//! vocabulary, levels, choice sets, and session results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single vocabulary word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    /// Unique identifier for this entry.
    pub id: String,
    /// The word in simplified Chinese characters.
    pub chinese: String,
    /// Pinyin with tone marks.
    pub pinyin: String,
    /// Japanese gloss — the answer string shown as a choice.
    ///
    /// Glosses are NOT unique within a set (家 → 家); choice generation
    /// dedups on this text, not on entry identity.
    pub japanese: String,
    /// Category tag for grouping (基本, 色, 動物, ...).
    #[serde(default)]
    pub category: String,
}

/// A named, immutable collection of vocabulary entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabSet {
    /// Set name (e.g. "hsk1").
    pub name: String,
    /// The entries in this set.
    pub entries: Vec<VocabEntry>,
}

/// How a round's prompt is presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Show the characters and pinyin.
    Text,
    /// Play the pronunciation; characters stay hidden.
    Audio,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Text => write!(f, "text"),
            QuestionKind::Audio => write!(f, "audio"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(QuestionKind::Text),
            "audio" => Ok(QuestionKind::Audio),
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// Configuration for a single quiz level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Numeric level id, as shown to the player.
    pub id: u32,
    /// Display name (e.g. "HSK1級-文字").
    pub name: String,
    /// Prompt modality for every round of this level.
    pub kind: QuestionKind,
    /// Name of the vocabulary set this level draws from.
    pub set: String,
    /// The companion level presenting the same set in the other modality.
    #[serde(default)]
    pub paired: Option<u32>,
    /// Per-level round count override.
    #[serde(default)]
    pub questions: Option<usize>,
}

/// A praise or encouragement phrase shown on the result screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub chinese: String,
    pub pinyin: String,
    pub japanese: String,
}

/// The four answer candidates for one round, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceSet {
    /// Exactly four non-empty candidate strings.
    pub options: Vec<String>,
    /// Index of the correct answer after shuffling.
    pub correct_index: usize,
}

impl ChoiceSet {
    /// The correct answer's display text.
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// Scoring bucket a finished session lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    /// At or above the pass threshold.
    Pass,
    /// Below the threshold.
    Encourage,
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTier::Pass => write!(f, "pass"),
            ScoreTier::Encourage => write!(f, "encourage"),
        }
    }
}

/// The evaluated outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Rounds answered correctly.
    pub correct: usize,
    /// Total rounds in the session.
    pub total: usize,
    /// `round(correct / total * 100)`.
    pub percentage: u32,
    /// Tier derived from the percentage and configured threshold.
    pub tier: ScoreTier,
    /// The result message: a random praise for pass, the fixed
    /// encouragement otherwise.
    pub message: Phrase,
}
