//! Core types for the revision quiz engine.

use serde::{Deserialize, Serialize};

/// Similarity a keyword must reach to count as matched, unless a question overrides it.
pub const DEFAULT_KEYWORD_THRESHOLD: f64 = 0.7;

/// How long a card-change transition stays in flight.
pub const DEFAULT_TRANSITION_MS: u64 = 440;

pub const FALLBACK_SUBJECT_ID: &str = "general";
pub const FALLBACK_SUBJECT_LABEL: &str = "General";
pub const FALLBACK_SUBJECT_ICON: &str = "📘";

/// Subject tag used for filtering and interleaving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub label: String,
    pub icon: String,
}

impl Subject {
    pub fn new(id: impl Into<String>, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            icon: icon.into(),
        }
    }

    /// Subject substituted when a question carries none.
    pub fn fallback() -> Self {
        Self::new(FALLBACK_SUBJECT_ID, FALLBACK_SUBJECT_LABEL, FALLBACK_SUBJECT_ICON)
    }
}

impl Default for Subject {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Expected answer of a short-answer question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedText {
    Text(String),
    List(Vec<String>),
}

impl ExpectedText {
    /// Text shown when the model answer is revealed.
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(parts) => parts.join(", "),
        }
    }
}

/// Question shape, selected by the bank's `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    Short {
        answer: ExpectedText,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        keywords: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        match_required: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        keyword_threshold: Option<f64>,
    },
    Mcq {
        choices: Vec<String>,
        answer: String,
    },
    Multi {
        choices: Vec<String>,
        answer: Vec<String>,
    },
    #[serde(rename = "tf")]
    TrueFalse {
        answer: bool,
    },
    /// Data that does not fit its declared type. Never graded as correct.
    Malformed {
        declared: String,
        reason: String,
    },
}

impl QuestionKind {
    /// Canonical type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short { .. } => "short",
            Self::Mcq { .. } => "mcq",
            Self::Multi { .. } => "multi",
            Self::TrueFalse { .. } => "tf",
            Self::Malformed { .. } => "malformed",
        }
    }

    /// Model answer rendered as text, if the question has one.
    pub fn answer_text(&self) -> Option<String> {
        match self {
            Self::Short { answer, .. } => Some(answer.display()),
            Self::Mcq { answer, .. } => Some(answer.clone()),
            Self::Multi { answer, .. } => Some(answer.join(", ")),
            Self::TrueFalse { answer } => Some(if *answer { "True" } else { "False" }.to_string()),
            Self::Malformed { .. } => None,
        }
    }
}

/// One quiz card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub subject: Subject,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripture: Option<String>,
}

impl Question {
    pub fn new(id: impl Into<String>, subject: Subject, kind: QuestionKind) -> Self {
        Self {
            id: id.into(),
            subject,
            topic: String::new(),
            prompt: String::new(),
            kind,
            explanation: None,
            scripture: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

/// A learner's answer. Its shape follows the question type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Text(String),
    Selection(Vec<String>),
}

/// Grading outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Not wrong yet: a partial selection, or text that does not match so far.
    Incomplete,
}

/// Navigation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Prev,
}

/// What to do when a subject filter leaves nothing to study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckPolicy {
    /// An explicit filter is honoured even when it yields an empty deck.
    Strict,
    /// An empty result over a non-empty pool falls back to the whole pool.
    FallbackToPool,
}

impl Default for DeckPolicy {
    fn default() -> Self {
        Self::Strict
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub keyword_threshold: f64,
    pub transition_ms: u64,
    pub deck_policy: DeckPolicy,
    pub praise_phrases: Vec<String>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            keyword_threshold: DEFAULT_KEYWORD_THRESHOLD,
            transition_ms: DEFAULT_TRANSITION_MS,
            deck_policy: DeckPolicy::default(),
            praise_phrases: ["Correct!", "Nice one!", "Spot on!", "Great recall!", "Nailed it!"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}
