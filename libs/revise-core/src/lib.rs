//! Grading and scheduling engine for the revision quiz.
//!
//! Provides:
//! - Fuzzy keyword matching for short answers (edit-distance similarity)
//! - Answer evaluation for short, multiple-choice, multi-select and true/false cards
//! - Subject-interleaved deck building and timed card navigation
//! - Quiz sessions tracking answers, praise and revealed answers
//! - A JSON question bank loader

pub mod bank;
pub mod clock;
pub mod error;
pub mod evaluator;
pub mod matching;
pub mod scheduler;
pub mod session;
pub mod types;

pub use bank::QuestionBank;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{BankError, Result};
pub use evaluator::{evaluate, is_correct, keywords, required_matches, Evaluation};
pub use matching::{edit_distance, keyword_matches, normalize, similarity};
pub use scheduler::{build_deck, build_deck_with_policy, Navigator, Transition};
pub use session::QuizSession;
pub use types::{
    AnswerValue, DeckPolicy, Direction, EngineSettings, ExpectedText, Question, QuestionKind,
    Subject, Verdict, DEFAULT_KEYWORD_THRESHOLD, DEFAULT_TRANSITION_MS,
};
