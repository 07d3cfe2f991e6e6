//! A learner's quiz session.
//!
//! Owns the subject selection, the deck, navigation state and the per-question
//! answer, praise and reveal maps. All mutation goes through `&mut self`, one
//! event at a time.

use crate::bank::QuestionBank;
use crate::clock::Clock;
use crate::evaluator::{evaluate, Evaluation};
use crate::scheduler::{build_deck_with_policy, Navigator, Transition};
use crate::types::{AnswerValue, Direction, EngineSettings, Question, Verdict};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub struct QuizSession {
    bank: Arc<QuestionBank>,
    settings: EngineSettings,
    clock: Arc<dyn Clock>,
    selected: Vec<String>,
    deck: Vec<Arc<Question>>,
    navigator: Navigator,
    answers: HashMap<String, AnswerValue>,
    praise: HashMap<String, String>,
    revealed: HashMap<String, bool>,
    praise_cursor: usize,
}

impl QuizSession {
    /// Start a session with every subject of the bank selected.
    pub fn new(bank: Arc<QuestionBank>, settings: EngineSettings, clock: Arc<dyn Clock>) -> Self {
        let selected = bank.subject_ids();
        let navigator = Navigator::new(settings.transition_ms);
        let mut session = Self {
            bank,
            settings,
            clock,
            selected,
            deck: Vec::new(),
            navigator,
            answers: HashMap::new(),
            praise: HashMap::new(),
            revealed: HashMap::new(),
            praise_cursor: 0,
        };
        session.rebuild();
        session
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn selected_subjects(&self) -> &[String] {
        &self.selected
    }

    pub fn deck(&self) -> &[Arc<Question>] {
        &self.deck
    }

    pub fn index(&self) -> usize {
        self.navigator.index()
    }

    pub fn current(&self) -> Option<&Arc<Question>> {
        self.deck.get(self.navigator.index())
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.navigator.transition()
    }

    pub fn is_transitioning(&self) -> bool {
        self.navigator.is_transitioning()
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    pub fn praise_for(&self, question_id: &str) -> Option<&str> {
        self.praise.get(question_id).map(String::as_str)
    }

    pub fn is_revealed(&self, question_id: &str) -> bool {
        self.revealed.get(question_id).copied().unwrap_or(false)
    }

    /// Replace the subject selection and rebuild the deck.
    pub fn select_subjects(&mut self, ids: Vec<String>) {
        self.selected = ids;
        self.rebuild();
    }

    /// Add or remove one subject and rebuild the deck.
    pub fn toggle_subject(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
        self.rebuild();
    }

    /// Record and grade an answer for a card in the deck.
    ///
    /// Praise is attached the moment the answer becomes correct and dropped as
    /// soon as it no longer is. Returns `None` for an ID outside the deck.
    pub fn answer(&mut self, question_id: &str, value: AnswerValue) -> Option<Evaluation> {
        let question = self.deck.iter().find(|q| q.id == question_id)?;
        let evaluation = evaluate(question, &value, self.settings.keyword_threshold);
        self.answers.insert(question_id.to_string(), value);

        if evaluation.verdict == Verdict::Correct {
            if !self.praise.contains_key(question_id) {
                let phrase = self.next_praise();
                self.praise.insert(question_id.to_string(), phrase);
            }
        } else {
            self.praise.remove(question_id);
        }

        Some(evaluation)
    }

    /// Flip whether the model answer is shown. Returns the new state.
    pub fn toggle_reveal(&mut self, question_id: &str) -> Option<bool> {
        if !self.deck.iter().any(|q| q.id == question_id) {
            return None;
        }
        let shown = self.revealed.entry(question_id.to_string()).or_insert(false);
        *shown = !*shown;
        Some(*shown)
    }

    /// Request a move to the neighbouring card.
    pub fn advance(&mut self, direction: Direction) -> Option<Transition> {
        let now = self.clock.now_ms();
        self.navigator.tick(now);
        self.navigator.advance(&self.deck, direction, now)
    }

    /// Commit a transition whose time is up. Returns whether one was committed.
    pub fn poll(&mut self) -> bool {
        self.navigator.tick(self.clock.now_ms())
    }

    fn rebuild(&mut self) {
        self.deck = build_deck_with_policy(
            self.bank.questions(),
            &self.selected,
            self.settings.deck_policy,
        );
        self.navigator.reset();
        self.answers.clear();
        self.praise.clear();
        self.revealed.clear();
        debug!(
            subjects = ?self.selected,
            cards = self.deck.len(),
            "Session deck rebuilt"
        );
    }

    fn next_praise(&mut self) -> String {
        let phrases = &self.settings.praise_phrases;
        if phrases.is_empty() {
            return "Correct!".to_string();
        }
        let phrase = phrases[self.praise_cursor % phrases.len()].clone();
        self.praise_cursor += 1;
        phrase
    }
}
