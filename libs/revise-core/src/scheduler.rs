//! Deck building and card navigation.
//!
//! Decks interleave subjects round-robin so that consecutive cards come from
//! different subjects whenever more than one is selected. Moving between
//! cards goes through a timed transition; see [`Navigator`].

use crate::bank::collect_subjects;
use crate::types::{DeckPolicy, Direction, Question};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Build an interleaved deck from `pool` for the selected subject IDs.
///
/// Questions keep their pool order within a subject. Subjects take turns in
/// selection order until every queue is drained. An empty selection yields an
/// empty deck.
pub fn build_deck(pool: &[Arc<Question>], selected: &[String]) -> Vec<Arc<Question>> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    for id in selected {
        let next = slots.len();
        slots.entry(id.as_str()).or_insert(next);
    }

    let mut queues: Vec<VecDeque<Arc<Question>>> = vec![VecDeque::new(); slots.len()];
    for question in pool {
        if let Some(&slot) = slots.get(question.subject.id.as_str()) {
            queues[slot].push_back(Arc::clone(question));
        }
    }

    let total = queues.iter().map(VecDeque::len).sum();
    let mut deck = Vec::with_capacity(total);
    while deck.len() < total {
        for queue in &mut queues {
            if let Some(question) = queue.pop_front() {
                deck.push(question);
            }
        }
    }

    debug!(
        pool = pool.len(),
        subjects = slots.len(),
        cards = deck.len(),
        "Built deck"
    );
    deck
}

/// [`build_deck`], falling back to the whole pool when the policy allows it
/// and the filter left nothing.
pub fn build_deck_with_policy(
    pool: &[Arc<Question>],
    selected: &[String],
    policy: DeckPolicy,
) -> Vec<Arc<Question>> {
    let deck = build_deck(pool, selected);
    if deck.is_empty() && !pool.is_empty() && policy == DeckPolicy::FallbackToPool {
        let all: Vec<String> = collect_subjects(pool).into_iter().map(|s| s.id).collect();
        debug!("Subject filter matched nothing, using the whole pool");
        return build_deck(pool, &all);
    }
    deck
}

/// A card change in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub direction: Direction,
    pub leaving: Arc<Question>,
    pub incoming: Arc<Question>,
    pub target_index: usize,
    pub started_at_ms: u64,
    pub completes_at_ms: u64,
}

/// Position in a deck plus at most one in-flight transition.
///
/// `Idle` when no transition is stored. [`Navigator::advance`] only starts a
/// transition from `Idle`; [`Navigator::tick`] commits it once its duration
/// has elapsed. There is no cancellation short of [`Navigator::reset`].
#[derive(Debug, Clone)]
pub struct Navigator {
    index: usize,
    transition: Option<Transition>,
    duration_ms: u64,
}

impl Navigator {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            index: 0,
            transition: None,
            duration_ms,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn transition(&self) -> Option<&Transition> {
        self.transition.as_ref()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition.is_some()
    }

    /// Start moving one card in `direction`.
    ///
    /// Returns `None` without changing state when a transition is already in
    /// flight or the target lies outside the deck.
    pub fn advance(
        &mut self,
        deck: &[Arc<Question>],
        direction: Direction,
        now_ms: u64,
    ) -> Option<Transition> {
        if self.transition.is_some() {
            debug!(?direction, "Navigation ignored during transition");
            return None;
        }

        let target_index = match direction {
            Direction::Next => self.index.checked_add(1).filter(|&i| i < deck.len()),
            Direction::Prev => self.index.checked_sub(1),
        }?;
        let leaving = Arc::clone(deck.get(self.index)?);
        let incoming = Arc::clone(deck.get(target_index)?);

        let transition = Transition {
            direction,
            leaving,
            incoming,
            target_index,
            started_at_ms: now_ms,
            completes_at_ms: now_ms.saturating_add(self.duration_ms),
        };
        debug!(
            from = self.index,
            to = target_index,
            ?direction,
            "Transition started"
        );
        self.transition = Some(transition.clone());
        Some(transition)
    }

    /// Commit the in-flight transition if it is due. Returns whether it did.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match &self.transition {
            Some(transition) if now_ms >= transition.completes_at_ms => {
                self.index = transition.target_index;
                self.transition = None;
                debug!(index = self.index, "Transition committed");
                true
            }
            _ => false,
        }
    }

    /// Back to `Idle` at the first card, discarding any transition.
    pub fn reset(&mut self) {
        self.index = 0;
        self.transition = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QuestionKind, Subject};
    use pretty_assertions::assert_eq;

    fn card(id: &str, subject: &str) -> Arc<Question> {
        Arc::new(Question::new(
            id,
            Subject::new(subject, subject, "📘"),
            QuestionKind::TrueFalse { answer: true },
        ))
    }

    fn ids(deck: &[Arc<Question>]) -> Vec<&str> {
        deck.iter().map(|q| q.id.as_str()).collect()
    }

    fn selection(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn pool() -> Vec<Arc<Question>> {
        vec![
            card("m1", "math"),
            card("b1", "bio"),
            card("m2", "math"),
            card("h1", "history"),
            card("m3", "math"),
            card("b2", "bio"),
        ]
    }

    #[test]
    fn interleaves_round_robin() {
        let deck = build_deck(&pool(), &selection(&["math", "bio"]));
        assert_eq!(ids(&deck), vec!["m1", "b1", "m2", "b2", "m3"]);
    }

    #[test]
    fn follows_selection_order() {
        let deck = build_deck(&pool(), &selection(&["bio", "history", "math"]));
        assert_eq!(ids(&deck), vec!["b1", "h1", "m1", "b2", "m2", "m3"]);
    }

    #[test]
    fn empty_selection_gives_empty_deck() {
        assert!(build_deck(&pool(), &[]).is_empty());
    }

    #[test]
    fn unknown_and_duplicate_subjects() {
        let deck = build_deck(&pool(), &selection(&["chem", "bio", "bio"]));
        assert_eq!(ids(&deck), vec!["b1", "b2"]);
    }

    #[test]
    fn no_adjacent_repeats_with_balanced_subjects() {
        let deck = build_deck(&pool(), &selection(&["bio", "math"]));
        for pair in deck.windows(2).take(3) {
            assert_ne!(pair[0].subject.id, pair[1].subject.id);
        }
    }

    #[test]
    fn policy_fallback() {
        let pool = pool();
        let strict = build_deck_with_policy(&pool, &[], DeckPolicy::Strict);
        assert!(strict.is_empty());

        let fallback = build_deck_with_policy(&pool, &[], DeckPolicy::FallbackToPool);
        assert_eq!(ids(&fallback), vec!["m1", "b1", "h1", "m2", "b2", "m3"]);

        assert!(build_deck_with_policy(&[], &[], DeckPolicy::FallbackToPool).is_empty());
    }

    #[test]
    fn advance_then_commit() {
        let deck = build_deck(&pool(), &selection(&["math", "bio"]));
        let mut nav = Navigator::new(440);

        let transition = nav.advance(&deck, Direction::Next, 1_000).unwrap();
        assert_eq!(transition.leaving.id, "m1");
        assert_eq!(transition.incoming.id, "b1");
        assert_eq!(transition.completes_at_ms, 1_440);
        assert!(nav.is_transitioning());
        assert_eq!(nav.index(), 0);

        assert!(!nav.tick(1_439));
        assert!(nav.tick(1_440));
        assert_eq!(nav.index(), 1);
        assert!(!nav.is_transitioning());
    }

    #[test]
    fn only_one_transition_in_flight() {
        let deck = build_deck(&pool(), &selection(&["math", "bio"]));
        let mut nav = Navigator::new(440);

        assert!(nav.advance(&deck, Direction::Next, 0).is_some());
        assert!(nav.advance(&deck, Direction::Next, 10).is_none());
        nav.tick(440);
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn rejects_out_of_range() {
        let deck = build_deck(&pool(), &selection(&["bio"]));
        let mut nav = Navigator::new(0);

        assert!(nav.advance(&deck, Direction::Prev, 0).is_none());
        assert!(nav.advance(&deck, Direction::Next, 0).is_some());
        assert!(nav.tick(0));
        assert!(nav.advance(&deck, Direction::Next, 0).is_none());
        assert!(!nav.is_transitioning());

        let transition = nav.advance(&deck, Direction::Prev, 5).unwrap();
        assert_eq!(transition.incoming.id, "b1");
        assert!(Navigator::new(0).advance(&[], Direction::Next, 0).is_none());
    }

    #[test]
    fn reset_discards_transition() {
        let deck = build_deck(&pool(), &selection(&["math"]));
        let mut nav = Navigator::new(440);
        nav.advance(&deck, Direction::Next, 0);
        nav.reset();
        assert!(!nav.is_transitioning());
        assert_eq!(nav.index(), 0);
        assert!(!nav.tick(10_000));
        assert_eq!(nav.index(), 0);
    }
}
