//! Answer evaluation per question type.
//!
//! Evaluation is pure and total: malformed questions and answers of the wrong
//! shape grade as [`Verdict::Incorrect`], never as an error.

use crate::matching::{comparable, keyword_matches};
use crate::types::{AnswerValue, ExpectedText, Question, QuestionKind, Verdict};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of evaluating an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub verdict: Verdict,
    /// Whether the answer is considered correct.
    pub correct: bool,
    /// Keywords found in a short answer (0 for other types).
    pub matched_keywords: usize,
    /// Keywords a short answer must contain (0 for other types).
    pub required_keywords: usize,
}

impl Evaluation {
    fn of(verdict: Verdict) -> Self {
        Self {
            verdict,
            correct: verdict == Verdict::Correct,
            matched_keywords: 0,
            required_keywords: 0,
        }
    }
}

/// Keywords tested for a short-answer question.
///
/// Explicit keywords win. Otherwise the answer is split on `,` `;` `/` `&`
/// and the words ` and ` / ` or `; a list answer gives one keyword per entry.
/// Other question types have no keywords.
pub fn keywords(question: &Question) -> Vec<String> {
    match &question.kind {
        QuestionKind::Short {
            keywords, answer, ..
        } => {
            if !keywords.is_empty() {
                return keywords.clone();
            }
            match answer {
                ExpectedText::List(parts) => parts.clone(),
                ExpectedText::Text(text) => split_answer(text),
            }
        }
        _ => Vec::new(),
    }
}

/// Number of keywords that must match.
pub fn required_matches(question: &Question, keywords: &[String]) -> usize {
    let requested = match &question.kind {
        QuestionKind::Short { match_required, .. } => *match_required,
        _ => None,
    };

    match requested {
        Some(n) if n > 0 => n.min(keywords.len()),
        _ => usize::from(!keywords.is_empty()),
    }
}

/// Whether `value` answers `question` correctly.
pub fn is_correct(question: &Question, value: &AnswerValue, default_threshold: f64) -> bool {
    evaluate(question, value, default_threshold).correct
}

/// Grade `value` against `question`.
///
/// `default_threshold` applies to short answers without their own
/// `keywordThreshold`.
pub fn evaluate(question: &Question, value: &AnswerValue, default_threshold: f64) -> Evaluation {
    match (&question.kind, value) {
        (QuestionKind::Mcq { answer, .. }, AnswerValue::Text(text)) => {
            let correct = text.trim().to_lowercase() == answer.trim().to_lowercase();
            Evaluation::of(if correct {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            })
        }
        (QuestionKind::Multi { answer, .. }, AnswerValue::Selection(selected)) => {
            Evaluation::of(grade_selection(answer, selected))
        }
        (QuestionKind::TrueFalse { answer }, AnswerValue::Flag(flag)) => {
            Evaluation::of(if flag == answer {
                Verdict::Correct
            } else {
                Verdict::Incorrect
            })
        }
        (
            QuestionKind::Short {
                answer,
                keyword_threshold,
                ..
            },
            AnswerValue::Text(text),
        ) => grade_short(
            question,
            answer,
            text,
            keyword_threshold.unwrap_or(default_threshold),
        ),
        _ => Evaluation::of(Verdict::Incorrect),
    }
}

fn grade_selection(expected: &[String], selected: &[String]) -> Verdict {
    if selected.is_empty() {
        return Verdict::Incomplete;
    }

    let expected: HashSet<&str> = expected.iter().map(String::as_str).collect();
    let selected: HashSet<&str> = selected.iter().map(String::as_str).collect();

    if !selected.is_subset(&expected) {
        Verdict::Incorrect
    } else if selected.len() == expected.len() {
        Verdict::Correct
    } else {
        Verdict::Incomplete
    }
}

fn grade_short(question: &Question, answer: &ExpectedText, text: &str, threshold: f64) -> Evaluation {
    let input = comparable(text);
    if input.is_empty() {
        return Evaluation::of(Verdict::Incorrect);
    }

    let keywords = keywords(question);
    if keywords.is_empty() {
        let matches = input == comparable(&answer.display());
        return Evaluation::of(if matches {
            Verdict::Correct
        } else {
            Verdict::Incomplete
        });
    }

    let required = required_matches(question, &keywords);
    let matched = keywords
        .iter()
        .filter(|keyword| keyword_matches(text, keyword, threshold))
        .count();
    let verdict = if matched >= required {
        Verdict::Correct
    } else {
        Verdict::Incomplete
    };

    Evaluation {
        verdict,
        correct: verdict == Verdict::Correct,
        matched_keywords: matched,
        required_keywords: required,
    }
}

/// Split an answer on punctuation delimiters and the words "and" / "or".
fn split_answer(answer: &str) -> Vec<String> {
    const WORD_SEPARATORS: [&str; 2] = [" and ", " or "];

    let bytes = answer.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let separator_len = if matches!(bytes[i], b',' | b';' | b'/' | b'&') {
            1
        } else {
            WORD_SEPARATORS
                .iter()
                .find(|sep| {
                    bytes
                        .get(i..i + sep.len())
                        .is_some_and(|window| window.eq_ignore_ascii_case(sep.as_bytes()))
                })
                .map_or(0, |sep| sep.len())
        };

        if separator_len > 0 {
            // Separators are ASCII, so both ends sit on char boundaries.
            parts.push(&answer[start..i]);
            i += separator_len;
            start = i;
        } else {
            i += 1;
        }
    }
    parts.push(&answer[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Subject;
    use pretty_assertions::assert_eq;

    fn short(answer: &str) -> Question {
        Question::new(
            "s",
            Subject::fallback(),
            QuestionKind::Short {
                answer: ExpectedText::Text(answer.to_string()),
                keywords: Vec::new(),
                match_required: None,
                keyword_threshold: None,
            },
        )
    }

    fn mcq(answer: &str) -> Question {
        Question::new(
            "m",
            Subject::fallback(),
            QuestionKind::Mcq {
                choices: vec!["Paris".into(), "London".into()],
                answer: answer.to_string(),
            },
        )
    }

    fn multi(answer: &[&str]) -> Question {
        Question::new(
            "x",
            Subject::fallback(),
            QuestionKind::Multi {
                choices: vec!["A".into(), "B".into(), "C".into()],
                answer: answer.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    fn text(value: &str) -> AnswerValue {
        AnswerValue::Text(value.to_string())
    }

    fn selection(values: &[&str]) -> AnswerValue {
        AnswerValue::Selection(values.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_split_answer() {
        assert_eq!(split_answer("a, b; c / d & e"), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(split_answer("cats AND dogs or birds"), vec!["cats", "dogs", "birds"]);
        assert_eq!(split_answer("android"), vec!["android"]);
        assert_eq!(split_answer(" , ;"), Vec::<String>::new());
        assert_eq!(split_answer("café, crème"), vec!["café", "crème"]);
    }

    #[test]
    fn test_split_answer_splits_content_and() {
        // "and" inside an answer is treated as a separator even when it is content.
        assert_eq!(split_answer("command and control"), vec!["command", "control"]);
    }

    #[test]
    fn test_keywords_prefers_explicit() {
        let mut q = short("photosynthesis, chlorophyll");
        assert_eq!(keywords(&q), vec!["photosynthesis", "chlorophyll"]);

        if let QuestionKind::Short { keywords: k, .. } = &mut q.kind {
            *k = vec!["light".into()];
        }
        assert_eq!(keywords(&q), vec!["light"]);
    }

    #[test]
    fn test_keywords_from_list_answer() {
        let q = Question::new(
            "l",
            Subject::fallback(),
            QuestionKind::Short {
                answer: ExpectedText::List(vec!["faith and works".into(), "grace".into()]),
                keywords: Vec::new(),
                match_required: None,
                keyword_threshold: None,
            },
        );
        assert_eq!(keywords(&q), vec!["faith and works", "grace"]);
        assert!(keywords(&mcq("Paris")).is_empty());
    }

    #[test]
    fn test_required_matches() {
        let mut q = short("a, b, c");
        let kws = keywords(&q);
        assert_eq!(required_matches(&q, &kws), 1);
        assert_eq!(required_matches(&q, &[]), 0);

        if let QuestionKind::Short { match_required, .. } = &mut q.kind {
            *match_required = Some(5);
        }
        assert_eq!(required_matches(&q, &kws), 3);
    }

    #[test]
    fn test_mcq() {
        assert!(is_correct(&mcq("Paris"), &text("paris"), 0.7));
        assert!(is_correct(&mcq("Paris"), &text("  PARIS "), 0.7));
        assert!(!is_correct(&mcq("Paris"), &text("London"), 0.7));
        assert!(!is_correct(&mcq("Paris"), &AnswerValue::Flag(true), 0.7));
    }

    #[test]
    fn test_multi_exact_set() {
        assert!(is_correct(&multi(&["A", "B"]), &selection(&["B", "A"]), 0.7));
        assert!(is_correct(&multi(&["A", "B"]), &selection(&["A", "B", "A"]), 0.7));
        assert!(!is_correct(&multi(&["A", "B"]), &selection(&["A"]), 0.7));
    }

    #[test]
    fn test_multi_verdicts() {
        let q = multi(&["A", "B"]);
        assert_eq!(evaluate(&q, &selection(&[]), 0.7).verdict, Verdict::Incomplete);
        assert_eq!(evaluate(&q, &selection(&["A"]), 0.7).verdict, Verdict::Incomplete);
        assert_eq!(evaluate(&q, &selection(&["A", "C"]), 0.7).verdict, Verdict::Incorrect);
        assert_eq!(evaluate(&q, &selection(&["B", "A"]), 0.7).verdict, Verdict::Correct);
    }

    #[test]
    fn test_true_false() {
        let q = Question::new("t", Subject::fallback(), QuestionKind::TrueFalse { answer: false });
        assert!(is_correct(&q, &AnswerValue::Flag(false), 0.7));
        assert!(!is_correct(&q, &AnswerValue::Flag(true), 0.7));
        assert!(!is_correct(&q, &text("false"), 0.7));
    }

    #[test]
    fn test_short_answer_scenario() {
        let q = short("photosynthesis, chlorophyll");
        let result = evaluate(&q, &text("fotosynthesis"), 0.7);
        assert!(result.correct);
        assert_eq!(result.matched_keywords, 1);
        assert_eq!(result.required_keywords, 1);

        let result = evaluate(&q, &text("mitosis"), 0.7);
        assert!(!result.correct);
        assert_eq!(result.verdict, Verdict::Incomplete);
    }

    #[test]
    fn test_short_empty_input_is_incorrect() {
        let q = short("photosynthesis");
        assert_eq!(evaluate(&q, &text(""), 0.7).verdict, Verdict::Incorrect);
        assert_eq!(evaluate(&q, &text("   "), 0.7).verdict, Verdict::Incorrect);
        assert_eq!(evaluate(&q, &text("?!"), 0.7).verdict, Verdict::Incorrect);
    }

    #[test]
    fn test_short_required_count() {
        let mut q = short("faith, hope, love");
        if let QuestionKind::Short { match_required, .. } = &mut q.kind {
            *match_required = Some(2);
        }
        assert!(!is_correct(&q, &text("faith"), 0.7));
        assert!(is_correct(&q, &text("faith and love"), 0.7));
    }

    #[test]
    fn test_short_threshold_override() {
        let mut q = short("photosynthesis");
        if let QuestionKind::Short {
            keyword_threshold, ..
        } = &mut q.kind
        {
            *keyword_threshold = Some(0.95);
        }
        assert!(!is_correct(&q, &text("fotosynthesis"), 0.7));
        assert!(is_correct(&q, &text("photosynthesis"), 0.7));
    }

    #[test]
    fn test_short_without_keywords_uses_full_answer() {
        let q = short(" & ");
        assert!(keywords(&q).is_empty());
        assert_eq!(required_matches(&q, &[]), 0);
        assert_eq!(evaluate(&q, &text("&"), 0.7).verdict, Verdict::Incorrect);
        assert_eq!(evaluate(&q, &text("anything"), 0.7).verdict, Verdict::Incomplete);
    }

    #[test]
    fn test_malformed_never_correct() {
        let q = Question::new(
            "bad",
            Subject::fallback(),
            QuestionKind::Malformed {
                declared: "mcq".into(),
                reason: "missing answer".into(),
            },
        );
        for value in [text(""), text("x"), AnswerValue::Flag(true), selection(&["x"])] {
            assert_eq!(evaluate(&q, &value, 0.7).verdict, Verdict::Incorrect);
        }
    }

    #[test]
    fn test_wrong_shape_is_incorrect() {
        assert!(!is_correct(&multi(&["A"]), &text("A"), 0.7));
        assert!(!is_correct(&short("x"), &selection(&["x"]), 0.7));
    }

    #[test]
    fn test_reevaluation_is_idempotent() {
        let q = short("photosynthesis, chlorophyll");
        let first = evaluate(&q, &text("chlorofyll"), 0.7);
        let second = evaluate(&q, &text("chlorofyll"), 0.7);
        assert_eq!(first, second);
    }
}
