//! Question bank loader.
//!
//! # Format
//! ```json
//! [
//!   {
//!     "id": "q1",
//!     "subject": { "id": "bio", "label": "Biology", "icon": "🧬" },
//!     "topic": "Plants",
//!     "type": "short",
//!     "prompt": "How do plants make food?",
//!     "answer": "photosynthesis, chlorophyll"
//!   }
//! ]
//! ```
//!
//! The array may also be wrapped as `{ "questions": [...] }`. Only a broken
//! document, a missing ID or a duplicate ID is an error; a question whose
//! fields do not fit its type is loaded as [`QuestionKind::Malformed`].

use crate::error::{BankError, Result};
use crate::types::{
    ExpectedText, Question, QuestionKind, Subject, FALLBACK_SUBJECT_ICON, FALLBACK_SUBJECT_ID,
    FALLBACK_SUBJECT_LABEL,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

/// Immutable set of questions, loaded once and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Arc<Question>>,
    subjects: Vec<Subject>,
}

impl QuestionBank {
    /// Parse a JSON question bank.
    pub fn from_json(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let document: Value = serde_json::from_str(content)?;
        let entries = match document {
            Value::Array(entries) => entries,
            Value::Object(mut object) => match object.remove("questions") {
                Some(Value::Array(entries)) => entries,
                _ => return Err(BankError::UnexpectedShape),
            },
            _ => return Err(BankError::UnexpectedShape),
        };

        let questions = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                Value::Object(fields) => parse_question(fields, index),
                _ => Err(BankError::NotAnObject { index }),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_questions(questions)
    }

    /// Build a bank from already-typed questions.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self> {
        let mut seen_ids = HashSet::new();
        for (index, question) in questions.iter().enumerate() {
            if question.id.is_empty() {
                return Err(BankError::MissingId { index });
            }
            if !seen_ids.insert(question.id.as_str()) {
                return Err(BankError::DuplicateId {
                    id: question.id.clone(),
                    index,
                });
            }
        }

        let questions: Vec<Arc<Question>> = questions.into_iter().map(Arc::new).collect();
        let subjects = collect_subjects(&questions);
        Ok(Self {
            questions,
            subjects,
        })
    }

    pub fn questions(&self) -> &[Arc<Question>] {
        &self.questions
    }

    /// Distinct subjects in first-seen order.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject_ids(&self) -> Vec<String> {
        self.subjects.iter().map(|s| s.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Question>> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Distinct subjects of `questions`, deduplicated by ID in first-seen order.
pub fn collect_subjects(questions: &[Arc<Question>]) -> Vec<Subject> {
    let mut seen = HashSet::new();
    questions
        .iter()
        .filter(|q| seen.insert(q.subject.id.as_str()))
        .map(|q| q.subject.clone())
        .collect()
}

/// Derive a subject from the raw `subject` field.
pub fn normalize_subject(raw: Option<&Value>) -> Subject {
    match raw {
        Some(Value::Object(fields)) => {
            let id = text_field(fields, "id");
            let label = text_field(fields, "label");
            let icon = text_field(fields, "icon").unwrap_or_else(|| FALLBACK_SUBJECT_ICON.into());
            Subject {
                id: id
                    .clone()
                    .or_else(|| label.clone())
                    .unwrap_or_else(|| FALLBACK_SUBJECT_ID.into()),
                label: label.or(id).unwrap_or_else(|| FALLBACK_SUBJECT_LABEL.into()),
                icon,
            }
        }
        Some(Value::String(name)) if !name.is_empty() => {
            Subject::new(name.as_str(), name.as_str(), FALLBACK_SUBJECT_ICON)
        }
        _ => Subject::fallback(),
    }
}

fn parse_question(fields: &Map<String, Value>, index: usize) -> Result<Question> {
    let id = text_field(fields, "id").ok_or(BankError::MissingId { index })?;
    let kind = parse_kind(fields).unwrap_or_else(|(declared, reason)| {
        warn!(question_id = %id, declared = %declared, reason = %reason, "Malformed question");
        QuestionKind::Malformed { declared, reason }
    });

    Ok(Question {
        subject: normalize_subject(fields.get("subject")),
        topic: text_field(fields, "topic").unwrap_or_default(),
        prompt: text_field(fields, "prompt").unwrap_or_default(),
        explanation: text_field(fields, "explanation"),
        scripture: text_field(fields, "scripture"),
        kind,
        id,
    })
}

type ShapeError = (String, String);

fn parse_kind(fields: &Map<String, Value>) -> std::result::Result<QuestionKind, ShapeError> {
    let declared = match fields.get("type") {
        None | Some(Value::Null) => "short".to_string(),
        Some(Value::String(name)) => name.trim().to_lowercase(),
        Some(other) => return Err((other.to_string(), "type is not a string".into())),
    };
    let fail = |reason: &str| (declared.clone(), reason.to_string());
    let answer = fields.get("answer").filter(|v| !v.is_null());

    match declared.as_str() {
        "short" | "text" => {
            let answer = match answer {
                Some(Value::Array(items)) => ExpectedText::List(
                    items
                        .iter()
                        .map(scalar_text)
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| fail("answer list holds a non-scalar"))?,
                ),
                Some(value) => {
                    ExpectedText::Text(scalar_text(value).ok_or_else(|| fail("answer is not text"))?)
                }
                None => return Err(fail("missing answer")),
            };
            let keywords = match fields.get("keywords") {
                None | Some(Value::Null) => Vec::new(),
                Some(value) => string_list(value).ok_or_else(|| fail("keywords is not a list"))?,
            };
            let match_required = count_field(fields, "matchRequired")
                .or_else(|| count_field(fields, "requiredKeywords"));
            let keyword_threshold = fields
                .get("keywordThreshold")
                .and_then(Value::as_f64)
                .filter(|t| (0.0..=1.0).contains(t));

            Ok(QuestionKind::Short {
                answer,
                keywords,
                match_required,
                keyword_threshold,
            })
        }
        "mcq" => {
            let answer = answer
                .and_then(scalar_text)
                .ok_or_else(|| fail("answer is not text"))?;
            Ok(QuestionKind::Mcq {
                choices: choices(fields).ok_or_else(|| fail("choices is not a list"))?,
                answer,
            })
        }
        "multi" => {
            let answer = answer
                .and_then(string_list)
                .ok_or_else(|| fail("answer is not a list"))?;
            if answer.is_empty() {
                return Err(fail("answer list is empty"));
            }
            Ok(QuestionKind::Multi {
                choices: choices(fields).ok_or_else(|| fail("choices is not a list"))?,
                answer,
            })
        }
        "tf" | "boolean" => {
            let answer = match answer {
                Some(Value::Bool(flag)) => *flag,
                Some(Value::String(text)) => match text.trim().to_lowercase().as_str() {
                    "true" => true,
                    "false" => false,
                    _ => return Err(fail("answer is not a boolean")),
                },
                _ => return Err(fail("answer is not a boolean")),
            };
            Ok(QuestionKind::TrueFalse { answer })
        }
        _ => Err(fail("unknown question type")),
    }
}

/// Strings and numbers as text; anything else is rejected.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array()?.iter().map(scalar_text).collect()
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(scalar_text)
        .filter(|text| !text.is_empty())
}

fn count_field(fields: &Map<String, Value>, key: &str) -> Option<usize> {
    let value = fields.get(key)?;
    let count = value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))?;
    usize::try_from(count).ok().filter(|n| *n > 0)
}

fn choices(fields: &Map<String, Value>) -> Option<Vec<String>> {
    match fields.get("choices") {
        None | Some(Value::Null) => Some(Vec::new()),
        Some(value) => string_list(value),
    }
}
