//! Test fixtures and factory functions for creating request bodies.

use serde_json::{json, Value};

/// Question bank with two subjects and every question type.
pub const SAMPLE_BANK: &str = r#"[
    {
        "id": "m1",
        "subject": { "id": "math", "label": "Maths", "icon": "➗" },
        "topic": "Arithmetic",
        "type": "mcq",
        "prompt": "2 + 2?",
        "choices": ["3", "4", "5"],
        "answer": "4"
    },
    {
        "id": "b1",
        "subject": { "id": "bio", "label": "Biology", "icon": "🧬" },
        "topic": "Plants",
        "type": "short",
        "prompt": "How do plants make food?",
        "answer": "photosynthesis, chlorophyll"
    },
    {
        "id": "m2",
        "subject": { "id": "math", "label": "Maths", "icon": "➗" },
        "type": "tf",
        "prompt": "Zero is even.",
        "answer": "true"
    },
    {
        "id": "b2",
        "subject": { "id": "bio", "label": "Biology", "icon": "🧬" },
        "type": "multi",
        "prompt": "Pick the organelles.",
        "choices": ["Nucleus", "Ribosome", "Petal"],
        "answer": ["Nucleus", "Ribosome"]
    },
    {
        "id": "m3",
        "subject": { "id": "math", "label": "Maths", "icon": "➗" },
        "type": "mcq",
        "prompt": "Broken question",
        "choices": "not a list",
        "answer": "x"
    }
]"#;

pub fn deck_request(subjects: &[&str]) -> Value {
    json!({ "subjects": subjects })
}

pub fn evaluate_request(question_id: &str, value: Value) -> Value {
    json!({ "question_id": question_id, "value": value })
}

pub fn create_session_request(subjects: Option<&[&str]>) -> Value {
    match subjects {
        Some(subjects) => json!({ "subjects": subjects }),
        None => json!({}),
    }
}

pub fn answer_request(question_id: &str, value: Value) -> Value {
    json!({ "question_id": question_id, "value": value })
}

pub fn reveal_request(question_id: &str) -> Value {
    json!({ "question_id": question_id })
}

pub fn advance_request(direction: &str) -> Value {
    json!({ "direction": direction })
}
