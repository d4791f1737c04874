//! Ingestion — turns raw question JSON from the question bank into typed records.
//!
//! This is the only place that looks at untyped payloads. The backend stores
//! `options` as whatever the authoring form produced: a JSON array, an object,
//! or a JSON document encoded inside a string. Each payload is decoded once,
//! according to the question's kind; anything unusable becomes
//! `QuestionOptions::None` with a warning, so layout never sees bad data.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::models::question::{
    PassageItem, QuestionId, QuestionKind, QuestionOptions, QuestionRecord,
};

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

/// A question object exactly as the backend returns it.
///
/// Every field is untyped JSON so one odd value never rejects the whole paper.
/// Fields the authoring forms spell several ways are kept apart and resolved
/// in `sanitize_question`; serde aliases would reject objects carrying both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawQuestion {
    #[serde(default)]
    pub id: Value,
    #[serde(default, rename = "type")]
    pub kind: Option<Value>,
    #[serde(default)]
    pub question_type: Option<Value>,
    #[serde(default, rename = "questionType")]
    pub question_type_camel: Option<Value>,
    #[serde(default)]
    pub text: Option<Value>,
    #[serde(default)]
    pub question: Option<Value>,
    #[serde(default)]
    pub options: Option<Value>,
    #[serde(default)]
    pub image_ref: Option<Value>,
    #[serde(default)]
    pub image: Option<Value>,
    #[serde(default, rename = "imageRef")]
    pub image_ref_camel: Option<Value>,
    #[serde(default)]
    pub marks: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawPassageItem {
    #[serde(alias = "question")]
    text: String,
    #[serde(default)]
    marks: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawMatchPair {
    left: Value,
    right: Value,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMatch {
    Columns { left: Vec<Value>, right: Vec<Value> },
    Pairs(Vec<RawMatchPair>),
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Sanitizes a backend question list, assigning 1-based ordinals in list order.
pub fn sanitize_questions(raw: Vec<RawQuestion>) -> Vec<QuestionRecord> {
    let records: Vec<QuestionRecord> = raw
        .into_iter()
        .enumerate()
        .map(|(i, q)| sanitize_question(q, i + 1))
        .collect();

    let duplicates = duplicate_ids(&records);
    if !duplicates.is_empty() {
        warn!(ids = ?duplicates, "Question ids are not unique");
    }

    debug!(count = records.len(), "Sanitized question list");
    records
}

/// Ids that occur more than once, in order of their second occurrence.
pub fn duplicate_ids(records: &[QuestionRecord]) -> Vec<QuestionId> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for record in records {
        if !seen.insert(&record.id) {
            duplicates.push(record.id.clone());
        }
    }
    duplicates
}

fn sanitize_question(raw: RawQuestion, ordinal: usize) -> QuestionRecord {
    let id = match value_text(&raw.id) {
        Some(id) if !id.trim().is_empty() => QuestionId(id),
        _ => {
            warn!(ordinal, "Question has no usable id; using its ordinal");
            QuestionId(format!("#{ordinal}"))
        }
    };

    let kind_name = first_text(&[&raw.kind, &raw.question_type, &raw.question_type_camel]);
    let kind = QuestionKind::parse(kind_name.as_deref().unwrap_or_default());
    if let QuestionKind::Other(name) = &kind {
        warn!(question_id = %id, kind = %name, "Unknown question type; laying out as its own section");
    }

    let text = first_text(&[&raw.text, &raw.question]).unwrap_or_else(|| {
        if raw.text.is_some() || raw.question.is_some() {
            warn!(question_id = %id, "Question text is blank or not a scalar");
        }
        String::new()
    });

    let options = decode_options(&kind, raw.options, &id);
    let image_ref = first_text(&[&raw.image_ref, &raw.image, &raw.image_ref_camel]);
    let marks = parse_marks(raw.marks.as_ref());

    QuestionRecord {
        id,
        kind,
        text,
        options,
        image_ref,
        marks,
        ordinal,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Options decoding
// ────────────────────────────────────────────────────────────────────────────

fn decode_options(kind: &QuestionKind, raw: Option<Value>, id: &QuestionId) -> QuestionOptions {
    if !matches!(
        kind,
        QuestionKind::Mcq | QuestionKind::Passage | QuestionKind::Match
    ) {
        return QuestionOptions::None;
    }

    let value = match raw {
        None | Some(Value::Null) => return QuestionOptions::None,
        Some(Value::String(s)) if s.trim().is_empty() => return QuestionOptions::None,
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(v) => v,
            Err(e) => {
                warn!(question_id = %id, error = %e, "Options string is not valid JSON; ignoring");
                return QuestionOptions::None;
            }
        },
        Some(v) => v,
    };

    let decoded = match kind {
        QuestionKind::Mcq => decode_choices(value),
        QuestionKind::Passage => decode_passage(value),
        QuestionKind::Match => decode_match(value),
        _ => None,
    };

    decoded.unwrap_or_else(|| {
        warn!(question_id = %id, kind = kind.as_str(), "Options payload has the wrong shape; ignoring");
        QuestionOptions::None
    })
}

fn decode_choices(value: Value) -> Option<QuestionOptions> {
    let Value::Array(items) = value else {
        return None;
    };
    let choices = items.iter().filter_map(value_text).collect();
    Some(QuestionOptions::Choices { choices })
}

fn decode_passage(value: Value) -> Option<QuestionOptions> {
    let items: Vec<RawPassageItem> = serde_json::from_value(value).ok()?;
    let items = items
        .into_iter()
        .map(|item| PassageItem {
            text: item.text,
            marks: parse_marks(item.marks.as_ref()),
        })
        .collect();
    Some(QuestionOptions::Passage { items })
}

fn decode_match(value: Value) -> Option<QuestionOptions> {
    let (left, right): (Vec<String>, Vec<String>) = match serde_json::from_value::<RawMatch>(value).ok()? {
        RawMatch::Columns { left, right } => (
            left.iter().filter_map(value_text).collect(),
            right.iter().filter_map(value_text).collect(),
        ),
        RawMatch::Pairs(pairs) => pairs
            .iter()
            .filter_map(|p| Some((value_text(&p.left)?, value_text(&p.right)?)))
            .unzip(),
    };
    Some(QuestionOptions::Match { left, right })
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// Scalar JSON rendered as display text. Arrays, objects, and null yield `None`.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First candidate that renders as non-blank text.
fn first_text(candidates: &[&Option<Value>]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|c| c.as_ref().and_then(value_text))
        .find(|t| !t.trim().is_empty())
}

/// Marks arrive as numbers or numeric strings. Anything else counts as zero.
fn parse_marks(value: Option<&Value>) -> f64 {
    let marks = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    marks.filter(|m| m.is_finite()).unwrap_or(0.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_raw(value: Value) -> RawQuestion {
        serde_json::from_value(value).expect("raw question should deserialize")
    }

    fn sanitize_one(value: Value) -> QuestionRecord {
        sanitize_questions(vec![make_raw(value)]).remove(0)
    }

    #[test]
    fn test_ordinals_follow_input_order() {
        let raw = vec![
            make_raw(json!({"id": "a", "type": "short", "text": "One"})),
            make_raw(json!({"id": "b", "type": "long", "text": "Two"})),
            make_raw(json!({"id": "c", "type": "blank", "text": "Three"})),
        ];
        let records = sanitize_questions(raw);
        let ordinals: Vec<usize> = records.iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(records[2].kind, QuestionKind::Blank);
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let record = sanitize_one(json!({"id": 42, "type": "short"}));
        assert_eq!(record.id, QuestionId("42".to_string()));
    }

    #[test]
    fn test_missing_id_falls_back_to_ordinal() {
        let record = sanitize_one(json!({"type": "short"}));
        assert_eq!(record.id, QuestionId("#1".to_string()));
    }

    #[test]
    fn test_field_aliases_accepted() {
        let record = sanitize_one(json!({
            "id": "q1",
            "question_type": "TrueFalse",
            "question": "The sun is a star.",
            "image": "sun.png",
            "marks": "2"
        }));
        assert_eq!(record.kind, QuestionKind::TrueFalse);
        assert_eq!(record.text, "The sun is a star.");
        assert_eq!(record.image_ref.as_deref(), Some("sun.png"));
        assert_eq!(record.marks, 2.0);
    }

    #[test]
    fn test_mcq_options_as_array() {
        let record = sanitize_one(json!({
            "id": "q1", "type": "mcq", "options": ["Mars", "Venus", 3, null]
        }));
        assert_eq!(
            record.options,
            QuestionOptions::Choices {
                choices: vec!["Mars".into(), "Venus".into(), "3".into()]
            }
        );
    }

    #[test]
    fn test_mcq_options_as_encoded_string() {
        let record = sanitize_one(json!({
            "id": "q1", "type": "mcq", "options": "[\"A\", \"B\", \"C\"]"
        }));
        assert_eq!(record.options.choice_count(), 3);
    }

    #[test]
    fn test_unparsable_options_string_becomes_none() {
        let record = sanitize_one(json!({
            "id": "q1", "type": "mcq", "options": "[\"A\", \"B\""
        }));
        assert_eq!(record.options, QuestionOptions::None);
    }

    #[test]
    fn test_wrong_shape_becomes_none() {
        let record = sanitize_one(json!({
            "id": "q1", "type": "mcq", "options": {"a": 1}
        }));
        assert_eq!(record.options, QuestionOptions::None);
    }

    #[test]
    fn test_options_ignored_for_plain_kinds() {
        let record = sanitize_one(json!({
            "id": "q1", "type": "short", "options": ["x", "y"]
        }));
        assert_eq!(record.options, QuestionOptions::None);
    }

    #[test]
    fn test_passage_items_decoded() {
        let record = sanitize_one(json!({
            "id": "p1",
            "type": "passage",
            "options": [
                {"question": "Who is the narrator?", "marks": 2},
                {"text": "Where does it happen?"}
            ]
        }));
        match record.options {
            QuestionOptions::Passage { items } => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[0].text, "Who is the narrator?");
                assert_eq!(items[0].marks, 2.0);
                assert_eq!(items[1].marks, 0.0);
            }
            other => panic!("expected passage options, got {other:?}"),
        }
    }

    #[test]
    fn test_match_columns_and_pairs() {
        let columns = sanitize_one(json!({
            "id": "m1", "type": "match",
            "options": {"left": ["Dog", "Cat"], "right": ["Bark", "Meow"]}
        }));
        let pairs = sanitize_one(json!({
            "id": "m2", "type": "match",
            "options": "[{\"left\": \"Dog\", \"right\": \"Bark\"}, {\"left\": \"Cat\", \"right\": \"Meow\"}]"
        }));
        let expected = QuestionOptions::Match {
            left: vec!["Dog".into(), "Cat".into()],
            right: vec!["Bark".into(), "Meow".into()],
        };
        assert_eq!(columns.options, expected);
        assert_eq!(pairs.options, expected);
    }

    #[test]
    fn test_unknown_and_missing_kind_become_other() {
        let unknown = sanitize_one(json!({"id": "x", "type": "diagram"}));
        let missing = sanitize_one(json!({"id": "y"}));
        assert_eq!(unknown.kind, QuestionKind::Other("diagram".into()));
        assert_eq!(missing.kind, QuestionKind::Other(String::new()));
    }

    #[test]
    fn test_blank_image_ref_is_absent() {
        let record = sanitize_one(json!({"id": "q", "type": "long", "imageRef": "  "}));
        assert!(!record.has_image());
    }

    #[test]
    fn test_numeric_text_is_stringified() {
        let record = sanitize_one(json!({"id": "q", "type": "short", "text": 42}));
        assert_eq!(record.text, "42");
        assert_eq!(record.kind, QuestionKind::Short);
    }

    #[test]
    fn test_non_scalar_fields_do_not_reject_the_paper() {
        let raw: Vec<RawQuestion> = serde_json::from_value(json!([
            {"id": "a", "type": ["mcq"], "text": {"en": "Hello"}},
            {"id": "b", "type": "short", "text": "Fine"}
        ]))
        .expect("odd field types should still deserialize");
        let records = sanitize_questions(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, QuestionKind::Other(String::new()));
        assert_eq!(records[0].text, "");
        assert_eq!(records[1].text, "Fine");
    }

    #[test]
    fn test_both_image_keys_use_first_non_empty() {
        let record = sanitize_one(json!({
            "id": "q", "type": "long", "image": null, "imageRef": "a.png"
        }));
        assert_eq!(record.image_ref.as_deref(), Some("a.png"));

        let record = sanitize_one(json!({
            "id": "q", "type": "long", "image_ref": "", "image": "b.png", "imageRef": "c.png"
        }));
        assert_eq!(record.image_ref.as_deref(), Some("b.png"));
    }

    #[test]
    fn test_type_and_text_spellings_resolved_in_order() {
        let record = sanitize_one(json!({
            "id": "q",
            "type": "",
            "question_type": "blank",
            "questionType": "mcq",
            "text": "Primary",
            "question": "Secondary"
        }));
        assert_eq!(record.kind, QuestionKind::Blank);
        assert_eq!(record.text, "Primary");
    }

    #[test]
    fn test_duplicate_ids_reported() {
        let records = sanitize_questions(vec![
            make_raw(json!({"id": "#2", "type": "short"})),
            make_raw(json!({"type": "short"})),
            make_raw(json!({"id": "x", "type": "short"})),
            make_raw(json!({"id": "x", "type": "short"})),
        ]);
        assert_eq!(
            duplicate_ids(&records),
            vec![QuestionId("#2".to_string()), QuestionId("x".to_string())]
        );
        assert!(duplicate_ids(&records[..1]).is_empty());
    }

    #[test]
    fn test_bad_marks_count_as_zero() {
        assert_eq!(parse_marks(Some(&json!("two"))), 0.0);
        assert_eq!(parse_marks(Some(&json!([1]))), 0.0);
        assert_eq!(parse_marks(None), 0.0);
        assert_eq!(parse_marks(Some(&json!(1.5))), 1.5);
    }
}
