use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::models::question::QuestionSpec;
use crate::utils::text::trunc_for_log;

/// Object keys checked, in order, before falling back to the first array field.
const KNOWN_ARRAY_KEYS: &[&str] = &["questions", "result"];

lazy_static! {
    static ref MISSING_COMMA_AFTER_ARRAY: Regex = Regex::new(r#"\]\s*""#).unwrap();
    static ref MISSING_COMMA_BETWEEN_OBJECTS: Regex = Regex::new(r"\}\s*\{").unwrap();
    static ref MISSING_COMMA_BETWEEN_STRINGS: Regex = Regex::new(r#""\s+""#).unwrap();
    static ref TRAILING_COMMA: Regex = Regex::new(r",\s*([\]\}])").unwrap();
}

/// A single textual fix for a common model formatting slip.
pub struct RepairRule {
    pub name: &'static str,
    pattern: &'static Regex,
    replacement: &'static str,
}

impl RepairRule {
    pub fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

lazy_static! {
    /// Applied top to bottom, once each.
    pub static ref REPAIR_RULES: Vec<RepairRule> = vec![
        RepairRule {
            name: "missing_comma_after_array",
            pattern: &MISSING_COMMA_AFTER_ARRAY,
            replacement: r#"], ""#,
        },
        RepairRule {
            name: "missing_comma_between_objects",
            pattern: &MISSING_COMMA_BETWEEN_OBJECTS,
            replacement: "}, {",
        },
        RepairRule {
            name: "missing_comma_between_strings",
            pattern: &MISSING_COMMA_BETWEEN_STRINGS,
            replacement: r#"", ""#,
        },
        RepairRule {
            name: "trailing_comma",
            pattern: &TRAILING_COMMA,
            replacement: "$1",
        },
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    DirectParse,
    BracketScan,
    HeuristicRepair,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub strategy: ExtractionStrategy,
    pub questions: Vec<QuestionSpec>,
    /// Array elements rejected by the shape check.
    pub dropped: usize,
}

pub struct ExtractionService;

impl ExtractionService {
    pub fn extract(raw: &str) -> Result<Vec<QuestionSpec>> {
        Self::extract_detailed(raw).map(|e| e.questions)
    }

    /// Turns free-form model output into questions. Strategies run in order
    /// and the first one that yields an array wins.
    pub fn extract_detailed(raw: &str) -> Result<Extraction> {
        let (strategy, items) = Self::locate_question_array(raw).ok_or_else(|| {
            tracing::error!(raw = %trunc_for_log(raw, 300), "No question array in model output");
            Error::Extraction {
                raw: raw.to_string(),
            }
        })?;

        let total = items.len();
        let questions: Vec<QuestionSpec> = items
            .iter()
            .enumerate()
            .filter_map(|(idx, item)| coerce_question(item, idx))
            .collect();
        let dropped = total - questions.len();

        if dropped > 0 {
            tracing::warn!(dropped, total, "Dropped malformed question elements");
        }
        if questions.is_empty() {
            tracing::error!(
                ?strategy,
                total,
                raw = %trunc_for_log(raw, 300),
                "Model output contained no usable questions"
            );
            return Err(Error::Extraction {
                raw: raw.to_string(),
            });
        }

        tracing::debug!(?strategy, count = questions.len(), "Extracted questions");
        Ok(Extraction {
            strategy,
            questions,
            dropped,
        })
    }

    fn locate_question_array(raw: &str) -> Option<(ExtractionStrategy, Vec<JsonValue>)> {
        let trimmed = raw.trim();

        if let Ok(value) = serde_json::from_str::<JsonValue>(trimmed) {
            if let Some(items) = array_in(value) {
                return Some((ExtractionStrategy::DirectParse, items));
            }
        }

        let bracketed = bracket_span(trimmed);
        if let Some(span) = bracketed {
            if let Ok(JsonValue::Array(items)) = serde_json::from_str::<JsonValue>(span) {
                return Some((ExtractionStrategy::BracketScan, items));
            }
        }

        let repaired = repair(bracketed.unwrap_or(trimmed));
        match serde_json::from_str::<JsonValue>(&repaired) {
            Ok(value) => array_in(value).map(|items| (ExtractionStrategy::HeuristicRepair, items)),
            Err(e) => {
                tracing::warn!(error = %e, "Repaired model output still does not parse");
                None
            }
        }
    }
}

/// Runs every repair rule once, in order.
pub fn repair(text: &str) -> String {
    REPAIR_RULES
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}

/// Substring from the first `[` to the last `]`, inclusive.
fn bracket_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

fn array_in(value: JsonValue) -> Option<Vec<JsonValue>> {
    match value {
        JsonValue::Array(items) => Some(items),
        JsonValue::Object(map) => array_field(map),
        _ => None,
    }
}

fn array_field(mut map: Map<String, JsonValue>) -> Option<Vec<JsonValue>> {
    for key in KNOWN_ARRAY_KEYS {
        if matches!(map.get(*key), Some(JsonValue::Array(_))) {
            return map.remove(*key).and_then(|v| match v {
                JsonValue::Array(items) => Some(items),
                _ => None,
            });
        }
    }
    map.into_iter().find_map(|(_, v)| match v {
        JsonValue::Array(items) => Some(items),
        _ => None,
    })
}

/// Accepts an element only if it has a non-empty `options` array of scalars
/// and a `correctAnswer`. Missing ids fall back to the 1-based position.
fn coerce_question(v: &JsonValue, idx: usize) -> Option<QuestionSpec> {
    let obj = v.as_object()?;

    // Any non-scalar option rejects the whole element.
    let options: Vec<String> = obj
        .get("options")?
        .as_array()?
        .iter()
        .map(scalar_text)
        .collect::<Option<_>>()?;
    if options.is_empty() {
        return None;
    }

    let correct_answer = obj
        .get("correctAnswer")
        .or_else(|| obj.get("correct_answer"))
        .and_then(scalar_text)?;

    let question_text = obj
        .get("questionText")
        .or_else(|| obj.get("question"))
        .and_then(scalar_text)
        .unwrap_or_default();

    let id = obj
        .get("id")
        .and_then(|i| i.as_i64())
        .filter(|i| *i > 0)
        .unwrap_or(idx as i64 + 1);

    Some(QuestionSpec {
        id,
        question_text,
        options,
        correct_answer,
    })
}

fn scalar_text(v: &JsonValue) -> Option<String> {
    match v {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
