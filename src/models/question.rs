use serde::{Deserialize, Serialize};

/// One multiple-choice item as produced by the model.
///
/// `correct_answer` is expected to equal one of `options`; when it does not,
/// the question is kept and simply never scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    #[serde(default)]
    pub id: i64,
    #[serde(default, alias = "question")]
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl QuestionSpec {
    pub const EXPECTED_OPTIONS: usize = 4;

    pub fn answer_is_an_option(&self) -> bool {
        self.options.iter().any(|o| o == &self.correct_answer)
    }

    pub fn has_expected_option_count(&self) -> bool {
        self.options.len() == Self::EXPECTED_OPTIONS
    }
}

/// A submitted answer next to the original one, sent for free-form review
/// without scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPair {
    #[serde(default, alias = "questionText")]
    pub question: String,
    #[serde(default, alias = "originalAnswer")]
    pub correct_answer: Option<String>,
    #[serde(default, alias = "providedAnswer")]
    pub user_answer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: usize,
    pub total: usize,
}
