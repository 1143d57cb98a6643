use crate::models::question::{QuestionSpec, ScoreResult};

pub struct ScoringService;

impl ScoringService {
    /// Counts answers that are present and exactly equal (case-sensitive, no
    /// trimming) to the question at the same index. Missing answers never match.
    pub fn score(questions: &[QuestionSpec], answers: &[Option<String>]) -> ScoreResult {
        let score = questions
            .iter()
            .enumerate()
            .filter(|(idx, q)| {
                answers
                    .get(*idx)
                    .and_then(|a| a.as_deref())
                    .map(|a| a == q.correct_answer)
                    .unwrap_or(false)
            })
            .count();

        ScoreResult {
            score,
            total: questions.len(),
        }
    }

    /// Question texts whose answer did not score, in question order.
    pub fn missed_questions(questions: &[QuestionSpec], answers: &[Option<String>]) -> Vec<String> {
        questions
            .iter()
            .enumerate()
            .filter(|(idx, q)| answers.get(*idx).and_then(|a| a.as_deref()) != Some(q.correct_answer.as_str()))
            .map(|(_, q)| q.question_text.clone())
            .filter(|text| !text.trim().is_empty())
            .collect()
    }
}
