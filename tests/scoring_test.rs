use assessment_backend::models::question::{QuestionSpec, ScoreResult};
use assessment_backend::services::scoring_service::ScoringService;

fn question(text: &str, answer: &str) -> QuestionSpec {
    QuestionSpec {
        id: 0,
        question_text: text.to_string(),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_answer: answer.to_string(),
    }
}

fn answers(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

#[test]
fn short_answer_list_scores_missing_as_wrong() {
    let questions = vec![question("q1", "A"), question("q2", "B"), question("q3", "C")];

    let result = ScoringService::score(&questions, &answers(&["A", "X"]));

    assert_eq!(result, ScoreResult { score: 1, total: 3 });
}

#[test]
fn comparison_is_exact_and_positional() {
    let questions = vec![question("q1", "A"), question("q2", "B")];

    assert_eq!(ScoringService::score(&questions, &answers(&["B", "A"])).score, 0);
    assert_eq!(ScoringService::score(&questions, &answers(&["a", "B "])).score, 0);
    assert_eq!(ScoringService::score(&questions, &answers(&["A", "B", "C"])).score, 2);
}

#[test]
fn null_answers_never_match() {
    let questions = vec![question("q1", "A"), question("q2", "B")];

    let result = ScoringService::score(&questions, &[None, Some("B".into())]);

    assert_eq!(result, ScoreResult { score: 1, total: 2 });
}

#[test]
fn no_questions_scores_zero_of_zero() {
    assert_eq!(
        ScoringService::score(&[], &answers(&["A"])),
        ScoreResult { score: 0, total: 0 }
    );
}

#[test]
fn missed_questions_keep_order() {
    let questions = vec![question("q1", "A"), question("q2", "B"), question("q3", "C")];

    let missed = ScoringService::missed_questions(&questions, &answers(&["A", "X"]));

    assert_eq!(missed, vec!["q2", "q3"]);
}
