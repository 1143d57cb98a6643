mod common;

use std::sync::Arc;

use assessment_backend::database::memory::InMemoryAssessmentStore;
use assessment_backend::database::store::{AssessmentStore, RecommendationFilter};
use assessment_backend::error::{Error, Result};
use assessment_backend::models::recommendation::{BookRecommendationEntry, VideoRecommendationEntry};
use assessment_backend::models::report::{NewReport, Report};
use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;

use common::{app, get_request, json_request, send, MockModel};

const QUESTIONS_JSON: &str = r#"{"questions":[
    {"id":1,"question":"What does PCB stand for?","options":["Printed Circuit Board","Power Control Box","Primary Cable Bus","Panel Circuit Base"],"correctAnswer":"Printed Circuit Board"},
    {"id":2,"question":"Which tool joins components?","options":["Hammer","Soldering iron","Wrench","Drill"],"correctAnswer":"Soldering iron"}
]}"#;

fn evaluation_body(email: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "type": "evaluate_answers",
        "subject": "PCB",
        "questions": [
            {"id":1,"questionText":"q1","options":["A","B","C","D"],"correctAnswer":"A"},
            {"id":2,"questionText":"q2","options":["A","B","C","D"],"correctAnswer":"B"},
            {"id":3,"questionText":"q3","options":["A","B","C","D"],"correctAnswer":"C"}
        ],
        "userAnswers": ["A", "X"],
    });
    if let Some(email) = email {
        body["email"] = json!(email);
    }
    body
}

#[tokio::test]
async fn evaluation_without_email_never_calls_the_model() {
    let mut model = MockModel::new();
    model.expect_generate().times(0);
    let store = Arc::new(InMemoryAssessmentStore::new());
    let app = app(model, store.clone());

    let (status, body) = send(&app, json_request("POST", "/api/assessment", evaluation_body(None))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("User is not logged in"));
    assert_eq!(store.report_count().await, 0);
}

#[tokio::test]
async fn generate_questions_returns_extracted_items() {
    let mut model = MockModel::new();
    model
        .expect_generate()
        .withf(|prompt, options| options.json_mode && prompt.user.contains("PCB"))
        .times(1)
        .returning(|_, _| Ok(QUESTIONS_JSON.to_string()));
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/assessment",
            json!({"type": "generate_questions", "role": "Operator", "subject": "PCB", "board": "State"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let result = body["result"].as_array().unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[1]["correctAnswer"], "Soldering iron");
    assert_eq!(result[0]["questionText"], "What does PCB stand for?");
}

#[tokio::test]
async fn generate_questions_requires_a_target() {
    let mut model = MockModel::new();
    model.expect_generate().times(0);
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/assessment", json!({"type": "generate_questions", "role": "Operator"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("required"));
}

#[tokio::test]
async fn questions_endpoint_accepts_level_alone() {
    let mut model = MockModel::new();
    model
        .expect_generate()
        .times(1)
        .returning(|_, _| Ok(QUESTIONS_JSON.to_string()));
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(&app, json_request("POST", "/api/questions", json!({"standard": "10th"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Questions generated successfully.");
    assert_eq!(body["questions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unparseable_model_output_is_a_gateway_error() {
    let mut model = MockModel::new();
    model
        .expect_generate()
        .returning(|_, _| Ok("Sorry, I can't help with that.".to_string()));
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(&app, json_request("POST", "/api/questions", json!({"level": "10th"}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to parse questions. Please try again.");
}

#[tokio::test]
async fn provider_failure_is_a_gateway_error() {
    let mut model = MockModel::new();
    model
        .expect_generate()
        .returning(|_, _| Err(Error::Provider("OpenAI API Error 429: rate limited".into())));
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, _) = send(&app, json_request("POST", "/api/questions", json!({"level": "10th"}))).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn evaluation_saves_report_and_lists_newest_first() {
    let mut model = MockModel::new();
    let mut call = 0;
    model
        .expect_generate()
        .withf(|prompt, options| !options.json_mode && prompt.user.contains("PCB"))
        .times(2)
        .returning(move |_, _| {
            call += 1;
            Ok(format!("Report #{call}"))
        });
    let store = Arc::new(InMemoryAssessmentStore::new());
    let app = app(model, store.clone());

    let (status, body) = send(
        &app,
        json_request("POST", "/api/assessment", evaluation_body(Some("asha@example.com"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Report #1");
    assert_eq!(body["score"], 1);
    assert_eq!(body["total"], 3);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/assessment", evaluation_body(Some("asha@example.com"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.report_count().await, 2);

    let (status, body) = send(&app, get_request("/api/assessment?email=asha@example.com", &[])).await;
    assert_eq!(status, StatusCode::OK);
    let reports = body["reports"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["reportAnalysis"], "Report #2");
    assert_eq!(reports[0]["collegeName"], "Unknown College");
    assert_eq!(reports[0]["role"], "Student");
    assert_eq!(reports[0]["totalQuestions"], 3);
}

#[tokio::test]
async fn listing_reports_requires_email() {
    let mut model = MockModel::new();
    model.expect_generate().times(0);
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, _) = send(&app, get_request("/api/assessment", &[])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Accepts recommendation traffic but cannot write reports.
struct ReportWriteFailure(InMemoryAssessmentStore);

#[async_trait]
impl AssessmentStore for ReportWriteFailure {
    async fn insert_report(&self, _report: NewReport) -> Result<Report> {
        Err(Error::Persistence("connection refused".into()))
    }

    async fn find_reports_by_email(&self, email: &str) -> Result<Vec<Report>> {
        self.0.find_reports_by_email(email).await
    }

    async fn insert_videos(&self, entry: VideoRecommendationEntry) -> Result<VideoRecommendationEntry> {
        self.0.insert_videos(entry).await
    }

    async fn find_videos(&self, filter: &RecommendationFilter) -> Result<Vec<VideoRecommendationEntry>> {
        self.0.find_videos(filter).await
    }

    async fn insert_books(&self, entry: BookRecommendationEntry) -> Result<BookRecommendationEntry> {
        self.0.insert_books(entry).await
    }

    async fn find_books(&self, filter: &RecommendationFilter) -> Result<Vec<BookRecommendationEntry>> {
        self.0.find_books(filter).await
    }
}

#[tokio::test]
async fn failed_save_still_returns_the_report() {
    let mut model = MockModel::new();
    model
        .expect_generate()
        .times(1)
        .returning(|_, _| Ok("Strong basics, revise soldering.".to_string()));
    let app = app(model, Arc::new(ReportWriteFailure(InMemoryAssessmentStore::new())));

    let (status, body) = send(
        &app,
        json_request("POST", "/api/assessment", evaluation_body(Some("asha@example.com"))),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to save report to database");
    assert_eq!(body["result"], "Strong basics, revise soldering.");
    assert_eq!(body["score"], 1);
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(MockModel::new(), Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(&app, get_request("/health", &[])).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn evaluation_without_subject_is_a_json_validation_error() {
    let mut model = MockModel::new();
    model.expect_generate().times(0);
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/assessment",
            json!({"type": "evaluate_answers", "questions": [], "userAnswers": [], "email": "a@b.com"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Subject is required"));
}

#[tokio::test]
async fn mistyped_body_is_a_json_validation_error() {
    let mut model = MockModel::new();
    model.expect_generate().times(0);
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/assessment",
            json!({"type": "evaluate_answers", "subject": "PCB", "userAnswers": "A", "email": "a@b.com"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn review_compares_submitted_answers() {
    let mut model = MockModel::new();
    model
        .expect_generate()
        .withf(|prompt, options| {
            !options.json_mode
                && prompt.user.contains("Submitted answer: Hammer")
                && prompt.user.contains("Original answer: Soldering iron")
                && prompt.user.contains("Overall Score: <score>/50")
        })
        .times(1)
        .returning(|_, _| Ok("Technical Proficiency: 6/10".to_string()));
    let store = Arc::new(InMemoryAssessmentStore::new());
    let app = app(model, store.clone());

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/report",
            json!({"data": [
                {"question": "Which tool joins PCB components?", "correctAnswer": "Soldering iron", "userAnswer": "Hammer"}
            ]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "Technical Proficiency: 6/10");
    assert_eq!(store.report_count().await, 0);
}

#[tokio::test]
async fn review_without_data_never_calls_the_model() {
    let mut model = MockModel::new();
    model.expect_generate().times(0);
    let app = app(model, Arc::new(InMemoryAssessmentStore::new()));

    let (status, body) = send(&app, json_request("POST", "/api/report", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Answer data is required"));
}
