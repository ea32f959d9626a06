//! End-to-end integration tests for LearnVeda.
//!
//! These tests exercise the full pipeline from configuration and subject
//! input to the rendered timetable, through the planner and the gateway.

use std::sync::Arc;

use learnveda_config::AppConfig;
use learnveda_core::error::{Error, PlanError, ProviderError};
use learnveda_core::message::Message;
use learnveda_core::plan::{
    AdvisoryStatus, FocusLabel, PlanRequest, ScheduleConstraints, StudyPlan, SubjectPlan,
};
use learnveda_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use learnveda_planner::{Planner, render_text};

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted results in sequence.
struct ScriptedProvider {
    responses: std::sync::Mutex<Vec<Result<String, ProviderError>>>,
    requests: std::sync::Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn text(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    fn failing(error: ProviderError) -> Self {
        Self::new(vec![Err(error)])
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn prompt(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].messages[0]
            .content
            .clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let index = requests.len();
        if index >= responses.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                index,
                responses.len()
            );
        }
        let model = request.model.clone();
        requests.push(request);

        responses[index].clone().map(|text| ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model,
            metadata: serde_json::Map::new(),
        })
    }
}

fn math_and_history() -> Vec<SubjectPlan> {
    vec![
        SubjectPlan::new("Math", 10).with_weaknesses("I struggle with algebra"),
        SubjectPlan::new("History", 6).with_strengths("good with dates"),
    ]
}

// ── E2E: Full Generate Pipeline ──────────────────────────────────────────

#[tokio::test]
async fn e2e_generate_and_render() {
    let provider = Arc::new(ScriptedProvider::text(
        "Start each day with algebra drills, then review dates.",
    ));
    let planner = Planner::with_provider(provider.clone(), &AppConfig::default());

    let plan = planner
        .generate_timetable(&math_and_history(), ScheduleConstraints::new(2, 4.0))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 1);
    let prompt = provider.prompt(0);
    assert!(prompt.contains("Subjects: ['Math', 'History']"));
    assert!(prompt.contains("Strengths: ['', 'good with dates']"));
    assert!(prompt.contains("Weaknesses: ['I struggle with algebra', '']"));

    // Math: 10/16 of 8 hours, +20% => 6.0 hours, 3.0 per day.
    // History: 6/16 of 8 hours, -20% => 2.4 hours, 1.2 per day.
    let day1 = plan.timetable.day(1).unwrap();
    let math = day1.get("Math").unwrap();
    assert_eq!(math.chapters.to_string(), "1 - 5");
    assert!((math.hours - 3.0).abs() < 1e-9);
    assert_eq!(math.focus, FocusLabel::WeakAreas);

    let history = day1.get("History").unwrap();
    assert_eq!(history.chapters.to_string(), "1 - 3");
    assert!((history.hours - 1.2).abs() < 1e-9);
    assert_eq!(history.focus, FocusLabel::StrongAreas);

    let day2 = plan.timetable.day(2).unwrap();
    assert_eq!(day2.get("Math").unwrap().chapters.to_string(), "6 - 10");
    assert_eq!(day2.get("History").unwrap().chapters.to_string(), "4 - 6");

    let text = render_text(&plan);
    assert!(text.contains("Personalized Study Recommendations"));
    assert!(text.contains("Start each day with algebra drills"));
    assert!(text.contains("Your Study Timetable"));
    assert!(text.contains("Day 2"));
    assert!(text.contains("3.00"));
    assert!(text.contains("1.20"));
}

#[tokio::test]
async fn e2e_single_subject_example() {
    let planner = Planner::with_provider(
        Arc::new(ScriptedProvider::text("ok")),
        &AppConfig::default(),
    );
    let plan = planner
        .generate_timetable(
            &[SubjectPlan::new("Math", 10).with_weaknesses("I struggle with algebra")],
            ScheduleConstraints::new(2, 4.0),
        )
        .await
        .unwrap();

    for (day, range) in [(1, "1 - 5"), (2, "6 - 10")] {
        let math = plan.timetable.day(day).unwrap().get("Math").unwrap();
        assert_eq!(math.chapters.to_string(), range);
        assert!((math.hours - 4.8).abs() < 1e-9);
        assert_eq!(math.focus, FocusLabel::WeakAreas);
    }
}

#[tokio::test]
async fn e2e_equal_subjects_split_evenly() {
    let planner = Planner::with_provider(
        Arc::new(ScriptedProvider::text("ok")),
        &AppConfig::default(),
    );
    let plan = planner
        .generate_timetable(
            &[SubjectPlan::new("A", 4), SubjectPlan::new("B", 4)],
            ScheduleConstraints::new(4, 2.0),
        )
        .await
        .unwrap();

    for day in &plan.timetable.days {
        for row in &day.subjects {
            assert!((row.plan.hours - 1.0).abs() < 1e-9);
            assert_eq!(row.plan.chapters.len(), 1);
            assert_eq!(row.plan.focus, FocusLabel::StrongAreas);
        }
    }
    assert_eq!(plan.timetable.chapters_covered("A"), 4);
}

#[tokio::test]
async fn e2e_advice_failure_keeps_timetable() {
    let good_planner = Planner::with_provider(
        Arc::new(ScriptedProvider::text("advice")),
        &AppConfig::default(),
    );
    let failing = Arc::new(ScriptedProvider::failing(ProviderError::AuthenticationFailed(
        "API key not valid".into(),
    )));
    let failing_planner = Planner::with_provider(failing.clone(), &AppConfig::default());

    let constraints = ScheduleConstraints::new(3, 5.0);
    let good = good_planner
        .generate_timetable(&math_and_history(), constraints)
        .await
        .unwrap();
    let degraded = failing_planner
        .generate_timetable(&math_and_history(), constraints)
        .await
        .unwrap();

    assert_eq!(failing.calls(), 1);
    assert_eq!(degraded.timetable, good.timetable);
    assert_eq!(
        degraded.advisory_text,
        "Unable to generate analysis. Please check your API key."
    );
    assert!(matches!(degraded.advisory, AdvisoryStatus::Fallback { .. }));

    let text = render_text(&degraded);
    assert!(text.contains("Note: study advice could not be generated"));
}

#[tokio::test]
async fn e2e_invalid_input_never_reaches_provider() {
    let provider = Arc::new(ScriptedProvider::new(Vec::new()));
    let planner = Planner::with_provider(provider.clone(), &AppConfig::default());

    let err = planner
        .generate_timetable(
            &[SubjectPlan::new("Math", 0)],
            ScheduleConstraints::new(2, 4.0),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        PlanError::NoChapters {
            subject: "Math".into()
        }
    );

    let err = planner
        .generate_timetable(&math_and_history(), ScheduleConstraints::new(0, 4.0))
        .await
        .unwrap_err();
    assert_eq!(err, PlanError::NoDays);

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn e2e_more_days_than_chapters() {
    let planner = Planner::with_provider(
        Arc::new(ScriptedProvider::text("ok")),
        &AppConfig::default(),
    );
    let plan = planner
        .generate_timetable(&[SubjectPlan::new("Art", 2)], ScheduleConstraints::new(5, 1.0))
        .await
        .unwrap();

    let empty_days = plan
        .timetable
        .subject_days("Art")
        .filter(|d| d.chapters.is_empty())
        .count();
    assert_eq!(empty_days, 3);
    assert_eq!(plan.timetable.chapters_covered("Art"), 2);
    assert!(render_text(&plan).contains("none"));
}

// ── E2E: Configuration ───────────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_file_drives_planner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_model = "gemini-1.5-pro"
default_max_tokens = 512

[planner]
renormalize_hours = true
fallback_advice = "Advice unavailable."
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(&path).unwrap();
    let provider = Arc::new(ScriptedProvider::failing(ProviderError::Timeout(
        "120s".into(),
    )));
    let planner = Planner::with_provider(provider.clone(), &config);

    let request = PlanRequest {
        subjects: math_and_history(),
        total_days: 2,
        daily_hours: 4.0,
    };
    let plan = planner.generate(&request).await.unwrap();

    assert_eq!(plan.advisory_text, "Advice unavailable.");
    assert!((plan.timetable.total_hours() - 8.0).abs() < 0.05);

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests[0].model, "gemini-1.5-pro");
    assert_eq!(requests[0].max_tokens, Some(512));
}

#[test]
fn e2e_config_defaults_and_validation() {
    let config = AppConfig::default();
    assert_eq!(config.default_provider, "gemini");
    assert_eq!(config.planner.default_subjects, 3);
    assert_eq!(config.planner.default_chapters, 10);
    assert_eq!(config.planner.default_days, 4);
    assert!(config.validate().is_ok());

    let parsed: AppConfig = toml::from_str(&AppConfig::default_toml()).unwrap();
    assert_eq!(parsed.default_model, config.default_model);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[planner]\ndefault_days = 0\n").unwrap();
    assert!(AppConfig::load_from(&path).is_err());
}

#[test]
fn e2e_missing_key_is_a_configuration_error() {
    let err = Planner::from_config(&AppConfig::default()).err().unwrap();
    assert!(matches!(err, Error::Config { .. }));
    assert!(err.to_string().contains("gemini"));
}

#[test]
fn e2e_local_provider_needs_no_key() {
    let config = AppConfig {
        default_provider: "ollama".into(),
        default_model: "llama3".into(),
        ..AppConfig::default()
    };
    let planner = Planner::from_config(&config).unwrap();
    assert_eq!(planner.advisor().provider_name(), "ollama");
    assert_eq!(planner.advisor().model(), "llama3");
}

// ── E2E: Gateway ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_gateway_health_and_timetable() {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use learnveda_gateway::{GatewayState, build_router};
    use tower::ServiceExt;

    let config = AppConfig::default();
    let planner = Planner::with_provider(
        Arc::new(ScriptedProvider::text("Gateway advice.")),
        &config,
    );
    let state = Arc::new(GatewayState { config, planner });

    let response = build_router(state.clone())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = serde_json::json!({
        "subjects": [
            {"name": "Math", "chapters": 10, "weaknesses": "I struggle with algebra"},
            {"name": "History", "chapters": 6, "strengths": "good with dates"}
        ],
        "total_days": 2,
        "daily_hours": 4.0
    });
    let response = build_router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/v1/timetable")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let plan: StudyPlan = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(plan.advisory_text, "Gateway advice.");
    assert_eq!(
        plan.timetable.day(1).unwrap().get("History").unwrap().focus,
        FocusLabel::StrongAreas
    );

    // The wire format carries the human labels.
    let json = serde_json::to_value(&plan).unwrap();
    assert_eq!(json["timetable"]["days"][0]["subjects"][0]["focus"], "Weak Areas");
    assert_eq!(json["advisory"]["status"], "generated");
}
