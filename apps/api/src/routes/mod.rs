pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{chat, content, files, interview, networking, posture, self_intro};

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_content_length;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        .route("/api/upload", post(files::handle_upload))
        // Chat
        .route("/api/chat", post(chat::handlers::handle_chat))
        .route("/api/history", get(chat::handlers::handle_history))
        .route("/api/quotes", get(chat::handlers::handle_quote))
        // Content
        .route("/api/summarize", post(content::handlers::handle_summarize))
        .route(
            "/api/analyze-content",
            post(content::handlers::handle_analyze_content),
        )
        .route(
            "/api/generate-image",
            post(content::handlers::handle_generate_image),
        )
        // Interview
        .route(
            "/api/analyze-job-posting",
            post(interview::handlers::handle_analyze_job_posting),
        )
        .route(
            "/api/start-interview",
            post(interview::handlers::handle_start_interview),
        )
        .route(
            "/api/interview/:session_id",
            get(interview::handlers::handle_get_session),
        )
        .route(
            "/api/submit-answer",
            post(interview::handlers::handle_submit_answer),
        )
        .route(
            "/api/generate-report",
            post(interview::handlers::handle_generate_report),
        )
        .route(
            "/api/download-report/:filename",
            get(interview::handlers::handle_download_report),
        )
        // Networking & self-introduction
        .route(
            "/api/networking-ai",
            post(networking::handlers::handle_networking),
        )
        .route(
            "/api/generate-answer",
            post(self_intro::handlers::handle_generate_answer),
        )
        // Posture
        .route("/api/posture/setup", post(posture::handlers::handle_setup))
        .route(
            "/api/posture/analyze",
            post(posture::handlers::handle_analyze),
        )
        .route(
            "/api/posture/landmarks",
            post(posture::handlers::handle_landmarks),
        )
        .route(
            "/api/posture/draw-landmarks",
            post(posture::handlers::handle_draw_landmarks),
        )
        .route(
            "/api/posture/settings",
            get(posture::handlers::handle_get_settings)
                .post(posture::handlers::handle_save_settings),
        )
        .route("/api/posture/hello", get(posture::handlers::handle_hello))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use std::sync::Arc;

    use crate::config::Config;
    use crate::posture::estimator::fakes::FixedPoseEstimator;
    use crate::posture::landmarks::fixtures::{shifted, upright};
    use crate::posture::landmarks::{Landmark, LandmarkSet};

    fn app(dir: &std::path::Path) -> Router {
        build_router(AppState::for_tests(Config::for_tests(dir)))
    }

    /// Router whose pose estimator returns `landmarks` for every image.
    fn posture_app(dir: &std::path::Path, landmarks: Option<LandmarkSet>) -> Router {
        let mut state = AppState::for_tests(Config::for_tests(dir));
        state.pose = Arc::new(FixedPoseEstimator(landmarks));
        build_router(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_on_both_paths() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        for path in ["/health", "/api/health"] {
            let (status, body) = send(&app, get(path)).await;
            assert_eq!(status, StatusCode::OK);
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(json["status"], "healthy");
            assert_eq!(json["service"], "careerwell-api");
        }
    }

    #[tokio::test]
    async fn test_unconfigured_providers_answer_503() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, _) = send(&app, post_json("/api/chat", json!({"message": "hi"}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = send(
            &app,
            post_json("/api/networking-ai", json!({"type": "email", "input": "x"})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let image = crate::posture::image::fixtures::grey_data_url(8, 8);
        let (status, _) = send(
            &app,
            post_json("/api/posture/landmarks", json!({"image": image})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) =
            send(&app, post_json("/api/networking-ai", json!({"type": "email"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");

        let (status, _) = send(&app, post_json("/api/chat", json!({"message": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            post_json("/api/start-interview", json!({"questions": [], "num_questions": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_interview_flow_without_providers() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(
            &app,
            post_json(
                "/api/analyze-job-posting",
                json!({"company": "Acme", "position": "Backend 개발자"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let analysis: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(analysis["job_info"]["company"], "Acme");
        let questions = analysis["questions"].as_array().unwrap().clone();
        assert_eq!(questions.len(), 40);

        let (status, body) = send(
            &app,
            post_json(
                "/api/start-interview",
                json!({"questions": questions, "num_questions": 5, "difficulty_level": "mixed"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let started: Value = serde_json::from_slice(&body).unwrap();
        let session_id = started["session_id"].as_str().unwrap().to_string();
        assert_eq!(started["questions"].as_array().unwrap().len(), 5);

        let (status, body) = send(
            &app,
            post_json(
                "/api/submit-answer",
                json!({
                    "question": started["questions"][0]["question"],
                    "answer": "저는 팀 프로젝트 경험이 있습니다. 그래서 협업을 배웠습니다.",
                    "time_taken": 90,
                    "max_time": 120,
                    "session_id": session_id,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let answered: Value = serde_json::from_slice(&body).unwrap();
        assert!(answered["score"].as_u64().unwrap() <= 100);
        assert_eq!(answered["next_question"]["question_number"], 2);

        let (status, body) = send(&app, get(&format!("/api/interview/{session_id}"))).await;
        assert_eq!(status, StatusCode::OK);
        let session: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(session["answers"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let uri = format!("/api/interview/{}", uuid::Uuid::new_v4());
        let (status, _) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_generate_and_download() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(
            &app,
            post_json(
                "/api/generate-report",
                json!({
                    "session_id": "s1",
                    "questions": ["자기소개를 해주세요."],
                    "answers": ["안녕하세요, 저는 개발자입니다."],
                    "scores": [78],
                    "feedback": ["적절한 길이의 답변입니다."],
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let report: Value = serde_json::from_slice(&body).unwrap();
        let url = report["download_url"].as_str().unwrap().to_string();

        let response = app.clone().oneshot(get(&url)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert!(response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .starts_with("attachment"));
    }

    #[tokio::test]
    async fn test_download_rejects_bad_names() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, _) = send(&app, get("/api/download-report/notes.txt")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/api/download-report/..%2Fsecret.pdf")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, get("/api/download-report/missing.pdf")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_quotes_and_posture_hello() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(&app, get("/api/quotes?emotion=sad")).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["emotion"], "sad");

        let (status, _) = send(&app, get("/api/posture/hello")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_posture_analyze_prefers_landmarks_over_images() {
        let dir = tempfile::tempdir().unwrap();
        // no pose service: any image would have to be detected and fail
        let app = app(dir.path());

        let (status, body) = send(
            &app,
            post_json(
                "/api/posture/analyze",
                json!({
                    "base_image": "%%% not an image %%%",
                    "current_image": "%%% not an image %%%",
                    "base_landmarks": upright(),
                    "current_landmarks": upright(),
                    "movement_threshold": "high",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["difference"], 0.0);
        assert_eq!(json["status"], "normal");
        assert_eq!(json["movement_threshold"], "high");
        assert_eq!(json["thresholds_used"]["normal"], 0.5);
    }

    #[tokio::test]
    async fn test_posture_analyze_uses_saved_tier_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let moved = shifted(&upright(), 0.2);

        // difference 0.3: normal under the default medium tier
        let request = json!({"base_landmarks": upright(), "current_landmarks": moved});
        let (status, body) = send(&app, post_json("/api/posture/analyze", request.clone())).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["movement_threshold"], "medium");
        assert_eq!(json["status"], "normal");

        let (status, _) = send(
            &app,
            post_json("/api/posture/settings", json!({"movement_threshold": "low"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // same difference is a warning once the low tier is saved
        let (_, body) = send(&app, post_json("/api/posture/analyze", request)).await;
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["movement_threshold"], "low");
        assert_eq!(json["status"], "warning");
    }

    #[tokio::test]
    async fn test_posture_analyze_incomplete_set_is_alert() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());
        let partial = LandmarkSet::new(vec![Landmark::new(0.5, 0.5, 0.0); 5]);

        let (status, body) = send(
            &app,
            post_json(
                "/api/posture/analyze",
                json!({"base_landmarks": upright(), "current_landmarks": partial, "movement_threshold": "high"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["difference"], 1.0);
        assert_eq!(json["status"], "alert");
        assert_eq!(json["current_score"], 0.5);
    }

    #[tokio::test]
    async fn test_posture_analyze_requires_image_without_landmarks() {
        let dir = tempfile::tempdir().unwrap();
        let app = posture_app(dir.path(), Some(upright()));

        let (status, body) = send(
            &app,
            post_json("/api/posture/analyze", json!({"base_landmarks": upright()})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("current_image"));
    }

    #[tokio::test]
    async fn test_posture_analyze_detects_from_images() {
        let dir = tempfile::tempdir().unwrap();
        let app = posture_app(dir.path(), Some(upright()));
        let image = crate::posture::image::fixtures::grey_data_url(16, 16);

        let (status, body) = send(
            &app,
            post_json(
                "/api/posture/analyze",
                json!({"base_image": image, "current_landmarks": shifted(&upright(), 0.5)}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["difference"], 0.75);
        assert_eq!(json["status"], "alert");
    }

    #[tokio::test]
    async fn test_posture_setup_saves_baseline() {
        let dir = tempfile::tempdir().unwrap();
        let app = posture_app(dir.path(), Some(upright()));
        let image = crate::posture::image::fixtures::grey_data_url(16, 16);

        let (status, body) =
            send(&app, post_json("/api/posture/setup", json!({"image": image}))).await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["posture_score"], 1.0);
        assert_eq!(json["status"], "normal");

        let filename = json["filename"].as_str().unwrap();
        assert!(filename.starts_with("base_posture_"));
        assert!(filename.ends_with(".jpg"));
        let saved = dir.path().join("uploads").join("posture").join(filename);
        let bytes = std::fs::read(saved).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[tokio::test]
    async fn test_posture_setup_requires_image() {
        let dir = tempfile::tempdir().unwrap();
        let app = posture_app(dir.path(), Some(upright()));
        let (status, _) = send(&app, post_json("/api/posture/setup", json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            post_json("/api/posture/setup", json!({"image": "%%%"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_posture_no_person_detected_is_400() {
        let dir = tempfile::tempdir().unwrap();
        let app = posture_app(dir.path(), None);
        let image = crate::posture::image::fixtures::grey_data_url(16, 16);

        for uri in ["/api/posture/setup", "/api/posture/landmarks", "/api/posture/draw-landmarks"] {
            let (status, body) = send(&app, post_json(uri, json!({"image": image}))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let json: Value = serde_json::from_slice(&body).unwrap();
            assert!(json["error"]["message"]
                .as_str()
                .unwrap()
                .contains("No person was detected"));
        }
        assert!(!dir.path().join("uploads").join("posture").exists());
    }

    #[tokio::test]
    async fn test_posture_landmarks_and_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let app = posture_app(dir.path(), Some(upright()));
        let image = crate::posture::image::fixtures::grey_data_url(32, 32);

        let (status, body) = send(
            &app,
            post_json("/api/posture/landmarks", json!({"image": image})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["landmark_count"], 33);
        assert_eq!(json["landmarks"].as_array().unwrap().len(), 33);

        let (status, body) = send(
            &app,
            post_json("/api/posture/draw-landmarks", json!({"image": image})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["landmark_count"], 33);
        assert!(json["image"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn test_posture_settings_round_trip_clamps() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let (status, body) = send(&app, get("/api/posture/settings")).await;
        assert_eq!(status, StatusCode::OK);
        let defaults: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(defaults["movement_threshold"], "medium");

        let (status, body) = send(
            &app,
            post_json(
                "/api/posture/settings",
                json!({
                    "movement_threshold": "HIGH",
                    "interval_secs": 1,
                    "alert_count": 0,
                    "background_mode": true,
                    "notification_enabled": false,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let saved: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(saved["interval_secs"], 3);
        assert_eq!(saved["alert_count"], 1);

        let (_, body) = send(&app, get("/api/posture/settings")).await;
        let stored: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(stored, saved);
        assert_eq!(stored["movement_threshold"], "high");
        assert_eq!(stored["background_mode"], true);
        assert_eq!(stored["notification_enabled"], false);
    }
}
