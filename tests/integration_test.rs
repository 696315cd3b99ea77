// End-to-end synthesis tests
// Drive the HTTP router against a scripted engine and check the full pipeline

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bytes::Bytes;
use serde_json::{json, Value};
use sori_engine::{
    EngineAudio, EngineConfig, EngineHandle, ScriptedEngine, SpeechEngine, MIME_MPEG,
};
use sori_server::http::{create_router, ApiState};
use std::sync::Arc;
use tokio_test::assert_ok;
use tower::ServiceExt;

fn test_config() -> EngineConfig {
    EngineConfig {
        primary_language: "ko".to_string(),
        secondary_language: "en".to_string(),
        request_timeout_secs: 5,
        ..EngineConfig::default()
    }
}

// Engine that echoes the resolved pipeline inputs back as the audio payload,
// so response bodies show exactly what the engine was asked to do
fn echo_engine() -> Arc<dyn SpeechEngine> {
    Arc::new(ScriptedEngine::new(
        "echo-engine",
        vec!["alpha".to_string(), "beta".to_string()],
        |text, voice| {
            let line = format!(
                "{}|{}|{}|{}",
                text, voice.language, voice.speaker, voice.style
            );
            Ok(EngineAudio::Encoded {
                bytes: Bytes::from(line.into_bytes()),
                mime_type: MIME_MPEG,
                sample_rate: 24_000,
            })
        },
    ))
}

async fn create_test_router() -> Router {
    let handle = EngineHandle::with_engine(test_config(), echo_engine()).await;
    create_router(ApiState {
        handle: Arc::new(handle),
    })
}

fn tts_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/tts")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_tts_end_to_end() {
    let app = create_test_router().await;

    let response = app
        .oneshot(tts_request(json!({"text": "Hello world"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "audio/mpeg"
    );
    // ASCII text selects the secondary language, speaker falls back to the
    // first catalog entry, style stays at the default
    assert_eq!(
        body_string(response).await,
        "Hello world|en|alpha|Natural speech"
    );
}

#[tokio::test]
async fn test_sequence_text_is_joined() {
    let app = create_test_router().await;

    let response = app
        .oneshot(tts_request(json!({"text": ["Hello", "world", "again"]})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.starts_with("Hello world again|"));
}

#[tokio::test]
async fn test_hangul_text_selects_primary_language() {
    let app = create_test_router().await;

    let response = app
        .oneshot(tts_request(json!({"text": "안녕하세요"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        "안녕하세요|ko|alpha|Natural speech"
    );
}

#[tokio::test]
async fn test_inputs_and_parameters_aliases() {
    let app = create_test_router().await;

    let body = json!({
        "inputs": "Hello there",
        "parameters": {"speaker": "beta", "prompt": "Speak slowly"}
    });
    let response = app.oneshot(tts_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_string(response).await,
        "Hello there|en|beta|Speak slowly"
    );
}

#[tokio::test]
async fn test_explicit_language_skips_inference() {
    let app = create_test_router().await;

    let response = app
        .oneshot(tts_request(json!({"text": "Hello", "language": "ja"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Hello|ja|alpha|Natural speech");
}

#[tokio::test]
async fn test_content_type_header_not_required() {
    let app = create_test_router().await;

    let request = Request::builder()
        .method("POST")
        .uri("/tts")
        .body(Body::from(json!({"text": "Hello"}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wav_output_content_type() {
    let samples_engine: Arc<dyn SpeechEngine> = Arc::new(ScriptedEngine::new(
        "wave-engine",
        vec!["alpha".to_string()],
        |_, _| {
            Ok(EngineAudio::Samples {
                pcm: vec![0.0, 0.5, -0.5, 0.25],
                sample_rate: 22_050,
            })
        },
    ));
    let handle = EngineHandle::with_engine(test_config(), samples_engine).await;
    let app = create_router(ApiState {
        handle: Arc::new(handle),
    });

    let response = app
        .oneshot(tts_request(json!({"text": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers().get("content-type").unwrap(), "audio/wav");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"WAVE");
}

#[tokio::test]
async fn test_health_reports_ready_engine() {
    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["engine"], "echo-engine");
}

#[tokio::test]
async fn test_health_reports_failed_engine() {
    let broken: Arc<dyn SpeechEngine> = Arc::new(
        ScriptedEngine::new("echo-engine", vec!["alpha".to_string()], |_, _| {
            Ok(EngineAudio::Encoded {
                bytes: Bytes::from_static(b"unused"),
                mime_type: MIME_MPEG,
                sample_rate: 24_000,
            })
        })
        .unavailable(),
    );
    let handle = EngineHandle::with_engine(test_config(), broken).await;
    let app = create_router(ApiState {
        handle: Arc::new(handle),
    });

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // Health never fails, it reports the broken engine instead
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["engine"], "echo-engine");
}

#[tokio::test]
async fn test_speakers_endpoint_lists_catalog() {
    let handle = EngineHandle::with_engine(test_config(), echo_engine()).await;
    let speakers = tokio_test::assert_ok!(handle.speakers());
    assert_eq!(speakers, ["alpha".to_string(), "beta".to_string()]);

    let app = create_router(ApiState {
        handle: Arc::new(handle),
    });
    let response = app
        .oneshot(
            Request::builder()
                .uri("/speakers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["engine"], "echo-engine");
    assert_eq!(json["speakers"], json!(["alpha", "beta"]));
}

#[tokio::test]
async fn test_default_speaker_from_config() {
    let config = EngineConfig {
        default_speaker: Some("beta".to_string()),
        ..test_config()
    };
    let handle = EngineHandle::with_engine(config, echo_engine()).await;
    let app = create_router(ApiState {
        handle: Arc::new(handle),
    });

    let response = app
        .oneshot(tts_request(json!({"text": "Hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "Hello|en|beta|Natural speech");
}
