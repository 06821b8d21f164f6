/// Handler do webhook do Todoist
///
/// Fluxo (fast-ack):
/// 1. Gera um `req_id` curto para correlacionar os logs
/// 2. Valida a assinatura, se configurado
/// 3. Faz o parse do corpo; falha responde `status: error` na hora
/// 4. Agenda o processador em background e responde `status: ok`
///
/// A resposta nunca espera o processamento: o Todoist reenvia webhooks
/// lentos ou com falha, e cada reenvio duplicaria a sincronização.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use std::sync::Arc;
use tokio::time::Instant;

use crate::models::InboundEvent;
use crate::utils::logging::*;
use crate::utils::{AppError, AppResult};
use crate::AppState;

pub const WEBHOOK_PATH: &str = "/todoist-webhook";
pub const SIGNATURE_HEADER: &str = "X-Todoist-Hmac-SHA256";

pub async fn handle_todoist_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    request: Request<Body>,
) -> AppResult<Response> {
    let start_time = Instant::now();
    let req_id = new_correlation_id();
    log_request_received(WEBHOOK_PATH, "POST");

    let body_bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read request body: {}", e)))?;

    if let Some(secret) = state.settings.signature_secret() {
        if let Err(message) = verify_webhook_signature(&headers, &body_bytes, secret) {
            log_validation_error("webhook_signature", &format!("{} (req_id: {})", message, req_id));
            return Ok((StatusCode::UNAUTHORIZED, error_body(&req_id, &message)).into_response());
        }
    }

    let event = match InboundEvent::from_body(&body_bytes) {
        Ok(event) => event,
        Err(e) => {
            log_validation_error("payload", &format!("Invalid JSON: {} (req_id: {})", e, req_id));
            return Ok(error_body(&req_id, &format!("Invalid payload: {}", e)).into_response());
        }
    };

    log_info(&format!(
        "📥 Evento Todoist recebido: {} (task: {}, req_id: {})",
        event.event_name,
        event.task_id().unwrap_or("-"),
        req_id
    ));

    // Processar em background (não bloqueia a resposta)
    state.dispatcher.schedule(event, req_id.clone());

    let processing_time = start_time.elapsed().as_millis() as u64;
    log_request_processed(WEBHOOK_PATH, 200, processing_time);

    Ok(Json(json!({
        "status": "ok",
        "req_id": req_id
    }))
    .into_response())
}

/// Token curto e opaco, só para correlação de logs
pub fn new_correlation_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn error_body(req_id: &str, message: &str) -> Json<serde_json::Value> {
    Json(json!({
        "status": "error",
        "message": message,
        "req_id": req_id
    }))
}

/// Confere `X-Todoist-Hmac-SHA256`: base64 do HMAC-SHA256 do corpo bruto
fn verify_webhook_signature(headers: &HeaderMap, body: &[u8], secret: &str) -> Result<(), String> {
    use base64::Engine;
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| format!("Missing {} header", SIGNATURE_HEADER))?;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| format!("Invalid secret key: {}", e))?;
    mac.update(body);
    let expected = base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes());

    if !constant_time_eq(signature.trim().as_bytes(), expected.as_bytes()) {
        return Err("Invalid webhook signature".to_string());
    }

    Ok(())
}

// Comparação de tempo constante para evitar timing attacks
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::services::testing::{RecordingStore, StoreCall};
    use crate::services::{SyncDispatcher, SyncProcessor};
    use axum::http::{header, Method};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router_with(store: Arc<RecordingStore>, client_secret: Option<&str>) -> axum::Router {
        let state = Arc::new(AppState {
            settings: Settings::for_tests(client_secret),
            dispatcher: SyncDispatcher::new(SyncProcessor::new(store)),
        });
        crate::build_router(state)
    }

    fn webhook_request(body: &str, signature: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(WEBHOOK_PATH)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(signature) = signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn sign(secret: &str, body: &str) -> String {
        use base64::Engine;
        use hmac::{Hmac, Mac};
        let mut mac = Hmac::<sha2::Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body.as_bytes());
        base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }

    const COMPLETED_T123: &str = r#"{"event_name":"item:completed","event_data":{"id":"T123"}}"#;

    #[tokio::test]
    async fn test_completed_event_acks_and_updates_record() {
        let store = Arc::new(RecordingStore::with_record("R1"));
        let router = router_with(store.clone(), None);

        let (status, body) = send(&router, webhook_request(COMPLETED_T123, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(!body["req_id"].as_str().unwrap().is_empty());

        let calls = store.wait_for_calls(2).await;
        assert_eq!(
            calls,
            vec![
                StoreCall::Find("T123".to_string()),
                StoreCall::Update("R1".to_string(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_uncompleted_event_sets_done_false() {
        let store = Arc::new(RecordingStore::with_record("R1"));
        let router = router_with(store.clone(), None);

        let body = r#"{"event_name":"item:uncompleted","event_data":{"id":"T123"}}"#;
        let (_, response) = send(&router, webhook_request(body, None)).await;
        assert_eq!(response["status"], "ok");

        store.wait_for_calls(2).await;
        assert_eq!(store.update_calls(), vec![("R1".to_string(), false)]);
    }

    #[tokio::test]
    async fn test_record_not_found_never_updates_and_still_acks() {
        let store = Arc::new(RecordingStore::empty());
        let router = router_with(store.clone(), None);

        let (status, body) = send(&router, webhook_request(COMPLETED_T123, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        store.wait_for_calls(1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(store.calls(), vec![StoreCall::Find("T123".to_string())]);
    }

    #[tokio::test]
    async fn test_unmapped_event_issues_no_update() {
        let store = Arc::new(RecordingStore::with_record("R1"));
        let router = router_with(store.clone(), None);

        let body = r#"{"event_name":"item:added","event_data":{"id":"T123"}}"#;
        let (_, response) = send(&router, webhook_request(body, None)).await;
        assert_eq!(response["status"], "ok");

        store.wait_for_calls(1).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.update_calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_id_acks_without_remote_calls() {
        let store = Arc::new(RecordingStore::with_record("R1"));
        let router = router_with(store.clone(), None);

        let (status, body) =
            send(&router, webhook_request(r#"{"event_name":"item:completed","event_data":{}}"#, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_synchronously() {
        let store = Arc::new(RecordingStore::with_record("R1"));
        let router = router_with(store.clone(), None);

        let (status, body) = send(&router, webhook_request("this is not json", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().contains("Invalid payload"));
        assert!(!body["req_id"].as_str().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_ack_does_not_wait_for_slow_remote() {
        let store = Arc::new(RecordingStore::with_record("R1").with_delay(Duration::from_secs(2)));
        let router = router_with(store.clone(), None);

        let started = Instant::now();
        let (status, body) = tokio::time::timeout(
            Duration::from_millis(500),
            send(&router, webhook_request(COMPLETED_T123, None)),
        )
        .await
        .expect("webhook response waited for background sync");

        assert!(started.elapsed() < Duration::from_millis(500));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(store.update_calls().is_empty());
    }

    #[tokio::test]
    async fn test_each_request_gets_its_own_req_id() {
        let store = Arc::new(RecordingStore::empty());
        let router = router_with(store, None);

        let (_, first) = send(&router, webhook_request(COMPLETED_T123, None)).await;
        let (_, second) = send(&router, webhook_request(COMPLETED_T123, None)).await;

        assert_ne!(first["req_id"], second["req_id"]);
    }

    #[tokio::test]
    async fn test_valid_signature_is_accepted() {
        let store = Arc::new(RecordingStore::with_record("R1"));
        let router = router_with(store.clone(), Some("client-secret"));

        let signature = sign("client-secret", COMPLETED_T123);
        let (status, body) = send(&router, webhook_request(COMPLETED_T123, Some(&signature))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        store.wait_for_calls(2).await;
        assert_eq!(store.update_calls(), vec![("R1".to_string(), true)]);
    }

    #[tokio::test]
    async fn test_invalid_or_missing_signature_is_rejected() {
        let store = Arc::new(RecordingStore::with_record("R1"));
        let router = router_with(store.clone(), Some("client-secret"));

        let wrong = sign("another-secret", COMPLETED_T123);
        let (status, body) = send(&router, webhook_request(COMPLETED_T123, Some(&wrong))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], "error");

        let (status, body) = send(&router, webhook_request(COMPLETED_T123, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["message"].as_str().unwrap().contains(SIGNATURE_HEADER));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_health_check() {
        let router = router_with(Arc::new(RecordingStore::empty()), None);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[test]
    fn test_correlation_id_shape() {
        let id = new_correlation_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
