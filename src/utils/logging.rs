use tracing::{debug, error, info, warn};

use crate::models::{SyncOutcome, SyncStatus};

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_records_api_error(operation: &str, status: Option<u16>, error: &str) {
    error!("Records API error: {} - Status: {:?} - Error: {}", operation, status, error);
}

pub fn log_record_updated(record_id: &str, done: bool) {
    info!("✏️ Record updated successfully: {} - Done: {}", record_id, done);
}

/// Linha final de cada execução em background
pub fn log_sync_outcome(outcome: &SyncOutcome) {
    match outcome.status {
        SyncStatus::Ok => info!("✅ Sync finished: {} - {}", outcome.status, outcome.detail),
        SyncStatus::Skipped => info!("⏭️ Sync finished: {} - {}", outcome.status, outcome.detail),
        SyncStatus::NotFound => warn!("🔍 Sync finished: {} - {}", outcome.status, outcome.detail),
        SyncStatus::Error => error!("❌ Sync finished: {} - {}", outcome.status, outcome.detail),
    }
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 Task sync middleware server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
