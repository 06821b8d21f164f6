// Biblioteca do middleware de sincronização de tarefas
// Expõe módulos para uso em testes e no binário

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub dispatcher: services::SyncDispatcher,
}

/// Rotas públicas do middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(handlers::WEBHOOK_PATH, post(handlers::handle_todoist_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
