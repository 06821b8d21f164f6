/// Main Application: fast-ack de webhooks do Todoist
///
/// Arquitetura:
/// - Webhook recebe o evento, responde imediatamente com `req_id`
/// - Task tokio em background busca o registro pelo ID da tarefa
/// - Evento é mapeado para Done = true/false (ou ignorado)
/// - Registro é atualizado no banco de documentos

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use task_sync_middleware::config::Settings;
use task_sync_middleware::services::{SyncDispatcher, SyncProcessor};
use task_sync_middleware::utils::logging::*;
use task_sync_middleware::utils::AppError;
use task_sync_middleware::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Carregar variáveis de ambiente do arquivo .env (se existir)
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // Inicializar tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if dotenv_loaded {
        log_info("✅ Arquivo .env carregado com sucesso");
    }

    // Carregar configurações
    let settings = Settings::new().map_err(AppError::from)?;
    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    // Sem token ou database_id as chamadas remotas falham com 401/404, sem tratamento especial
    if settings.records.token.is_empty() {
        log_warning("⚠️ NOTION_TOKEN não configurado - chamadas ao banco de documentos vão falhar");
    }
    if settings.records.database_id.is_empty() {
        log_warning("⚠️ NOTION_DATABASE_ID não configurado - consultas vão falhar");
    }
    if settings.records.timeout_secs.is_none() {
        log_info("ℹ️ Sem timeout nas chamadas remotas (records.timeout_secs não definido)");
    }
    if settings.webhook.validate_signature && settings.signature_secret().is_none() {
        log_warning("⚠️ validate_signature ativo sem TODOIST_CLIENT_SECRET - assinatura não será verificada");
    }

    let records_client = records::RecordsClient::new(settings.records_config()).map_err(AppError::from)?;
    let processor = SyncProcessor::new(Arc::new(records_client));

    let app_state = Arc::new(AppState {
        settings: settings.clone(),
        dispatcher: SyncDispatcher::new(processor),
    });

    let app = build_router(Arc::clone(&app_state));

    let port = settings.server.port;
    let listener = TcpListener::bind(format!("{}:{}", settings.server.host, port)).await?;

    log_server_startup(port);
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Syncs já agendados continuam rodando; espera por eles antes de sair
    let pending = app_state.dispatcher.pending();
    if pending > 0 {
        log_info(&format!("⏳ Aguardando {} sincronização(ões) em andamento...", pending));
    }
    let grace = Duration::from_secs(settings.server.shutdown_grace_secs);
    let remaining = app_state.dispatcher.drain(grace).await;
    if remaining > 0 {
        log_warning(&format!(
            "⚠️ {} sincronização(ões) interrompida(s) após {}s de espera no shutdown",
            remaining,
            grace.as_secs()
        ));
    }

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}
