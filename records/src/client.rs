//! Cliente HTTP para a API do banco de documentos

use crate::error::{RecordsError, Result};
use crate::types::{QueryResponse, RecordRef, RecordsConfig};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;

/// Operações remotas usadas pela sincronização
///
/// Implementada por [`RecordsClient`]; stubs em memória implementam a mesma
/// trait nos testes do processador.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Busca o registro cujo ID externo é exatamente `external_id`
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<RecordRef>>;

    /// Marca o registro como concluído (ou não) e grava o instante da sincronização
    async fn set_done_status(&self, record_id: &str, done: bool) -> Result<()>;
}

/// Cliente para o banco de documentos remoto
#[derive(Clone)]
pub struct RecordsClient {
    http_client: HttpClient,
    config: RecordsConfig,
}

impl RecordsClient {
    /// Cria um novo cliente a partir da configuração
    ///
    /// Sem `timeout_secs` o cliente herda o default do reqwest (nenhum timeout).
    pub fn new(config: RecordsConfig) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| RecordsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http_client, config })
    }

    pub fn config(&self) -> &RecordsConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.config.api_token))
            .header("Notion-Version", &self.config.api_version)
            .header("Content-Type", "application/json")
    }

    /// Corpo do filtro de igualdade sobre a propriedade de ID externo
    fn query_body(&self, external_id: &str) -> Value {
        json!({
            "filter": {
                "property": self.config.external_id_property,
                "rich_text": { "equals": external_id }
            }
        })
    }

    fn update_body(&self, done: bool, synced_at: &str) -> Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            self.config.done_property.clone(),
            json!({ "checkbox": done }),
        );
        properties.insert(
            self.config.synced_at_property.clone(),
            json!({ "date": { "start": synced_at } }),
        );
        json!({ "properties": properties })
    }

    /// Corpo do update com o instante da sincronização (UTC, RFC 3339) calculado agora
    fn done_status_body(&self, done: bool) -> Value {
        self.update_body(done, &chrono::Utc::now().to_rfc3339())
    }

    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let status_code = status.as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("Remote API error ({}): {}", status_code, body);

            Err(RecordsError::Api {
                status: status_code,
                body,
            })
        }
    }
}

#[async_trait]
impl RecordStore for RecordsClient {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<RecordRef>> {
        let url = self.url(&format!("/databases/{}/query", self.config.database_id));

        tracing::debug!("POST {} (external_id: {})", url, external_id);

        let response = self
            .authorized(self.http_client.post(&url))
            .json(&self.query_body(external_id))
            .send()
            .await?;

        let response = self.handle_response(response).await?;
        let body: QueryResponse = serde_json::from_slice(&response.bytes().await?)?;

        if body.results.len() > 1 {
            tracing::warn!(
                "{} registros com ID externo {}; usando o primeiro",
                body.results.len(),
                external_id
            );
        }

        Ok(body.results.into_iter().next().map(|result| RecordRef {
            record_id: result.id,
            external_task_id: external_id.to_string(),
        }))
    }

    async fn set_done_status(&self, record_id: &str, done: bool) -> Result<()> {
        let url = self.url(&format!("/pages/{}", record_id));
        let body = self.done_status_body(done);

        tracing::debug!("PATCH {} with body: {}", url, body);

        let response = self
            .authorized(self.http_client.patch(&url))
            .json(&body)
            .send()
            .await?;

        self.handle_response(response).await?;
        Ok(())
    }
}
