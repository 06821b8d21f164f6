use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_API_VERSION: &str = "2022-06-28";
pub const DEFAULT_EXTERNAL_ID_PROPERTY: &str = "Todoist ID";
pub const DEFAULT_DONE_PROPERTY: &str = "Done";
pub const DEFAULT_SYNCED_AT_PROPERTY: &str = "Last Sync Time";

/// Configuração imutável do cliente, montada uma vez no startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordsConfig {
    pub api_token: String,
    pub database_id: String,
    pub base_url: String,
    pub api_version: String,
    /// Propriedade rich-text que guarda o ID da tarefa externa
    pub external_id_property: String,
    /// Propriedade checkbox de conclusão
    pub done_property: String,
    /// Propriedade date com o instante da última sincronização
    pub synced_at_property: String,
    /// Timeout total por requisição. `None` mantém o default do reqwest (sem timeout).
    pub timeout_secs: Option<u64>,
}

impl RecordsConfig {
    pub fn new(api_token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            database_id: database_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            external_id_property: DEFAULT_EXTERNAL_ID_PROPERTY.to_string(),
            done_property: DEFAULT_DONE_PROPERTY.to_string(),
            synced_at_property: DEFAULT_SYNCED_AT_PROPERTY.to_string(),
            timeout_secs: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Registro encontrado no banco remoto. Nunca é cacheado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRef {
    pub record_id: String,
    pub external_task_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResult {
    pub id: String,
}
