use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Corpo do webhook enviado pelo Todoist
///
/// Só `event_name` é obrigatório. A ausência de `event_data` ou de
/// `event_data.id` não é erro de parsing: o processador registra
/// "missing id" em background.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TodoistWebhookPayload {
    pub event_name: String,
    #[serde(default)]
    pub event_data: Option<TodoistEventData>,
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TodoistEventData {
    /// String nas versões atuais da API, número nas antigas
    #[serde(default)]
    pub id: Option<Value>,
    /// Opcionais e não usados no sync: qualquer tipo JSON é aceito
    #[serde(default)]
    pub url: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,

    // Campos adicionais que podem vir
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Evento normalizado, vive apenas durante uma requisição
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub event_name: String,
    pub external_task_id: Option<String>,
    pub task_url: Option<String>,
}

impl InboundEvent {
    /// Faz o parse do corpo bruto do webhook
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let payload: TodoistWebhookPayload = serde_json::from_slice(body)?;
        Ok(Self::from(payload))
    }

    /// ID externo utilizável: presente e não vazio
    pub fn task_id(&self) -> Option<&str> {
        self.external_task_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

impl From<TodoistWebhookPayload> for InboundEvent {
    fn from(payload: TodoistWebhookPayload) -> Self {
        let data = payload.event_data.unwrap_or_default();

        Self {
            event_name: payload.event_name,
            external_task_id: data.id.as_ref().and_then(id_to_string),
            task_url: data.url.and_then(|url| url.as_str().map(str::to_string)),
        }
    }
}

/// Converte o ID para a forma string sem outra normalização
fn id_to_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
