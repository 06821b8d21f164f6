use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use records::RecordsConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub records: RecordsSettings,
    pub webhook: WebhookSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Espera máxima pelos syncs em andamento no shutdown
    pub shutdown_grace_secs: u64,
}

/// Acesso ao banco de documentos. Token e database_id vazios não são
/// rejeitados aqui: as chamadas remotas falham com erro de autorização.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecordsSettings {
    pub token: String,
    pub database_id: String,
    pub base_url: String,
    pub api_version: String,
    pub external_id_property: String,
    pub done_property: String,
    pub synced_at_property: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WebhookSettings {
    #[serde(default)]
    pub client_secret: Option<String>,
    pub validate_signature: bool,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Self::defaults()?
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        Self::with_env_overrides(builder)?.build()?.try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.shutdown_grace_secs", 30)?
            .set_default("records.token", "")?
            .set_default("records.database_id", "")?
            .set_default("records.base_url", records::types::DEFAULT_BASE_URL)?
            .set_default("records.api_version", records::types::DEFAULT_API_VERSION)?
            .set_default(
                "records.external_id_property",
                records::types::DEFAULT_EXTERNAL_ID_PROPERTY,
            )?
            .set_default("records.done_property", records::types::DEFAULT_DONE_PROPERTY)?
            .set_default(
                "records.synced_at_property",
                records::types::DEFAULT_SYNCED_AT_PROPERTY,
            )?
            .set_default("webhook.validate_signature", false)
    }

    fn with_env_overrides(
        mut builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        // Nomes de variáveis usados no deploy original
        if let Ok(token) = std::env::var("NOTION_TOKEN") {
            builder = builder.set_override("records.token", token)?;
        }
        if let Ok(database_id) = std::env::var("NOTION_DATABASE_ID") {
            builder = builder.set_override("records.database_id", database_id)?;
        }
        if let Ok(secret) = std::env::var("TODOIST_CLIENT_SECRET") {
            builder = builder.set_override("webhook.client_secret", secret)?;
        }
        if let Some(port) = std::env::var("PORT").ok().and_then(|p| parse_port(&p)) {
            builder = builder.set_override("server.port", port)?;
        }

        Ok(builder.add_source(
            Environment::with_prefix("TASK_SYNC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        ))
    }

    /// Configuração do cliente remoto derivada das settings
    pub fn records_config(&self) -> RecordsConfig {
        RecordsConfig {
            api_token: self.records.token.clone(),
            database_id: self.records.database_id.clone(),
            base_url: self.records.base_url.clone(),
            api_version: self.records.api_version.clone(),
            external_id_property: self.records.external_id_property.clone(),
            done_property: self.records.done_property.clone(),
            synced_at_property: self.records.synced_at_property.clone(),
            timeout_secs: self.records.timeout_secs,
        }
    }

    /// Settings só com defaults, para os testes do router
    #[cfg(test)]
    pub(crate) fn for_tests(client_secret: Option<&str>) -> Self {
        let mut settings: Settings = Self::defaults()
            .and_then(|builder| builder.build())
            .and_then(|config| config.try_deserialize())
            .unwrap();
        settings.webhook.validate_signature = client_secret.is_some();
        settings.webhook.client_secret = client_secret.map(str::to_string);
        settings
    }

    /// Segredo a usar na validação da assinatura, se ela estiver habilitada
    pub fn signature_secret(&self) -> Option<&str> {
        if !self.webhook.validate_signature {
            return None;
        }
        self.webhook
            .client_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
    }
}

/// Valor de `PORT` inválido é ignorado com warning (fica a porta configurada)
fn parse_port(raw: &str) -> Option<u16> {
    match raw.trim().parse::<u16>() {
        Ok(port) => Some(port),
        Err(e) => {
            tracing::warn!("⚠️ PORT inválido ({:?}): {} - usando server.port da configuração", raw, e);
            None
        }
    }
}
