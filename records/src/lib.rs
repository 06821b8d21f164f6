//! Cliente da API do banco de documentos
//!
//! Este crate encapsula as duas operações remotas usadas pela sincronização:
//!
//! - Consulta de registro pelo ID externo da tarefa (`find_by_external_id`)
//! - Atualização do status de conclusão do registro (`set_done_status`)
//!
//! Cada chamada envia exatamente uma requisição HTTP com o header de
//! autenticação (Bearer) e o header de versão da API. Não há retry interno:
//! uma falha de rede ou status não-2xx volta imediatamente para quem chamou.
//!
//! # Exemplo
//!
//! ```rust,ignore
//! use records::{RecordsClient, RecordsConfig, RecordStore};
//!
//! let config = RecordsConfig::new(token, database_id);
//! let client = RecordsClient::new(config)?;
//!
//! if let Some(record) = client.find_by_external_id("T123").await? {
//!     client.set_done_status(&record.record_id, true).await?;
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{RecordStore, RecordsClient};
pub use error::{RecordsError, Result};
pub use types::{RecordRef, RecordsConfig};
