//! Processador de sincronização: lookup → mapeamento → update para um evento
//!
//! Roda desacoplado da requisição HTTP. Nenhum erro sai daqui: tudo vira um
//! [`SyncOutcome`] que é apenas logado.

use records::RecordStore;
use std::sync::Arc;
use tracing::{info, info_span, Instrument};

use crate::models::{InboundEvent, SyncOutcome};
use crate::services::event_mapper::{map_event, MappedAction};
use crate::utils::logging::*;

#[derive(Clone)]
pub struct SyncProcessor {
    store: Arc<dyn RecordStore>,
}

impl SyncProcessor {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Executa a sincronização de um evento dentro de um span com o `req_id`
    pub async fn process(&self, event: &InboundEvent, correlation_id: &str) -> SyncOutcome {
        let span = info_span!(
            "sync",
            req_id = %correlation_id,
            event = %event.event_name,
        );

        async {
            let outcome = self.run(event).await;
            log_sync_outcome(&outcome);
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, event: &InboundEvent) -> SyncOutcome {
        let Some(task_id) = event.task_id() else {
            log_validation_error("event_data.id", "missing id");
            return SyncOutcome::error("missing id");
        };

        info!("🔎 Buscando registro para a tarefa {}", task_id);

        let record = match self.store.find_by_external_id(task_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return SyncOutcome::not_found(format!("no record for external id {}", task_id));
            }
            Err(e) => {
                log_records_api_error("find_by_external_id", e.status(), &e.to_string());
                return SyncOutcome::error(format!("lookup failed: {}", e));
            }
        };

        let done = match map_event(&event.event_name) {
            MappedAction::SetDone(done) => done,
            MappedAction::NoOp => {
                return SyncOutcome::skipped(format!("unmapped event {}", event.event_name));
            }
        };

        match self.store.set_done_status(&record.record_id, done).await {
            Ok(()) => {
                log_record_updated(&record.record_id, done);
                SyncOutcome::ok(format!(
                    "record {} set done={} for task {}",
                    record.record_id, done, task_id
                ))
            }
            Err(e) => {
                log_records_api_error("set_done_status", e.status(), &e.to_string());
                SyncOutcome::error(format!("update failed: {}", e))
            }
        }
    }
}
