//! Stub em memória de `RecordStore` para os testes do processador e do router

use async_trait::async_trait;
use records::{RecordRef, RecordStore, RecordsError};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreCall {
    Find(String),
    Update(String, bool),
}

#[derive(Default)]
pub(crate) struct RecordingStore {
    record_id: Option<String>,
    find_error: Option<u16>,
    update_error: Option<u16>,
    panic_on_find: bool,
    delay: Duration,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    pub(crate) fn with_record(record_id: &str) -> Self {
        Self {
            record_id: Some(record_id.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn failing_find(mut self, status: u16) -> Self {
        self.find_error = Some(status);
        self
    }

    pub(crate) fn failing_update(mut self, status: u16) -> Self {
        self.update_error = Some(status);
        self
    }

    pub(crate) fn panicking(mut self) -> Self {
        self.panic_on_find = true;
        self
    }

    /// Atraso artificial aplicado a cada chamada remota
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn update_calls(&self) -> Vec<(String, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Update(id, done) => Some((id, done)),
                StoreCall::Find(_) => None,
            })
            .collect()
    }

    /// Espera (até 2s) que o stub registre pelo menos `count` chamadas
    pub(crate) async fn wait_for_calls(&self, count: usize) -> Vec<StoreCall> {
        for _ in 0..200 {
            let calls = self.calls();
            if calls.len() >= count {
                return calls;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.calls()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn find_by_external_id(&self, external_id: &str) -> records::Result<Option<RecordRef>> {
        self.record(StoreCall::Find(external_id.to_string()));
        if self.panic_on_find {
            panic!("stub lookup panicked");
        }
        tokio::time::sleep(self.delay).await;

        if let Some(status) = self.find_error {
            return Err(RecordsError::Api { status, body: "stub failure".to_string() });
        }
        Ok(self.record_id.as_ref().map(|id| RecordRef {
            record_id: id.clone(),
            external_task_id: external_id.to_string(),
        }))
    }

    async fn set_done_status(&self, record_id: &str, done: bool) -> records::Result<()> {
        self.record(StoreCall::Update(record_id.to_string(), done));
        tokio::time::sleep(self.delay).await;

        match self.update_error {
            Some(status) => Err(RecordsError::Api { status, body: "stub failure".to_string() }),
            None => Ok(()),
        }
    }
}
