//! Execução em background (fire-and-forget) do processador de sincronização

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::models::{InboundEvent, SyncOutcome};
use crate::services::SyncProcessor;
use crate::utils::logging::*;

/// Contador das execuções ainda não terminadas
#[derive(Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// Decrementa o contador quando a task externa termina (ou é descartada)
struct InFlightGuard(Arc<InFlight>);

impl InFlightGuard {
    fn acquire(in_flight: &Arc<InFlight>) -> Self {
        in_flight.count.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(in_flight))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

/// Agenda uma execução do [`SyncProcessor`] por evento recebido
///
/// Cada execução roda numa task tokio própria, independente da requisição
/// que a originou. Não há cancelamento, fila ou deduplicação entre execuções.
/// As execuções em andamento são contadas para que o shutdown espere por
/// elas via [`SyncDispatcher::drain`].
#[derive(Clone)]
pub struct SyncDispatcher {
    processor: SyncProcessor,
    in_flight: Arc<InFlight>,
}

impl SyncDispatcher {
    pub fn new(processor: SyncProcessor) -> Self {
        Self {
            processor,
            in_flight: Arc::new(InFlight::default()),
        }
    }

    /// Agenda o processamento e retorna imediatamente
    ///
    /// O handler HTTP descarta o handle; a execução continua e é contada até
    /// terminar. Um panic dentro do processamento é capturado pela task
    /// interna e vira `None`, sem derrubar o processo.
    pub fn schedule(&self, event: InboundEvent, correlation_id: String) -> JoinHandle<Option<SyncOutcome>> {
        let processor = self.processor.clone();
        let guard = InFlightGuard::acquire(&self.in_flight);

        tokio::spawn(async move {
            let _guard = guard;
            let run_id = correlation_id.clone();
            let run = tokio::spawn(async move { processor.process(&event, &run_id).await });

            match run.await {
                Ok(outcome) => Some(outcome),
                Err(e) => {
                    log_error(&format!(
                        "❌ Background sync task aborted (req_id: {}): {}",
                        correlation_id, e
                    ));
                    None
                }
            }
        })
    }

    /// Execuções agendadas que ainda não terminaram
    pub fn pending(&self) -> usize {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    /// Espera as execuções em andamento terminarem, por no máximo `max_wait`
    ///
    /// Retorna quantas ainda estavam rodando quando a espera acabou.
    pub async fn drain(&self, max_wait: Duration) -> usize {
        let wait_idle = async {
            loop {
                let notified = self.in_flight.idle.notified();
                tokio::pin!(notified);
                // Registra antes de ler o contador para não perder o notify
                notified.as_mut().enable();

                if self.pending() == 0 {
                    return;
                }
                notified.await;
            }
        };

        let _ = tokio::time::timeout(max_wait, wait_idle).await;
        self.pending()
    }
}
