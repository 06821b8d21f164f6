pub mod sync_outcome;
pub mod webhook_payload;

pub use sync_outcome::{SyncOutcome, SyncStatus};
pub use webhook_payload::{InboundEvent, TodoistEventData, TodoistWebhookPayload};
