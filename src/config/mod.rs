pub mod settings;

pub use settings::{RecordsSettings, ServerSettings, Settings, WebhookSettings};
