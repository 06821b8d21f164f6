use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Ok,
    NotFound,
    Skipped,
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Ok => "ok",
            SyncStatus::NotFound => "not_found",
            SyncStatus::Skipped => "skipped",
            SyncStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Resultado de uma execução do processador. Só é consumido pelos logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub status: SyncStatus,
    pub detail: String,
}

impl SyncOutcome {
    pub fn ok(detail: impl Into<String>) -> Self {
        Self { status: SyncStatus::Ok, detail: detail.into() }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self { status: SyncStatus::NotFound, detail: detail.into() }
    }

    pub fn skipped(detail: impl Into<String>) -> Self {
        Self { status: SyncStatus::Skipped, detail: detail.into() }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        Self { status: SyncStatus::Error, detail: detail.into() }
    }
}
