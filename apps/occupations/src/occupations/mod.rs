// Occupation fetch pipeline:
// keyword → resolver (codes) → builder (detail + tasks per code) → store (JSON per code).
// All network access goes through onet_client.

pub mod builder;
pub mod handlers;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod store;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// Which step of a run produced a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Search,
    Detail,
    Tasks,
    Store,
}

/// A user-facing message produced during a run. Non-blocking: the run carries on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub stage: Stage,
    pub code: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn warning(stage: Stage, code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            stage,
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    pub fn error(stage: Stage, code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            stage,
            code: code.map(str::to_string),
            message: message.into(),
        }
    }
}
