//! One-shot notifications carried in the session until the next rendered page.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::warn;

use crate::error::Error;

const TOASTS_KEY: &str = "toasts";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn class(&self) -> &'static str {
        match self {
            ToastKind::Success => "toast toast--success",
            ToastKind::Error => "toast toast--error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }
}

pub async fn push(session: &Session, toast: Toast) -> Result<(), Error> {
    let mut pending: Vec<Toast> = session.get(TOASTS_KEY).await?.unwrap_or_default();
    pending.push(toast);
    session.insert(TOASTS_KEY, pending).await?;
    Ok(())
}

/// Take every pending toast. A store failure yields no toasts.
pub async fn drain(session: &Session) -> Vec<Toast> {
    match session.remove::<Vec<Toast>>(TOASTS_KEY).await {
        Ok(pending) => pending.unwrap_or_default(),
        Err(err) => {
            warn!(?err, "failed to read pending toasts");
            vec![]
        }
    }
}
