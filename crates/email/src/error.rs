//! Error types for template rendering and delivery

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing template variable: {0}")]
    MissingVariable(String),

    #[error("malformed template at byte {position}: {reason}")]
    MalformedTemplate { position: usize, reason: &'static str },

    #[error("invalid email type: {0}")]
    UnknownEmailType(String),

    #[error("email delivery failed: {0}")]
    Delivery(String),
}

pub type EmailResult<T> = Result<T, EmailError>;
