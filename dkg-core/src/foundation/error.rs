use crate::foundation::types::Index;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ConfigError,
    FastSyncWithoutAuth,
    UnknownSender,
    SignatureVerificationFailed,
    SigningFailed,
    EngineFailed,
    SerializationError,
    NetworkError,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error)]
pub enum DkgError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("fast sync only allowed with authentication enabled")]
    FastSyncWithoutAuth,

    #[error("no node with index {index} in the {registry} list")]
    UnknownSender { index: Index, registry: &'static str },

    #[error("bundle signature verification failed")]
    SignatureVerificationFailed,

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("engine failed: {0}")]
    EngineFailed(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("{0}")]
    Message(String),
}

impl DkgError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DkgError::ConfigError(_) => ErrorCode::ConfigError,
            DkgError::FastSyncWithoutAuth => ErrorCode::FastSyncWithoutAuth,
            DkgError::UnknownSender { .. } => ErrorCode::UnknownSender,
            DkgError::SignatureVerificationFailed => ErrorCode::SignatureVerificationFailed,
            DkgError::SigningFailed(_) => ErrorCode::SigningFailed,
            DkgError::EngineFailed(_) => ErrorCode::EngineFailed,
            DkgError::SerializationError(_) => ErrorCode::SerializationError,
            DkgError::NetworkError(_) => ErrorCode::NetworkError,
            DkgError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, DkgError>;
