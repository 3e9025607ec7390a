//! Error type shared by every layer of the shortener core.
//!
//! Each failure mode is its own variant so callers (the HTTP layer, the admin
//! CLI) can branch on [`AppError::kind`] instead of inspecting messages.

/// Coarse classification of an [`AppError`], cheap to copy and compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    MalformedCode,
    NotFound,
    StoreUnavailable,
    Empty,
    Cancelled,
    AllocationExhausted,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The long URL (or another caller-supplied argument) was rejected.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The short code contains characters outside the base62 alphabet.
    #[error("malformed short code '{code}': {reason}")]
    MalformedCode { code: String, reason: String },

    /// No live link record exists for the short code.
    #[error("short code '{code}' not found")]
    NotFound { code: String },

    /// The key-value store failed or did not answer in time.
    #[error("store unavailable during {operation}: {message}")]
    StoreUnavailable {
        operation: &'static str,
        message: String,
    },

    /// The ranking index holds no entries yet.
    #[error("no ranking data available")]
    Empty,

    /// The caller's cancellation signal fired before the operation completed.
    #[error("operation cancelled")]
    Cancelled,

    /// Every identifier drawn in a row was already taken.
    #[error("could not allocate a free identifier after {attempts} attempts")]
    AllocationExhausted { attempts: usize },
}

impl AppError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn malformed_code(code: impl Into<String>, reason: impl ToString) -> Self {
        Self::MalformedCode {
            code: code.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn store_unavailable(operation: &'static str, message: impl ToString) -> Self {
        Self::StoreUnavailable {
            operation,
            message: message.to_string(),
        }
    }

    /// Returns the variant without its payload.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::MalformedCode { .. } => ErrorKind::MalformedCode,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::StoreUnavailable { .. } => ErrorKind::StoreUnavailable,
            Self::Empty => ErrorKind::Empty,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::AllocationExhausted { .. } => ErrorKind::AllocationExhausted,
        }
    }
}
