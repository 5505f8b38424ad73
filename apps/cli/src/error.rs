//! # App Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Till                                   │
//! │                                                                         │
//! │  Menu action / subcommand                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, AppError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── StoreError::Persistence{..} ───┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Validation Error? ─── ValidationError ─────────── AppError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Menu: print "[CODE] message", show the next prompt                    │
//! │  Subcommand: print to stderr, exit status 1                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use till_core::{CoreError, ValidationError};
use till_store::StoreError;

use crate::state::ConfigError;

/// Error returned from console commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Bill #1009 not found"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Bill id, basket position or tax file line does not exist
    NotFound,

    /// Operator input failed a field rule
    ValidationError,

    /// Bill requested from an empty basket, or export from an empty ledger
    NothingToDo,

    /// File read or write failed
    StorageError,

    /// Stored file could not be understood, or bills are read-only
    /// because of one
    MalformedStorage,

    /// Config file unreadable or invalid
    ConfigError,

    /// Terminal prompt failed
    InputError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NothingToDo => "NOTHING_TO_DO",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::MalformedStorage => "MALFORMED_STORAGE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InputError => "INPUT_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl AppError {
    /// Creates a new app error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.to_string())
    }
}

/// Converts core errors to app errors.
impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::EmptyBasket => AppError::new(ErrorCode::NothingToDo, err.to_string()),
            CoreError::PositionOutOfRange { .. } => AppError::not_found(err.to_string()),
            CoreError::Validation(e) => AppError::from(e),
        }
    }
}

/// Converts storage errors to app errors.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Persistence { .. } | StoreError::Csv { .. } => {
                tracing::error!(error = %err, "Storage operation failed");
                AppError::new(ErrorCode::StorageError, err.to_string())
            }
            StoreError::MalformedStorage { .. } | StoreError::LedgerUnavailable { .. } => {
                AppError::new(ErrorCode::MalformedStorage, err.to_string())
            }
            StoreError::BillNotFound(_) | StoreError::TaxLineNotFound(_) => {
                AppError::not_found(err.to_string())
            }
            StoreError::TaxLineIsValid(_) => AppError::validation(err.to_string()),
            StoreError::EmptyLedger => AppError::new(ErrorCode::NothingToDo, err.to_string()),
            StoreError::Core(e) => AppError::from(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<dialoguer::Error> for AppError {
    fn from(err: dialoguer::Error) -> Self {
        AppError::new(ErrorCode::InputError, format!("Failed to read input: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("Failed to render JSON: {}", err))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {}
