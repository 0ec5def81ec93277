//! Error taxonomy shared by every `grow-*` crate.
//!
//! Two layers:
//!
//! - [`ErrorCode`] / [`CommandError`] — the wire-level contract carried in
//!   every failed `CommandResult`.  These are data, not `std::error::Error`s.
//! - [`DomainError`] / [`CoreError`] — `thiserror` types used internally by
//!   services, converted into `CommandError`s at the dispatch boundary.
//!
//! Sub-crates may define their own error enums and convert them into
//! `DomainError` via `From` impls, or keep them separate and wrap one as a
//! variant.  Both patterns are acceptable; prefer whichever keeps error sites
//! clean.

use std::fmt;

use thiserror::Error;

// ── ErrorCode ─────────────────────────────────────────────────────────────────

/// The exhaustive set of failure codes a command can resolve with.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    /// A referenced entity or command does not exist.
    #[cfg_attr(feature = "serde", serde(rename = "ERR_NOT_FOUND"))]
    NotFound,
    /// The caller is not allowed to perform the operation.
    #[cfg_attr(feature = "serde", serde(rename = "ERR_FORBIDDEN"))]
    Forbidden,
    /// The mutation would violate a capacity or uniqueness invariant.
    #[cfg_attr(feature = "serde", serde(rename = "ERR_CONFLICT"))]
    Conflict,
    /// A precondition is violated (incompatible types, unwired handler, …).
    #[cfg_attr(feature = "serde", serde(rename = "ERR_INVALID_STATE"))]
    InvalidState,
    /// The payload failed shape or range validation.
    #[cfg_attr(feature = "serde", serde(rename = "ERR_VALIDATION"))]
    Validation,
    /// The caller is issuing intents faster than the transport allows.
    #[cfg_attr(feature = "serde", serde(rename = "ERR_RATE_LIMIT"))]
    RateLimit,
    /// Cash on hand does not cover the requested purchase.
    #[cfg_attr(feature = "serde", serde(rename = "ERR_INSUFFICIENT_FUNDS"))]
    InsufficientFunds,
    /// An unexpected internal failure; never crashes the process.
    #[cfg_attr(feature = "serde", serde(rename = "ERR_INTERNAL"))]
    Internal,
}

impl ErrorCode {
    /// The canonical `ERR_*` string for this code.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "ERR_NOT_FOUND",
            ErrorCode::Forbidden => "ERR_FORBIDDEN",
            ErrorCode::Conflict => "ERR_CONFLICT",
            ErrorCode::InvalidState => "ERR_INVALID_STATE",
            ErrorCode::Validation => "ERR_VALIDATION",
            ErrorCode::RateLimit => "ERR_RATE_LIMIT",
            ErrorCode::InsufficientFunds => "ERR_INSUFFICIENT_FUNDS",
            ErrorCode::Internal => "ERR_INTERNAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── CommandError ──────────────────────────────────────────────────────────────

/// One concrete violation attached to a failed command result.
///
/// `path` locates the offending field, starting with the command name:
/// `["world.createZone", "zone", "area"]`.  Validation produces one
/// `CommandError` per violated constraint — never an aggregated string.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub path: Vec<String>,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>, path: Vec<String>) -> Self {
        Self { code, message: message.into(), path }
    }

    /// A validation error at `path` (the common case).
    pub fn validation(message: impl Into<String>, path: Vec<String>) -> Self {
        Self::new(ErrorCode::Validation, message, path)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "{} at {}: {}", self.code, self.path.join("."), self.message)
        }
    }
}

// ── DomainError ───────────────────────────────────────────────────────────────

/// A coded failure raised inside a command handler.
///
/// Services return `Result<_, DomainError>` and use `?`; the dispatcher maps
/// the error 1:1 into a failed `CommandResult` carrying the same code and
/// path.  Exactly one error per domain failure — multi-error results only
/// arise from payload validation.
#[derive(Clone, PartialEq, Debug, Error)]
#[error("{code}: {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub path: Vec<String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>, path: Vec<String>) -> Self {
        Self { code, message: message.into(), path }
    }

    pub fn not_found(message: impl Into<String>, path: Vec<String>) -> Self {
        Self::new(ErrorCode::NotFound, message, path)
    }

    pub fn conflict(message: impl Into<String>, path: Vec<String>) -> Self {
        Self::new(ErrorCode::Conflict, message, path)
    }

    pub fn invalid_state(message: impl Into<String>, path: Vec<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message, path)
    }

    pub fn validation(message: impl Into<String>, path: Vec<String>) -> Self {
        Self::new(ErrorCode::Validation, message, path)
    }

    pub fn insufficient_funds(message: impl Into<String>, path: Vec<String>) -> Self {
        Self::new(ErrorCode::InsufficientFunds, message, path)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message, Vec::new())
    }
}

impl From<DomainError> for CommandError {
    fn from(error: DomainError) -> Self {
        CommandError::new(error.code, error.message, error.path)
    }
}

// ── CoreError ─────────────────────────────────────────────────────────────────

/// The top-level error type for `grow-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `grow-core` helpers.
pub type CoreResult<T> = Result<T, CoreError>;
