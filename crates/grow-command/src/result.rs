//! The uniform result contract every command resolves with.
//!
//! Commands never "throw" outward: callers branch on [`CommandResult::ok`],
//! not on errors.  Warnings accompany an `ok` result to flag approximations
//! and clamps; errors accompany a failed result and block the mutation.

use grow_core::{CommandError, DomainError, ErrorCode};
use serde::Serialize;

// ── CommandResult ─────────────────────────────────────────────────────────────

/// Wire-level outcome of one command.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<CommandError>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self { ok: true, data: Some(data), warnings: Vec::new(), errors: Vec::new() }
    }

    pub fn ok_empty() -> Self {
        Self { ok: true, data: None, warnings: Vec::new(), errors: Vec::new() }
    }

    pub fn ok_with_warnings(data: T, warnings: Vec<String>) -> Self {
        Self { ok: true, data: Some(data), warnings: normalize_warnings(warnings), errors: Vec::new() }
    }

    pub fn fail(code: ErrorCode, message: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            ok: false,
            data: None,
            warnings: Vec::new(),
            errors: vec![CommandError::new(code, message, path)],
        }
    }

    pub fn fail_with(errors: Vec<CommandError>) -> Self {
        Self { ok: false, data: None, warnings: Vec::new(), errors }
    }

    /// First error, if any — convenient in tests and gateways.
    pub fn first_error(&self) -> Option<&CommandError> {
        self.errors.first()
    }

    /// Map the data payload, keeping ok/warnings/errors intact.
    pub fn map_data<U>(self, f: impl FnOnce(T) -> U) -> CommandResult<U> {
        CommandResult {
            ok: self.ok,
            data: self.data.map(f),
            warnings: self.warnings,
            errors: self.errors,
        }
    }
}

impl CommandResult<serde_json::Value> {
    /// Decode the opaque data payload into a typed result.
    ///
    /// A decode mismatch means a handler returned a payload that does not
    /// match its declared result type — reported as `ERR_INTERNAL` rather
    /// than a panic.
    pub fn decode<T: serde::de::DeserializeOwned>(self) -> CommandResult<T> {
        let CommandResult { ok, data, warnings, errors } = self;
        match data {
            None => CommandResult { ok, data: None, warnings, errors },
            Some(value) => match serde_json::from_value(value) {
                Ok(decoded) => CommandResult { ok, data: Some(decoded), warnings, errors },
                Err(err) => CommandResult::fail(
                    ErrorCode::Internal,
                    format!("Command result payload could not be decoded: {err}"),
                    Vec::new(),
                ),
            },
        }
    }
}

// ── CommandReply / CommandFailure ─────────────────────────────────────────────

/// The success arm a handler returns before normalization.
#[derive(Clone, Debug, Default)]
pub struct CommandReply<T> {
    pub data: Option<T>,
    pub warnings: Vec<String>,
}

impl<T> CommandReply<T> {
    pub fn new(data: T) -> Self {
        Self { data: Some(data), warnings: Vec::new() }
    }

    pub fn empty() -> Self {
        Self { data: None, warnings: Vec::new() }
    }

    pub fn with_warnings(data: T, warnings: Vec<String>) -> Self {
        Self { data: Some(data), warnings }
    }

    pub fn warnings_only(warnings: Vec<String>) -> Self {
        Self { data: None, warnings }
    }
}

/// The failure arm a handler returns.
///
/// `Validation` carries one error per violated constraint and only ever
/// arises before the handler body runs; `Domain` is a single coded failure
/// from inside the handler.
#[derive(Clone, Debug)]
pub enum CommandFailure {
    Validation(Vec<CommandError>),
    Domain(DomainError),
}

impl From<DomainError> for CommandFailure {
    fn from(error: DomainError) -> Self {
        CommandFailure::Domain(error)
    }
}

impl From<Vec<CommandError>> for CommandFailure {
    fn from(errors: Vec<CommandError>) -> Self {
        CommandFailure::Validation(errors)
    }
}

/// What every registered handler returns; the dispatcher normalizes both
/// arms into a [`CommandResult`].
pub type HandlerResult<T> = Result<CommandReply<T>, CommandFailure>;

// ── Normalization helpers ─────────────────────────────────────────────────────

/// Trim, drop empties, and deduplicate while preserving first-seen order.
pub fn normalize_warnings(warnings: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for warning in warnings {
        let trimmed = warning.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !seen.iter().any(|s: &String| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

/// Guarantee a failure carries at least one error.
pub fn normalize_errors(command: &str, errors: Vec<CommandError>) -> Vec<CommandError> {
    let errors: Vec<CommandError> = errors.into_iter().filter(|e| !e.message.is_empty()).collect();
    if errors.is_empty() {
        vec![CommandError::new(
            ErrorCode::InvalidState,
            "Command failed without error details.",
            vec![command.to_string()],
        )]
    } else {
        errors
    }
}
