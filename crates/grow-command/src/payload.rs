//! Explicit payload validation with per-field error paths.
//!
//! Each command declares its schema as a small parse function built on
//! `PayloadReader`: required/optional typed getters with range constraints,
//! nested object readers, and strict unknown-field rejection.  Every violated
//! constraint records its own `CommandError` with a full path
//! (`["world.createZone", "zone", "area"]`) — never one aggregated string.
//!
//! # Error contract
//!
//! `require_*` getters return a neutral placeholder when the field is missing
//! or invalid **and** record an error; [`PayloadReader::finish`] then fails,
//! so placeholders are never observable by handlers.  `optional_*` getters
//! return `None` when absent and record an error when present but invalid.

use grow_core::ids::is_identifier;
use grow_core::CommandError;
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct PayloadReader<'a> {
    object: &'a Map<String, Value>,
    path: Vec<String>,
    errors: Vec<CommandError>,
    seen: Vec<String>,
}

impl<'a> PayloadReader<'a> {
    /// Root reader for a command payload; rejects non-object payloads with a
    /// single validation error.
    pub fn root(command: &str, payload: &'a Value) -> Result<Self, Vec<CommandError>> {
        match payload.as_object() {
            Some(object) => Ok(Self {
                object,
                path: vec![command.to_string()],
                errors: Vec::new(),
                seen: Vec::new(),
            }),
            None => Err(vec![CommandError::validation(
                "Payload must be an object.",
                vec![command.to_string()],
            )]),
        }
    }

    fn mark(&mut self, key: &str) {
        if !self.seen.iter().any(|s| s == key) {
            self.seen.push(key.to_string());
        }
    }

    fn path_of(&self, key: &str) -> Vec<String> {
        let mut path = self.path.clone();
        path.push(key.to_string());
        path
    }

    fn record(&mut self, key: &str, message: &str) {
        let path = self.path_of(key);
        self.errors.push(CommandError::validation(message, path));
    }

    /// Record a custom validation error at `key`.
    pub fn error(&mut self, key: &str, message: impl AsRef<str>) {
        self.record(key, message.as_ref());
    }

    // ── Strings and identifiers ───────────────────────────────────────────

    /// Required non-empty trimmed string.
    pub fn require_string(&mut self, key: &str) -> String {
        self.mark(key);
        match self.object.get(key).and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            Some(_) => {
                self.record(key, "Must be a non-empty string.");
                String::new()
            }
            None => {
                self.record(key, "Required field is missing or not a string.");
                String::new()
            }
        }
    }

    /// Optional non-empty trimmed string.
    pub fn optional_string(&mut self, key: &str) -> Option<String> {
        self.mark(key);
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(_) => {
                self.record(key, "Must be a non-empty string.");
                None
            }
        }
    }

    /// Required identifier (`[A-Za-z0-9_-]+`).
    pub fn require_identifier(&mut self, key: &str) -> String {
        self.mark(key);
        match self.object.get(key).and_then(Value::as_str) {
            Some(s) if is_identifier(s) => s.to_string(),
            Some(_) => {
                self.record(key, "Must be a well-formed identifier.");
                String::new()
            }
            None => {
                self.record(key, "Required identifier is missing.");
                String::new()
            }
        }
    }

    /// Optional identifier.
    pub fn optional_identifier(&mut self, key: &str) -> Option<String> {
        self.mark(key);
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if is_identifier(s) => Some(s.clone()),
            Some(_) => {
                self.record(key, "Must be a well-formed identifier.");
                None
            }
        }
    }

    // ── Numbers ───────────────────────────────────────────────────────────

    /// Required finite number > 0.
    pub fn require_positive_number(&mut self, key: &str) -> f64 {
        self.mark(key);
        match self.object.get(key).and_then(Value::as_f64) {
            Some(n) if n.is_finite() && n > 0.0 => n,
            Some(_) => {
                self.record(key, "Must be a positive number.");
                0.0
            }
            None => {
                self.record(key, "Required field is missing or not a number.");
                0.0
            }
        }
    }

    /// Optional finite number > 0.
    pub fn optional_positive_number(&mut self, key: &str) -> Option<f64> {
        self.mark(key);
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_f64() {
                Some(n) if n.is_finite() && n > 0.0 => Some(n),
                _ => {
                    self.record(key, "Must be a positive number.");
                    None
                }
            },
        }
    }

    /// Required positive integer (whole, ≥ 1).
    pub fn require_positive_integer(&mut self, key: &str) -> u64 {
        self.mark(key);
        match self.object.get(key).and_then(Value::as_u64) {
            Some(n) if n >= 1 => n,
            _ => {
                self.record(key, "Must be a positive integer.");
                0
            }
        }
    }

    /// Optional positive integer.
    pub fn optional_positive_integer(&mut self, key: &str) -> Option<u64> {
        self.mark(key);
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => match value.as_u64() {
                Some(n) if n >= 1 => Some(n),
                _ => {
                    self.record(key, "Must be a positive integer.");
                    None
                }
            },
        }
    }

    /// Optional array of identifiers.
    pub fn optional_identifier_list(&mut self, key: &str) -> Option<Vec<String>> {
        self.mark(key);
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Array(items)) => {
                let mut ids = Vec::with_capacity(items.len());
                for item in items {
                    match item.as_str().filter(|s| is_identifier(s)) {
                        Some(id) => ids.push(id.to_string()),
                        None => {
                            self.record(key, "Every element must be a well-formed identifier.");
                            return None;
                        }
                    }
                }
                Some(ids)
            }
            Some(_) => {
                self.record(key, "Must be an array of identifiers.");
                None
            }
        }
    }

    // ── Nested objects and raw values ─────────────────────────────────────

    /// Required nested object; the child reader extends the error path.
    /// Absorb the child with [`absorb`][Self::absorb] after reading it.
    pub fn nested(&mut self, key: &str) -> Option<PayloadReader<'a>> {
        self.mark(key);
        match self.object.get(key).and_then(Value::as_object) {
            Some(object) => Some(PayloadReader {
                object,
                path: self.path_of(key),
                errors: Vec::new(),
                seen: Vec::new(),
            }),
            None => {
                self.record(key, "Required field is missing or not an object.");
                None
            }
        }
    }

    /// Optional nested object.
    pub fn optional_nested(&mut self, key: &str) -> Option<PayloadReader<'a>> {
        self.mark(key);
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Object(object)) => Some(PayloadReader {
                object,
                path: self.path_of(key),
                errors: Vec::new(),
                seen: Vec::new(),
            }),
            Some(_) => {
                self.record(key, "Must be an object.");
                None
            }
        }
    }

    /// Optional free-form object, taken verbatim (e.g. device settings).
    pub fn optional_object_value(&mut self, key: &str) -> Option<Map<String, Value>> {
        self.mark(key);
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::Object(object)) => Some(object.clone()),
            Some(_) => {
                self.record(key, "Must be an object.");
                None
            }
        }
    }

    /// Merge a finished child reader's errors (call after its fields are
    /// read; runs the child's unknown-field check).
    pub fn absorb(&mut self, mut child: PayloadReader<'a>) {
        child.deny_unknown();
        self.errors.append(&mut child.errors);
    }

    // ── Completion ────────────────────────────────────────────────────────

    fn deny_unknown(&mut self) {
        let unknown: Vec<String> = self
            .object
            .keys()
            .filter(|key| !self.seen.iter().any(|s| s == *key))
            .cloned()
            .collect();
        for key in unknown {
            self.record(&key, "Unknown field.");
        }
    }

    /// Strict completion: rejects unknown fields and returns every recorded
    /// violation.  Must be called before the parsed intent is used.
    pub fn finish(mut self) -> Result<(), Vec<CommandError>> {
        self.deny_unknown();
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }

    /// `true` if at least one field was present in the payload (used for
    /// "patch must not be empty" checks).
    pub fn has_any_field(&self) -> bool {
        !self.object.is_empty()
    }
}
