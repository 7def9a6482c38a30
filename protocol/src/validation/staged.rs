//! Eager parsing for builder setters.
//!
//! A setter parses its raw arguments straight away but never fails: it
//! stores either the parsed value or every error it hit, and the
//! finalization pass reports them later in context.

use super::error::ValidationError;

/// A value parsed from raw builder input, or the reasons it could not be.
#[derive(Debug, Clone)]
pub(crate) struct Staged<T> {
    pub name: &'static str,
    pub result: Result<T, Vec<ValidationError>>,
}

/// Collects field errors while a staged value is assembled.
#[derive(Debug, Default)]
pub(crate) struct StagedFields {
    errors: Vec<ValidationError>,
}

impl StagedFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    /// `make` returns `None` exactly when some `take` failed.
    pub fn finish<T>(self, name: &'static str, make: impl FnOnce() -> Option<T>) -> Staged<T> {
        let result = match make() {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        };
        Staged { name, result }
    }
}
