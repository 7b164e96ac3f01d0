use std::fmt;

use thiserror::Error;

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Blank,
    EqualsForbidden,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Blank => f.write_str("blank"),
            Reason::EqualsForbidden => f.write_str("equals forbidden value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: Reason,
}

#[derive(Error, Debug)]
#[error("validation failed: {}", join(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| format!("{}: {}", violation.field, violation.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Collects field violations for a single request.
///
/// Build one per request and consume it with [`Validator::valid`].
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject `value` if it is empty or whitespace only.
    pub fn is_blank(&mut self, name: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(name, Reason::Blank);
        }
    }

    /// Reject `value` if it equals `forbidden`.
    pub fn is_equal<T: PartialEq>(&mut self, name: &str, value: T, forbidden: T) {
        if value == forbidden {
            self.add(name, Reason::EqualsForbidden);
        }
    }

    pub fn valid(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                violations: self.violations,
            })
        }
    }

    fn add(&mut self, name: &str, reason: Reason) {
        self.violations.push(Violation {
            field: name.to_owned(),
            reason,
        });
    }
}
