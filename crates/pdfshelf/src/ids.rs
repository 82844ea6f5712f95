//! Identifiers for stored files and database records.

use std::fmt;

use rand::Rng;
use serde::Serialize;

/// Number of characters in a generated file id.
pub const FILE_ID_LENGTH: usize = 16;

/// Generates an opaque file id: 16 lowercase ASCII letters, each drawn
/// independently and uniformly.
///
/// No uniqueness check is made here. With 26^16 possible ids collisions are
/// improbable, and the `documents.file_id` UNIQUE constraint rejects the
/// rare duplicate at insert time.
pub fn generate_file_id() -> String {
    let mut rng = rand::thread_rng();
    (0..FILE_ID_LENGTH)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect()
}

/// Returns true if `s` has the shape of a generated file id.
pub fn is_file_id(s: &str) -> bool {
    s.len() == FILE_ID_LENGTH && s.bytes().all(|b| b.is_ascii_lowercase())
}

/// Store-assigned record identifier. Always >= 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Parses a caller-supplied identifier.
    ///
    /// Accepts only non-empty runs of ASCII digits whose value is a positive
    /// `i64`. Signs, whitespace and anything else yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: i64 = s.parse().ok()?;
        Self::new(value)
    }

    pub fn new(value: i64) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
