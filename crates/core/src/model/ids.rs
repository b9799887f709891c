use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Backend identifier of a generated quiz.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuizId(u64);

impl QuizId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

/// Backend identifier of the note a quiz was generated from.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(u64);

impl NoteId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Debug for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuizId({})", self.0)
    }
}

impl fmt::Debug for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteId({})", self.0)
    }
}

impl fmt::Display for QuizId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when an id cannot be parsed from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuizId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(QuizId::new)
            .map_err(|_| ParseIdError { kind: "QuizId" })
    }
}

impl FromStr for NoteId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(NoteId::new)
            .map_err(|_| ParseIdError { kind: "NoteId" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_id_parses_and_displays() {
        let id: QuizId = " 17 ".parse().unwrap();
        assert_eq!(id, QuizId::new(17));
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn note_id_rejects_garbage() {
        let err = "note-3".parse::<NoteId>().unwrap_err();
        assert_eq!(err.to_string(), "failed to parse NoteId from string");
    }

    #[test]
    fn quiz_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&QuizId::new(5)).unwrap();
        assert_eq!(json, "5");
    }
}
