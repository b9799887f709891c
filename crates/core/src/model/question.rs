use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Maximum number of options a question may carry (letters `A`..`D`).
pub const MAX_OPTIONS: usize = 4;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LetterError {
    #[error("option letter is empty")]
    Empty,
    #[error("not an option letter: {0:?}")]
    Invalid(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,
    #[error("question has no options")]
    NoOptions,
    #[error("question has {len} options, at most 4 are supported")]
    TooManyOptions { len: usize },
    #[error("invalid correct answer: {0}")]
    InvalidCorrect(#[from] LetterError),
    #[error("correct answer {letter} has no matching option (only {options} options)")]
    CorrectOutOfRange { letter: OptionLetter, options: usize },
}

//
// ─── OPTION LETTER ────────────────────────────────────────────────────────────
//

/// Positional label of an option: the option at index `i` is letter `A + i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; MAX_OPTIONS] = [Self::A, Self::B, Self::C, Self::D];

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }

    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_uppercase() {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    /// Parse the leading letter of `"B"`, `"b"`, `"B. Berlin"` or `"B) Berlin"`.
    ///
    /// The letter must stand alone: `"Berlin"` is rejected rather than read as `B`.
    ///
    /// # Errors
    ///
    /// Returns `LetterError::Empty` for blank input and `LetterError::Invalid`
    /// when no standalone letter `A`..`D` leads the string.
    pub fn parse_leading(raw: &str) -> Result<Self, LetterError> {
        let trimmed = raw.trim();
        let mut chars = trimmed.chars();
        let Some(first) = chars.next() else {
            return Err(LetterError::Empty);
        };
        let standalone = chars.next().is_none_or(|next| !next.is_alphanumeric());
        match Self::from_char(first) {
            Some(letter) if standalone => Ok(letter),
            _ => Err(LetterError::Invalid(trimmed.to_string())),
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionLetter {
    type Err = LetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_leading(s)
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct: OptionLetter,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text is blank, the option count is not
    /// within `1..=MAX_OPTIONS`, or `correct` points past the last option.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct: OptionLetter,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }
        if options.len() > MAX_OPTIONS {
            return Err(QuestionError::TooManyOptions { len: options.len() });
        }
        if correct.index() >= options.len() {
            return Err(QuestionError::CorrectOutOfRange {
                letter: correct,
                options: options.len(),
            });
        }

        Ok(Self {
            text,
            options,
            correct,
        })
    }

    /// Build a question from backend fields, normalizing `correct` to its leading letter.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidCorrect` if `correct` has no leading letter,
    /// or any error from [`Question::new`].
    pub fn from_raw(
        text: impl Into<String>,
        options: Vec<String>,
        correct: &str,
    ) -> Result<Self, QuestionError> {
        let correct = OptionLetter::parse_leading(correct)?;
        Self::new(text, options, correct)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct(&self) -> OptionLetter {
        self.correct
    }

    #[must_use]
    pub fn has_option(&self, letter: OptionLetter) -> bool {
        letter.index() < self.options.len()
    }

    /// Letters available for this question, in option order.
    pub fn letters(&self) -> impl Iterator<Item = OptionLetter> + '_ {
        OptionLetter::ALL.into_iter().take(self.options.len())
    }

    #[must_use]
    pub fn is_correct(&self, selected: Option<OptionLetter>) -> bool {
        selected == Some(self.correct)
    }

    /// Compare a raw submitted answer against the correct letter.
    ///
    /// Case-insensitive after trimming; an empty answer is never correct.
    #[must_use]
    pub fn matches_answer(&self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(self.correct.as_str())
    }

    /// Label for the option at `index`, e.g. `"B. Berlin"`.
    ///
    /// Backends sometimes already prefix options with their letter; the prefix
    /// is stripped first so it is never doubled.
    #[must_use]
    pub fn display_option(&self, index: usize) -> Option<String> {
        let letter = OptionLetter::from_index(index)?;
        let raw = self.options.get(index)?.trim();
        let clean = strip_letter_prefix(raw, letter);
        Some(format!("{letter}. {clean}"))
    }

    #[must_use]
    pub fn display_options(&self) -> Vec<String> {
        (0..self.options.len())
            .filter_map(|index| self.display_option(index))
            .collect()
    }
}

fn strip_letter_prefix(raw: &str, letter: OptionLetter) -> &str {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some('.')) if first == letter.as_char() => raw[2..].trim_start(),
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capitals() -> Vec<String> {
        ["Paris", "London", "Berlin", "Rome"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn letters_follow_option_positions() {
        assert_eq!(OptionLetter::from_index(0), Some(OptionLetter::A));
        assert_eq!(OptionLetter::from_index(3), Some(OptionLetter::D));
        assert_eq!(OptionLetter::from_index(4), None);
        assert_eq!(OptionLetter::C.index(), 2);
    }

    #[test]
    fn parse_leading_accepts_prefixed_and_lowercase() {
        assert_eq!(OptionLetter::parse_leading("B"), Ok(OptionLetter::B));
        assert_eq!(OptionLetter::parse_leading(" b. Berlin"), Ok(OptionLetter::B));
        assert_eq!(OptionLetter::parse_leading("D) Rome"), Ok(OptionLetter::D));
    }

    #[test]
    fn parse_leading_rejects_words_and_blanks() {
        assert_eq!(OptionLetter::parse_leading("   "), Err(LetterError::Empty));
        assert!(matches!(
            OptionLetter::parse_leading("Berlin"),
            Err(LetterError::Invalid(_))
        ));
        assert!(matches!(
            OptionLetter::parse_leading("E"),
            Err(LetterError::Invalid(_))
        ));
    }

    #[test]
    fn from_raw_normalizes_correct_letter() {
        let question = Question::from_raw("Capital of France?", capitals(), "a. Paris").unwrap();
        assert_eq!(question.correct(), OptionLetter::A);
        assert!(question.is_correct(Some(OptionLetter::A)));
        assert!(!question.is_correct(Some(OptionLetter::B)));
        assert!(!question.is_correct(None));
    }

    #[test]
    fn rejects_correct_letter_without_option() {
        let err = Question::from_raw("Pick", vec!["yes".into(), "no".into()], "C").unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectOutOfRange {
                letter: OptionLetter::C,
                options: 2
            }
        );
    }

    #[test]
    fn rejects_blank_text_and_option_counts() {
        assert_eq!(
            Question::new(" ", capitals(), OptionLetter::A).unwrap_err(),
            QuestionError::EmptyText
        );
        assert_eq!(
            Question::new("Q", Vec::new(), OptionLetter::A).unwrap_err(),
            QuestionError::NoOptions
        );
        let mut five = capitals();
        five.push("Madrid".into());
        assert_eq!(
            Question::new("Q", five, OptionLetter::A).unwrap_err(),
            QuestionError::TooManyOptions { len: 5 }
        );
    }

    #[test]
    fn matches_answer_trims_and_ignores_case() {
        let question = Question::new("Q", capitals(), OptionLetter::B).unwrap();
        assert!(question.matches_answer(" b "));
        assert!(!question.matches_answer(""));
        assert!(!question.matches_answer("A"));
    }

    #[test]
    fn display_option_does_not_double_prefix() {
        let options = vec!["A. Paris".to_string(), "London".to_string()];
        let question = Question::new("Q", options, OptionLetter::A).unwrap();
        assert_eq!(question.display_options(), vec!["A. Paris", "B. London"]);
        assert_eq!(question.display_option(2), None);
    }
}
