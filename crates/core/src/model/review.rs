use crate::model::{OptionLetter, Question};

/// Per-question feedback shown once a quiz has been submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub index: usize,
    pub question: String,
    /// Option labels with their letter prefix, e.g. `"A. Paris"`.
    pub options: Vec<String>,
    pub correct: OptionLetter,
    pub selected: Option<OptionLetter>,
    pub is_correct: bool,
}

impl QuestionReview {
    #[must_use]
    pub fn build(index: usize, question: &Question, selected: Option<OptionLetter>) -> Self {
        Self {
            index,
            question: question.text().to_string(),
            options: question.display_options(),
            correct: question.correct(),
            selected,
            is_correct: question.is_correct(selected),
        }
    }

    /// True when `letter` was picked and is not the correct one.
    #[must_use]
    pub fn is_wrong_selection(&self, letter: OptionLetter) -> bool {
        self.selected == Some(letter) && letter != self.correct
    }
}
