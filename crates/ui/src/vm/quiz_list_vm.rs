use study_core::model::{QuizStats, QuizSummary};

use crate::vm::time_fmt::format_datetime;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizCardVm {
    pub quiz_id: u64,
    pub title: String,
    pub created_label: Option<String>,
    pub questions_label: String,
}

impl From<&QuizSummary> for QuizCardVm {
    fn from(quiz: &QuizSummary) -> Self {
        let questions_label = match quiz.question_count {
            1 => "1 question".to_string(),
            count => format!("{count} questions"),
        };
        Self {
            quiz_id: quiz.quiz_id.value(),
            title: format!("Quiz #{}", quiz.quiz_id),
            created_label: quiz
                .created_at
                .map(|at| format!("Created {}", format_datetime(at))),
            questions_label,
        }
    }
}

#[must_use]
pub fn map_quiz_cards(quizzes: &[QuizSummary]) -> Vec<QuizCardVm> {
    quizzes.iter().map(QuizCardVm::from).collect()
}

#[must_use]
pub fn stats_label(stats: &QuizStats) -> String {
    if !stats.has_attempts() {
        return "No attempts yet".to_string();
    }
    format!(
        "Attempts: {} | Best: {:.0}% | Last: {:.0}%",
        stats.attempts, stats.best_score, stats.last_score
    )
}
