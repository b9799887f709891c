use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use study_core::model::{NoteId, NoteSummary, Question, QuizId, QuizStats, QuizSummary};

use crate::backend::{ClientError, Submission, SubmissionReceipt};

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    correct: String,
}

/// Body of `GET quizzes/{id}/`. A missing `questions` field means an empty quiz.
#[derive(Debug, Deserialize)]
pub(crate) struct QuizQuestionsDto {
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttemptRequest<'a> {
    quiz: u64,
    answers: &'a [String],
}

impl<'a> AttemptRequest<'a> {
    pub(crate) fn from_submission(submission: &'a Submission) -> Self {
        Self {
            quiz: submission.quiz_id.value(),
            answers: &submission.answers,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AttemptResponse {
    score: f64,
    #[serde(default)]
    correct: Option<u32>,
}

/// One entry of `GET notes/`. Note content is not needed here.
#[derive(Debug, Deserialize)]
pub(crate) struct NoteDto {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    notebook_title: Option<String>,
}

impl NoteDto {
    pub(crate) fn into_summary(self) -> NoteSummary {
        NoteSummary {
            note_id: NoteId::new(self.id),
            title: self.title,
            notebook_title: self.notebook_title.filter(|title| !title.trim().is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NoteQuizzesDto {
    #[serde(default)]
    quizzes: Vec<NoteQuizDto>,
}

#[derive(Debug, Deserialize)]
struct NoteQuizDto {
    quiz_id: u64,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    questions: Vec<IgnoredAny>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageDto {
    #[serde(default)]
    pub(crate) message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuizStatsDto {
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    average_score: Option<f64>,
    #[serde(default)]
    best_score: Option<f64>,
    #[serde(default)]
    last_score: Option<f64>,
}

impl QuizStatsDto {
    pub(crate) fn into_stats(self) -> QuizStats {
        QuizStats {
            attempts: self.attempts,
            average_score: self.average_score.unwrap_or(0.0),
            best_score: self.best_score.unwrap_or(0.0),
            last_score: self.last_score.unwrap_or(0.0),
        }
    }
}

pub(crate) fn map_questions(body: QuizQuestionsDto) -> Result<Vec<Question>, ClientError> {
    body.questions
        .into_iter()
        .enumerate()
        .map(|(index, dto)| {
            Question::from_raw(dto.question, dto.options, &dto.correct)
                .map_err(|source| ClientError::InvalidQuestion { index, source })
        })
        .collect()
}

/// Round and clamp the backend score into 0–100.
///
/// # Errors
///
/// Returns `ClientError::Decode` for NaN or infinite scores.
pub(crate) fn score_from_wire(score: f64) -> Result<u8, ClientError> {
    if !score.is_finite() {
        return Err(ClientError::Decode(format!("score is not a number: {score}")));
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = score.clamp(0.0, 100.0).round() as u8;
    Ok(rounded)
}

pub(crate) fn map_receipt(body: &AttemptResponse) -> Result<SubmissionReceipt, ClientError> {
    Ok(SubmissionReceipt {
        score: score_from_wire(body.score)?,
        correct: body.correct,
    })
}

/// Decode the reply to an accepted attempt.
///
/// # Errors
///
/// Any failure is `ClientError::UnreadableReceipt`: the attempt already
/// exists on the backend.
pub(crate) fn decode_receipt(body: &[u8]) -> Result<SubmissionReceipt, ClientError> {
    let parsed: AttemptResponse = serde_json::from_slice(body)
        .map_err(|e| ClientError::UnreadableReceipt(e.to_string()))?;
    map_receipt(&parsed).map_err(|e| ClientError::UnreadableReceipt(e.to_string()))
}

fn parse_created_at(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}

pub(crate) fn map_note_quizzes(note_id: NoteId, body: NoteQuizzesDto) -> Vec<QuizSummary> {
    body.quizzes
        .into_iter()
        .map(|quiz| QuizSummary {
            quiz_id: QuizId::new(quiz.quiz_id),
            note_id,
            created_at: parse_created_at(quiz.created_at.as_deref()),
            question_count: quiz.questions.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::OptionLetter;

    #[test]
    fn maps_questions_with_prefixed_correct() {
        let body: QuizQuestionsDto = serde_json::from_str(
            r#"{"questions": [
                {"question": "Capital of Germany?", "options": ["Paris", "London", "Berlin", "Rome"], "correct": "C. Berlin"},
                {"question": "Capital of Italy?", "options": ["Paris", "London", "Berlin", "Rome"], "correct": "d"}
            ]}"#,
        )
        .unwrap();
        let questions = map_questions(body).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct(), OptionLetter::C);
        assert_eq!(questions[1].correct(), OptionLetter::D);
    }

    #[test]
    fn missing_questions_field_is_empty() {
        let body: QuizQuestionsDto = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert!(map_questions(body).unwrap().is_empty());
    }

    #[test]
    fn malformed_question_reports_index() {
        let body: QuizQuestionsDto = serde_json::from_str(
            r#"{"questions": [
                {"question": "ok?", "options": ["yes", "no"], "correct": "A"},
                {"question": "broken?", "options": ["yes", "no"], "correct": ""}
            ]}"#,
        )
        .unwrap();
        let err = map_questions(body).unwrap_err();
        assert!(matches!(err, ClientError::InvalidQuestion { index: 1, .. }));
    }

    #[test]
    fn attempt_request_is_positional() {
        let submission = Submission {
            quiz_id: QuizId::new(12),
            answers: vec!["A".into(), String::new(), "C".into()],
        };
        let json = serde_json::to_value(AttemptRequest::from_submission(&submission)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"quiz": 12, "answers": ["A", "", "C"]})
        );
    }

    #[test]
    fn score_is_rounded_and_clamped() {
        assert_eq!(score_from_wire(33.333).unwrap(), 33);
        assert_eq!(score_from_wire(66.5).unwrap(), 67);
        assert_eq!(score_from_wire(140.0).unwrap(), 100);
        assert_eq!(score_from_wire(-3.0).unwrap(), 0);
        assert!(score_from_wire(f64::NAN).is_err());
    }

    #[test]
    fn receipt_without_score_is_unreadable() {
        let err = decode_receipt(br#"{"result": {"correct": 1}}"#).unwrap_err();
        assert!(matches!(err, ClientError::UnreadableReceipt(_)));

        let err = decode_receipt(b"not json").unwrap_err();
        assert!(matches!(err, ClientError::UnreadableReceipt(_)));

        let receipt = decode_receipt(br#"{"score": 50.0, "correct": 1}"#).unwrap();
        assert_eq!(receipt.score, 50);
        assert_eq!(receipt.correct, Some(1));
    }

    #[test]
    fn notes_keep_title_and_notebook() {
        let body: Vec<NoteDto> = serde_json::from_str(
            r#"[
                {"id": 4, "notebook": 1, "notebook_title": "Geography", "title": "Capitals", "content": "..."},
                {"id": 6, "title": "Loose note", "notebook_title": " "}
            ]"#,
        )
        .unwrap();
        let notes: Vec<NoteSummary> = body.into_iter().map(NoteDto::into_summary).collect();
        assert_eq!(notes[0].note_id, NoteId::new(4));
        assert_eq!(notes[0].title, "Capitals");
        assert_eq!(notes[0].notebook_title.as_deref(), Some("Geography"));
        assert_eq!(notes[1].notebook_title, None);
    }

    #[test]
    fn note_quizzes_tolerate_bad_timestamps() {
        let body: NoteQuizzesDto = serde_json::from_str(
            r#"{"quizzes": [
                {"quiz_id": 3, "created_at": "2024-05-01T10:00:00Z", "questions": [{}, {}]},
                {"quiz_id": 2, "created_at": "yesterday"}
            ]}"#,
        )
        .unwrap();
        let listed = map_note_quizzes(NoteId::new(8), body);
        assert_eq!(listed.len(), 2);
        assert!(listed[0].created_at.is_some());
        assert_eq!(listed[0].question_count, 2);
        assert_eq!(listed[1].created_at, None);
        assert_eq!(listed[1].note_id, NoteId::new(8));
    }
}
