use study_core::model::{NoteId, NoteSummary, QuizId, QuizStats, QuizSummary};

use super::HttpBackend;
use super::mapping::{MessageDto, NoteDto, NoteQuizzesDto, QuizStatsDto, map_note_quizzes};
use crate::backend::{ClientError, QuizCatalog};

#[async_trait::async_trait]
impl QuizCatalog for HttpBackend {
    async fn list_notes(&self) -> Result<Vec<NoteSummary>, ClientError> {
        let body: Vec<NoteDto> = self.send_json(self.get("notes/")).await?;
        Ok(body.into_iter().map(NoteDto::into_summary).collect())
    }

    async fn list_quizzes(&self, note_id: NoteId) -> Result<Vec<QuizSummary>, ClientError> {
        let body: NoteQuizzesDto = self
            .send_json(self.get(&format!("get_quizzes/{note_id}/")))
            .await?;
        Ok(map_note_quizzes(note_id, body))
    }

    async fn generate_quiz(&self, note_id: NoteId) -> Result<String, ClientError> {
        let body: MessageDto = self
            .send_json(self.post(&format!("generate_quiz/{note_id}/")))
            .await?;
        Ok(body.message)
    }

    async fn quiz_stats(&self, quiz_id: QuizId) -> Result<QuizStats, ClientError> {
        let body: QuizStatsDto = self
            .send_json(self.get(&format!("quiz_stats/{quiz_id}/")))
            .await?;
        Ok(body.into_stats())
    }
}
