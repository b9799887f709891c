use study_core::model::{Question, QuizId};

use super::HttpBackend;
use super::mapping::{QuizQuestionsDto, map_questions};
use crate::backend::{ClientError, QuizSource};

#[async_trait::async_trait]
impl QuizSource for HttpBackend {
    async fn fetch_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, ClientError> {
        let body: QuizQuestionsDto = self
            .send_json(self.get(&format!("quizzes/{quiz_id}/")))
            .await?;
        map_questions(body)
    }
}
