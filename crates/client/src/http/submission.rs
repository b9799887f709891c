use super::HttpBackend;
use super::mapping::{AttemptRequest, decode_receipt};
use crate::backend::{ClientError, Submission, SubmissionReceipt, SubmissionSink};

#[async_trait::async_trait]
impl SubmissionSink for HttpBackend {
    async fn submit_answers(
        &self,
        submission: &Submission,
    ) -> Result<SubmissionReceipt, ClientError> {
        let payload = AttemptRequest::from_submission(submission);
        let response = self
            .send_checked(self.post("quiz_attempts/").json(&payload))
            .await?;

        // Past this point the attempt is stored server-side.
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::UnreadableReceipt(e.to_string()))?;
        decode_receipt(&body)
    }
}
