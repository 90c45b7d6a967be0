use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Faq, FaqId, QuestionId, UnansweredQuestion, Voice, VoiceId},
    protocol::{ConvertToFaqRequest, FaqFields, PreviewQuery},
};
use tracing::{debug, warn};

use crate::{
    config::Settings,
    error::{ClientError, ClientResult, Operation},
};

/// The backend as seen by the dashboard. Any non-2xx response is a failure.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_faqs(&self) -> ClientResult<Vec<Faq>>;
    async fn create_faq(&self, fields: &FaqFields) -> ClientResult<Faq>;
    async fn update_faq(&self, id: FaqId, fields: &FaqFields) -> ClientResult<()>;
    async fn delete_faq(&self, id: FaqId) -> ClientResult<()>;

    async fn list_questions(&self) -> ClientResult<Vec<UnansweredQuestion>>;
    async fn convert_question(
        &self,
        id: QuestionId,
        request: &ConvertToFaqRequest,
    ) -> ClientResult<()>;
    async fn delete_question(&self, id: QuestionId) -> ClientResult<()>;

    async fn list_voices(&self) -> ClientResult<Vec<Voice>>;
    async fn set_default_voice(&self, id: VoiceId) -> ClientResult<()>;
    async fn fetch_preview(&self, model: &str) -> ClientResult<Vec<u8>>;
}

pub struct HttpAdminApi {
    http: Client,
    api_base_url: String,
    preview_base_url: String,
}

impl HttpAdminApi {
    pub fn new(settings: &Settings) -> Self {
        Self::with_client(Client::new(), settings)
    }

    pub fn with_client(http: Client, settings: &Settings) -> Self {
        Self {
            http,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            preview_base_url: settings.preview_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.api_base_url)
    }

    async fn send(&self, op: Operation, request: RequestBuilder) -> ClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport { op, source })?;
        let status = response.status();
        if !status.is_success() {
            warn!(operation = op.name(), %status, "backend rejected request");
            return Err(ClientError::Status { op, status });
        }
        debug!(operation = op.name(), %status, "backend request completed");
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(op: Operation, response: Response) -> ClientResult<T> {
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { op, source })?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { op, source })
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn list_faqs(&self) -> ClientResult<Vec<Faq>> {
        let op = Operation::LoadFaqs;
        let res = self.send(op, self.http.get(self.api_url("faq"))).await?;
        Self::read_json(op, res).await
    }

    async fn create_faq(&self, fields: &FaqFields) -> ClientResult<Faq> {
        let op = Operation::CreateFaq;
        let res = self
            .send(op, self.http.post(self.api_url("faq")).json(fields))
            .await?;
        Self::read_json(op, res).await
    }

    async fn update_faq(&self, id: FaqId, fields: &FaqFields) -> ClientResult<()> {
        self.send(
            Operation::UpdateFaq,
            self.http.put(self.api_url(&format!("faq/{id}"))).json(fields),
        )
        .await?;
        Ok(())
    }

    async fn delete_faq(&self, id: FaqId) -> ClientResult<()> {
        self.send(
            Operation::DeleteFaq,
            self.http.delete(self.api_url(&format!("faq/{id}"))),
        )
        .await?;
        Ok(())
    }

    async fn list_questions(&self) -> ClientResult<Vec<UnansweredQuestion>> {
        let op = Operation::LoadQuestions;
        let res = self
            .send(op, self.http.get(self.api_url("unansweredquestion")))
            .await?;
        Self::read_json(op, res).await
    }

    async fn convert_question(
        &self,
        id: QuestionId,
        request: &ConvertToFaqRequest,
    ) -> ClientResult<()> {
        self.send(
            Operation::ConvertQuestion,
            self.http
                .post(self.api_url(&format!("unansweredquestion/{id}/convert-to-faq")))
                .json(request),
        )
        .await?;
        Ok(())
    }

    async fn delete_question(&self, id: QuestionId) -> ClientResult<()> {
        self.send(
            Operation::DeleteQuestion,
            self.http
                .delete(self.api_url(&format!("unansweredquestion/{id}"))),
        )
        .await?;
        Ok(())
    }

    async fn list_voices(&self) -> ClientResult<Vec<Voice>> {
        let op = Operation::LoadVoices;
        let res = self.send(op, self.http.get(self.api_url("voice"))).await?;
        Self::read_json(op, res).await
    }

    async fn set_default_voice(&self, id: VoiceId) -> ClientResult<()> {
        self.send(
            Operation::SetDefaultVoice,
            self.http
                .post(self.api_url(&format!("voice/{id}/set-default"))),
        )
        .await?;
        Ok(())
    }

    async fn fetch_preview(&self, model: &str) -> ClientResult<Vec<u8>> {
        let op = Operation::LoadPreview;
        let res = self
            .send(
                op,
                self.http
                    .get(format!("{}/preview", self.preview_base_url))
                    .query(&PreviewQuery {
                        model: model.to_string(),
                    }),
            )
            .await?;
        let body = res
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { op, source })?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
