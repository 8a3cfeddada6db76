//! HTTP Collaborators
//!
//! reqwest-backed implementation of the remote store contracts with bearer
//! auth. HTTP 401 maps to the one fatal error class; everything else stays
//! retryable.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StudioConfig;
use crate::error::{ApiError, ApiResult};

use super::wire::{
    AnswerUpload, AttemptEnvelope, AttemptVerdict, ChapterWire, LearnerLessonWire, LessonWire,
    ProgressWire,
};
use super::{ChapterApi, ChapterPatch, GradingApi, LearnerApi, LessonApi, LessonPatch, NewChapter, NewLesson};

pub struct HttpApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = self
            .authed(builder)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        self.execute(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn fire(&self, builder: RequestBuilder) -> ApiResult<()> {
        self.execute(builder).await.map(|_| ())
    }
}

#[async_trait]
impl ChapterApi for HttpApi {
    async fn create_chapter(&self, course_id: i64, draft: &NewChapter) -> ApiResult<ChapterWire> {
        let url = self.url(&format!("/api/courses/{course_id}/chapters"));
        self.fetch(self.client.post(url).json(draft)).await
    }

    async fn update_chapter(&self, chapter_id: i64, patch: &ChapterPatch) -> ApiResult<ChapterWire> {
        let url = self.url(&format!("/api/chapters/{chapter_id}"));
        self.fetch(self.client.patch(url).json(patch)).await
    }

    async fn delete_chapter(&self, chapter_id: i64) -> ApiResult<()> {
        let url = self.url(&format!("/api/chapters/{chapter_id}"));
        self.fire(self.client.delete(url)).await
    }
}

#[async_trait]
impl LessonApi for HttpApi {
    async fn create_lesson(&self, chapter_id: i64, draft: &NewLesson) -> ApiResult<LessonWire> {
        let url = self.url(&format!("/api/chapters/{chapter_id}/lessons"));
        self.fetch(self.client.post(url).json(draft)).await
    }

    async fn update_lesson(&self, lesson_id: i64, patch: &LessonPatch) -> ApiResult<LessonWire> {
        let url = self.url(&format!("/api/lessons/{lesson_id}"));
        self.fetch(self.client.patch(url).json(patch)).await
    }

    async fn delete_lesson(&self, lesson_id: i64) -> ApiResult<()> {
        let url = self.url(&format!("/api/lessons/{lesson_id}"));
        self.fire(self.client.delete(url)).await
    }
}

#[async_trait]
impl LearnerApi for HttpApi {
    async fn fetch_lesson(&self, lesson_id: i64) -> ApiResult<LearnerLessonWire> {
        let url = self.url(&format!("/api/learn/lessons/{lesson_id}"));
        self.fetch(self.client.get(url)).await
    }

    async fn complete_lesson(&self, lesson_id: i64) -> ApiResult<()> {
        let url = self.url(&format!("/api/learn/lessons/{lesson_id}/complete"));
        self.fire(self.client.post(url)).await
    }

    async fn course_progress(&self, course_id: i64) -> ApiResult<u8> {
        let url = self.url(&format!("/api/learn/courses/{course_id}/progress"));
        let wire: ProgressWire = self.fetch(self.client.get(url)).await?;
        Ok(wire.progress.min(100))
    }
}

#[derive(Serialize)]
struct AttemptUpload<'a> {
    answers: &'a [AnswerUpload],
}

#[async_trait]
impl GradingApi for HttpApi {
    async fn submit_attempt(
        &self,
        quiz_id: i64,
        answers: &[AnswerUpload],
    ) -> ApiResult<AttemptVerdict> {
        let url = self.url(&format!("/api/learn/quizzes/{quiz_id}/attempts"));
        let envelope: AttemptEnvelope = self
            .fetch(self.client.post(url).json(&AttemptUpload { answers }))
            .await?;
        Ok(envelope.attempt)
    }
}
