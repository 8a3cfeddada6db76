//! Remote Store Contracts
//!
//! Abstract interfaces for the four external collaborators the core talks
//! to. Implementations can be HTTP, in-memory, etc.; transport and auth stay
//! behind these seams.

pub mod http;
pub mod wire;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ApiResult;
use wire::{AnswerUpload, AttemptVerdict, ChapterWire, LearnerLessonWire, LessonWire, QuizUpload};

pub use http::HttpApi;

// ========================
// Payloads
// ========================

/// Fields accepted when creating a chapter
#[derive(Debug, Clone, Serialize)]
pub struct NewChapter {
    pub title: String,
    pub description: String,
    pub order: i32,
}

/// Partial chapter update, committed on field blur
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChapterPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
}

/// Fields accepted when creating a lesson
#[derive(Debug, Clone, Serialize)]
pub struct NewLesson {
    pub title: String,
    pub description: String,
    pub order: i32,
    pub is_visible: bool,
}

/// Partial lesson update; may carry a full-replace quiz payload
#[derive(Debug, Clone, Default, Serialize)]
pub struct LessonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<QuizUpload>,
}

// ========================
// Contracts
// ========================

#[async_trait]
pub trait ChapterApi: Send + Sync {
    async fn create_chapter(&self, course_id: i64, draft: &NewChapter) -> ApiResult<ChapterWire>;
    async fn update_chapter(&self, chapter_id: i64, patch: &ChapterPatch) -> ApiResult<ChapterWire>;
    async fn delete_chapter(&self, chapter_id: i64) -> ApiResult<()>;
}

#[async_trait]
pub trait LessonApi: Send + Sync {
    async fn create_lesson(&self, chapter_id: i64, draft: &NewLesson) -> ApiResult<LessonWire>;
    async fn update_lesson(&self, lesson_id: i64, patch: &LessonPatch) -> ApiResult<LessonWire>;
    async fn delete_lesson(&self, lesson_id: i64) -> ApiResult<()>;
}

/// Lesson data and progress as the learner sees them
#[async_trait]
pub trait LearnerApi: Send + Sync {
    async fn fetch_lesson(&self, lesson_id: i64) -> ApiResult<LearnerLessonWire>;
    async fn complete_lesson(&self, lesson_id: i64) -> ApiResult<()>;
    /// Course completion percentage, 0-100
    async fn course_progress(&self, course_id: i64) -> ApiResult<u8>;
}

#[async_trait]
pub trait GradingApi: Send + Sync {
    async fn submit_attempt(
        &self,
        quiz_id: i64,
        answers: &[AnswerUpload],
    ) -> ApiResult<AttemptVerdict>;
}
