//! Course Editor
//!
//! Author-facing operations over the course tree. Every edit lands in the
//! local store first, so the UI reflects intent instantly, and is reconciled
//! with the remote store afterwards. Text edits are expected to arrive here
//! on field blur or explicit save, which bounds call frequency.

pub(crate) mod chapter_ops;
pub(crate) mod command;
pub(crate) mod lesson_ops;


use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::{ChapterApi, LessonApi};
use crate::domain::{Chapter, Course, EntityId, Lesson, Question};
use crate::error::{StudioError, StudioResult};
use crate::notice::NoticeSink;
use crate::store::{tree, CourseStore};

use chapter_ops::{AddChapter, ChapterField, DeleteChapter, UpdateChapter};
use lesson_ops::{AddLesson, DeleteLesson, LessonField, ReplaceQuestions, UpdateLesson};

pub struct CourseEditor {
    store: CourseStore,
    chapters: Arc<dyn ChapterApi>,
    lessons: Arc<dyn LessonApi>,
    notices: NoticeSink,
    scope: CancellationToken,
}

impl CourseEditor {
    pub fn new(
        course: Course,
        chapters: Arc<dyn ChapterApi>,
        lessons: Arc<dyn LessonApi>,
        notices: NoticeSink,
    ) -> Self {
        Self {
            store: CourseStore::new(course),
            chapters,
            lessons,
            notices,
            scope: CancellationToken::new(),
        }
    }

    pub fn store(&self) -> &CourseStore {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<Course> {
        self.store.snapshot()
    }

    /// Tear down the editing session; echoes still in flight are dropped
    /// instead of mutating a view that no longer exists
    pub fn close(&self) {
        self.scope.cancel();
    }

    // ========================
    // Chapters
    // ========================

    pub async fn add_chapter(&self, title: &str) -> StudioResult<EntityId> {
        let title = self.required("chapter title", title)?;
        let snapshot = self.snapshot();
        let chapter = Chapter::draft(title, tree::next_chapter_order(&snapshot));
        let id = chapter.id;
        self.run(AddChapter {
            api: Arc::clone(&self.chapters),
            course_id: snapshot.id,
            chapter,
        })
        .await?;
        Ok(id)
    }

    pub async fn rename_chapter(&self, chapter_id: EntityId, title: &str) -> StudioResult<()> {
        let title = self.required("chapter title", title)?;
        self.run(UpdateChapter {
            api: Arc::clone(&self.chapters),
            chapter_id,
            field: ChapterField::Title(title),
        })
        .await
    }

    pub async fn describe_chapter(
        &self,
        chapter_id: EntityId,
        description: &str,
    ) -> StudioResult<()> {
        self.run(UpdateChapter {
            api: Arc::clone(&self.chapters),
            chapter_id,
            field: ChapterField::Description(description.trim().to_string()),
        })
        .await
    }

    pub async fn delete_chapter(&self, chapter_id: EntityId) -> StudioResult<()> {
        self.run(DeleteChapter {
            api: Arc::clone(&self.chapters),
            chapter_id,
            removed: None,
        })
        .await
    }

    // ========================
    // Lessons
    // ========================

    pub async fn add_lesson(&self, chapter_id: EntityId, title: &str) -> StudioResult<EntityId> {
        let title = self.required("lesson title", title)?;
        let snapshot = self.snapshot();
        let order = tree::chapter(&snapshot, chapter_id)
            .map(tree::next_lesson_order)
            .ok_or_else(|| self.noticed(StudioError::Missing { kind: "chapter" }))?;
        let lesson = Lesson::draft(title, order);
        let id = lesson.id;
        self.run(AddLesson {
            api: Arc::clone(&self.lessons),
            chapter_id,
            lesson,
        })
        .await?;
        Ok(id)
    }

    pub async fn rename_lesson(&self, lesson_id: EntityId, title: &str) -> StudioResult<()> {
        let title = self.required("lesson title", title)?;
        self.update_lesson_field(lesson_id, LessonField::Title(title)).await
    }

    pub async fn describe_lesson(&self, lesson_id: EntityId, description: &str) -> StudioResult<()> {
        self.update_lesson_field(
            lesson_id,
            LessonField::Description(description.trim().to_string()),
        )
        .await
    }

    pub async fn set_lesson_video(
        &self,
        lesson_id: EntityId,
        video_url: Option<String>,
    ) -> StudioResult<()> {
        self.update_lesson_field(lesson_id, LessonField::VideoUrl(video_url)).await
    }

    pub async fn set_lesson_visibility(
        &self,
        lesson_id: EntityId,
        visible: bool,
    ) -> StudioResult<()> {
        self.update_lesson_field(lesson_id, LessonField::Visibility(visible)).await
    }

    pub async fn delete_lesson(&self, lesson_id: EntityId) -> StudioResult<()> {
        self.run(DeleteLesson {
            api: Arc::clone(&self.lessons),
            lesson_id,
            removed: None,
        })
        .await
    }

    async fn update_lesson_field(&self, lesson_id: EntityId, field: LessonField) -> StudioResult<()> {
        self.run(UpdateLesson {
            api: Arc::clone(&self.lessons),
            lesson_id,
            field,
        })
        .await
    }

    // ========================
    // Quiz questions (full-replace)
    // ========================

    /// Replace the lesson's complete question list
    pub async fn set_lesson_questions(
        &self,
        lesson_id: EntityId,
        questions: Vec<Question>,
    ) -> StudioResult<()> {
        self.run(ReplaceQuestions {
            api: Arc::clone(&self.lessons),
            lesson_id,
            questions,
            upload: None,
        })
        .await
    }

    /// Append one question; recomputes and sends the whole list
    pub async fn add_question(&self, lesson_id: EntityId, question: Question) -> StudioResult<()> {
        if question.text.trim().is_empty() {
            return Err(self.noticed(StudioError::Validation {
                field: "question text",
            }));
        }
        if question.options.len() < 2 {
            return Err(self.noticed(StudioError::Validation {
                field: "answer options",
            }));
        }
        let mut questions = self.questions_of(lesson_id)?;
        questions.push(question);
        self.set_lesson_questions(lesson_id, questions).await
    }

    /// Replace the question at `index`; recomputes and sends the whole list
    pub async fn update_question(
        &self,
        lesson_id: EntityId,
        index: usize,
        question: Question,
    ) -> StudioResult<()> {
        let mut questions = self.questions_of(lesson_id)?;
        if index >= questions.len() {
            return Err(self.noticed(StudioError::Missing { kind: "question" }));
        }
        questions[index] = question;
        self.set_lesson_questions(lesson_id, questions).await
    }

    /// Remove the question at `index`; recomputes and sends the whole list
    pub async fn remove_question(&self, lesson_id: EntityId, index: usize) -> StudioResult<()> {
        let mut questions = self.questions_of(lesson_id)?;
        if index >= questions.len() {
            return Err(self.noticed(StudioError::Missing { kind: "question" }));
        }
        questions.remove(index);
        self.set_lesson_questions(lesson_id, questions).await
    }

    // ========================
    // Helpers
    // ========================

    fn questions_of(&self, lesson_id: EntityId) -> StudioResult<Vec<Question>> {
        let snapshot = self.snapshot();
        let lesson = tree::lesson(&snapshot, lesson_id)
            .ok_or_else(|| self.noticed(StudioError::Missing { kind: "lesson" }))?;
        Ok(lesson
            .quiz
            .as_ref()
            .map(|quiz| quiz.questions.clone())
            .unwrap_or_default())
    }

    fn required(&self, field: &'static str, value: &str) -> StudioResult<String> {
        let value = value.trim();
        if value.is_empty() {
            Err(self.noticed(StudioError::Validation { field }))
        } else {
            Ok(value.to_string())
        }
    }

    fn noticed(&self, err: StudioError) -> StudioError {
        self.notices.error(err.to_string());
        err
    }

    async fn run<C: command::OptimisticCommand>(&self, cmd: C) -> StudioResult<()> {
        command::run(&self.store, &self.notices, &self.scope, cmd).await
    }
}
