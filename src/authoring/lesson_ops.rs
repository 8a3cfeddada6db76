//! Lesson and Quiz Commands
//!
//! Optimistic create/update/delete for lessons, plus the full-replace
//! question-list update that rides inside a lesson patch.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::wire::{self, LessonWire};
use crate::api::{LessonApi, LessonPatch, NewLesson};
use crate::domain::{Course, EntityId, Lesson, Question};
use crate::error::{ApiResult, StudioError, StudioResult};
use crate::store::tree;

use super::command::{remote_id, Commitment, OptimisticCommand};

pub(crate) struct AddLesson {
    pub api: Arc<dyn LessonApi>,
    pub chapter_id: EntityId,
    pub lesson: Lesson,
}

#[async_trait]
impl OptimisticCommand for AddLesson {
    type Remote = LessonWire;

    fn describe(&self) -> &'static str {
        "lesson"
    }

    fn apply(&mut self, course: &mut Course) -> StudioResult<()> {
        if tree::push_lesson(course, self.chapter_id, self.lesson.clone()) {
            Ok(())
        } else {
            Err(StudioError::Missing { kind: "chapter" })
        }
    }

    fn commitment(&self, _course: &Course) -> Commitment {
        if self.chapter_id.can_create_child() {
            Commitment::Remote
        } else {
            Commitment::LocalOnly(Some(StudioError::ParentNotSaved {
                parent: "chapter",
                child: "lesson",
            }))
        }
    }

    async fn commit(&mut self) -> ApiResult<LessonWire> {
        let chapter_id = remote_id(self.chapter_id, "chapter")?;
        let draft = NewLesson {
            title: self.lesson.title.clone(),
            description: self.lesson.description.clone(),
            order: self.lesson.order,
            is_visible: self.lesson.is_visible,
        };
        self.api.create_lesson(chapter_id, &draft).await
    }

    fn reconcile(&mut self, course: &mut Course, remote: LessonWire) {
        tree::promote_lesson(course, self.lesson.id, wire::lesson_from_wire(&remote));
    }

    fn rollback(&mut self, course: &mut Course) {
        tree::remove_lesson(course, self.lesson.id);
    }
}

pub(crate) enum LessonField {
    Title(String),
    Description(String),
    VideoUrl(Option<String>),
    Visibility(bool),
}

pub(crate) struct UpdateLesson {
    pub api: Arc<dyn LessonApi>,
    pub lesson_id: EntityId,
    pub field: LessonField,
}

#[async_trait]
impl OptimisticCommand for UpdateLesson {
    type Remote = LessonWire;

    fn describe(&self) -> &'static str {
        "lesson"
    }

    fn apply(&mut self, course: &mut Course) -> StudioResult<()> {
        let lesson = tree::lesson_mut(course, self.lesson_id)
            .ok_or(StudioError::Missing { kind: "lesson" })?;
        match &self.field {
            LessonField::Title(title) => lesson.title = title.clone(),
            LessonField::Description(description) => lesson.description = description.clone(),
            LessonField::VideoUrl(url) => lesson.video_url = url.clone(),
            LessonField::Visibility(visible) => lesson.is_visible = *visible,
        }
        Ok(())
    }

    fn commitment(&self, _course: &Course) -> Commitment {
        if self.lesson_id.is_persisted() {
            Commitment::Remote
        } else {
            Commitment::LocalOnly(None)
        }
    }

    async fn commit(&mut self) -> ApiResult<LessonWire> {
        let lesson_id = remote_id(self.lesson_id, "lesson")?;
        let patch = match &self.field {
            LessonField::Title(title) => LessonPatch {
                title: Some(title.clone()),
                ..LessonPatch::default()
            },
            LessonField::Description(description) => LessonPatch {
                description: Some(description.clone()),
                ..LessonPatch::default()
            },
            LessonField::VideoUrl(url) => LessonPatch {
                video_url: Some(url.clone()),
                ..LessonPatch::default()
            },
            LessonField::Visibility(visible) => LessonPatch {
                is_visible: Some(*visible),
                ..LessonPatch::default()
            },
        };
        self.api.update_lesson(lesson_id, &patch).await
    }

    fn reconcile(&mut self, course: &mut Course, remote: LessonWire) {
        if let Some(lesson) = tree::lesson_mut(course, self.lesson_id) {
            lesson.title = remote.title;
            lesson.description = remote.description;
            lesson.video_url = remote.video_url;
            lesson.is_visible = remote.is_visible;
            lesson.order = remote.order;
        }
    }

    fn rollback(&mut self, _course: &mut Course) {
        // Field updates keep the author's value; the error is only reported
    }
}

pub(crate) struct DeleteLesson {
    pub api: Arc<dyn LessonApi>,
    pub lesson_id: EntityId,
    pub removed: Option<(EntityId, usize, Lesson)>,
}

#[async_trait]
impl OptimisticCommand for DeleteLesson {
    type Remote = ();

    fn describe(&self) -> &'static str {
        "lesson"
    }

    fn apply(&mut self, course: &mut Course) -> StudioResult<()> {
        self.removed = tree::remove_lesson(course, self.lesson_id);
        match self.removed {
            Some(_) => Ok(()),
            None => Err(StudioError::Missing { kind: "lesson" }),
        }
    }

    fn commitment(&self, _course: &Course) -> Commitment {
        if self.lesson_id.is_persisted() {
            Commitment::Remote
        } else {
            Commitment::LocalOnly(None)
        }
    }

    async fn commit(&mut self) -> ApiResult<()> {
        let lesson_id = remote_id(self.lesson_id, "lesson")?;
        self.api.delete_lesson(lesson_id).await
    }

    fn reconcile(&mut self, _course: &mut Course, _remote: ()) {}

    fn rollback(&mut self, course: &mut Course) {
        if let Some((chapter_id, index, lesson)) = self.removed.take() {
            tree::insert_lesson(course, chapter_id, index, lesson);
        }
    }
}

/// Full-replace question update. The recomputed complete list goes out in a
/// lesson patch and the echoed quiz overwrites local question state; a
/// failure keeps the author's local list like any other field edit.
pub(crate) struct ReplaceQuestions {
    pub api: Arc<dyn LessonApi>,
    pub lesson_id: EntityId,
    pub questions: Vec<Question>,
    /// Captured at apply time, once the lesson's quiz shell is known
    pub upload: Option<wire::QuizUpload>,
}

#[async_trait]
impl OptimisticCommand for ReplaceQuestions {
    type Remote = LessonWire;

    fn describe(&self) -> &'static str {
        "quiz"
    }

    fn apply(&mut self, course: &mut Course) -> StudioResult<()> {
        if !tree::set_quiz_questions(course, self.lesson_id, self.questions.clone()) {
            return Err(StudioError::Missing { kind: "lesson" });
        }
        self.upload = tree::lesson(course, self.lesson_id)
            .and_then(|lesson| lesson.quiz.as_ref())
            .map(wire::quiz_to_upload);
        Ok(())
    }

    fn commitment(&self, _course: &Course) -> Commitment {
        if self.lesson_id.is_persisted() {
            Commitment::Remote
        } else {
            Commitment::LocalOnly(Some(StudioError::ParentNotSaved {
                parent: "lesson",
                child: "quiz",
            }))
        }
    }

    async fn commit(&mut self) -> ApiResult<LessonWire> {
        let lesson_id = remote_id(self.lesson_id, "lesson")?;
        let patch = LessonPatch {
            quiz: self.upload.take(),
            ..LessonPatch::default()
        };
        self.api.update_lesson(lesson_id, &patch).await
    }

    fn reconcile(&mut self, course: &mut Course, remote: LessonWire) {
        let echoed = remote.quiz.as_ref().map(wire::quiz_from_wire);
        tree::replace_quiz(course, self.lesson_id, echoed);
    }

    fn rollback(&mut self, _course: &mut Course) {
        // Keep the author's question list; the error is only reported
    }
}
