//! Chapter Commands
//!
//! Optimistic create/update/delete for chapters.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::wire::{self, ChapterWire};
use crate::api::{ChapterApi, ChapterPatch, NewChapter};
use crate::domain::{Chapter, Course, EntityId};
use crate::error::{ApiResult, StudioError, StudioResult};
use crate::store::tree;

use super::command::{remote_id, Commitment, OptimisticCommand};

pub(crate) struct AddChapter {
    pub api: Arc<dyn ChapterApi>,
    pub course_id: EntityId,
    pub chapter: Chapter,
}

#[async_trait]
impl OptimisticCommand for AddChapter {
    type Remote = ChapterWire;

    fn describe(&self) -> &'static str {
        "chapter"
    }

    fn apply(&mut self, course: &mut Course) -> StudioResult<()> {
        tree::push_chapter(course, self.chapter.clone());
        Ok(())
    }

    fn commitment(&self, _course: &Course) -> Commitment {
        if self.course_id.can_create_child() {
            Commitment::Remote
        } else {
            Commitment::LocalOnly(Some(StudioError::ParentNotSaved {
                parent: "course",
                child: "chapter",
            }))
        }
    }

    async fn commit(&mut self) -> ApiResult<ChapterWire> {
        let course_id = remote_id(self.course_id, "course")?;
        let draft = NewChapter {
            title: self.chapter.title.clone(),
            description: self.chapter.description.clone(),
            order: self.chapter.order,
        };
        self.api.create_chapter(course_id, &draft).await
    }

    fn reconcile(&mut self, course: &mut Course, remote: ChapterWire) {
        tree::promote_chapter(course, self.chapter.id, wire::chapter_from_wire(&remote));
    }

    fn rollback(&mut self, course: &mut Course) {
        tree::remove_chapter(course, self.chapter.id);
    }
}

pub(crate) enum ChapterField {
    Title(String),
    Description(String),
}

pub(crate) struct UpdateChapter {
    pub api: Arc<dyn ChapterApi>,
    pub chapter_id: EntityId,
    pub field: ChapterField,
}

#[async_trait]
impl OptimisticCommand for UpdateChapter {
    type Remote = ChapterWire;

    fn describe(&self) -> &'static str {
        "chapter"
    }

    fn apply(&mut self, course: &mut Course) -> StudioResult<()> {
        let chapter = tree::chapter_mut(course, self.chapter_id)
            .ok_or(StudioError::Missing { kind: "chapter" })?;
        match &self.field {
            ChapterField::Title(title) => chapter.title = title.clone(),
            ChapterField::Description(description) => chapter.description = description.clone(),
        }
        Ok(())
    }

    fn commitment(&self, _course: &Course) -> Commitment {
        if self.chapter_id.is_persisted() {
            Commitment::Remote
        } else {
            // Unsaved chapter: the edit is purely local, nothing to report
            Commitment::LocalOnly(None)
        }
    }

    async fn commit(&mut self) -> ApiResult<ChapterWire> {
        let chapter_id = remote_id(self.chapter_id, "chapter")?;
        let patch = match &self.field {
            ChapterField::Title(title) => ChapterPatch {
                title: Some(title.clone()),
                ..ChapterPatch::default()
            },
            ChapterField::Description(description) => ChapterPatch {
                description: Some(description.clone()),
                ..ChapterPatch::default()
            },
        };
        self.api.update_chapter(chapter_id, &patch).await
    }

    fn reconcile(&mut self, course: &mut Course, remote: ChapterWire) {
        if let Some(chapter) = tree::chapter_mut(course, self.chapter_id) {
            chapter.title = remote.title;
            chapter.description = remote.description;
            chapter.order = remote.order;
        }
    }

    fn rollback(&mut self, _course: &mut Course) {
        // Field updates keep the author's value; the error is only reported
    }
}

pub(crate) struct DeleteChapter {
    pub api: Arc<dyn ChapterApi>,
    pub chapter_id: EntityId,
    pub removed: Option<(usize, Chapter)>,
}

#[async_trait]
impl OptimisticCommand for DeleteChapter {
    type Remote = ();

    fn describe(&self) -> &'static str {
        "chapter"
    }

    fn apply(&mut self, course: &mut Course) -> StudioResult<()> {
        self.removed = tree::remove_chapter(course, self.chapter_id);
        match self.removed {
            Some(_) => Ok(()),
            None => Err(StudioError::Missing { kind: "chapter" }),
        }
    }

    fn commitment(&self, _course: &Course) -> Commitment {
        if self.chapter_id.is_persisted() {
            Commitment::Remote
        } else {
            // The store never knew about it; the local removal is enough
            Commitment::LocalOnly(None)
        }
    }

    async fn commit(&mut self) -> ApiResult<()> {
        let chapter_id = remote_id(self.chapter_id, "chapter")?;
        self.api.delete_chapter(chapter_id).await
    }

    fn reconcile(&mut self, _course: &mut Course, _remote: ()) {}

    fn rollback(&mut self, course: &mut Course) {
        if let Some((index, chapter)) = self.removed.take() {
            tree::insert_chapter(course, index, chapter);
        }
    }
}
