//! Course Tree Edits
//!
//! Pure mutation helpers for the nested course structure. Everything here is
//! synchronous and local; the authoring layer decides what also goes over
//! the wire. Removals hand back the removed entity and its index so a failed
//! sync can put things back exactly where they were.

use crate::domain::{Chapter, Course, EntityId, Lesson, Question, Quiz};

/// Next append-at-end order for a new chapter
pub fn next_chapter_order(course: &Course) -> i32 {
    course.chapters.iter().map(|c| c.order).max().map_or(0, |n| n + 1)
}

/// Next append-at-end order for a new lesson in a chapter
pub fn next_lesson_order(chapter: &Chapter) -> i32 {
    chapter.lessons.iter().map(|l| l.order).max().map_or(0, |n| n + 1)
}

// ========================
// Lookups
// ========================

pub fn chapter(course: &Course, id: EntityId) -> Option<&Chapter> {
    course.chapters.iter().find(|c| c.id == id)
}

pub fn chapter_mut(course: &mut Course, id: EntityId) -> Option<&mut Chapter> {
    course.chapters.iter_mut().find(|c| c.id == id)
}

pub fn lesson(course: &Course, id: EntityId) -> Option<&Lesson> {
    course
        .chapters
        .iter()
        .flat_map(|c| c.lessons.iter())
        .find(|l| l.id == id)
}

pub fn lesson_mut(course: &mut Course, id: EntityId) -> Option<&mut Lesson> {
    course
        .chapters
        .iter_mut()
        .flat_map(|c| c.lessons.iter_mut())
        .find(|l| l.id == id)
}

/// Chapter that owns a lesson
pub fn chapter_of_lesson(course: &Course, lesson_id: EntityId) -> Option<&Chapter> {
    course
        .chapters
        .iter()
        .find(|c| c.lessons.iter().any(|l| l.id == lesson_id))
}

// ========================
// Chapter edits
// ========================

pub fn push_chapter(course: &mut Course, chapter: Chapter) {
    course.chapters.push(chapter);
}

/// Remove a chapter and everything nested under it; returns the index and
/// the chapter for rollback re-insertion
pub fn remove_chapter(course: &mut Course, id: EntityId) -> Option<(usize, Chapter)> {
    let index = course.chapters.iter().position(|c| c.id == id)?;
    Some((index, course.chapters.remove(index)))
}

pub fn insert_chapter(course: &mut Course, index: usize, chapter: Chapter) {
    let index = index.min(course.chapters.len());
    course.chapters.insert(index, chapter);
}

/// Swap an ephemeral chapter id for the store-confirmed entity, in place:
/// the list position does not move and locally-added lessons survive
pub fn promote_chapter(course: &mut Course, local: EntityId, confirmed: Chapter) -> bool {
    match chapter_mut(course, local) {
        Some(existing) => {
            let lessons = std::mem::take(&mut existing.lessons);
            *existing = Chapter { lessons, ..confirmed };
            true
        }
        None => false,
    }
}

// ========================
// Lesson edits
// ========================

pub fn push_lesson(course: &mut Course, chapter_id: EntityId, lesson: Lesson) -> bool {
    match chapter_mut(course, chapter_id) {
        Some(chapter) => {
            chapter.lessons.push(lesson);
            true
        }
        None => false,
    }
}

/// Remove a lesson; returns the owning chapter id, the index, and the lesson
pub fn remove_lesson(course: &mut Course, id: EntityId) -> Option<(EntityId, usize, Lesson)> {
    for chapter in &mut course.chapters {
        if let Some(index) = chapter.lessons.iter().position(|l| l.id == id) {
            let lesson = chapter.lessons.remove(index);
            return Some((chapter.id, index, lesson));
        }
    }
    None
}

pub fn insert_lesson(
    course: &mut Course,
    chapter_id: EntityId,
    index: usize,
    lesson: Lesson,
) -> bool {
    match chapter_mut(course, chapter_id) {
        Some(chapter) => {
            let index = index.min(chapter.lessons.len());
            chapter.lessons.insert(index, lesson);
            true
        }
        None => false,
    }
}

/// In-place identity swap for a lesson; a quiz drafted before the lesson was
/// saved survives the promotion
pub fn promote_lesson(course: &mut Course, local: EntityId, confirmed: Lesson) -> bool {
    match lesson_mut(course, local) {
        Some(existing) => {
            let quiz = existing.quiz.take();
            *existing = Lesson { quiz, ..confirmed };
            true
        }
        None => false,
    }
}

// ========================
// Quiz edits
// ========================

/// Replace the lesson's question list wholesale, creating a default-titled
/// quiz when the lesson has none yet
pub fn set_quiz_questions(course: &mut Course, lesson_id: EntityId, questions: Vec<Question>) -> bool {
    match lesson_mut(course, lesson_id) {
        Some(lesson) => {
            let quiz = lesson
                .quiz
                .get_or_insert_with(|| Quiz::named(lesson.title.clone()));
            quiz.questions = questions;
            true
        }
        None => false,
    }
}

/// The store's echoed quiz unconditionally overwrites local question state
pub fn replace_quiz(course: &mut Course, lesson_id: EntityId, quiz: Option<Quiz>) -> bool {
    match lesson_mut(course, lesson_id) {
        Some(lesson) => {
            lesson.quiz = quiz;
            true
        }
        None => false,
    }
}

// ========================
// Display order
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineRow {
    Chapter(EntityId),
    Lesson(EntityId),
}

/// Flatten the course into (row, depth) pairs in display order, chapters and
/// their lessons sorted by `order`
pub fn outline(course: &Course) -> Vec<(OutlineRow, usize)> {
    let mut chapters: Vec<&Chapter> = course.chapters.iter().collect();
    chapters.sort_by_key(|c| c.order);

    let mut rows = Vec::new();
    for chapter in chapters {
        rows.push((OutlineRow::Chapter(chapter.id), 0));
        let mut lessons: Vec<&Lesson> = chapter.lessons.iter().collect();
        lessons.sort_by_key(|l| l.order);
        for lesson in lessons {
            rows.push((OutlineRow::Lesson(lesson.id), 1));
        }
    }
    rows
}
