//! Lesson Entity

use super::{EntityId, Quiz};

/// A single lesson inside a chapter, with at most one embedded quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub is_visible: bool,
    pub order: i32,
    pub quiz: Option<Quiz>,
}

impl Lesson {
    /// New local lesson, appended at `order`, visible by default
    pub fn draft(title: impl Into<String>, order: i32) -> Self {
        Self {
            id: EntityId::fresh(),
            title: title.into(),
            description: String::new(),
            video_url: None,
            is_visible: true,
            order,
            quiz: None,
        }
    }
}
