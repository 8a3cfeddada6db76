//! Course Entity
//!
//! Root of the content tree; owns its chapters.

use super::{Chapter, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// Price in the platform's smallest currency unit; ignored when free
    pub price_cents: i64,
    pub is_free: bool,
    pub status: CourseStatus,
    pub chapters: Vec<Chapter>,
}

impl Course {
    pub fn new(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            price_cents: 0,
            is_free: true,
            status: CourseStatus::Draft,
            chapters: Vec::new(),
        }
    }
}
