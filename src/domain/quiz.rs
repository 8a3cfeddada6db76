//! Quiz and Question Entities
//!
//! A quiz exists only attached to a lesson (1:1) and has no lifecycle of its
//! own: it is created, updated, and deleted as a side effect of lesson
//! updates, always as the complete question list.

use super::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub title: String,
    pub description: Option<String>,
    /// Passing threshold in percent
    pub passing_score: Option<u32>,
    pub time_limit_minutes: Option<u32>,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn named(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            passing_score: None,
            time_limit_minutes: None,
            questions: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: EntityId,
    pub text: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    pub explanation: Option<String>,
}

impl Question {
    pub fn draft(text: impl Into<String>, options: Vec<String>, correct_answer: usize) -> Self {
        Self {
            id: EntityId::fresh(),
            text: text.into(),
            options,
            correct_answer,
            explanation: None,
        }
    }
}
