//! Wire Representations
//!
//! Shapes exchanged with the remote store, and the conversions between them
//! and the in-memory entities. The store speaks snake_case JSON and is
//! inconsistent about quiz answers, so coercion lives here and nowhere else.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Chapter, EntityId, Lesson, Question, Quiz};

// ========================
// Store echoes
// ========================

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterWire {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: i32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonWire {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub order: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub quiz: Option<QuizWire>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizWire {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub passing_score: Option<u32>,
    #[serde(default)]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub questions: Vec<QuestionWire>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: CorrectAnswer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// The store returns `correct_answer` as a bare string, a number, or a
/// single-element array depending on which code path wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Index(i64),
    Text(String),
    Many(Vec<serde_json::Value>),
}

impl CorrectAnswer {
    /// Coerce to an option index. Unparsable values fall back to `0`, never
    /// to "no answer"; the platform has always read the field this way.
    pub fn as_index(&self) -> usize {
        match self {
            CorrectAnswer::Index(n) if *n >= 0 => *n as usize,
            CorrectAnswer::Index(_) => 0,
            CorrectAnswer::Text(s) => s.trim().parse().unwrap_or(0),
            CorrectAnswer::Many(values) => values.first().map_or(0, |v| match v {
                serde_json::Value::Number(n) => n.as_u64().unwrap_or(0) as usize,
                serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
                _ => 0,
            }),
        }
    }
}

// ========================
// Learner-facing echoes
// ========================

#[derive(Debug, Clone, Deserialize)]
pub struct LearnerLessonWire {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub quiz: Option<QuizWire>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressWire {
    /// Course completion, 0-100
    pub progress: u8,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AttemptVerdict {
    pub passed: bool,
    #[serde(default)]
    pub score: f32,
}

#[derive(Debug, Deserialize)]
pub struct AttemptEnvelope {
    pub attempt: AttemptVerdict,
}

// ========================
// Uploads
// ========================

/// Full-replace quiz payload embedded in a lesson update. Any single
/// question add/edit/delete recomputes and sends the whole list.
#[derive(Debug, Clone, Serialize)]
pub struct QuizUpload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passing_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    pub questions: Vec<QuestionWire>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerUpload {
    pub question_id: i64,
    pub selected_indices: Vec<usize>,
}

// ========================
// Conversions
// ========================

/// Outbound question; the index is always sent as a string
pub fn question_to_wire(question: &Question) -> QuestionWire {
    QuestionWire {
        id: question.id.store_id(),
        question: question.text.clone(),
        options: question.options.clone(),
        correct_answer: CorrectAnswer::Text(question.correct_answer.to_string()),
        explanation: question.explanation.clone(),
    }
}

pub fn question_from_wire(wire: &QuestionWire) -> Question {
    Question {
        id: wire.id.map_or_else(EntityId::fresh, EntityId::Persisted),
        text: wire.question.clone(),
        options: wire.options.clone(),
        correct_answer: wire.correct_answer.as_index(),
        explanation: wire.explanation.clone(),
    }
}

pub fn quiz_from_wire(wire: &QuizWire) -> Quiz {
    Quiz {
        title: wire.title.clone(),
        description: wire.description.clone(),
        passing_score: wire.passing_score,
        time_limit_minutes: wire.time_limit,
        questions: wire.questions.iter().map(question_from_wire).collect(),
    }
}

pub fn quiz_to_upload(quiz: &Quiz) -> QuizUpload {
    QuizUpload {
        title: quiz.title.clone(),
        description: quiz.description.clone(),
        passing_score: quiz.passing_score,
        time_limit: quiz.time_limit_minutes,
        questions: quiz.questions.iter().map(question_to_wire).collect(),
    }
}

/// Echoed chapter as a local entity; lessons stay whatever the tree holds
pub fn chapter_from_wire(wire: &ChapterWire) -> Chapter {
    Chapter {
        id: EntityId::Persisted(wire.id),
        title: wire.title.clone(),
        description: wire.description.clone(),
        order: wire.order,
        lessons: Vec::new(),
    }
}

pub fn lesson_from_wire(wire: &LessonWire) -> Lesson {
    Lesson {
        id: EntityId::Persisted(wire.id),
        title: wire.title.clone(),
        description: wire.description.clone(),
        video_url: wire.video_url.clone(),
        is_visible: wire.is_visible,
        order: wire.order,
        quiz: wire.quiz.as_ref().map(quiz_from_wire),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_answer_coercion() {
        assert_eq!(CorrectAnswer::Text("2".into()).as_index(), 2);
        assert_eq!(CorrectAnswer::Text(" 1 ".into()).as_index(), 1);
        assert_eq!(CorrectAnswer::Index(3).as_index(), 3);
        assert_eq!(CorrectAnswer::Index(-1).as_index(), 0);
        assert_eq!(
            CorrectAnswer::Many(vec![serde_json::json!("1")]).as_index(),
            1
        );
        assert_eq!(
            CorrectAnswer::Many(vec![serde_json::json!(2)]).as_index(),
            2
        );
    }

    #[test]
    fn test_unparsable_answer_falls_back_to_zero() {
        assert_eq!(CorrectAnswer::Text("first".into()).as_index(), 0);
        assert_eq!(CorrectAnswer::Many(vec![]).as_index(), 0);
        assert_eq!(
            CorrectAnswer::Many(vec![serde_json::json!(null)]).as_index(),
            0
        );
    }

    #[test]
    fn test_scalar_and_array_wire_forms_deserialize() {
        let scalar: QuestionWire = serde_json::from_str(
            r#"{"question":"q","options":["a","b"],"correct_answer":"1"}"#,
        )
        .expect("scalar form");
        assert_eq!(scalar.correct_answer.as_index(), 1);

        let array: QuestionWire = serde_json::from_str(
            r#"{"question":"q","options":["a","b"],"correct_answer":["1"]}"#,
        )
        .expect("array form");
        assert_eq!(array.correct_answer.as_index(), 1);
    }

    #[test]
    fn test_question_round_trip_keeps_index_and_id() {
        let question = Question {
            id: EntityId::Persisted(7),
            text: "ما هي عاصمة مصر؟".into(),
            options: vec!["القاهرة".into(), "الرياض".into()],
            correct_answer: 0,
            explanation: Some("drilled in chapter one".into()),
        };

        let wire = question_to_wire(&question);
        assert_eq!(wire.id, Some(7));
        assert!(matches!(&wire.correct_answer, CorrectAnswer::Text(s) if s == "0"));

        let back = question_from_wire(&wire);
        assert_eq!(back, question);
    }

    #[test]
    fn test_local_question_uploads_without_id() {
        let question = Question::draft("q", vec!["a".into(), "b".into()], 1);
        let wire = question_to_wire(&question);
        assert_eq!(wire.id, None);
        let json = serde_json::to_value(&wire).expect("serialize");
        assert!(json.get("id").is_none());
    }
}
