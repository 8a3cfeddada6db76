//! Attempt Evaluation
//!
//! Builds the per-question submission and interprets the grading verdict.
//! A network failure here never moves the gate; the caller only reports it.

use std::sync::Arc;

use crate::api::wire::{AnswerUpload, AttemptVerdict};
use crate::api::GradingApi;
use crate::error::{StudioError, StudioResult};

use super::session::LearnerQuiz;

pub struct AttemptEvaluator {
    grading: Arc<dyn GradingApi>,
}

impl AttemptEvaluator {
    pub fn new(grading: Arc<dyn GradingApi>) -> Self {
        Self { grading }
    }

    /// Submit one picked option per question, in question order
    pub async fn evaluate(&self, quiz: &LearnerQuiz, picks: &[usize]) -> StudioResult<AttemptVerdict> {
        let answers: Vec<AnswerUpload> = quiz
            .questions
            .iter()
            .zip(picks)
            .map(|(question, pick)| AnswerUpload {
                question_id: question.id.store_id().unwrap_or_default(),
                selected_indices: vec![*pick],
            })
            .collect();

        self.grading
            .submit_attempt(quiz.id, &answers)
            .await
            .map_err(StudioError::Grading)
    }
}
