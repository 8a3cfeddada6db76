//! Lesson Session
//!
//! Progressive unlock for the learner runtime: a lesson whose quiz has
//! questions stays locked (video without controls, navigation disabled)
//! until a passing attempt. Passing marks the lesson complete and refreshes
//! the course progress; failing re-fetches a fresh question set and relocks.
//! Nothing survives navigation away; a new session always re-evaluates
//! from the lesson data.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api::wire::{quiz_from_wire, LearnerLessonWire};
use crate::api::{GradingApi, LearnerApi};
use crate::domain::Question;
use crate::error::{StudioError, StudioResult};
use crate::notice::NoticeSink;

use super::attempt::AttemptEvaluator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonAccess {
    /// Lesson data not loaded yet
    Loading,
    /// No quiz, or an empty one: fully accessible
    Open,
    /// Quiz present: locked until a passing attempt
    QuizLocked,
    /// Quiz passed this session
    Passed,
}

impl LessonAccess {
    /// Next/Previous buttons are enabled only here
    pub fn navigation_enabled(&self) -> bool {
        matches!(self, LessonAccess::Open | LessonAccess::Passed)
    }

    /// Video controls follow navigation
    pub fn video_unlocked(&self) -> bool {
        self.navigation_enabled()
    }
}

/// Lesson as the learner sees it
#[derive(Debug, Clone)]
pub struct LearnerLesson {
    pub id: i64,
    pub title: String,
    pub video_url: Option<String>,
    /// Present only when it has at least one question
    pub quiz: Option<LearnerQuiz>,
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub struct LearnerQuiz {
    pub id: i64,
    pub questions: Vec<Question>,
}

fn lesson_from_wire(wire: &LearnerLessonWire) -> LearnerLesson {
    let quiz = wire
        .quiz
        .as_ref()
        .filter(|quiz| !quiz.questions.is_empty())
        .map(|quiz| LearnerQuiz {
            id: quiz.id.unwrap_or_default(),
            questions: quiz_from_wire(quiz).questions,
        });
    LearnerLesson {
        id: wire.id,
        title: wire.title.clone(),
        video_url: wire.video_url.clone(),
        quiz,
        completed: wire.completed,
    }
}

fn gate_for(lesson: &LearnerLesson) -> LessonAccess {
    if lesson.quiz.is_some() {
        LessonAccess::QuizLocked
    } else {
        LessonAccess::Open
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttemptOutcome {
    Passed { score: f32 },
    /// Fresh questions were fetched; prior answers are gone
    Failed,
    /// Nothing was submitted: the gate was not locked, or the view is gone
    Skipped,
}

pub struct LessonSession {
    lessons: Arc<dyn LearnerApi>,
    evaluator: AttemptEvaluator,
    notices: NoticeSink,
    scope: CancellationToken,
    course_id: i64,
    lesson_id: i64,
    state: LessonAccess,
    lesson: Option<LearnerLesson>,
    progress_percent: u8,
}

impl LessonSession {
    pub fn new(
        course_id: i64,
        lesson_id: i64,
        lessons: Arc<dyn LearnerApi>,
        grading: Arc<dyn GradingApi>,
        notices: NoticeSink,
    ) -> Self {
        Self {
            lessons,
            evaluator: AttemptEvaluator::new(grading),
            notices,
            scope: CancellationToken::new(),
            course_id,
            lesson_id,
            state: LessonAccess::Loading,
            lesson: None,
            progress_percent: 0,
        }
    }

    pub fn state(&self) -> LessonAccess {
        self.state
    }

    pub fn lesson(&self) -> Option<&LearnerLesson> {
        self.lesson.as_ref()
    }

    /// Last fetched course completion percentage
    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn can_navigate(&self) -> bool {
        self.state.navigation_enabled()
    }

    pub fn video_unlocked(&self) -> bool {
        self.state.video_unlocked()
    }

    /// Navigation away; late responses must not resurrect the view
    pub fn leave(&self) {
        self.scope.cancel();
    }

    /// Fetch the lesson and derive the gate from its quiz
    pub async fn load(&mut self) -> StudioResult<()> {
        self.state = LessonAccess::Loading;
        match self.lessons.fetch_lesson(self.lesson_id).await {
            Ok(wire) => {
                if self.scope.is_cancelled() {
                    return Ok(());
                }
                let lesson = lesson_from_wire(&wire);
                self.state = gate_for(&lesson);
                self.lesson = Some(lesson);
                Ok(())
            }
            Err(err) => {
                self.notices.error(format!("could not load the lesson: {err}"));
                Err(StudioError::Network(err))
            }
        }
    }

    /// Submit one picked option per question. Passing unlocks the lesson
    /// exactly once per session; failing re-fetches a fresh question set.
    pub async fn submit(&mut self, picks: &[usize]) -> StudioResult<AttemptOutcome> {
        if self.state != LessonAccess::QuizLocked {
            return Ok(AttemptOutcome::Skipped);
        }
        let Some(quiz) = self.lesson.as_ref().and_then(|l| l.quiz.clone()) else {
            return Ok(AttemptOutcome::Skipped);
        };
        if picks.len() != quiz.questions.len() {
            self.notices.error("answer every question before submitting");
            return Err(StudioError::Validation { field: "answers" });
        }

        let verdict = match self.evaluator.evaluate(&quiz, picks).await {
            Ok(verdict) => verdict,
            Err(err) => {
                // Gate untouched; the learner can retry as-is
                self.notices.error(format!("{err}, try again"));
                return Err(err);
            }
        };
        if self.scope.is_cancelled() {
            return Ok(AttemptOutcome::Skipped);
        }

        if verdict.passed {
            self.state = LessonAccess::Passed;
            if let Some(lesson) = self.lesson.as_mut() {
                lesson.completed = true;
            }
            if let Err(err) = self.lessons.complete_lesson(self.lesson_id).await {
                self.notices
                    .warning(format!("passed, but completion was not recorded: {err}"));
            }
            match self.lessons.course_progress(self.course_id).await {
                Ok(percent) => self.progress_percent = percent,
                Err(err) => self
                    .notices
                    .warning(format!("could not refresh course progress: {err}")),
            }
            log::info!("lesson {} unlocked", self.lesson_id);
            Ok(AttemptOutcome::Passed {
                score: verdict.score,
            })
        } else {
            // A failed attempt gets a fresh question set; old picks are void
            self.refresh_questions().await;
            Ok(AttemptOutcome::Failed)
        }
    }

    async fn refresh_questions(&mut self) {
        match self.lessons.fetch_lesson(self.lesson_id).await {
            Ok(wire) => {
                if self.scope.is_cancelled() {
                    return;
                }
                let lesson = lesson_from_wire(&wire);
                self.state = gate_for(&lesson);
                self.lesson = Some(lesson);
            }
            Err(err) => {
                // Stay locked with the old questions rather than unlock
                self.state = LessonAccess::QuizLocked;
                self.notices
                    .warning(format!("could not refresh the quiz: {err}"));
            }
        }
    }
}
