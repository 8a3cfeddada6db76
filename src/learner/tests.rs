//! Learner Session Tests
//!
//! Drives the progressive-unlock gate against scripted lesson and grading
//! collaborators.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::wire::{
    AnswerUpload, AttemptVerdict, CorrectAnswer, LearnerLessonWire, QuestionWire, QuizWire,
};
use crate::api::{GradingApi, LearnerApi};
use crate::error::{ApiError, ApiResult, StudioError};
use crate::notice::{Notice, NoticeLevel, NoticeSink};

use super::{AttemptOutcome, LessonAccess, LessonSession};

fn wire_question(id: i64, text: &str) -> QuestionWire {
    QuestionWire {
        id: Some(id),
        question: text.to_string(),
        options: vec!["أ".to_string(), "ب".to_string(), "ج".to_string()],
        correct_answer: CorrectAnswer::Text("0".to_string()),
        explanation: None,
    }
}

fn lesson_with_questions(title: &str, questions: Vec<QuestionWire>) -> LearnerLessonWire {
    LearnerLessonWire {
        id: 55,
        title: title.to_string(),
        video_url: Some("https://cdn.example.com/lessons/55.mp4".to_string()),
        quiz: Some(QuizWire {
            id: Some(7),
            title: title.to_string(),
            description: None,
            passing_score: Some(60),
            time_limit: None,
            questions,
        }),
        completed: false,
    }
}

struct FakeLearn {
    lesson: Mutex<LearnerLessonWire>,
    verdicts: Mutex<VecDeque<ApiResult<AttemptVerdict>>>,
    submitted: Mutex<Vec<Vec<AnswerUpload>>>,
    progress: AtomicU32,
    fetches: AtomicU32,
    completions: AtomicU32,
    progress_reads: AtomicU32,
}

impl FakeLearn {
    fn new(lesson: LearnerLessonWire) -> Arc<Self> {
        Arc::new(Self {
            lesson: Mutex::new(lesson),
            verdicts: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
            progress: AtomicU32::new(40),
            fetches: AtomicU32::new(0),
            completions: AtomicU32::new(0),
            progress_reads: AtomicU32::new(0),
        })
    }

    fn queue_verdict(&self, verdict: ApiResult<AttemptVerdict>) {
        self.verdicts.lock().unwrap().push_back(verdict);
    }

    fn serve_lesson(&self, lesson: LearnerLessonWire) {
        *self.lesson.lock().unwrap() = lesson;
    }

    fn set_progress(&self, percent: u32) {
        self.progress.store(percent, Ordering::SeqCst);
    }
}

#[async_trait]
impl LearnerApi for FakeLearn {
    async fn fetch_lesson(&self, _lesson_id: i64) -> ApiResult<LearnerLessonWire> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.lesson.lock().unwrap().clone())
    }

    async fn complete_lesson(&self, _lesson_id: i64) -> ApiResult<()> {
        self.completions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn course_progress(&self, _course_id: i64) -> ApiResult<u8> {
        self.progress_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.progress.load(Ordering::SeqCst) as u8)
    }
}

#[async_trait]
impl GradingApi for FakeLearn {
    async fn submit_attempt(
        &self,
        _quiz_id: i64,
        answers: &[AnswerUpload],
    ) -> ApiResult<AttemptVerdict> {
        self.submitted.lock().unwrap().push(answers.to_vec());
        self.verdicts
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted verdict")
    }
}

fn session_for(remote: &Arc<FakeLearn>) -> (LessonSession, tokio::sync::mpsc::UnboundedReceiver<Notice>) {
    let lessons: Arc<dyn LearnerApi> = remote.clone();
    let grading: Arc<dyn GradingApi> = remote.clone();
    let (notices, rx) = NoticeSink::channel();
    (LessonSession::new(9, 55, lessons, grading, notices), rx)
}

fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut out = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        out.push(notice);
    }
    out
}

#[tokio::test]
async fn test_lesson_without_questions_opens_immediately() {
    let mut bare = lesson_with_questions("مقدمة", Vec::new());
    bare.quiz = None;
    let remote = FakeLearn::new(bare);
    let (mut session, _rx) = session_for(&remote);

    session.load().await.expect("load");

    assert_eq!(session.state(), LessonAccess::Open);
    assert!(session.can_navigate());
    assert!(session.video_unlocked());
}

#[tokio::test]
async fn test_empty_quiz_never_locks() {
    let remote = FakeLearn::new(lesson_with_questions("مقدمة", Vec::new()));
    let (mut session, _rx) = session_for(&remote);

    session.load().await.expect("load");

    assert_eq!(session.state(), LessonAccess::Open);
}

#[tokio::test]
async fn test_quiz_locks_video_and_navigation() {
    let remote = FakeLearn::new(lesson_with_questions(
        "الدرس الأول",
        vec![
            wire_question(1, "س١"),
            wire_question(2, "س٢"),
            wire_question(3, "س٣"),
        ],
    ));
    let (mut session, _rx) = session_for(&remote);

    session.load().await.expect("load");

    assert_eq!(session.state(), LessonAccess::QuizLocked);
    assert!(!session.can_navigate());
    assert!(!session.video_unlocked());
}

#[tokio::test]
async fn test_passing_attempt_unlocks_exactly_once() {
    // Chapter "الفصل الأول", lesson "الدرس الأول", three questions
    let remote = FakeLearn::new(lesson_with_questions(
        "الدرس الأول",
        vec![
            wire_question(1, "س١"),
            wire_question(2, "س٢"),
            wire_question(3, "س٣"),
        ],
    ));
    remote.set_progress(53);
    remote.queue_verdict(Ok(AttemptVerdict {
        passed: true,
        score: 100.0,
    }));
    let (mut session, _rx) = session_for(&remote);
    session.load().await.expect("load");

    let outcome = session.submit(&[0, 0, 0]).await.expect("submit");

    assert!(matches!(outcome, AttemptOutcome::Passed { .. }));
    assert_eq!(session.state(), LessonAccess::Passed);
    assert!(session.can_navigate());
    assert!(session.video_unlocked());
    assert_eq!(session.progress_percent(), 53);
    assert_eq!(remote.completions.load(Ordering::SeqCst), 1);
    assert_eq!(remote.progress_reads.load(Ordering::SeqCst), 1);

    // A second submit in the same session is a no-op
    let again = session.submit(&[0, 0, 0]).await.expect("second submit");
    assert_eq!(again, AttemptOutcome::Skipped);
    assert_eq!(remote.completions.load(Ordering::SeqCst), 1);
    assert_eq!(remote.progress_reads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failing_attempt_relocks_with_fresh_questions() {
    let remote = FakeLearn::new(lesson_with_questions(
        "الدرس الأول",
        vec![
            wire_question(1, "س١"),
            wire_question(2, "س٢"),
            wire_question(3, "س٣"),
        ],
    ));
    remote.queue_verdict(Ok(AttemptVerdict {
        passed: false,
        score: 33.0,
    }));
    let (mut session, _rx) = session_for(&remote);
    session.load().await.expect("load");

    // The store regenerates questions for the next attempt
    remote.serve_lesson(lesson_with_questions(
        "الدرس الأول",
        vec![
            wire_question(4, "س٤"),
            wire_question(5, "س٥"),
            wire_question(6, "س٦"),
        ],
    ));

    let outcome = session.submit(&[1, 2, 1]).await.expect("submit");

    assert_eq!(outcome, AttemptOutcome::Failed);
    assert_eq!(session.state(), LessonAccess::QuizLocked);
    assert!(!session.can_navigate());
    assert_eq!(remote.fetches.load(Ordering::SeqCst), 2);
    let texts: Vec<String> = session
        .lesson()
        .and_then(|l| l.quiz.as_ref())
        .map(|q| q.questions.iter().map(|x| x.text.clone()).collect())
        .expect("quiz");
    assert_eq!(texts, ["س٤", "س٥", "س٦"]);
    assert_eq!(remote.completions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_grading_failure_leaves_gate_untouched() {
    let remote = FakeLearn::new(lesson_with_questions(
        "الدرس الأول",
        vec![wire_question(1, "س١")],
    ));
    remote.queue_verdict(Err(ApiError::Transport("connection reset".to_string())));
    let (mut session, mut rx) = session_for(&remote);
    session.load().await.expect("load");

    let result = session.submit(&[0]).await;

    assert!(matches!(result, Err(StudioError::Grading(_))));
    assert_eq!(session.state(), LessonAccess::QuizLocked);
    assert_eq!(remote.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(remote.completions.load(Ordering::SeqCst), 0);
    let notices = drain(&mut rx);
    assert!(notices
        .iter()
        .any(|n| n.level == NoticeLevel::Error && n.message.contains("try again")));
}

#[tokio::test]
async fn test_incomplete_answers_never_reach_grading() {
    let remote = FakeLearn::new(lesson_with_questions(
        "الدرس الأول",
        vec![wire_question(1, "س١"), wire_question(2, "س٢")],
    ));
    let (mut session, _rx) = session_for(&remote);
    session.load().await.expect("load");

    let result = session.submit(&[0]).await;

    assert!(matches!(result, Err(StudioError::Validation { .. })));
    assert!(remote.submitted.lock().unwrap().is_empty());
    assert_eq!(session.state(), LessonAccess::QuizLocked);
}

#[tokio::test]
async fn test_submission_carries_question_ids_and_picks() {
    let remote = FakeLearn::new(lesson_with_questions(
        "الدرس الأول",
        vec![wire_question(11, "س١"), wire_question(12, "س٢")],
    ));
    remote.queue_verdict(Ok(AttemptVerdict {
        passed: true,
        score: 100.0,
    }));
    let (mut session, _rx) = session_for(&remote);
    session.load().await.expect("load");

    session.submit(&[2, 0]).await.expect("submit");

    let submitted = remote.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let ids: Vec<i64> = submitted[0].iter().map(|a| a.question_id).collect();
    assert_eq!(ids, [11, 12]);
    assert_eq!(submitted[0][0].selected_indices, [2]);
    assert_eq!(submitted[0][1].selected_indices, [0]);
}
