//! Course Studio Core
//!
//! Headless core of a course authoring and learning client. Layered
//! architecture:
//! - domain: content-tree entities and identity rules
//! - api: remote store contracts, wire shapes, HTTP implementation
//! - store: shared course snapshot with copy-on-write updates
//! - authoring: optimistic editing of the course tree
//! - learner: progressive-unlock lesson sessions

pub mod api;
pub mod authoring;
pub mod config;
pub mod domain;
pub mod error;
pub mod learner;
pub mod notice;
pub mod store;

pub use authoring::CourseEditor;
pub use config::StudioConfig;
pub use domain::{Chapter, Course, CourseStatus, EntityId, Lesson, Question, Quiz};
pub use error::{ApiError, StudioError};
pub use learner::{AttemptOutcome, LessonAccess, LessonSession};
pub use notice::{Notice, NoticeLevel, NoticeSink};
pub use store::CourseStore;
