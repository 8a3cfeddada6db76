//! Course Store
//!
//! Single shared course snapshot with copy-on-write updates. Mutations go
//! through `update`, which replaces the whole structure; readers hold cheap
//! `Arc` snapshots and subscribers see every replacement in order. No
//! in-place mutation ever escapes this module.

pub mod tree;

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::Course;

#[derive(Clone)]
pub struct CourseStore {
    tx: Arc<watch::Sender<Arc<Course>>>,
}

impl CourseStore {
    pub fn new(course: Course) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(course));
        Self { tx: Arc::new(tx) }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Course> {
        Arc::clone(&self.tx.borrow())
    }

    /// Watch replacements; receivers always observe the latest value
    pub fn subscribe(&self) -> watch::Receiver<Arc<Course>> {
        self.tx.subscribe()
    }

    /// Copy-on-write update: clone the tree, mutate the clone, publish it
    pub fn update<R>(&self, mutate: impl FnOnce(&mut Course) -> R) -> R {
        let mut next = Course::clone(&self.tx.borrow());
        let out = mutate(&mut next);
        self.tx.send_replace(Arc::new(next));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityId;

    fn store() -> CourseStore {
        CourseStore::new(Course::new(EntityId::Persisted(1), "Rust from zero"))
    }

    #[test]
    fn test_update_replaces_snapshot() {
        let store = store();
        let before = store.snapshot();

        store.update(|course| course.title = "Rust from zero to hero".to_string());

        assert_eq!(before.title, "Rust from zero");
        assert_eq!(store.snapshot().title, "Rust from zero to hero");
    }

    #[tokio::test]
    async fn test_subscribers_see_replacements() {
        let store = store();
        let mut rx = store.subscribe();

        store.update(|course| course.description = "intro".to_string());

        rx.changed().await.expect("store dropped");
        assert_eq!(rx.borrow().description, "intro");
    }

    #[test]
    fn test_update_without_subscribers_is_ok() {
        let store = store();
        store.update(|course| course.is_free = false);
        assert!(!store.snapshot().is_free);
    }
}
