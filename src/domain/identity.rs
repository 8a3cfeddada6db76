//! Entity Identity
//!
//! Every entity carries either an ephemeral identity (a local token assigned
//! when the author creates it, never sent to the remote store as a foreign
//! key) or a persisted identity (a positive integer assigned by the store).
//! The distinction decides which operations may legally reach the network.

use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Local placeholder for an entity the store has not confirmed
    Ephemeral(Uuid),
    /// Store-assigned id
    Persisted(i64),
}

impl EntityId {
    /// Fresh local token for an entity created in the editor
    pub fn fresh() -> Self {
        EntityId::Ephemeral(Uuid::new_v4())
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self, EntityId::Persisted(_))
    }

    /// The store id, when the entity is confirmed
    pub fn store_id(&self) -> Option<i64> {
        match self {
            EntityId::Persisted(id) => Some(*id),
            EntityId::Ephemeral(_) => None,
        }
    }

    /// Children may be created remotely only under a persisted parent
    pub fn can_create_child(&self) -> bool {
        self.is_persisted()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Ephemeral(token) => write!(f, "local-{token}"),
            EntityId::Persisted(id) => write!(f, "{id}"),
        }
    }
}
