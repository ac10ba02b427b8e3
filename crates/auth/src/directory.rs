//! Actor Directory: resolves an authenticated user id to a typed [`Actor`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use stockline_core::{DomainError, TenantId, UserId};

use crate::{Actor, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("user {0} not found in directory")]
    UnknownUser(UserId),

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

impl From<DirectoryError> for DomainError {
    fn from(value: DirectoryError) -> Self {
        match value {
            // An unresolvable caller is an authorization failure, not a missing resource.
            DirectoryError::UnknownUser(_) => DomainError::Forbidden(value.to_string()),
            DirectoryError::Unavailable(msg) => DomainError::Persistence(msg),
        }
    }
}

/// Role/identity lookup owned by the identity service (out of scope here).
pub trait ActorDirectory: Send + Sync {
    fn resolve(&self, user_id: UserId) -> Result<Actor, DirectoryError>;
}

impl<D> ActorDirectory for Arc<D>
where
    D: ActorDirectory + ?Sized,
{
    fn resolve(&self, user_id: UserId) -> Result<Actor, DirectoryError> {
        (**self).resolve(user_id)
    }
}

/// In-memory directory for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryActorDirectory {
    actors: RwLock<HashMap<UserId, Actor>>,
}

impl InMemoryActorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a user and return the resolved actor.
    pub fn register(&self, tenant_id: TenantId, role: Role) -> Actor {
        let actor = Actor::new(UserId::new(), tenant_id, role);
        self.insert(actor.clone());
        actor
    }

    pub fn insert(&self, actor: Actor) {
        if let Ok(mut map) = self.actors.write() {
            map.insert(actor.id, actor);
        }
    }
}

impl ActorDirectory for InMemoryActorDirectory {
    fn resolve(&self, user_id: UserId) -> Result<Actor, DirectoryError> {
        let map = self
            .actors
            .read()
            .map_err(|_| DirectoryError::Unavailable("lock poisoned".to_string()))?;
        map.get(&user_id)
            .cloned()
            .ok_or(DirectoryError::UnknownUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_users_resolve() {
        let dir = InMemoryActorDirectory::new();
        let actor = dir.register(TenantId::new(), Role::Gudang);
        assert_eq!(dir.resolve(actor.id).unwrap(), actor);
    }

    #[test]
    fn unknown_user_maps_to_forbidden() {
        let dir = InMemoryActorDirectory::new();
        let err: DomainError = dir.resolve(UserId::new()).unwrap_err().into();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
