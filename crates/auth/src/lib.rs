//! `stockline-auth`: actor resolution and role checks for stock workflows.
//!
//! Nothing here knows about HTTP or session issuance: the
//! caller arrives already authenticated, and the workflows only need a typed
//! `Actor` resolved once per request through the Actor Directory.

pub mod authorize;
pub mod directory;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, require_identity, require_role};
pub use directory::{ActorDirectory, DirectoryError, InMemoryActorDirectory};
pub use principal::Actor;
pub use roles::Role;
