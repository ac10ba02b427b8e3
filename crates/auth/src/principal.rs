use serde::{Deserialize, Serialize};

use stockline_core::{TenantId, UserId};

use crate::Role;

/// A resolved, authenticated caller.
///
/// Built once per request by the [`ActorDirectory`](crate::ActorDirectory);
/// workflows never look roles up ad hoc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, tenant_id: TenantId, role: Role) -> Self {
        Self { id, tenant_id, role }
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}
