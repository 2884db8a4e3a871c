use std::sync::{Arc, RwLock};

use crate::roles::Role;

/// Source of the current operator's role.
pub trait RoleProvider: Send + Sync {
    fn current_role(&self) -> Role;
}

impl<P> RoleProvider for Arc<P>
where
    P: RoleProvider + ?Sized,
{
    fn current_role(&self) -> Role {
        (**self).current_role()
    }
}

/// Role provider holding a single, replaceable role (CLI and tests).
#[derive(Debug)]
pub struct StaticRoleProvider {
    role: RwLock<Role>,
}

impl StaticRoleProvider {
    pub fn new(role: Role) -> Self {
        Self {
            role: RwLock::new(role),
        }
    }

    /// Swap the role, e.g. after a sign-in change.
    pub fn set_role(&self, role: Role) {
        if let Ok(mut current) = self.role.write() {
            tracing::debug!(role = %role, "role changed");
            *current = role;
        }
    }
}

impl RoleProvider for StaticRoleProvider {
    fn current_role(&self) -> Role {
        match self.role.read() {
            Ok(role) => role.clone(),
            Err(_) => Role::CASHIER,
        }
    }
}
