//! Role lookup for the reporting screens.
//!
//! Authentication itself happens elsewhere; this crate only answers "who is
//! looking at the reports" and what that role may see.

pub mod provider;
pub mod roles;

pub use provider::{RoleProvider, StaticRoleProvider};
pub use roles::Role;
