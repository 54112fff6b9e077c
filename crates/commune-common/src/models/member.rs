//! Member model — a user's membership in a space.
//!
//! The power level is the authoritative trust value and lives in the
//! external power-levels state object; everything else here is derived.
//! The tier is computed, never stored, and custom roles are held by
//! power-level equality rather than an assignment list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hierarchy::{RoleHierarchy, RoleTier};
use crate::models::role::Role;

/// A member of a space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub user_id: Uuid,

    /// Authoritative trust scalar, mirrored from the power-levels state
    /// object. Mutated only through the role assignment resolver.
    pub power_level: i64,

    /// When the user joined this space
    pub joined_at: DateTime<Utc>,
}

impl Member {
    pub fn new(user_id: Uuid, power_level: i64) -> Self {
        Self {
            user_id,
            power_level,
            joined_at: Utc::now(),
        }
    }

    /// The tier this member displays as. Derived, never stored.
    pub fn role(&self, hierarchy: &RoleHierarchy) -> RoleTier {
        hierarchy.role_for_power_level(self.power_level)
    }

    /// The custom roles this member holds: every role bound to exactly the
    /// member's power level.
    pub fn held_roles<'a>(&self, roles: &'a [Role]) -> Vec<&'a Role> {
        roles
            .iter()
            .filter(|r| r.power_level == self.power_level)
            .collect()
    }

    /// The role that determines this member's display color/badge: the
    /// highest power level among held roles, position breaking ties.
    pub fn display_role<'a>(&self, roles: &'a [Role]) -> Option<&'a Role> {
        self.held_roles(roles)
            .into_iter()
            .max_by_key(|r| (r.power_level, r.position))
    }
}
