//! Role assignment resolver — authority-checked power-level changes.
//!
//! One request = one actor acting on one target. Ordinary changes are a
//! single write of the target's power level; ownership transfer is the lone
//! two-write sequence in the core and is not transactional: there is no
//! distributed lock and no compensating rollback. A failure between the two
//! writes leaves the room with two owners, which is surfaced as an
//! observable [`AssignmentOutcome::OwnershipPending`] rather than hidden —
//! re-running the resolver (or a manual correction) reconciles it.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use commune_common::error::{CommuneError, CommuneResult};
use commune_common::hierarchy::{RoleHierarchy, RoleTier};

use crate::ports::MembershipStore;

/// Phase record for a two-write ownership transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OwnershipTransfer {
    /// The target was promoted to the owner threshold.
    pub new_owner_set: bool,
    /// The former owner was demoted to the admin threshold.
    pub old_owner_demoted: bool,
}

/// Successful (or warn-level) result of a role assignment.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AssignmentOutcome {
    /// Ordinary single-write change. Carries the written level so the caller
    /// can update its in-memory member record optimistically.
    Updated { user_id: Uuid, power_level: i64 },

    /// Both writes of an ownership transfer landed.
    OwnershipTransferred {
        new_owner: Uuid,
        previous_owner: Uuid,
    },

    /// The new owner was set but the demotion write failed: the room has two
    /// owners until reconciled. Non-fatal, distinct from both success and
    /// hard failure.
    OwnershipPending {
        transfer: OwnershipTransfer,
        detail: String,
    },
}

/// Orchestrates role changes for a member against the membership store.
pub struct RoleAssignmentResolver {
    hierarchy: RoleHierarchy,
    store: Arc<dyn MembershipStore>,
}

impl RoleAssignmentResolver {
    pub fn new(hierarchy: RoleHierarchy, store: Arc<dyn MembershipStore>) -> Self {
        Self { hierarchy, store }
    }

    /// Apply a role change requested by `actor_id` against `target_id`.
    ///
    /// Rejections: self-assignment; assigning at or above the actor's own
    /// level; managing a target at or above the actor's own level. The only
    /// exception is ownership transfer, which a current owner may perform.
    pub async fn resolve_role_assignment(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
        new_role: RoleTier,
    ) -> CommuneResult<AssignmentOutcome> {
        if actor_id == target_id {
            return Err(CommuneError::SelfAssignment);
        }

        let actor_level = self.store.power_level(room_id, actor_id).await?;

        if new_role == RoleTier::Owner {
            return self
                .transfer_ownership(room_id, actor_id, target_id, actor_level)
                .await;
        }

        let target_level = self.store.power_level(room_id, target_id).await?;
        let new_level = self.hierarchy.power_level_for_role(new_role);

        // The actor must outrank both the requested role and the target.
        if new_level >= actor_level || target_level >= actor_level {
            tracing::warn!(
                %actor_id, %target_id, %new_role, actor_level, target_level, new_level,
                "role assignment rejected: insufficient authority"
            );
            return Err(CommuneError::InsufficientAuthority {
                actor_level,
                required_level: new_level.max(target_level) + 1,
            });
        }

        self.store
            .set_power_level(room_id, target_id, new_level)
            .await?;

        tracing::info!(%actor_id, %target_id, %new_role, new_level, "role assigned");
        Ok(AssignmentOutcome::Updated {
            user_id: target_id,
            power_level: new_level,
        })
    }

    /// Two-party power-level swap: target up to owner, actor down to admin.
    /// Both writes are always issued in that order; re-running after a
    /// half-completed transfer issues the missing demotion again.
    async fn transfer_ownership(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
        actor_level: i64,
    ) -> CommuneResult<AssignmentOutcome> {
        let owner_level = self.hierarchy.power_level_for_role(RoleTier::Owner);
        if actor_level < owner_level {
            return Err(CommuneError::InsufficientAuthority {
                actor_level,
                required_level: owner_level,
            });
        }

        // First write: promote the new owner. A failure here is a plain
        // transport error; nothing changed remotely.
        self.store
            .set_power_level(room_id, target_id, owner_level)
            .await?;

        // Second write: demote the former owner. From here the remote state
        // already has two owners, so a failure is reported as a pending
        // transfer, not a hard error.
        let admin_level = self.hierarchy.power_level_for_role(RoleTier::Admin);
        if let Err(e) = self
            .store
            .set_power_level(room_id, actor_id, admin_level)
            .await
        {
            tracing::error!(
                %actor_id, %target_id, error = %e,
                "ownership transfer half-completed: two owners until reconciled"
            );
            return Ok(AssignmentOutcome::OwnershipPending {
                transfer: OwnershipTransfer {
                    new_owner_set: true,
                    old_owner_demoted: false,
                },
                detail: format!("new owner set, demotion of previous owner failed: {e}"),
            });
        }

        tracing::info!(%actor_id, %target_id, "ownership transferred");
        Ok(AssignmentOutcome::OwnershipTransferred {
            new_owner: target_id,
            previous_owner: actor_id,
        })
    }
}
