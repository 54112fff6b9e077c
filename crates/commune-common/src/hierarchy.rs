//! Role hierarchy — the mapping between power levels and named role tiers.
//!
//! The underlying protocol only knows a 0–100 power level per member. Tier
//! names are a presentation of that scalar: every level resolves to exactly
//! one tier, and a tier's canonical level is its threshold. The mapping is
//! lossy on purpose (level 87 displays as admin, and assigning "admin" by
//! name lands on 75).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::RoleThresholds;

/// Named role tiers, highest trust first.
///
/// `Restricted` is never derived from a power level; it exists only as an
/// explicit grant (a deliberately limited member).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoleTier {
    Owner,
    Admin,
    Moderator,
    Member,
    Restricted,
}

impl fmt::Display for RoleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RoleTier::Owner => "owner",
            RoleTier::Admin => "admin",
            RoleTier::Moderator => "moderator",
            RoleTier::Member => "member",
            RoleTier::Restricted => "restricted",
        };
        f.write_str(name)
    }
}

/// Pure resolver between power levels and role tiers.
#[derive(Debug, Clone, Copy)]
pub struct RoleHierarchy {
    thresholds: RoleThresholds,
}

impl RoleHierarchy {
    pub fn new(thresholds: RoleThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RoleThresholds {
        &self.thresholds
    }

    /// The tier a power level displays as: the highest tier whose threshold
    /// is at or below `level`. Total — in-between levels (say 37) resolve to
    /// the next lower tier, and anything below the member floor is still a
    /// member. Never returns [`RoleTier::Restricted`].
    pub fn role_for_power_level(&self, level: i64) -> RoleTier {
        let t = &self.thresholds;
        if level >= t.owner {
            RoleTier::Owner
        } else if level >= t.admin {
            RoleTier::Admin
        } else if level >= t.moderator {
            RoleTier::Moderator
        } else {
            RoleTier::Member
        }
    }

    /// The canonical power level for a tier, used when assigning a role by
    /// name rather than granting an arbitrary level.
    pub fn power_level_for_role(&self, tier: RoleTier) -> i64 {
        let t = &self.thresholds;
        match tier {
            RoleTier::Owner => t.owner,
            RoleTier::Admin => t.admin,
            RoleTier::Moderator => t.moderator,
            RoleTier::Member => t.member,
            RoleTier::Restricted => t.restricted,
        }
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        Self::new(RoleThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_level_resolves_to_exactly_one_tier() {
        let hierarchy = RoleHierarchy::default();
        for level in 0..=100 {
            // Total: no panic, and the inverse never exceeds the input's tier.
            let tier = hierarchy.role_for_power_level(level);
            assert_ne!(tier, RoleTier::Restricted);
            assert!(hierarchy.power_level_for_role(tier) <= level);
        }
    }

    #[test]
    fn thresholds_map_to_their_tier() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(hierarchy.role_for_power_level(100), RoleTier::Owner);
        assert_eq!(hierarchy.role_for_power_level(75), RoleTier::Admin);
        assert_eq!(hierarchy.role_for_power_level(50), RoleTier::Moderator);
        assert_eq!(hierarchy.role_for_power_level(0), RoleTier::Member);
    }

    #[test]
    fn in_between_levels_resolve_downward() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(hierarchy.role_for_power_level(37), RoleTier::Member);
        assert_eq!(hierarchy.role_for_power_level(62), RoleTier::Moderator);
        assert_eq!(hierarchy.role_for_power_level(99), RoleTier::Admin);
    }

    #[test]
    fn restricted_has_an_explicit_canonical_level() {
        let hierarchy = RoleHierarchy::default();
        assert_eq!(hierarchy.power_level_for_role(RoleTier::Restricted), 0);
    }

    #[test]
    fn tuned_thresholds_are_respected() {
        let hierarchy = RoleHierarchy::new(RoleThresholds {
            moderator: 40,
            ..RoleThresholds::default()
        });
        assert_eq!(hierarchy.role_for_power_level(45), RoleTier::Moderator);
    }
}
