//! Authority-layer configuration.
//!
//! Power-level thresholds are deployment-tunable, not business constants:
//! a space can run a flatter or steeper hierarchy without code changes.
//! Precedence: env vars > .env file > commune.toml > defaults.
//!
//! Unlike most app config this is returned as an owned value and injected
//! into the components that need it, so the validator, hierarchy, and
//! template engine stay testable in isolation.

use serde::Deserialize;

/// Power-level thresholds for the named role tiers.
///
/// Invariant (checked by [`RoleThresholds::validate`]): strictly ordered
/// `owner > admin > moderator > elevated >= member >= restricted`, all in
/// [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoleThresholds {
    /// Owner tier. Also the level the `administrator` permission demands.
    pub owner: i64,
    /// Admin tier. A demoted former owner lands here.
    pub admin: i64,
    /// Moderator tier.
    pub moderator: i64,
    /// Elevated member: trusted but not a moderator.
    pub elevated: i64,
    /// Base member floor.
    pub member: i64,
    /// Floor for explicitly restricted members. Never derived from a power
    /// level; assigned only as an explicit grant.
    pub restricted: i64,
}

impl Default for RoleThresholds {
    fn default() -> Self {
        Self {
            owner: 100,
            admin: 75,
            moderator: 50,
            elevated: 25,
            member: 0,
            restricted: 0,
        }
    }
}

impl RoleThresholds {
    /// Check the ordering invariant. Call after loading tuned values.
    pub fn validate(&self) -> Result<(), String> {
        let ordered = self.owner > self.admin
            && self.admin > self.moderator
            && self.moderator > self.elevated
            && self.elevated >= self.member
            && self.member >= self.restricted;
        if !ordered {
            return Err(format!(
                "role thresholds must be ordered owner > admin > moderator > elevated >= member >= restricted, got {self:?}"
            ));
        }
        if self.restricted < 0 || self.owner > 100 {
            return Err(format!("role thresholds must lie in [0, 100], got {self:?}"));
        }
        Ok(())
    }
}

/// Operational limits for the moderation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModerationLimits {
    /// Maximum number of targets accepted in a single bulk action.
    pub max_bulk_targets: usize,
}

impl Default for ModerationLimits {
    fn default() -> Self {
        Self {
            max_bulk_targets: 100,
        }
    }
}

/// Top-level configuration for the authority core.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthorityConfig {
    pub thresholds: RoleThresholds,
    pub limits: ModerationLimits,
}

impl AuthorityConfig {
    /// Load configuration from defaults, an optional `commune.toml`, and
    /// `COMMUNE_*` environment variables (`COMMUNE_THRESHOLDS__OWNER=100`).
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        let cfg = config::Config::builder()
            .set_default("thresholds.owner", 100)?
            .set_default("thresholds.admin", 75)?
            .set_default("thresholds.moderator", 50)?
            .set_default("thresholds.elevated", 25)?
            .set_default("thresholds.member", 0)?
            .set_default("thresholds.restricted", 0)?
            .set_default("limits.max_bulk_targets", 100)?
            .add_source(config::File::with_name("commune").required(false))
            .add_source(
                config::Environment::with_prefix("COMMUNE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: AuthorityConfig = cfg.try_deserialize()?;
        loaded
            .thresholds
            .validate()
            .map_err(config::ConfigError::Message)?;
        tracing::debug!(thresholds = ?loaded.thresholds, "authority config loaded");
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_the_documented_tiers() {
        let t = RoleThresholds::default();
        assert_eq!((t.owner, t.admin, t.moderator, t.elevated), (100, 75, 50, 25));
        assert_eq!((t.member, t.restricted), (0, 0));
        assert!(t.validate().is_ok());
    }

    #[test]
    fn unordered_thresholds_are_rejected() {
        let t = RoleThresholds {
            moderator: 80,
            ..RoleThresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn load_layers_env_over_defaults_and_rejects_unordered() {
        // Env mutation is process-global, so one test owns these keys end
        // to end: override, load, break the ordering, then clean up.
        unsafe { std::env::set_var("COMMUNE_THRESHOLDS__MODERATOR", "60") };

        let cfg = AuthorityConfig::load().expect("env override should load");
        assert_eq!(cfg.thresholds.moderator, 60);
        assert_eq!(cfg.thresholds.owner, 100, "unset keys keep their defaults");
        assert_eq!(cfg.limits.max_bulk_targets, 100);

        // admin (default 75) now sits below moderator: ordering violated.
        unsafe { std::env::set_var("COMMUNE_THRESHOLDS__ADMIN", "10") };
        assert!(AuthorityConfig::load().is_err());

        unsafe {
            std::env::remove_var("COMMUNE_THRESHOLDS__MODERATOR");
            std::env::remove_var("COMMUNE_THRESHOLDS__ADMIN");
        }
    }

    #[test]
    fn thresholds_deserialize_with_partial_overrides() {
        let t: RoleThresholds = toml::from_str("moderator = 60").unwrap();
        assert_eq!(t.moderator, 60);
        assert_eq!(t.owner, 100);
    }
}
