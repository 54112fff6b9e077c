//! Permission validator — reconciles the named vector with the trust scalar.
//!
//! Pure classification over a [`PermissionCatalog`]: what power level a
//! vector demands, which dependencies it violates, and how to auto-enable
//! prerequisites. Never mutates remote state and never throws for
//! well-formed input; all findings come back in the report.

use commune_common::catalog::PermissionCatalog;
use commune_common::permissions::{Permission, PermissionVector};

/// Outcome of validating a vector against a candidate power level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub valid: bool,
    /// One entry per violated dependency and per over-privileged permission.
    /// Never truncated.
    pub errors: Vec<String>,
}

/// Validates permission vectors against the catalog.
#[derive(Debug, Clone)]
pub struct PermissionValidator {
    catalog: PermissionCatalog,
}

impl PermissionValidator {
    pub fn new(catalog: PermissionCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    /// The minimum power level `vector` requires: the maximum catalog
    /// requirement over its enabled permissions. The administrator flag
    /// forces the owner threshold; an empty vector requires only the member
    /// floor. Monotonic under adding permissions.
    pub fn calculate_required_power_level(&self, vector: &PermissionVector) -> i64 {
        if vector.is_admin() {
            return self.catalog.owner_threshold();
        }
        vector
            .enabled_permissions()
            .map(|p| self.catalog.min_power_level(p))
            .fold(self.catalog.member_threshold(), i64::max)
    }

    /// Validate `vector` against a candidate power level: the candidate must
    /// cover the required level, and every enabled permission's dependencies
    /// must also be enabled.
    pub fn validate_permissions(
        &self,
        vector: &PermissionVector,
        candidate_level: i64,
    ) -> ValidationReport {
        let mut errors = Vec::new();

        for permission in vector.enabled_permissions() {
            let min = self.catalog.min_power_level(permission);
            if min > candidate_level {
                errors.push(format!(
                    "{permission} requires power level {min}, candidate level is {candidate_level}"
                ));
            }
            for &dep in self.catalog.depends_on(permission) {
                if !vector.enabled(dep) {
                    errors.push(format!("{permission} requires {dep} to be enabled"));
                }
            }
        }

        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Enable `permission` plus its transitive dependency closure.
    ///
    /// Only ever adds flags. Disabling a prerequisite never cascades to its
    /// dependents; that conflict is surfaced by [`Self::validate_permissions`]
    /// instead of being silently repaired.
    pub fn resolve_dependencies(
        &self,
        vector: &PermissionVector,
        enabling: Permission,
    ) -> PermissionVector {
        let mut resolved = *vector;
        let mut stack = vec![enabling];
        while let Some(permission) = stack.pop() {
            if resolved.enabled(permission) {
                continue;
            }
            resolved = resolved.with(permission);
            stack.extend_from_slice(self.catalog.depends_on(permission));
        }
        resolved
    }
}

impl Default for PermissionValidator {
    fn default() -> Self {
        Self::new(PermissionCatalog::default())
    }
}
