//! Permission templates — curated bundles for bootstrapping roles.
//!
//! A template defines a subset of the permission keys (grants plus explicit
//! revokes) and a recommended power level. Applying one replaces exactly the
//! keys it defines and leaves the rest of the vector untouched. The engine
//! only composes permission data; it never checks actor authority — callers
//! must re-validate the merged vector before persisting, because a
//! template's recommended level may exceed the actor's own ceiling.

use std::collections::BTreeMap;

use serde::Serialize;

use commune_common::catalog::PermissionCatalog;
use commune_common::config::RoleThresholds;
use commune_common::error::{CommuneError, CommuneResult};
use commune_common::permissions::PermissionVector;

use crate::validator::{PermissionValidator, ValidationReport};

/// A named, curated permission bundle.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Keys the template sets to true.
    pub grants: PermissionVector,
    /// Keys the template sets to false. Disjoint from `grants`.
    pub revokes: PermissionVector,
    /// Suggested power level for a role built from this template.
    pub recommended_power_level: i64,
}

impl PermissionTemplate {
    /// Merge into `current`: defined keys are replaced, everything else is
    /// left as-is. Idempotent.
    pub fn apply(&self, current: PermissionVector) -> PermissionVector {
        (current - self.revokes) | self.grants
    }
}

/// Result of applying a template to an existing vector.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateApplication {
    pub permissions: PermissionVector,
    pub recommended_power_level: i64,
    /// Post-merge consistency of the result at the recommended level.
    /// Informational: authority against the actor's own ceiling is still the
    /// caller's check.
    #[serde(skip)]
    pub consistency: ValidationReport,
}

/// Registry of permission templates.
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    templates: BTreeMap<String, PermissionTemplate>,
    validator: PermissionValidator,
}

impl TemplateEngine {
    /// The built-in template set, with recommended levels taken from the
    /// deployment's thresholds.
    pub fn builtin(thresholds: &RoleThresholds) -> Self {
        use PermissionVector as V;

        let readable = V::VIEW_CHANNELS | V::READ_MESSAGE_HISTORY | V::ADD_REACTIONS;
        let moderation = V::KICK_MEMBERS
            | V::BAN_MEMBERS
            | V::MODERATE_MEMBERS
            | V::MANAGE_MESSAGES
            | V::MANAGE_NICKNAMES
            | V::PIN_MESSAGES
            | V::MANAGE_THREADS
            | V::MUTE_MEMBERS
            | V::DEAFEN_MEMBERS
            | V::MOVE_MEMBERS
            | V::VIEW_AUDIT_LOG;

        let templates = [
            PermissionTemplate {
                id: "standard-member".into(),
                name: "Standard Member".into(),
                description: "Everyday chat and voice participation".into(),
                grants: V::default_member(),
                revokes: V::empty(),
                recommended_power_level: thresholds.member,
            },
            PermissionTemplate {
                id: "read-only".into(),
                name: "Read-only".into(),
                description: "Can follow the conversation but not post or speak".into(),
                grants: readable,
                revokes: V::SEND_MESSAGES
                    | V::SEND_MESSAGES_IN_THREADS
                    | V::CREATE_THREADS
                    | V::EMBED_LINKS
                    | V::ATTACH_FILES
                    | V::MENTION_EVERYONE
                    | V::CONNECT
                    | V::SPEAK
                    | V::VIDEO
                    | V::USE_VOICE_ACTIVITY,
                recommended_power_level: thresholds.restricted,
            },
            PermissionTemplate {
                id: "event-host".into(),
                name: "Event Host".into(),
                description: "Runs community events and can reach everyone".into(),
                grants: V::default_member() | V::MANAGE_EVENTS | V::MENTION_EVERYONE,
                revokes: V::empty(),
                recommended_power_level: thresholds.elevated,
            },
            PermissionTemplate {
                id: "moderator".into(),
                name: "Moderator".into(),
                description: "Day-to-day moderation of members and messages".into(),
                grants: V::default_member() | moderation,
                revokes: V::empty(),
                recommended_power_level: thresholds.moderator,
            },
            PermissionTemplate {
                id: "administrator".into(),
                name: "Administrator".into(),
                description: "Full space management short of ownership".into(),
                grants: V::default_member()
                    | moderation
                    | V::MANAGE_CHANNELS
                    | V::MANAGE_WEBHOOKS
                    | V::MANAGE_EMOJIS
                    | V::MANAGE_EVENTS
                    | V::MENTION_EVERYONE
                    | V::MANAGE_ROLES
                    | V::MANAGE_SERVER,
                revokes: V::empty(),
                recommended_power_level: thresholds.admin,
            },
        ];

        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            validator: PermissionValidator::new(PermissionCatalog::new(thresholds)),
        }
    }

    /// Look up a template. Unknown ids are an error, not a silent no-op.
    pub fn get_template(&self, id: &str) -> CommuneResult<&PermissionTemplate> {
        self.templates.get(id).ok_or_else(|| CommuneError::NotFound {
            resource: format!("permission template '{id}'"),
        })
    }

    /// All templates, in stable (id) order.
    pub fn list_templates(&self) -> impl Iterator<Item = &PermissionTemplate> {
        self.templates.values()
    }

    /// Apply a template to an existing vector.
    pub fn apply_template(
        &self,
        current: PermissionVector,
        id: &str,
    ) -> CommuneResult<TemplateApplication> {
        let template = self.get_template(id)?;
        let permissions = template.apply(current);
        let consistency = self
            .validator
            .validate_permissions(&permissions, template.recommended_power_level);
        Ok(TemplateApplication {
            permissions,
            recommended_power_level: template.recommended_power_level,
            consistency,
        })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::builtin(&RoleThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commune_common::permissions::Permission;

    #[test]
    fn unknown_template_is_an_error() {
        let engine = TemplateEngine::default();
        let err = engine
            .apply_template(PermissionVector::empty(), "warlord")
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn applying_is_idempotent() {
        let engine = TemplateEngine::default();
        let current = PermissionVector::default_member() | PermissionVector::MANAGE_WEBHOOKS;

        let once = engine.apply_template(current, "moderator").unwrap();
        let twice = engine.apply_template(once.permissions, "moderator").unwrap();
        assert_eq!(once.permissions, twice.permissions);
    }

    #[test]
    fn undefined_keys_are_left_untouched() {
        let engine = TemplateEngine::default();
        // read-only does not mention manageWebhooks; it must survive.
        let current = PermissionVector::MANAGE_WEBHOOKS | PermissionVector::SEND_MESSAGES;
        let applied = engine.apply_template(current, "read-only").unwrap();

        assert!(applied.permissions.enabled(Permission::ManageWebhooks));
        assert!(!applied.permissions.enabled(Permission::SendMessages));
        assert!(applied.permissions.enabled(Permission::ViewChannels));
        assert_eq!(applied.recommended_power_level, 0);
    }

    #[test]
    fn builtin_templates_are_consistent_at_their_recommended_level() {
        let engine = TemplateEngine::default();

        let ids: Vec<String> = engine.list_templates().map(|t| t.id.clone()).collect();
        for id in ids {
            let applied = engine.apply_template(PermissionVector::empty(), &id).unwrap();
            assert!(
                applied.consistency.valid,
                "template '{}' invalid at level {}: {:?}",
                id, applied.recommended_power_level, applied.consistency.errors
            );
        }
    }

    #[test]
    fn recommended_levels_follow_the_thresholds() {
        let thresholds = RoleThresholds {
            moderator: 60,
            ..RoleThresholds::default()
        };
        let engine = TemplateEngine::builtin(&thresholds);
        assert_eq!(
            engine.get_template("moderator").unwrap().recommended_power_level,
            60
        );
    }
}
