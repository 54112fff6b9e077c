//! Permission catalog — per-permission metadata.
//!
//! For every named permission: its category, a human description, the
//! minimum power level it demands, and the permissions it depends on.
//! Built once from the deployment's [`RoleThresholds`] and injected into the
//! validator and template engine; there is no module-level registry.

use crate::config::RoleThresholds;
use crate::permissions::{Permission, PermissionCategory};

/// Catalog metadata for a single permission.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub permission: Permission,
    pub category: PermissionCategory,
    pub description: &'static str,
    /// Minimum power level a holder of this permission must have.
    pub min_power_level: i64,
    /// Direct prerequisites. Transitive closure is the validator's job.
    pub depends_on: &'static [Permission],
}

/// Immutable per-permission metadata table, total over [`Permission::ALL`].
#[derive(Debug, Clone)]
pub struct PermissionCatalog {
    entries: Vec<CatalogEntry>,
    owner_threshold: i64,
    member_threshold: i64,
}

impl PermissionCatalog {
    /// Build the catalog for a deployment's thresholds.
    pub fn new(thresholds: &RoleThresholds) -> Self {
        use Permission::*;
        use PermissionCategory as Cat;

        let base = thresholds.member;
        let elevated = thresholds.elevated;
        let moderator = thresholds.moderator;
        let admin = thresholds.admin;
        let owner = thresholds.owner;

        let table: [(Permission, Cat, &'static str, i64, &'static [Permission]); 34] = [
            // General
            (ViewChannels, Cat::General, "View channels and read messages", base, &[]),
            (SendMessages, Cat::General, "Send messages in text channels", base, &[ViewChannels]),
            (EmbedLinks, Cat::General, "Auto-embed posted links", base, &[SendMessages]),
            (AttachFiles, Cat::General, "Attach files to messages", base, &[SendMessages]),
            (AddReactions, Cat::General, "React to messages", base, &[ViewChannels]),
            (UseExternalEmojis, Cat::General, "Use emojis from other spaces", base, &[SendMessages]),
            (ReadMessageHistory, Cat::General, "Read messages sent before joining", base, &[ViewChannels]),
            (ChangeNickname, Cat::General, "Change own nickname", base, &[]),
            (CreateInvites, Cat::General, "Create invite links", base, &[ViewChannels]),
            // Member management
            (KickMembers, Cat::MemberManagement, "Remove members from the space", moderator, &[]),
            (BanMembers, Cat::MemberManagement, "Ban and unban members", moderator, &[]),
            (ModerateMembers, Cat::MemberManagement, "Time out members", elevated, &[]),
            (ManageNicknames, Cat::MemberManagement, "Change other members' nicknames", elevated, &[]),
            (MentionEveryone, Cat::MemberManagement, "Mention @everyone and @here", elevated, &[SendMessages]),
            // Channel
            (ManageChannels, Cat::Channel, "Create, edit, and delete channels", moderator, &[ViewChannels]),
            (ManageMessages, Cat::Channel, "Delete and moderate others' messages", elevated, &[ViewChannels]),
            (PinMessages, Cat::Channel, "Pin messages in channels", elevated, &[ViewChannels]),
            (ManageThreads, Cat::Channel, "Archive, delete, and edit threads", elevated, &[ViewChannels]),
            (CreateThreads, Cat::Channel, "Create threads", base, &[SendMessages]),
            (SendMessagesInThreads, Cat::Channel, "Send messages in threads", base, &[SendMessages]),
            // Voice
            (Connect, Cat::Voice, "Connect to voice channels", base, &[ViewChannels]),
            (Speak, Cat::Voice, "Speak in voice channels", base, &[Connect]),
            (Video, Cat::Voice, "Use video in voice channels", base, &[Connect]),
            (UseVoiceActivity, Cat::Voice, "Use voice activity detection", base, &[Speak]),
            (MuteMembers, Cat::Voice, "Mute other members", elevated, &[Connect]),
            (DeafenMembers, Cat::Voice, "Deafen other members", elevated, &[Connect]),
            (MoveMembers, Cat::Voice, "Move members between voice channels", elevated, &[Connect]),
            // Advanced
            (ManageWebhooks, Cat::Advanced, "Create and manage webhooks", moderator, &[]),
            (ManageEmojis, Cat::Advanced, "Manage custom emojis and stickers", moderator, &[]),
            (ViewAuditLog, Cat::Advanced, "View the moderation audit log", moderator, &[]),
            (ManageEvents, Cat::Advanced, "Create and manage scheduled events", elevated, &[]),
            // Administrative
            (ManageRoles, Cat::Administrative, "Create and edit roles below own", moderator, &[]),
            (ManageServer, Cat::Administrative, "Change space-wide settings", admin, &[]),
            (Administrator, Cat::Administrative, "All permissions, implicitly", owner, &[]),
        ];

        let entries = table
            .into_iter()
            .map(|(permission, category, description, min_power_level, depends_on)| CatalogEntry {
                permission,
                category,
                description,
                min_power_level,
                depends_on,
            })
            .collect();

        Self {
            entries,
            owner_threshold: owner,
            member_threshold: base,
        }
    }

    /// Metadata for a permission. Total: every [`Permission`] has an entry.
    pub fn entry(&self, permission: Permission) -> &CatalogEntry {
        &self.entries[permission.index()]
    }

    /// Minimum power level the permission demands.
    pub fn min_power_level(&self, permission: Permission) -> i64 {
        self.entry(permission).min_power_level
    }

    /// Direct prerequisites of the permission.
    pub fn depends_on(&self, permission: Permission) -> &'static [Permission] {
        self.entry(permission).depends_on
    }

    /// The level the `administrator` permission (and ownership) demands.
    pub fn owner_threshold(&self) -> i64 {
        self.owner_threshold
    }

    /// The floor required by an empty vector.
    pub fn member_threshold(&self) -> i64 {
        self.member_threshold
    }

    /// All entries in a category, in bit order.
    pub fn category_entries(&self, category: PermissionCategory) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::new(&RoleThresholds::default())
    }
}
