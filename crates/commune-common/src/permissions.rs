//! Permission primitives — the named capability set and its vector type.
//!
//! Commune exposes granular named permissions (like Discord) on top of a chat
//! protocol whose only trust primitive is a 0–100 power level per member. The
//! vector is stored as a bitfield; the wire shape is a named boolean map so
//! that the account-data store stays human-readable.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// The full boolean capability set for a role or per-member override.
    ///
    /// Immutable value type: edits go through [`PermissionVector::with`] /
    /// [`PermissionVector::without`], which return a new vector.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PermissionVector: u64 {
        // === General ===
        const VIEW_CHANNELS            = 1 << 0;
        const SEND_MESSAGES            = 1 << 1;
        const EMBED_LINKS              = 1 << 2;
        const ATTACH_FILES             = 1 << 3;
        const ADD_REACTIONS            = 1 << 4;
        const USE_EXTERNAL_EMOJIS      = 1 << 5;
        const READ_MESSAGE_HISTORY     = 1 << 6;
        const CHANGE_NICKNAME          = 1 << 7;
        const CREATE_INVITES           = 1 << 8;

        // === Member management ===
        const KICK_MEMBERS             = 1 << 9;
        const BAN_MEMBERS              = 1 << 10;
        const MODERATE_MEMBERS         = 1 << 11;
        const MANAGE_NICKNAMES         = 1 << 12;
        const MENTION_EVERYONE         = 1 << 13;

        // === Channel ===
        const MANAGE_CHANNELS          = 1 << 14;
        const MANAGE_MESSAGES          = 1 << 15;
        const PIN_MESSAGES             = 1 << 16;
        const MANAGE_THREADS           = 1 << 17;
        const CREATE_THREADS           = 1 << 18;
        const SEND_MESSAGES_IN_THREADS = 1 << 19;

        // === Voice ===
        const CONNECT                  = 1 << 20;
        const SPEAK                    = 1 << 21;
        const VIDEO                    = 1 << 22;
        const USE_VOICE_ACTIVITY       = 1 << 23;
        const MUTE_MEMBERS             = 1 << 24;
        const DEAFEN_MEMBERS           = 1 << 25;
        const MOVE_MEMBERS             = 1 << 26;

        // === Advanced ===
        const MANAGE_WEBHOOKS          = 1 << 27;
        const MANAGE_EMOJIS            = 1 << 28;
        const VIEW_AUDIT_LOG           = 1 << 29;
        const MANAGE_EVENTS            = 1 << 30;

        // === Administrative ===
        const MANAGE_ROLES             = 1 << 31;
        const MANAGE_SERVER            = 1 << 32;
        /// All permissions, implicitly. Does not rewrite the vector.
        const ADMINISTRATOR            = 1 << 33;
    }
}

/// A single named permission. One variant per bit of [`PermissionVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum Permission {
    // General
    ViewChannels = 0,
    SendMessages = 1,
    EmbedLinks = 2,
    AttachFiles = 3,
    AddReactions = 4,
    UseExternalEmojis = 5,
    ReadMessageHistory = 6,
    ChangeNickname = 7,
    CreateInvites = 8,
    // Member management
    KickMembers = 9,
    BanMembers = 10,
    ModerateMembers = 11,
    ManageNicknames = 12,
    MentionEveryone = 13,
    // Channel
    ManageChannels = 14,
    ManageMessages = 15,
    PinMessages = 16,
    ManageThreads = 17,
    CreateThreads = 18,
    SendMessagesInThreads = 19,
    // Voice
    Connect = 20,
    Speak = 21,
    Video = 22,
    UseVoiceActivity = 23,
    MuteMembers = 24,
    DeafenMembers = 25,
    MoveMembers = 26,
    // Advanced
    ManageWebhooks = 27,
    ManageEmojis = 28,
    ViewAuditLog = 29,
    ManageEvents = 30,
    // Administrative
    ManageRoles = 31,
    ManageServer = 32,
    Administrator = 33,
}

impl Permission {
    /// Every permission, in bit order. The canonical iteration order for the
    /// named-map wire shape and for catalog construction.
    pub const ALL: [Permission; 34] = [
        Permission::ViewChannels,
        Permission::SendMessages,
        Permission::EmbedLinks,
        Permission::AttachFiles,
        Permission::AddReactions,
        Permission::UseExternalEmojis,
        Permission::ReadMessageHistory,
        Permission::ChangeNickname,
        Permission::CreateInvites,
        Permission::KickMembers,
        Permission::BanMembers,
        Permission::ModerateMembers,
        Permission::ManageNicknames,
        Permission::MentionEveryone,
        Permission::ManageChannels,
        Permission::ManageMessages,
        Permission::PinMessages,
        Permission::ManageThreads,
        Permission::CreateThreads,
        Permission::SendMessagesInThreads,
        Permission::Connect,
        Permission::Speak,
        Permission::Video,
        Permission::UseVoiceActivity,
        Permission::MuteMembers,
        Permission::DeafenMembers,
        Permission::MoveMembers,
        Permission::ManageWebhooks,
        Permission::ManageEmojis,
        Permission::ViewAuditLog,
        Permission::ManageEvents,
        Permission::ManageRoles,
        Permission::ManageServer,
        Permission::Administrator,
    ];

    /// The vector bit for this permission.
    pub const fn bit(self) -> PermissionVector {
        PermissionVector::from_bits_retain(1u64 << self as u32)
    }

    /// Stable index into per-permission tables (catalog entries).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical camelCase wire name.
    pub const fn name(self) -> &'static str {
        match self {
            Permission::ViewChannels => "viewChannels",
            Permission::SendMessages => "sendMessages",
            Permission::EmbedLinks => "embedLinks",
            Permission::AttachFiles => "attachFiles",
            Permission::AddReactions => "addReactions",
            Permission::UseExternalEmojis => "useExternalEmojis",
            Permission::ReadMessageHistory => "readMessageHistory",
            Permission::ChangeNickname => "changeNickname",
            Permission::CreateInvites => "createInvites",
            Permission::KickMembers => "kickMembers",
            Permission::BanMembers => "banMembers",
            Permission::ModerateMembers => "moderateMembers",
            Permission::ManageNicknames => "manageNicknames",
            Permission::MentionEveryone => "mentionEveryone",
            Permission::ManageChannels => "manageChannels",
            Permission::ManageMessages => "manageMessages",
            Permission::PinMessages => "pinMessages",
            Permission::ManageThreads => "manageThreads",
            Permission::CreateThreads => "createThreads",
            Permission::SendMessagesInThreads => "sendMessagesInThreads",
            Permission::Connect => "connect",
            Permission::Speak => "speak",
            Permission::Video => "video",
            Permission::UseVoiceActivity => "useVoiceActivity",
            Permission::MuteMembers => "muteMembers",
            Permission::DeafenMembers => "deafenMembers",
            Permission::MoveMembers => "moveMembers",
            Permission::ManageWebhooks => "manageWebhooks",
            Permission::ManageEmojis => "manageEmojis",
            Permission::ViewAuditLog => "viewAuditLog",
            Permission::ManageEvents => "manageEvents",
            Permission::ManageRoles => "manageRoles",
            Permission::ManageServer => "manageServer",
            Permission::Administrator => "administrator",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse failure for a permission name. A caller passing an unknown name is a
/// programming error at this layer, not a user-facing condition.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown permission name: {0}")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.name() == s)
            .ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

impl Serialize for Permission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Permission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl PermissionVector {
    /// Whether the flag for `permission` is literally set.
    pub fn enabled(&self, permission: Permission) -> bool {
        self.contains(permission.bit())
    }

    /// Whether the administrator flag is set.
    pub fn is_admin(&self) -> bool {
        self.contains(Self::ADMINISTRATOR)
    }

    /// Authorization check: administrator implicitly satisfies every
    /// permission without rewriting the vector.
    pub fn allows(&self, permission: Permission) -> bool {
        self.is_admin() || self.enabled(permission)
    }

    /// A copy of this vector with `permission` enabled.
    pub fn with(self, permission: Permission) -> Self {
        self | permission.bit()
    }

    /// A copy of this vector with `permission` disabled.
    pub fn without(self, permission: Permission) -> Self {
        self - permission.bit()
    }

    /// The permissions literally enabled, in bit order.
    pub fn enabled_permissions(&self) -> impl Iterator<Item = Permission> + '_ {
        Permission::ALL.iter().copied().filter(|p| self.enabled(*p))
    }

    /// Default vector for an ordinary member in a new space.
    pub fn default_member() -> Self {
        Self::VIEW_CHANNELS
            | Self::SEND_MESSAGES
            | Self::EMBED_LINKS
            | Self::ATTACH_FILES
            | Self::ADD_REACTIONS
            | Self::USE_EXTERNAL_EMOJIS
            | Self::READ_MESSAGE_HISTORY
            | Self::CHANGE_NICKNAME
            | Self::CREATE_INVITES
            | Self::CREATE_THREADS
            | Self::SEND_MESSAGES_IN_THREADS
            | Self::CONNECT
            | Self::SPEAK
            | Self::VIDEO
            | Self::USE_VOICE_ACTIVITY
    }
}

impl FromIterator<Permission> for PermissionVector {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        iter.into_iter()
            .fold(PermissionVector::empty(), PermissionVector::with)
    }
}

// Wire shape: a full named boolean map, e.g. {"viewChannels": true, ...}.
// Deserialization accepts partial maps (missing keys default to false) but
// rejects unknown keys.
impl Serialize for PermissionVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Permission::ALL.len()))?;
        for permission in Permission::ALL {
            map.serialize_entry(permission.name(), &self.enabled(permission))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PermissionVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct VectorVisitor;

        impl<'de> Visitor<'de> for VectorVisitor {
            type Value = PermissionVector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of permission names to booleans")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut vector = PermissionVector::empty();
                while let Some((name, enabled)) = access.next_entry::<String, bool>()? {
                    let permission: Permission = name.parse().map_err(de::Error::custom)?;
                    if enabled {
                        vector = vector.with(permission);
                    }
                }
                Ok(vector)
            }
        }

        deserializer.deserialize_map(VectorVisitor)
    }
}

/// Grouping of permissions for catalogs and settings surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionCategory {
    General,
    MemberManagement,
    Channel,
    Voice,
    Advanced,
    Administrative,
}

impl PermissionCategory {
    pub const ALL: [PermissionCategory; 6] = [
        PermissionCategory::General,
        PermissionCategory::MemberManagement,
        PermissionCategory::Channel,
        PermissionCategory::Voice,
        PermissionCategory::Advanced,
        PermissionCategory::Administrative,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            PermissionCategory::General => "General",
            PermissionCategory::MemberManagement => "Member Management",
            PermissionCategory::Channel => "Channel",
            PermissionCategory::Voice => "Voice",
            PermissionCategory::Advanced => "Advanced",
            PermissionCategory::Administrative => "Administrative",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            PermissionCategory::General => "Everyday participation in the space",
            PermissionCategory::MemberManagement => "Acting on other members",
            PermissionCategory::Channel => "Channel and message management",
            PermissionCategory::Voice => "Voice channel participation and control",
            PermissionCategory::Advanced => "Integrations, audit, and events",
            PermissionCategory::Administrative => "Space-wide configuration and roles",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_permission_has_a_distinct_bit() {
        let mut seen = PermissionVector::empty();
        for permission in Permission::ALL {
            assert!(!seen.intersects(permission.bit()), "{permission} bit reused");
            seen |= permission.bit();
        }
    }

    #[test]
    fn names_round_trip() {
        for permission in Permission::ALL {
            let parsed: Permission = permission.name().parse().expect("canonical name parses");
            assert_eq!(parsed, permission);
        }
        assert!("manage_roles".parse::<Permission>().is_err());
    }

    #[test]
    fn administrator_allows_everything_without_rewriting() {
        let vector = PermissionVector::ADMINISTRATOR;
        for permission in Permission::ALL {
            assert!(vector.allows(permission));
        }
        // Only the administrator bit itself is literally set.
        assert!(!vector.enabled(Permission::KickMembers));
    }

    #[test]
    fn serde_is_a_named_boolean_map() {
        let vector = PermissionVector::empty()
            .with(Permission::ViewChannels)
            .with(Permission::SendMessages);

        let json = serde_json::to_value(vector).unwrap();
        assert_eq!(json["viewChannels"], true);
        assert_eq!(json["sendMessages"], true);
        assert_eq!(json["kickMembers"], false);
        assert_eq!(json.as_object().unwrap().len(), Permission::ALL.len());

        let back: PermissionVector = serde_json::from_value(json).unwrap();
        assert_eq!(back, vector);
    }

    #[test]
    fn partial_maps_deserialize_unknown_keys_fail() {
        let vector: PermissionVector =
            serde_json::from_str(r#"{"viewChannels": true}"#).unwrap();
        assert_eq!(vector, PermissionVector::VIEW_CHANNELS);

        let err = serde_json::from_str::<PermissionVector>(r#"{"flyToTheMoon": true}"#);
        assert!(err.is_err());
    }
}
