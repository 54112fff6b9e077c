//! Collaborator ports — the remote boundary of the authority core.
//!
//! The core never talks to the chat protocol directly. It reads and writes
//! trust through a membership store and performs moderation actions through
//! a moderation transport; both are opaque async interfaces supplied by the
//! embedding application. Each call is atomic at the remote.

use async_trait::async_trait;
use uuid::Uuid;

use commune_common::error::TransportError;
use commune_common::models::Member;

/// Read/write access to the power-levels state object of a room.
///
/// The single source of truth for trust. Implementations map these calls to
/// the underlying sync protocol; the core never caches across calls.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Current power level of a member (the default level for users absent
    /// from the state object).
    async fn power_level(&self, room_id: Uuid, user_id: Uuid) -> Result<i64, TransportError>;

    /// Write a member's power level into the state object.
    async fn set_power_level(
        &self,
        room_id: Uuid,
        user_id: Uuid,
        level: i64,
    ) -> Result<(), TransportError>;

    /// Enumerate current members of the room.
    async fn list_members(&self, room_id: Uuid) -> Result<Vec<Member>, TransportError>;
}

/// Moderation actions performed against the chat protocol.
///
/// Each call is an atomic remote operation with its own success/failure;
/// timeouts and protocol-level rate limiting are the implementation's
/// concern, not the core's.
#[async_trait]
pub trait ModerationTransport: Send + Sync {
    async fn kick(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
        reason: Option<&str>,
    ) -> Result<(), TransportError>;

    /// Ban a member. `duration_ms` of `None` or `Some(0)` is a permanent
    /// ban; scheduling a future unban for timed bans is the embedding
    /// application's job.
    async fn ban(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
        reason: Option<&str>,
        duration_ms: Option<u64>,
    ) -> Result<(), TransportError>;

    async fn unban(
        &self,
        room_id: Uuid,
        actor_id: Uuid,
        target_id: Uuid,
        reason: Option<&str>,
    ) -> Result<(), TransportError>;
}
