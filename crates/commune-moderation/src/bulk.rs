//! Bulk moderation orchestrator — fan-out/fan-in over many targets.
//!
//! One remote call per target, dispatched concurrently; every target owns
//! its own outcome slot. A failing target never blocks, cancels, or
//! reorders the others, and the orchestrator never retries — retry policy,
//! if any, belongs to the caller. Once dispatched a batch cannot be
//! cancelled; timeouts are the transport's concern.

use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use commune_common::config::ModerationLimits;
use commune_common::error::{CommuneError, CommuneResult};
use commune_common::validation::validate_request;

use crate::ports::ModerationTransport;

/// The moderation action to apply to every target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkActionKind {
    Kick,
    Ban,
    Unban,
    /// Never executed in bulk: its two-write sequence does not compose with
    /// concurrent dispatch. Routed through the role assignment resolver.
    TransferOwnership,
}

/// A moderation action against a set of target users.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkActionRequest {
    pub room_id: Uuid,
    pub actor_id: Uuid,

    #[validate(length(min = 1, message = "Bulk action requires at least one target"))]
    pub targets: Vec<Uuid>,

    pub action: BulkActionKind,

    pub reason: Option<String>,

    /// Ban duration in milliseconds. `None` or `Some(0)` is a permanent
    /// ban; the call layer treats both identically and scheduling the
    /// future unban is an external collaborator's job.
    pub duration_ms: Option<u64>,
}

/// Per-target outcome. Exactly one per input target, input order preserved.
#[derive(Debug, Clone, Serialize)]
pub struct TargetOutcome {
    pub target_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregated result of a bulk action.
#[derive(Debug, Clone, Serialize)]
pub struct BulkActionResult {
    pub outcomes: Vec<TargetOutcome>,
    pub success_count: usize,
    pub failure_count: usize,
}

/// Executes moderation actions against many targets at once.
pub struct BulkModerationOrchestrator {
    transport: Arc<dyn ModerationTransport>,
    limits: ModerationLimits,
}

impl BulkModerationOrchestrator {
    pub fn new(transport: Arc<dyn ModerationTransport>, limits: ModerationLimits) -> Self {
        Self { transport, limits }
    }

    /// Run one action against every target concurrently and aggregate the
    /// per-target outcomes. Partial failure is isolated by construction.
    pub async fn execute_bulk_action(
        &self,
        request: &BulkActionRequest,
    ) -> CommuneResult<BulkActionResult> {
        validate_request(request)?;

        if request.action == BulkActionKind::TransferOwnership {
            return Err(CommuneError::Validation {
                message: "Ownership transfer is single-target; use the role assignment resolver"
                    .into(),
            });
        }
        if request.targets.len() > self.limits.max_bulk_targets {
            return Err(CommuneError::Validation {
                message: format!(
                    "Bulk action limited to {} targets, got {}",
                    self.limits.max_bulk_targets,
                    request.targets.len()
                ),
            });
        }

        let calls = request.targets.iter().map(|&target_id| {
            let transport = Arc::clone(&self.transport);
            let reason = request.reason.as_deref();
            async move {
                let result = match request.action {
                    BulkActionKind::Kick => {
                        transport
                            .kick(request.room_id, request.actor_id, target_id, reason)
                            .await
                    }
                    BulkActionKind::Ban => {
                        transport
                            .ban(
                                request.room_id,
                                request.actor_id,
                                target_id,
                                reason,
                                request.duration_ms,
                            )
                            .await
                    }
                    BulkActionKind::Unban => {
                        transport
                            .unban(request.room_id, request.actor_id, target_id, reason)
                            .await
                    }
                    BulkActionKind::TransferOwnership => unreachable!("rejected above"),
                };

                match result {
                    Ok(()) => TargetOutcome {
                        target_id,
                        success: true,
                        error: None,
                    },
                    Err(e) => TargetOutcome {
                        target_id,
                        success: false,
                        error: Some(e.message),
                    },
                }
            }
        });

        // join_all preserves input order, so outcomes map 1:1 to targets.
        let outcomes = join_all(calls).await;
        let success_count = outcomes.iter().filter(|o| o.success).count();
        let failure_count = outcomes.len() - success_count;

        tracing::info!(
            action = ?request.action,
            room_id = %request.room_id,
            actor_id = %request.actor_id,
            targets = outcomes.len(),
            success_count,
            failure_count,
            "bulk action completed"
        );
        if failure_count > 0 {
            tracing::warn!(failure_count, "bulk action had per-target failures");
        }

        Ok(BulkActionResult {
            outcomes,
            success_count,
            failure_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use commune_common::error::TransportError;

    /// Records calls and fails the configured targets.
    #[derive(Default)]
    struct FakeTransport {
        fail_for: Mutex<HashSet<Uuid>>,
        bans: Mutex<Vec<(Uuid, Option<u64>)>>,
    }

    impl FakeTransport {
        fn failing_for(targets: &[Uuid]) -> Arc<Self> {
            let transport = Self::default();
            *transport.fail_for.lock().unwrap() = targets.iter().copied().collect();
            Arc::new(transport)
        }

        fn check(&self, target_id: Uuid) -> Result<(), TransportError> {
            if self.fail_for.lock().unwrap().contains(&target_id) {
                Err(TransportError::new("M_LIMIT_EXCEEDED: simulated failure"))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl ModerationTransport for FakeTransport {
        async fn kick(
            &self,
            _room: Uuid,
            _actor: Uuid,
            target_id: Uuid,
            _reason: Option<&str>,
        ) -> Result<(), TransportError> {
            self.check(target_id)
        }

        async fn ban(
            &self,
            _room: Uuid,
            _actor: Uuid,
            target_id: Uuid,
            _reason: Option<&str>,
            duration_ms: Option<u64>,
        ) -> Result<(), TransportError> {
            self.bans.lock().unwrap().push((target_id, duration_ms));
            self.check(target_id)
        }

        async fn unban(
            &self,
            _room: Uuid,
            _actor: Uuid,
            target_id: Uuid,
            _reason: Option<&str>,
        ) -> Result<(), TransportError> {
            self.check(target_id)
        }
    }

    fn orchestrator(transport: Arc<FakeTransport>) -> BulkModerationOrchestrator {
        BulkModerationOrchestrator::new(transport, ModerationLimits::default())
    }

    fn request(action: BulkActionKind, targets: Vec<Uuid>) -> BulkActionRequest {
        BulkActionRequest {
            room_id: Uuid::new_v4(),
            actor_id: Uuid::new_v4(),
            targets,
            action,
            reason: Some("spam".into()),
            duration_ms: None,
        }
    }

    #[tokio::test]
    async fn empty_target_list_is_a_validation_error() {
        let orchestrator = orchestrator(FakeTransport::failing_for(&[]));
        let err = orchestrator
            .execute_bulk_action(&request(BulkActionKind::Kick, vec![]))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn ownership_transfer_is_excluded_from_bulk() {
        let orchestrator = orchestrator(FakeTransport::failing_for(&[]));
        let err = orchestrator
            .execute_bulk_action(&request(
                BulkActionKind::TransferOwnership,
                vec![Uuid::new_v4()],
            ))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn over_limit_batches_are_rejected() {
        let transport = FakeTransport::failing_for(&[]);
        let orchestrator = BulkModerationOrchestrator::new(
            transport,
            ModerationLimits {
                max_bulk_targets: 2,
            },
        );
        let targets = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let err = orchestrator
            .execute_bulk_action(&request(BulkActionKind::Kick, targets))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn one_failure_never_blocks_the_others() {
        // Bulk ban of 3 users where the middle target's call fails:
        // exactly 3 outcomes, in input order, counts 2/1.
        let (u1, u2, u3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let orchestrator = orchestrator(FakeTransport::failing_for(&[u2]));

        let result = orchestrator
            .execute_bulk_action(&request(BulkActionKind::Ban, vec![u1, u2, u3]))
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 3);
        assert_eq!(result.success_count, 2);
        assert_eq!(result.failure_count, 1);

        let ids: Vec<_> = result.outcomes.iter().map(|o| o.target_id).collect();
        assert_eq!(ids, [u1, u2, u3]);

        assert!(result.outcomes[0].success);
        assert!(!result.outcomes[1].success);
        assert!(result.outcomes[1].error.as_deref().unwrap().contains("M_LIMIT_EXCEEDED"));
        assert!(result.outcomes[2].success);
    }

    #[tokio::test]
    async fn every_target_gets_exactly_one_outcome() {
        let targets: Vec<Uuid> = (0..20).map(|_| Uuid::new_v4()).collect();
        let failing: Vec<Uuid> = targets.iter().copied().step_by(3).collect();
        let orchestrator = orchestrator(FakeTransport::failing_for(&failing));

        let result = orchestrator
            .execute_bulk_action(&request(BulkActionKind::Kick, targets.clone()))
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), targets.len());
        assert_eq!(result.failure_count, failing.len());
        assert_eq!(result.success_count, targets.len() - failing.len());

        let ids: Vec<_> = result.outcomes.iter().map(|o| o.target_id).collect();
        assert_eq!(ids, targets, "input order preserved, no duplicates or omissions");
    }

    #[tokio::test]
    async fn permanent_and_timed_bans_are_identical_at_the_call_layer() {
        let target = Uuid::new_v4();
        let transport = FakeTransport::failing_for(&[]);
        let orchestrator = orchestrator(transport.clone());

        let mut timed = request(BulkActionKind::Ban, vec![target]);
        timed.duration_ms = Some(86_400_000);
        assert!(orchestrator.execute_bulk_action(&timed).await.unwrap().outcomes[0].success);

        let mut permanent = request(BulkActionKind::Ban, vec![target]);
        permanent.duration_ms = Some(0);
        assert!(orchestrator.execute_bulk_action(&permanent).await.unwrap().outcomes[0].success);

        let bans = transport.bans.lock().unwrap();
        assert_eq!(bans.as_slice(), [(target, Some(86_400_000)), (target, Some(0))]);
    }
}
