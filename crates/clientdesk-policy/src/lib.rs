//! # clientdesk-policy
//!
//! Ownership policy for client records.
//!
//! The policy is a pure decision function: given the acting user, the
//! requested action, and the owner of the target record (when there is
//! one), it returns [`Decision::Allow`] or [`Decision::Deny`]. It performs
//! no I/O and is deterministic for the same inputs, so it can be tested
//! with fabricated identities.
//!
//! ## Rules
//!
//! | Action | Decision |
//! |--------|----------|
//! | `list`, `create` | always allow |
//! | `view`, `update`, `delete` | allow iff the target's owner is the actor |
//!
//! A deny is terminal: the caller surfaces it as an access-denied failure
//! without any partial execution.

use clientdesk_core::UserId;

/// Actions a user can request against client records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientAction {
    List,
    View,
    Create,
    Update,
    Delete,
}

impl ClientAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl std::fmt::Display for ClientAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// The ownership policy for client records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientPolicy;

impl ClientPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `actor` may perform `action`.
    ///
    /// `target_owner` is the owner of the record the action targets;
    /// `None` for actions without a target (`list`, `create`). Record-level
    /// actions with no target owner are denied.
    pub fn decide(
        &self,
        actor: UserId,
        action: ClientAction,
        target_owner: Option<UserId>,
    ) -> Decision {
        let decision = match action {
            ClientAction::List | ClientAction::Create => Decision::Allow,
            ClientAction::View | ClientAction::Update | ClientAction::Delete => {
                match target_owner {
                    Some(owner) if owner == actor => Decision::Allow,
                    _ => Decision::Deny,
                }
            }
        };

        if decision == Decision::Deny {
            tracing::debug!(actor = %actor, action = %action, "policy denied action");
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn list_and_create_always_allow() {
        let policy = ClientPolicy::new();
        let actor = Uuid::new_v4();

        assert!(policy.decide(actor, ClientAction::List, None).is_allow());
        assert!(policy.decide(actor, ClientAction::Create, None).is_allow());
    }

    #[test]
    fn owner_may_view_update_delete() {
        let policy = ClientPolicy::new();
        let actor = Uuid::new_v4();

        for action in [ClientAction::View, ClientAction::Update, ClientAction::Delete] {
            assert!(policy.decide(actor, action, Some(actor)).is_allow());
        }
    }

    #[test]
    fn non_owner_is_denied() {
        let policy = ClientPolicy::new();
        let actor = Uuid::new_v4();
        let other = Uuid::new_v4();

        for action in [ClientAction::View, ClientAction::Update, ClientAction::Delete] {
            assert_eq!(policy.decide(actor, action, Some(other)), Decision::Deny);
        }
    }

    #[test]
    fn record_actions_without_target_are_denied() {
        let policy = ClientPolicy::new();
        let actor = Uuid::new_v4();

        for action in [ClientAction::View, ClientAction::Update, ClientAction::Delete] {
            assert_eq!(policy.decide(actor, action, None), Decision::Deny);
        }
    }

    #[test]
    fn decision_is_deterministic() {
        let policy = ClientPolicy::new();
        let actor = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = policy.decide(actor, ClientAction::Update, Some(other));
        for _ in 0..10 {
            assert_eq!(policy.decide(actor, ClientAction::Update, Some(other)), first);
        }
    }
}
