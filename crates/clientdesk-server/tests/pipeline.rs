//! Pipeline behavior: ownership scoping, write+audit atomicity, and
//! best-effort side effects.

mod common;

use clientdesk_core::{AuditAction, ClientPatch, NewClient};
use clientdesk_server::error::ApiError;
use clientdesk_store::RecordStore;
use common::TestEnv;
use uuid::Uuid;

fn new_client(email: &str) -> NewClient {
    NewClient {
        first_name: "Jane".to_string(),
        last_name: "Smith".to_string(),
        email: email.to_string(),
        age: 29,
        linkedin_url: "https://linkedin.com/in/janesmith".to_string(),
    }
}

#[tokio::test]
async fn create_persists_record_and_one_audit_entry() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");

    let record = env
        .state
        .pipeline()
        .create(&actor, new_client("jane@example.com"))
        .await
        .unwrap();

    assert_eq!(record.owner_id, actor.id);
    assert!(env.store.get(record.id).await.unwrap().is_some());

    let logs = env.store.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::ClientCreated);
    assert_eq!(logs[0].user_id, actor.id);
}

#[tokio::test]
async fn failed_audit_append_rolls_back_the_create() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    env.store.fail_log_appends(true);

    let err = env
        .state
        .pipeline()
        .create(&actor, new_client("jane@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Store(_)));

    // Neither the record nor any log row may survive.
    assert!(env
        .state
        .pipeline()
        .list(&actor)
        .await
        .unwrap()
        .is_empty());
    assert!(env.store.logs().is_empty());
}

#[tokio::test]
async fn failed_audit_append_rolls_back_the_update() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    let record = env.seed_client(actor.id, "jane@example.com");
    env.store.fail_log_appends(true);

    let err = env
        .state
        .pipeline()
        .update(
            &actor,
            record.id,
            ClientPatch {
                first_name: Some("Janet".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Store(_)));

    // The patch did not apply and no log row survived.
    assert_eq!(env.store.get(record.id).await.unwrap(), Some(record));
    assert!(env.store.logs().is_empty());
}

#[tokio::test]
async fn failed_audit_append_rolls_back_the_delete() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    let record = env.seed_client(actor.id, "jane@example.com");
    env.store.fail_log_appends(true);

    let err = env
        .state
        .pipeline()
        .delete(&actor, record.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Store(_)));

    assert_eq!(env.store.get(record.id).await.unwrap(), Some(record));
    assert!(env.store.logs().is_empty());
}

#[tokio::test]
async fn create_fires_mail_and_notification() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");

    env.state
        .pipeline()
        .create(&actor, new_client("jane@example.com"))
        .await
        .unwrap();

    let sent = env.mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, actor.email);
    assert_eq!(sent[0].1, "Client Created");

    let messages = env.dispatcher.messages.lock().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains(&actor.id.to_string()));
}

#[tokio::test]
async fn failed_side_effects_do_not_fail_the_create() {
    let env = TestEnv::with_failing_side_effects();
    let actor = env.register_actor("alice");

    let record = env
        .state
        .pipeline()
        .create(&actor, new_client("jane@example.com"))
        .await
        .unwrap();

    // The record and its audit entry are committed regardless.
    assert!(env.store.get(record.id).await.unwrap().is_some());
    assert_eq!(env.store.logs().len(), 1);
}

#[tokio::test]
async fn update_and_delete_fire_no_side_effects() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    let record = env.seed_client(actor.id, "jane@example.com");

    env.state
        .pipeline()
        .update(
            &actor,
            record.id,
            ClientPatch {
                first_name: Some("Janet".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    env.state.pipeline().delete(&actor, record.id).await.unwrap();

    assert!(env.mailer.sent.lock().unwrap().is_empty());
    assert!(env.dispatcher.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn list_is_scoped_to_the_actor() {
    let env = TestEnv::new();
    let alice = env.register_actor("alice");
    let bob = env.register_actor("bob");
    env.seed_client(alice.id, "a@example.com");
    env.seed_client(alice.id, "b@example.com");
    env.seed_client(bob.id, "c@example.com");

    let records = env.state.pipeline().list(&alice).await.unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.owner_id == alice.id));
}

#[tokio::test]
async fn missing_record_reported_before_ownership() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    let unknown = Uuid::new_v4();

    assert!(matches!(
        env.state.pipeline().view(&actor, unknown).await.unwrap_err(),
        ApiError::NotFound
    ));
    assert!(matches!(
        env.state
            .pipeline()
            .update(&actor, unknown, ClientPatch::default())
            .await
            .unwrap_err(),
        ApiError::NotFound
    ));
    assert!(matches!(
        env.state.pipeline().delete(&actor, unknown).await.unwrap_err(),
        ApiError::NotFound
    ));
}

#[tokio::test]
async fn non_owner_is_denied_and_record_is_untouched() {
    let env = TestEnv::new();
    let alice = env.register_actor("alice");
    let bob = env.register_actor("bob");
    let record = env.seed_client(alice.id, "jane@example.com");

    let patch = ClientPatch {
        first_name: Some("Intruder".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        env.state.pipeline().view(&bob, record.id).await.unwrap_err(),
        ApiError::Forbidden
    ));
    assert!(matches!(
        env.state
            .pipeline()
            .update(&bob, record.id, patch)
            .await
            .unwrap_err(),
        ApiError::Forbidden
    ));
    assert!(matches!(
        env.state.pipeline().delete(&bob, record.id).await.unwrap_err(),
        ApiError::Forbidden
    ));

    // No write, no audit entry.
    assert_eq!(env.store.get(record.id).await.unwrap(), Some(record));
    assert!(env.store.logs().is_empty());
}

#[tokio::test]
async fn empty_patch_still_counts_as_an_update() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    let record = env.seed_client(actor.id, "jane@example.com");

    let updated = env
        .state
        .pipeline()
        .update(&actor, record.id, ClientPatch::default())
        .await
        .unwrap();

    assert_eq!(updated.first_name, record.first_name);
    let logs = env.store.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::ClientUpdated);
}

#[tokio::test]
async fn duplicate_email_is_rejected_on_create_and_update() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    env.seed_client(actor.id, "taken@example.com");
    let other = env.seed_client(actor.id, "other@example.com");

    let err = env
        .state
        .pipeline()
        .create(&actor, new_client("taken@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref e) if e.contains("email")));

    let err = env
        .state
        .pipeline()
        .update(
            &actor,
            other.id,
            ClientPatch {
                email: Some("taken@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(ref e) if e.contains("email")));
}

#[tokio::test]
async fn resubmitting_the_same_email_is_not_a_conflict() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    let record = env.seed_client(actor.id, "jane@example.com");

    let updated = env
        .state
        .pipeline()
        .update(
            &actor,
            record.id,
            ClientPatch {
                email: Some("jane@example.com".to_string()),
                age: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.email, "jane@example.com");
    assert_eq!(updated.age, 30);
}

#[tokio::test]
async fn deleted_record_is_gone_and_audited() {
    let env = TestEnv::new();
    let actor = env.register_actor("alice");
    let record = env.seed_client(actor.id, "jane@example.com");

    env.state.pipeline().delete(&actor, record.id).await.unwrap();

    assert!(env.store.get(record.id).await.unwrap().is_none());
    let logs = env.store.logs();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].action, AuditAction::ClientDeleted);
}
