//! Identity cache behaviour observed through `AuthService`

use std::sync::Arc;
use std::time::Duration;

use session_auth::{AuthService, SessionStore, User};
use tokio::task::JoinSet;

use crate::common::{CountingAccountStore, TestAccounts, TestEnv, request_with_basic, request_with_session};

const IDENTITY_TTL: Duration = Duration::from_secs(45);

async fn resolve(service: &AuthService, session_id: &str) -> User {
    let mut ctx = request_with_session(session_id);
    service.get_user(&mut ctx).await.expect("resolve identity")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_load_once() {
    // Given a slow account store and a live session
    let env = TestEnv::with_store(CountingAccountStore::with_delay(
        vec![TestAccounts::alice()],
        Duration::from_millis(100),
    ));
    let session_id = env.login(&TestAccounts::alice()).await;

    // When many requests resolve the cold identity at once
    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let service = Arc::clone(&env.service);
        let session_id = session_id.clone();
        tasks.spawn(async move { resolve(&service, &session_id).await });
    }
    let users = tasks.join_all().await;

    // Then exactly one lookup ran and everyone got the same identity
    assert_eq!(env.accounts.username_lookups(), 1);
    assert_eq!(users.len(), 16);
    assert!(users.iter().all(|u| u == &users[0] && u.is_authenticated));
}

#[tokio::test(start_paused = true)]
async fn test_cache_hits_do_not_extend_lifetime() {
    // Given alice's identity was cached at t=0
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;
    resolve(&env.service, &session_id).await;
    assert_eq!(env.accounts.username_lookups(), 1);

    // When it is read repeatedly within the TTL
    for _ in 0..4 {
        tokio::time::advance(Duration::from_secs(10)).await;
        resolve(&env.service, &session_id).await;
    }
    assert_eq!(env.accounts.username_lookups(), 1);

    // Then it still expires 45 seconds after insertion
    tokio::time::advance(Duration::from_secs(6)).await;
    resolve(&env.service, &session_id).await;
    assert_eq!(env.accounts.username_lookups(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_deactivated_session_owner_resolves_anonymous_after_one_ttl() {
    // Given a cached identity for alice
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;
    assert!(resolve(&env.service, &session_id).await.is_authenticated);

    // When alice is deactivated, the cached projection is still served
    env.set_active("alice", false).await;
    assert!(resolve(&env.service, &session_id).await.is_authenticated);

    // Then once the entry lapses the still-live session resolves to anonymous
    tokio::time::advance(IDENTITY_TTL).await;
    assert_eq!(env.sessions.get(&session_id).await.as_deref(), Ok("alice"));
    let lookups = env.accounts.username_lookups();
    assert_eq!(resolve(&env.service, &session_id).await, User::anonymous());

    // And the inactive account is not cached, so each request looks it up again
    assert_eq!(resolve(&env.service, &session_id).await, User::anonymous());
    assert_eq!(env.accounts.username_lookups(), lookups + 2);
}

#[tokio::test]
async fn test_invalidate_identity_forces_reload() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;
    resolve(&env.service, &session_id).await;

    env.set_active("alice", false).await;
    env.service.invalidate_identity("alice").await;

    assert!(!resolve(&env.service, &session_id).await.is_authenticated);
}

#[tokio::test]
async fn test_relogin_keeps_cached_identity() {
    // Given a cached identity
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let first = env.login(&TestAccounts::alice()).await;
    resolve(&env.service, &first).await;

    // When alice logs in again
    let second = env.login(&TestAccounts::alice()).await;

    // Then the new session is served from the cache
    resolve(&env.service, &second).await;
    assert_eq!(env.accounts.username_lookups(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_credential_cache_expires() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);

    let mut ctx = request_with_basic("alice", "s3cret");
    env.service.get_user(&mut ctx).await.unwrap();
    tokio::time::advance(IDENTITY_TTL).await;
    let mut ctx = request_with_basic("alice", "s3cret");
    env.service.get_user(&mut ctx).await.unwrap();

    assert_eq!(env.accounts.username_lookups(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_purge_expired_sweeps_both_caches() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;
    resolve(&env.service, &session_id).await;
    let mut ctx = request_with_basic("alice", "s3cret");
    env.service.get_user(&mut ctx).await.unwrap();

    assert_eq!(env.service.purge_expired().await, 0);
    tokio::time::advance(IDENTITY_TTL).await;
    assert_eq!(env.service.purge_expired().await, 2);
}
