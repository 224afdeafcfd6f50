//! Session lifecycle: login, resolution, expiry, re-login and logout

use std::time::Duration;

use session_auth::{AuthError, RequestContext, SessionStore};

use crate::common::{TestAccounts, TestEnv, clears_session_cookie, request_with_session, set_cookies};

#[tokio::test]
async fn test_login_then_resolve_authenticated() {
    // Given alice has logged in
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;

    // When a later request presents the session cookie
    let mut ctx = request_with_session(&session_id);
    let user = env.service.get_user(&mut ctx).await.unwrap();

    // Then it resolves to alice without touching the cookie
    assert!(user.is_authenticated);
    assert_eq!(user.username, "alice");
    assert_eq!(user.full_name(), "Alice Liddell");
    assert!(set_cookies(&ctx).is_empty());
}

#[tokio::test]
async fn test_request_without_credentials_is_anonymous() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let mut ctx = RequestContext::default();

    let user = env.service.get_user(&mut ctx).await.unwrap();

    assert!(!user.is_authenticated);
    assert!(!user.is_guest);
    assert_eq!(env.accounts.username_lookups(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_session_expires_to_anonymous() {
    // Given a short-lived session
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let mut login_ctx = RequestContext::default();
    let session = env
        .service
        .login_user_with_expiration(&mut login_ctx, &TestAccounts::alice(), Duration::from_secs(60))
        .await
        .unwrap();

    // When the session is used within its lifetime
    tokio::time::advance(Duration::from_secs(59)).await;
    let mut ctx = request_with_session(&session.id);
    assert!(env.service.get_user(&mut ctx).await.unwrap().is_authenticated);

    // Then after expiry the same cookie is anonymous and gets cleared
    tokio::time::advance(Duration::from_secs(2)).await;
    let mut ctx = request_with_session(&session.id);
    let user = env.service.get_user(&mut ctx).await.unwrap();
    assert!(!user.is_authenticated);
    assert!(clears_session_cookie(&ctx));
}

#[tokio::test]
async fn test_relogin_invalidates_previous_session() {
    // Given alice is logged in on this browser and on another device
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let old_id = env.login(&TestAccounts::alice()).await;
    let other_device = env.login(&TestAccounts::alice()).await;

    // When she logs in again with the old cookie present
    let mut ctx = request_with_session(&old_id);
    let new_session = env
        .service
        .login_user(&mut ctx, &TestAccounts::alice())
        .await
        .unwrap();

    // Then the old id resolves to anonymous, the others stay valid
    let mut stale = request_with_session(&old_id);
    assert!(!env.service.get_user(&mut stale).await.unwrap().is_authenticated);
    assert!(clears_session_cookie(&stale));

    let mut fresh = request_with_session(&new_session.id);
    assert!(env.service.get_user(&mut fresh).await.unwrap().is_authenticated);

    let mut other = request_with_session(&other_device);
    assert!(env.service.get_user(&mut other).await.unwrap().is_authenticated);
}

#[tokio::test]
async fn test_logout_then_old_cookie_is_anonymous() {
    // Given a logged-in session
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;

    // When logging out
    let mut ctx = request_with_session(&session_id);
    env.service.logout_user(&mut ctx).await.unwrap();
    assert!(clears_session_cookie(&ctx));

    // Then the old cookie no longer resolves, without an error
    let mut ctx = request_with_session(&session_id);
    let user = env.service.get_user(&mut ctx).await.unwrap();
    assert!(!user.is_authenticated);
    assert!(env.sessions.get(&session_id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_logout_twice_is_idempotent() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;

    for _ in 0..2 {
        let mut ctx = request_with_session(&session_id);
        assert!(env.service.logout_user(&mut ctx).await.is_ok());
    }
}

#[tokio::test]
async fn test_dangling_session_degrades_to_anonymous() {
    // Given a session whose account has since been deleted
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    env.sessions
        .set("dangling", "deleted-user", Duration::from_secs(60))
        .await
        .unwrap();

    // When resolving it
    let mut ctx = request_with_session("dangling");
    let user = env.service.get_user(&mut ctx).await;

    // Then the request is anonymous, not an error
    assert!(matches!(user, Ok(ref u) if !u.is_authenticated));
    assert_eq!(env.accounts.username_lookups(), 1);
}

#[tokio::test]
async fn test_identity_is_memoized_per_request() {
    // Given a resolved request
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;
    let mut ctx = request_with_session(&session_id);
    let first = env.service.get_user(&mut ctx).await.unwrap();

    // When the session disappears mid-request
    env.sessions.delete(&session_id).await.unwrap();

    // Then the request keeps observing the identity it resolved first
    let second = env.service.get_user(&mut ctx).await.unwrap();
    assert_eq!(first, second);
    assert!(second.is_authenticated);
}

#[tokio::test]
async fn test_session_info_reports_owner() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let session_id = env.login(&TestAccounts::alice()).await;
    let mut ctx = request_with_session(&session_id);

    let info = env.service.get_session_info(&mut ctx).await.unwrap().unwrap();

    assert_eq!(info.id, session_id);
    assert_eq!(info.username, "alice");
}

#[tokio::test]
async fn test_login_for_unknown_password_is_rejected_before_session() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);

    let result = env.service.authenticate("alice", "wrong").await;

    assert!(matches!(result, Err(AuthError::InvalidPassword)));
    assert!(env.sessions.is_empty().await);
}
