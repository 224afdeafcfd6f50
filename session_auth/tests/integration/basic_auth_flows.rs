//! Basic Authorization header resolution and direct credential checks

use base64::{Engine as _, engine::general_purpose};
use session_auth::{AuthError, UserError};

use crate::common::{
    TestAccounts, TestEnv, request_with_authorization, request_with_basic, request_with_session,
};

#[tokio::test]
async fn test_authenticate_scenario() {
    // Given active alice / s3cret
    let env = TestEnv::new(vec![TestAccounts::alice()]);

    // Username and email paths both find her
    let by_name = env.service.authenticate("alice", "s3cret").await.unwrap();
    assert_eq!(by_name.username, "alice");
    assert_eq!(env.accounts.username_lookups(), 1);
    assert_eq!(env.accounts.email_lookups(), 0);

    let by_email = env.service.authenticate("ALICE@x.com", "s3cret").await.unwrap();
    assert_eq!(by_email.username, "alice");
    assert_eq!(env.accounts.email_lookups(), 1);

    // A wrong password and an unknown user fail differently
    assert!(matches!(
        env.service.authenticate("alice", "wrong").await,
        Err(AuthError::InvalidPassword)
    ));
    assert!(matches!(
        env.service.authenticate("bob", "x").await,
        Err(AuthError::UserNotFound)
    ));

    // Deactivating alice hides her
    env.set_active("alice", false).await;
    assert!(matches!(
        env.service.authenticate("alice", "s3cret").await,
        Err(AuthError::UserNotFound)
    ));
}

#[tokio::test]
async fn test_basic_auth_resolves_and_caches() {
    // Given a correct Basic credential
    let env = TestEnv::new(vec![TestAccounts::alice()]);

    // When two separate requests present it
    let mut first = request_with_basic("alice", "s3cret");
    let user = env.service.get_user(&mut first).await.unwrap();
    let mut second = request_with_basic("alice", "s3cret");
    let cached = env.service.get_user(&mut second).await.unwrap();

    // Then the account store was consulted only once
    assert!(user.is_authenticated);
    assert_eq!(user, cached);
    assert_eq!(env.accounts.username_lookups(), 1);
}

#[tokio::test]
async fn test_basic_auth_by_email() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let mut ctx = request_with_basic("alice@x.com", "s3cret");

    let user = env.service.get_user(&mut ctx).await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(env.accounts.email_lookups(), 1);
}

#[tokio::test]
async fn test_failed_basic_auth_is_not_cached() {
    // Given a wrong password
    let env = TestEnv::new(vec![TestAccounts::alice()]);

    // When it is tried twice
    for _ in 0..2 {
        let mut ctx = request_with_basic("alice", "wrong");
        let result = env.service.get_user(&mut ctx).await;
        assert!(matches!(result, Err(AuthError::InvalidPassword)));
        assert!(ctx.user().is_none());
    }

    // Then each attempt went to the account store
    assert_eq!(env.accounts.username_lookups(), 2);
}

#[tokio::test]
async fn test_malformed_basic_header_is_client_error() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let no_colon = format!("Basic {}", general_purpose::STANDARD.encode("alice"));

    for header in ["Basic %%%", no_colon.as_str()] {
        let mut ctx = request_with_authorization(header);
        let err = env.service.get_user(&mut ctx).await.unwrap_err();
        assert!(err.is_client_error(), "{header} should be malformed");
    }
    assert_eq!(env.accounts.username_lookups(), 0);
}

#[tokio::test]
async fn test_non_basic_scheme_is_anonymous() {
    let env = TestEnv::new(vec![TestAccounts::alice()]);
    let mut ctx = request_with_authorization("Bearer some.jwt.token");

    let user = env.service.get_user(&mut ctx).await.unwrap();

    assert!(!user.is_authenticated);
}

#[tokio::test]
async fn test_authorization_takes_precedence_over_cookie() {
    // Given a valid session for alice and Basic credentials for admin
    let env = TestEnv::new(vec![TestAccounts::alice(), TestAccounts::admin()]);
    let session_id = env.login(&TestAccounts::alice()).await;
    let mut ctx = request_with_session(&session_id);
    let token = general_purpose::STANDARD.encode("admin:admin-pass");
    let mut headers = ctx.headers().clone();
    headers.insert(
        http::header::AUTHORIZATION,
        http::HeaderValue::from_str(&format!("basic {token}")).unwrap(),
    );
    ctx = session_auth::RequestContext::new(headers);

    // When resolving
    let user = env.service.get_user(&mut ctx).await.unwrap();

    // Then the header wins and the session is never consulted
    assert_eq!(user.username, "admin");
    assert!(user.is_superuser);
    assert!(ctx.session().is_none());
}

#[tokio::test]
async fn test_ambiguous_email_is_not_a_credential_failure() {
    // Given two accounts sharing an email modulo case
    let mut twin = TestAccounts::admin();
    twin.email = "ALICE@X.COM".to_string();
    let env = TestEnv::new(vec![TestAccounts::alice(), twin]);

    let result = env.service.authenticate("alice@x.com", "s3cret").await;

    let err = result.unwrap_err();
    assert!(matches!(err, AuthError::User(UserError::Ambiguous(_))));
    assert!(!err.is_invalid_credentials());
    assert!(!err.is_client_error());
}
