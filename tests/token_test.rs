//! Integration tests for token issuance and validation.

mod helpers;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{Duration, Utc};
use portal_auth::jwt::TokenService;
use portal_core::ErrorKind;
use portal_entity::user::{Role, authorities_of};

#[tokio::test]
async fn test_login_token_round_trip() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("frank", "secret", Role::Manager).await;

    let result = app.state.login("frank", "secret").await.unwrap();
    assert_eq!(result.token.header_name, "Jwt-Token");

    let claims = app.state.tokens.validate(&result.token.token).unwrap();
    assert_eq!(claims.sub, "frank");
    assert_eq!(claims.authorities, authorities_of(Role::Manager));

    let ctx = app.state.authorize(&result.token.token).unwrap();
    assert_eq!(ctx.role, Role::Manager);
}

#[tokio::test]
async fn test_super_admin_can_log_in() {
    let app = helpers::TestApp::new().await;
    let ctx = app.login_as("supportPortal", "root-password").await;
    assert_eq!(ctx.role, Role::SuperAdmin);
    assert!(ctx.has_authority("user:delete"));
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.create_test_user("gina", "secret", Role::User).await;

    let ttl = app.state.tokens.ttl();
    let issued = app
        .state
        .tokens
        .issue_at(&user, Utc::now() - ttl - Duration::seconds(5))
        .unwrap();

    let err = app.state.authorize(&issued.token).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenExpired);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("hank", "secret", Role::User).await;
    let result = app.state.login("hank", "secret").await.unwrap();

    let (head, signature) = result.token.token.rsplit_once('.').unwrap();
    let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
    bytes[0] ^= 0x80;
    let tampered = format!("{head}.{}", URL_SAFE_NO_PAD.encode(bytes));

    let err = app.state.authorize(&tampered).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_token_from_other_deployment_is_rejected() {
    let app = helpers::TestApp::new().await;
    let user = app.create_test_user("ivy", "secret", Role::User).await;

    let mut other = helpers::test_config();
    other.auth.jwt_secret = "someone-elses-secret".to_string();
    let foreign = TokenService::new(&other.auth)
        .unwrap()
        .issue(&user)
        .unwrap();

    let err = app.state.authorize(&foreign.token).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenInvalid);
}

#[tokio::test]
async fn test_token_outlives_lockout() {
    let app = helpers::TestApp::new().await;
    app.create_test_user("jack", "secret", Role::User).await;
    let result = app.state.login("jack", "secret").await.unwrap();

    for _ in 0..5 {
        app.state.login("jack", "wrong").await.unwrap_err();
    }
    assert!(app.user("jack").await.is_locked());

    assert!(app.state.authorize(&result.token.token).is_ok());
}
