mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use folio_api::client::{ClientError, Gate, SessionState};
use folio_api::config::AppConfig;
use folio_api::database::models::Credentials;

const ADMIN_PATHS: &[&str] = &[
    "/admin",
    "/admin/profile",
    "/admin/experience",
    "/admin/education",
    "/admin/skills",
    "/admin/messages",
    "/admin/projects",
];

async fn assert_redirects_to_login(server: &common::TestServer, token: Option<&str>) -> Result<()> {
    let http = server.http();
    for path in ADMIN_PATHS {
        let mut req = http.get(server.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        let res = req.send().await?;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{} should redirect", path);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/auth"),
            "{} should redirect to the sign-in landing",
            path
        );
    }
    Ok(())
}

#[tokio::test]
async fn admin_routes_redirect_when_signed_out() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    assert_redirects_to_login(&server, None).await?;
    assert_redirects_to_login(&server, Some("not-a-jwt")).await?;

    // writes are gated too
    let res = server
        .http()
        .post(server.url("/admin/skills"))
        .json(&json!({ "name": "Rust", "category": "Languages" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(server.writes(), 0);
    Ok(())
}

#[tokio::test]
async fn signup_login_and_session_lookup() -> Result<()> {
    common::init_tracing();
    let server = common::TestServer::spawn().await?;
    let email = common::unique_email();

    let res = server
        .http()
        .post(server.url("/auth/signup"))
        .json(&json!({ "email": email, "password": common::PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(cookie.starts_with("folio_session="), "unexpected cookie: {}", cookie);

    let client = server.client();
    let session = client.login(&Credentials::new(email.to_uppercase(), common::PASSWORD)).await?;
    assert_eq!(session.user.email, email);
    assert!(session.expires_in > 0);

    let me = client.session().await?.expect("signed in");
    assert_eq!(me.user_id, session.user.user_id);

    let dashboard = client.dashboard().await?;
    assert_eq!(dashboard["user"]["email"], json!(email));
    assert_eq!(dashboard["unread_messages"], json!(0));
    Ok(())
}

#[tokio::test]
async fn session_cookie_opens_admin_routes() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = server.signed_in().await?;
    let token = client.token().expect("token");

    let res = server
        .http()
        .get(server.url("/admin/skills"))
        .header(header::COOKIE, format!("folio_session={}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let email = common::unique_email();
    server.client().signup(&Credentials::new(email.clone(), common::PASSWORD)).await?;

    let wrong_password = server.client().login(&Credentials::new(email, "nope-nope")).await.unwrap_err();
    let unknown_email = server
        .client()
        .login(&Credentials::new(common::unique_email(), common::PASSWORD))
        .await
        .unwrap_err();

    assert_eq!(wrong_password.status(), Some(401));
    assert_eq!(unknown_email.status(), Some(401));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    Ok(())
}

#[tokio::test]
async fn signup_rules() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let email = common::unique_email();

    let short = server.client().signup(&Credentials::new(email.clone(), "12345")).await.unwrap_err();
    match short {
        ClientError::Status { status: 400, field_errors: Some(fields), .. } => {
            assert!(fields.get("password").is_some());
        }
        other => panic!("expected validation error, got {:?}", other),
    }

    server.client().signup(&Credentials::new(email.clone(), common::PASSWORD)).await?;
    let duplicate = server.client().signup(&Credentials::new(email, common::PASSWORD)).await.unwrap_err();
    assert_eq!(duplicate.status(), Some(409));
    Ok(())
}

#[tokio::test]
async fn signup_can_be_disabled() -> Result<()> {
    let mut config = AppConfig::in_memory();
    config.security.allow_signup = false;
    let server = common::TestServer::spawn_with(config, std::time::Duration::ZERO).await?;

    let err = server
        .client()
        .signup(&Credentials::new(common::unique_email(), common::PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));

    let landing: Value = server.http().get(server.url("/auth")).send().await?.json().await?;
    assert_eq!(landing["data"]["signup_enabled"], json!(false));
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = server.signed_in().await?;
    let token = client.token().expect("token");

    client.logout().await?;
    assert!(client.token().is_none());

    assert_redirects_to_login(&server, Some(&token)).await?;
    let session: Value = server
        .http()
        .get(server.url("/auth/session"))
        .bearer_auth(&token)
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(session["data"], Value::Null);
    Ok(())
}

#[tokio::test]
async fn refresh_replaces_the_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let client = server.signed_in().await?;
    let old = client.token().expect("token");

    let refreshed = client.refresh().await?;
    assert_ne!(refreshed.token, old);
    assert_eq!(client.token().as_deref(), Some(refreshed.token.as_str()));

    client.list::<folio_api::database::models::Skill>().await?;
    assert_redirects_to_login(&server, Some(&old)).await?;
    Ok(())
}

#[tokio::test]
async fn signed_out_client_sees_signed_out_error() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let err = server.client().dashboard().await.unwrap_err();
    assert!(matches!(err, ClientError::SignedOut), "got {:?}", err);
    Ok(())
}

#[tokio::test]
async fn session_state_tracks_sign_in_and_out() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let state = SessionState::new(server.client());
    let mut updates = state.subscribe();

    assert_eq!(state.require_user(), Gate::Loading);
    assert!(state.initialize().await.is_none());
    assert_eq!(state.require_user(), Gate::Redirect("/auth"));

    let email = common::unique_email();
    let user = state.sign_up(&Credentials::new(email.clone(), common::PASSWORD)).await?;
    assert_eq!(user.email, email);
    assert!(updates.has_changed()?);
    assert_eq!(updates.borrow_and_update().user.as_ref().map(|u| u.email.clone()), Some(email));
    assert!(matches!(state.require_user(), Gate::Allowed(_)));

    // a fresh state over the same client restores the session from the service
    let restored = SessionState::new(state.client().clone());
    assert_eq!(restored.initialize().await.map(|u| u.user_id), Some(user.user_id));

    state.sign_out().await?;
    assert_eq!(state.require_user(), Gate::Redirect("/auth"));
    assert!(restored.client().token().is_none());
    Ok(())
}
