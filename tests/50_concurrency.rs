mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use folio_api::client::{ClientError, CrudScreen};
use folio_api::config::AppConfig;
use folio_api::database::models::{Skill, SkillDraft};

const WRITE_DELAY: Duration = Duration::from_millis(300);

fn rust() -> SkillDraft {
    SkillDraft { name: "Rust".into(), category: "Backend".into(), proficiency_level: 5 }
}

#[tokio::test]
async fn duplicate_submission_is_rejected_by_the_service() -> Result<()> {
    common::init_tracing();
    let server = common::TestServer::spawn_with(AppConfig::in_memory(), WRITE_DELAY).await?;
    let client = server.signed_in().await?;
    let token = client.token().expect("token");

    let http = server.http();
    let send = |http: reqwest::Client| {
        let url = server.url("/admin/skills");
        let token = token.clone();
        let draft = rust();
        async move { http.post(url).bearer_auth(token).json(&draft).send().await }
    };

    let (a, b) = tokio::join!(send(http.clone()), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        send(http.clone()).await
    });
    let mut statuses = vec![a?.status(), b?.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

    assert_eq!(client.list::<Skill>().await?.len(), 1);
    assert_eq!(server.state.submissions.in_flight(), 0);

    // the guard is released, so the next submission goes through
    let res = send(http).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn busy_response_carries_its_own_code() -> Result<()> {
    let server = common::TestServer::spawn_with(AppConfig::in_memory(), WRITE_DELAY).await?;
    let client = server.signed_in().await?;
    let draft = rust();

    let (first, second) = tokio::join!(client.create::<Skill>(&draft), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        server
            .http()
            .post(server.url("/admin/skills"))
            .bearer_auth(client.token().expect("token"))
            .json(&json!({ "name": "Go", "category": "Backend" }))
            .send()
            .await
    });
    first?;
    let second = second?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = second.json().await?;
    assert_eq!(body["code"], json!("SUBMISSION_IN_PROGRESS"));
    Ok(())
}

#[tokio::test]
async fn different_users_do_not_block_each_other() -> Result<()> {
    let server = common::TestServer::spawn_with(AppConfig::in_memory(), WRITE_DELAY).await?;
    let alice = server.signed_in().await?;
    let bob = server.signed_in().await?;
    let draft = rust();

    let (a, b) = tokio::join!(alice.create::<Skill>(&draft), bob.create::<Skill>(&draft));
    a?;
    b?;
    assert_eq!(alice.list::<Skill>().await?.len(), 2);
    Ok(())
}

#[tokio::test]
async fn screen_rejects_duplicate_submission_locally() -> Result<()> {
    let server = common::TestServer::spawn_with(AppConfig::in_memory(), WRITE_DELAY).await?;
    let screen = CrudScreen::<Skill>::new(server.signed_in().await?);
    let writes = server.writes();

    let (first, second) = tokio::join!(screen.create(rust()), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(screen.is_submitting());
        screen.create(rust()).await
    });

    first?;
    assert!(matches!(second, Err(ClientError::Busy)));
    assert!(!screen.is_submitting());
    assert_eq!(screen.rows().len(), 1);
    assert_eq!(server.writes(), writes + 1);
    Ok(())
}
