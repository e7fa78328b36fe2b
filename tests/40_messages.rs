mod common;

use anyhow::Result;
use reqwest::StatusCode;
use uuid::Uuid;

use folio_api::client::{FolioClient, InboxScreen, Notice};
use folio_api::database::models::{ContactForm, ContactMessage};

async fn leave_message(client: &FolioClient, subject: &str) -> Result<ContactMessage> {
    Ok(client
        .contact(&ContactForm {
            name: "Visitor".into(),
            email: "visitor@example.com".into(),
            subject: Some(subject.into()),
            message: format!("About {}", subject),
        })
        .await?)
}

#[tokio::test]
async fn inbox_lists_newest_first() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let public = server.client();
    let first = leave_message(&public, "first").await?;
    let second = leave_message(&public, "second").await?;

    let admin = server.signed_in().await?;
    let ids: Vec<Uuid> = admin.messages().await?.into_iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let dashboard = admin.dashboard().await?;
    assert_eq!(dashboard["unread_messages"], serde_json::json!(2));
    Ok(())
}

#[tokio::test]
async fn mark_read_writes_exactly_once() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let message = leave_message(&server.client(), "hello").await?;
    let admin = server.signed_in().await?;

    // viewing has no side effect
    let before = server.writes();
    assert!(!admin.message(message.id).await?.read);
    assert_eq!(server.writes(), before);

    let read = admin.mark_read(message.id).await?;
    assert!(read.read);
    assert_eq!(server.writes(), before + 1);

    let again = admin.mark_read(message.id).await?;
    assert!(again.read);
    assert_eq!(server.writes(), before + 1);
    Ok(())
}

#[tokio::test]
async fn inbox_screen_open_splices_read_flag() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let public = server.client();
    let hello = leave_message(&public, "hello").await?;
    leave_message(&public, "other").await?;

    let inbox = InboxScreen::new(server.signed_in().await?);
    inbox.load().await?;
    assert_eq!(inbox.unread_count(), 2);

    let writes = server.writes();
    let opened = inbox.open(hello.id).await?.expect("loaded message");
    assert!(opened.read);
    assert_eq!(inbox.unread_count(), 1);
    assert_eq!(server.writes(), writes + 1);

    // second open is local only
    assert!(inbox.open(hello.id).await?.expect("loaded message").read);
    assert_eq!(server.writes(), writes + 1);

    assert!(inbox.open(Uuid::new_v4()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn inbox_screen_delete_removes_locally() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let message = leave_message(&server.client(), "spam").await?;
    let admin = server.signed_in().await?;

    let inbox = InboxScreen::new(admin.clone());
    inbox.load().await?;
    inbox.delete(message.id).await?;
    assert!(inbox.messages().is_empty());
    assert_eq!(inbox.take_notices(), vec![Notice::Success("Message deleted successfully".into())]);

    assert!(admin.messages().await?.is_empty());
    assert_eq!(admin.delete_message(message.id).await.unwrap_err().status(), Some(404));
    Ok(())
}

#[tokio::test]
async fn mark_read_of_unknown_message_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let admin = server.signed_in().await?;

    let res = server
        .http()
        .post(server.url(&format!("/admin/messages/{}/read", Uuid::new_v4())))
        .bearer_auth(admin.token().expect("token"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
