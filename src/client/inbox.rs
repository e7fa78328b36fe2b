use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

use uuid::Uuid;

use crate::client::screen::{Notice, Submitting};
use crate::client::{ClientError, FolioClient};
use crate::database::models::ContactMessage;

/// Message inbox. Unlike [`CrudScreen`](crate::client::CrudScreen), the
/// mark-as-read and delete paths splice local state instead of refetching.
/// As there, a call rejected with [`ClientError::Busy`] records no notice.
pub struct InboxScreen {
    client: FolioClient,
    messages: Mutex<Vec<ContactMessage>>,
    notices: Mutex<Vec<Notice>>,
    submitting: AtomicBool,
}

impl InboxScreen {
    pub fn new(client: FolioClient) -> Self {
        Self {
            client,
            messages: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            submitting: AtomicBool::new(false),
        }
    }

    /// Newest first, as served.
    pub fn messages(&self) -> Vec<ContactMessage> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn unread_count(&self) -> usize {
        self.messages().iter().filter(|m| !m.read).count()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub async fn load(&self) -> Result<(), ClientError> {
        match self.client.messages().await {
            Ok(messages) => {
                *self.messages.lock().unwrap_or_else(|e| e.into_inner()) = messages;
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::Error("Failed to load messages".into()));
                Err(e)
            }
        }
    }

    /// Opens a loaded message. Marks it read on the server only when the
    /// local copy is unread, then splices `read = true` locally; opening it
    /// again makes no call. `None` when the id is not loaded.
    pub async fn open(&self, id: Uuid) -> Result<Option<ContactMessage>, ClientError> {
        let Some(message) = self.local(id) else {
            return Ok(None);
        };
        if message.read {
            return Ok(Some(message));
        }

        let _submitting = Submitting::begin(&self.submitting)?;
        match self.client.mark_read(id).await {
            Ok(_) => {
                let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
                let mut opened = message;
                for m in messages.iter_mut().filter(|m| m.id == id) {
                    m.read = true;
                    opened = m.clone();
                }
                Ok(Some(opened))
            }
            Err(e) => {
                self.notify(Notice::Error("Failed to mark message as read".into()));
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let _submitting = Submitting::begin(&self.submitting)?;
        match self.client.delete_message(id).await {
            Ok(()) => {
                self.messages.lock().unwrap_or_else(|e| e.into_inner()).retain(|m| m.id != id);
                self.notify(Notice::Success("Message deleted successfully".into()));
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::Error("Failed to delete message".into()));
                Err(e)
            }
        }
    }

    fn local(&self, id: Uuid) -> Option<ContactMessage> {
        self.messages().into_iter().find(|m| m.id == id)
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).push(notice);
    }
}
