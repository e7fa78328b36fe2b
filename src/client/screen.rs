use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use uuid::Uuid;

use crate::client::{ClientError, FolioClient};
use crate::crud::{Entity, Form};

/// Toast-style outcome of a screen action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Held while a submission is in flight; clears the flag on drop.
pub(crate) struct Submitting<'a>(&'a AtomicBool);

impl<'a> Submitting<'a> {
    pub(crate) fn begin(flag: &'a AtomicBool) -> Result<Self, ClientError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Submitting(flag))
            .map_err(|_| ClientError::Busy)
    }
}

impl Drop for Submitting<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// List/create/edit/delete state for one admin table.
///
/// Local rows are a cache: every successful mutation is followed by a full
/// refetch. A failed action leaves the rows untouched and records an error
/// notice. While one submission is in flight, others fail with
/// [`ClientError::Busy`] and record no notice; the in-flight submission
/// reports the outcome.
pub struct CrudScreen<E: Entity> {
    client: FolioClient,
    rows: Mutex<Vec<E>>,
    notices: Mutex<Vec<Notice>>,
    submitting: AtomicBool,
}

impl<E: Entity> CrudScreen<E> {
    pub fn new(client: FolioClient) -> Self {
        Self {
            client,
            rows: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn rows(&self) -> Vec<E> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn find(&self, id: Uuid) -> Option<E> {
        self.rows().into_iter().find(|r| r.id() == id)
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Drains pending notices.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub async fn load(&self) -> Result<(), ClientError> {
        match self.client.list::<E>().await {
            Ok(rows) => {
                *self.rows.lock().unwrap_or_else(|e| e.into_inner()) = rows;
                Ok(())
            }
            Err(e) => {
                self.notify(Notice::Error(format!("Failed to load {}", E::LABEL.to_lowercase())));
                Err(e)
            }
        }
    }

    pub async fn create(&self, draft: E::Draft) -> Result<E, ClientError> {
        let _submitting = Submitting::begin(&self.submitting)?;
        self.check(&draft, "create")?;
        let result = self.client.create::<E>(&draft).await;
        self.finish(result, "created", "create").await
    }

    pub async fn update(&self, id: Uuid, patch: E::Patch) -> Result<E, ClientError> {
        let _submitting = Submitting::begin(&self.submitting)?;
        self.check(&patch, "update")?;
        let result = self.client.update::<E>(id, &patch).await;
        self.finish(result, "updated", "update").await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ClientError> {
        let _submitting = Submitting::begin(&self.submitting)?;
        let result = self.client.delete::<E>(id).await;
        self.finish(result, "deleted", "delete").await
    }

    fn check<F: Form>(&self, form: &F, verb: &str) -> Result<(), ClientError> {
        form.validate().map_err(|errors| {
            self.notify(Notice::Error(format!("Failed to {} {}: {}", verb, E::LABEL.to_lowercase(), errors)));
            ClientError::Invalid(errors)
        })
    }

    async fn finish<T>(&self, result: Result<T, ClientError>, done: &str, verb: &str) -> Result<T, ClientError> {
        match result {
            Ok(value) => {
                self.notify(Notice::Success(format!("{} {} successfully", E::LABEL, done)));
                // a failed refetch records its own notice
                let _ = self.load().await;
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(table = %E::TABLE, "Failed to {} {}: {}", verb, E::LABEL, e);
                self.notify(Notice::Error(format!("Failed to {} {}", verb, E::LABEL.to_lowercase())));
                Err(e)
            }
        }
    }

    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap_or_else(|e| e.into_inner()).push(notice);
    }
}
