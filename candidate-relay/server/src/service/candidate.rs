use std::{collections::HashMap, sync::Arc};

use candidate_relay_core::{
    address::Recipients,
    content::{self, EmailContent},
    model::{
        Candidate, CandidateField, CandidateUpdate, NewCandidate, RecipientClass,
        VisibilityMatrix,
    },
    CANDIDATES_COLLECTION, RECIPIENT_SELECTIONS_COLLECTION,
};
use chrono::Utc;
use notification::{Notification, NotificationClient};
use relay_metrics::RelayMetrics;
use serde::{de::DeserializeOwned, Serialize};
use snafu::{OptionExt, ResultExt};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::error::{self, Error, Result};
use crate::{
    entity::{RecipientSelection, SendEmailRequest, SendEmailResponse},
    store::{Record, RecordStore},
};

/// Candidate capture, visibility editing, preview and sending.
///
/// Writes to one candidate are serialized so that concurrent edits of its
/// record or matrix never overwrite each other.
#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn RecordStore>,
    mailer: Arc<dyn NotificationClient>,
    metrics: RelayMetrics,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl CandidateService {
    #[inline]
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        mailer: Arc<dyn NotificationClient>,
        metrics: RelayMetrics,
    ) -> Self {
        Self { store, mailer, metrics, locks: Arc::default() }
    }

    /// Captures a candidate and stores its default visibility matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or the store fails.
    #[tracing::instrument(skip_all, fields(name = %new_candidate.name))]
    pub async fn create(&self, new_candidate: NewCandidate) -> Result<Candidate> {
        let candidate = new_candidate.into_candidate(Uuid::new_v4().to_string(), Utc::now())?;

        let record = to_record(CANDIDATES_COLLECTION, &candidate)?;
        let _id = self.store.put(CANDIDATES_COLLECTION, record).await?;
        self.save_matrix(&candidate.id, VisibilityMatrix::for_candidate(&candidate)).await?;

        self.metrics.candidate_created();
        tracing::info!(id = %candidate.id, "Candidate created");

        Ok(candidate)
    }

    /// # Errors
    ///
    /// Returns an error if the candidate does not exist or the store fails.
    pub async fn get(&self, id: &str) -> Result<Candidate> {
        let record = self
            .store
            .get(CANDIDATES_COLLECTION, id)
            .await?
            .context(error::CandidateNotFoundSnafu { id })?;

        from_record(CANDIDATES_COLLECTION, record)
    }

    /// Lists candidates in capture order, optionally filtered by `search`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Candidate>> {
        let records = self.store.list_all(CANDIDATES_COLLECTION).await?;

        let mut candidates = Vec::with_capacity(records.len());
        for record in records {
            let candidate: Candidate = from_record(CANDIDATES_COLLECTION, record)?;
            if candidate.matches_search(search.unwrap_or_default()) {
                candidates.push(candidate);
            }
        }
        Ok(candidates)
    }

    /// Edits a candidate. Fields it gained get an all-visible matrix entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate does not exist, the edit is invalid
    /// or the store fails.
    #[tracing::instrument(skip(self, update))]
    pub async fn update(&self, id: &str, update: CandidateUpdate) -> Result<Candidate> {
        let _guard = self.lock_candidate(id).await;

        let mut candidate = self.get(id).await?;
        update.apply(&mut candidate)?;

        // The whole record is written back: a shallow merge would keep keys the
        // edit removed, such as a cleared `customFields`.
        let record = to_record(CANDIDATES_COLLECTION, &candidate)?;
        let _id = self.store.put(CANDIDATES_COLLECTION, record).await?;

        let mut matrix = self.load_matrix(id).await?.unwrap_or_default();
        if matrix.reconcile(&candidate) {
            self.save_matrix(id, matrix).await?;
        }

        Ok(candidate)
    }

    /// Deletes a candidate together with its visibility matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate does not exist or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock_candidate(id).await;

        if !self.store.delete(CANDIDATES_COLLECTION, id).await? {
            return error::CandidateNotFoundSnafu { id }.fail();
        }
        let _had_matrix = self.store.delete(RECIPIENT_SELECTIONS_COLLECTION, id).await?;

        tracing::info!("Candidate deleted");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the candidate or its matrix does not exist, or the
    /// store fails.
    pub async fn visibility(&self, id: &str) -> Result<VisibilityMatrix> {
        let _candidate = self.get(id).await?;
        self.load_matrix(id).await?.context(error::VisibilityNotFoundSnafu { id })
    }

    /// Replaces the whole matrix of a candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate does not exist or the store fails.
    pub async fn replace_visibility(
        &self,
        id: &str,
        matrix: VisibilityMatrix,
    ) -> Result<VisibilityMatrix> {
        let _guard = self.lock_candidate(id).await;

        let _candidate = self.get(id).await?;
        self.save_matrix(id, matrix.clone()).await?;
        Ok(matrix)
    }

    /// # Errors
    ///
    /// Returns an error if the candidate, its matrix or the matrix entry for
    /// `field` does not exist, or the store fails.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_visibility(
        &self,
        id: &str,
        field: CandidateField,
        class: RecipientClass,
    ) -> Result<VisibilityMatrix> {
        let _guard = self.lock_candidate(id).await;

        let mut matrix = self.visibility(id).await?;
        let visible = matrix.toggle(field, class)?;
        self.save_matrix(id, matrix.clone()).await?;

        tracing::debug!(visible, "Visibility toggled");
        Ok(matrix)
    }

    /// Shows or hides every field for `class`.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate or its matrix does not exist, or the
    /// store fails.
    #[tracing::instrument(skip(self))]
    pub async fn set_visibility_for_class(
        &self,
        id: &str,
        class: RecipientClass,
        visible: bool,
    ) -> Result<VisibilityMatrix> {
        let _guard = self.lock_candidate(id).await;

        let mut matrix = self.visibility(id).await?;
        matrix.set_all(class, visible);
        self.save_matrix(id, matrix.clone()).await?;
        Ok(matrix)
    }

    /// # Errors
    ///
    /// Returns an error if the candidate or its matrix does not exist, or the
    /// store fails.
    pub async fn preview(&self, id: &str, class: RecipientClass) -> Result<EmailContent> {
        let (candidate, matrix) = self.candidate_with_matrix(id).await?;
        Ok(content::generate_email(&candidate, class, &matrix)?)
    }

    /// Emails for every recipient class, in `client`, `internal`,
    /// `superiors` order.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate or its matrix does not exist, or the
    /// store fails.
    pub async fn preview_all(&self, id: &str) -> Result<Vec<EmailContent>> {
        let (candidate, matrix) = self.candidate_with_matrix(id).await?;
        Ok(RecipientClass::ALL
            .into_iter()
            .map(|class| content::generate_email(&candidate, class, &matrix))
            .collect::<candidate_relay_core::Result<_>>()?)
    }

    /// Validates the addresses, generates the email for `class` and hands it
    /// to the mail sender. Nothing is sent when any address is malformed.
    ///
    /// # Errors
    ///
    /// Returns an error if the candidate or its matrix does not exist, an
    /// address is malformed, or the mail sender fails.
    #[tracing::instrument(skip(self, request))]
    pub async fn send(
        &self,
        id: &str,
        class: RecipientClass,
        request: SendEmailRequest,
    ) -> Result<SendEmailResponse> {
        let (candidate, matrix) = self.candidate_with_matrix(id).await?;

        let SendEmailRequest { to, cc, bcc, subject } = request;
        let recipients = Recipients::parse(&to, cc.as_deref(), bcc.as_deref())?;

        let mut email = content::generate_email(&candidate, class, &matrix)?;
        if let Some(subject) = subject.map(|subject| subject.trim().to_string()) {
            if !subject.is_empty() {
                email.subject = subject;
            }
        }

        let notification = Notification::HtmlEmail {
            to: recipients.to.into_inner(),
            cc: recipients.cc.into_inner(),
            bcc: recipients.bcc.into_inner(),
            subject: email.subject,
            html: email.html,
        };

        if let Err(err) = self.mailer.send_notification(&notification).await {
            self.metrics.email_failed(class.as_str(), err.reason());
            return Err(Error::from(err));
        }
        self.metrics.email_sent(class.as_str());

        let Notification::HtmlEmail { to, cc, bcc, subject, .. } = notification;
        tracing::info!(to = ?to, "Candidate email sent");

        Ok(SendEmailResponse { recipient: class, subject, to, cc, bcc })
    }

    async fn lock_candidate(&self, id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // entries nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id.to_string()).or_default())
        };
        lock.lock_owned().await
    }

    async fn candidate_with_matrix(&self, id: &str) -> Result<(Candidate, VisibilityMatrix)> {
        let candidate = self.get(id).await?;
        let matrix =
            self.load_matrix(id).await?.context(error::VisibilityNotFoundSnafu { id })?;
        Ok((candidate, matrix))
    }

    async fn load_matrix(&self, id: &str) -> Result<Option<VisibilityMatrix>> {
        let Some(record) = self.store.get(RECIPIENT_SELECTIONS_COLLECTION, id).await? else {
            return Ok(None);
        };
        let selection: RecipientSelection = from_record(RECIPIENT_SELECTIONS_COLLECTION, record)?;
        Ok(Some(selection.field_visibility))
    }

    async fn save_matrix(&self, id: &str, matrix: VisibilityMatrix) -> Result<()> {
        let selection =
            RecipientSelection { candidate_id: id.to_string(), field_visibility: matrix };
        let mut record = to_record(RECIPIENT_SELECTIONS_COLLECTION, &selection)?;
        let _ = record.insert("id".to_string(), serde_json::Value::String(id.to_string()));

        let _id = self.store.put(RECIPIENT_SELECTIONS_COLLECTION, record).await?;
        Ok(())
    }
}

fn to_record<T: Serialize>(collection: &'static str, value: &T) -> Result<Record> {
    match serde_json::to_value(value).context(error::EncodeRecordSnafu { collection })? {
        serde_json::Value::Object(record) => Ok(record),
        other => Err(Error::EncodeRecord {
            collection,
            source: <serde_json::Error as serde::ser::Error>::custom(format!(
                "expected an object, got {other}"
            )),
        }),
    }
}

fn from_record<T: DeserializeOwned>(collection: &'static str, record: Record) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(record))
        .context(error::DecodeRecordSnafu { collection })
}
