//! Notification orchestrator.
//!
//! Drives one enquiry through enrichment and both channel sends. Chat
//! and email depend on different external systems with unrelated failure
//! modes, so their outcomes are collected independently; the orchestrator
//! itself never returns an error, callers observe logs and the report.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::enrich::{enrich, EnrichError, EnrichedEnquiry};
use super::format;
use super::store::EnquiryStore;
use super::template::TemplateStore;
use super::{ChatSender, EmailSender, OutgoingEmail};

/// Outcome of one channel within a notification run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ChannelOutcome {
    Sent,
    /// Transport or formatting failure
    Failed(String),
    /// The channel was never attempted (e.g. no resolvable recipient)
    Skipped(String),
}

impl ChannelOutcome {
    fn from_send(outcome: super::SendOutcome) -> Self {
        if outcome.success {
            ChannelOutcome::Sent
        } else {
            ChannelOutcome::Failed(outcome.detail.unwrap_or_else(|| "unknown error".to_string()))
        }
    }
}

/// Composite result of a notification run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum NotifyReport {
    /// The enquiry does not exist; no sends were attempted
    EnquiryNotFound,
    /// Enrichment errored before any send
    EnrichmentFailed { detail: String },
    /// Both channels ran to completion (each with its own outcome)
    Dispatched {
        chat: ChannelOutcome,
        email: ChannelOutcome,
    },
}

/// Fans out notifications for newly created enquiries.
///
/// All collaborators are injected: the record store, both channel
/// senders, and the template store. There are no global clients.
pub struct Notifier {
    store: Arc<dyn EnquiryStore>,
    chat: Arc<dyn ChatSender>,
    email: Arc<dyn EmailSender>,
    templates: TemplateStore,
}

impl Notifier {
    pub fn new(
        store: Arc<dyn EnquiryStore>,
        chat: Arc<dyn ChatSender>,
        email: Arc<dyn EmailSender>,
        templates: TemplateStore,
    ) -> Self {
        Self {
            store,
            chat,
            email,
            templates,
        }
    }

    /// Runs the full pipeline for one enquiry id.
    ///
    /// Never returns an error: enrichment failure short-circuits with a
    /// logged report, per-channel failures are logged and collected. A
    /// chat failure does not block the email send, and vice versa.
    pub async fn notify_new_enquiry(&self, enquiry_id: Uuid) -> NotifyReport {
        log::info!("Processing notifications for enquiry {}", enquiry_id);

        let record = match enrich(self.store.as_ref(), enquiry_id).await {
            Ok(record) => record,
            Err(EnrichError::NotFound(id)) => {
                log::error!("No enquiry found with id {}, skipping notifications", id);
                return NotifyReport::EnquiryNotFound;
            }
            Err(e) => {
                log::error!("Enrichment failed: {}", e);
                return NotifyReport::EnrichmentFailed {
                    detail: e.to_string(),
                };
            }
        };

        let chat = self.notify_chat(&record).await;
        let email = self.notify_email(&record).await;

        log::info!(
            "Notification run for enquiry {} done (chat: {:?}, email: {:?})",
            enquiry_id,
            chat,
            email
        );

        NotifyReport::Dispatched { chat, email }
    }

    async fn notify_chat(&self, record: &EnrichedEnquiry) -> ChannelOutcome {
        let message = format::chat_message(record);
        let outcome = self.chat.send(&message).await;

        if outcome.success {
            log::info!("Slack notification sent for enquiry {}", record.enquiry.id);
        } else {
            log::warn!(
                "Slack notification failed for enquiry {}: {}",
                record.enquiry.id,
                outcome.detail.as_deref().unwrap_or("unknown error")
            );
        }

        ChannelOutcome::from_send(outcome)
    }

    async fn notify_email(&self, record: &EnrichedEnquiry) -> ChannelOutcome {
        let recipient = match self.resolve_recipient(record).await {
            Some(address) => address,
            None => {
                log::warn!(
                    "Cannot send confirmation email for enquiry {}: no recipient address",
                    record.enquiry.id
                );
                return ChannelOutcome::Skipped("no recipient address".to_string());
            }
        };

        let content = format::email_content(record, &self.templates);
        let email = OutgoingEmail {
            to: recipient,
            subject: content.subject,
            html: content.html,
            enquiry_ref: record.enquiry.id.to_string(),
        };

        let outcome = self.email.send(&email).await;

        if outcome.success {
            log::info!(
                "Confirmation email sent for enquiry {}",
                record.enquiry.id
            );
        } else {
            log::warn!(
                "Confirmation email failed for enquiry {}: {}",
                record.enquiry.id,
                outcome.detail.as_deref().unwrap_or("unknown error")
            );
        }

        ChannelOutcome::from_send(outcome)
    }

    /// Resolves a deliverable address: the contact resolved during
    /// enrichment first, then one direct re-fetch of the linked user's
    /// email as a last resort.
    async fn resolve_recipient(&self, record: &EnrichedEnquiry) -> Option<String> {
        if let Some(email) = &record.contact.email {
            return Some(email.clone());
        }

        let user_id = record.enquiry.user_id?;
        match self.store.get_user_email(user_id).await {
            Ok(email) => email.filter(|e| !e.trim().is_empty()),
            Err(e) => {
                log::warn!(
                    "Fallback email lookup failed for user {}: {}",
                    user_id,
                    e
                );
                None
            }
        }
    }
}
