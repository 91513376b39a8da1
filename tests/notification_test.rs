//! End-to-end tests for the notification pipeline using injected fakes.
//!
//! Covers enrichment failure handling, channel independence, recipient
//! resolution and the template fallback, without touching a database or
//! the network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;

use leadbox::error::{AppError, AppResult};
use leadbox::models::{Enquiry, User};
use leadbox::services::notification::{
    ChannelOutcome, ChatSender, EmailSender, EnquiryStore, Notifier, NotifyReport, OutgoingEmail,
    SendOutcome, TemplateStore,
};

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct FakeStore {
    enquiries: HashMap<Uuid, Enquiry>,
    users: HashMap<Uuid, User>,
    /// When true, every user lookup errors (simulates a store outage on
    /// the user table only)
    user_lookups_fail: bool,
    /// When true, `get_user` returns None while `get_user_email` still
    /// resolves. Exercises the orchestrator's direct fallback re-fetch.
    hide_user_from_join: bool,
}

#[async_trait]
impl EnquiryStore for FakeStore {
    async fn get_enquiry(&self, id: Uuid) -> AppResult<Option<Enquiry>> {
        Ok(self.enquiries.get(&id).cloned())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<Option<User>> {
        if self.user_lookups_fail {
            return Err(AppError::Internal("user table unavailable".to_string()));
        }
        if self.hide_user_from_join {
            return Ok(None);
        }
        Ok(self.users.get(&id).cloned())
    }

    async fn get_user_email(&self, id: Uuid) -> AppResult<Option<String>> {
        if self.user_lookups_fail {
            return Err(AppError::Internal("user table unavailable".to_string()));
        }
        Ok(self.users.get(&id).map(|u| u.email.clone()))
    }
}

struct FakeChat {
    succeed: bool,
    sent: Mutex<Vec<String>>,
}

impl FakeChat {
    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn messages(&self) -> Vec<String> {
        self.sent.lock().expect("chat lock").clone()
    }
}

#[async_trait]
impl ChatSender for FakeChat {
    async fn send(&self, text: &str) -> SendOutcome {
        self.sent.lock().expect("chat lock").push(text.to_string());
        if self.succeed {
            SendOutcome::success()
        } else {
            SendOutcome::failure("webhook returned 500".to_string())
        }
    }
}

struct FakeEmail {
    succeed: bool,
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl FakeEmail {
    fn new(succeed: bool) -> Self {
        Self {
            succeed,
            sent: Mutex::new(Vec::new()),
        }
    }

    fn messages(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().expect("email lock").clone()
    }
}

#[async_trait]
impl EmailSender for FakeEmail {
    async fn send(&self, email: &OutgoingEmail) -> SendOutcome {
        self.sent.lock().expect("email lock").push(email.clone());
        if self.succeed {
            SendOutcome::success()
        } else {
            SendOutcome::failure("SMTP connection refused".to_string())
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn enquiry(id: Uuid, user_id: Option<Uuid>) -> Enquiry {
    Enquiry {
        id,
        first_name: None,
        last_name: None,
        email: None,
        phone: None,
        service_type: "both".to_string(),
        budget_range: "$10k-$20k".to_string(),
        additional_info: None,
        state: None,
        user_id,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 2, 30, 0).unwrap(),
    }
}

fn user(id: Uuid) -> User {
    User {
        id,
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone: None,
        password_hash: None,
        is_admin: false,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

struct Harness {
    notifier: Notifier,
    chat: Arc<FakeChat>,
    email: Arc<FakeEmail>,
}

fn harness(store: FakeStore, chat_ok: bool, email_ok: bool) -> Harness {
    let chat = Arc::new(FakeChat::new(chat_ok));
    let email = Arc::new(FakeEmail::new(email_ok));
    let notifier = Notifier::new(
        Arc::new(store),
        chat.clone(),
        email.clone(),
        TemplateStore::new("templates"),
    );
    Harness {
        notifier,
        chat,
        email,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn unknown_enquiry_produces_no_sends() {
    let h = harness(FakeStore::default(), true, true);

    let report = h.notifier.notify_new_enquiry(Uuid::new_v4()).await;

    assert_eq!(report, NotifyReport::EnquiryNotFound);
    assert!(h.chat.messages().is_empty());
    assert!(h.email.messages().is_empty());
}

#[tokio::test]
async fn notifies_both_channels_for_enquiry_with_user() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    store.enquiries.insert(enquiry_id, enquiry(enquiry_id, Some(user_id)));
    store.users.insert(user_id, user(user_id));
    let h = harness(store, true, true);

    let report = h.notifier.notify_new_enquiry(enquiry_id).await;

    assert_eq!(
        report,
        NotifyReport::Dispatched {
            chat: ChannelOutcome::Sent,
            email: ChannelOutcome::Sent,
        }
    );

    let chat_messages = h.chat.messages();
    assert_eq!(chat_messages.len(), 1);
    assert!(chat_messages[0].contains("Buyer Agent and Mortgage Broker Services"));
    assert!(chat_messages[0].contains("*Name:* Jane Doe"));
    assert!(chat_messages[0].contains("*State:* Not provided"));

    let emails = h.email.messages();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, "jane@example.com");
    assert_eq!(emails[0].subject, "Your Enquiry Has Been Received");
    assert_eq!(emails[0].enquiry_ref, enquiry_id.to_string());
}

#[tokio::test]
async fn failed_user_lookup_degrades_but_still_attempts_chat() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    store.enquiries.insert(enquiry_id, enquiry(enquiry_id, Some(user_id)));
    store.users.insert(user_id, user(user_id));
    store.user_lookups_fail = true;
    let h = harness(store, true, true);

    let report = h.notifier.notify_new_enquiry(enquiry_id).await;

    // Chat goes out with placeholders; email has no resolvable recipient
    // because the user lookup and the fallback re-fetch both fail
    assert_eq!(
        report,
        NotifyReport::Dispatched {
            chat: ChannelOutcome::Sent,
            email: ChannelOutcome::Skipped("no recipient address".to_string()),
        }
    );

    let chat_messages = h.chat.messages();
    assert_eq!(chat_messages.len(), 1);
    assert!(chat_messages[0].contains("*Name:* Unknown Unknown"));
    assert!(chat_messages[0].contains("*Email:* Not provided"));
    assert!(h.email.messages().is_empty());
}

#[tokio::test]
async fn dangling_user_id_skips_email_with_no_recipient() {
    let enquiry_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    // user_id points at a user that does not exist
    store
        .enquiries
        .insert(enquiry_id, enquiry(enquiry_id, Some(Uuid::new_v4())));
    let h = harness(store, true, true);

    let report = h.notifier.notify_new_enquiry(enquiry_id).await;

    assert_eq!(
        report,
        NotifyReport::Dispatched {
            chat: ChannelOutcome::Sent,
            email: ChannelOutcome::Skipped("no recipient address".to_string()),
        }
    );
    assert!(h.email.messages().is_empty());
}

#[tokio::test]
async fn chat_failure_does_not_block_email() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    store.enquiries.insert(enquiry_id, enquiry(enquiry_id, Some(user_id)));
    store.users.insert(user_id, user(user_id));
    let h = harness(store, false, true);

    let report = h.notifier.notify_new_enquiry(enquiry_id).await;

    assert_eq!(
        report,
        NotifyReport::Dispatched {
            chat: ChannelOutcome::Failed("webhook returned 500".to_string()),
            email: ChannelOutcome::Sent,
        }
    );

    let emails = h.email.messages();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].to, "jane@example.com");
}

#[tokio::test]
async fn email_failure_does_not_affect_chat() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    store.enquiries.insert(enquiry_id, enquiry(enquiry_id, Some(user_id)));
    store.users.insert(user_id, user(user_id));
    let h = harness(store, true, false);

    let report = h.notifier.notify_new_enquiry(enquiry_id).await;

    assert_eq!(
        report,
        NotifyReport::Dispatched {
            chat: ChannelOutcome::Sent,
            email: ChannelOutcome::Failed("SMTP connection refused".to_string()),
        }
    );
    assert_eq!(h.chat.messages().len(), 1);
}

#[tokio::test]
async fn top_level_contact_fields_win_over_user_record() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    let mut row = enquiry(enquiry_id, Some(user_id));
    row.email = Some("form@example.com".to_string());
    row.first_name = Some("Janet".to_string());
    store.enquiries.insert(enquiry_id, row);
    store.users.insert(user_id, user(user_id));
    let h = harness(store, true, true);

    h.notifier.notify_new_enquiry(enquiry_id).await;

    let emails = h.email.messages();
    assert_eq!(emails[0].to, "form@example.com");
    assert!(h.chat.messages()[0].contains("*Name:* Janet Doe"));
}

#[tokio::test]
async fn recipient_falls_back_to_direct_user_email_fetch() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    store.enquiries.insert(enquiry_id, enquiry(enquiry_id, Some(user_id)));
    store.users.insert(user_id, user(user_id));
    store.hide_user_from_join = true;
    let h = harness(store, true, true);

    let report = h.notifier.notify_new_enquiry(enquiry_id).await;

    // The join returned no user, so the contact has no email; the
    // orchestrator's direct re-fetch of the user's address supplies it
    assert!(matches!(
        report,
        NotifyReport::Dispatched {
            email: ChannelOutcome::Sent,
            ..
        }
    ));
    assert_eq!(h.email.messages()[0].to, "jane@example.com");
}

#[tokio::test]
async fn missing_template_still_delivers_with_fallback_body() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    store.enquiries.insert(enquiry_id, enquiry(enquiry_id, Some(user_id)));
    store.users.insert(user_id, user(user_id));

    let chat = Arc::new(FakeChat::new(true));
    let email = Arc::new(FakeEmail::new(true));
    let notifier = Notifier::new(
        Arc::new(store),
        chat.clone(),
        email.clone(),
        TemplateStore::new("/nonexistent-template-dir"),
    );

    let report = notifier.notify_new_enquiry(enquiry_id).await;

    assert!(matches!(
        report,
        NotifyReport::Dispatched {
            email: ChannelOutcome::Sent,
            ..
        }
    ));
    let emails = email.messages();
    assert_eq!(emails.len(), 1);
    assert!(emails[0].html.contains("Dear Jane"));
}

#[tokio::test]
async fn repeated_runs_send_identical_chat_messages() {
    let enquiry_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let mut store = FakeStore::default();
    store.enquiries.insert(enquiry_id, enquiry(enquiry_id, Some(user_id)));
    store.users.insert(user_id, user(user_id));
    let h = harness(store, true, true);

    h.notifier.notify_new_enquiry(enquiry_id).await;
    h.notifier.notify_new_enquiry(enquiry_id).await;

    let messages = h.chat.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], messages[1]);
}
