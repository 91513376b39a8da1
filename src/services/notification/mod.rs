//! Enquiry notification fan-out.
//!
//! When a new enquiry lands, the pipeline enriches it (joining the
//! optional user record), formats it, and delivers it over two
//! independent channels: a Slack webhook for the team and a confirmation
//! email for the enquirer. Channels are isolated behind traits so one
//! channel's outage never suppresses the other, and tests can inject
//! fakes.

pub mod email;
pub mod enrich;
pub mod format;
pub mod notifier;
pub mod slack;
pub mod store;
pub mod template;

use async_trait::async_trait;

pub use email::SmtpMailer;
pub use enrich::{enrich, EnrichError, EnrichedEnquiry};
pub use notifier::{ChannelOutcome, Notifier, NotifyReport};
pub use slack::SlackSender;
pub use store::{EnquiryStore, PgStore};
pub use template::{TemplateError, TemplateStore};

// =============================================================================
// Send Outcome
// =============================================================================

/// Result of a single channel delivery attempt. Senders report failure
/// through this instead of raising, so callers only ever branch on a
/// boolean.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub success: bool,
    /// Failure detail for the logs
    pub detail: Option<String>,
}

impl SendOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            detail: None,
        }
    }

    pub fn failure(detail: String) -> Self {
        Self {
            success: false,
            detail: Some(detail),
        }
    }
}

// =============================================================================
// Channel Sender Traits
// =============================================================================

/// Posts a formatted text message to the team chat
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send(&self, text: &str) -> SendOutcome;
}

/// A confirmation email ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Enquiry id, attached as a stable reference header for thread
    /// correlation
    pub enquiry_ref: String,
}

/// Delivers a confirmation email to the enquirer
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> SendOutcome;
}
