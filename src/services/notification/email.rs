//! Email channel sender.
//!
//! Delivers the confirmation email over SMTP using lettre. The recipient
//! is validated before any network I/O; a missing address is reported
//! distinctly from a transport failure so the orchestrator can log it as
//! a skipped send rather than a broken one.

use async_trait::async_trait;
use lettre::message::header::{ContentType, Header, HeaderName, HeaderValue};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;

use super::{EmailSender, OutgoingEmail, SendOutcome};

/// Reference header tying the email to its enquiry, for downstream
/// thread correlation in the mailbox.
#[derive(Debug, Clone)]
struct EntityRefId(String);

impl Header for EntityRefId {
    fn name() -> HeaderName {
        HeaderName::new_from_ascii_str("X-Entity-Ref-ID")
    }

    fn parse(s: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(Self(s.to_string()))
    }

    fn display(&self) -> HeaderValue {
        HeaderValue::new(Self::name(), self.0.clone())
    }
}

/// SMTP-backed email sender
pub struct SmtpMailer {
    config: SmtpConfig,
    /// Redirects every send to a fixed address in test environments
    recipient_override: Option<String>,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig, recipient_override: Option<String>) -> Self {
        if let Some(ref addr) = recipient_override {
            log::warn!("MAIL_RECIPIENT_OVERRIDE set, all email will be sent to {}", addr);
        }

        Self {
            config,
            recipient_override,
        }
    }

    fn build_transport(
        &self,
        host: &str,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendOutcome> {
        // Implicit TLS (SMTPS, typically port 465) vs STARTTLS (587)
        let builder = if self.config.secure {
            let tls_params = TlsParameters::new(host.to_string()).map_err(|e| {
                SendOutcome::failure(format!("Invalid TLS parameters for SMTP host: {}", e))
            })?;

            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map(|b| b.port(self.config.port).tls(Tls::Wrapper(tls_params)))
                .map_err(|e| SendOutcome::failure(format!("Invalid SMTP host: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map(|b| b.port(self.config.port))
                .map_err(|e| SendOutcome::failure(format!("Invalid SMTP host: {}", e)))?
        };

        let transport = if let (Some(username), Some(password)) =
            (&self.config.username, &self.config.password)
        {
            builder
                .credentials(Credentials::new(username.clone(), password.clone()))
                .build()
        } else {
            builder.build()
        };

        Ok(transport)
    }
}

#[async_trait]
impl EmailSender for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> SendOutcome {
        // Fail fast before any network call when there is nobody to
        // deliver to
        if email.to.trim().is_empty() {
            return SendOutcome::failure("No recipient address".to_string());
        }

        let host = match &self.config.host {
            Some(h) => h,
            None => return SendOutcome::failure("SMTP host not configured".to_string()),
        };

        let recipient = self.recipient_override.as_deref().unwrap_or(&email.to);

        let from = match self.config.from_address.parse() {
            Ok(addr) => addr,
            Err(e) => {
                return SendOutcome::failure(format!(
                    "Invalid sender address {}: {}",
                    self.config.from_address, e
                ))
            }
        };

        let reply_to = match self.config.reply_to.parse() {
            Ok(addr) => addr,
            Err(e) => {
                return SendOutcome::failure(format!(
                    "Invalid reply-to address {}: {}",
                    self.config.reply_to, e
                ))
            }
        };

        let to = match recipient.parse() {
            Ok(addr) => addr,
            Err(e) => {
                return SendOutcome::failure(format!(
                    "Invalid recipient address {}: {}",
                    recipient, e
                ))
            }
        };

        let message = match Message::builder()
            .from(from)
            .reply_to(reply_to)
            .to(to)
            .subject(&email.subject)
            .header(EntityRefId(email.enquiry_ref.clone()))
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())
        {
            Ok(message) => message,
            Err(e) => return SendOutcome::failure(format!("Failed to build email: {}", e)),
        };

        let transport = match self.build_transport(host) {
            Ok(t) => t,
            Err(outcome) => return outcome,
        };

        match transport.send(message).await {
            Ok(response) => {
                log::debug!(
                    "Confirmation email accepted for {}: {:?}",
                    recipient,
                    response.message().collect::<Vec<_>>()
                );
                SendOutcome::success()
            }
            Err(e) => SendOutcome::failure(format!(
                "Failed to send email to {}: {}",
                recipient, e
            )),
        }
    }
}
