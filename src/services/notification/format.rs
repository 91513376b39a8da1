//! Channel-specific formatting of an enriched enquiry.
//!
//! Everything here is deterministic over its inputs: missing optionals
//! become explicit placeholders, unknown service-type codes pass through
//! verbatim, and timestamps render in fixed AEST for the Slack message.

use chrono::FixedOffset;

use super::enrich::EnrichedEnquiry;
use super::template::TemplateStore;

pub const EMAIL_SUBJECT: &str = "Your Enquiry Has Been Received";
pub const EMAIL_TEMPLATE: &str = "enquiry_received";

const NOT_PROVIDED: &str = "Not provided";
const NONE_PROVIDED: &str = "None provided";
const UNKNOWN_NAME: &str = "Unknown";
const EMAIL_GREETING_FALLBACK: &str = "Valued Customer";

/// Formatted confirmation email
#[derive(Debug, Clone, PartialEq)]
pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

/// Maps a raw service-type code to its display label. Total: unknown
/// codes pass through unchanged instead of erroring.
pub fn service_label(service_type: &str) -> String {
    match service_type {
        "both" => "Buyer Agent and Mortgage Broker Services".to_string(),
        "buyer_agent" => "Buyer Agent Services".to_string(),
        "mortgage_broker" => "Mortgage Broker Services".to_string(),
        other => other.to_string(),
    }
}

fn or_placeholder(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

/// Formats an enriched enquiry as a Slack mrkdwn message.
pub fn chat_message(record: &EnrichedEnquiry) -> String {
    let contact = &record.contact;
    let enquiry = &record.enquiry;

    // Display timezone is fixed to AEST (UTC+10)
    let aest = FixedOffset::east_opt(10 * 3600).expect("valid fixed offset");
    let submitted = enquiry
        .created_at
        .with_timezone(&aest)
        .format("%d/%m/%Y, %H:%M:%S AEST");

    format!(
        "*New Enquiry Received*\n\n\
         *Name:* {} {}\n\
         *Email:* {}\n\
         *Phone:* {}\n\
         *Service Type:* {}\n\
         *Budget Range:* {}\n\
         *Additional Info:* {}\n\
         *State:* {}\n\
         *Submitted:* {}\n",
        or_placeholder(contact.first_name.as_deref(), UNKNOWN_NAME),
        or_placeholder(contact.last_name.as_deref(), UNKNOWN_NAME),
        or_placeholder(contact.email.as_deref(), NOT_PROVIDED),
        or_placeholder(contact.phone.as_deref(), NOT_PROVIDED),
        service_label(&enquiry.service_type),
        enquiry.budget_range,
        or_placeholder(enquiry.additional_info.as_deref(), NONE_PROVIDED),
        or_placeholder(enquiry.state.as_deref(), NOT_PROVIDED),
        submitted,
    )
}

/// Formats the confirmation email for the enquirer.
///
/// An unreadable template is downgraded to a fixed plain fallback body
/// so the email channel still attempts delivery.
pub fn email_content(record: &EnrichedEnquiry, templates: &TemplateStore) -> EmailContent {
    let first_name = or_placeholder(
        record.contact.first_name.as_deref(),
        EMAIL_GREETING_FALLBACK,
    );
    let service = service_label(&record.enquiry.service_type);
    let additional_info =
        or_placeholder(record.enquiry.additional_info.as_deref(), NONE_PROVIDED);

    let data = [
        ("firstName", first_name.as_str()),
        ("serviceType", service.as_str()),
        ("budgetRange", record.enquiry.budget_range.as_str()),
        ("additionalInfo", additional_info.as_str()),
    ];

    let html = match templates.render(EMAIL_TEMPLATE, &data) {
        Ok(html) => html,
        Err(e) => {
            log::error!("Falling back to plain email body: {}", e);
            fallback_body(&first_name, &service, &record.enquiry.budget_range)
        }
    };

    EmailContent {
        subject: EMAIL_SUBJECT.to_string(),
        html,
    }
}

fn fallback_body(first_name: &str, service: &str, budget_range: &str) -> String {
    format!(
        "<p>Dear {},</p>\
         <p>Thank you for your enquiry about {}. We have received your details \
         (budget range: {}) and a member of our team will be in touch shortly.</p>\
         <p>Kind regards,<br>The Leadbox Team</p>",
        first_name, service, budget_range
    )
}
