//! Unit tests for configuration parsing
//!
//! Tests environment variable parsing and default values.
//!
//! Note: These tests modify global environment variables and must run serially.

use leadbox::config::{DispatchMode, NotifyConfig, SmtpConfig};
use serial_test::serial;

const NOTIFY_VARS: &[&str] = &[
    "SLACK_ENQUIRIES_WEBHOOK",
    "MAIL_HOST",
    "MAIL_PORT",
    "MAIL_SECURE",
    "MAIL_USER",
    "MAIL_PASSWORD",
    "MAIL_FROM",
    "MAIL_REPLY_TO",
    "MAIL_RECIPIENT_OVERRIDE",
    "NOTIFY_DISPATCH",
    "TEMPLATE_DIR",
];

fn clear_notify_vars() {
    for var in NOTIFY_VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_notify_config_defaults() {
    clear_notify_vars();

    let config = NotifyConfig::from_env();

    assert!(config.slack_webhook_url.is_none());
    assert!(config.recipient_override.is_none());
    assert_eq!(config.dispatch, DispatchMode::Spawn);
    assert_eq!(config.template_dir, "templates");
    assert!(config.smtp.host.is_none());
    assert_eq!(config.smtp.port, 465);
    assert!(config.smtp.secure);
    assert_eq!(config.smtp.from_address, "enquiries@leadbox.local");
    assert_eq!(config.smtp.reply_to, "support@leadbox.local");
}

#[test]
#[serial]
fn test_notify_config_custom_values() {
    clear_notify_vars();
    std::env::set_var(
        "SLACK_ENQUIRIES_WEBHOOK",
        "https://hooks.slack.com/services/T000/B000/XXX",
    );
    std::env::set_var("MAIL_HOST", "smtp.zoho.com");
    std::env::set_var("MAIL_PORT", "587");
    std::env::set_var("MAIL_SECURE", "false");
    std::env::set_var("MAIL_RECIPIENT_OVERRIDE", "qa@example.com");
    std::env::set_var("NOTIFY_DISPATCH", "await");

    let config = NotifyConfig::from_env();

    assert_eq!(
        config.slack_webhook_url.as_deref(),
        Some("https://hooks.slack.com/services/T000/B000/XXX")
    );
    assert_eq!(config.smtp.host.as_deref(), Some("smtp.zoho.com"));
    assert_eq!(config.smtp.port, 587);
    assert!(!config.smtp.secure);
    assert_eq!(config.recipient_override.as_deref(), Some("qa@example.com"));
    assert_eq!(config.dispatch, DispatchMode::Await);

    clear_notify_vars();
}

#[test]
#[serial]
fn test_smtp_config_invalid_port_uses_default() {
    clear_notify_vars();
    std::env::set_var("MAIL_PORT", "not-a-number");

    let config = SmtpConfig::from_env();

    assert_eq!(config.port, 465);

    clear_notify_vars();
}

#[test]
#[serial]
fn test_empty_recipient_override_is_ignored() {
    clear_notify_vars();
    std::env::set_var("MAIL_RECIPIENT_OVERRIDE", "");

    let config = NotifyConfig::from_env();

    assert!(config.recipient_override.is_none());

    clear_notify_vars();
}

#[test]
#[serial]
fn test_unknown_dispatch_mode_defaults_to_spawn() {
    clear_notify_vars();
    std::env::set_var("NOTIFY_DISPATCH", "queue");

    let config = NotifyConfig::from_env();

    assert_eq!(config.dispatch, DispatchMode::Spawn);

    clear_notify_vars();
}
