use edusoft_backend::config::EmailConfig;
use edusoft_backend::util::email::{
    confirmation_template, password_reset_template, validate_email_address, EmailError, EmailMessage, EmailSender,
    LogEmailSender, SmtpEmailService, CONFIRMATION_SUBJECT, PASSWORD_RESET_SUBJECT,
};

/// Initialize tracing for tests
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();
}

/// Create test email service
fn create_test_service() -> SmtpEmailService {
    SmtpEmailService::new(EmailConfig::from_test_env()).expect("Failed to create test email service")
}

#[test]
fn test_email_message_with_bodies() {
    let message = EmailMessage::new("test@example.com".to_string(), "Subject".to_string())
        .with_text_body("text".to_string())
        .with_html_body("<p>html</p>".to_string());

    assert_eq!(message.to, "test@example.com");
    assert_eq!(message.text_body.as_deref(), Some("text"));
    assert_eq!(message.html_body.as_deref(), Some("<p>html</p>"));
}

#[test]
fn test_confirmation_template() {
    let url = "http://localhost:5173/confirm-email/abc123";
    let (text, html) = confirmation_template("Ada", url);

    assert!(text.contains("Hello Ada"));
    assert!(text.contains(url));
    assert!(text.contains("24 hours"));
    assert!(html.contains("EduSoft"));
    assert!(html.contains("Confirm Email"));
    assert!(html.contains(url));
}

#[test]
fn test_password_reset_template() {
    let url = "http://localhost:5173/reset-password?token=abc123&type=user";
    let (text, html) = password_reset_template("Ada", url);

    assert!(text.contains(url));
    assert!(text.contains("1 hour"));
    assert!(html.contains("Reset Password"));
    // the query separator is escaped inside the href attribute
    assert!(html.contains("token=abc123&amp;type=user"));
}

#[test]
fn test_template_escapes_names() {
    let (_, html) = confirmation_template("<script>alert(1)</script>", "http://localhost/confirm-email/x");
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn test_validate_email_address() {
    assert!(validate_email_address("user@example.com").is_ok());
    assert!(matches!(validate_email_address(""), Err(EmailError::AddressError(_))));
    assert!(validate_email_address("no-at-sign").is_err());
    assert!(validate_email_address("@example.com").is_err());
    assert!(validate_email_address("user@").is_err());
    assert!(validate_email_address("a@b@c").is_err());
}

#[tokio::test]
async fn test_build_multipart_message() {
    init_tracing();
    let service = create_test_service();
    let (text, html) = confirmation_template("Ada", "http://localhost/confirm-email/x");
    let message = EmailMessage::new("ada@example.com".to_string(), CONFIRMATION_SUBJECT.to_string())
        .with_text_body(text)
        .with_html_body(html);

    let built = service.build_message(message).expect("message should build");
    let raw = String::from_utf8_lossy(&built.formatted()).to_string();
    assert!(raw.contains("Subject: Confirm your EduSoft account"));
    assert!(raw.contains("multipart/alternative"));
    assert!(raw.contains("noreply@edusoft.test"));
}

#[tokio::test]
async fn test_build_message_requires_a_body() {
    let service = create_test_service();
    let message = EmailMessage::new("ada@example.com".to_string(), PASSWORD_RESET_SUBJECT.to_string());
    assert!(matches!(service.build_message(message), Err(EmailError::MessageError(_))));
}

#[tokio::test]
async fn test_build_message_rejects_bad_recipient() {
    let service = create_test_service();
    let message = EmailMessage::new("not an address".to_string(), "Subject".to_string())
        .with_text_body("body".to_string());
    assert!(matches!(service.build_message(message), Err(EmailError::AddressError(_))));
}

#[tokio::test]
async fn test_log_sender_accepts_valid_recipients() {
    init_tracing();
    let sender = LogEmailSender { reveal_links: false };
    assert!(sender
        .send_confirmation_email("ada@example.com", "Ada", "http://localhost/confirm-email/x")
        .await
        .is_ok());
    assert!(sender
        .send_password_reset_email("", "Ada", "http://localhost/reset-password?token=x&type=user")
        .await
        .is_err());
}
