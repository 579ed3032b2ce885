use crate::config::{EmailConfig, ConfigError};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use tracing::{error, info, instrument, warn};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

/// Outgoing account mail. Delivery failures are reported to the caller, which
/// decides whether they matter.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_confirmation_email(&self, to: &str, name: &str, confirmation_url: &str) -> Result<(), EmailError>;
    async fn send_password_reset_email(&self, to: &str, name: &str, reset_url: &str) -> Result<(), EmailError>;
}

/// Email message builder
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: String, subject: String) -> Self {
        Self {
            to,
            subject,
            text_body: None,
            html_body: None,
        }
    }

    pub fn with_text_body(mut self, body: String) -> Self {
        self.text_body = Some(body);
        self
    }

    pub fn with_html_body(mut self, body: String) -> Self {
        self.html_body = Some(body);
        self
    }
}

pub const CONFIRMATION_SUBJECT: &str = "Confirm your EduSoft account";
pub const PASSWORD_RESET_SUBJECT: &str = "Password Reset Request - EduSoft";

const BASE_STYLE: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { background-color: #1e3a8a; color: #ffffff; padding: 20px; text-align: center; border-radius: 8px 8px 0 0; }
        .content { background-color: #ffffff; padding: 30px; border: 1px solid #dee2e6; }
        .button { display: inline-block; padding: 12px 24px; background-color: #2563eb; color: #ffffff; text-decoration: none; border-radius: 4px; font-weight: bold; margin: 20px 0; }
        .link { word-break: break-all; background-color: #f8f9fa; padding: 10px; border-radius: 4px; }
        .footer { background-color: #f8f9fa; padding: 15px; text-align: center; font-size: 12px; color: #6c757d; border-radius: 0 0 8px 8px; }
"#;

fn render_html(title: &str, greeting_name: &str, paragraphs: &[&str], button_label: &str, url: &str, note: &str) -> String {
    let name = html_escape::encode_text(greeting_name);
    let url = html_escape::encode_double_quoted_attribute(url);
    let body: String = paragraphs
        .iter()
        .map(|p| format!("        <p>{}</p>\n", html_escape::encode_text(p)))
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="header">
        <h1>EduSoft</h1>
        <h2>{title}</h2>
    </div>
    <div class="content">
        <p>Hello {name},</p>
{body}        <div style="text-align: center;">
            <a href="{url}" class="button">{button_label}</a>
        </div>
        <p>Or copy and paste this link into your browser:</p>
        <p class="link">{url}</p>
        <p>{note}</p>
        <p>Best regards,<br>The EduSoft Team</p>
    </div>
    <div class="footer">
        <p>This is an automated message. Please do not reply to this email.</p>
    </div>
</body>
</html>"#,
        title = title,
        style = BASE_STYLE,
        name = name,
        body = body,
        url = url,
        button_label = button_label,
        note = html_escape::encode_text(note),
    )
}

/// Text and HTML bodies for the signup confirmation mail
pub fn confirmation_template(name: &str, confirmation_url: &str) -> (String, String) {
    let text = format!(
        r#"Hello {name},

Welcome to EduSoft! Please confirm your email address to activate your account:

{confirmation_url}

This link expires in 24 hours. If you did not create an account, you can ignore this email.

Best regards,
The EduSoft Team"#
    );
    let html = render_html(
        "Confirm your email",
        name,
        &["Welcome to EduSoft! Please confirm your email address to activate your account."],
        "Confirm Email",
        confirmation_url,
        "This link expires in 24 hours. If you did not create an account, you can ignore this email.",
    );
    (text, html)
}

/// Text and HTML bodies for the password reset mail
pub fn password_reset_template(name: &str, reset_url: &str) -> (String, String) {
    let text = format!(
        r#"Hello {name},

We received a request to reset the password of your EduSoft account.

To choose a new password, open the following link:

{reset_url}

This link will expire in 1 hour. If you did not request a password reset, please ignore this email. Your password will remain unchanged.

Best regards,
The EduSoft Team

---
This is an automated message. Please do not reply to this email."#
    );
    let html = render_html(
        "Password Reset Request",
        name,
        &[
            "We received a request to reset the password of your EduSoft account.",
            "To choose a new password, click the button below:",
        ],
        "Reset Password",
        reset_url,
        "This link will expire in 1 hour. If you didn't request this reset, please ignore this email.",
    );
    (text, html)
}

/// SMTP email service implementation
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailService {
    /// Create a new SMTP email service
    #[instrument(skip(config), fields(host = %config.smtp_host, port = config.smtp_port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        info!("Initializing SMTP email service");

        config.validate().map_err(EmailError::from)?;

        let mut transport_builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .timeout(Some(std::time::Duration::from_secs(config.connection_timeout_secs)));

        if config.use_tls {
            let tls_parameters = TlsParameters::new(config.smtp_host.clone())
                .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;

            if config.use_starttls {
                transport_builder = transport_builder.tls(Tls::Required(tls_parameters));
            } else {
                transport_builder = transport_builder.tls(Tls::Wrapper(tls_parameters));
            }
        } else {
            transport_builder = transport_builder.tls(Tls::None);
        }

        if config.has_credentials() {
            let credentials = Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            );
            transport_builder = transport_builder.credentials(credentials);
        }

        let transport = transport_builder.build();

        info!("SMTP email service initialized successfully");
        Ok(Self { config, transport })
    }

    /// Send an email message
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    pub async fn send_email(&self, message: EmailMessage) -> Result<(), EmailError> {
        validate_email_address(&message.to)?;

        let email_message = self.build_message(message)?;

        self.transport
            .send(email_message)
            .await
            .map_err(|e| {
                error!("Failed to send email: {}", e);
                EmailError::SmtpError(format!("Failed to send email: {}", e))
            })?;

        info!("Email sent successfully");
        Ok(())
    }

    /// Build a lettre Message from EmailMessage
    pub fn build_message(&self, email_message: EmailMessage) -> Result<Message, EmailError> {
        let from_mailbox: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email_message.to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        let message_builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email_message.subject);

        match (email_message.text_body, email_message.html_body) {
            (Some(text), Some(html)) => message_builder
                .multipart(
                    MultiPart::alternative()
                        .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(text))
                        .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html)),
                )
                .map_err(|e| EmailError::MessageError(format!("Failed to build multipart message: {}", e))),
            (Some(text), None) => message_builder
                .body(text)
                .map_err(|e| EmailError::MessageError(format!("Failed to build text message: {}", e))),
            (None, Some(html)) => message_builder
                .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html))
                .map_err(|e| EmailError::MessageError(format!("Failed to build HTML message: {}", e))),
            (None, None) => Err(EmailError::MessageError("No message body provided".to_string())),
        }
    }
}

#[async_trait]
impl EmailSender for SmtpEmailService {
    async fn send_confirmation_email(&self, to: &str, name: &str, confirmation_url: &str) -> Result<(), EmailError> {
        let (text, html) = confirmation_template(name, confirmation_url);
        let message = EmailMessage::new(to.to_string(), CONFIRMATION_SUBJECT.to_string())
            .with_text_body(text)
            .with_html_body(html);
        self.send_email(message).await
    }

    async fn send_password_reset_email(&self, to: &str, name: &str, reset_url: &str) -> Result<(), EmailError> {
        let (text, html) = password_reset_template(name, reset_url);
        let message = EmailMessage::new(to.to_string(), PASSWORD_RESET_SUBJECT.to_string())
            .with_text_body(text)
            .with_html_body(html);
        self.send_email(message).await
    }
}

/// Used when no SMTP relay is configured. Links are only written to the log
/// when `reveal_links` is set, which the application does in development.
#[derive(Debug, Clone, Default)]
pub struct LogEmailSender {
    pub reveal_links: bool,
}

impl LogEmailSender {
    fn log(&self, kind: &str, to: &str, url: &str) {
        if self.reveal_links {
            info!(to = %to, link = %url, "{} email not sent (no SMTP relay configured)", kind);
        } else {
            warn!(to = %to, "{} email not sent (no SMTP relay configured)", kind);
        }
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send_confirmation_email(&self, to: &str, _name: &str, confirmation_url: &str) -> Result<(), EmailError> {
        validate_email_address(to)?;
        self.log("Confirmation", to, confirmation_url);
        Ok(())
    }

    async fn send_password_reset_email(&self, to: &str, _name: &str, reset_url: &str) -> Result<(), EmailError> {
        validate_email_address(to)?;
        self.log("Password reset", to, reset_url);
        Ok(())
    }
}

/// Validate email address format
pub fn validate_email_address(email: &str) -> Result<(), EmailError> {
    if email.is_empty() {
        return Err(EmailError::AddressError("Email address cannot be empty".to_string()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(EmailError::AddressError("Invalid email format".to_string()));
    }

    Ok(())
}
