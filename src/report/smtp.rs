use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};

use crate::config::SmtpSettings;

use super::{Notifier, NotifyError};

pub const USERNAME_VAR: &str = "TRIP_LEDGER_SMTP_USERNAME";
pub const PASSWORD_VAR: &str = "TRIP_LEDGER_SMTP_PASSWORD";
pub const ADDRESS_VAR: &str = "TRIP_LEDGER_SMTP_ADDRESS";

/// Mailbox login, kept out of the config file.
#[derive(Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
    /// Sender and recipient; defaults to the username.
    pub address: String,
}

impl SmtpCredentials {
    /// Reads the login from the environment (a `.env` file is loaded at startup).
    pub fn from_env() -> Result<Self, NotifyError> {
        let username =
            std::env::var(USERNAME_VAR).map_err(|_| NotifyError::MissingCredential(USERNAME_VAR))?;
        let password =
            std::env::var(PASSWORD_VAR).map_err(|_| NotifyError::MissingCredential(PASSWORD_VAR))?;
        let address = std::env::var(ADDRESS_VAR).unwrap_or_else(|_| username.clone());
        Ok(Self {
            username,
            password,
            address,
        })
    }
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("address", &self.address)
            .finish()
    }
}

/// Mails the report to the account owner over implicit-TLS SMTP.
#[derive(Debug, Clone)]
pub struct SmtpNotifier {
    settings: SmtpSettings,
    credentials: SmtpCredentials,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings, credentials: SmtpCredentials) -> Self {
        Self {
            settings,
            credentials,
        }
    }

    fn message(&self, subject: &str, body: &str) -> Result<Message, NotifyError> {
        let mailbox: Mailbox = self
            .credentials
            .address
            .parse()
            .map_err(|e| NotifyError::InvalidAddress(format!("{e}")))?;
        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = self.message(subject, body)?;
        let transport = SmtpTransport::relay(&self.settings.host)
            .map_err(|e| NotifyError::Send(e.to_string()))?
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.credentials.username.clone(),
                self.credentials.password.clone(),
            ))
            .build();
        transport
            .send(&message)
            .map_err(|e| NotifyError::Send(e.to_string()))?;
        Ok(())
    }
}
