use anyhow::Context as _;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::domain::email::OutgoingEmail;
use crate::domain::repository::Mailer;
use crate::error::ApiError;

const IMPLICIT_TLS_PORT: u16 = 465;

/// SMTP delivery through a pooled lettre transport.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Address,
}

impl SmtpMailer {
    /// Build the transport. No connection is opened until the first send.
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        }
        .with_context(|| format!("configure SMTP relay {}", config.host))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(config.user.clone(), config.pass.clone()))
            .build();
        let from = config
            .from
            .parse::<Address>()
            .with_context(|| format!("parse EMAIL_FROM {:?}", config.from))?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, email: &OutgoingEmail) -> anyhow::Result<Message> {
        let from = Mailbox::new(Some(email.from_name.to_string()), self.from.clone());
        let to = email
            .to
            .parse::<Mailbox>()
            .with_context(|| format!("parse recipient {:?}", email.to))?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML);
        if let Some(reply_to) = &email.reply_to {
            builder = builder.reply_to(
                reply_to
                    .parse::<Mailbox>()
                    .with_context(|| format!("parse reply-to {reply_to:?}"))?,
            );
        }
        builder.body(email.html.clone()).context("build email")
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), ApiError> {
        let message = self.build_message(&email)?;
        self.transport
            .send(message)
            .await
            .with_context(|| format!("send email to {}", email.to))?;
        tracing::info!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}
