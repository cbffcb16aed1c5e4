// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Transactional alert mails over an SMTP relay.
//!
//! Mail is a side effect: [`Mailer::notify`] never fails the request that
//! triggered it.

use crate::config::SmtpConfig;
use anyhow::Context;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// SMTP mailer. Clones share the connection pool.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<(AsyncSmtpTransport<Tokio1Executor>, Mailbox)>,
}

impl Mailer {
    /// Connect to the configured relay, or build a disabled mailer.
    pub fn new(config: Option<&SmtpConfig>) -> anyhow::Result<Self> {
        let Some(smtp) = config else {
            tracing::info!("SMTP not configured, alert mails disabled");
            return Ok(Self::disabled());
        };

        let from: Mailbox = smtp
            .from
            .parse()
            .with_context(|| format!("invalid MAIL_FROM address: {}", smtp.from))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host)
            .context("failed to configure SMTP relay")?
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();

        tracing::info!(host = %smtp.host, "SMTP relay configured");

        Ok(Self {
            transport: Some((transport, from)),
        })
    }

    /// A mailer that drops every message.
    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    /// Send a plain-text mail.
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let Some((transport, from)) = &self.transport else {
            return Ok(());
        };

        let message = build_message(from.clone(), to, subject, body)?;
        transport
            .send(message)
            .await
            .context("SMTP send failed")?;
        Ok(())
    }

    /// Send a mail, logging instead of returning any failure.
    pub async fn notify(&self, to: &str, subject: &str, body: &str) {
        if !self.is_enabled() {
            tracing::debug!(subject, "Mail disabled, skipping notification");
            return;
        }

        match self.send(to, subject, body).await {
            Ok(()) => tracing::info!(to, subject, "Notification sent"),
            Err(e) => tracing::warn!(error = %e, to, subject, "Failed to send notification"),
        }
    }
}

fn build_message(from: Mailbox, to: &str, subject: &str, body: &str) -> anyhow::Result<Message> {
    let to: Mailbox = to
        .parse()
        .with_context(|| format!("invalid recipient address: {}", to))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .context("failed to build mail message")
}

// ─── Alert contents ──────────────────────────────────────────────

/// Subject and body of the admin alert for a new account.
pub fn signup_alert(name: &str, email: &str) -> (String, String) {
    (
        format!("New signup: {}", name),
        format!(
            "A new user has registered.\n\nName: {}\nEmail: {}\n",
            name, email
        ),
    )
}

/// Subject and body of the admin alert for a new customer query.
pub fn query_alert(name: &str, email: &str, service: &str, message: &str) -> (String, String) {
    (
        format!("New query from {}", name),
        format!(
            "A new query was submitted.\n\nName: {}\nEmail: {}\nService: {}\n\nMessage:\n{}\n",
            name, email, service, message
        ),
    )
}
