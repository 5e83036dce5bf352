// src/notify/email.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::{header, Mailbox, Message};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{cooldown_from_env, format, AlertChannel};
use crate::score::ScoredItem;

const DEFAULT_COOLDOWN_SECS: i64 = 30 * 60;

struct SmtpConfig {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

/// Rich HTML email over SMTP. Enabled when the full credential set
/// (SMTP_HOST, SMTP_USER, SMTP_PASS, ALERT_EMAIL_FROM, ALERT_EMAIL_TO)
/// is present and parseable; anything less disables the channel.
pub struct EmailChannel {
    config: Option<SmtpConfig>,
    cooldown_secs: i64,
}

impl EmailChannel {
    pub fn from_env() -> Self {
        Self {
            config: Self::config_from_env(),
            cooldown_secs: cooldown_from_env("EMAIL_COOLDOWN_SECS", DEFAULT_COOLDOWN_SECS),
        }
    }

    fn config_from_env() -> Option<SmtpConfig> {
        let host = std::env::var("SMTP_HOST").ok()?;
        let user = std::env::var("SMTP_USER").ok()?;
        let pass = std::env::var("SMTP_PASS").ok()?;
        let from_addr = std::env::var("ALERT_EMAIL_FROM").ok()?;
        let to_addr = std::env::var("ALERT_EMAIL_TO").ok()?;

        let mailer = match AsyncSmtpTransport::<Tokio1Executor>::relay(&host) {
            Ok(builder) => builder
                .credentials(Credentials::new(user, pass))
                .build(),
            Err(e) => {
                tracing::warn!(error = ?e, "invalid SMTP_HOST, email channel disabled");
                return None;
            }
        };

        let from: Mailbox = match from_addr.parse() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(error = ?e, "invalid ALERT_EMAIL_FROM, email channel disabled");
                return None;
            }
        };
        let to: Mailbox = match to_addr.parse() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(error = ?e, "invalid ALERT_EMAIL_TO, email channel disabled");
                return None;
            }
        };

        Some(SmtpConfig { mailer, from, to })
    }
}

#[async_trait]
impl AlertChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    fn cooldown_secs(&self) -> i64 {
        self.cooldown_secs
    }

    async fn deliver(&self, batch: &[ScoredItem]) -> Result<()> {
        let Some(cfg) = &self.config else {
            anyhow::bail!("email channel not configured");
        };

        let subject = format!("Market alert: {} high-impact news item(s)", batch.len());
        let msg = Message::builder()
            .from(cfg.from.clone())
            .to(cfg.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_HTML)
            .body(format::email_html(batch))
            .context("build email")?;

        cfg.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
