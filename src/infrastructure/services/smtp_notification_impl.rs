// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MailSettings;
use crate::domain::models::delivery::DeliveryReport;
use crate::domain::services::notification_service::NotificationSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

/// 发件所需的凭据
#[derive(Debug, Clone)]
struct MailCredentials {
    sender: String,
    receiver: String,
    password: String,
}

/// SMTP 通知实现
///
/// 通过 STARTTLS 登录发送固定内容的纯文本邮件。凭据不完整时跳过发送。
pub struct SmtpNotifier {
    credentials: Option<MailCredentials>,
    host: String,
    port: u16,
    timeout: Duration,
    subject: String,
    body: String,
}

impl SmtpNotifier {
    pub fn new(settings: &MailSettings) -> Self {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let credentials = match (
            non_empty(&settings.sender),
            non_empty(&settings.receiver),
            non_empty(&settings.password),
        ) {
            (Some(sender), Some(receiver), Some(password)) => Some(MailCredentials {
                sender,
                receiver,
                password,
            }),
            _ => None,
        };

        Self {
            credentials,
            host: settings.smtp_host.clone(),
            port: settings.smtp_port,
            timeout: Duration::from_secs(settings.timeout_secs),
            subject: settings.subject.clone(),
            body: settings.body.clone(),
        }
    }

    fn build_message(&self, credentials: &MailCredentials) -> Result<Message> {
        Message::builder()
            .from(credentials.sender.parse().context("invalid sender address")?)
            .to(credentials.receiver.parse().context("invalid receiver address")?)
            .subject(self.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(self.body.clone())
            .context("failed to build confirmation mail")
    }

    async fn send(&self, credentials: &MailCredentials) -> Result<()> {
        let message = self.build_message(credentials)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?
            .port(self.port)
            .timeout(Some(self.timeout))
            .credentials(Credentials::new(
                credentials.sender.clone(),
                credentials.password.clone(),
            ))
            .build();

        transport.send(message).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for SmtpNotifier {
    async fn notify(&self, report: &DeliveryReport) {
        let Some(credentials) = &self.credentials else {
            tracing::warn!("Mail configuration incomplete, no confirmation mail sent");
            return;
        };

        tracing::debug!(
            "Sending confirmation mail for {} backend ({} succeeded, {} failed)",
            report.backend,
            report.succeeded,
            report.failures()
        );

        match self.send(credentials).await {
            Ok(()) => tracing::info!("Confirmation mail sent to {}", credentials.receiver),
            Err(e) => tracing::error!("Failed to send confirmation mail: {:#}", e),
        }
    }
}
