// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::FormSettings;
use crate::domain::models::delivery::{DeliveryReport, FormSubmissionState, SubmissionOutcome};
use crate::domain::models::record::Record;
use crate::domain::services::delivery_service::{DeliveryBackend, DeliveryError};
use crate::engines::traits::{ElementCondition, EngineError, FormDriver, SessionLauncher};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::time::Duration;

/// 单条表单提交失败
///
/// 记录失败时已到达的状态
#[derive(Debug)]
pub struct FormStepError {
    pub reached: FormSubmissionState,
    pub error: EngineError,
}

impl FormStepError {
    pub fn outcome(&self) -> SubmissionOutcome {
        if self.error.is_timeout() {
            SubmissionOutcome::Timeout
        } else {
            SubmissionOutcome::OtherFailure
        }
    }
}

/// 表单后端实现
///
/// 通过浏览器逐条填写并提交表单。单条记录的失败只记录日志，
/// 不会中止整批；会话在循环结束后恰好释放一次。
pub struct FormBackend<L: SessionLauncher> {
    settings: FormSettings,
    launcher: L,
}

impl<L: SessionLauncher> FormBackend<L> {
    pub fn new(settings: &FormSettings, launcher: L) -> Self {
        Self {
            settings: settings.clone(),
            launcher,
        }
    }

    fn pick_user_agent(&self) -> Option<String> {
        let candidates: Vec<&String> = self
            .settings
            .user_agents
            .iter()
            .filter(|ua| !ua.trim().is_empty())
            .collect();

        candidates
            .choose(&mut rand::rng())
            .map(|ua| ua.trim().to_string())
    }

    fn jitter(&self) -> Duration {
        let min = self.settings.jitter_min_ms;
        let max = self.settings.jitter_max_ms.max(min);
        Duration::from_millis(rand::rng().random_range(min..=max))
    }

    /// 提交单条记录
    ///
    /// 按 `Pending → Navigated → FieldsLocated → Filled → Submitted` 推进，
    /// 任何一步失败即返回，不重试。
    pub async fn submit_one(
        &self,
        driver: &mut L::Driver,
        record: &Record,
    ) -> Result<FormSubmissionState, FormStepError> {
        let mut state = FormSubmissionState::Pending;
        let fail = |reached: FormSubmissionState| {
            move |error: EngineError| FormStepError { reached, error }
        };

        tracing::debug!("Opening form for: {}", record.address);
        driver.navigate(&self.settings.url).await.map_err(fail(state))?;
        state = FormSubmissionState::Navigated;

        let timeout = self.settings.wait_timeout();
        let address_field = driver
            .wait_for(&self.settings.address_field, ElementCondition::Present, timeout)
            .await
            .map_err(fail(state))?;
        let rent_field = driver
            .wait_for(&self.settings.rent_field, ElementCondition::Present, timeout)
            .await
            .map_err(fail(state))?;
        let link_field = driver
            .wait_for(&self.settings.link_field, ElementCondition::Present, timeout)
            .await
            .map_err(fail(state))?;
        let submit_button = driver
            .wait_for(&self.settings.submit_button, ElementCondition::Clickable, timeout)
            .await
            .map_err(fail(state))?;
        state = FormSubmissionState::FieldsLocated;

        for (field, value) in [
            (&address_field, record.address.as_str()),
            (&rent_field, record.rent.as_str()),
            (&link_field, record.link.as_str()),
        ] {
            driver.click(field).await.map_err(fail(state))?;
            driver.type_text(field, value).await.map_err(fail(state))?;
            // Client-side form re-renders between fields.
            tokio::time::sleep(self.settings.field_pause()).await;
        }
        state = FormSubmissionState::Filled;

        driver.click(&submit_button).await.map_err(fail(state))?;
        tracing::debug!("Form submitted for: {}", record.address);

        Ok(FormSubmissionState::Submitted)
    }

    async fn submit_each(&self, driver: &mut L::Driver, records: &[Record]) -> DeliveryReport {
        let mut report = DeliveryReport::new(self.name());

        for (i, record) in records.iter().enumerate() {
            match self.submit_one(driver, record).await {
                Ok(_) => {
                    report.record(SubmissionOutcome::Success);
                    tracing::info!("Form #{} submitted: {}", i + 1, record.address);
                    tokio::time::sleep(self.jitter()).await;
                }
                Err(e) => {
                    let outcome = e.outcome();
                    report.record(outcome);
                    if outcome == SubmissionOutcome::Timeout {
                        tracing::error!(
                            "Timeout on form #{} after state {}: {}",
                            i + 1,
                            e.reached,
                            record.address
                        );
                    } else {
                        tracing::error!(
                            "Form #{} failed after state {}: {} - {}",
                            i + 1,
                            e.reached,
                            record.address,
                            e.error
                        );
                    }
                }
            }
        }

        report
    }
}

#[async_trait]
impl<L: SessionLauncher> DeliveryBackend for FormBackend<L> {
    async fn submit_all(&self, records: &[Record]) -> Result<DeliveryReport, DeliveryError> {
        tracing::info!("Filling out form for {} entries", records.len());

        let user_agent = self.pick_user_agent().ok_or_else(|| {
            tracing::error!("No user agent configured for the browser session");
            DeliveryError::NoUserAgent
        })?;
        let mut driver = self.launcher.launch(&user_agent).await.map_err(|e| {
            tracing::error!("Failed to start browser: {}", e);
            DeliveryError::SessionUnavailable(e)
        })?;

        let report = self.submit_each(&mut driver, records).await;

        if let Err(e) = driver.quit().await {
            tracing::warn!("Failed to close browser, it was probably already closed: {}", e);
        }

        tracing::info!("{} forms submitted successfully", report.succeeded);
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "form"
    }
}

#[cfg(test)]
#[path = "form_backend_impl_test.rs"]
mod tests;
