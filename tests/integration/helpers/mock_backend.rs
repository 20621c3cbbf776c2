// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use rentflow::domain::models::delivery::{DeliveryReport, SubmissionOutcome};
use rentflow::domain::models::record::Record;
use rentflow::domain::services::delivery_service::{DeliveryBackend, DeliveryError};
use rentflow::domain::services::notification_service::NotificationSink;
use std::sync::Mutex;

/// 记录所有收到的记录的后端
#[derive(Default)]
pub struct RecordingBackend {
    pub received: Mutex<Vec<Record>>,
    pub fail_fatally: bool,
    /// 按位置指定每条记录的结果，未指定的记为成功
    pub outcomes: Vec<SubmissionOutcome>,
}

impl RecordingBackend {
    pub fn failing() -> Self {
        Self {
            fail_fatally: true,
            ..Default::default()
        }
    }

    pub fn with_outcomes(outcomes: Vec<SubmissionOutcome>) -> Self {
        Self {
            outcomes,
            ..Default::default()
        }
    }

    pub fn received(&self) -> Vec<Record> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeliveryBackend for RecordingBackend {
    async fn submit_all(&self, records: &[Record]) -> Result<DeliveryReport, DeliveryError> {
        if self.fail_fatally {
            return Err(DeliveryError::MissingEndpoint);
        }
        let mut report = DeliveryReport::new(self.name());
        for (i, record) in records.iter().enumerate() {
            let outcome = self
                .outcomes
                .get(i)
                .copied()
                .unwrap_or(SubmissionOutcome::Success);
            if outcome == SubmissionOutcome::Success {
                self.received.lock().unwrap().push(record.clone());
            }
            report.record(outcome);
        }
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// 记录通知次数
#[derive(Default)]
pub struct RecordingNotifier {
    pub reports: Mutex<Vec<DeliveryReport>>,
}

impl RecordingNotifier {
    pub fn calls(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    pub fn reports(&self) -> Vec<DeliveryReport> {
        self.reports.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, report: &DeliveryReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}
