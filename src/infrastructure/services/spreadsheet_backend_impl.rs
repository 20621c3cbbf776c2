// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::SpreadsheetSettings;
use crate::domain::models::delivery::{DeliveryReport, SubmissionOutcome};
use crate::domain::models::record::Record;
use crate::domain::services::delivery_service::{DeliveryBackend, DeliveryError};
use crate::engines::traits::EngineError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// 表格 API 中的一行
#[derive(Debug, Serialize)]
struct SheetRow<'a> {
    address: &'a str,
    rent: &'a str,
    link: &'a str,
    timestamp: &'a str,
}

/// 表格后端实现
///
/// 逐条 POST 到表格 API。任意一条失败都会中止整批。
pub struct SpreadsheetBackend {
    /// HTTP 客户端
    client: reqwest::Client,
    endpoint: Option<String>,
    token: Option<String>,
    sheet_key: String,
}

impl SpreadsheetBackend {
    /// 创建新的表格后端
    pub fn new(settings: &SpreadsheetSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint().map(str::to_string),
            token: settings.token().map(str::to_string),
            sheet_key: settings.sheet_key.clone(),
        })
    }

    /// 构建嵌套负载 `{ "<sheet_key>": { ... } }`
    fn payload<'a>(&'a self, record: &'a Record) -> HashMap<&'a str, SheetRow<'a>> {
        HashMap::from([(
            self.sheet_key.as_str(),
            SheetRow {
                address: &record.address,
                rent: &record.rent,
                link: &record.link,
                timestamp: &record.timestamp,
            },
        )])
    }

    /// 提交单条记录
    ///
    /// 失败时记录日志并把错误返回给调用方
    async fn submit_one(
        &self,
        endpoint: &str,
        index: usize,
        record: &Record,
    ) -> Result<Value, DeliveryError> {
        let payload = self.payload(record);
        tracing::debug!("Sending payload to spreadsheet: {:?}", payload);

        let mut request = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(&payload);

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| {
            tracing::error!("Upload failed for address: {} ({})", record.address, source);
            DeliveryError::Transport { index, source }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Upload failed for address: {}", record.address);
            tracing::error!("Spreadsheet response ({}): {}", status, body);
            return Err(DeliveryError::Rejected {
                index,
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Row uploaded: {}", record.address);
        // Some endpoints answer with an empty body.
        Ok(response.json::<Value>().await.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl DeliveryBackend for SpreadsheetBackend {
    async fn submit_all(&self, records: &[Record]) -> Result<DeliveryReport, DeliveryError> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(DeliveryError::MissingEndpoint)?;

        let mut report = DeliveryReport::new(self.name());
        for (i, record) in records.iter().enumerate() {
            self.submit_one(endpoint, i + 1, record).await?;
            report.record(SubmissionOutcome::Success);
        }

        tracing::info!("[Spreadsheet] {} rows uploaded", report.succeeded);
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "spreadsheet"
    }
}

#[cfg(test)]
#[path = "spreadsheet_backend_impl_test.rs"]
mod tests;
