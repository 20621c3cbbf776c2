// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{DeliveryMode, Settings, SourceSettings};
use crate::domain::models::delivery::DeliveryReport;
use crate::domain::models::record::Record;
use crate::domain::services::delivery_service::{DeliveryBackend, DeliveryError};
use crate::domain::services::extraction_service::{ExtractionError, RecordExtractor};
use crate::domain::services::notification_service::NotificationSink;
use crate::domain::services::record_builder;
use crate::engines::chromium_driver::ChromiumLauncher;
use crate::engines::page_fetcher::PageFetcher;
use crate::engines::traits::EngineError;
use crate::infrastructure::services::form_backend_impl::FormBackend;
use crate::infrastructure::services::smtp_notification_impl::SmtpNotifier;
use crate::infrastructure::services::spreadsheet_backend_impl::SpreadsheetBackend;
use config::ConfigError;
use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("HTTP client error: {0}")]
    Client(#[from] EngineError),
    #[error("Extraction setup failed: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("Could not load the listing page: {0}")]
    PageUnavailable(String),
    #[error("No listings found on the page")]
    NoListings,
    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

/// 一次运行的摘要
#[derive(Debug, Clone)]
pub struct PipelineSummary {
    pub run_id: Uuid,
    /// 页面上找到的卡片数
    pub listings: usize,
    /// 组合出的记录数
    pub records: usize,
    /// 投递报告，没有记录时为 `None`
    pub report: Option<DeliveryReport>,
}

/// 按投递模式选择后端
pub fn select_backend(settings: &Settings) -> Result<Arc<dyn DeliveryBackend>, PipelineError> {
    let backend: Arc<dyn DeliveryBackend> = match settings.delivery.mode {
        DeliveryMode::Spreadsheet => Arc::new(SpreadsheetBackend::new(&settings.spreadsheet)?),
        DeliveryMode::Form => Arc::new(FormBackend::new(
            &settings.form,
            ChromiumLauncher::new(&settings.browser),
        )),
    };
    Ok(backend)
}

/// 抓取-转换-投递管道
///
/// 页面抓取 → 记录抽取 → 记录组合 → 后端投递 → 通知
pub struct ListingPipeline {
    source_url: String,
    fetcher: PageFetcher,
    extractor: RecordExtractor,
    backend: Arc<dyn DeliveryBackend>,
    notifier: Arc<dyn NotificationSink>,
}

impl ListingPipeline {
    pub fn new(
        source: &SourceSettings,
        backend: Arc<dyn DeliveryBackend>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            source_url: source.url.clone(),
            fetcher: PageFetcher::new(source)?,
            extractor: RecordExtractor::new(source)?,
            backend,
            notifier,
        })
    }

    /// 根据完整配置装配管道
    ///
    /// 先校验配置，缺少必需项时在任何网络活动之前失败
    pub fn from_settings(settings: &Settings) -> Result<Self, PipelineError> {
        settings.validate()?;
        tracing::info!("Delivery mode: {}", settings.delivery.mode);

        let backend = select_backend(settings)?;
        let notifier = Arc::new(SmtpNotifier::new(&settings.mail));
        Self::new(&settings.source, backend, notifier)
    }

    /// 抓取页面并组合记录
    ///
    /// 返回卡片数和记录
    pub async fn collect_records(&self) -> Result<(usize, Vec<Record>), PipelineError> {
        let doc = self
            .fetcher
            .fetch(&self.source_url)
            .await
            .ok_or_else(|| PipelineError::PageUnavailable(self.source_url.clone()))?;

        let listings = self.extractor.extract_cards(&doc).len();
        if listings == 0 {
            tracing::error!("No listings found on {}", self.source_url);
            return Err(PipelineError::NoListings);
        }
        tracing::info!("{} listings found", listings);

        let records = record_builder::build(
            self.extractor.extract_addresses(&doc),
            self.extractor.extract_rents(&doc),
            self.extractor.extract_links(&doc),
        );

        Ok((listings, records))
    }

    /// 执行一次完整运行
    ///
    /// # 返回值
    ///
    /// * `Ok(PipelineSummary)` - 运行结束（单条失败已在报告中计数）
    /// * `Err(PipelineError)` - 致命错误，运行中止
    pub async fn run(&self) -> Result<PipelineSummary, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("pipeline", %run_id, backend = self.backend.name());

        async move {
            tracing::info!("Pipeline started");

            let (listings, records) = self.collect_records().await?;
            let mut summary = PipelineSummary {
                run_id,
                listings,
                records: records.len(),
                report: None,
            };

            if records.is_empty() {
                tracing::warn!("No records to submit, stopping");
                return Ok(summary);
            }

            tracing::info!("Submitting {} records via {}", records.len(), self.backend.name());
            let report = self.backend.submit_all(&records).await?;

            self.notifier.notify(&report).await;

            tracing::info!(
                "Pipeline finished: {} of {} records delivered",
                report.succeeded,
                report.attempted
            );
            summary.report = Some(report);
            Ok(summary)
        }
        .instrument(span)
        .await
    }
}
