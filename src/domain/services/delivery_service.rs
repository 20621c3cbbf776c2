// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::delivery::DeliveryReport;
use crate::domain::models::record::Record;
use crate::engines::traits::EngineError;
use async_trait::async_trait;
use thiserror::Error;

/// 投递错误类型
///
/// 这里只有致命错误：表单后端的单条失败在内部被隔离，不会出现在返回值中
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// 未配置表格端点
    #[error("Spreadsheet endpoint is not configured")]
    MissingEndpoint,
    /// 没有可用的 User-Agent
    #[error("No user agent configured for the browser session")]
    NoUserAgent,
    /// 浏览器会话无法获取
    #[error("Browser session could not be started: {0}")]
    SessionUnavailable(#[source] EngineError),
    /// 端点返回非 2xx 状态
    #[error("Record #{index} rejected with status {status}: {body}")]
    Rejected {
        index: usize,
        status: u16,
        body: String,
    },
    /// 传输层错误
    #[error("Record #{index} could not be sent: {source}")]
    Transport {
        index: usize,
        #[source]
        source: reqwest::Error,
    },
}

/// 投递后端特质
///
/// 按顺序逐条消费记录序列
#[async_trait]
pub trait DeliveryBackend: Send + Sync {
    /// 提交全部记录
    ///
    /// # 参数
    ///
    /// * `records` - 按抓取顺序排列的记录
    ///
    /// # 返回值
    ///
    /// * `Ok(DeliveryReport)` - 投递完成（可能包含被隔离的单条失败）
    /// * `Err(DeliveryError)` - 致命错误，整批中止
    async fn submit_all(&self, records: &[Record]) -> Result<DeliveryReport, DeliveryError>;

    /// 后端名称
    fn name(&self) -> &'static str;
}
