// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::delivery::DeliveryReport;
use async_trait::async_trait;

/// 通知特质
///
/// 在后端完成后调用一次。实现方自行记录错误，不向调用方传播。
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, report: &DeliveryReport);
}
