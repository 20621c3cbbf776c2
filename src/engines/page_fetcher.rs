// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::SourceSettings;
use crate::engines::traits::EngineError;
use scraper::Html;
use std::time::Instant;

/// 页面抓取器
///
/// 基于reqwest实现，单次 GET，超时有界，不重试
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// 创建页面抓取器
    ///
    /// # 参数
    ///
    /// * `settings` - 源页面配置，提供超时和 User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(PageFetcher)` - 抓取器
    /// * `Err(EngineError)` - HTTP 客户端构建失败
    pub fn new(settings: &SourceSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout())
            .build()?;

        Ok(Self { client })
    }

    /// 抓取并解析页面
    ///
    /// 任何网络或协议错误都只记录日志并返回 `None`，
    /// 调用方据此区分“没有数据”和程序崩溃。
    pub async fn fetch(&self, url: &str) -> Option<Html> {
        match self.fetch_body(url).await {
            Ok(body) => Some(Html::parse_document(&body)),
            Err(e) => {
                tracing::error!("Failed to fetch listing page {}: {}", url, e);
                None
            }
        }
    }

    async fn fetch_body(&self, url: &str) -> Result<String, EngineError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        tracing::debug!(
            "Fetched {} ({} bytes) in {} ms",
            url,
            body.len(),
            start.elapsed().as_millis()
        );
        Ok(body)
    }
}

#[cfg(test)]
#[path = "page_fetcher_test.rs"]
mod tests;
