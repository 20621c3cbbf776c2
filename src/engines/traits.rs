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

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 浏览器操作失败
    #[error("Browser error: {0}")]
    Browser(String),
    /// 会话已关闭
    #[error("Browser session already closed")]
    SessionClosed,
}

impl EngineError {
    /// 判断错误是否为超时
    pub fn is_timeout(&self) -> bool {
        match self {
            EngineError::Timeout => true,
            EngineError::RequestFailed(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// 等待元素时的条件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCondition {
    /// 元素出现在 DOM 中
    Present,
    /// 元素可见且可点击
    Clickable,
}

/// 表单驱动特质
///
/// 浏览器自动化的最小操作集合，定位统一使用 XPath
#[async_trait]
pub trait FormDriver: Send {
    /// 元素句柄
    type Element: Send + Sync;

    /// 打开页面
    async fn navigate(&mut self, url: &str) -> Result<(), EngineError>;

    /// 等待元素满足条件，超过 `timeout` 返回 `EngineError::Timeout`
    async fn wait_for(
        &mut self,
        xpath: &str,
        condition: ElementCondition,
        timeout: Duration,
    ) -> Result<Self::Element, EngineError>;

    /// 点击元素
    async fn click(&mut self, element: &Self::Element) -> Result<(), EngineError>;

    /// 向元素输入文本
    async fn type_text(&mut self, element: &Self::Element, text: &str) -> Result<(), EngineError>;

    /// 释放会话
    async fn quit(&mut self) -> Result<(), EngineError>;
}

/// 浏览器会话启动器
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    type Driver: FormDriver;

    /// 以给定的 User-Agent 启动一个隔离的会话
    async fn launch(&self, user_agent: &str) -> Result<Self::Driver, EngineError>;
}
