// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::BrowserSettings;
use crate::engines::traits::{ElementCondition, EngineError, FormDriver, SessionLauncher};
use async_trait::async_trait;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Element, Page};
use futures::StreamExt;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Chromium 会话启动器
///
/// 基于chromiumoxide，本地启动 Chrome 或连接远程调试端口
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: &BrowserSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }

    fn remote_url(&self) -> Option<&str> {
        self.settings
            .remote_debugging_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    type Driver = ChromiumDriver;

    /// 启动隔离的浏览器会话
    ///
    /// # 参数
    ///
    /// * `user_agent` - 会话使用的 User-Agent
    ///
    /// # 返回值
    ///
    /// * `Ok(ChromiumDriver)` - 已打开空白页的驱动
    /// * `Err(EngineError)` - 浏览器无法启动或连接
    async fn launch(&self, user_agent: &str) -> Result<ChromiumDriver, EngineError> {
        let remote = self.remote_url().map(str::to_string);

        let (mut browser, mut handler) = if let Some(ref url) = remote {
            tracing::info!("Connecting to remote Chrome instance at: {}", url);
            Browser::connect(url.as_str()).await.map_err(|e| {
                EngineError::Browser(format!("Failed to connect to remote Chrome: {}", e))
            })?
        } else {
            let mut builder = BrowserConfig::builder()
                .no_sandbox()
                .request_timeout(Duration::from_secs(self.settings.request_timeout_secs))
                .arg("--incognito")
                .arg("--disable-gpu")
                .arg("--disable-dev-shm-usage")
                .arg(format!("--user-agent={}", user_agent));

            if !self.settings.headless {
                builder = builder.with_head();
            }

            Browser::launch(builder.build().map_err(EngineError::Browser)?)
                .await
                .map_err(|e| EngineError::Browser(e.to_string()))?
        };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = match open_page(&browser, user_agent).await {
            Ok(page) => page,
            Err(e) => {
                if remote.is_none() {
                    let _ = browser.close().await;
                }
                handler_task.abort();
                return Err(e);
            }
        };

        tracing::debug!("Browser session started with user agent: {}", user_agent);

        Ok(ChromiumDriver {
            browser,
            page,
            handler: Some(handler_task),
            remote: remote.is_some(),
        })
    }
}

async fn open_page(browser: &Browser, user_agent: &str) -> Result<Page, EngineError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;

    page.set_user_agent(user_agent)
        .await
        .map_err(|e| EngineError::Browser(e.to_string()))?;

    Ok(page)
}

/// Chromium 表单驱动
///
/// 独占一个页面；`quit` 之后所有操作都不再可用
/// 元素尚未出现或尚不可点击
///
/// 其余错误（连接断开、无响应等）说明会话已不可用，继续轮询没有意义
fn is_pending(error: &CdpError) -> bool {
    matches!(
        error,
        CdpError::NotFound | CdpError::Chrome(_) | CdpError::ChromeMessage(_)
    )
}

/// 反复执行 `probe` 直到成功、出现非等待类错误或超过 `timeout`
async fn poll_until<T, F, Fut>(timeout: Duration, mut probe: F) -> Result<T, EngineError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CdpError>>,
{
    tokio::time::timeout(timeout, async {
        loop {
            match probe().await {
                Ok(value) => return Ok(value),
                Err(e) if is_pending(&e) => tokio::time::sleep(POLL_INTERVAL).await,
                Err(e) => return Err(EngineError::Browser(e.to_string())),
            }
        }
    })
    .await
    .map_err(|_| EngineError::Timeout)?
}

pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: Option<JoinHandle<()>>,
    remote: bool,
}

#[async_trait]
impl FormDriver for ChromiumDriver {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> Result<(), EngineError> {
        self.page
            .goto(url)
            .await
            .map_err(|e| EngineError::Browser(format!("Navigation to {} failed: {}", url, e)))?;
        Ok(())
    }

    async fn wait_for(
        &mut self,
        xpath: &str,
        condition: ElementCondition,
        timeout: Duration,
    ) -> Result<Element, EngineError> {
        let page = &self.page;

        poll_until(timeout, || async move {
            let element = page.find_xpath(xpath).await?;
            if condition == ElementCondition::Clickable {
                element.clickable_point().await?;
            }
            Ok::<_, CdpError>(element)
        })
        .await
    }

    async fn click(&mut self, element: &Element) -> Result<(), EngineError> {
        element
            .click()
            .await
            .map_err(|e| EngineError::Browser(format!("Click failed: {}", e)))?;
        Ok(())
    }

    async fn type_text(&mut self, element: &Element, text: &str) -> Result<(), EngineError> {
        element
            .type_str(text)
            .await
            .map_err(|e| EngineError::Browser(format!("Input failed: {}", e)))?;
        Ok(())
    }

    async fn quit(&mut self) -> Result<(), EngineError> {
        let handler = self.handler.take().ok_or(EngineError::SessionClosed)?;

        // A remote browser is shared, only our page is closed there.
        let result = if self.remote {
            self.page.clone().close().await.map(|_| ())
        } else {
            self.browser.close().await.map(|_| ())
        };

        if !self.remote {
            let _ = self.browser.wait().await;
        }
        handler.abort();

        result.map_err(|e| EngineError::Browser(e.to_string()))
    }
}

impl Drop for ChromiumDriver {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}
