// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// 环境变量前缀，例如 `RENTFLOW__DELIVERY__MODE`
pub const ENV_PREFIX: &str = "RENTFLOW";

/// 旧版 `.env` 键与新版带前缀键的映射
///
/// 旧部署只写了不带前缀的键，这里将其转换为对应的配置路径。
/// 同时设置时以带前缀的键为准。
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("MODE", "RENTFLOW__DELIVERY__MODE"),
    ("SHEETY_API_POST", "RENTFLOW__SPREADSHEET__ENDPOINT"),
    ("SHEETY_TOKEN", "RENTFLOW__SPREADSHEET__TOKEN"),
    ("FROM_MAIL", "RENTFLOW__MAIL__SENDER"),
    ("TO_MAIL", "RENTFLOW__MAIL__RECEIVER"),
    ("MAIL_PASSWORD", "RENTFLOW__MAIL__PASSWORD"),
    (
        "CHROMIUM_REMOTE_DEBUGGING_URL",
        "RENTFLOW__BROWSER__REMOTE_DEBUGGING_URL",
    ),
];

const DEFAULT_SOURCE_URL: &str = "https://appbrewery.github.io/Zillow-Clone/";
const DEFAULT_FORM_URL: &str = "https://docs.google.com/forms/d/e/1FAIpQLSeLLwlICI396brIvazfMJslEztlxuDRXGDson_dCzjOMhrHSQ/viewform";

/// 环境变量中 User-Agent 列表的分隔符，UA 本身常含逗号和分号
pub const USER_AGENT_SEPARATOR: char = '|';

const USER_AGENTS_KEY: &str = "RENTFLOW__FORM__USER_AGENTS";

const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/114.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 Chrome/112.0.0.0 Safari/537.36",
];

/// 应用程序配置设置
///
/// 在进程入口构建一次，之后以引用形式传入各组件的构造函数
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 投递配置
    pub delivery: DeliverySettings,
    /// 源页面配置
    pub source: SourceSettings,
    /// 表格 API 配置
    pub spreadsheet: SpreadsheetSettings,
    /// 表单配置
    pub form: FormSettings,
    /// 浏览器配置
    pub browser: BrowserSettings,
    /// 邮件通知配置
    pub mail: MailSettings,
}

/// 投递模式
///
/// 决定记录流由哪个后端消费
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DeliveryMode {
    /// 通过表格 API 逐行上传
    Spreadsheet,
    /// 通过浏览器自动化逐条填写表单
    Form,
}

impl TryFrom<String> for DeliveryMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "spreadsheet" | "sheety" => Ok(DeliveryMode::Spreadsheet),
            "form" | "gform" => Ok(DeliveryMode::Form),
            other => Err(format!(
                "invalid delivery mode '{}', expected one of: form, gform, spreadsheet, sheety",
                other
            )),
        }
    }
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Spreadsheet => write!(f, "spreadsheet"),
            DeliveryMode::Form => write!(f, "form"),
        }
    }
}

/// 投递配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DeliverySettings {
    pub mode: DeliveryMode,
}

/// 字段抽取范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldScope {
    /// 在整个文档中查找
    Document,
    /// 只在每张列表卡片内部查找
    Card,
}

/// 单个字段的抽取规则
#[derive(Debug, Clone, Deserialize)]
pub struct FieldRule {
    /// CSS 选择器
    pub selector: String,
    /// 选择器的作用范围
    pub scope: FieldScope,
}

/// 源页面配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSettings {
    /// 抓取的页面 URL
    pub url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 列表卡片选择器
    pub card_selector: String,
    /// 地址字段规则
    pub address: FieldRule,
    /// 租金字段规则
    pub rent: FieldRule,
    /// 链接字段规则
    pub link: FieldRule,
    /// 是否基于页面 URL 解析相对链接
    pub resolve_links: bool,
}

impl SourceSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 表格 API 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SpreadsheetSettings {
    /// POST 端点，未配置时表格模式无法运行
    #[serde(default)]
    pub endpoint: Option<String>,
    /// 可选的 Bearer token
    #[serde(default)]
    pub token: Option<String>,
    /// 负载外层的工作表键名
    pub sheet_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl SpreadsheetSettings {
    /// 返回非空的端点
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// 返回非空的 token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

/// 表单配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FormSettings {
    /// 表单地址
    pub url: String,
    /// 地址输入框的 XPath
    pub address_field: String,
    /// 租金输入框的 XPath
    pub rent_field: String,
    /// 链接输入框的 XPath
    pub link_field: String,
    /// 提交按钮的 XPath
    pub submit_button: String,
    /// 等待单个元素的超时时间（秒）
    pub wait_timeout_secs: u64,
    /// 每填写一个字段后的停顿（毫秒）
    pub field_pause_ms: u64,
    /// 成功提交后的随机停顿下限（毫秒）
    pub jitter_min_ms: u64,
    /// 成功提交后的随机停顿上限（毫秒）
    pub jitter_max_ms: u64,
    /// 浏览器会话随机选用的 User-Agent 列表
    pub user_agents: Vec<String>,
}

impl FormSettings {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn field_pause(&self) -> Duration {
        Duration::from_millis(self.field_pause_ms)
    }
}

/// 浏览器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserSettings {
    /// 是否无头运行
    pub headless: bool,
    /// 远程 Chrome 调试地址，设置后不再本地启动浏览器
    #[serde(default)]
    pub remote_debugging_url: Option<String>,
    /// CDP 请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 邮件通知配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub receiver: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub timeout_secs: u64,
    pub subject: String,
    pub body: String,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从进程环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_env(std::env::vars().collect())
    }

    /// 从给定的环境变量集合加载配置
    ///
    /// 旧版键会被翻译为带前缀的键，然后与配置文件、默认值合并
    pub fn from_env(mut vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        for (legacy, key) in LEGACY_KEYS {
            if let Some(value) = vars.get(*legacy).cloned() {
                vars.entry((*key).to_string()).or_insert(value);
            }
        }

        // Lists cannot come through the flat environment source as-is.
        let user_agents: Option<Vec<String>> = vars.remove(USER_AGENTS_KEY).map(|raw| {
            raw.split(USER_AGENT_SEPARATOR)
                .map(str::trim)
                .filter(|ua| !ua.is_empty())
                .map(str::to_string)
                .collect()
        });

        let env = vars
            .get("APP_ENVIRONMENT")
            .cloned()
            .unwrap_or_else(|| "default".to_string());

        let builder = Config::builder()
            // Delivery
            .set_default("delivery.mode", "form")?
            // Source page
            .set_default("source.url", DEFAULT_SOURCE_URL)?
            .set_default("source.timeout_secs", 10)?
            .set_default(
                "source.user_agent",
                "Mozilla/5.0 (compatible; rentflow/0.1)",
            )?
            .set_default("source.card_selector", ".StyledPropertyCardDataWrapper")?
            .set_default("source.address.selector", "address")?
            .set_default("source.address.scope", "document")?
            .set_default("source.rent.selector", "span")?
            .set_default("source.rent.scope", "document")?
            .set_default("source.link.selector", "a[href]")?
            .set_default("source.link.scope", "card")?
            .set_default("source.resolve_links", false)?
            // Spreadsheet
            .set_default("spreadsheet.sheet_key", "tabellenblatt1")?
            .set_default("spreadsheet.timeout_secs", 30)?
            // Form
            .set_default("form.url", DEFAULT_FORM_URL)?
            .set_default(
                "form.address_field",
                r#"//*[@id="mG61Hd"]/div[2]/div/div[2]/div[1]/div/div/div[2]/div/div[1]/div/div[1]/input"#,
            )?
            .set_default(
                "form.rent_field",
                r#"//*[@id="mG61Hd"]/div[2]/div/div[2]/div[2]/div/div/div[2]/div/div[1]/div/div[1]/input"#,
            )?
            .set_default(
                "form.link_field",
                r#"//*[@id="mG61Hd"]/div[2]/div/div[2]/div[3]/div/div/div[2]/div/div[1]/div/div[1]/input"#,
            )?
            .set_default(
                "form.submit_button",
                r#"//*[@id="mG61Hd"]/div[2]/div/div[3]/div[1]/div[1]/div"#,
            )?
            .set_default("form.wait_timeout_secs", 10)?
            .set_default("form.field_pause_ms", 300)?
            .set_default("form.jitter_min_ms", 700)?
            .set_default("form.jitter_max_ms", 1400)?
            .set_default("form.user_agents", DEFAULT_USER_AGENTS.to_vec())?
            // Browser
            .set_default("browser.headless", true)?
            .set_default("browser.request_timeout_secs", 30)?
            // Mail
            .set_default("mail.smtp_host", "smtp.gmail.com")?
            .set_default("mail.smtp_port", 587)?
            .set_default("mail.timeout_secs", 30)?
            .set_default("mail.subject", "Zeilen erfolgreich")?
            .set_default("mail.body", "Your Google Sheet is ready.")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .source(Some(vars)),
            )
            .set_override_option("form.user_agents", user_agents)?;

        builder.build()?.try_deserialize()
    }

    /// 校验配置
    ///
    /// 在任何网络活动之前调用，缺少必需配置时直接终止运行
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delivery.mode == DeliveryMode::Spreadsheet && self.spreadsheet.endpoint().is_none() {
            return Err(ConfigError::Message(
                "spreadsheet.endpoint (SHEETY_API_POST) is required in spreadsheet mode".to_string(),
            ));
        }

        if self.form.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::Message(
                "form.user_agents must contain at least one user agent".to_string(),
            ));
        }

        if self.form.jitter_min_ms > self.form.jitter_max_ms {
            return Err(ConfigError::Message(format!(
                "form.jitter_min_ms ({}) must not exceed form.jitter_max_ms ({})",
                self.form.jitter_min_ms, self.form.jitter_max_ms
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
