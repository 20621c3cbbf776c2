// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{FieldRule, FieldScope, SourceSettings};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// 抽取错误类型
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// 选择器无法解析
    #[error("Invalid selector for {field} '{selector}': {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },
    /// 页面 URL 无法解析
    #[error("Invalid base url '{0}'")]
    InvalidBaseUrl(String),
}

/// 编译后的字段规则
struct CompiledRule {
    selector: Selector,
    scope: FieldScope,
}

impl CompiledRule {
    fn compile(field: &'static str, rule: &FieldRule) -> Result<Self, ExtractionError> {
        Ok(Self {
            selector: parse_selector(field, &rule.selector)?,
            scope: rule.scope,
        })
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector).map_err(|e| ExtractionError::InvalidSelector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// 记录抽取器
///
/// 从解析后的文档中定位列表卡片，并分别抽取地址、租金、链接三个序列。
/// 三个字段各自拥有独立的选择器和作用范围。源站点的标记结构决定了
/// 默认配置下地址和租金在全文档范围查找，而链接只在卡片内部查找，
/// 因此三个序列并不保证按位置一一对应。
pub struct RecordExtractor {
    cards: Selector,
    address: CompiledRule,
    rent: CompiledRule,
    link: CompiledRule,
    base_url: Option<Url>,
}

impl RecordExtractor {
    /// 根据源页面配置编译所有选择器
    ///
    /// # 参数
    ///
    /// * `settings` - 源页面配置
    ///
    /// # 返回值
    ///
    /// * `Ok(RecordExtractor)` - 抽取器
    /// * `Err(ExtractionError)` - 选择器或页面 URL 无效
    pub fn new(settings: &SourceSettings) -> Result<Self, ExtractionError> {
        let base_url = if settings.resolve_links {
            Some(
                Url::parse(&settings.url)
                    .map_err(|_| ExtractionError::InvalidBaseUrl(settings.url.clone()))?,
            )
        } else {
            None
        };

        let extractor = Self {
            cards: parse_selector("cards", &settings.card_selector)?,
            address: CompiledRule::compile("address", &settings.address)?,
            rent: CompiledRule::compile("rent", &settings.rent)?,
            link: CompiledRule::compile("link", &settings.link)?,
            base_url,
        };

        if extractor.address.scope != extractor.link.scope
            || extractor.rent.scope != extractor.link.scope
        {
            tracing::debug!(
                "Field scopes differ (address: {:?}, rent: {:?}, link: {:?}); sequences may be misaligned",
                extractor.address.scope,
                extractor.rent.scope,
                extractor.link.scope
            );
        }

        Ok(extractor)
    }

    /// 按文档顺序返回所有列表卡片
    pub fn extract_cards<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        let cards: Vec<_> = doc.select(&self.cards).collect();
        tracing::debug!("Found {} property cards", cards.len());
        cards
    }

    /// 抽取地址序列
    ///
    /// 文本去除首尾空白，` | ` 分隔符替换为单个空格
    pub fn extract_addresses(&self, doc: &Html) -> Vec<String> {
        let addresses: Vec<String> = self
            .select(doc, &self.address)
            .into_iter()
            .map(|element| normalize_address(&stripped_text(element)))
            .collect();
        tracing::debug!("Parsed {} addresses", addresses.len());
        addresses
    }

    /// 抽取租金序列
    ///
    /// 只保留包含 `$` 的元素
    pub fn extract_rents(&self, doc: &Html) -> Vec<String> {
        let rents: Vec<String> = self
            .select(doc, &self.rent)
            .into_iter()
            .filter(|element| element.text().any(|t| t.contains('$')))
            .map(|element| normalize_rent(&stripped_text(element)))
            .collect();
        tracing::debug!("Parsed {} rents", rents.len());
        rents
    }

    /// 抽取链接序列
    pub fn extract_links(&self, doc: &Html) -> Vec<String> {
        let links: Vec<String> = self
            .select(doc, &self.link)
            .into_iter()
            .filter_map(|element| element.value().attr("href"))
            .map(|href| self.resolve(href.trim()))
            .collect();
        tracing::debug!("Parsed {} links", links.len());
        links
    }

    fn select<'a>(&self, doc: &'a Html, rule: &CompiledRule) -> Vec<ElementRef<'a>> {
        match rule.scope {
            FieldScope::Document => doc.select(&rule.selector).collect(),
            FieldScope::Card => doc
                .select(&self.cards)
                .flat_map(|card| card.select(&rule.selector))
                .collect(),
        }
    }

    fn resolve(&self, href: &str) -> String {
        match &self.base_url {
            Some(base) => base
                .join(href)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        }
    }
}

/// 每个文本节点去除首尾空白后直接拼接
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// 规范化地址文本
pub fn normalize_address(raw: &str) -> String {
    raw.trim().replace(" | ", " ")
}

/// 规范化租金文本
///
/// 去掉 `/mo`，并在第一个 `+` 处截断，例如 `$1,500+/mo` 变为 `$1,500`
pub fn normalize_rent(raw: &str) -> String {
    let without_suffix = raw.trim().replace("/mo", "");
    without_suffix
        .split('+')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "extraction_service_test.rs"]
mod tests;
