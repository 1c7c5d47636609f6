// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::listing::RawField;
use crate::engines::document::{find_all_within, parse_selector, rendered_text, PageSnapshot};
use scraper::ElementRef;
use std::collections::HashMap;
use tracing::debug;

/// 标签/值扫描器特质
///
/// 按结构相邻关系而非固定DOM路径，从渲染页面中找出成对的文本片段
pub trait PairScanner: Send + Sync {
    /// 扫描页面，返回原始标签到原始值的映射（重复标签后者覆盖前者）
    fn scan(&self, page: &PageSnapshot) -> HashMap<String, String>;
}

/// 基于相邻span对的扫描器
///
/// 对每个直接包含span子元素的元素，若其子孙中恰好有两个span，
/// 则第一个作为标签、第二个作为值。
#[derive(Debug, Clone)]
pub struct SpanPairScanner {
    tag: String,
    noise_labels: Vec<String>,
}

impl SpanPairScanner {
    pub fn new(noise_labels: Vec<String>) -> Self {
        Self::with_tag("span", noise_labels)
    }

    pub fn with_tag(tag: impl Into<String>, noise_labels: Vec<String>) -> Self {
        Self {
            tag: tag.into(),
            noise_labels: noise_labels
                .into_iter()
                .map(|noise| noise.to_lowercase())
                .collect(),
        }
    }

    fn has_direct_tag_child(&self, element: ElementRef<'_>) -> bool {
        element
            .children()
            .filter_map(ElementRef::wrap)
            .any(|child| child.value().name().eq_ignore_ascii_case(&self.tag))
    }

    fn pair(&self, group: &[ElementRef<'_>]) -> Option<RawField> {
        let [label, value] = group else {
            return None;
        };
        let label = rendered_text(*label);
        let value = rendered_text(*value);

        if label.is_empty() || value.is_empty() || value == "-" {
            return None;
        }
        if is_noise(&label, &self.noise_labels) {
            return None;
        }
        Some(RawField { label, value })
    }
}

impl PairScanner for SpanPairScanner {
    fn scan(&self, page: &PageSnapshot) -> HashMap<String, String> {
        let selector = match parse_selector(&self.tag) {
            Ok(selector) => selector,
            Err(e) => {
                debug!("Pair scanner disabled: {}", e);
                return HashMap::new();
            }
        };

        let mut fields = HashMap::new();
        for row in page.elements().filter(|el| self.has_direct_tag_child(*el)) {
            let group = find_all_within(row, &selector);
            if let Some(field) = self.pair(&group) {
                fields.insert(field.label, field.value);
            }
        }
        fields
    }
}

/// 标签是否包含任一噪声子串（大小写不敏感，`noise_labels` 须为小写）
pub fn is_noise(label: &str, noise_labels: &[String]) -> bool {
    let label = label.to_lowercase();
    noise_labels.iter().any(|noise| label.contains(noise.as_str()))
}
