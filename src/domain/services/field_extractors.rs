// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::schema::ExtractionSchema;
use crate::engines::document::{rendered_text, PageSnapshot};
use crate::engines::traits::{Locator, RenderError};
use thiserror::Error;

/// 字段提取错误类型
///
/// 专用提取器从不阻塞整条记录：调用方把任何错误降级为空字符串
#[derive(Error, Debug)]
pub enum ExtractError {
    /// 页面中没有符合条件的候选
    #[error("No matching candidate")]
    NotFound,
    /// 渲染会话错误
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// 提取价格
///
/// 在自身文本包含货币标记的元素中，按文档顺序返回第一个同时包含量级词的文本
pub fn extract_price(page: &PageSnapshot, schema: &ExtractionSchema) -> Result<String, ExtractError> {
    let marker = schema.currency_marker.as_str();
    page.find_all(&Locator::text(marker))?
        .into_iter()
        .map(rendered_text)
        .find(|text| {
            text.contains(marker)
                && schema
                    .magnitude_words
                    .iter()
                    .any(|word| text.contains(word.as_str()))
        })
        .ok_or(ExtractError::NotFound)
}

/// 提取最小面积
///
/// 候选文本须恰好为 `<数字> <单位>` 两个词，无法解析的候选被忽略
pub fn extract_min_unit_size(
    page: &PageSnapshot,
    schema: &ExtractionSchema,
) -> Result<String, ExtractError> {
    let keyword = schema.unit_keyword.as_str();
    page.find_all(&Locator::text(keyword))?
        .into_iter()
        .filter_map(|el| parse_unit_size(&rendered_text(el), keyword))
        .min_by(f64::total_cmp)
        .map(format_size)
        .ok_or(ExtractError::NotFound)
}

fn parse_unit_size(text: &str, keyword: &str) -> Option<f64> {
    let mut tokens = text.split_whitespace();
    let (number, unit) = (tokens.next()?, tokens.next()?);
    if tokens.next().is_some() || unit != keyword {
        return None;
    }
    number.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// 格式化面积，整数值保留一位小数（3 → "3.0"）
pub fn format_size(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
