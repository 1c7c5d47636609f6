// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Local};
use std::collections::HashMap;

/// 抓取时间戳写入账本时的格式
pub const SCRAPED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 原始字段
///
/// 从单个渲染页面中抓取到的未校验标签/值对
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawField {
    pub label: String,
    pub value: String,
}

/// 规范记录
///
/// 一个房源经过规范化后的输出，键为唯一的规范列名
#[derive(Debug, Clone)]
pub struct CanonicalRecord {
    /// 规范列名到值的映射
    pub fields: HashMap<String, String>,
    /// 抓取时间
    pub scraped_at: DateTime<Local>,
}

impl CanonicalRecord {
    pub fn scraped_on(&self) -> String {
        self.scraped_at.format(SCRAPED_AT_FORMAT).to_string()
    }
}

/// 联系方式
///
/// 每个字段独立地可能为空
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub agent: String,
    pub agency: String,
    pub phone: String,
}

impl ContactInfo {
    pub fn into_tuple(self) -> (String, String, String) {
        (self.agent, self.agency, self.phone)
    }
}
