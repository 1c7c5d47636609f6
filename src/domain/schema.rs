// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashMap;

/// 账本列名常量
pub mod columns {
    pub const URL: &str = "URL";
    pub const STATUS: &str = "Status";
    pub const PRICE: &str = "Price";
    pub const MARLA_SIZE: &str = "Marla Size";
    pub const AGENT_NAME: &str = "Agent Name";
    pub const AGENCY_NAME: &str = "Agency Name";
    pub const PHONE_NUMBER: &str = "Phone Number";
    pub const SCRAPED_ON: &str = "Scraped On";
}

/// 原始标签到规范列名的多对一映射
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    entries: HashMap<String, String>,
}

impl FieldMap {
    pub fn new<I, L, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (L, C)>,
        L: Into<String>,
        C: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(label, column)| (label.into(), column.into()))
                .collect(),
        }
    }

    /// 查找原始标签对应的规范列名
    pub fn canonical(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::new([
            ("Type", "Property Type"),
            ("Purpose", "Purpose"),
            ("Initial Amount", "Down Payment"),
            ("Monthly Installment", "Installment Amount"),
            ("Remaining Installments", "Number of Installments"),
            ("Bedroom(s)", "Bedrooms"),
            ("Bedrooms", "Bedrooms"),
            ("Bath(s)", "Bathrooms"),
            ("Bathrooms", "Bathrooms"),
            ("Added", "Added Date"),
            ("Location", "Location"),
        ])
    }
}

/// 提取模式
///
/// 进程级不可变配置：字段映射、噪声标签以及价格和面积启发式所需的关键字
#[derive(Debug, Clone)]
pub struct ExtractionSchema {
    /// 字段映射
    pub field_map: FieldMap,
    /// 噪声标签子串（大小写不敏感）
    pub noise_labels: Vec<String>,
    /// 货币标记
    pub currency_marker: String,
    /// 价格量级词
    pub magnitude_words: Vec<String>,
    /// 面积单位关键字
    pub unit_keyword: String,
}

impl Default for ExtractionSchema {
    fn default() -> Self {
        Self {
            field_map: FieldMap::default(),
            noise_labels: vec!["months ago".into(), "%".into(), "Scheme".into()],
            currency_marker: "PKR".into(),
            magnitude_words: vec![
                "Lakh".into(),
                "Crore".into(),
                "Million".into(),
                "Thousand".into(),
            ],
            unit_keyword: "Marla".into(),
        }
    }
}
