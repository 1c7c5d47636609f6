// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::schema::FieldMap;
use std::collections::HashMap;

/// 将原始标签映射为规范列名
///
/// 字段映射中不存在的标签被静默丢弃。多个标签映射到同一列时，
/// 按输入映射的迭代顺序后写者胜出，不保证具体是哪一个。
pub fn normalize(raw: &HashMap<String, String>, field_map: &FieldMap) -> HashMap<String, String> {
    raw.iter()
        .filter_map(|(label, value)| {
            field_map
                .canonical(label)
                .map(|column| (column.to_string(), value.clone()))
        })
        .collect()
}
