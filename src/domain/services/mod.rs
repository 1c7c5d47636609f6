// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含提取引擎的核心逻辑：
/// - 标签/值扫描器（pair_scanner）：按结构相邻关系找出成对的文本片段
/// - 专用字段提取器（field_extractors）：价格和最小面积启发式
/// - 联系方式探测器（contact_probe）：经纪人、中介和电话号码
/// - 字段规范化（normalizer）：把原始标签映射为规范列名
/// - 房源解析器（listing_resolver）：编排单个URL的完整处理流程
pub mod contact_probe;
pub mod field_extractors;
pub mod listing_resolver;
pub mod normalizer;
pub mod pair_scanner;
