// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：工作项、原始字段和规范记录
/// - 仓库接口（repositories）：账本存储抽象接口
/// - 提取模式（schema）：字段映射、噪声标签和启发式关键字
/// - 服务（services）：提取器、规范化和房源解析
///
/// 领域层不依赖于任何具体的浏览器或表格实现。
pub mod models;
pub mod repositories;
pub mod schema;
pub mod services;
