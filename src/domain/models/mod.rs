// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 工作项（work_item）：账本中的一行及其处理状态
/// - 房源（listing）：原始字段、规范记录和联系方式
pub mod listing;
pub mod work_item;
