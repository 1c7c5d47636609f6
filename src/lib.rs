// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、提取服务和账本接口
pub mod domain;

/// 引擎模块
///
/// 渲染会话抽象、DOM快照以及基于Chromium的实现
pub mod engines;

/// 基础设施模块
///
/// 提供外部服务集成，如 Google Sheets 账本
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;

/// 工作器模块
///
/// 实现可恢复的批处理流水线
pub mod workers;
