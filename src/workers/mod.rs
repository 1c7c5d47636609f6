// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供可恢复的批处理流水线：逐行处理账本中的工作项并写回结果
pub mod pipeline;

pub use pipeline::BatchPipeline;
