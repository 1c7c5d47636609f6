// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 提供领域层存储接口的具体实现：
/// - Google Sheets 账本（sheets_ledger）：基于 Sheets API v4 的行列式账本
pub mod sheets_ledger;
