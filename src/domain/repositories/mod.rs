// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的存储接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供：
/// - 账本存储（ledger_store）：读取工作项，按单元格写回结果和状态
pub mod ledger_store;
