// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 工作项
///
/// 账本中的一行。`row_index` 是账本中的1起始行号（表头为第1行），
/// 也是工作项的唯一标识。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// 账本行号
    pub row_index: u32,
    /// 房源页面URL
    pub url: String,
    /// 处理状态
    pub status: WorkStatus,
}

impl WorkItem {
    /// 是否需要在本轮处理
    ///
    /// 空URL和已完成的行会被跳过；失败的行在下一轮重新处理
    pub fn is_eligible(&self) -> bool {
        !self.url.trim().is_empty() && self.status != WorkStatus::Done
    }
}

/// 工作项状态
///
/// 状态转换只允许：Pending → Done 或 Pending → Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WorkStatus {
    /// 待处理
    #[default]
    Pending,
    /// 已完成
    Done,
    /// 已失败，下一轮运行时重新处理
    Failed,
}

impl WorkStatus {
    /// 解析账本单元格中的状态文本，无法识别的内容视为待处理
    pub fn from_cell(cell: &str) -> Self {
        cell.trim().parse().unwrap_or_default()
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WorkStatus::Pending => write!(f, "Pending"),
            WorkStatus::Done => write!(f, "Done"),
            WorkStatus::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for WorkStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(WorkStatus::Pending),
            "Done" => Ok(WorkStatus::Done),
            "Failed" => Ok(WorkStatus::Failed),
            _ => Err(()),
        }
    }
}
